use crate::session::Session;
use crate::types::LookupRequest;

const CAPTCHA_MISMATCH: &str = "404";
const CLIENT_IP: &str = "9.9.9.91";
const FROM_URL: &str = "1";

/// Raw body returned by the search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    pub body: String,
}

impl FormOutcome {
    /// The site answers a rejected captcha with a body of exactly "404".
    pub fn is_captcha_mismatch(&self) -> bool {
        self.body == CAPTCHA_MISMATCH
    }
}

pub async fn submit(
    session: &Session,
    request: &LookupRequest,
    captcha: &str,
) -> Result<FormOutcome, reqwest::Error> {
    let fields = [
        ("BienKS", request.plate.as_str()),
        ("Xe", request.vehicle_type.code()),
        ("captcha", captcha),
        ("ipClient", CLIENT_IP),
        ("cUrl", FROM_URL),
    ];
    let body = session.post_form(session.form_url(), &fields).await?;
    Ok(FormOutcome { body })
}
