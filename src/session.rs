use crate::config::Config;
use crate::types::LookupRequest;
use bytes::Bytes;
use log::debug;
use reqwest::Client;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const CAPTCHA_PATH: &str = "/lib/captcha/captcha.class.php";
const FORM_PATH: &str = "/?mod=contact&task=tracuu_post&ajax";
const RESULTS_PATH: &str = "/tra-cuu-phuong-tien-vi-pham.html";

/// A cookie-bearing HTTP context owned by exactly one lookup.
///
/// The site pairs each captcha it issues with the next form submission
/// through the session cookie, so the captcha fetch, every submission and
/// the results fetch must all go through the same `Session`. It is neither
/// `Clone` nor shared; dropping it releases the connection pool and cookie jar.
pub struct Session {
    client: Client,
    base_url: Url,
}

impl Session {
    pub fn open(config: &Config) -> Result<Session, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .cookie_store(true)
            .build()?;
        Ok(Session {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn captcha_url(&self) -> Url {
        self.endpoint(CAPTCHA_PATH)
    }

    pub fn form_url(&self) -> Url {
        self.endpoint(FORM_PATH)
    }

    pub fn results_url(&self, request: &LookupRequest) -> Url {
        let mut url = self.endpoint(RESULTS_PATH);
        url.query_pairs_mut()
            .append_pair("LoaiXe", request.vehicle_type.code())
            .append_pair("BienKiemSoat", &request.plate);
        url
    }

    pub async fn get_bytes(&self, url: Url) -> Result<Bytes, reqwest::Error> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await
    }

    pub async fn get_text(&self, url: Url) -> Result<String, reqwest::Error> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Posts a urlencoded form and returns the body whatever the status,
    /// since the site answers in-band.
    pub async fn post_form(
        &self,
        url: Url,
        fields: &[(&str, &str)],
    ) -> Result<String, reqwest::Error> {
        debug!("POST {}", url);
        self.client.post(url).form(fields).send().await?.text().await
    }

    fn endpoint(&self, path_and_query: &str) -> Url {
        let mut url = self.base_url.clone();
        match path_and_query.find('?') {
            Some(idx) => {
                url.set_path(&path_and_query[..idx]);
                url.set_query(Some(&path_and_query[idx + 1..]));
            }
            None => {
                url.set_path(path_and_query);
                url.set_query(None);
            }
        }
        url
    }
}
