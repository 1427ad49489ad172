use crate::error::CaptchaError;
use crate::ocr::Ocr;
use crate::session::Session;
use log::debug;
use std::sync::Arc;

/// Fetches a fresh captcha within a session and reads it with OCR.
pub struct CaptchaSolver {
    ocr: Arc<dyn Ocr>,
}

impl CaptchaSolver {
    pub fn new(ocr: Arc<dyn Ocr>) -> CaptchaSolver {
        CaptchaSolver { ocr }
    }

    /// Every call issues a new captcha; the site only honours the most recent one.
    pub async fn solve(&self, session: &Session) -> Result<String, CaptchaError> {
        let bytes = session
            .get_bytes(session.captcha_url())
            .await
            .map_err(CaptchaError::FetchFailed)?;
        debug!("Fetched captcha image of {} bytes", bytes.len());
        let image = image::load_from_memory(&bytes).map_err(CaptchaError::DecodeFailed)?;
        let text = self.ocr.recognize(&image).await?;
        Ok(text.trim().to_string())
    }
}
