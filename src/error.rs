use failure::Fail;

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum ValidationError {
    #[fail(display = "Invalid vehicle type {:?}, must be 1, 2 or 3", _0)]
    InvalidVehicleType(String),
    #[fail(display = "Plate must not be empty")]
    EmptyPlate,
}

#[derive(Debug, Fail)]
pub enum OcrError {
    #[fail(display = "Unable to encode image for OCR: {}", _0)]
    Encode(#[cause] image::ImageError),
    #[fail(display = "Unable to run OCR engine: {}", _0)]
    Spawn(#[cause] std::io::Error),
    #[fail(display = "OCR engine exited with {}: {}", status, stderr)]
    Engine { status: String, stderr: String },
    #[fail(display = "OCR engine produced non UTF-8 output")]
    InvalidOutput,
}

#[derive(Debug, Fail)]
pub enum CaptchaError {
    #[fail(display = "Failed to fetch captcha image: {}", _0)]
    FetchFailed(#[cause] reqwest::Error),
    #[fail(display = "Failed to decode captcha image: {}", _0)]
    DecodeFailed(#[cause] image::ImageError),
    #[fail(display = "Failed to process captcha: {}", _0)]
    OcrFailed(#[cause] OcrError),
}

/// Every way a single lookup can fail. No partial results accompany any of these.
#[derive(Debug, Fail)]
pub enum LookupError {
    #[fail(display = "{}", _0)]
    Validation(#[cause] ValidationError),
    #[fail(display = "Unable to open HTTP session: {}", _0)]
    Session(#[cause] reqwest::Error),
    #[fail(display = "{}", _0)]
    Captcha(#[cause] CaptchaError),
    #[fail(
        display = "Maximum retry attempts reached after {} submissions, could not verify captcha",
        attempts
    )]
    RetriesExhausted { attempts: u32 },
    #[fail(display = "Request to lookup site failed: {}", _0)]
    Io(#[cause] reqwest::Error),
    #[fail(display = "Lookup interrupted while waiting for results")]
    Interrupted,
}

impl LookupError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, LookupError::Validation(_))
    }
}

impl From<ValidationError> for LookupError {
    fn from(e: ValidationError) -> Self {
        LookupError::Validation(e)
    }
}

impl From<CaptchaError> for LookupError {
    fn from(e: CaptchaError) -> Self {
        LookupError::Captcha(e)
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Io(e)
    }
}

impl From<OcrError> for CaptchaError {
    fn from(e: OcrError) -> Self {
        CaptchaError::OcrFailed(e)
    }
}
