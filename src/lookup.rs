use crate::cancel::Cancellation;
use crate::captcha::CaptchaSolver;
use crate::config::Config;
use crate::error::LookupError;
use crate::extract;
use crate::ocr::Ocr;
use crate::retry::{self, RetryPolicy};
use crate::session::Session;
use crate::types::{LookupRequest, ViolationRecord};
use log::info;
use std::sync::Arc;

const NO_RESULTS: &str = "Không tìm thấy kết quả !";

/// Looks up the recorded violations of a plate on the traffic police site.
///
/// Holds no per-lookup state: every call opens its own `Session` and drops
/// it on return, so concurrent lookups never share cookies.
pub struct Lookup {
    config: Config,
    solver: CaptchaSolver,
    policy: RetryPolicy,
}

impl Lookup {
    pub fn new(config: Config, ocr: Arc<dyn Ocr>) -> Lookup {
        let policy = RetryPolicy {
            max_retries: config.max_retries,
            processing_delay: config.processing_delay,
        };
        Lookup {
            config,
            solver: CaptchaSolver::new(ocr),
            policy,
        }
    }

    pub async fn lookup(
        &self,
        plate: &str,
        vehicle_type: &str,
        cancellation: &Cancellation,
    ) -> Result<Vec<ViolationRecord>, LookupError> {
        let request = LookupRequest::new(plate, vehicle_type)?;
        info!("Fetching traffic violations for plate: {}", request.plate);

        let session = Session::open(&self.config).map_err(LookupError::Session)?;
        retry::submit_until_accepted(&session, &self.solver, &request, &self.policy, cancellation)
            .await?;

        let html = session.get_text(session.results_url(&request)).await?;
        if html.contains(NO_RESULTS) {
            info!("No violations found for plate: {}", request.plate);
            return Ok(vec![]);
        }
        Ok(extract::extract(&html))
    }
}
