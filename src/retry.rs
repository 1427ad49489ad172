use crate::cancel::Cancellation;
use crate::captcha::CaptchaSolver;
use crate::error::LookupError;
use crate::form;
use crate::session::Session;
use crate::types::LookupRequest;
use log::{info, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt; the total number of submissions is `max_retries + 1`.
    pub max_retries: u32,
    /// How long the site needs to process an accepted submission.
    pub processing_delay: Duration,
}

/// Solves captchas and submits the form within `session` until the site
/// accepts one, then waits out the processing delay.
///
/// Returns the number of submissions made. A rejected captcha is retried
/// with a fresh one in the same session; any other failure ends the lookup.
pub async fn submit_until_accepted(
    session: &Session,
    solver: &CaptchaSolver,
    request: &LookupRequest,
    policy: &RetryPolicy,
    cancellation: &Cancellation,
) -> Result<u32, LookupError> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let captcha = solver.solve(session).await?;
        let outcome = form::submit(session, request, &captcha).await?;
        if !outcome.is_captcha_mismatch() {
            info!(
                "Form accepted for plate {} after {} attempt(s)",
                request.plate, attempts
            );
            break;
        }
        if attempts > policy.max_retries {
            warn!(
                "Captcha rejected {} times for plate {}, giving up",
                attempts, request.plate
            );
            return Err(LookupError::RetriesExhausted { attempts });
        }
        warn!(
            "Captcha verification failed: {:?}. Retrying... ({}/{})",
            captcha, attempts, policy.max_retries
        );
    }

    cancellation
        .delay(policy.processing_delay)
        .await
        .map_err(|_| LookupError::Interrupted)?;
    Ok(attempts)
}
