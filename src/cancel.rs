use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Fires a `Cancellation`. Dropping it without calling `cancel` never interrupts anything.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Interrupted;

pub fn pair() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx: Some(rx) })
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace succeeds even when no receiver is currently alive.
        self.tx.send_replace(true);
    }
}

impl Cancellation {
    pub fn never() -> Cancellation {
        Cancellation { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map_or(false, |rx| *rx.borrow())
    }

    async fn cancelled(&self) {
        let mut rx = match &self.rx {
            Some(rx) => rx.clone(),
            None => return futures::future::pending().await,
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without firing.
                return futures::future::pending().await;
            }
        }
    }

    /// Waits for `duration`, failing with `Interrupted` if cancelled first.
    pub async fn delay(&self, duration: Duration) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            return Err(Interrupted);
        }
        tokio::select! {
            _ = sleep(duration) => Ok(()),
            _ = self.cancelled() => Err(Interrupted),
        }
    }
}
