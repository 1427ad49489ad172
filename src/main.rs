mod api;
mod cancel;
mod captcha;
mod config;
mod error;
mod extract;
mod form;
mod lookup;
mod ocr;
mod retry;
mod session;
#[cfg(test)]
mod testsite;
mod types;

use crate::config::Config;
use crate::lookup::Lookup;
use crate::ocr::TesseractCli;
use env_logger::Env;
use log::{error, info};
use std::process;
use std::sync::Arc;

#[macro_use]
extern crate failure;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting plate-violations");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    info!("Looking up violations on {}", config.base_url);

    let port = config.port;
    let ocr = Arc::new(TesseractCli::new(config.tesseract.clone()));
    let lookup = Arc::new(Lookup::new(config, ocr));
    let (cancel_handle, cancellation) = cancel::pair();

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for shutdown signal: {}", e);
            futures::future::pending::<()>().await;
        }
        info!("Shutting down, interrupting pending lookups");
        cancel_handle.cancel();
    };
    match warp::serve(api::routes(lookup, cancellation))
        .try_bind_with_graceful_shutdown(([0, 0, 0, 0], port), shutdown)
    {
        Ok((addr, server)) => {
            info!("Listening on {}", addr);
            server.await;
        }
        Err(e) => error!("Unable to bind port {}: {}", port, e),
    }
    info!("Exiting main");
}
