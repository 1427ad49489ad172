use crate::cancel::Cancellation;
use crate::lookup::Lookup;
use log::{error, warn};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Deserialize)]
struct ViolationQuery {
    #[serde(rename = "vehicleType")]
    vehicle_type: String,
}

/// `GET /api/traffic-violations/{plate}?vehicleType={1|2|3}`
pub fn routes(
    lookup: Arc<Lookup>,
    cancellation: Cancellation,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::get()
        .and(warp::path!("api" / "traffic-violations" / String))
        .and(warp::query::<ViolationQuery>())
        .and(warp::any().map(move || lookup.clone()))
        .and(warp::any().map(move || cancellation.clone()))
        .then(
            |plate: String,
             query: ViolationQuery,
             lookup: Arc<Lookup>,
             cancellation: Cancellation| async move {
                // Path segments arrive still percent-encoded.
                match percent_decode_str(&plate).decode_utf8() {
                    Ok(plate) => {
                        get_violations(&lookup, &plate, &query.vehicle_type, &cancellation).await
                    }
                    Err(_) => {
                        warn!("Rejecting plate {:?}: not UTF-8 once decoded", plate);
                        warp::reply::with_status(
                            warp::reply::json(&json!({ "error": "Plate is not valid UTF-8" })),
                            StatusCode::BAD_REQUEST,
                        )
                    }
                }
            },
        )
        .with(warp::cors().allow_any_origin().allow_method("GET"))
        .with(warp::log("plate_violations::api"))
}

async fn get_violations(
    lookup: &Lookup,
    plate: &str,
    vehicle_type: &str,
    cancellation: &Cancellation,
) -> warp::reply::WithStatus<warp::reply::Json> {
    match lookup.lookup(plate, vehicle_type, cancellation).await {
        Ok(violations) => warp::reply::with_status(warp::reply::json(&violations), StatusCode::OK),
        Err(e) => {
            error!("Error fetching traffic violations for plate {}: {}", plate, e);
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            warp::reply::with_status(warp::reply::json(&json!({ "error": e.to_string() })), status)
        }
    }
}
