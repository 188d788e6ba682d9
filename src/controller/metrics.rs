use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::refresh::{current_snapshot, Freshness},
    types::MetricsSnapshot,
};

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub message: &'static str,
    pub data: MetricsSnapshot,
}

pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    let (data, freshness) = current_snapshot(&state).await?;

    let message = match freshness {
        Freshness::Fresh => "Collection metrics fetched successfully.",
        Freshness::Stale => {
            "Upstream refresh failed; serving last cached metrics."
        },
    };

    Ok(HttpResponse::Ok().json(MetricsResponse { message, data }))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "message": "Only GET or POST requests allowed"
    }))
}
