use crate::app::requests::PriceQuery;
use crate::core::engine::PriceEngine;
use crate::domain::model::{PriceRequest, PriceResult};
use crate::utils::error::{InvalidValue, PriceError};
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::Request,
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

pub const PRICE_PATH: &str = "/api/v1/delivery-order-price";

#[derive(Clone)]
pub struct AppState {
    pub engine: PriceEngine,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(PRICE_PATH, get(delivery_order_price))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = request.uri().path(),
    )
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dopc",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Delivery order price handler
pub async fn delivery_order_price(
    State(state): State<AppState>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PriceResult>, PriceError> {
    let Query(query) = query.map_err(|e| InvalidValue::new("query", "", e.body_text()))?;
    let request = PriceRequest::try_from(query)?;

    let result = state.engine.compute_price(&request).await?;
    Ok(Json(result))
}
