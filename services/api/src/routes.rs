use crate::infra::{AppState, StateStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use homefinder::listings::{listing_router, ListingService};
use homefinder::mortgage::{AmortizationPeriod, MortgageBreakdown, MortgageEstimate, MortgageInputs};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Missing fields fall back to the calculator defaults.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MortgageRequest {
    #[serde(default)]
    pub(crate) home_price: Option<f64>,
    #[serde(default)]
    pub(crate) down_payment: Option<f64>,
    #[serde(default)]
    pub(crate) annual_rate_percent: Option<f64>,
    #[serde(default)]
    pub(crate) amortization_years: Option<u32>,
}

impl MortgageRequest {
    pub(crate) fn into_inputs(self) -> MortgageInputs {
        let defaults = MortgageInputs::default();
        MortgageInputs {
            home_price: self.home_price.unwrap_or(defaults.home_price),
            down_payment: self.down_payment.unwrap_or(defaults.down_payment),
            annual_rate_percent: self
                .annual_rate_percent
                .unwrap_or(defaults.annual_rate_percent),
            amortization_years: self
                .amortization_years
                .unwrap_or(defaults.amortization_years),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MortgageResponse {
    pub(crate) inputs: MortgageInputs,
    pub(crate) estimate: MortgageEstimate,
    pub(crate) breakdown: MortgageBreakdown,
}

pub(crate) fn with_listing_routes(service: Arc<ListingService<StateStore>>) -> axum::Router {
    listing_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/mortgage/estimate",
            axum::routing::post(mortgage_estimate_endpoint),
        )
        .route(
            "/api/v1/mortgage/defaults",
            axum::routing::get(mortgage_defaults_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn mortgage_estimate_endpoint(
    Json(payload): Json<MortgageRequest>,
) -> Json<MortgageResponse> {
    let inputs = payload.into_inputs();
    let estimate = inputs.estimate();
    let breakdown = MortgageBreakdown::from_estimate(&inputs, estimate);

    Json(MortgageResponse {
        inputs,
        estimate,
        breakdown,
    })
}

pub(crate) async fn mortgage_defaults_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "inputs": MortgageInputs::default(),
        "amortization_years": AmortizationPeriod::ordered(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Json;
    use homefinder::config::ListingsConfig;
    use homefinder::listings::ListingCatalog;
    use homefinder::storage::MemoryStore;
    use tower::ServiceExt;

    fn service() -> Arc<ListingService<StateStore>> {
        let catalog = ListingCatalog::load(&ListingsConfig::default()).expect("seed catalog");
        Arc::new(ListingService::new(
            catalog,
            Arc::new(StateStore::Memory(MemoryStore::default())),
            3,
        ))
    }

    #[tokio::test]
    async fn composed_router_serves_listing_and_mortgage_routes() {
        let router = with_listing_routes(service());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/mortgage/estimate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "amortization_years": 30 }).to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["inputs"]["amortization_years"], 30);
        assert_eq!(body["breakdown"]["insurance_monthly"], 200.0);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/listings/3")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn mortgage_estimate_uses_defaults_for_missing_fields() {
        let Json(body) = mortgage_estimate_endpoint(Json(MortgageRequest {
            annual_rate_percent: Some(4.0),
            ..MortgageRequest::default()
        }))
        .await;

        assert_eq!(body.inputs.home_price, 800_000.0);
        assert_eq!(body.inputs.annual_rate_percent, 4.0);
        assert!(body.estimate.monthly_payment > 0.0);
        assert_eq!(body.breakdown.property_tax_monthly, 800.0);
    }

    #[tokio::test]
    async fn mortgage_estimate_zeroes_out_when_down_payment_covers_price() {
        let Json(body) = mortgage_estimate_endpoint(Json(MortgageRequest {
            home_price: Some(100_000.0),
            down_payment: Some(150_000.0),
            ..MortgageRequest::default()
        }))
        .await;

        assert_eq!(body.estimate.monthly_payment, 0.0);
        assert_eq!(body.estimate.total_interest, 0.0);
        assert_eq!(body.breakdown.mortgage_amount, -50_000.0);
    }

    #[tokio::test]
    async fn defaults_list_supported_periods() {
        let Json(body) = mortgage_defaults_endpoint().await;
        assert_eq!(body["amortization_years"], json!([15, 20, 25, 30]));
        assert_eq!(body["inputs"]["amortization_years"], 25);
    }
}
