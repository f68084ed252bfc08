//! HTTP endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mizan::{CACHE_CONTROL, CheckResponse, ErrorResponse, Screener};
use mizan_data::edgar::{Pacer, Transport};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CheckParams {
    ticker: Option<String>,
}

/// Routes `/api/check` and `/health` over a shared screener.
pub(crate) fn build_router<T, P>(screener: Screener<T, P>) -> Router
where
    T: Transport + 'static,
    P: Pacer + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/check", get(check::<T, P>))
        .with_state(Arc::new(screener))
}

/// Serves until the process is stopped.
pub(crate) async fn serve<T, P>(
    addr: SocketAddr,
    screener: Screener<T, P>,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: Transport + 'static,
    P: Pacer + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, build_router(screener)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mizan",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn check<T: Transport, P: Pacer>(
    State(screener): State<Arc<Screener<T, P>>>,
    params: Result<Query<CheckParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let Some(ticker) = params.ticker else {
        return error_response(StatusCode::BAD_REQUEST, "Missing ticker");
    };

    match screener.screen(&ticker).await {
        Ok(screening) => (
            [(header::CACHE_CONTROL, CACHE_CONTROL)],
            Json(CheckResponse::from(&screening)),
        )
            .into_response(),
        Err(e) if e.is_invalid_input() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            warn!(%ticker, error = %e, "check failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use mizan::ScreeningPolicy;
    use mizan_data::edgar::facts::company_facts_url;
    use mizan_data::edgar::mock::{RecordingPacer, StaticTransport};
    use mizan_data::edgar::resolver::TICKER_TXT_URL;
    use mizan_data::edgar::submissions::submissions_url;
    use mizan_data::edgar::{Cik, ClientConfig, RegistryClient};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const CIK: Cik = Cik::new(789019);

    fn facts(assets: f64) -> Value {
        let fact = |val: f64| {
            json!({"units": {"USD": [{"end": "2024-06-30", "val": val, "form": "10-K"}]}})
        };
        json!({"facts": {"us-gaap": {
            "Assets": fact(assets),
            "Liabilities": fact(200.0),
            "CashAndCashEquivalentsAtCarryingValue": fact(100.0),
            "Revenues": fact(500.0),
            "InterestIncome": fact(10.0)
        }}})
    }

    fn app(transport: StaticTransport) -> Router {
        let client = RegistryClient::with_parts(
            transport,
            RecordingPacer::default(),
            ClientConfig::default(),
        );
        build_router(Screener::new(client, ScreeningPolicy::default()))
    }

    fn registry(assets: f64) -> StaticTransport {
        StaticTransport::new()
            .with_text(TICKER_TXT_URL, "msft\t789019\n")
            .with_json(
                &submissions_url(CIK),
                &json!({
                    "name": "MICROSOFT CORP",
                    "sic": "7372",
                    "sicDescription": "Services-Prepackaged Software"
                }),
            )
            .with_json(&company_facts_url(CIK), &facts(assets))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cache, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_check_success() {
        let (status, cache, body) = get(app(registry(1000.0)), "/api/check?ticker=msft").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("public, max-age=900"));
        assert_eq!(body["ticker"], "MSFT");
        assert_eq!(body["cik"], 789019);
        assert_eq!(body["status"], "Needs Purification");
        assert_eq!(body["note"], "Purification = 2.00% of gains.");
        assert!(body["debtToAssets"].is_number());
    }

    #[tokio::test]
    async fn test_missing_ticker() {
        let (status, cache, body) = get(app(StaticTransport::new()), "/api/check").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(cache, None);
        assert_eq!(body, json!({"error": "Missing ticker"}));
    }

    #[tokio::test]
    async fn test_blank_ticker() {
        let (status, _, body) = get(app(StaticTransport::new()), "/api/check?ticker=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing ticker"}));
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_error() {
        let (status, cache, body) =
            get(app(StaticTransport::new()), "/api/check?ticker=a&ticker=b").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(cache, None);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("duplicate field"), "{error}");
    }

    #[tokio::test]
    async fn test_insufficient_data_is_server_error() {
        let (status, cache, body) = get(app(registry(0.0)), "/api/check?ticker=MSFT").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cache, None);
        assert_eq!(
            body,
            json!({"error": "Insufficient SEC data for MSFT (Assets or Revenue)."})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get(app(StaticTransport::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}
