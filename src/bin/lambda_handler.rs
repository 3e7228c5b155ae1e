//! AWS Lambda handler for deal analysis
//!
//! Routes:
//!   POST /CalcPrecentageOfARV  70% rule screen
//!   POST /analyzeDeal          BRRRR analysis
//!   POST /analyzeFlip          fix-and-flip analysis
//!
//! Rejected input returns 400 with `{"error", "violations": [{field, reason}]}`.
//! Supports Lambda Function URLs for direct HTTP access.

use deal_analyzer::error::DealError;
use deal_analyzer::wire::{AcquisitionRequest, AnalyzeDealRequest, AnalyzeFlipRequest, ErrorBody};
use deal_analyzer::AnalysisConfig;
use lambda_http::{http::StatusCode, run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

fn config() -> &'static AnalysisConfig {
    CONFIG.get_or_init(AnalysisConfig::from_env)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    let text = serde_json::to_string(body)?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(text))?)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Result<Response<Body>, Error> {
    json_response(status, &ErrorBody::message(message))
}

fn body_text(event: &Request) -> String {
    match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    }
}

/// Parse, analyze, and map the outcome onto an HTTP response
fn respond<Req, Resp, F>(body: &str, analyze: F) -> Result<Response<Body>, Error>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: FnOnce(&Req, &AnalysisConfig) -> Result<Resp, DealError>,
{
    let request: Req = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)),
    };

    match analyze(&request, config()) {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(e) => json_response(StatusCode::BAD_REQUEST, &ErrorBody::from(&e)),
    }
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    if event.method().as_str() != "POST" {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Only POST is supported");
    }

    let path = event.uri().path().trim_end_matches('/').to_string();
    let body = body_text(&event);
    info!("{} {}", event.method(), path);

    match path.rsplit('/').next().unwrap_or_default() {
        "CalcPrecentageOfARV" => respond(&body, AcquisitionRequest::analyze),
        "analyzeDeal" => respond(&body, AnalyzeDealRequest::analyze),
        "analyzeFlip" => respond(&body, AnalyzeFlipRequest::analyze),
        other => {
            warn!("No route for {:?}", other);
            error_response(StatusCode::NOT_FOUND, format!("Unknown route: {}", path))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
