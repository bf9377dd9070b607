//! AWS Lambda handler for debt payoff optimization
//!
//! Accepts a loan list plus extra payment and lump sum as JSON (API Gateway
//! proxy event) and returns the full `OptimizationResult`.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use debt_payoff::loan::validate_loans;
use debt_payoff::{Loan, OptimizationResult, Optimizer, OptimizerConfig, SimulationConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Request body
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub loans: Vec<Loan>,

    #[serde(default)]
    pub extra_payment: f64,

    #[serde(default)]
    pub lump_sum: f64,

    /// Missing fields take their defaults
    #[serde(default)]
    pub config: Option<SimulationConfig>,

    /// Override the 1000 indifference band on interest saved
    #[serde(default)]
    pub recommendation_threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    #[serde(flatten)]
    pub result: OptimizationResult,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn response(status_code: i64, body: Option<String>) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code,
        body: body.map(Body::Text),
        ..Default::default()
    };
    for (name, value) in [
        ("content-type", "application/json"),
        ("access-control-allow-origin", "*"),
        ("access-control-allow-methods", "POST, OPTIONS"),
        ("access-control-allow-headers", "Content-Type"),
    ] {
        if let Ok(value) = value.parse() {
            response.headers.insert(name, value);
        }
    }
    response
}

fn error_response(status_code: i64, message: impl Into<String>) -> ApiGatewayProxyResponse {
    let body = serde_json::to_string(&ErrorBody { error: message.into() })
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    response(status_code, Some(body))
}

/// Parse and validate the request, then run the optimizer
fn optimize(body: &str) -> Result<OptimizeResponse, String> {
    let request: OptimizeRequest =
        serde_json::from_str(body).map_err(|e| format!("Invalid request: {}", e))?;

    validate_loans(&request.loans).map_err(|e| e.to_string())?;
    if !(request.extra_payment >= 0.0) || !(request.lump_sum >= 0.0) {
        return Err("extra_payment and lump_sum must be non-negative".to_string());
    }

    let mut config = OptimizerConfig::new(request.config.unwrap_or_default());
    if let Some(threshold) = request.recommendation_threshold {
        config = config.with_recommendation_threshold(threshold);
    }
    config.validate().map_err(|e| e.to_string())?;

    let start = Instant::now();
    let result = Optimizer::new(config).optimize_debt_payoff(
        &request.loans,
        request.extra_payment,
        request.lump_sum,
    );

    Ok(OptimizeResponse {
        result,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

async fn handler(event: LambdaEvent<ApiGatewayProxyRequest>) -> Result<ApiGatewayProxyResponse, Error> {
    let request = event.payload;

    // CORS preflight
    if request.http_method.as_str() == "OPTIONS" {
        return Ok(response(200, None));
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());

    match optimize(&body) {
        Ok(output) => match serde_json::to_string(&output) {
            Ok(json) => Ok(response(200, Some(json))),
            Err(e) => Ok(error_response(500, format!("Failed to serialize result: {}", e))),
        },
        Err(message) => {
            log::warn!("Rejected request: {}", message);
            Ok(error_response(400, message))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "loans": [
            {"id": "auto", "name": "Car", "loan_type": "auto", "current_balance": 22000,
             "interest_rate": 4.5, "monthly_payment": 520, "term_months": 48},
            {"id": "personal", "name": "Personal", "loan_type": "personal", "current_balance": 12000,
             "interest_rate": 7.2, "monthly_payment": 450, "term_months": 36}
        ],
        "extra_payment": 300,
        "config": {"start_date": "2025-01-01"}
    }"#;

    #[test]
    fn test_optimize_request() {
        let output = optimize(BODY).unwrap();
        assert_eq!(output.result.strategies.len(), 3);
        assert_eq!(output.result.strategies[0].per_debt_details.len(), 2);

        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("recommended_strategy").is_some());
        assert!(json.get("execution_time_ms").is_some());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let body = BODY.replace(r#""id": "personal""#, r#""id": "auto""#);
        let err = optimize(&body).unwrap_err();
        assert!(err.contains("Duplicate loan id"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(optimize("{").unwrap_err().starts_with("Invalid request"));
        assert!(optimize("{}").is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let response = error_response(400, "bad");
        assert_eq!(response.status_code, 400);
        match response.body {
            Some(Body::Text(text)) => assert_eq!(text, r#"{"error":"bad"}"#),
            other => panic!("unexpected body {:?}", other),
        }
        assert!(response.headers.contains_key("content-type"));
    }
}
