use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{
    AllocationResult, InvestorProfile, SipInputs, SipResult, compute_allocation,
    risk_profile_label, run_sip_projection, validate_sip_inputs,
};
use crate::error::InputError;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

// Initial values of the calculator form.
pub(crate) const DEFAULT_AGE: i32 = 30;
pub(crate) const DEFAULT_RISK_TOLERANCE: i32 = 3;
pub(crate) const DEFAULT_TIME_HORIZON: i32 = 10;
pub(crate) const DEFAULT_MONTHLY_INVESTMENT: f64 = 5_000.0;
pub(crate) const DEFAULT_EXPECTED_RETURN_PERCENT: f64 = 12.0;
pub(crate) const DEFAULT_SIP_YEARS: u32 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationPayload {
    age: Option<i64>,
    #[serde(alias = "risk_tolerance", alias = "risk")]
    risk_tolerance: Option<i64>,
    #[serde(alias = "time_horizon", alias = "horizon")]
    time_horizon: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RiskProfilePayload {
    #[serde(alias = "risk_tolerance", alias = "risk")]
    risk_tolerance: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    #[serde(alias = "monthly_investment", alias = "amount")]
    monthly_investment: Option<f64>,
    #[serde(alias = "expected_return", alias = "rate")]
    expected_return: Option<f64>,
    years: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AllocationResponse {
    pub(crate) age: i32,
    pub(crate) risk_tolerance: i32,
    pub(crate) time_horizon: i32,
    pub(crate) risk_profile: &'static str,
    pub(crate) total: i32,
    pub(crate) allocation: AllocationResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskProfileResponse {
    risk_tolerance: i32,
    label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SipResponse {
    pub(crate) monthly_investment: f64,
    pub(crate) expected_return: f64,
    pub(crate) years: u32,
    #[serde(flatten)]
    pub(crate) result: SipResult,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/allocation",
            get(allocation_get_handler).post(allocation_post_handler),
        )
        .route("/api/risk-profile", get(risk_profile_handler))
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "allocation API listening");
    tracing::info!("local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn allocation_get_handler(Query(payload): Query<AllocationPayload>) -> Response {
    allocation_handler_impl(payload)
}

async fn allocation_post_handler(Json(payload): Json<AllocationPayload>) -> Response {
    allocation_handler_impl(payload)
}

fn allocation_handler_impl(payload: AllocationPayload) -> Response {
    match investor_profile_from_payload(payload) {
        Ok(profile) => json_response(StatusCode::OK, build_allocation_response(&profile)),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

async fn risk_profile_handler(Query(payload): Query<RiskProfilePayload>) -> Response {
    let risk_tolerance = match payload
        .risk_tolerance
        .map(|v| narrow("riskTolerance", v))
        .transpose()
    {
        Ok(v) => v.unwrap_or(DEFAULT_RISK_TOLERANCE),
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    json_response(
        StatusCode::OK,
        RiskProfileResponse {
            risk_tolerance,
            label: risk_profile_label(risk_tolerance),
        },
    )
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    match sip_inputs_from_payload(payload) {
        Ok(inputs) => json_response(StatusCode::OK, build_sip_response(&inputs)),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn narrow(field: &'static str, value: i64) -> Result<i32, InputError> {
    i32::try_from(value).map_err(|_| InputError::OutOfRange { field, value })
}

fn investor_profile_from_payload(payload: AllocationPayload) -> Result<InvestorProfile, InputError> {
    // Values are narrowed, never range-checked: the engine absorbs odd ages
    // and horizons through its clamps.
    Ok(InvestorProfile {
        age: payload
            .age
            .map(|v| narrow("age", v))
            .transpose()?
            .unwrap_or(DEFAULT_AGE),
        risk_tolerance: payload
            .risk_tolerance
            .map(|v| narrow("riskTolerance", v))
            .transpose()?
            .unwrap_or(DEFAULT_RISK_TOLERANCE),
        time_horizon: payload
            .time_horizon
            .map(|v| narrow("timeHorizon", v))
            .transpose()?
            .unwrap_or(DEFAULT_TIME_HORIZON),
    })
}

fn sip_inputs_from_payload(payload: SipPayload) -> Result<SipInputs, InputError> {
    let years = match payload.years {
        Some(v) => u32::try_from(v).map_err(|_| InputError::OutOfRange {
            field: "years",
            value: v,
        })?,
        None => DEFAULT_SIP_YEARS,
    };

    validate_sip_inputs(SipInputs {
        monthly_investment: payload
            .monthly_investment
            .unwrap_or(DEFAULT_MONTHLY_INVESTMENT),
        annual_return_rate: payload
            .expected_return
            .unwrap_or(DEFAULT_EXPECTED_RETURN_PERCENT)
            / 100.0,
        years,
    })
}

pub(crate) fn build_allocation_response(profile: &InvestorProfile) -> AllocationResponse {
    let allocation = compute_allocation(profile);
    AllocationResponse {
        age: profile.age,
        risk_tolerance: profile.risk_tolerance,
        time_horizon: profile.time_horizon,
        risk_profile: risk_profile_label(profile.risk_tolerance),
        total: allocation.total(),
        allocation,
    }
}

pub(crate) fn build_sip_response(inputs: &SipInputs) -> SipResponse {
    SipResponse {
        monthly_investment: inputs.monthly_investment,
        expected_return: inputs.annual_return_rate * 100.0,
        years: inputs.years,
        result: run_sip_projection(inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::fs;
    use std::path::Path;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_golden_snapshot(path: &str, actual: &str) {
        let update = matches!(
            std::env::var("UPDATE_GOLDEN").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );
        let snapshot_path = Path::new(path);

        if update {
            if let Some(parent) = snapshot_path.parent() {
                fs::create_dir_all(parent).expect("failed to create snapshot directory");
            }
            fs::write(snapshot_path, actual).expect("failed to write golden snapshot");
            return;
        }

        let expected = fs::read_to_string(snapshot_path).unwrap_or_else(|_| {
            panic!("missing golden snapshot at {path}; run with UPDATE_GOLDEN=1 to generate")
        });
        assert_eq!(
            actual, expected,
            "snapshot mismatch for {path}; run with UPDATE_GOLDEN=1 to refresh if expected"
        );
    }

    fn allocation_payload_from_json(json: &str) -> Result<InvestorProfile, String> {
        let payload = serde_json::from_str::<AllocationPayload>(json)
            .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
        investor_profile_from_payload(payload).map_err(|e| e.to_string())
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, json)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    #[test]
    fn allocation_payload_parses_web_keys() {
        let profile =
            allocation_payload_from_json(r#"{"age":35,"riskTolerance":4,"timeHorizon":15}"#)
                .expect("valid payload");
        assert_eq!(
            profile,
            InvestorProfile {
                age: 35,
                risk_tolerance: 4,
                time_horizon: 15,
            }
        );
    }

    #[test]
    fn allocation_payload_accepts_aliases_and_defaults() {
        let profile = allocation_payload_from_json(r#"{"risk_tolerance":5,"horizon":20}"#)
            .expect("valid payload");
        assert_eq!(profile.age, DEFAULT_AGE);
        assert_eq!(profile.risk_tolerance, 5);
        assert_eq!(profile.time_horizon, 20);

        let profile = allocation_payload_from_json("{}").expect("empty payload is valid");
        assert_eq!(profile.age, DEFAULT_AGE);
        assert_eq!(profile.risk_tolerance, DEFAULT_RISK_TOLERANCE);
        assert_eq!(profile.time_horizon, DEFAULT_TIME_HORIZON);
    }

    #[test]
    fn allocation_payload_keeps_out_of_domain_values() {
        let profile =
            allocation_payload_from_json(r#"{"age":-4,"riskTolerance":9,"timeHorizon":-20}"#)
                .expect("engine accepts any i32");
        assert_eq!(profile.age, -4);
        assert_eq!(profile.risk_tolerance, 9);
        assert_eq!(profile.time_horizon, -20);
    }

    #[test]
    fn allocation_payload_rejects_values_beyond_i32() {
        let err = allocation_payload_from_json(r#"{"age":5000000000}"#)
            .expect_err("must reject oversized age");
        assert!(err.contains("age"));
    }

    #[test]
    fn sip_payload_converts_percent_and_validates() {
        let payload = SipPayload {
            monthly_investment: Some(1_000.0),
            expected_return: Some(12.0),
            years: Some(5),
        };
        let inputs = sip_inputs_from_payload(payload).expect("valid payload");
        assert_approx(inputs.annual_return_rate, 0.12);
        assert_eq!(inputs.years, 5);

        let payload = SipPayload {
            years: Some(-3),
            ..SipPayload::default()
        };
        let err = sip_inputs_from_payload(payload).expect_err("must reject negative years");
        assert_eq!(
            err,
            InputError::OutOfRange {
                field: "years",
                value: -3
            }
        );
    }

    #[test]
    fn allocation_response_serialization_contains_expected_fields() {
        let response = build_allocation_response(&InvestorProfile {
            age: 40,
            risk_tolerance: 2,
            time_horizon: 12,
        });
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"riskProfile\":\"Moderately Conservative\""));
        assert!(json.contains("\"total\":100"));
        assert!(json.contains("\"assetClass\":\"Real Estate\""));
        assert!(json.contains("\"displayColor\""));
    }

    #[test]
    fn golden_snapshot_reference_allocation_json() {
        let response = build_allocation_response(&InvestorProfile {
            age: 35,
            risk_tolerance: 3,
            time_horizon: 15,
        });
        let json = format!(
            "{}\n",
            serde_json::to_string(&response).expect("response should serialize")
        );

        assert_golden_snapshot("tests/golden/allocation_reference_trace.json", &json);
    }

    #[tokio::test]
    async fn allocation_route_serves_query_requests() {
        let (status, body) =
            send(get_request("/api/allocation?age=35&riskTolerance=3&timeHorizon=15")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 100);
        assert_eq!(body["allocation"][0]["assetClass"], "Stocks");
        assert_eq!(body["allocation"][0]["percentage"], 68);
        assert_eq!(body["allocation"].as_array().map(Vec::len), Some(6));
    }

    #[tokio::test]
    async fn allocation_route_serves_json_requests() {
        let (status, body) = send(post_json(
            "/api/allocation",
            r#"{"age":80,"riskTolerance":1,"timeHorizon":1}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["riskProfile"], "Conservative");
        assert_eq!(body["allocation"][1]["assetClass"], "Bonds");
        assert_eq!(body["allocation"][1]["percentage"], 41);
    }

    #[tokio::test]
    async fn allocation_route_rejects_oversized_integers() {
        let (status, body) = send(get_request("/api/allocation?timeHorizon=99999999999")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|msg| msg.contains("timeHorizon"))
        );
    }

    #[tokio::test]
    async fn risk_profile_route_defaults_off_scale_values() {
        let (status, body) = send(get_request("/api/risk-profile?riskTolerance=7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["riskTolerance"], 7);
        assert_eq!(body["label"], "Moderate");

        let (_, body) = send(get_request("/api/risk-profile?risk=5")).await;
        assert_eq!(body["label"], "Aggressive");
    }

    #[tokio::test]
    async fn sip_route_returns_projection() {
        let (status, body) = send(post_json(
            "/api/sip",
            r#"{"monthlyInvestment":1000,"expectedReturn":0,"years":2}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["years"], 2);
        assert_eq!(body["totalValue"].as_f64(), Some(24_000.0));
        assert_eq!(body["yearly"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn sip_route_rejects_invalid_years() {
        let (status, body) = send(get_request("/api/sip?years=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "years must be between 1 and 60");
    }

    #[tokio::test]
    async fn sip_route_rejects_contribution_that_would_overflow() {
        let (status, body) = send(get_request(
            "/api/sip?monthlyInvestment=1e307&expectedReturn=100&years=60",
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "monthlyInvestment must be <= 1e12");
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let (status, body) = send(get_request("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn index_page_is_served() {
        let response = router()
            .oneshot(get_request("/"))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let html = String::from_utf8(bytes.to_vec()).expect("utf-8 page");
        assert!(html.contains("app.js"));
        assert!(html.contains("id=\"allocation-form\""));
        assert!(html.contains("id=\"sip-form\""));
    }

    #[tokio::test]
    async fn app_script_drives_both_calculators() {
        let response = router()
            .oneshot(get_request("/app.js"))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let script = String::from_utf8(bytes.to_vec()).expect("utf-8 script");
        assert!(script.contains("/api/allocation"));
        assert!(script.contains("/api/sip"));
    }
}
