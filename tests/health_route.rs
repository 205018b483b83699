use consultancy_api::models::ApiResponse;
use consultancy_api::routes::health::{HealthResponse, health_check};
use consultancy_api::test_support::TestRocketBuilder;
use rocket::http::Status;
use rocket::routes;

#[test]
fn health_endpoint_returns_ok() {
    let client = TestRocketBuilder::new()
        .mount_api_routes(routes![health_check])
        .blocking_client();

    let response = client.get("/api/v1/health").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let payload: ApiResponse<HealthResponse> = response.into_json().expect("valid JSON payload");
    assert!(payload.success);
    assert_eq!(payload.data.expect("data present").status, "ok");
}

#[test]
fn unknown_route_returns_enveloped_404() {
    let client = TestRocketBuilder::new()
        .mount_api_routes(routes![health_check])
        .blocking_client();

    let response = client.get("/api/v1/nope").dispatch();
    assert_eq!(response.status(), Status::NotFound);

    let payload: serde_json::Value = response.into_json().expect("valid JSON payload");
    assert_eq!(payload["success"], serde_json::json!(false));
    assert!(payload["message"].is_string());
}
