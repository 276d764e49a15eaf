#![cfg(not(coverage))]

use super::*;
use httpmock::prelude::*;
use serde_json::json;

fn reader_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "mobile": "9876543210",
        "email": format!("{}@discom.example", id),
        "employee_code": format!("EMP-{}", id),
        "agency": "Bright Agency",
        "division_code": "DIV-04",
        "discom": "NORTH",
        "pending_readings": 3,
        "total_assigned": 40,
        "completion_rate": "92%",
        "status": "active"
    })
}

#[tokio::test]
async fn request_otp_posts_discriminator_in_body_and_query() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api")
            .query_param("type", "OTP_GENERATION")
            .json_body(json!({ "reqType": "OTP_GENERATION", "supervisorId": "SUP1" }));
        then.status(200)
            .json_body(json!({ "success": true, "tempToken": "abc" }));
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let result = api.request_otp("  SUP1 ").await.unwrap();

    mock.assert();
    assert_eq!(
        result,
        OtpRequestResult::Sent {
            temp_token: "abc".into(),
            message: None
        }
    );
}

#[tokio::test]
async fn request_otp_surfaces_server_rejection() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api");
        then.status(200)
            .json_body(json!({ "success": false, "message": "Invalid ID" }));
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let result = api.request_otp("SUP1").await.unwrap();
    assert_eq!(
        result,
        OtpRequestResult::Rejected {
            message: Some("Invalid ID".into())
        }
    );
}

#[tokio::test]
async fn verify_otp_decodes_profile() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api")
            .query_param("type", "OTP_VALIDATION")
            .json_body(json!({
                "reqType": "OTP_VALIDATION",
                "supervisorId": "SUP1",
                "otp": "123456",
                "tempToken": "abc"
            }));
        then.status(200).json_body(json!({
            "success": true,
            "accessToken": "tok",
            "supervisor": { "id": "SUP1", "name": "A", "zone": "Z", "discom": "NORTH" }
        }));
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let result = api.verify_otp("SUP1", "123456", "abc").await.unwrap();

    mock.assert();
    match result {
        OtpVerifyResult::Verified {
            access_token,
            supervisor,
        } => {
            assert_eq!(access_token, "tok");
            assert_eq!(supervisor.name, "A");
            assert_eq!(supervisor.discom.as_deref(), Some("NORTH"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn fetch_meter_readers_sends_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api")
            .query_param("type", "GET_METER_READERS")
            .header("authorization", "Bearer tok")
            .json_body(json!({ "reqType": "GET_METER_READERS", "supervisorId": "SUP1" }));
        then.status(200).json_body(json!({
            "success": true,
            "meterReaders": [reader_json("MR001", "Asha"), reader_json("MR002", "Bala")],
            "summary": { "total_readers": 2, "active_readers": 2, "total_pending": 6 }
        }));
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let result = api.fetch_meter_readers("SUP1", "tok").await.unwrap();

    mock.assert();
    match result {
        FetchRecordsResult::Fetched { readers, summary } => {
            assert_eq!(readers.len(), 2);
            assert_eq!(readers[0].name, "Asha");
            assert_eq!(readers[1].employee_code, "EMP-MR002");
            assert_eq!(summary.unwrap().total_pending, 6);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn fetch_meter_readers_without_list_is_rejected() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api");
        then.status(200).json_body(json!({ "success": true }));
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let result = api.fetch_meter_readers("SUP1", "tok").await.unwrap();
    assert_eq!(result, FetchRecordsResult::Rejected { message: None });
}

#[tokio::test]
async fn html_error_page_with_failure_status_is_request_failure() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api");
        then.status(502).body("<html><body>Bad Gateway</body></html>");
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let err = api.request_otp("SUP1").await.unwrap_err();
    assert_eq!(err.code, "REQUEST_FAILED");
    assert_eq!(err.error, "HTTP 502");
}

#[tokio::test]
async fn non_json_success_body_is_invalid_response() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api");
        then.status(200).body("Warning: mysqli_connect() failed");
    });

    let api = ApiClient::new_with_base_url(server.url("/api"));
    let err = api.verify_otp("SUP1", "123456", "abc").await.unwrap_err();
    assert_eq!(err.code, "INVALID_RESPONSE");
}

#[tokio::test]
async fn transport_failure_is_request_failure() {
    let api = ApiClient::new_with_base_url("http://127.0.0.1:9/api");
    let err = api.request_otp("SUP1").await.unwrap_err();
    assert_eq!(err.code, "REQUEST_FAILED");
    assert!(err.is_transport());
}
