use std::time::Duration;

use monitor_core::{FileBlob, JobForm, JobParameters, ProgressSnapshot};
use monitor_engine::{ApiSettings, FailureKind, JobApi, ReqwestJobApi, StartReply};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestJobApi {
    ReqwestJobApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("valid settings")
}

fn url_params(url: &str) -> JobParameters {
    JobForm {
        input_url: url.to_string(),
        ..JobForm::default()
    }
    .validate()
    .expect("valid form")
}

async fn mount_started(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "started"})))
        .expect(1)
        .mount(server)
        .await;
}

async fn only_request_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    String::from_utf8_lossy(&requests[0].body).into_owned()
}

#[tokio::test]
async fn start_with_url_sends_url_field_only() {
    let server = MockServer::start().await;
    mount_started(&server).await;

    let reply = api_for(&server)
        .start(&url_params("http://x/a.mp3"))
        .await
        .expect("start ok");
    assert_eq!(reply, StartReply::Started);

    let body = only_request_body(&server).await;
    assert!(body.contains("name=\"input_url\""));
    assert!(body.contains("http://x/a.mp3"));
    assert!(!body.contains("name=\"input_file\""));
    for field in [
        "base_path",
        "ueda_mode",
        "transcribe_prompt",
        "summarize_prompt",
        "categorize_prompt",
        "split_method",
        "split_value",
        "transcribe_model",
    ] {
        assert!(body.contains(&format!("name=\"{field}\"")), "missing {field}");
    }
}

#[tokio::test]
async fn start_with_file_sends_file_part_only() {
    let server = MockServer::start().await;
    mount_started(&server).await;

    let params = JobForm {
        input_file: Some(FileBlob::new("talk.wav", b"RIFFdata".to_vec())),
        ueda_mode: true,
        ..JobForm::default()
    }
    .validate()
    .unwrap();
    api_for(&server).start(&params).await.expect("start ok");

    let body = only_request_body(&server).await;
    assert!(body.contains("name=\"input_file\"; filename=\"talk.wav\""));
    assert!(body.contains("RIFFdata"));
    assert!(!body.contains("name=\"input_url\""));
    assert!(body.contains("true"));
}

#[tokio::test]
async fn start_refusal_is_returned_as_raw_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Process already running"})),
        )
        .mount(&server)
        .await;

    let reply = api_for(&server)
        .start(&url_params("http://x/a.mp3"))
        .await
        .expect("json body");
    assert_eq!(
        reply,
        StartReply::Other(r#"{"error":"Process already running"}"#.to_string())
    );
}

#[tokio::test]
async fn start_with_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .start(&url_params("http://x/a.mp3"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn progress_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"progress": 45, "running": true})))
        .mount(&server)
        .await;

    let snapshot = api_for(&server).progress().await.expect("progress ok");
    assert_eq!(
        snapshot,
        ProgressSnapshot {
            percentage: 45,
            running: Some(true)
        }
    );
}

#[tokio::test]
async fn progress_with_missing_fields_is_explicit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let snapshot = api_for(&server).progress().await.expect("progress ok");
    assert_eq!(snapshot.percentage, 0);
    assert_eq!(snapshot.running, None);
}

#[tokio::test]
async fn progress_error_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).progress().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn progress_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"progress": 1, "running": true})),
        )
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    })
    .unwrap();

    let err = api.progress().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn logs_are_returned_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"logs": ["[INFO] start", "[INFO] transcribe"]})),
        )
        .mount(&server)
        .await;

    let logs = api_for(&server).logs().await.expect("logs ok");
    assert_eq!(logs, vec!["[INFO] start", "[INFO] transcribe"]);
}

#[tokio::test]
async fn logs_without_list_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lines": []})))
        .mount(&server)
        .await;

    let err = api_for(&server).logs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn result_body_is_returned_verbatim() {
    let server = MockServer::start().await;
    let artifact = "{\n    \"summary\": \"要約\"\n}";
    Mock::given(method("GET"))
        .and(path("/result"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(artifact, "application/json"))
        .mount(&server)
        .await;

    let text = api_for(&server).result().await.expect("result ok");
    assert_eq!(text, artifact);
}

#[tokio::test]
async fn missing_result_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "No result"})))
        .mount(&server)
        .await;

    let err = api_for(&server).result().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn oversized_result_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(ApiSettings {
        base_url: server.uri(),
        max_result_bytes: 10,
        ..ApiSettings::default()
    })
    .unwrap();

    let err = api.result().await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moziokosi/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"progress": 5, "running": true})))
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(ApiSettings {
        base_url: format!("{}/moziokosi", server.uri()),
        ..ApiSettings::default()
    })
    .unwrap();
    assert!(api.base_url().as_str().ends_with("/moziokosi/"));

    let snapshot = api.progress().await.expect("progress ok");
    assert_eq!(snapshot.percentage, 5);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestJobApi::new(ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
