// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::helpers::{post_json, test_app};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// 缓冲模式下结果顺序与输入顺序一致
///
/// 第一个URL被注入最大延迟，完成顺序与输入顺序相反
#[tokio::test]
async fn buffered_results_preserve_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "a"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "b"}))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "c"})))
        .mount(&server)
        .await;

    let urls = [
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        format!("{}/c", server.uri()),
    ];
    let body = json!({ "urls": urls, "concurrency": 3 }).to_string();

    let response = test_app()
        .oneshot(post_json("/v1/fetch", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(response).await;
    assert_eq!(payload["count"], 3);

    let results = payload["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for (i, url) in urls.iter().enumerate() {
        assert_eq!(results[i]["url"], *url);
        assert_eq!(results[i]["ok"], true);
    }
    assert_eq!(results[0]["json"]["name"], "a");
    assert_eq!(results[2]["json"]["name"], "c");
}

/// 响应信封回显钳制后的生效配置
#[tokio::test]
async fn envelope_reports_clamped_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let urls = [
        format!("{}/1", server.uri()),
        format!("{}/2", server.uri()),
        format!("{}/3", server.uri()),
    ];
    let body = json!({ "urls": urls, "timeoutMs": 999_999, "concurrency": 500 }).to_string();

    let response = test_app()
        .oneshot(post_json("/v1/fetch", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(response).await;
    assert_eq!(payload["timeoutMs"], 30_000);
    assert_eq!(payload["concurrency"], 3);
}

/// 上游404与非JSON响应体作为数据报告，不影响整体批次
#[tokio::test]
async fn per_url_failures_are_isolated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fine": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html><head><title>Gone | Portal</title></head></html>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .mount(&server)
        .await;

    let urls = [
        format!("{}/ok", server.uri()),
        format!("{}/missing", server.uri()),
        format!("{}/text", server.uri()),
    ];
    let body = json!({ "urls": urls }).to_string();

    let response = test_app()
        .oneshot(post_json("/v1/fetch", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(response).await;
    let results = payload["results"].as_array().unwrap();

    assert_eq!(results[0]["ok"], true);

    assert_eq!(results[1]["ok"], false);
    assert_eq!(results[1]["status"], 404);
    assert_eq!(results[1]["error"], "HTTP 404");
    assert_eq!(results[1]["title"], "Gone");

    assert_eq!(results[2]["ok"], false);
    assert_eq!(results[2]["status"], 200);
    assert_eq!(results[2]["error"], "Response is not valid JSON");
}

/// 超时的URL产生"Timeout"错误且不携带状态码
#[tokio::test]
async fn timed_out_url_has_no_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let body = json!({ "urls": [format!("{}/slow", server.uri())], "timeoutMs": 1000 }).to_string();

    let response = test_app()
        .oneshot(post_json("/v1/fetch", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = body_json(response).await;
    let result = &payload["results"][0];
    assert_eq!(result["ok"], false);
    assert_eq!(result["error"], "Timeout");
    assert!(result.get("status").is_none());
}

/// 无效URL条目在结果中隔离报告，不发起网络调用
#[tokio::test]
async fn invalid_url_entries_fail_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let urls = [
        format!("{}/fine", server.uri()),
        "ftp://example.com/file".to_string(),
    ];
    let body = json!({ "urls": urls }).to_string();

    let response = test_app()
        .oneshot(post_json("/v1/fetch", &body))
        .await
        .unwrap();

    let payload = body_json(response).await;
    let results = payload["results"].as_array().unwrap();
    assert_eq!(results[0]["ok"], true);
    assert_eq!(results[1]["ok"], false);
    assert_eq!(results[1]["error"], "Unsupported URL scheme");
}

/// 语法错误的请求体与缺失urls的请求体产生不同的400载荷
#[tokio::test]
async fn malformed_body_and_missing_urls_are_distinct_400s() {
    let response = test_app()
        .oneshot(post_json("/v1/fetch", "{ not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Invalid JSON body");

    let response = test_app()
        .oneshot(post_json("/v1/fetch", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Missing urls");

    let response = test_app()
        .oneshot(post_json("/v1/fetch", r#"{"urls": []}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Missing urls");

    // Non-string entries are discarded; nothing is left to fetch
    let response = test_app()
        .oneshot(post_json("/v1/fetch", r#"{"urls": [42, null, {}]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Missing urls");
}

/// urls字段不是数组时视同缺失；调优字段类型错误单独报告
#[tokio::test]
async fn wrongly_typed_fields_get_accurate_400s() {
    // A non-array urls value is not a type error, just unusable
    let response = test_app()
        .oneshot(post_json("/v1/fetch", r#"{"urls": 42}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Missing urls");

    // A valid urls list with a wrongly typed tuning field must not
    // be reported as a missing urls problem
    let response = test_app()
        .oneshot(post_json(
            "/v1/fetch",
            r#"{"urls": ["http://example.com"], "timeoutMs": "soon"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Invalid request fields");
}
