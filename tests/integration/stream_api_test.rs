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
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 从SSE响应体解析出(事件名, 数据)序列，忽略注释帧
fn parse_events(body: &str) -> Vec<(String, Value)> {
    let mut events = Vec::new();
    let mut name: Option<String> = None;
    let mut data = String::new();

    for line in body.lines() {
        if let Some(rest) = line.strip_prefix("event:") {
            name = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            data.push_str(rest.trim());
        } else if line.is_empty() {
            if let Some(event_name) = name.take() {
                let value = serde_json::from_str(&data).unwrap_or(Value::Null);
                events.push((event_name, value));
            }
            data.clear();
        }
    }

    events
}

async fn sse_request(urls: &[String]) -> (StatusCode, String) {
    let body = json!({ "urls": urls, "concurrency": 3 }).to_string();
    let response = test_app()
        .oneshot(post_json("/v1/fetch?stream=1", &body))
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// 流式模式事件序列
///
/// 恰好一个meta（在所有result之前）、每URL一个result（任意顺序）、
/// 最后恰好一个done，然后连接关闭
#[tokio::test]
async fn stream_emits_meta_results_done() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": 1}))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let urls: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|p| format!("{}/{}", server.uri(), p))
        .collect();

    let (status, body) = sse_request(&urls).await;
    assert_eq!(status, StatusCode::OK);

    // The very first frame is a comment that defeats proxy buffering
    assert!(body.starts_with(": stream open"));

    let events = parse_events(&body);
    assert_eq!(events.len(), 5);

    assert_eq!(events[0].0, "meta");
    assert_eq!(events[0].1["count"], 3);
    assert_eq!(events[0].1["concurrency"], 3);

    let mut seen_urls = HashSet::new();
    for (name, data) in &events[1..4] {
        assert_eq!(name, "result");
        assert_eq!(data["ok"], true);
        seen_urls.insert(data["url"].as_str().unwrap().to_string());
    }
    assert_eq!(seen_urls, urls.iter().cloned().collect::<HashSet<_>>());

    assert_eq!(events[4].0, "done");
    assert_eq!(events[4].1["count"], 3);
}

/// 流式模式下的单URL失败作为result事件交付
#[tokio::test]
async fn stream_delivers_failures_as_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let urls = vec![format!("{}/broken", server.uri())];
    let (_status, body) = sse_request(&urls).await;

    let events = parse_events(&body);
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].0, "result");
    assert_eq!(events[1].1["ok"], false);
    assert_eq!(events[1].1["error"], "HTTP 500");
    assert_eq!(events[2].0, "done");
}

/// Accept头也能选择流式模式
#[tokio::test]
async fn accept_header_selects_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let body = json!({ "urls": [format!("{}/x", server.uri())] }).to_string();
    let request = Request::builder()
        .uri("/v1/fetch")
        .method("POST")
        .header("Content-Type", "application/json")
        .header("Accept", "text/event-stream")
        .body(Body::from(body))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
}

/// 客户端中途断开后工作协程停止认领后续URL
#[tokio::test]
async fn dropped_stream_cancels_remaining_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..6)
        .map(|i| format!("{}/{}", server.uri(), i))
        .collect();
    let body = json!({ "urls": urls, "concurrency": 1 }).to_string();

    let response = test_app()
        .oneshot(post_json("/v1/fetch?stream=1", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Read frames only until the first result arrives, then hang up
    let mut stream = response.into_body().into_data_stream();
    let mut seen = String::new();
    while let Some(chunk) = futures::StreamExt::next(&mut stream).await {
        seen.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
        if seen.contains("event: result") {
            break;
        }
    }
    drop(stream);

    // Give any in-flight worker time to observe the cancellation
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let hits = server.received_requests().await.unwrap().len();
    assert!(hits < 6, "expected remaining URLs to be skipped, got {} hits", hits);
}

/// 默认（缓冲）模式返回application/json
#[tokio::test]
async fn default_mode_is_buffered_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let body = json!({ "urls": [format!("{}/x", server.uri())] }).to_string();
    let response = test_app()
        .oneshot(post_json("/v1/fetch", &body))
        .await
        .unwrap();

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
}
