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

use axum::{
    body::Body,
    extract::{Extension, Query},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::settings::Settings;
use crate::utils::validators::validate_fetch_url;

/// 图片代理查询参数
#[derive(Debug, Deserialize)]
pub struct ImageProxyQuery {
    /// 要代理的图片URL
    pub url: Option<String>,
}

/// 图片代理端点
///
/// 服务端抓取任意http/https图片并按原始Content-Type流式回传，
/// 供前端跨域安全地嵌入（如PDF渲染）。
pub async fn image_proxy(
    Extension(settings): Extension<Arc<Settings>>,
    Query(query): Query<ImageProxyQuery>,
) -> Response {
    let url = match query.url {
        Some(url) if !url.trim().is_empty() => url,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Missing url"
                })),
            )
                .into_response();
        }
    };

    if let Err(e) = validate_fetch_url(&url) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            })),
        )
            .into_response();
    }

    // Each request gets a fresh client so the proxy timeout applies per call
    let client = match reqwest::Client::builder()
        .user_agent(settings.fetch.user_agent.clone())
        .timeout(Duration::from_millis(settings.image_proxy.timeout_ms))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build proxy client: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Image proxy fetch failed for {}: {}", url, e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Upstream fetch failed"
                })),
            )
                .into_response();
        }
    };

    if !response.status().is_success() {
        return (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "success": false,
                "error": format!("Upstream returned HTTP {}", response.status().as_u16())
            })),
        )
            .into_response();
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(response.bytes_stream()),
    )
        .into_response()
}
