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

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::debug;

/// 候选环境变量名，按固定优先级排列
pub const MAP_KEY_ENV_CANDIDATES: [&str; 6] = [
    "KAKAO_MAP_API_KEY",
    "NEXT_PUBLIC_KAKAO_MAP_API_KEY",
    "KAKAO_JAVASCRIPT_KEY",
    "NEXT_PUBLIC_KAKAO_JAVASCRIPT_KEY",
    "KAKAO_API_KEY",
    "MAP_API_KEY",
];

/// 地图API密钥解析端点
///
/// 按固定优先级尝试多个环境变量名，返回第一个非空值。
pub async fn map_key() -> impl IntoResponse {
    for name in MAP_KEY_ENV_CANDIDATES {
        if let Ok(value) = std::env::var(name) {
            if !value.trim().is_empty() {
                debug!("Resolved map API key from {}", name);
                return (
                    StatusCode::OK,
                    Json(serde_json::json!({
                        "success": true,
                        "key": value
                    })),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "Map API key is not configured"
        })),
    )
        .into_response()
}
