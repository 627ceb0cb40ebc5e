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
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::infrastructure::datafiles::{DataFileError, DataFileStore};

/// 列举本地JSON数据文件
pub async fn list_data_files(
    Extension(store): Extension<Arc<DataFileStore>>,
) -> impl IntoResponse {
    match store.list().await {
        Ok(entries) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "files": entries
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list data files: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Failed to list data files"
                })),
            )
                .into_response()
        }
    }
}

/// 读取单个本地JSON数据文件
///
/// 名称经过目录穿越保护；内容按文件修改时间缓存。
pub async fn get_data_file(
    Path(name): Path<String>,
    Extension(store): Extension<Arc<DataFileStore>>,
) -> impl IntoResponse {
    match store.load(&name).await {
        Ok(value) => (StatusCode::OK, Json(value.as_ref().clone())).into_response(),
        Err(DataFileError::InvalidName) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "Invalid data file name"
            })),
        )
            .into_response(),
        Err(DataFileError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "Data file not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load data file {}: {}", name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Failed to load data file"
                })),
            )
                .into_response()
        }
    }
}
