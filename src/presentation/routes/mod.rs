// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{
    data_handler, fetch_handler, image_proxy_handler, map_key_handler,
};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/v1/fetch", post(fetch_handler::fetch_batch))
        .route("/v1/image-proxy", get(image_proxy_handler::image_proxy))
        .route("/v1/data", get(data_handler::list_data_files))
        .route("/v1/data/{name}", get(data_handler::get_data_file))
        .route("/v1/map-key", get(map_key_handler::map_key));

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
