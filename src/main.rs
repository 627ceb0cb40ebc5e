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

use axum::Extension;
use fetchrs::config::settings::Settings;
use fetchrs::fetcher::reqwest_fetcher::ReqwestFetcher;
use fetchrs::fetcher::traits::UrlFetcher;
use fetchrs::infrastructure::datafiles::DataFileStore;
use fetchrs::presentation::routes;
use fetchrs::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting fetchrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    fetchrs::infrastructure::metrics::init_metrics(&settings.metrics.addr);

    // 3. Initialize Components
    let fetcher: Arc<dyn UrlFetcher> = Arc::new(ReqwestFetcher::new(&settings.fetch.user_agent)?);
    let data_store = Arc::new(DataFileStore::new(&settings.data.dir));
    info!("Fetcher and data store initialized");

    // 4. Start HTTP server
    let app = routes::routes()
        .layer(Extension(fetcher))
        .layer(Extension(data_store))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
