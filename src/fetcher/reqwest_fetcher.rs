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

use crate::domain::models::fetch_result::FetchResult;
use crate::fetcher::title::extract_title;
use crate::fetcher::traits::UrlFetcher;
use crate::utils::validators::validate_fetch_url;
use async_trait::async_trait;
use metrics::counter;
use reqwest::header;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// 默认客户端标识
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; fetchrs/1.0; +http://fetchrs.dev)";

/// 抓取器
///
/// 基于reqwest实现的单URL抓取器，共享一个连接池，跟随重定向。
/// 每次抓取受单URL超时与共享取消信号双重约束。
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// 创建新的抓取器实例
    ///
    /// # 参数
    ///
    /// * `user_agent` - 出站请求的客户端标识
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestFetcher)` - 抓取器实例
    /// * `Err(reqwest::Error)` - 客户端构建失败
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// 执行一次不受超时约束的抓取
    ///
    /// 超时与取消由调用方（`fetch`）在外层施加。
    async fn fetch_inner(&self, url: &str) -> FetchResult {
        let response = match self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json, text/json, */*")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_timeout() {
                    "Timeout".to_string()
                } else {
                    e.to_string()
                };
                return FetchResult::failure(url, message);
            }
        };

        let status = response.status().as_u16();
        let success = response.status().is_success();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchResult::failure(url, e.to_string()).with_status(status),
        };

        if !success {
            return FetchResult::failure(url, format!("HTTP {}", status))
                .with_status(status)
                .with_title(extract_title(&body));
        }

        // Strip leading BOM before strict JSON parsing
        let cleaned = body.strip_prefix('\u{feff}').unwrap_or(&body).trim();

        match serde_json::from_str::<Value>(cleaned) {
            Ok(json) => FetchResult::success(url, status, json),
            Err(_) => FetchResult::failure(url, "Response is not valid JSON")
                .with_status(status)
                .with_title(extract_title(&body)),
        }
    }
}

#[async_trait]
impl UrlFetcher for ReqwestFetcher {
    /// 抓取单个URL
    ///
    /// 非法URL在任何网络调用之前被拒绝。超时经`tokio::time::timeout`
    /// 施加；共享取消信号触发时立即中止在途请求。
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `timeout` - 单URL硬超时
    /// * `cancel` - 共享取消信号
    ///
    /// # 返回值
    ///
    /// 抓取结果
    async fn fetch(&self, url: &str, timeout: Duration, cancel: &CancellationToken) -> FetchResult {
        if let Err(e) = validate_fetch_url(url) {
            counter!("fetchrs_fetch_total", "outcome" => "invalid_url").increment(1);
            return FetchResult::failure(url, e.to_string());
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => FetchResult::failure(url, "Cancelled"),
            outcome = tokio::time::timeout(timeout, self.fetch_inner(url)) => match outcome {
                Ok(result) => result,
                Err(_) => FetchResult::failure(url, "Timeout"),
            },
        };

        let outcome = if result.ok { "success" } else { "failure" };
        counter!("fetchrs_fetch_total", "outcome" => outcome).increment(1);
        debug!("Fetched {} -> ok={}", url, result.ok);

        result
    }
}

#[cfg(test)]
#[path = "reqwest_fetcher_test.rs"]
mod tests;
