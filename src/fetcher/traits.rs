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
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 单URL抓取器接口
///
/// 将一个URL解析为一个FetchResult，永不panic、永不返回Err。
/// 所有失败（非法URL、超时、网络错误、非2xx状态、非JSON响应体）
/// 均被捕获并转换为失败结果。
#[async_trait]
pub trait UrlFetcher: Send + Sync {
    /// 抓取单个URL
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `timeout` - 单URL硬超时
    /// * `cancel` - 共享取消信号；触发后立即中止抓取
    ///
    /// # 返回值
    ///
    /// 抓取结果，成功或失败均以数据形式返回
    async fn fetch(&self, url: &str, timeout: Duration, cancel: &CancellationToken) -> FetchResult;
}
