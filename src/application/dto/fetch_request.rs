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

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单URL超时下限（毫秒）
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// 单URL超时上限（毫秒）
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// 工作池大小上限
pub const MAX_CONCURRENCY: usize = 200;

/// 批量抓取请求数据传输对象
///
/// 用于封装客户端发起的批量URL抓取请求的相关参数。
/// `urls`以原始JSON值接收，非字符串条目在校验阶段被丢弃。
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequestDto {
    /// 要抓取的URL列表，以原始JSON值接收；非列表值视同缺失
    pub urls: Option<Value>,
    /// 单URL超时（毫秒），钳制到[1000, 30000]
    pub timeout_ms: Option<u64>,
    /// 工作池大小，钳制到[1, 200]且不超过URL数量
    pub concurrency: Option<usize>,
}

impl FetchRequestDto {
    /// 过滤出字符串类型的URL条目
    ///
    /// `urls`不是列表时返回空，由调用方按缺失处理。
    ///
    /// # 返回值
    ///
    /// 保持原有顺序的字符串URL列表
    pub fn valid_urls(&self) -> Vec<String> {
        self.urls
            .as_ref()
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|value| value.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 计算钳制后的生效超时
    ///
    /// # 参数
    ///
    /// * `default_ms` - 请求未携带超时时使用的默认值
    pub fn effective_timeout_ms(&self, default_ms: u64) -> u64 {
        self.timeout_ms
            .unwrap_or(default_ms)
            .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
    }

    /// 计算钳制后的生效并发度
    ///
    /// # 参数
    ///
    /// * `default_concurrency` - 请求未携带并发度时使用的默认值
    /// * `url_count` - 有效URL数量，作为并发度的额外上限
    pub fn effective_concurrency(&self, default_concurrency: usize, url_count: usize) -> usize {
        self.concurrency
            .unwrap_or(default_concurrency)
            .clamp(1, MAX_CONCURRENCY)
            .min(url_count)
            .max(1)
    }
}
