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
use serde::{Deserialize, Serialize};

/// 批量抓取缓冲响应数据传输对象
///
/// 聚合模式下的完整响应：与输入等长且顺序一致的结果列表，
/// 以及钳制后实际生效的配置。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponseDto {
    /// 按输入顺序排列的结果列表
    pub results: Vec<FetchResult>,
    /// 结果数量
    pub count: usize,
    /// 生效的单URL超时（毫秒）
    pub timeout_ms: u64,
    /// 生效的并发度
    pub concurrency: usize,
}

/// 流式模式`meta`事件载荷
///
/// 在任何`result`事件之前发送一次，携带总数与生效配置。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMetaDto {
    /// 待抓取URL总数
    pub count: usize,
    /// 生效的单URL超时（毫秒）
    pub timeout_ms: u64,
    /// 生效的并发度
    pub concurrency: usize,
}
