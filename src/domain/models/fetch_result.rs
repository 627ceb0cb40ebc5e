// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单URL抓取结果实体
///
/// 每个输入URL对应一个结果，与输入序列按下标对齐。
/// 成功时携带解析后的JSON和状态码；失败时携带错误描述、
/// 可选的状态码以及从页面中提取的标题（用于诊断）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchResult {
    /// 目标URL，与请求中的URL逐字相同
    pub url: String,
    /// 抓取是否成功（状态2xx且响应体为合法JSON）
    pub ok: bool,
    /// HTTP响应状态码；网络层失败（超时、DNS等）时缺失
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// 解析后的JSON响应体，仅成功时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    /// 人类可读的错误描述，仅失败时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 从失败页面提取的标题，尽力而为
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FetchResult {
    /// 创建成功结果
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `status` - HTTP状态码
    /// * `json` - 解析后的JSON值
    pub fn success(url: impl Into<String>, status: u16, json: Value) -> Self {
        Self {
            url: url.into(),
            ok: true,
            status: Some(status),
            json: Some(json),
            error: None,
            title: None,
        }
    }

    /// 创建失败结果
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `error` - 错误描述
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ok: false,
            status: None,
            json: None,
            error: Some(error.into()),
            title: None,
        }
    }

    /// 附加HTTP状态码
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 附加提取的页面标题
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}
