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

use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// URL为空
    #[error("URL is empty")]
    EmptyUrl,
    /// URL无法解析
    #[error("Invalid URL")]
    InvalidUrl,
    /// URL协议不受支持
    #[error("Unsupported URL scheme")]
    UnsupportedScheme,
}

/// 验证抓取目标URL
///
/// 只允许语法合法的http/https URL，任何违规都在发起网络请求之前被拒绝。
///
/// # 参数
///
/// * `url` - URL字符串
///
/// # 返回值
///
/// * `Ok(Url)` - 解析后的URL
/// * `Err(ValidationError)` - URL无效
pub fn validate_fetch_url(url: &str) -> Result<Url, ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ValidationError::UnsupportedScheme),
    }
}
