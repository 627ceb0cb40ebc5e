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

use once_cell::sync::Lazy;
use regex::Regex;

// og:title with property before content
static OG_TITLE_PROPERTY_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]*property\s*=\s*["']og:title["'][^>]*content\s*=\s*["']([^"']+)["']"#,
    )
    .expect("invalid og:title regex")
});

// og:title with content before property
static OG_TITLE_CONTENT_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]*content\s*=\s*["']([^"']+)["'][^>]*property\s*=\s*["']og:title["']"#,
    )
    .expect("invalid og:title regex")
});

static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("invalid title regex"));

static INNER_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("invalid tag regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("invalid ws regex"));

// Known platform suffixes appended by blog/search portals
static NAVER_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[:\-]\s*(naver\s+blog|네이버\s*블로그)\s*$").expect("invalid suffix regex")
});

static PIPE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|[^|]*$").expect("invalid suffix regex"));

/// 从HTML响应体中提取人类可读的页面标题
///
/// 仅用于丰富失败诊断：优先匹配Open Graph标题（两种属性顺序），
/// 回退到`<title>`标签内容（剥离嵌套标签）。归一化时折叠空白、
/// 解码HTML实体并剥离已知的平台后缀。
///
/// # 参数
///
/// * `body` - HTML响应体
///
/// # 返回值
///
/// 提取到的标题；无可用内容时返回None
pub fn extract_title(body: &str) -> Option<String> {
    let raw = OG_TITLE_PROPERTY_FIRST
        .captures(body)
        .or_else(|| OG_TITLE_CONTENT_FIRST.captures(body))
        .map(|caps| caps[1].to_string())
        .or_else(|| {
            TITLE_TAG
                .captures(body)
                .map(|caps| INNER_TAGS.replace_all(&caps[1], "").to_string())
        })?;

    let decoded = html_escape::decode_html_entities(&raw).to_string();
    let collapsed = WHITESPACE.replace_all(&decoded, " ").trim().to_string();
    let stripped = NAVER_SUFFIX.replace(&collapsed, "").to_string();
    let stripped = PIPE_SUFFIX.replace(&stripped, "").trim().to_string();

    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}
