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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、抓取、图片代理和数据文件等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取配置
    pub fetch: FetchSettings,
    /// 图片代理配置
    pub image_proxy: ImageProxySettings,
    /// 数据文件配置
    pub data: DataSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct FetchSettings {
    /// 请求未指定时的默认单URL超时（毫秒）
    pub default_timeout_ms: u64,
    /// 请求未指定时的默认并发度
    pub default_concurrency: usize,
    /// 出站请求的客户端标识
    pub user_agent: String,
}

/// 图片代理配置设置
#[derive(Debug, Deserialize)]
pub struct ImageProxySettings {
    /// 上游图片抓取超时（毫秒）
    pub timeout_ms: u64,
}

/// 数据文件配置设置
#[derive(Debug, Deserialize)]
pub struct DataSettings {
    /// 本地JSON数据文件目录
    pub dir: String,
}

/// 指标配置设置
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus导出器监听地址
    pub addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default fetch settings
            .set_default("fetch.default_timeout_ms", 10_000)?
            .set_default("fetch.default_concurrency", 5)?
            .set_default(
                "fetch.user_agent",
                "Mozilla/5.0 (compatible; fetchrs/1.0; +http://fetchrs.dev)",
            )?
            // Default image proxy settings
            .set_default("image_proxy.timeout_ms", 15_000)?
            // Default data file settings
            .set_default("data.dir", "./data")?
            // Default metrics settings
            .set_default("metrics.addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("FETCHRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
