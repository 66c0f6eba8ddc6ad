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
use std::path::PathBuf;
use std::time::Duration;

/// 现代电子表格 MIME 类型
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// 旧版电子表格 MIME 类型
pub const XLS_CONTENT_TYPE: &str = "application/vnd.ms-excel";

/// 应用程序配置设置
///
/// 包含链接来源、HTTP 客户端、下载池和本地文件路径等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 链接来源配置
    pub sources: SourceSettings,
    /// HTTP 客户端配置
    pub http: HttpSettings,
    /// 下载配置
    pub download: DownloadSettings,
    /// 本地文件路径配置
    pub paths: PathSettings,
}

/// 链接来源配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// 需要扫描的索引页面
    pub base_urls: Vec<String>,
}

/// HTTP 客户端配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// User-Agent 覆盖，避免被识别为机器人
    pub user_agent: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    pub connect_timeout_secs: u64,
}

/// 下载配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadSettings {
    /// 并发下载工作者数量上限
    pub max_workers: usize,
    /// 写入文件时的分块大小（字节）
    pub chunk_size: usize,
    /// 允许的响应内容类型
    pub allowed_content_types: Vec<String>,
    /// 读取错误页面用于诊断时的最大字节数
    pub diagnostic_body_limit: usize,
}

/// 本地文件路径配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PathSettings {
    /// 教师名单文件
    pub roster_file: PathBuf,
    /// 运行状态文件（上次使用的目录、覆盖开关）
    pub state_file: PathBuf,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `SCHEDULE_SCOUT__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder_with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SCHEDULE_SCOUT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("sources.base_urls")
                    .with_list_parse_key("download.allowed_content_types")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?.build()?.try_deserialize()
    }

    fn builder_with_defaults(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Default sources
            .set_default(
                "sources.base_urls",
                vec!["https://rguk.ru/students/schedule/".to_string()],
            )?
            // Default HTTP settings
            .set_default("http.user_agent", "Mozilla/5.0")?
            .set_default("http.timeout_secs", 120)?
            .set_default("http.connect_timeout_secs", 15)?
            // Default download settings
            .set_default("download.max_workers", 4)?
            .set_default("download.chunk_size", 8192)?
            .set_default(
                "download.allowed_content_types",
                vec![XLSX_CONTENT_TYPE.to_string(), XLS_CONTENT_TYPE.to_string()],
            )?
            .set_default("download.diagnostic_body_limit", 65536)?
            // Default paths
            .set_default("paths.roster_file", "teachers.json")?
            .set_default("paths.state_file", "state.json")
    }
}
