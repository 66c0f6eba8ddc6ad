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

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::domain::models::FailureKind;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 状态码
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 对应的单链接失败类别
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            EngineError::Status { status, .. } if (300..400).contains(status) => {
                FailureKind::Redirect
            }
            EngineError::Status { .. } => FailureKind::HttpStatus,
            EngineError::RequestFailed(e) if e.is_redirect() => FailureKind::Redirect,
            _ => FailureKind::Network,
        }
    }
}

/// 索引页来源特质
///
/// 链接发现只依赖该特质，测试中可以直接提供页面内容
#[async_trait]
pub trait PageSource: Send + Sync {
    /// 获取页面 HTML
    async fn fetch_page(&self, url: &Url) -> Result<String, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
