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
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use crate::config::settings::HttpSettings;
use crate::engines::traits::{EngineError, PageSource};

/// 抓取引擎
///
/// 基于reqwest实现的索引页抓取引擎，所有请求共享同一个客户端
#[derive(Clone)]
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 根据 HTTP 配置创建引擎
    pub fn new(settings: &HttpSettings) -> Result<Self, EngineError> {
        let client = base_builder(settings).cookie_store(true).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `url` - 索引页地址
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 页面内容
    /// * `Err(EngineError)` - 传输错误或非 2xx 状态码
    async fn fetch_page(&self, url: &Url) -> Result<String, EngineError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let content = response.text().await?;
        debug!("Fetched {} ({} bytes)", url, content.len());
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// 构建下载客户端
///
/// 不跟随跳转，3xx 由调用方作为失败处理；
/// 请求不压缩的内容，使写入字节数可以与声明长度直接比较
pub fn download_client(settings: &HttpSettings) -> Result<reqwest::Client, EngineError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    Ok(base_builder(settings)
        .redirect(Policy::none())
        .default_headers(headers)
        .build()?)
}

fn base_builder(settings: &HttpSettings) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.timeout())
        .connect_timeout(settings.connect_timeout())
}
