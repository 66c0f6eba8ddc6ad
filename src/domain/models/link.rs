// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use url::Url;

use crate::utils::url_utils;

/// 指向电子表格文档的绝对链接
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    url: Url,
}

impl Link {
    /// 仅当 URL 路径以识别的扩展名结尾时创建链接
    pub fn spreadsheet(url: Url) -> Option<Self> {
        url_utils::has_spreadsheet_extension(&url).then_some(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// 本地保存时使用的文件名
    pub fn file_name(&self) -> Option<String> {
        url_utils::file_name_from_url(&self.url)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
