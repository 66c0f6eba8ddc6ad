// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 识别的电子表格扩展名
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = [".xls", ".xlsx"];

/// 查看器跳转链接中携带真实文档地址的查询参数
const VIEWER_SOURCE_PARAM: &str = "src";

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// URL 路径是否以电子表格扩展名结尾（忽略大小写，不含查询串）
pub fn has_spreadsheet_extension(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    SPREADSHEET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// 从查看器跳转链接中取出被引用的文档地址
///
/// 形如 `https://viewer/op/view.aspx?src=<encoded-url>` 的链接，
/// 返回解码后的内部 URL（相对地址按 `base_url` 解析）。
pub fn viewer_target(base_url: &Url, url: &Url) -> Option<Url> {
    let (_, src) = url
        .query_pairs()
        .find(|(key, value)| key == VIEWER_SOURCE_PARAM && !value.is_empty())?;
    // query_pairs already percent-decodes once
    resolve_url(base_url, src.trim()).ok()
}

/// 链接在本地保存时使用的文件名（URL 最后一个路径段，百分号解码）
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let name = decoded.replace(['/', '\\'], "_");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
