// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};

use crate::domain::models::schedule::ScheduleRow;
use crate::utils::file_names;

/// 表格产物的扩展名
pub const TABLE_EXTENSION: &str = "csv";

/// 文档名与小组标识之间的分隔符
pub const GROUP_SEPARATOR: char = '_';

/// 由 (文档名, 工作表名) 确定的表格产物名（不含扩展名）
pub fn table_stem(document_stem: &str, sheet_name: &str) -> String {
    format!(
        "{}{}{}",
        document_stem,
        GROUP_SEPARATOR,
        file_names::sanitize_component(sheet_name)
    )
}

/// 表格产物路径
pub fn table_path(dir: &Path, document_stem: &str, sheet_name: &str) -> PathBuf {
    dir.join(format!(
        "{}.{}",
        table_stem(document_stem, sheet_name),
        TABLE_EXTENSION
    ))
}

/// 从表格名推导小组标识：第一个分隔符之前的部分
pub fn group_identifier(stem: &str) -> String {
    stem.split(GROUP_SEPARATOR)
        .next()
        .unwrap_or(stem)
        .to_string()
}

/// 一个工作表转换得到的表格
#[derive(Debug, Clone)]
pub struct ConvertedTable {
    /// 表格名（不含扩展名）
    pub stem: String,
    pub path: PathBuf,
    /// 表头行（可能全为空）
    pub header: Vec<String>,
    /// 数据行
    pub rows: Vec<ScheduleRow>,
}

impl ConvertedTable {
    pub fn group(&self) -> String {
        group_identifier(&self.stem)
    }
}
