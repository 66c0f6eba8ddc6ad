// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 操作者在两次启动之间保留的状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// 上次使用的下载目录
    pub last_folder: Option<PathBuf>,
    /// 转换时是否覆盖已存在的表格
    pub overwrite_tables: bool,
}
