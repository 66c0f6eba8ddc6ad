// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::repositories::RepositoryError;
use crate::engines::traits::EngineError;

/// 运行级错误类型
///
/// 单个链接、工作表或表格的失败不会出现在这里，
/// 它们在发生处被记录并转换为跳过/失败结果。
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("teacher roster is empty")]
    EmptyRoster,

    #[error("folder is not accessible or not writable: {path}: {source}")]
    FolderNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no spreadsheet documents found in {0}")]
    NoDocuments(PathBuf),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(#[from] EngineError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid roster pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("table write error: {0}")]
    Table(#[from] csv::Error),

    #[error("persistence error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ScheduleError {
    /// 是否为前置条件失败（在任何工作开始之前报告给用户）
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ScheduleError::EmptyRoster | ScheduleError::FolderNotWritable { .. }
        )
    }
}
