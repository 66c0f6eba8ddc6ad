// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::dto::{RunStatus, SearchReport};
use crate::domain::models::{ColumnLayout, RunContext, Stage};
use crate::domain::repositories::RosterRepository;
use crate::domain::services::TeacherMatcher;
use crate::infrastructure::sheet_converter::SheetConverter;
use crate::infrastructure::{result_writer, workspace};
use crate::utils::errors::ScheduleError;

/// 搜索用例：转换目录中的文档，在表格中匹配名单，写出结果
pub struct SearchTeachersUseCase {
    roster: Arc<dyn RosterRepository>,
}

impl SearchTeachersUseCase {
    pub fn new(roster: Arc<dyn RosterRepository>) -> Self {
        Self { roster }
    }

    /// 执行搜索
    ///
    /// 转换与匹配是同步文件操作，在阻塞线程池中运行
    ///
    /// # 参数
    ///
    /// * `folder` - 文档所在目录，表格与结果写在同一目录
    /// * `overwrite` - 是否覆盖已存在的表格
    /// * `ctx` - 运行上下文
    ///
    /// # 返回值
    ///
    /// * `Ok(SearchReport)` - 运行报告
    /// * `Err(ScheduleError::EmptyRoster)` / `Err(ScheduleError::FolderNotWritable)` - 前置条件失败
    /// * `Err(ScheduleError::NoDocuments)` - 目录中没有文档
    #[instrument(skip_all, fields(folder = %folder.display(), overwrite = overwrite))]
    pub async fn execute(
        &self,
        folder: &Path,
        overwrite: bool,
        ctx: &RunContext,
    ) -> Result<SearchReport, ScheduleError> {
        let roster = self.roster.load()?;
        let matcher = TeacherMatcher::new(&roster, ColumnLayout::STANDARD)?;
        workspace::validate_folder(folder)?;

        let documents = workspace::list_documents(folder)?;
        if documents.is_empty() {
            return Err(ScheduleError::NoDocuments(folder.to_path_buf()));
        }
        ctx.log(
            Stage::Convert,
            format!("[convert] {} document(s)", documents.len()),
        );

        let conversion = {
            let ctx = ctx.clone();
            let documents = documents.clone();
            tokio::task::spawn_blocking(move || {
                SheetConverter::new(overwrite).convert_all(&documents, &ctx)
            })
            .await?
        };
        let tables: Vec<PathBuf> = conversion.tables();

        let scan = {
            let ctx = ctx.clone();
            let tables = tables.clone();
            tokio::task::spawn_blocking(move || matcher.scan(&tables, &ctx)).await?
        };

        let cancelled = conversion.cancelled || scan.cancelled || ctx.is_cancelled();
        let result_path = if cancelled {
            None
        } else {
            let records = scan.records.clone();
            let dir = folder.to_path_buf();
            tokio::task::spawn_blocking(move || result_writer::write_results(&records, &dir))
                .await??
        };
        match &result_path {
            Some(path) => ctx.log(Stage::Write, format!("[results] {}", path.display())),
            None if !cancelled => ctx.log(Stage::Write, "[results] no matches"),
            None => {}
        }

        let status = RunStatus::from_cancelled(cancelled);
        info!(
            "Search run {}: {} table(s), {} record(s)",
            status,
            scan.tables_scanned,
            scan.records.len()
        );

        Ok(SearchReport {
            documents: documents.len(),
            tables_written: conversion.written(),
            tables_scanned: scan.tables_scanned,
            records: scan.records,
            result_path,
            status,
        })
    }
}
