// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

use crate::domain::models::table::table_path;
use crate::domain::models::{RunContext, Stage};
use crate::infrastructure::table_store;
use crate::utils::errors::ScheduleError;
use crate::utils::file_names;

/// 单个工作表的转换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOutcome {
    /// 写出了新的表格
    Written(PathBuf),
    /// 表格已存在且未开启覆盖
    AlreadyAvailable(PathBuf),
    /// 没有数据行，未写出任何文件
    Empty,
    /// 解析或写入失败，仅跳过该工作表
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SheetResult {
    pub sheet: String,
    pub outcome: SheetOutcome,
}

/// 单个文档的转换报告
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub document: PathBuf,
    pub sheets: Vec<SheetResult>,
    /// 是否因取消而未处理完全部工作表
    pub cancelled: bool,
}

impl ConversionReport {
    /// 可供匹配使用的表格（新写出的与已存在的）
    pub fn tables(&self) -> Vec<PathBuf> {
        self.sheets
            .iter()
            .filter_map(|s| match &s.outcome {
                SheetOutcome::Written(p) | SheetOutcome::AlreadyAvailable(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn written(&self) -> usize {
        self.sheets
            .iter()
            .filter(|s| matches!(s.outcome, SheetOutcome::Written(_)))
            .count()
    }
}

/// 多个文档的转换汇总
#[derive(Debug, Clone, Default)]
pub struct ConversionSummary {
    pub reports: Vec<ConversionReport>,
    /// 无法打开的文档
    pub failed_documents: Vec<(PathBuf, String)>,
    pub cancelled: bool,
}

impl ConversionSummary {
    pub fn tables(&self) -> Vec<PathBuf> {
        self.reports.iter().flat_map(|r| r.tables()).collect()
    }

    pub fn written(&self) -> usize {
        self.reports.iter().map(|r| r.written()).sum()
    }
}

/// 工作表转换器
///
/// 每个工作表写出一个 CSV，文件名由 (文档名, 工作表名) 决定；
/// 首行作为表头，少于两行的工作表视为空表
pub struct SheetConverter {
    overwrite: bool,
}

impl SheetConverter {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    /// 转换一组文档，单个文档失败不影响其他文档
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn convert_all(&self, documents: &[PathBuf], ctx: &RunContext) -> ConversionSummary {
        let mut summary = ConversionSummary::default();
        for (i, document) in documents.iter().enumerate() {
            if ctx.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            match self.convert(document, ctx) {
                Ok(report) => {
                    let cancelled = report.cancelled;
                    summary.reports.push(report);
                    if cancelled {
                        summary.cancelled = true;
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to open {}: {}", document.display(), e);
                    ctx.log(
                        Stage::Convert,
                        format!("[conversion error] {}: {}", document.display(), e),
                    );
                    summary.failed_documents.push((document.clone(), e.to_string()));
                }
            }
            ctx.progress(Stage::Convert, i + 1, documents.len());
        }
        info!(
            "Converted {} document(s): {} table(s) written, {} available",
            summary.reports.len(),
            summary.written(),
            summary.tables().len()
        );
        summary
    }

    /// 转换单个文档
    ///
    /// # 返回值
    ///
    /// * `Ok(ConversionReport)` - 各工作表的结果；取消时只包含已处理的工作表
    /// * `Err(ScheduleError::Parse)` - 文档无法打开
    pub fn convert(
        &self,
        document: &Path,
        ctx: &RunContext,
    ) -> Result<ConversionReport, ScheduleError> {
        let mut workbook = open_workbook_auto(document)
            .map_err(|e| ScheduleError::Parse(format!("{}: {}", document.display(), e)))?;
        let dir = document.parent().unwrap_or_else(|| Path::new("."));
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut report = ConversionReport {
            document: document.to_path_buf(),
            ..Default::default()
        };
        let mut seen_names = HashMap::new();

        for sheet in workbook.sheet_names().to_owned() {
            if ctx.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let target = unique_target(&table_path(dir, &stem, &sheet), &mut seen_names);
            let outcome = if target.exists() && !self.overwrite {
                ctx.log(
                    Stage::Convert,
                    format!("[skipped] table already exists: {}", target.display()),
                );
                SheetOutcome::AlreadyAvailable(target)
            } else {
                match workbook.worksheet_range(&sheet) {
                    Ok(range) => self.write_sheet(&range, target, ctx),
                    Err(e) => {
                        warn!("Failed to parse sheet {} in {}: {}", sheet, document.display(), e);
                        ctx.log(
                            Stage::Convert,
                            format!("[sheet error] {} / {}: {}", document.display(), sheet, e),
                        );
                        SheetOutcome::Failed(e.to_string())
                    }
                }
            };
            report.sheets.push(SheetResult { sheet, outcome });
        }

        Ok(report)
    }

    fn write_sheet(&self, range: &Range<Data>, target: PathBuf, ctx: &RunContext) -> SheetOutcome {
        let rows = range_to_rows(range);
        if rows.len() < 2 {
            debug!("Sheet for {} has no data rows", target.display());
            return SheetOutcome::Empty;
        }
        match table_store::write_table(&target, &rows) {
            Ok(()) => {
                ctx.log(Stage::Convert, format!("[table written] {}", target.display()));
                SheetOutcome::Written(target)
            }
            Err(e) => {
                warn!("Failed to write {}: {}", target.display(), e);
                ctx.log(
                    Stage::Convert,
                    format!("[write error] {}: {}", target.display(), e),
                );
                SheetOutcome::Failed(e.to_string())
            }
        }
    }
}

/// 将工作表区域转换为行，补齐区域前的空列使列号从 A=0 开始
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(leading)
                .chain(row.iter().map(cell_to_string))
                .collect()
        })
        .collect()
}

/// 单元格转文本，整数值的浮点数不带小数部分
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

fn unique_target(path: &Path, seen: &mut HashMap<String, usize>) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(file_names::unique_file_name(&name, seen))
}
