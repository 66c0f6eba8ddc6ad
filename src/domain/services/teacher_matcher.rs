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

use regex::{Regex, RegexBuilder};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::{
    ColumnLayout, ConvertedTable, MatchRecord, RunContext, ScheduleRow, Stage, TeacherRoster,
};
use crate::infrastructure::table_store;
use crate::utils::errors::ScheduleError;

/// 匹配阶段结果
#[derive(Debug, Default, Clone)]
pub struct MatchReport {
    pub records: Vec<MatchRecord>,
    pub tables_scanned: usize,
    pub tables_failed: usize,
    pub cancelled: bool,
}

/// 教师匹配服务
///
/// 在转换后的表格中查找名单中的姓名（不区分大小写的子串匹配），
/// 并为每个匹配的单元格重建一对奇/偶周课表记录
pub struct TeacherMatcher {
    names: Vec<String>,
    lowered: Vec<String>,
    pattern: Regex,
    layout: ColumnLayout,
}

impl TeacherMatcher {
    /// 根据名单构建匹配器
    ///
    /// # 返回值
    ///
    /// * `Err(ScheduleError::EmptyRoster)` - 名单中没有可用的姓名
    pub fn new(roster: &TeacherRoster, layout: ColumnLayout) -> Result<Self, ScheduleError> {
        let names: Vec<String> = roster
            .names()
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(ScheduleError::EmptyRoster);
        }

        // Names are escaped so roster entries never act as regex syntax
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;
        let lowered = names.iter().map(|n| n.to_lowercase()).collect();

        Ok(Self {
            names,
            lowered,
            pattern,
            layout,
        })
    }

    /// 名单中被该单元格包含的所有姓名，保持名单顺序
    pub fn names_in(&self, cell: &str) -> Vec<&str> {
        if cell.is_empty() || !self.pattern.is_match(cell) {
            return Vec::new();
        }
        let lowered = cell.to_lowercase();
        self.names
            .iter()
            .zip(&self.lowered)
            .filter(|(_, needle)| lowered.contains(needle.as_str()))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// 匹配一行：每个包含名单姓名的单元格产生一条记录
    pub fn match_row(&self, row: &ScheduleRow, group: &str) -> Vec<MatchRecord> {
        row.cells
            .iter()
            .filter_map(|cell| self.names_in(cell).first().map(|name| name.to_string()))
            .map(|teacher_name| MatchRecord {
                teacher_name,
                group: group.to_string(),
                even_week: row.even.clone(),
                odd_week: row.odd.clone(),
            })
            .collect()
    }

    /// 匹配整张表格，逐行检查取消信号
    ///
    /// # 返回值
    ///
    /// (已匹配记录, 是否因取消而提前结束)
    pub fn match_table(&self, table: &ConvertedTable, ctx: &RunContext) -> (Vec<MatchRecord>, bool) {
        let group = table.group();
        let mut records = Vec::new();
        for row in &table.rows {
            if ctx.is_cancelled() {
                return (records, true);
            }
            records.extend(self.match_row(row, &group));
        }
        (records, false)
    }

    /// 扫描一组表格文件
    ///
    /// 单个表格无法解析时记录日志并跳过；每处理完一张表格报告一次进度
    #[instrument(skip_all, fields(tables = tables.len()))]
    pub fn scan(&self, tables: &[PathBuf], ctx: &RunContext) -> MatchReport {
        let total = tables.len();
        let mut report = MatchReport::default();

        for (i, path) in tables.iter().enumerate() {
            if ctx.is_cancelled() {
                report.cancelled = true;
                break;
            }

            match table_store::load_table(path, &self.layout) {
                Ok(table) => {
                    debug!("Columns in {}: {:?}", path.display(), table.header);
                    let (records, cancelled) = self.match_table(&table, ctx);
                    if !records.is_empty() {
                        ctx.log(
                            Stage::Match,
                            format!("[match] {}: {} row(s)", table.stem, records.len()),
                        );
                    }
                    report.records.extend(records);
                    report.tables_scanned += 1;
                    if cancelled {
                        report.cancelled = true;
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read table {}: {}", path.display(), e);
                    ctx.log(Stage::Match, format!("[table error] {}: {}", path.display(), e));
                    report.tables_failed += 1;
                }
            }

            ctx.progress(Stage::Match, i + 1, total);
        }

        info!(
            "Scanned {} table(s), {} match(es){}",
            report.tables_scanned,
            report.records.len(),
            if report.cancelled { ", cancelled" } else { "" }
        );
        report
    }
}
