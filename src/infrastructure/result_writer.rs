// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::models::{MatchRecord, ScheduleField, ScheduleHalf, WeekParity};
use crate::infrastructure::table_store;
use crate::utils::errors::ScheduleError;

/// 结果文件名前缀
const RESULT_PREFIX: &str = "teacher_schedule_";

/// 结果表头：教师、小组，然后依次为偶周与奇周的六个字段
pub fn result_header() -> Vec<String> {
    let mut header = vec!["Преподаватель".to_string(), "Группа".to_string()];
    for parity in [WeekParity::Even, WeekParity::Odd] {
        header.extend(
            ScheduleField::ALL
                .iter()
                .map(|field| format!("{} ({})", field.title(), parity.title())),
        );
    }
    header
}

/// 将一条记录展开为一行
pub fn flatten(record: &MatchRecord) -> Vec<String> {
    let mut row = vec![record.teacher_name.clone(), record.group.clone()];
    for half in [&record.even_week, &record.odd_week] {
        row.extend(ScheduleField::ALL.iter().map(|f| half.get(*f).to_string()));
    }
    row
}

/// 带时间戳的结果文件名
pub fn result_file_name(at: DateTime<Local>) -> String {
    format!("{}{}.csv", RESULT_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// 写出匹配结果
///
/// # 返回值
///
/// * `Ok(None)` - 没有记录，不写文件
/// * `Ok(Some(path))` - 结果文件路径
/// * `Err(ScheduleError)` - 写入失败
pub fn write_results(
    records: &[MatchRecord],
    dir: &Path,
) -> Result<Option<PathBuf>, ScheduleError> {
    if records.is_empty() {
        return Ok(None);
    }

    let path = free_path(dir, &result_file_name(Local::now()));
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(result_header());
    rows.extend(records.iter().map(flatten));
    table_store::write_table(&path, &rows)?;

    info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(Some(path))
}

/// 两次运行落在同一秒时不覆盖先前的结果
fn free_path(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }
    let stem = name.trim_end_matches(".csv");
    (2..)
        .map(|n| dir.join(format!("{stem} ({n}).csv")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// 可读的结果摘要
pub fn format_results(records: &[MatchRecord]) -> String {
    if records.is_empty() {
        return "No results.".to_string();
    }
    let mut out = vec![format!("Matches found: {}\n", records.len())];
    for record in records {
        out.push(format!(
            "Преподаватель: {}\nГруппа: {}\n",
            record.teacher_name, record.group
        ));
        out.push(format!(
            "{}:\n{}\n",
            WeekParity::Even.title(),
            describe(&record.even_week)
        ));
        out.push(format!(
            "{}:\n{}\n",
            WeekParity::Odd.title(),
            describe(&record.odd_week)
        ));
    }
    out.join("\n")
}

fn describe(half: &ScheduleHalf) -> String {
    ScheduleField::ALL
        .iter()
        .filter(|f| !half.get(**f).is_empty())
        .map(|f| format!("{}: {}", f.title(), half.get(*f)))
        .collect::<Vec<_>>()
        .join("; ")
}
