// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fs;
use std::path::Path;

use crate::domain::models::{ColumnLayout, ConvertedTable, ScheduleRow};
use crate::utils::errors::ScheduleError;

/// 将表格写入 CSV
///
/// 先写入同目录下的临时文件再重命名，目标路径上不会出现写了一半的表格
pub fn write_table(path: &Path, rows: &[Vec<String>]) -> Result<(), ScheduleError> {
    let tmp = temp_sibling(path);
    let result = (|| -> Result<(), ScheduleError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&tmp)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// 从 CSV 加载表格，首行作为表头，其余每行按列布局投影
pub fn load_table(path: &Path, layout: &ColumnLayout) -> Result<ConvertedTable, ScheduleError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| ScheduleError::Parse(format!("invalid table path: {}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ScheduleError::Parse(format!("{}: {}", path.display(), e)))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| ScheduleError::Parse(format!("{}: {}", path.display(), e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ScheduleError::Parse(format!("{}: {}", path.display(), e)))?;
        let cells = record.iter().map(str::to_string).collect();
        rows.push(ScheduleRow::from_cells(cells, layout));
    }

    Ok(ConvertedTable {
        stem,
        path: path.to_path_buf(),
        header,
        rows,
    })
}

fn temp_sibling(path: &Path) -> std::path::PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
