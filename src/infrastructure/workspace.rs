// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::utils::errors::ScheduleError;
use crate::utils::url_utils::SPREADSHEET_EXTENSIONS;

/// 写入探测使用的文件名
const WRITE_PROBE: &str = ".test_write";

/// 验证目标目录可用
///
/// 目录不存在时创建，然后创建并删除一个探测文件
pub fn validate_folder(folder: &Path) -> Result<(), ScheduleError> {
    let probe = folder.join(WRITE_PROBE);
    let result = fs::create_dir_all(folder)
        .and_then(|_| fs::write(&probe, b"probe"))
        .and_then(|_| fs::remove_file(&probe));

    match result {
        Ok(()) => {
            debug!("Folder {} is writable", folder.display());
            Ok(())
        }
        Err(source) => {
            error!("Folder {} is not writable: {}", folder.display(), source);
            Err(ScheduleError::FolderNotWritable {
                path: folder.to_path_buf(),
                source,
            })
        }
    }
}

/// 列出目录中的电子表格文档，按文件名排序
///
/// 下载中的 `.part` 文件和隐藏文件不计入
pub fn list_documents(folder: &Path) -> Result<Vec<PathBuf>, ScheduleError> {
    let mut documents: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_document(path))
        .collect();
    documents.sort();
    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
        return false;
    };
    !name.starts_with('.') && SPREADSHEET_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
