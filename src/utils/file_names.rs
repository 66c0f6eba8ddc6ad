// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

/// 将任意文本转换为可安全用作文件名片段的字符串
///
/// 保留字母、数字（含西里尔字母）、`-`、`.`、空格，其余字符替换为 `-`。
pub fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '.' | ' ' | '(' | ')') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim().to_string();
    if cleaned.is_empty() {
        "sheet".to_string()
    } else {
        cleaned
    }
}

/// 在一次运行内为重复的文件名分配唯一名称
///
/// 第一次出现保持 `<stem>.<ext>`，之后为 `<stem> (N).<ext>`，N 从 2 开始。
pub fn unique_file_name(name: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(name.to_lowercase()).or_insert(0);
    *count += 1;
    if *count == 1 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem} ({}).{ext}", count),
        None => format!("{name} ({})", count),
    }
}
