// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::domain::models::RunEvent;

/// 事件的唯一消费者：日志行打印到标准输出，进度打印到标准错误
///
/// 所有发送端被丢弃后返回
pub async fn print_events(mut rx: UnboundedReceiver<RunEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::Log { line, .. } => println!("{line}"),
            RunEvent::Progress {
                stage,
                current,
                total,
            } => eprintln!("[{stage}] {}", progress_line(current, total)),
        }
    }
}

/// `current/total (percent%)`
pub fn progress_line(current: usize, total: usize) -> String {
    let percent = if total == 0 {
        100
    } else {
        current.min(total) * 100 / total
    };
    format!("{current}/{total} ({percent}%)")
}
