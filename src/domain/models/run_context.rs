// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Download,
    Convert,
    Match,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Discover => "discover",
            Stage::Download => "download",
            Stage::Convert => "convert",
            Stage::Match => "match",
            Stage::Write => "write",
        };
        f.write_str(s)
    }
}

/// 协作式取消信号
///
/// 由操作者设置一次，运行期间不清除，下一次运行开始前重置。
/// 检查点：下载按数据块，转换按工作表，匹配按表格和行。
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// 重置信号，仅在两次运行之间调用
    pub fn reset(&self) {
        self.tx.send_replace(false);
    }

    /// 等待信号被设置
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // Err only when the sender is gone, which cannot happen while `self` lives
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// 推送给界面的运行事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Progress {
        stage: Stage,
        current: usize,
        total: usize,
    },
    Log {
        stage: Stage,
        line: String,
    },
}

/// 进度与日志接收端
///
/// 界面外壳是唯一的消费者，不持有核心状态
pub trait ProgressSink: Send + Sync {
    fn progress(&self, stage: Stage, current: usize, total: usize);

    fn log(&self, stage: Stage, line: &str);
}

/// 丢弃所有事件
pub struct NullSink;

impl ProgressSink for NullSink {
    fn progress(&self, _stage: Stage, _current: usize, _total: usize) {}

    fn log(&self, _stage: Stage, _line: &str) {}
}

/// 通过通道把事件转发给单一消费者
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn progress(&self, stage: Stage, current: usize, total: usize) {
        // Receiver dropped means nobody is watching; the run still continues
        let _ = self.tx.send(RunEvent::Progress {
            stage,
            current,
            total,
        });
    }

    fn log(&self, stage: Stage, line: &str) {
        let _ = self.tx.send(RunEvent::Log {
            stage,
            line: line.to_string(),
        });
    }
}

/// 单次运行的上下文：取消信号 + 进度/日志接收端
#[derive(Clone)]
pub struct RunContext {
    pub cancel: CancellationSignal,
    sink: Arc<dyn ProgressSink>,
}

impl RunContext {
    pub fn new(cancel: CancellationSignal, sink: Arc<dyn ProgressSink>) -> Self {
        Self { cancel, sink }
    }

    /// 无界面的上下文
    pub fn detached() -> Self {
        Self::new(CancellationSignal::new(), Arc::new(NullSink))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn progress(&self, stage: Stage, current: usize, total: usize) {
        self.sink.progress(stage, current, total);
    }

    pub fn log(&self, stage: Stage, line: impl AsRef<str>) {
        self.sink.log(stage, line.as_ref());
    }
}
