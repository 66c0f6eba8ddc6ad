// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 有界并发的下载工作池：信号量限制同时进行的下载数，
/// 协调者按完成顺序汇总结果
pub mod download_pool;

pub use download_pool::DownloadPool;
