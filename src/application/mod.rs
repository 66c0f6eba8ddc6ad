// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 用例负责编排各阶段（发现、下载、转换、匹配、写出），
/// 并把前置条件检查放在任何工作开始之前
pub mod dto;
pub mod usecases;
