// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// 命令行外壳：参数定义、命令分发与运行事件打印
pub mod cli;
pub mod commands;
pub mod printer;
