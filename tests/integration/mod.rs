// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 集成测试模块
///
/// 使用 wiremock 模拟索引页与文档服务器，使用临时目录作为下载目录
pub mod conversion_test;
pub mod download_test;
