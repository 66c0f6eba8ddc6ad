// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：链接、下载结果、课表行、名单与运行上下文
/// - 仓库接口（repositories）：名单与运行状态的持久化抽象
/// - 服务（services）：姓名规范化、名单维护与教师匹配
pub mod models;
pub mod repositories;
pub mod services;
