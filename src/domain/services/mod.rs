// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 姓名格式化（name_formatter）：将自由输入的姓名规范为 "Фамилия И.О."
/// - 名单服务（roster_service）：名单的添加、删除与持久化
/// - 教师匹配（teacher_matcher）：在转换后的表格中查找名单姓名并重建奇/偶周课表
pub mod name_formatter;
pub mod roster_service;
pub mod teacher_matcher;

pub use name_formatter::NameFormatter;
pub use roster_service::{AddOutcome, RemoveTarget, RosterService};
pub use teacher_matcher::{MatchReport, TeacherMatcher};
