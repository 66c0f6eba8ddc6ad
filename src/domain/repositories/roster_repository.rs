// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::TeacherRoster;

/// 教师名单仓库特质
///
/// 每次变更后整体重写
pub trait RosterRepository: Send + Sync {
    /// 加载名单；文件不存在时返回空名单
    fn load(&self) -> Result<TeacherRoster, RepositoryError>;

    /// 整体保存名单
    fn save(&self, roster: &TeacherRoster) -> Result<(), RepositoryError>;
}
