// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use tracing::debug;

use super::json_store::{read_json, write_json};
use crate::domain::models::TeacherRoster;
use crate::domain::repositories::{RepositoryError, RosterRepository};

/// 基于 JSON 文件的名单仓库实现
///
/// 文件内容为姓名的 JSON 数组
pub struct RosterRepositoryImpl {
    path: PathBuf,
}

impl RosterRepositoryImpl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterRepository for RosterRepositoryImpl {
    fn load(&self) -> Result<TeacherRoster, RepositoryError> {
        let roster: TeacherRoster = read_json(&self.path)?.unwrap_or_default();
        debug!("Loaded {} name(s) from {}", roster.len(), self.path.display());
        Ok(roster)
    }

    fn save(&self, roster: &TeacherRoster) -> Result<(), RepositoryError> {
        write_json(&self.path, roster)
    }
}
