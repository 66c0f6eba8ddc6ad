// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;

use super::json_store::{read_json, write_json};
use crate::domain::models::AppState;
use crate::domain::repositories::{RepositoryError, StateRepository};

/// 基于 JSON 文件的运行状态仓库实现
pub struct StateRepositoryImpl {
    path: PathBuf,
}

impl StateRepositoryImpl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateRepository for StateRepositoryImpl {
    fn load(&self) -> Result<AppState, RepositoryError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&self, state: &AppState) -> Result<(), RepositoryError> {
        write_json(&self.path, state)
    }
}
