// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::RepositoryError;
use crate::domain::models::app_state::AppState;

/// 运行状态仓库特质
pub trait StateRepository: Send + Sync {
    /// 加载状态；文件不存在时返回默认值
    fn load(&self) -> Result<AppState, RepositoryError>;

    fn save(&self, state: &AppState) -> Result<(), RepositoryError>;
}
