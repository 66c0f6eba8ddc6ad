// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::domain::models::TeacherRoster;
use crate::domain::repositories::{RepositoryError, RosterRepository};
use crate::domain::services::name_formatter::NameFormatter;

/// 添加姓名的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// 已添加（规范化后的姓名）
    Added(String),
    /// 名单中已存在
    Duplicate(String),
    /// 输入为空
    Empty,
}

/// 名单删除方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// 1 起始的位置
    Position(usize),
    Name(String),
}

impl RemoveTarget {
    /// 纯数字解析为位置，其余按姓名处理
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<usize>() {
            Ok(position) => RemoveTarget::Position(position),
            Err(_) => RemoveTarget::Name(NameFormatter::format(raw)),
        }
    }
}

/// 教师名单服务
///
/// 每次变更后立即通过仓库持久化整个名单
pub struct RosterService {
    repo: Arc<dyn RosterRepository>,
}

impl RosterService {
    pub fn new(repo: Arc<dyn RosterRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Result<TeacherRoster, RepositoryError> {
        self.repo.load()
    }

    /// 规范化并添加姓名
    ///
    /// # 参数
    ///
    /// * `raw` - 操作者输入的姓名
    ///
    /// # 返回值
    ///
    /// * `Ok(AddOutcome)` - 添加结果；仅在实际添加时写回仓库
    /// * `Err(RepositoryError)` - 读取或保存名单失败
    pub fn add(&self, raw: &str) -> Result<AddOutcome, RepositoryError> {
        if raw.trim().is_empty() {
            return Ok(AddOutcome::Empty);
        }
        let name = NameFormatter::format(raw.trim());

        let mut roster = self.repo.load()?;
        if !roster.push(name.clone()) {
            return Ok(AddOutcome::Duplicate(name));
        }
        self.repo.save(&roster)?;
        info!("Added {} to roster ({} names)", name, roster.len());
        Ok(AddOutcome::Added(name))
    }

    /// 删除姓名
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 被删除的姓名
    /// * `Err(RepositoryError::NotFound)` - 位置越界或姓名不存在
    pub fn remove(&self, target: &RemoveTarget) -> Result<String, RepositoryError> {
        let mut roster = self.repo.load()?;
        let removed = match target {
            RemoveTarget::Position(position) => position
                .checked_sub(1)
                .and_then(|index| roster.remove_at(index)),
            RemoveTarget::Name(name) => roster.remove_name(name),
        };
        let removed = removed.ok_or_else(|| {
            RepositoryError::NotFound(match target {
                RemoveTarget::Position(p) => format!("position {p}"),
                RemoveTarget::Name(n) => n.clone(),
            })
        })?;
        self.repo.save(&roster)?;
        info!("Removed {} from roster ({} names)", removed, roster.len());
        Ok(removed)
    }
}
