// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 有序的教师名单（规范化姓名）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherRoster {
    names: Vec<String>,
}

impl TeacherRoster {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.names.iter().any(|n| n.to_lowercase() == wanted)
    }

    /// 追加姓名；已存在时返回 false
    pub fn push(&mut self, name: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// 按 0 起始的位置移除
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.names.len()).then(|| self.names.remove(index))
    }

    /// 按姓名移除
    pub fn remove_name(&mut self, name: &str) -> Option<String> {
        let index = self.names.iter().position(|n| n == name)?;
        self.remove_at(index)
    }
}
