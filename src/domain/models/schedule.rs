// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 周次奇偶
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekParity {
    Even,
    Odd,
}

impl WeekParity {
    pub fn title(&self) -> &'static str {
        match self {
            WeekParity::Even => "Четная",
            WeekParity::Odd => "Нечетная",
        }
    }
}

/// 课表行中按位置读取的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    Day,
    Time,
    Room,
    SessionType,
    Teacher,
    Subject,
}

impl ScheduleField {
    pub const ALL: [ScheduleField; 6] = [
        ScheduleField::Day,
        ScheduleField::Time,
        ScheduleField::Room,
        ScheduleField::SessionType,
        ScheduleField::Teacher,
        ScheduleField::Subject,
    ];

    /// 结果表格与摘要中使用的列名
    pub fn title(&self) -> &'static str {
        match self {
            ScheduleField::Day => "День",
            ScheduleField::Time => "Время",
            ScheduleField::Room => "Аудитория",
            ScheduleField::SessionType => "Тип",
            ScheduleField::Teacher => "Преподаватель",
            ScheduleField::Subject => "Предмет",
        }
    }
}

/// 单个字段所在的列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    /// 固定列
    At(usize),
    /// 首选列；表格没有该列时退回到另一列
    AtOr(usize, usize),
}

impl ColumnRef {
    fn read<'a>(&self, cells: &'a [String]) -> &'a str {
        let index = match *self {
            ColumnRef::At(i) => i,
            ColumnRef::AtOr(i, fallback) => {
                if i < cells.len() {
                    i
                } else {
                    fallback
                }
            }
        };
        cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// 一周数据在行中的列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekColumns {
    pub day: ColumnRef,
    pub time: ColumnRef,
    pub room: ColumnRef,
    pub session_type: ColumnRef,
    pub teacher: ColumnRef,
    pub subject: ColumnRef,
}

impl WeekColumns {
    pub fn column(&self, field: ScheduleField) -> ColumnRef {
        match field {
            ScheduleField::Day => self.day,
            ScheduleField::Time => self.time,
            ScheduleField::Room => self.room,
            ScheduleField::SessionType => self.session_type,
            ScheduleField::Teacher => self.teacher,
            ScheduleField::Subject => self.subject,
        }
    }
}

/// 课表文档的列布局
///
/// 源文档没有可靠的语义表头，两周的数据镜像排列在同一行的不同列区间。
/// 所有列偏移都集中在这里，调整时无需改动匹配逻辑。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub even: WeekColumns,
    pub odd: WeekColumns,
}

impl ColumnLayout {
    /// 源文档的固定布局（0 为 A 列）
    // The odd week has no day column of its own; column 13 is read when present
    // and the even week's day column otherwise. Kept as found, possibly a bug.
    pub const STANDARD: ColumnLayout = ColumnLayout {
        even: WeekColumns {
            day: ColumnRef::At(1),
            time: ColumnRef::At(3),
            room: ColumnRef::At(4),
            session_type: ColumnRef::At(5),
            teacher: ColumnRef::At(6),
            subject: ColumnRef::At(7),
        },
        odd: WeekColumns {
            day: ColumnRef::AtOr(13, 1),
            time: ColumnRef::At(12),
            room: ColumnRef::At(11),
            session_type: ColumnRef::At(10),
            teacher: ColumnRef::At(9),
            subject: ColumnRef::At(8),
        },
    };

    pub fn week(&self, parity: WeekParity) -> &WeekColumns {
        match parity {
            WeekParity::Even => &self.even,
            WeekParity::Odd => &self.odd,
        }
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout::STANDARD
    }
}

/// 一周（奇或偶）的课表数据，缺失字段为空字符串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleHalf {
    pub day: String,
    pub time: String,
    pub room: String,
    pub session_type: String,
    pub teacher_text: String,
    pub subject: String,
}

impl ScheduleHalf {
    /// 按列布局从单元格中投影出一周数据
    pub fn project(cells: &[String], columns: &WeekColumns) -> Self {
        let read = |field| columns.column(field).read(cells).trim().to_string();
        Self {
            day: read(ScheduleField::Day),
            time: read(ScheduleField::Time),
            room: read(ScheduleField::Room),
            session_type: read(ScheduleField::SessionType),
            teacher_text: read(ScheduleField::Teacher),
            subject: read(ScheduleField::Subject),
        }
    }

    pub fn get(&self, field: ScheduleField) -> &str {
        match field {
            ScheduleField::Day => &self.day,
            ScheduleField::Time => &self.time,
            ScheduleField::Room => &self.room,
            ScheduleField::SessionType => &self.session_type,
            ScheduleField::Teacher => &self.teacher_text,
            ScheduleField::Subject => &self.subject,
        }
    }

    pub fn is_empty(&self) -> bool {
        ScheduleField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// 已加载的表格行
///
/// 原始单元格保留用于匹配，两周数据在加载时一次性投影
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub cells: Vec<String>,
    pub even: ScheduleHalf,
    pub odd: ScheduleHalf,
}

impl ScheduleRow {
    pub fn from_cells(cells: Vec<String>, layout: &ColumnLayout) -> Self {
        let even = ScheduleHalf::project(&cells, layout.week(WeekParity::Even));
        let odd = ScheduleHalf::project(&cells, layout.week(WeekParity::Odd));
        Self { cells, even, odd }
    }
}

/// 一条教师匹配记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// 名单中匹配到的名称
    pub teacher_name: String,
    /// 由表格名推导出的小组标识
    pub group: String,
    pub even_week: ScheduleHalf,
    pub odd_week: ScheduleHalf,
}
