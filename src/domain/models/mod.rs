// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod app_state;
pub mod download;
pub mod link;
pub mod roster;
pub mod run_context;
pub mod schedule;
pub mod table;

pub use app_state::AppState;
pub use download::{DownloadOutcome, DownloadSummary, FailureKind, LinkResult};
pub use link::Link;
pub use roster::TeacherRoster;
pub use run_context::{
    CancellationSignal, ChannelSink, NullSink, ProgressSink, RunContext, RunEvent, Stage,
};
pub use schedule::{
    ColumnLayout, ColumnRef, MatchRecord, ScheduleField, ScheduleHalf, ScheduleRow, WeekColumns,
    WeekParity,
};
pub use table::ConvertedTable;
