// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod download_schedules;
pub mod search_teachers;

pub use download_schedules::DownloadSchedulesUseCase;
pub use search_teachers::SearchTeachersUseCase;
