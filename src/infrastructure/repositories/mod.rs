// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod json_store;
pub mod roster_repo_impl;
pub mod state_repo_impl;

pub use roster_repo_impl::RosterRepositoryImpl;
pub use state_repo_impl::StateRepositoryImpl;
