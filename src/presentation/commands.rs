// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::{RunStatus, SearchReport};
use crate::application::usecases::{DownloadSchedulesUseCase, SearchTeachersUseCase};
use crate::config::settings::Settings;
use crate::domain::models::{AppState, CancellationSignal, ChannelSink, RunContext};
use crate::domain::repositories::{RosterRepository, StateRepository};
use crate::domain::services::{AddOutcome, RemoveTarget, RosterService};
use crate::infrastructure::repositories::{RosterRepositoryImpl, StateRepositoryImpl};
use crate::infrastructure::{result_writer, workspace};
use crate::presentation::cli::{Cli, Commands, FolderCommand, RosterCommand, Toggle};
use crate::presentation::printer;
use crate::utils::errors::ScheduleError;

/// 命令行外壳
///
/// 只负责读写名单与状态文件、驱动用例并打印事件，不持有核心状态
pub struct App {
    settings: Settings,
    roster: Arc<dyn RosterRepository>,
    state: Arc<dyn StateRepository>,
    cancel: CancellationSignal,
}

impl App {
    pub fn new(settings: Settings, cancel: CancellationSignal) -> Self {
        let roster = Arc::new(RosterRepositoryImpl::new(&settings.paths.roster_file));
        let state = Arc::new(StateRepositoryImpl::new(&settings.paths.state_file));
        Self {
            settings,
            roster,
            state,
            cancel,
        }
    }

    pub async fn dispatch(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Download => {
                let folder = self.folder_for_run(cli.folder)?;
                self.download(&folder).await.map(|_| ())
            }
            Commands::Search => {
                let folder = self.folder_for_run(cli.folder)?;
                self.search(&folder).await
            }
            Commands::Run => {
                let folder = self.folder_for_run(cli.folder)?;
                if self.download(&folder).await? == RunStatus::Cancelled {
                    return Ok(());
                }
                self.search(&folder).await
            }
            Commands::Roster { command } => self.roster(command),
            Commands::Folder { command } => self.folder(command),
            Commands::Overwrite { mode } => {
                let mut state = self.load_state();
                state.overwrite_tables = mode == Toggle::On;
                self.state.save(&state)?;
                println!(
                    "Overwrite existing tables: {}",
                    if state.overwrite_tables { "on" } else { "off" }
                );
                Ok(())
            }
        }
    }

    async fn download(&self, folder: &Path) -> Result<RunStatus> {
        let use_case = DownloadSchedulesUseCase::from_settings(&self.settings)?;
        let (ctx, printer) = self.start_run();
        let result = use_case.execute(folder, &ctx).await;
        drop(ctx);
        printer.await.ok();

        let report = result?;
        println!(
            "Download {}: {} link(s), {} downloaded, {} skipped, {} failed, {} cancelled",
            report.status,
            report.links_found,
            report.summary.downloaded(),
            report.summary.skipped(),
            report.summary.failed(),
            report.summary.cancelled()
        );
        Ok(report.status)
    }

    async fn search(&self, folder: &Path) -> Result<()> {
        let overwrite = self.load_state().overwrite_tables;
        let use_case = SearchTeachersUseCase::new(self.roster.clone());
        let (ctx, printer) = self.start_run();
        let result = use_case.execute(folder, overwrite, &ctx).await;
        drop(ctx);
        printer.await.ok();

        match result {
            Ok(report) => {
                print_search(&report);
                Ok(())
            }
            Err(ScheduleError::NoDocuments(dir)) => {
                println!("No spreadsheet documents in {}", dir.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 每次运行开始前重置取消信号，并启动唯一的事件打印任务
    fn start_run(&self) -> (RunContext, tokio::task::JoinHandle<()>) {
        self.cancel.reset();
        let (sink, rx) = ChannelSink::new();
        let printer = tokio::spawn(printer::print_events(rx));
        (RunContext::new(self.cancel.clone(), Arc::new(sink)), printer)
    }

    fn roster(&self, command: RosterCommand) -> Result<()> {
        let service = RosterService::new(self.roster.clone());
        match command {
            RosterCommand::List => {
                let roster = service.list()?;
                if roster.is_empty() {
                    println!("Roster is empty.");
                }
                for (i, name) in roster.names().iter().enumerate() {
                    println!("{:>3}. {}", i + 1, name);
                }
            }
            RosterCommand::Add { name } => match service.add(&name.join(" "))? {
                AddOutcome::Added(name) => println!("Added {name}"),
                AddOutcome::Duplicate(name) => println!("{name} is already in the roster"),
                AddOutcome::Empty => bail!("name is empty"),
            },
            RosterCommand::Remove { target } => {
                let removed = service.remove(&RemoveTarget::parse(&target.join(" ")))?;
                println!("Removed {removed}");
            }
        }
        Ok(())
    }

    fn folder(&self, command: FolderCommand) -> Result<()> {
        match command {
            FolderCommand::Show => match self.stored_folder() {
                Some(folder) => println!("{}", folder.display()),
                None => println!("No folder set."),
            },
            FolderCommand::Set { path } => {
                workspace::validate_folder(&path)?;
                self.remember_folder(&path)?;
                println!("Folder set to {}", path.display());
            }
        }
        Ok(())
    }

    /// 运行使用的目录：命令行参数优先，其次为上次保存的目录
    fn folder_for_run(&self, requested: Option<PathBuf>) -> Result<PathBuf> {
        match requested {
            Some(path) => {
                workspace::validate_folder(&path)?;
                self.remember_folder(&path)?;
                Ok(path)
            }
            None => self
                .stored_folder()
                .context("no folder set; pass --folder or run `schedule-scout folder set <DIR>`"),
        }
    }

    /// 已保存且仍可写的目录；不可用的目录会被清除
    fn stored_folder(&self) -> Option<PathBuf> {
        let mut state = self.load_state();
        let folder = state.last_folder.clone()?;
        if workspace::validate_folder(&folder).is_ok() {
            return Some(folder);
        }
        warn!("Stored folder {} is no longer usable", folder.display());
        state.last_folder = None;
        if let Err(e) = self.state.save(&state) {
            warn!("Failed to save state: {}", e);
        }
        None
    }

    fn remember_folder(&self, folder: &Path) -> Result<()> {
        let mut state = self.load_state();
        if state.last_folder.as_deref() != Some(folder) {
            state.last_folder = Some(folder.to_path_buf());
            self.state.save(&state)?;
            info!("Stored folder {}", folder.display());
        }
        Ok(())
    }

    fn load_state(&self) -> AppState {
        self.state.load().unwrap_or_else(|e| {
            warn!("Failed to load state, using defaults: {}", e);
            AppState::default()
        })
    }
}

fn print_search(report: &SearchReport) {
    println!(
        "Search {}: {} document(s), {} new table(s), {} table(s) scanned",
        report.status, report.documents, report.tables_written, report.tables_scanned
    );
    println!("{}", result_writer::format_results(&report.records));
    if let Some(path) = &report.result_path {
        println!("Results saved to {}", path.display());
    }
}
