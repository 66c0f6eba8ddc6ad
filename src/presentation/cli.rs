// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 课表下载与教师搜索
#[derive(Parser, Debug)]
#[command(
    name = "schedule-scout",
    author,
    version,
    about = "Download schedule spreadsheets and find teachers in them",
    after_help = "Examples:\n  \
                  schedule-scout folder set ./schedules\n  \
                  schedule-scout roster add \"Петров Алексей Борисович\"\n  \
                  schedule-scout run\n  \
                  schedule-scout search --folder ./schedules"
)]
pub struct Cli {
    /// Download folder (defaults to the last used folder)
    #[arg(long, short = 'f', global = true, env = "SCHEDULE_SCOUT_FOLDER")]
    pub folder: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover and download schedule documents
    Download,

    /// Convert downloaded documents and search them for roster names
    Search,

    /// Download, then search
    Run,

    /// Manage the teacher roster
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },

    /// Show or change the download folder
    Folder {
        #[command(subcommand)]
        command: FolderCommand,
    },

    /// Overwrite existing tables when converting
    Overwrite {
        #[arg(value_enum)]
        mode: Toggle,
    },
}

#[derive(Subcommand, Debug)]
pub enum RosterCommand {
    /// List roster names
    List,

    /// Add a name; full names are shortened to "Surname I.P."
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Remove a name, or a 1-based position from `roster list`
    Remove {
        #[arg(required = true, num_args = 1..)]
        target: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommand {
    /// Print the stored folder
    Show,

    /// Validate and store a folder
    Set { path: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}
