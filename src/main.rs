// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use schedule_scout::config::settings::Settings;
use schedule_scout::domain::models::CancellationSignal;
use schedule_scout::presentation::cli::Cli;
use schedule_scout::presentation::commands::App;
use schedule_scout::utils::telemetry;
use tracing::{error, info};

/// 主函数
///
/// 初始化日志与配置，监听 Ctrl-C 作为取消信号，然后分发命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    let cli = Cli::parse();

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Ctrl-C cancels the current run at its next checkpoint
    let cancel = CancellationSignal::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Cancellation requested");
                        cancel.cancel();
                    }
                    Err(err) => {
                        error!("Unable to listen for shutdown signal: {}", err);
                        break;
                    }
                }
            }
        });
    }

    App::new(settings, cancel).dispatch(cli).await
}
