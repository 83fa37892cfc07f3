// Copyright 2025 Fernando Borretti
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

use std::process::exit;

use clap::Parser;
use tokio::spawn;

use cardinal_core::error::Fallible;
use cardinal_core::rotation::DEFAULT_REFRESH_THRESHOLD;
use cardinal_core::types::timestamp::Timestamp;

use crate::cmd::check::check_collection;
use crate::cmd::review::server::ReviewMode;
use crate::cmd::review::server::ServerConfig;
use crate::cmd::review::server::start_server;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Review cards through a web interface.
    Review {
        /// Path to a card file or a directory of card files. By default, the current working directory is used.
        path: Option<String>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Which scheduling mode to use:
        #[arg(long, default_value_t = ReviewMode::Rotation)]
        mode: ReviewMode,
        /// How many iterations between forced reviews of missed cards.
        #[arg(long, default_value_t = DEFAULT_REFRESH_THRESHOLD)]
        refresh_threshold: u64,
        /// Only review cards from this category.
        #[arg(long)]
        from_category: Option<String>,
        /// Whether to shuffle the deck before the session. Default is true.
        #[arg(long)]
        shuffle: Option<bool>,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Check that a collection of card files parses cleanly.
    Check {
        /// Path to a card file or a directory of card files. By default, the current working directory is used.
        path: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Review {
            path,
            host,
            port,
            mode,
            refresh_threshold,
            from_category,
            shuffle,
            open_browser,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                path,
                host,
                port,
                session_started_at: Timestamp::now(),
                mode,
                refresh_threshold,
                category_filter: from_category,
                shuffle: shuffle.unwrap_or(true),
            };
            start_server(config).await
        }
        Command::Check { path } => check_collection(path),
    }
}
