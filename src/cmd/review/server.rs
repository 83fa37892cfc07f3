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

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use clap::ValueEnum;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use cardinal_core::easiness::EasinessScheduler;
use cardinal_core::error::ErrorKind;
use cardinal_core::error::Fallible;
use cardinal_core::error::fail;
use cardinal_core::rng::TinyRng;
use cardinal_core::rng::shuffle;
use cardinal_core::rotation::RotationScheduler;
use cardinal_core::types::card::Card;
use cardinal_core::types::timestamp::Timestamp;

use crate::cmd::review::get::get_handler;
use crate::cmd::review::post::post_handler;
use crate::cmd::review::state::MutableState;
use crate::cmd::review::state::ServerState;
use crate::cmd::review::state::Session;
use crate::collection::Collection;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum ReviewMode {
    /// Pool rotation with periodic forced review of missed cards.
    Rotation,
    /// Fixed deck order with 1-5 easiness ratings.
    Easiness,
}

impl Display for ReviewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewMode::Rotation => write!(f, "rotation"),
            ReviewMode::Easiness => write!(f, "easiness"),
        }
    }
}

pub struct ServerConfig {
    pub path: Option<String>,
    pub host: String,
    pub port: u16,
    pub session_started_at: Timestamp,
    pub mode: ReviewMode,
    pub refresh_threshold: u64,
    pub category_filter: Option<String>,
    pub shuffle: bool,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let Collection { cards, categories } = Collection::load(config.path)?;

    let cards = filter_deck(cards, &categories, config.category_filter)?;
    if cards.is_empty() {
        println!("No cards to review.");
        return Ok(());
    }
    let total_cards = cards.len();

    // The deck arrives sorted by hash; shuffle it for the session. The same
    // RNG then drives the scheduler's draws.
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64;
    let mut rng = TinyRng::from_seed(seed);
    let cards = if config.shuffle {
        shuffle(cards, &mut rng)
    } else {
        cards
    };

    let session = match config.mode {
        ReviewMode::Rotation => Session::Rotation(RotationScheduler::new(
            cards,
            config.refresh_threshold,
            rng,
        )?),
        ReviewMode::Easiness => Session::Easiness(EasinessScheduler::new(cards)?),
    };

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        total_cards,
        session_started_at: config.session_started_at,
        mutable: Arc::new(Mutex::new(MutableState {
            reveal: false,
            session,
            finished_at: None,
        })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    // The session cycles indefinitely, so "complete" means the user ended
    // it deliberately.
    let mutable = state.mutable.lock().unwrap();
    if mutable.finished_at.is_some() {
        Ok(())
    } else {
        fail(ErrorKind::Interrupted)
    }
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}

fn filter_deck(
    cards: Vec<Card>,
    categories: &HashSet<String>,
    category_filter: Option<String>,
) -> Fallible<Vec<Card>> {
    match category_filter {
        Some(filter) => {
            if !categories.contains(&filter) {
                return fail(ErrorKind::Argument(format!("unknown category: {filter}")));
            }
            Ok(cards
                .into_iter()
                .filter(|card| card.category() == filter)
                .collect())
        }
        None => Ok(cards),
    }
}
