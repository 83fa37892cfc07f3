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

use axum::extract::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use cardinal_core::types::timestamp::Timestamp;

use crate::cmd::review::state::ServerState;
use crate::cmd::review::state::Session;

#[derive(Deserialize)]
pub struct ActionForm {
    action: String,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<ActionForm>,
) -> Redirect {
    {
        let mut m = state.mutable.lock().unwrap();
        match form.action.as_str() {
            "Reveal" => {
                m.reveal = true;
            }
            "Correct" | "Incorrect" => {
                if let Session::Rotation(scheduler) = &mut m.session {
                    // The draw can only fail on an empty deck, which the
                    // scheduler's constructor rules out.
                    if let Err(e) = scheduler.advance(form.action == "Correct") {
                        log::error!("{e}");
                    }
                }
                m.reveal = false;
            }
            "Reset" => {
                if let Session::Rotation(scheduler) = &mut m.session {
                    scheduler.reset();
                }
                m.reveal = false;
            }
            "Next" => {
                if let Session::Easiness(scheduler) = &mut m.session {
                    scheduler.advance_next();
                }
                m.reveal = false;
            }
            "Previous" => {
                if let Session::Easiness(scheduler) = &mut m.session {
                    scheduler.advance_previous();
                }
                m.reveal = false;
            }
            "End" => {
                m.finished_at = Some(Timestamp::now());
            }
            "Shutdown" => {
                if let Some(tx) = state.shutdown_tx.lock().unwrap().take() {
                    let _ = tx.send(());
                }
            }
            action => {
                if let Some(score) = action.strip_prefix("Rate-") {
                    if let Session::Easiness(scheduler) = &mut m.session {
                        match score.parse::<u8>() {
                            Ok(score) => {
                                if let Err(e) = scheduler.rate(score) {
                                    log::warn!("{e}");
                                }
                            }
                            Err(_) => log::warn!("malformed rating action: {action}"),
                        }
                    }
                }
            }
        }
    }
    Redirect::to("/")
}
