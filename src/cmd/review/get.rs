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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use cardinal_core::easiness::EasinessScheduler;
use cardinal_core::rotation::RotationScheduler;
use cardinal_core::types::card::Card;
use cardinal_core::types::timestamp::Timestamp;

use crate::cmd::review::state::MutableState;
use crate::cmd::review::state::ServerState;
use crate::cmd::review::state::Session;
use crate::cmd::review::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let m = state.mutable.lock().unwrap();
    let body = match m.finished_at {
        Some(finished_at) => render_completion(&state, finished_at),
        None => render_session(&m),
    };
    (StatusCode::OK, Html(page_template(body).into_string()))
}

fn render_session(m: &MutableState) -> Markup {
    let card = m.session.current_card();
    let header = match &m.session {
        Session::Rotation(scheduler) => rotation_header(scheduler),
        Session::Easiness(scheduler) => easiness_header(scheduler),
    };
    let controls = match &m.session {
        Session::Rotation(_) => rotation_controls(m.reveal),
        Session::Easiness(_) => easiness_controls(m.reveal),
    };
    html! {
        div.root {
            (header)
            div.card-container {
                div.card {
                    div.card-header {
                        h2 { (card.title()) }
                        p.category { (card.category()) }
                    }
                    (render_card(card, m.reveal))
                }
            }
            div.controls {
                (controls)
            }
        }
    }
}

fn rotation_header(scheduler: &RotationScheduler) -> Markup {
    let counts = scheduler.counts();
    html! {
        div.header {
            div.indicators {
                p { (counts.pending) " cards remaining" }
                p.correct { (counts.correct) " correctly answered" }
                p.incorrect { (counts.incorrect) " incorrectly answered" }
                p.cycle { "cycle " (scheduler.iteration()) }
            }
            @if scheduler.is_forced_review() {
                p.refresh-badge { "reviewing a missed card" }
            }
            (header_actions())
        }
    }
}

fn easiness_header(scheduler: &EasinessScheduler) -> Markup {
    let position = scheduler.cursor() + 1;
    let easiness = format!("{:.2}", scheduler.current_card().easiness());
    html! {
        div.header {
            div.indicators {
                p { "card " (position) " of " (scheduler.deck_len()) }
                p.easiness { "easiness " (easiness) }
            }
            (header_actions())
        }
    }
}

fn header_actions() -> Markup {
    html! {
        div.header-actions {
            form.header-action action="/" method="post" {
                input id="end" type="submit" name="action" value="End" title="End the session.";
            }
        }
    }
}

fn render_card(card: &Card, reveal: bool) -> Markup {
    html! {
        div.card-content {
            div.question {
                @for line in card.front().lines() {
                    p { (line) }
                }
            }
            @if reveal {
                div.answer {
                    @for line in card.back().lines() {
                        p { (line) }
                    }
                }
            } @else {
                div.answer {}
            }
        }
    }
}

fn rotation_controls(reveal: bool) -> Markup {
    if reveal {
        html! {
            form action="/" method="post" {
                div.answers {
                    input id="incorrect" type="submit" name="action" value="Incorrect" title="Mark the card as missed. Shortcut: left arrow.";
                    input id="correct" type="submit" name="action" value="Correct" title="Mark the card as remembered. Shortcut: right arrow.";
                }
            }
            form action="/" method="post" {
                input id="reset" type="submit" name="action" value="Reset" title="Fold the answered piles back into the deck. Shortcut: r.";
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                input id="reveal" type="submit" name="action" value="Reveal" title="Show the answer. Shortcut: space.";
            }
        }
    }
}

fn easiness_controls(reveal: bool) -> Markup {
    let ratings = if reveal {
        html! {
            form action="/" method="post" {
                div.ratings {
                    @for score in 1..=5u8 {
                        input id=(format!("rate-{score}")) type="submit" name="action" value=(format!("Rate-{score}")) title=(format!("Rate recall {score} of 5. Shortcut: {score}."));
                    }
                }
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                input id="reveal" type="submit" name="action" value="Reveal" title="Show the answer. Shortcut: space.";
            }
        }
    };
    html! {
        (ratings)
        form action="/" method="post" {
            div.nav {
                input id="previous" type="submit" name="action" value="Previous" title="Go to the previous card. Shortcut: left arrow.";
                input id="next" type="submit" name="action" value="Next" title="Go to the next card. Shortcut: right arrow.";
            }
        }
    }
}

fn render_completion(state: &ServerState, finished_at: Timestamp) -> Markup {
    let duration = (finished_at.into_inner() - state.session_started_at.into_inner()).num_seconds();
    html! {
        div.finished {
            h1 { "Session Completed" }
            h2 { "Session Stats" }
            div.stats {
                table {
                    tbody {
                        tr {
                            td.key { "Total Cards" }
                            td.val { (state.total_cards) }
                        }
                        tr {
                            td.key { "Started" }
                            td.val { (state.session_started_at) }
                        }
                        tr {
                            td.key { "Finished" }
                            td.val { (finished_at) }
                        }
                        tr {
                            td.key { "Duration (seconds)" }
                            td.val { (duration) }
                        }
                    }
                }
            }
            div.shutdown-container {
                form action="/" method="post" {
                    input #shutdown .shutdown-button type="submit" name="action" value="Shutdown" title="Shut down the server";
                }
            }
        }
    }
}
