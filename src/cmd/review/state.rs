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

use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::oneshot::Sender;

use cardinal_core::easiness::EasinessScheduler;
use cardinal_core::rotation::RotationScheduler;
use cardinal_core::types::card::Card;
use cardinal_core::types::timestamp::Timestamp;

/// The scheduler behind the session, one variant per review mode.
pub enum Session {
    Rotation(RotationScheduler),
    Easiness(EasinessScheduler),
}

impl Session {
    pub fn current_card(&self) -> &Card {
        match self {
            Session::Rotation(scheduler) => scheduler.current_card(),
            Session::Easiness(scheduler) => scheduler.current_card(),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub total_cards: usize,
    pub session_started_at: Timestamp,
    pub mutable: Arc<Mutex<MutableState>>,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct MutableState {
    pub reveal: bool,
    pub session: Session,
    pub finished_at: Option<Timestamp>,
}
