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

use serde::Serialize;

use crate::types::card_hash::CardHash;

pub type Easiness = f64;

/// Initial easiness when the data source does not specify one.
pub const DEFAULT_EASINESS: Easiness = 2.5;

/// Easiness never drops below this floor.
pub const EASINESS_FLOOR: Easiness = 1.3;

/// A single flashcard. Everything except `easiness` is fixed once parsed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Card {
    /// The title of the card, from its `#` heading.
    title: String,
    /// The prompt side.
    front: String,
    /// The answer side.
    back: String,
    /// The deck file's category label.
    category: String,
    /// Recall easiness, adjusted by ratings in the linear review mode.
    easiness: Easiness,
}

impl Card {
    pub fn new(
        title: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
        category: impl Into<String>,
        easiness: Easiness,
    ) -> Self {
        Card {
            title: title.into(),
            front: front.into(),
            back: back.into(),
            category: category.into(),
            easiness: f64::max(easiness, EASINESS_FLOOR),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn easiness(&self) -> Easiness {
        self.easiness
    }

    /// The card's identity: a hash of its textual content. Fields are
    /// length-prefixed so adjacent fields cannot collide.
    pub fn hash(&self) -> CardHash {
        let mut buf: Vec<u8> = Vec::new();
        for field in [&self.title, &self.front, &self.back, &self.category] {
            buf.extend_from_slice(&(field.len() as u64).to_le_bytes());
            buf.extend_from_slice(field.as_bytes());
        }
        CardHash::hash_bytes(&buf)
    }

    /// Apply a rating delta, clamped to the easiness floor.
    pub(crate) fn bump_easiness(&mut self, delta: f64) -> Easiness {
        self.easiness = f64::max(self.easiness + delta, EASINESS_FLOOR);
        self.easiness
    }
}
