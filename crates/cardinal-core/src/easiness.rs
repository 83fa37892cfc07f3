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

use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card::Easiness;

/// Easiness delta for a rating. Ratings run from 1 (blackout) to 5
/// (effortless recall).
fn rating_delta(score: u8) -> Option<f64> {
    match score {
        1 => Some(-0.3),
        2 => Some(-0.15),
        3 => Some(0.0),
        4 => Some(0.1),
        5 => Some(0.2),
        _ => None,
    }
}

/// Linear review mode: the deck keeps its load order, navigation wraps in
/// both directions, and a rating adjusts the current card's easiness. No
/// pools, no refresh.
pub struct EasinessScheduler {
    deck: Vec<Card>,
    cursor: usize,
}

impl EasinessScheduler {
    pub fn new(deck: Vec<Card>) -> Fallible<Self> {
        if deck.is_empty() {
            return fail(ErrorKind::EmptyDeck);
        }
        Ok(EasinessScheduler { deck, cursor: 0 })
    }

    /// The card at the cursor.
    pub fn current_card(&self) -> &Card {
        &self.deck[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn advance_next(&mut self) {
        self.cursor = (self.cursor + 1) % self.deck.len();
    }

    pub fn advance_previous(&mut self) {
        self.cursor = (self.cursor + self.deck.len() - 1) % self.deck.len();
    }

    /// Apply a 1-5 rating to the current card and return its new easiness.
    /// Out-of-range scores are rejected without touching any state.
    pub fn rate(&mut self, score: u8) -> Fallible<Easiness> {
        let delta = match rating_delta(score) {
            Some(delta) => delta,
            None => return fail(ErrorKind::InvalidRating(score.to_string())),
        };
        Ok(self.deck[self.cursor].bump_easiness(delta))
    }
}
