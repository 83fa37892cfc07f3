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
use crate::rng::TinyRng;
use crate::types::card::Card;

/// Forced-review cadence used when the caller does not configure one.
pub const DEFAULT_REFRESH_THRESHOLD: u64 = 6;

/// Aggregate pool sizes, for progress displays.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PoolCounts {
    pub pending: usize,
    pub correct: usize,
    pub incorrect: usize,
}

/// How the card on display was obtained.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Origin {
    /// Taken out of `pending`; the scheduler holds the only handle.
    Drawn,
    /// Re-shown from `incorrect` without removal.
    Refresh,
}

/// Pool-rotation scheduler.
///
/// Cards unseen this round are drawn without replacement from `pending`;
/// every `refresh_threshold` iterations a previously-missed card is re-drawn
/// from `incorrect` without removing it, so it stays flagged until it is
/// answered correctly through the normal path; `reset` rotates the answered
/// piles back into `pending` so a new round can begin.
///
/// Cards live in a fixed arena and the pools hold indices into it, so a card
/// moves between pools as a handle and is never copied, created, or
/// destroyed after construction.
pub struct RotationScheduler {
    arena: Vec<Card>,
    pending: Vec<usize>,
    correct: Vec<usize>,
    incorrect: Vec<usize>,
    current: usize,
    origin: Origin,
    iteration: u64,
    refresh_threshold: u64,
    rng: TinyRng,
}

impl RotationScheduler {
    /// Build a scheduler from the full deck. The first card goes on display
    /// and out of `pending`; the rest form the draw pool.
    pub fn new(cards: Vec<Card>, refresh_threshold: u64, rng: TinyRng) -> Fallible<Self> {
        if cards.is_empty() {
            return fail(ErrorKind::EmptyDeck);
        }
        if refresh_threshold == 0 {
            return fail(ErrorKind::Argument(
                "refresh threshold must be at least 1".to_string(),
            ));
        }
        let pending: Vec<usize> = (1..cards.len()).collect();
        Ok(RotationScheduler {
            arena: cards,
            pending,
            correct: Vec::new(),
            incorrect: Vec::new(),
            current: 0,
            origin: Origin::Drawn,
            iteration: 1,
            refresh_threshold,
            rng,
        })
    }

    /// The card on display.
    pub fn current_card(&self) -> &Card {
        &self.arena[self.current]
    }

    /// True when the next draw is due to come from the incorrect pool.
    pub fn is_refresh_due(&self) -> bool {
        self.pending.len() > self.refresh_threshold as usize
            && !self.incorrect.is_empty()
            && self.iteration % self.refresh_threshold == 0
    }

    /// True when the card on display was re-drawn from the incorrect pool.
    pub fn is_forced_review(&self) -> bool {
        self.origin == Origin::Refresh
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            pending: self.pending.len(),
            correct: self.correct.len(),
            incorrect: self.incorrect.len(),
        }
    }

    /// File the answered card and draw the next one.
    ///
    /// A forced-review card is never filed: its handle already sits in
    /// `incorrect`, and it leaves that pool only by being answered through
    /// the normal pending path after a reset.
    pub fn advance(&mut self, was_correct: bool) -> Fallible<&Card> {
        let forced_review = self.is_forced_review();
        if was_correct || forced_review {
            self.iteration += 1;
        }
        let draw_from_incorrect = self.is_refresh_due();
        if !forced_review {
            if was_correct {
                self.correct.push(self.current);
            } else {
                self.incorrect.push(self.current);
            }
        }
        if self.pending.is_empty() {
            self.reset();
        }
        if draw_from_incorrect && !self.incorrect.is_empty() {
            let i = self.rng.generate(self.incorrect.len() as u32) as usize;
            self.current = self.incorrect[i];
            self.origin = Origin::Refresh;
        } else {
            // Defensive: the refresh condition guards on a non-empty
            // incorrect pool, so the fallback should be unreachable.
            if self.pending.is_empty() {
                self.reset();
            }
            if self.pending.is_empty() {
                return fail(ErrorKind::PoolUnderflow);
            }
            let i = self.rng.generate(self.pending.len() as u32) as usize;
            self.current = self.pending.swap_remove(i);
            self.origin = Origin::Drawn;
        }
        Ok(&self.arena[self.current])
    }

    /// Rotate the answered piles back into the draw pool and restart the
    /// cycle counter. When the round ran out of pending cards while misses
    /// remain, the correct pile stays parked until a later reset.
    pub fn reset(&mut self) {
        if !self.pending.is_empty() || self.incorrect.is_empty() {
            self.pending.append(&mut self.correct);
        }
        self.pending.append(&mut self.incorrect);
        self.iteration = 1;
    }
}
