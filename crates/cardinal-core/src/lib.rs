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

//! cardinal-core: Core library for the cardinal flashcard review client.
//!
//! This library provides the parts of the review engine that are
//! independent of any user interface:
//! - Parsing plain-text card files
//! - The pool-rotation scheduler: draw-without-replacement over unseen
//!   cards, with periodic forced review of previously-missed ones
//! - The linear easiness-rating scheduler
//! - Card types and identity hashing

pub mod easiness;
pub mod error;
pub mod parser;
pub mod rng;
pub mod rotation;
pub mod types;

// Re-exports for convenience
pub use easiness::EasinessScheduler;
pub use error::{ErrorKind, ErrorReport, Fallible, fail};
pub use parser::parse_card_file;
pub use rotation::{DEFAULT_REFRESH_THRESHOLD, PoolCounts, RotationScheduler};
pub use types::card::{Card, DEFAULT_EASINESS, EASINESS_FLOOR, Easiness};
pub use types::card_hash::CardHash;
pub use types::timestamp::Timestamp;
