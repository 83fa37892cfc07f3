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

use cardinal_core::error::Fallible;

use crate::collection::Collection;

/// Load a collection and report what was found. A load failure is printed
/// as the full JSON error report (type, message, traceback) before exiting.
pub fn check_collection(path: Option<String>) -> Fallible<()> {
    let collection = match Collection::load(path) {
        Ok(collection) => collection,
        Err(report) => {
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
            exit(1);
        }
    };
    for card in &collection.cards {
        println!("{}  {}", card.hash(), card.title());
    }
    let mut categories: Vec<&String> = collection.categories.iter().collect();
    categories.sort();
    println!(
        "OK: {} cards in {} categories: {}.",
        collection.cards.len(),
        categories.len(),
        categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
