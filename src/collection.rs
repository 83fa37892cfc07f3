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
use std::env;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use cardinal_core::error::ErrorKind;
use cardinal_core::error::ErrorReport;
use cardinal_core::error::Fallible;
use cardinal_core::error::fail;
use cardinal_core::parser::parse_card_file;
use cardinal_core::types::card::Card;

use crate::utils::expand_tilde;

/// A loaded deck: the cards plus the set of category labels in use.
pub struct Collection {
    pub cards: Vec<Card>,
    pub categories: HashSet<String>,
}

impl Collection {
    /// Load cards from a card file or a directory of `.md` card files.
    /// Defaults to the current working directory.
    pub fn load(path: Option<String>) -> Fallible<Self> {
        let path: PathBuf = match path {
            Some(p) => expand_tilde(&p),
            None => env::current_dir()?,
        };

        let files: Vec<PathBuf> = if path.is_file() {
            vec![path]
        } else if path.is_dir() {
            let mut files = Vec::new();
            for entry in WalkDir::new(&path) {
                let entry = entry.map_err(|e| {
                    ErrorReport::with_traceback(
                        ErrorKind::FileRead(path.display().to_string()),
                        e.to_string(),
                    )
                })?;
                let p = entry.path();
                if p.is_file() && p.extension().is_some_and(|ext| ext == "md") {
                    files.push(p.to_path_buf());
                }
            }
            files
        } else {
            return fail(ErrorKind::Argument(format!(
                "no such file or directory: {}",
                path.display()
            )));
        };

        let mut cards: Vec<Card> = Vec::new();
        for file in files {
            let category = category_name(&file)?;
            let text = read_to_string(&file).map_err(|e| {
                ErrorReport::with_traceback(
                    ErrorKind::FileRead(file.display().to_string()),
                    e.to_string(),
                )
            })?;
            let source_path = file.display().to_string();
            cards.extend(parse_card_file(&category, &source_path, &text)?);
            log::debug!("loaded {source_path}");
        }

        // Cards are sorted by their hash to make subsequent code more
        // deterministic, then deduplicated.
        cards.sort_by_key(|c| c.hash());
        cards.dedup_by_key(|c| c.hash());

        let categories: HashSet<String> =
            cards.iter().map(|c| c.category().to_string()).collect();
        Ok(Collection { cards, categories })
    }
}

/// Derive a category label from the file stem: `-` and `_` become word
/// breaks and each word is capitalized.
fn category_name(path: &Path) -> Fallible<String> {
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
        ErrorReport::new(ErrorKind::Argument(format!(
            "invalid file name: {}",
            path.display()
        )))
    })?;
    let name = stem
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Ok(name)
}
