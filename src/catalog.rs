// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Assembly of parsed messages into a flat catalog.

use crate::po::Message;
use crate::CompileOptions;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Separates the context from the message id in a catalog key.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Separates the singular from the plural id in a catalog key, and the
/// plural forms from each other in a catalog value.
pub const PLURAL_SEPARATOR: char = '\0';

/// A mapping from catalog keys to translations.
///
/// Keys combine the context, id and plural id of a message. Entries
/// are kept sorted by the bytes of their keys, which is the order of
/// the tables in a compiled catalog. The header entry with the empty
/// key is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: BTreeMap::from([(String::new(), String::new())]),
        }
    }
}

impl Catalog {
    /// Create a catalog with an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a translation, returning the translation it replaced.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The catalog metadata stored under the empty key.
    pub fn header(&self) -> &str {
        self.get("").unwrap_or_default()
    }

    /// Number of entries, including the header.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries sorted by key.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Counts of message statuses seen while assembling a catalog.
///
/// The header is not counted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    pub translated_count: usize,
    pub fuzzy_count: usize,
    pub untranslated_count: usize,
}

impl Statistics {
    /// Returns the total number of messages.
    pub fn total(&self) -> usize {
        self.translated_count + self.fuzzy_count + self.untranslated_count
    }

    fn record(&mut self, message: &Message) {
        if message.is_header() {
            return;
        }
        if message.is_fuzzy() {
            self.fuzzy_count += 1;
        } else if message.is_translated() {
            self.translated_count += 1;
        } else {
            self.untranslated_count += 1;
        }
    }
}

impl Display for Statistics {
    /// Formats the statistics the way `msgfmt --statistics` does.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fn counted(count: usize, singular: &str, plural: &str) -> String {
            format!("{count} {}", if count == 1 { singular } else { plural })
        }

        write!(
            f,
            "{}",
            counted(
                self.translated_count,
                "translated message",
                "translated messages"
            )
        )?;
        if self.fuzzy_count > 0 {
            write!(
                f,
                ", {}",
                counted(self.fuzzy_count, "fuzzy translation", "fuzzy translations")
            )?;
        }
        if self.untranslated_count > 0 {
            write!(
                f,
                ", {}",
                counted(
                    self.untranslated_count,
                    "untranslated message",
                    "untranslated messages"
                )
            )?;
        }
        write!(f, ".")
    }
}

/// Fold parsed messages into a catalog.
///
/// Messages flagged as `fuzzy` are skipped unless
/// [`CompileOptions::use_fuzzy`] is set. A later message with the
/// same key replaces an earlier one.
///
/// # Examples
///
/// ```
/// use gettext_msgfmt::catalog::assemble;
/// use gettext_msgfmt::po::parse;
/// use gettext_msgfmt::CompileOptions;
///
/// let messages = parse("msgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"Ouvrir\"\n").unwrap();
/// let (catalog, stats) = assemble(messages, &CompileOptions::default());
/// assert_eq!(catalog.get("menu\u{4}Open"), Some("Ouvrir"));
/// assert_eq!(catalog.header(), "");
/// assert_eq!(stats.translated_count, 1);
/// ```
pub fn assemble(
    messages: impl IntoIterator<Item = Message>,
    options: &CompileOptions,
) -> (Catalog, Statistics) {
    let mut entries = BTreeMap::new();
    let mut stats = Statistics::default();

    for message in messages {
        stats.record(&message);
        if message.is_fuzzy() && !options.use_fuzzy {
            debug!("Skipping fuzzy message on line {}", message.line);
            continue;
        }

        let line = message.line;
        let (key, value) = into_entry(message);
        if let Some(previous) = entries.insert(key, value) {
            warn!("Line {line}: message replaces an earlier definition (was {previous:?})");
        }
    }

    entries.entry(String::new()).or_default();
    debug!("Assembled {} catalog entries", entries.len());
    (Catalog { entries }, stats)
}

/// Build the catalog key and value of a message.
fn into_entry(message: Message) -> (String, String) {
    let Message {
        context,
        id,
        id_plural,
        mut translations,
        ..
    } = message;

    let (key, value) = match id_plural {
        Some(id_plural) => {
            let max_index = translations.keys().next_back().copied().unwrap_or(0);
            let value = (0..=max_index)
                .map(|idx| translations.get(&idx).map_or("", String::as_str))
                .collect::<Vec<_>>()
                .join(&PLURAL_SEPARATOR.to_string());
            (format!("{id}{PLURAL_SEPARATOR}{id_plural}"), value)
        }
        None => (id, translations.remove(&0).unwrap_or_default()),
    };

    match context {
        Some(context) if !context.is_empty() => {
            (format!("{context}{CONTEXT_SEPARATOR}{key}"), value)
        }
        _ => (key, value),
    }
}
