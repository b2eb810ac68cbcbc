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

//! Errors raised while compiling or reading catalogs.

use thiserror::Error;

use crate::escape::EscapeError;

/// The error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A directive or continuation line does not hold a string
    /// enclosed in double quotes.
    #[error("line {line}: invalid PO string: {text:?}")]
    Quoting { line: usize, text: String },

    /// A numeric escape sequence could not be resolved.
    #[error("line {line}: {source}")]
    Escape {
        line: usize,
        #[source]
        source: EscapeError,
    },

    /// The index in `msgstr[n]` is not a non-negative integer.
    #[error("line {line}: invalid plural index in {text:?}")]
    PluralIndex { line: usize, text: String },

    /// The catalog does not fit into the 32-bit offsets of the MO format.
    #[error("catalog is too large for the MO format ({0} bytes)")]
    TooLarge(usize),

    #[error("invalid MO file: {0}")]
    InvalidMo(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
