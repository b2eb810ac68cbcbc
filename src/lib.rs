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

//! Compile GNU Gettext PO files into binary MO catalogs.
//!
//! This crate implements the core of `msgfmt`: PO text is parsed into
//! messages ([`po`]), the messages are folded into a catalog keyed by
//! context, id and plural id ([`catalog`]), and the catalog is laid
//! out in the binary format read by Gettext runtimes ([`mo`]).
//!
//! # Examples
//!
//! ```
//! use gettext_msgfmt::{compile, CompileOptions};
//! use gettext_msgfmt::mo::MoCatalog;
//!
//! let compiled = compile("msgid \"Hello\"\nmsgstr \"Bonjour\"\n", &CompileOptions::default())
//!     .unwrap();
//! let mo = MoCatalog::parse(&compiled.bytes).unwrap();
//! assert_eq!(mo.iter().collect::<Vec<_>>(), vec![("", ""), ("Hello", "Bonjour")]);
//! ```

pub mod catalog;
pub mod error;
pub mod escape;
pub mod mo;
pub mod po;

pub use error::{Error, Result};

use catalog::Statistics;
use log::debug;
use std::fs;
use std::path::Path;

/// Settings for a compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Include messages flagged as `fuzzy`.
    pub use_fuzzy: bool,
}

/// The result of compiling a PO file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    /// The MO file contents.
    pub bytes: Vec<u8>,
    /// Counts of the messages found in the PO file.
    pub statistics: Statistics,
}

/// Compile PO text into the bytes of a MO file.
pub fn compile(text: &str, options: &CompileOptions) -> Result<Compiled> {
    let messages = po::parse(text)?;
    let (catalog, statistics) = catalog::assemble(messages, options);
    let bytes = mo::serialize(&catalog)?;
    Ok(Compiled { bytes, statistics })
}

/// Compile the PO file at `input` and write the MO file to `output`.
///
/// Invalid UTF-8 in the input is replaced rather than rejected. The
/// parent directories of `output` are created if needed. Nothing is
/// written if the input cannot be compiled.
pub fn compile_file(input: &Path, output: &Path, options: &CompileOptions) -> Result<Statistics> {
    let data = fs::read(input)?;
    let text = String::from_utf8_lossy(&data);
    let compiled = compile(&text, options)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &compiled.bytes)?;
    debug!(
        "Wrote {} bytes to {}",
        compiled.bytes.len(),
        output.display()
    );
    Ok(compiled.statistics)
}
