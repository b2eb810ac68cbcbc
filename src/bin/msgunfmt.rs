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

//! `msgunfmt` turns a binary MO file back into a PO file.
//!
//! Comments, flags and source references are not stored in MO files,
//! so the resulting PO file only has the messages and the header.

use anyhow::Context;
use clap::Parser;
use gettext_msgfmt::catalog::{CONTEXT_SEPARATOR, PLURAL_SEPARATOR};
use gettext_msgfmt::mo::MoCatalog;
use log::debug;
use polib::catalog::Catalog;
use polib::message::Message;
use polib::metadata::CatalogMetadata;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(about = "Convert a binary MO file into a PO file.")]
struct Args {
    /// The MO file to read.
    #[arg(id = "input.mo")]
    input: PathBuf,
    /// The PO file to write.
    #[arg(short, long, value_name = "output.po")]
    output: PathBuf,
}

/// Build a PO catalog from the entries of a MO file.
fn to_po_catalog(mo: &MoCatalog) -> Catalog {
    let metadata = to_metadata(mo.header().unwrap_or_default());
    let mut catalog = Catalog::new(metadata);
    for (key, value) in mo.iter().filter(|(key, _)| !key.is_empty()) {
        catalog.append_or_update(to_message(key, value));
    }
    catalog
}

/// Fill catalog metadata from the `Key: value` lines of a header.
///
/// Headers written by hand often lack fields, so unknown and missing
/// fields are skipped rather than rejected.
fn to_metadata(header: &str) -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = String::from(value.trim());
        match key.trim() {
            "Project-Id-Version" => metadata.project_id_version = value,
            "POT-Creation-Date" => metadata.pot_creation_date = value,
            "Language" => metadata.language = value,
            "MIME-Version" => metadata.mime_version = value,
            "Content-Type" => metadata.content_type = value,
            "Content-Transfer-Encoding" => metadata.content_transfer_encoding = value,
            key => debug!("Dropping header field {key:?}"),
        }
    }
    metadata
}

/// Split a MO key into context, id and plural id.
fn to_message(key: &str, value: &str) -> Message {
    let (msgctxt, key) = key.split_once(CONTEXT_SEPARATOR).unwrap_or(("", key));
    match key.split_once(PLURAL_SEPARATOR) {
        Some((msgid, msgid_plural)) => Message::build_plural()
            .with_msgctxt(String::from(msgctxt))
            .with_msgid(String::from(msgid))
            .with_msgid_plural(String::from(msgid_plural))
            .with_msgstr_plural(value.split(PLURAL_SEPARATOR).map(String::from).collect())
            .done(),
        None => Message::build_singular()
            .with_msgctxt(String::from(msgctxt))
            .with_msgid(String::from(key))
            .with_msgstr(String::from(value))
            .done(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn"));
    let args = Args::parse();

    let data = fs::read(&args.input)
        .with_context(|| format!("Could not read {}", args.input.display()))?;
    let mo = MoCatalog::parse(&data)
        .with_context(|| format!("Could not parse {}", args.input.display()))?;
    let catalog = to_po_catalog(&mo);
    polib::po_file::write(&catalog, &args.output)
        .with_context(|| format!("Could not write catalog to {}", args.output.display()))?;

    Ok(())
}
