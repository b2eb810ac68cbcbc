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

//! `msgfmt` compiles a GNU Gettext PO file into a binary MO file.
//!
//! Messages marked as `fuzzy` are left out unless `--use-fuzzy` is
//! given. The MO file is only written if the whole PO file could be
//! parsed.

use anyhow::Context;
use clap::Parser;
use gettext_msgfmt::{compile_file, CompileOptions};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(about = "Compile a PO file into a binary MO file.")]
struct Args {
    /// The PO file to compile.
    #[arg(id = "input.po")]
    input: PathBuf,
    /// The MO file to write.
    #[arg(short, long, value_name = "output.mo")]
    output: PathBuf,
    /// Use fuzzy entries in the output.
    #[arg(short = 'f', long)]
    use_fuzzy: bool,
    /// Print statistics about the translations to stderr.
    #[arg(long)]
    statistics: bool,
}

impl Args {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            use_fuzzy: self.use_fuzzy,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn"));
    let args = Args::parse();

    let stats = compile_file(&args.input, &args.output, &args.options()).with_context(|| {
        format!(
            "Could not compile {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;
    if args.statistics {
        eprintln!("{stats}");
    }

    Ok(())
}
