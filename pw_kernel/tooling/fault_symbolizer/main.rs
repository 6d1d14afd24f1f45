// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use fault_symbolizer::{Symbolizer, parse_address, parse_log};

/// Maps the addresses in a fault report back to functions.
#[derive(Debug, Parser)]
struct Args {
    /// Image that produced the report, with its symbol table.
    #[arg(long, required(true))]
    image: PathBuf,

    /// Captured console output containing the report.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Runtime load address; overrides the one found in the log.
    #[arg(long, value_parser = parse_address)]
    image_base: Option<u64>,

    /// Return addresses to resolve, in hex.
    #[arg(value_parser = parse_address)]
    addresses: Vec<u64>,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let symbolizer = Symbolizer::from_path(&args.image)?;

    let mut addresses = args.addresses.clone();
    let mut image_base = args.image_base;
    if let Some(log_path) = &args.log {
        let text = std::fs::read_to_string(log_path)
            .with_context(|| format!("Unable to read {}", log_path.display()))?;
        let log = parse_log(&text)?;
        image_base = image_base.or(log.image_base);
        addresses.extend(log.addresses());
    }
    if addresses.is_empty() {
        return Err(anyhow!("No addresses given; pass them or --log"));
    }

    for address in addresses {
        match symbolizer.resolve(address, image_base) {
            Some(resolved) => {
                println!("{address:#x}: {resolved}");
                println!(
                    "  addr2line -f -C -e {} {:#x}",
                    args.image.display(),
                    resolved.call_site
                );
            }
            None => println!("{address:#x}: ??"),
        }
    }
    Ok(())
}
