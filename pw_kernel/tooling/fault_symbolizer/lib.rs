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

//! Offline resolution of fault addresses.
//!
//! Minimal fault reports carry only return addresses.  This library pulls
//! them out of captured console output and maps them back to the functions
//! that failed, using the symbol table of the image that produced them.

use std::fmt;
use std::path::Path;

use anyhow::{Context, anyhow};
use object::{Architecture, BinaryFormat, Object, ObjectKind, ObjectSymbol, SymbolKind};

const FAULT_ADDRESS_MARKER: &str = "fault address:";
const IMAGE_BASE_MARKER: &str = "image base:";
const BACKTRACE_MARKER: &str = "backtrace:";

/// Addresses recovered from a fault report.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct FaultLog {
    pub fault_address: Option<u64>,
    pub image_base: Option<u64>,
    pub backtrace: Vec<u64>,
}

impl FaultLog {
    /// Fault address followed by the backtrace, innermost first.
    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.fault_address.into_iter().chain(self.backtrace.iter().copied())
    }
}

/// Parses a hex address, with or without a `0x` prefix.
pub fn parse_address(text: &str) -> anyhow::Result<u64> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid address {text:?}"))
}

/// Extracts the addresses of the first fault report in `text`.
///
/// Lines may carry any prefix (log tags, color codes, timestamps) in front
/// of the markers the reporter prints.
pub fn parse_log(text: &str) -> anyhow::Result<FaultLog> {
    let mut log = FaultLog::default();
    for (index, line) in text.lines().enumerate() {
        let ctx = || format!("On log line {}", index + 1);
        if let Some(rest) = after_marker(line, FAULT_ADDRESS_MARKER) {
            if log.fault_address.is_none() {
                log.fault_address = Some(parse_address(rest).with_context(ctx)?);
            }
        } else if let Some(rest) = after_marker(line, IMAGE_BASE_MARKER) {
            if log.image_base.is_none() {
                log.image_base = Some(parse_address(rest).with_context(ctx)?);
            }
        } else if let Some(rest) = after_marker(line, BACKTRACE_MARKER) {
            if log.backtrace.is_empty() {
                log.backtrace = rest
                    .split_whitespace()
                    .map(parse_address)
                    .collect::<anyhow::Result<_>>()
                    .with_context(ctx)?;
            }
        }
    }
    if log.fault_address.is_none() && log.backtrace.is_empty() {
        return Err(anyhow!("No fault report found"));
    }
    Ok(log)
}

fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|start| &line[start + marker.len()..])
}

struct Function {
    start: u64,
    size: u64,
    name: String,
}

/// A return address mapped to the function containing its call.
#[derive(Debug, Eq, PartialEq)]
pub struct Resolved {
    /// Link time address of the call instruction.
    pub call_site: u64,
    /// Demangled function name, without hash.
    pub function: String,
    /// Offset of `call_site` into the function.
    pub offset: u64,
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{:#x}", self.function, self.offset)
    }
}

/// Function symbols of one image.
pub struct Symbolizer {
    functions: Vec<Function>,
    thumb: bool,
    // Link time address of the image base, for images loaded at a runtime
    // chosen address.
    link_base: Option<u64>,
}

impl Symbolizer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ctx = || format!("In image file {}", path.display());
        let data = std::fs::read(path).with_context(ctx)?;
        Self::parse(&data).with_context(ctx)
    }

    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let file = object::File::parse(data)?;
        let thumb = file.architecture() == Architecture::Arm;
        let relocatable =
            file.kind() == ObjectKind::Dynamic || file.format() == BinaryFormat::MachO;

        let mut functions: Vec<Function> = file
            .symbols()
            .filter(|symbol| symbol.kind() == SymbolKind::Text && symbol.is_definition())
            .filter_map(|symbol| {
                let name = symbol.name().ok()?;
                let mut start = symbol.address();
                if thumb {
                    start &= !1;
                }
                Some(Function {
                    start,
                    size: symbol.size(),
                    name: name.to_owned(),
                })
            })
            .collect();
        if functions.is_empty() {
            return Err(anyhow!("Image has no function symbols; was it stripped?"));
        }
        functions.sort_by_key(|function| function.start);

        Ok(Self {
            functions,
            thumb,
            link_base: relocatable.then(|| file.relative_address_base()),
        })
    }

    /// Resolves a return address printed by the fault reporter.
    ///
    /// `image_base` is the runtime load address reported alongside it, used
    /// for position independent images.  Returns `None` when the address is
    /// outside every known function.
    #[must_use]
    pub fn resolve(&self, return_address: u64, image_base: Option<u64>) -> Option<Resolved> {
        let mut address = return_address;
        if self.thumb {
            address &= !1;
        }
        if let (Some(link_base), Some(image_base)) = (self.link_base, image_base) {
            address = address.checked_sub(image_base)?.checked_add(link_base)?;
        }
        // The return address points after the call.
        let call_site = address.checked_sub(1)?;

        let index = self
            .functions
            .partition_point(|function| function.start <= call_site)
            .checked_sub(1)?;
        let function = &self.functions[index];
        let offset = call_site - function.start;
        if function.size != 0 && offset >= function.size {
            return None;
        }
        Some(Resolved {
            call_site,
            function: format!("{:#}", rustc_demangle::demangle(&function.name)),
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_parse_with_and_without_prefix() {
        assert_eq!(parse_address("0x1f").unwrap(), 0x1f);
        assert_eq!(parse_address(" 1F ").unwrap(), 0x1f);
        assert!(parse_address("0xzz").is_err());
    }

    #[test]
    fn minimal_report_is_parsed() {
        let log = parse_log(
            "[INF] booting\n             [FTL] fault address: 0x55d4c2a01234\n             [FTL] image base: 0x55d4c2a00000\n             [FTL] *** kernel panic:\n             [FTL] FAILED ASSERTION.\n             [FTL] backtrace: 0x55d4c2a01300 0x55d4c2a01400\n",
        )
        .unwrap();
        assert_eq!(
            log,
            FaultLog {
                fault_address: Some(0x55d4c2a01234),
                image_base: Some(0x55d4c2a00000),
                backtrace: vec![0x55d4c2a01300, 0x55d4c2a01400],
            }
        );
        assert_eq!(
            log.addresses().collect::<Vec<_>>(),
            [0x55d4c2a01234, 0x55d4c2a01300, 0x55d4c2a01400]
        );
    }

    #[test]
    fn colored_tags_are_skipped() {
        let log = parse_log("\x1b[2m\x1b[31mFTL\x1b[0m fault address: 0x8000").unwrap();
        assert_eq!(log.fault_address, Some(0x8000));
    }

    #[test]
    fn only_first_report_is_used() {
        let log = parse_log("fault address: 0x10\nfault address: 0x20\n").unwrap();
        assert_eq!(log.fault_address, Some(0x10));
    }

    #[test]
    fn log_without_report_is_rejected() {
        assert!(parse_log("[INF] all good\n").is_err());
    }

    #[test]
    fn malformed_address_names_the_line() {
        let error = parse_log("ok\nfault address: 0xnope\n").unwrap_err();
        assert!(format!("{error:#}").contains("line 2"), "{error:#}");
    }

    #[inline(never)]
    fn marker() {
        std::hint::black_box(());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn own_functions_resolve() {
        std::hint::black_box(marker as fn());
        let image = std::env::current_exe().unwrap();
        let symbolizer = Symbolizer::from_path(&image).unwrap();
        let start = symbolizer
            .functions
            .iter()
            .find(|function| {
                format!("{:#}", rustc_demangle::demangle(&function.name)).ends_with("tests::marker")
            })
            .map(|function| function.start)
            .expect("marker is in the symbol table");

        let resolved = symbolizer.resolve(start + 1, None).unwrap();
        assert_eq!(resolved.call_site, start);
        assert_eq!(resolved.offset, 0);
        assert!(resolved.function.ends_with("tests::marker"), "{resolved}");

        if symbolizer.link_base.is_some() {
            let base = 0x5000_0000;
            let relocated = symbolizer.resolve(start + base + 1, Some(base)).unwrap();
            assert_eq!(relocated, resolved);
        }
    }

    #[test]
    fn garbage_is_not_an_image() {
        assert!(Symbolizer::parse(b"not an elf").is_err());
    }
}
