//! Parsers for the comparison engine's interface formats.
//!
//! Two text inputs are consumed: a unified diff of the function's
//! disassembly, and a cvdump-style listing of the recompiled function's
//! stack symbols.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use stackcmp_core::{AlignedPair, DiffHunk, DiffRegion, SymbolRecord};

use crate::{Error, Result};

static SYMBOL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Parse a unified diff of disassembly text into hunks.
///
/// `@@` lines open a hunk (the slug is kept verbatim). Within a hunk, a
/// maximal run of space-prefixed context lines forms one aligned region,
/// and a maximal run of `-`/`+` lines forms one divergent region. File
/// headers and anything before the first hunk are skipped.
#[must_use]
pub fn parse_diff(text: &str) -> Vec<DiffHunk> {
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut current: Option<DiffHunk> = None;
    let mut aligned: Vec<AlignedPair> = Vec::new();
    let mut orig: Vec<String> = Vec::new();
    let mut recomp: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if line.starts_with("@@") {
            if let Some(mut hunk) = current.take() {
                flush_aligned(&mut aligned, &mut hunk.regions);
                flush_divergent(&mut orig, &mut recomp, &mut hunk.regions);
                hunks.push(hunk);
            }
            current = Some(DiffHunk::new(line, Vec::new()));
            continue;
        }

        let Some(hunk) = current.as_mut() else {
            // Preamble: ---/+++ headers and any other leading text.
            continue;
        };

        if let Some(rest) = line.strip_prefix(' ') {
            flush_divergent(&mut orig, &mut recomp, &mut hunk.regions);
            aligned.push(AlignedPair::identical(rest));
        } else if let Some(rest) = line.strip_prefix('-') {
            flush_aligned(&mut aligned, &mut hunk.regions);
            orig.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix('+') {
            flush_aligned(&mut aligned, &mut hunk.regions);
            recomp.push(rest.to_string());
        }
        // "\ No newline at end of file" markers and blanks are skipped.
    }

    if let Some(mut hunk) = current.take() {
        flush_aligned(&mut aligned, &mut hunk.regions);
        flush_divergent(&mut orig, &mut recomp, &mut hunk.regions);
        hunks.push(hunk);
    }

    hunks
}

fn flush_aligned(aligned: &mut Vec<AlignedPair>, regions: &mut Vec<DiffRegion>) {
    if !aligned.is_empty() {
        regions.push(DiffRegion::Aligned(std::mem::take(aligned)));
    }
}

fn flush_divergent(orig: &mut Vec<String>, recomp: &mut Vec<String>, regions: &mut Vec<DiffRegion>) {
    if !orig.is_empty() || !recomp.is_empty() {
        regions.push(DiffRegion::Divergent {
            orig: std::mem::take(orig),
            recomp: std::mem::take(recomp),
        });
    }
}

/// Read and parse a diff file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_diff_file(path: &Path) -> Result<Vec<DiffHunk>> {
    Ok(parse_diff(&fs::read_to_string(path)?))
}

/// Parse a cvdump-style stack-symbol listing.
///
/// Recognized lines look like
/// `S_BPREL32: [FFFFFFF8], Type: T_INT4, m_count`; any symbol kind is
/// accepted here and filtered later by the table builder. Lines that
/// mention `S_BPREL32` but do not parse are an error; everything else is
/// skipped.
///
/// # Errors
///
/// Returns [`Error::BadSymbolRecord`] for an unparseable frame-base line.
pub fn parse_symbol_listing(text: &str) -> Result<Vec<SymbolRecord>> {
    let pattern = SYMBOL_PATTERN.get_or_init(|| {
        Regex::new(r"(S_\w+):\s*(\[[0-9A-Fa-f]+\]),\s*Type:\s*([^,]+),\s*(.+)").unwrap()
    });

    let mut records = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        let Some(caps) = pattern.captures(line) else {
            if line.contains("S_BPREL32") {
                return Err(Error::BadSymbolRecord {
                    line: line.to_string(),
                });
            }
            if !line.is_empty() {
                trace!("skipping symbol listing line: {line}");
            }
            continue;
        };

        let group = |index| caps.get(index).map_or("", |m| m.as_str());
        records.push(SymbolRecord {
            kind: group(1).to_string(),
            location: group(2).to_string(),
            name: group(4).trim().to_string(),
            data_type: group(3).trim().to_string(),
        });
    }
    Ok(records)
}

/// Read and parse a symbol listing file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a frame-base line does
/// not parse.
pub fn read_symbol_file(path: &Path) -> Result<Vec<SymbolRecord>> {
    parse_symbol_listing(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DIFF: &str = "\
--- original.asm
+++ recomp.asm
@@ -0x10001000,6 +0x10002000,6 @@
 push ebp
 mov ebp, esp
-mov eax, dword ptr [ebp - 0x8]
+mov eax, dword ptr [ebp - 0xc]
 ret
@@ -0x10001040,2 +0x10002044,2 @@
 mov ecx, dword ptr [esp + 0x10]
";

    #[test]
    fn test_parse_diff_hunks_and_regions() {
        let hunks = parse_diff(SAMPLE_DIFF);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].header, "@@ -0x10001000,6 +0x10002000,6 @@");
        assert_eq!(hunks[0].regions.len(), 3);

        let DiffRegion::Aligned(context) = &hunks[0].regions[0] else {
            panic!("expected aligned region");
        };
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].orig, "push ebp");

        let DiffRegion::Divergent { orig, recomp } = &hunks[0].regions[1] else {
            panic!("expected divergent region");
        };
        assert_eq!(orig, &["mov eax, dword ptr [ebp - 0x8]"]);
        assert_eq!(recomp, &["mov eax, dword ptr [ebp - 0xc]"]);

        assert_eq!(hunks[1].regions.len(), 1);
    }

    #[test]
    fn test_parse_diff_one_sided_run() {
        let diff = "\
@@ -0x1000,1 +0x2000,3 @@
 push ebp
+push esi
+push edi
";
        let hunks = parse_diff(diff);
        let DiffRegion::Divergent { orig, recomp } = &hunks[0].regions[1] else {
            panic!("expected divergent region");
        };
        assert!(orig.is_empty());
        assert_eq!(recomp.len(), 2);
    }

    #[test]
    fn test_parse_diff_ignores_preamble() {
        assert!(parse_diff("no hunks here\n-not a removal\n").is_empty());
    }

    #[test]
    fn test_parse_symbol_listing() {
        let listing = "\
(000114) S_BPREL32: [FFFFFFF8], Type: T_INT4, m_count
(000130) S_REGISTER: [00000011], Type: 0x1E34, this
S_BPREL32: [00000008], Type: T_32PINT4, arg0
";
        let records = parse_symbol_listing(listing).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind, "S_BPREL32");
        assert_eq!(records[0].location, "[FFFFFFF8]");
        assert_eq!(records[0].name, "m_count");
        assert_eq!(records[0].data_type, "T_INT4");
        assert_eq!(records[2].name, "arg0");
    }

    #[test]
    fn test_parse_symbol_listing_rejects_malformed_bprel() {
        let listing = "S_BPREL32 [FFFFFFF8] m_count\n";
        assert!(parse_symbol_listing(listing).is_err());
    }

    #[test]
    fn test_parse_symbol_listing_skips_noise() {
        let listing = "MODULE: recomp.obj\n\nS_BPREL32: [FFFFFFFC], Type: T_INT4, i\n";
        let records = parse_symbol_listing(listing).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "i");
    }
}
