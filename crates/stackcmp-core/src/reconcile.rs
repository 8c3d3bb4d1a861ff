//! Diff reconciliation: build the correspondence set from diff regions.
//!
//! Regions are processed independently. A region that cannot be
//! line-matched contributes nothing and sets the structural-mismatch flag;
//! correspondences from its siblings are kept.

use std::collections::BTreeSet;

use tracing::{debug, error};

use crate::correspond::{Correspondence, ReconciliationResult, Warnings};
use crate::diff::{AlignedPair, DiffHunk, DiffRegion};
use crate::extract::extract_stack_reference;

/// Reconcile one function's diff into its correspondence set.
#[must_use]
pub fn reconcile(hunks: &[DiffHunk]) -> ReconciliationResult {
    let mut pairs = BTreeSet::new();
    let mut warnings = Warnings::default();

    for hunk in hunks {
        for region in &hunk.regions {
            pairs.extend(analyze_region(region, &mut warnings));
        }
    }

    ReconciliationResult { pairs, warnings }
}

fn analyze_region(region: &DiffRegion, warnings: &mut Warnings) -> BTreeSet<Correspondence> {
    match region {
        DiffRegion::Aligned(lines) => analyze_aligned(lines),
        DiffRegion::Divergent { orig, recomp } => analyze_divergent(orig, recomp, warnings),
    }
}

/// Aligned lines already correspond positionally, so both sides are assumed
/// to reference the same logical variable.
fn analyze_aligned(lines: &[AlignedPair]) -> BTreeSet<Correspondence> {
    let mut found = BTreeSet::new();

    for pair in lines {
        let Some(orig_ref) = extract_stack_reference(&pair.orig) else {
            // Also drops recomp-only matches; the extractor traces bare
            // register mentions for diagnostics.
            continue;
        };
        // When the recomp line carries no offset pattern of its own, the
        // original's slot stands for both sides.
        let recomp_ref = extract_stack_reference(&pair.recomp).unwrap_or(orig_ref);
        debug!("stack match: {orig_ref}");
        found.insert(Correspondence::new(orig_ref, recomp_ref));
    }

    found
}

/// Divergent sides can only be paired positionally, and only when their
/// lengths agree. Past the first pairing break the positional claim is no
/// longer trustworthy, so the whole region is discarded.
fn analyze_divergent(
    orig: &[String],
    recomp: &[String],
    warnings: &mut Warnings,
) -> BTreeSet<Correspondence> {
    if orig.len() != recomp.len() {
        let location = orig.first().or_else(|| recomp.first());
        error!(
            at = location.map_or("<empty>", String::as_str),
            "structural mismatch:\n{}",
            format_structural_mismatch(orig, recomp)
        );
        warnings.structural_mismatches_present = true;
        return BTreeSet::new();
    }

    let mut found = BTreeSet::new();

    for (orig_line, recomp_line) in orig.iter().zip(recomp) {
        let Some(orig_ref) = extract_stack_reference(orig_line) else {
            continue;
        };
        let Some(recomp_ref) = extract_stack_reference(recomp_line) else {
            error!(
                at = orig_line.as_str(),
                "mismatching line structure:\n{}",
                format_structural_mismatch(orig, recomp)
            );
            warnings.structural_mismatches_present = true;
            return BTreeSet::new();
        };

        debug!("stack match, wrong order: {orig_ref} vs {recomp_ref}");
        found.insert(Correspondence::new(orig_ref, recomp_ref));
    }

    found
}

/// Render a divergent region the way it appeared in the diff.
fn format_structural_mismatch(orig: &[String], recomp: &[String]) -> String {
    let orig_str = if orig.is_empty() {
        "-".to_string()
    } else {
        orig.iter()
            .map(|line| format!("-{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let recomp_str = if recomp.is_empty() {
        "+".to_string()
    } else {
        recomp
            .iter()
            .map(|line| format!("+{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{orig_str}\n{recomp_str}")
}
