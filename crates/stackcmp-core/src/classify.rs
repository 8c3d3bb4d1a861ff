//! Classification of the correspondence set into the two report views.

use std::collections::BTreeSet;
use std::fmt;

use crate::correspond::{CorrespondenceMap, ReconciliationResult, Warnings};
use crate::reference::{FrameRegister, StackReference};
use crate::symbols::{AnnotatedReference, SymbolTable};

/// Outcome category for one report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Bijective and identical on both sides.
    Exact,
    /// Bijective, but the slot sits at a different offset in the recomp.
    Reordered,
    /// Maps to more than one slot on the other side.
    Ambiguous,
    /// Present in the debug symbols but never seen in the diff: the slot
    /// either truly matches, or only occurred inside discarded
    /// structurally-mismatched regions. That ambiguity is inherent.
    Unseen,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Exact => "exact",
            Self::Reordered => "reordered",
            Self::Ambiguous => "ambiguous",
            Self::Unseen => "unseen",
        };
        f.write_str(tag)
    }
}

/// One row of a report view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub outcome: MatchOutcome,
    /// Original-side references: exactly one in the by-original view,
    /// empty for unseen slots, several for an ambiguous recomp slot.
    pub orig: Vec<StackReference>,
    /// Recomp-side references, annotated with debug symbols.
    pub recomp: Vec<AnnotatedReference>,
}

/// Final verdict for one function's comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The two frames are consistent as far as this analysis can tell.
    Consistent,
    /// Comparison incomplete: mismatched regions need a manual check.
    Incomplete,
    /// The stack layouts are provably inconsistent.
    NotBijective,
}

/// The classified comparison: both views plus the final warning flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackComparison {
    /// One entry per distinct original-side slot, sorted by offset.
    pub by_original: Vec<ReportEntry>,
    /// One entry per recomp-side slot or symbol-table offset, sorted by
    /// offset. Symbols never diffed are still shown.
    pub by_recomp: Vec<ReportEntry>,
    pub warnings: Warnings,
}

impl StackComparison {
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        if self.warnings.map_not_bijective {
            Verdict::NotBijective
        } else if self.warnings.structural_mismatches_present {
            Verdict::Incomplete
        } else {
            Verdict::Consistent
        }
    }
}

/// Classify a reconciliation result against the debug-symbol table.
///
/// Pure: the inputs are not modified, and classifying the same result
/// twice yields identical output. Detecting a many-to-one mapping here is
/// what sets the `map_not_bijective` flag.
#[must_use]
pub fn classify(result: &ReconciliationResult, symbols: &SymbolTable) -> StackComparison {
    let map = CorrespondenceMap::from_pairs(&result.pairs);
    let mut warnings = result.warnings;

    let by_original = classify_by_original(&map, symbols, &mut warnings);
    let by_recomp = classify_by_recomp(&map, symbols, &mut warnings);

    StackComparison {
        by_original,
        by_recomp,
        warnings,
    }
}

fn classify_by_original(
    map: &CorrespondenceMap,
    symbols: &SymbolTable,
    warnings: &mut Warnings,
) -> Vec<ReportEntry> {
    let mut orig_refs: Vec<StackReference> = map.original_refs().copied().collect();
    orig_refs.sort_by_key(|reference| (reference.offset, reference.register));

    let mut entries = Vec::with_capacity(orig_refs.len());
    for orig in orig_refs {
        let Some(partners) = map.recomp_partners(&orig) else {
            continue;
        };
        let outcome = bijective_outcome(&orig, partners, warnings);
        entries.push(ReportEntry {
            outcome,
            orig: vec![orig],
            recomp: partners
                .iter()
                .map(|reference| symbols.annotate(*reference))
                .collect(),
        });
    }
    entries
}

fn classify_by_recomp(
    map: &CorrespondenceMap,
    symbols: &SymbolTable,
    warnings: &mut Warnings,
) -> Vec<ReportEntry> {
    // Union with the symbol table so slots never diffed are still shown.
    let mut recomp_refs: BTreeSet<StackReference> = map.recomp_refs().copied().collect();
    for offset in symbols.offsets() {
        recomp_refs.insert(StackReference::new(FrameRegister::FrameBase, offset));
    }
    let mut recomp_refs: Vec<StackReference> = recomp_refs.into_iter().collect();
    recomp_refs.sort_by_key(|reference| (reference.offset, reference.register));

    let mut entries = Vec::with_capacity(recomp_refs.len());
    for recomp in recomp_refs {
        let entry = match map.orig_partners(&recomp) {
            None => ReportEntry {
                outcome: MatchOutcome::Unseen,
                orig: Vec::new(),
                recomp: vec![symbols.annotate(recomp)],
            },
            Some(partners) => ReportEntry {
                outcome: bijective_outcome(&recomp, partners, warnings),
                orig: partners.iter().copied().collect(),
                recomp: vec![symbols.annotate(recomp)],
            },
        };
        entries.push(entry);
    }
    entries
}

/// Exact or reordered when a slot has exactly one partner; ambiguous
/// (flagging the map as non-bijective) otherwise.
fn bijective_outcome(
    slot: &StackReference,
    partners: &BTreeSet<StackReference>,
    warnings: &mut Warnings,
) -> MatchOutcome {
    if partners.len() == 1 {
        if partners.contains(slot) {
            MatchOutcome::Exact
        } else {
            MatchOutcome::Reordered
        }
    } else {
        warnings.map_not_bijective = true;
        MatchOutcome::Ambiguous
    }
}
