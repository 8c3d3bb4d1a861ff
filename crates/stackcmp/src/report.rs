//! Report rendering with styled icons.
//!
//! Renders the two classified views plus the legend and the final
//! warnings. Rendering only reads the comparison; running it twice over
//! the same input produces identical text.

use std::fmt::Write;

use console::style;

use stackcmp_core::{AnnotatedReference, MatchOutcome, ReportEntry, StackComparison, Verdict};

fn icon(outcome: MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Exact => style("✓").green().bold().to_string(),
        MatchOutcome::Reordered => style("⇄").yellow().bold().to_string(),
        MatchOutcome::Ambiguous => style("✗").red().bold().to_string(),
        MatchOutcome::Unseen => style("?").blue().bold().to_string(),
    }
}

fn format_reference_list(references: &[AnnotatedReference]) -> String {
    let rendered: Vec<String> = references.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

fn render_by_original_entry(out: &mut String, entry: &ReportEntry) {
    let orig = &entry.orig[0];
    let right = if entry.outcome == MatchOutcome::Ambiguous {
        format_reference_list(&entry.recomp)
    } else {
        entry.recomp[0].to_string()
    };
    let _ = writeln!(out, "{}  {orig}: {right}", icon(entry.outcome));
}

fn render_by_recomp_entry(out: &mut String, entry: &ReportEntry) {
    let recomp = &entry.recomp[0];
    match entry.outcome {
        MatchOutcome::Unseen => {
            let _ = writeln!(out, "{}  not seen:   {recomp}", icon(entry.outcome));
        }
        MatchOutcome::Ambiguous => {
            let rendered: Vec<String> = entry.orig.iter().map(ToString::to_string).collect();
            let _ = writeln!(
                out,
                "{}  [{}]: {recomp}",
                icon(entry.outcome),
                rendered.join(", ")
            );
        }
        MatchOutcome::Exact | MatchOutcome::Reordered => {
            let _ = writeln!(out, "{}  {}: {recomp}", icon(entry.outcome), entry.orig[0]);
        }
    }
}

/// Render the full report: both views, legend, and footer.
#[must_use]
pub fn render(comparison: &StackComparison) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nOrdered by original stack (left=orig, right=recomp):");
    for entry in &comparison.by_original {
        render_by_original_entry(&mut out, entry);
    }

    let _ = writeln!(out, "\nOrdered by recomp stack (left=orig, right=recomp):");
    for entry in &comparison.by_recomp {
        render_by_recomp_entry(&mut out, entry);
    }

    let _ = writeln!(
        out,
        "\nLegend:\n\
         {} : This stack variable matches 1:1, but the order of variables is not correct.\n\
         {} : This stack variable matches multiple variables in the other binary.\n\
         {} : This stack variable did not appear in the diff. It either matches or only appears in structural mismatches.",
        icon(MatchOutcome::Reordered),
        icon(MatchOutcome::Ambiguous),
        icon(MatchOutcome::Unseen),
    );

    match comparison.verdict() {
        Verdict::NotBijective => {
            let _ = writeln!(
                out,
                "\nERROR: The stack variables of original and recomp are not in a 1:1 \
                 correspondence, suggesting that the logic in the recomp is incorrect."
            );
        }
        Verdict::Incomplete => {
            let _ = writeln!(
                out,
                "\nWARNING: Original and recomp have at least one structural discrepancy, \
                 so the comparison of stack variables might be incomplete. \
                 The structural mismatches above need to be checked manually."
            );
        }
        Verdict::Consistent => {}
    }

    out
}
