//! Diff structure supplied by the comparison engine.
//!
//! A function's diff arrives as an ordered sequence of hunks, each holding
//! contiguous regions that are either aligned (line-for-line correspondence
//! established) or divergent (no established correspondence).

/// One positionally matched line pair of an aligned region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub orig: String,
    pub recomp: String,
}

impl AlignedPair {
    #[must_use]
    pub fn new(orig: impl Into<String>, recomp: impl Into<String>) -> Self {
        Self {
            orig: orig.into(),
            recomp: recomp.into(),
        }
    }

    /// A matched line whose text is identical on both sides.
    #[must_use]
    pub fn identical(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            orig: text.clone(),
            recomp: text,
        }
    }
}

/// One contiguous piece of a function diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRegion {
    /// Lines present in both binaries, corresponding 1:1 by position.
    Aligned(Vec<AlignedPair>),
    /// A contiguous run present in only one or both sides, with no claimed
    /// line-for-line correspondence. Lengths may differ.
    Divergent {
        orig: Vec<String>,
        recomp: Vec<String>,
    },
}

/// One `@@`-delimited hunk of the function diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// Hunk slug, e.g. `@@ -0x10071662,60 +0x10031368,60 @@`.
    pub header: String,
    pub regions: Vec<DiffRegion>,
}

impl DiffHunk {
    #[must_use]
    pub fn new(header: impl Into<String>, regions: Vec<DiffRegion>) -> Self {
        Self {
            header: header.into(),
            regions,
        }
    }
}
