//! Debug-symbol table for the recompiled function's stack frame.
//!
//! Built from the engine-supplied symbol records. Only frame-base-relative
//! (`S_BPREL32`) records carry a usable stack offset; it is encoded as a
//! signed 32-bit big-endian value inside the bracketed hex location field.
//! Note that the frame-pointer-present property only affects entries above
//! `ebp` (the function arguments), not the locals below it.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::reference::{FrameRegister, StackReference};
use crate::{Error, Result};

/// Debug-symbol name and declared type for one stack slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSymbol {
    pub name: String,
    pub data_type: String,
}

impl StackSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// One raw record of the engine-supplied symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    /// Kind tag, e.g. `S_BPREL32` or `S_REGISTER`.
    pub kind: String,
    /// Bracketed hex location field, e.g. `[FFFFFFF8]`.
    pub location: String,
    pub name: String,
    pub data_type: String,
}

/// A stack reference plus the debug symbol attached to it, if any.
///
/// Constructed by the enricher; the underlying reference stays immutable,
/// so two appearances of the same offset can never alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedReference {
    pub reference: StackReference,
    pub symbol: Option<StackSymbol>,
}

impl fmt::Display for AnnotatedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference)?;
        if let Some(symbol) = &self.symbol {
            write!(f, "  {}", symbol.name)?;
        }
        Ok(())
    }
}

/// Frame-base-relative symbols keyed by byte offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: FxHashMap<i64, StackSymbol>,
}

impl SymbolTable {
    /// Build the table from raw records, keeping `S_BPREL32` entries only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSymbolLocation`] if a frame-base record's
    /// location field does not decode as a bracketed 32-bit hex value.
    pub fn from_records(records: &[SymbolRecord]) -> Result<Self> {
        let mut table = Self::default();
        for record in records {
            if record.kind != "S_BPREL32" {
                trace!(kind = %record.kind, name = %record.name, "skipping non-frame-relative symbol");
                continue;
            }
            let offset = decode_bprel_location(&record.location)?;
            table.insert(offset, StackSymbol::new(&*record.name, &*record.data_type));
        }
        Ok(table)
    }

    pub fn insert(&mut self, offset: i64, symbol: StackSymbol) {
        self.symbols.insert(offset, symbol);
    }

    #[must_use]
    pub fn get(&self, offset: i64) -> Option<&StackSymbol> {
        self.symbols.get(&offset)
    }

    /// Offsets present in the table, in no particular order.
    pub fn offsets(&self) -> impl Iterator<Item = i64> + '_ {
        self.symbols.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Attach the symbol recorded for a recomp-side reference.
    ///
    /// Idempotent: attachment is by exact offset only. Stack-pointer
    /// references have no reachable symbol source and stay bare.
    #[must_use]
    pub fn annotate(&self, reference: StackReference) -> AnnotatedReference {
        let symbol = match reference.register {
            FrameRegister::FrameBase => self.get(reference.offset).cloned(),
            FrameRegister::StackPointer => {
                trace!("matching esp offsets to debug symbols is not implemented");
                None
            }
        };
        AnnotatedReference { reference, symbol }
    }
}

/// Decode a `[XXXXXXXX]` location field into a signed byte offset.
fn decode_bprel_location(location: &str) -> Result<i64> {
    let bad = || Error::BadSymbolLocation {
        location: location.to_string(),
    };

    let hex = location
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(bad)?;
    if hex.len() != 8 {
        return Err(bad());
    }
    let raw = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
    Ok(i64::from(i32::from_be_bytes(raw.to_be_bytes())))
}
