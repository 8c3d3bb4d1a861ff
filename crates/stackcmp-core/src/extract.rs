//! Stack-reference extraction from disassembly text.
//!
//! The accepted instruction grammar is a contract with the upstream
//! disassembler: register (`ebp` or `esp`), one whitespace, `+` or `-`, one
//! whitespace, then a hex literal with optional `0x` prefix. The literal is
//! consumed greedily, so `ebp - 0x14abc` can never match as a shorter
//! prefix of itself. Only the first match per line is used; a line is
//! assumed to reference at most one stack slot.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::reference::{FrameRegister, StackReference};

static STACK_ENTRY_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Extract the first stack-relative memory reference from one line of
/// disassembly, if any.
///
/// The literal is parsed as hexadecimal whether or not it carries a `0x`
/// prefix. A line mentioning `ebp`/`esp` without matching the grammar is
/// surfaced at trace level and yields `None`; a line with no register
/// mention yields `None` silently.
#[must_use]
pub fn extract_stack_reference(instruction: &str) -> Option<StackReference> {
    let pattern = STACK_ENTRY_PATTERN
        .get_or_init(|| Regex::new(r"(e[sb]p)\s([+-])\s(?:0x)?([0-9a-f]+)").unwrap());

    let Some(caps) = pattern.captures(instruction) else {
        if instruction.contains("ebp") || instruction.contains("esp") {
            trace!("not a stack offset: {instruction}");
        }
        return None;
    };

    let register = if caps.get(1)?.as_str() == "ebp" {
        FrameRegister::FrameBase
    } else {
        FrameRegister::StackPointer
    };
    let magnitude = i64::from_str_radix(caps.get(3)?.as_str(), 16).ok()?;
    let offset = if caps.get(2)?.as_str() == "-" {
        -magnitude
    } else {
        magnitude
    };

    Some(StackReference::new(register, offset))
}

// Conformance fixtures for the grammar above, one per syntax variant seen
// in practice.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_register_mention() {
        assert_eq!(extract_stack_reference("mov eax, dword ptr [edx + 0x10]"), None);
        assert_eq!(extract_stack_reference("ret"), None);
        assert_eq!(extract_stack_reference(""), None);
    }

    #[test]
    fn test_bare_register_use() {
        // Register mentioned without an offset pattern: diagnostic only.
        assert_eq!(extract_stack_reference("mov ebp, esp"), None);
        assert_eq!(extract_stack_reference("push ebp"), None);
    }

    #[test]
    fn test_stack_pointer_positive() {
        assert_eq!(
            extract_stack_reference("lea ecx, [esp + 0x10]"),
            Some(StackReference::new(FrameRegister::StackPointer, 16))
        );
    }

    #[test]
    fn test_frame_base_negative() {
        assert_eq!(
            extract_stack_reference("mov eax, dword ptr [ebp - 0x4]"),
            Some(StackReference::new(FrameRegister::FrameBase, -4))
        );
    }

    #[test]
    fn test_long_literal_not_truncated() {
        assert_eq!(
            extract_stack_reference("mov eax, dword ptr [ebp - 0x14abc]"),
            Some(StackReference::new(FrameRegister::FrameBase, -0x14abc))
        );
    }

    #[test]
    fn test_bare_literal_parses_as_hex() {
        assert_eq!(
            extract_stack_reference("mov eax, dword ptr [ebp + 10]"),
            Some(StackReference::new(FrameRegister::FrameBase, 0x10))
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_stack_reference("mov dword ptr [ebp - 0x8], ecx ; esp + 0x4"),
            Some(StackReference::new(FrameRegister::FrameBase, -8))
        );
    }

    #[test]
    fn test_display_round_trip() {
        for reference in [
            StackReference::new(FrameRegister::StackPointer, 16),
            StackReference::new(FrameRegister::FrameBase, -4),
            StackReference::new(FrameRegister::FrameBase, -0x14abc),
        ] {
            let rendered = format!("mov eax, [{reference}]");
            assert_eq!(extract_stack_reference(&rendered), Some(reference));
        }
    }
}
