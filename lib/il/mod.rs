//! Falcon Alias Intermediate Language.
//!
//! The alias IL keeps only what a points-to analysis needs to see. Every
//! instruction names storage locations by string, and there are exactly four
//! kinds of `Instruction`:
//!
//! * `Alloca`: `name = alloca`. Introduces one fresh abstract memory object,
//! and `name` points to it.
//! * `Move`: `dst = src`. `dst` may point to anything `src` points to.
//! * `Load`: `dst = *reference`. For every object `reference` points to, `dst`
//! may point to anything that object points to.
//! * `Store`: `*reference = src`. For every object `reference` points to, that
//! object may point to anything `src` points to.
//!
//! There is no control flow. The analyses over this IL are flow-insensitive,
//! so a `Program` is just an ordered list of instructions. The order only
//! matters for naming abstract locations deterministically.
//!
//! Names must be identifiers: an ASCII letter or underscore, followed by ASCII
//! letters, digits, or underscores. `alloca` is reserved. Instructions are
//! checked when they are created, so a malformed instruction is rejected
//! before any analysis runs.
//!
//! A `Program` can be built in code, parsed from the text format (see the
//! `parser` module), or loaded from JSON.

use crate::Error;

mod instruction;
pub mod parser;
mod program;

pub use self::instruction::*;
pub use self::program::*;

/// The keyword for allocation in the text format. It cannot be used as a name.
pub const ALLOCA_KEYWORD: &str = "alloca";

/// Returns `true` if `name` is a legal storage name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && name != ALLOCA_KEYWORD
}

/// Check a storage name, and convert it into an owned `String`.
pub fn name<S>(name: S) -> Result<String, Error>
where
    S: Into<String>,
{
    let name = name.into();
    if is_valid_name(&name) {
        Ok(name)
    } else {
        Err(Error::InvalidName(name))
    }
}
