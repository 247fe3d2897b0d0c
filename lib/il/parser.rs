//! Parse alias IL programs from text.
//!
//! One instruction per line:
//!
//! ```text
//! # comments run to the end of the line
//! p0 = alloca
//! p1 = p0
//! p2 = *p1
//! *p2 = p0
//! ```
//!
//! Blank lines are ignored.

use crate::il::{Instruction, Program, ALLOCA_KEYWORD};
use crate::Error;

/// Parse a whole program.
pub fn parse(text: &str) -> Result<Program, Error> {
    let mut program = Program::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(instruction) = parse_line(index + 1, line)? {
            program.push(instruction);
        }
    }
    Ok(program)
}

/// Parse one line. Returns `None` for lines with no instruction.
pub fn parse_line(line_number: usize, line: &str) -> Result<Option<Instruction>, Error> {
    let error = |message: String| Error::Parse {
        line: line_number,
        message,
    };

    let line = match line.find('#') {
        Some(position) => &line[..position],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (lhs, rhs) = line
        .split_once('=')
        .ok_or_else(|| error(format!("expected an assignment, found \"{}\"", line)))?;
    if rhs.contains('=') {
        return Err(error("more than one '=' in instruction".to_string()));
    }
    let (lhs, rhs) = (lhs.trim(), rhs.trim());

    let instruction = if let Some(reference) = lhs.strip_prefix('*') {
        if rhs.starts_with('*') {
            return Err(error(format!(
                "cannot store a dereference directly, \"{}\"",
                line
            )));
        }
        Instruction::store(reference.trim(), rhs)
    } else if rhs == ALLOCA_KEYWORD {
        Instruction::alloca(lhs)
    } else if let Some(reference) = rhs.strip_prefix('*') {
        Instruction::load(lhs, reference.trim())
    } else {
        Instruction::mov(lhs, rhs)
    };

    instruction.map(Some).map_err(|e| match e {
        Error::InvalidName(name) => error(format!("invalid name \"{}\"", name)),
        e => e,
    })
}
