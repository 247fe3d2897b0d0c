use crate::il;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An instruction in the alias IL.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Instruction {
    /// `name` points to a fresh abstract location.
    Alloca { name: String },
    /// `dst` may point to anything `src` points to.
    Move { dst: String, src: String },
    /// `dst = *reference`
    Load { dst: String, reference: String },
    /// `*reference = src`
    Store { reference: String, src: String },
}

impl Instruction {
    /// Create a new `Alloca` instruction.
    pub fn alloca<S>(name: S) -> Result<Instruction, Error>
    where
        S: Into<String>,
    {
        Ok(Instruction::Alloca {
            name: il::name(name)?,
        })
    }

    /// Create a new `Move` instruction, `dst = src`.
    pub fn mov<S, T>(dst: S, src: T) -> Result<Instruction, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        Ok(Instruction::Move {
            dst: il::name(dst)?,
            src: il::name(src)?,
        })
    }

    /// Create a new `Load` instruction, `dst = *reference`.
    pub fn load<S, T>(dst: S, reference: T) -> Result<Instruction, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        Ok(Instruction::Load {
            dst: il::name(dst)?,
            reference: il::name(reference)?,
        })
    }

    /// Create a new `Store` instruction, `*reference = src`.
    pub fn store<S, T>(reference: S, src: T) -> Result<Instruction, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        Ok(Instruction::Store {
            reference: il::name(reference)?,
            src: il::name(src)?,
        })
    }

    pub fn is_alloca(&self) -> bool {
        matches!(self, Instruction::Alloca { .. })
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Instruction::Move { .. })
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Instruction::Load { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, Instruction::Store { .. })
    }

    /// Every name this instruction mentions, in the order they are written.
    pub fn names(&self) -> Vec<&str> {
        match *self {
            Instruction::Alloca { ref name } => vec![name.as_str()],
            Instruction::Move { ref dst, ref src } => vec![dst.as_str(), src.as_str()],
            Instruction::Load {
                ref dst,
                ref reference,
            } => vec![dst.as_str(), reference.as_str()],
            Instruction::Store { ref reference, ref src } => {
                vec![reference.as_str(), src.as_str()]
            }
        }
    }

    /// The name whose own points-to set this instruction writes directly.
    ///
    /// A `Store` writes through memory, and has no such name.
    pub fn name_written(&self) -> Option<&str> {
        match *self {
            Instruction::Alloca { ref name } => Some(name.as_str()),
            Instruction::Move { ref dst, .. } | Instruction::Load { ref dst, .. } => {
                Some(dst.as_str())
            }
            Instruction::Store { .. } => None,
        }
    }

    /// Check every name in this instruction.
    ///
    /// Instructions built with the constructors are always valid. This is for
    /// instructions which arrive by other means, such as deserialization.
    pub fn validate(&self) -> Result<(), Error> {
        for name in self.names() {
            if !il::is_valid_name(name) {
                return Err(Error::InvalidName(name.to_string()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::Alloca { ref name } => write!(f, "{} = {}", name, il::ALLOCA_KEYWORD),
            Instruction::Move { ref dst, ref src } => write!(f, "{} = {}", dst, src),
            Instruction::Load {
                ref dst,
                ref reference,
            } => write!(f, "{} = *{}", dst, reference),
            Instruction::Store { ref reference, ref src } => write!(f, "*{} = {}", reference, src),
        }
    }
}
