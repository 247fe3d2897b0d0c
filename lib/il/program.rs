//! A `Program` is an ordered list of `Instruction`.

use crate::il::*;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// An alias IL program.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new, empty `Program`.
    pub fn new() -> Program {
        Program {
            instructions: Vec::new(),
        }
    }

    /// Create a `Program` from existing instructions, checking each one.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Result<Program, Error> {
        for instruction in &instructions {
            instruction.validate()?;
        }
        Ok(Program { instructions })
    }

    /// Load a `Program` from a JSON array of instructions.
    pub fn from_json(json: &str) -> Result<Program, Error> {
        let program: Program = serde_json::from_str(json)?;
        Program::from_instructions(program.instructions)
    }

    /// Load a `Program` from a JSON file.
    pub fn from_json_file(filename: &Path) -> Result<Program, Error> {
        Program::from_json(&read_file(filename)?)
    }

    /// Load a `Program` from a file in the text format.
    pub fn from_file(filename: &Path) -> Result<Program, Error> {
        read_file(filename)?.parse()
    }

    /// Serialize this `Program` to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Append an instruction to this `Program`.
    pub fn push(&mut self, instruction: Instruction) -> &Instruction {
        self.instructions.push(instruction);
        &self.instructions[self.instructions.len() - 1]
    }

    /// Append `name = alloca`.
    pub fn alloca<S>(&mut self, name: S) -> Result<&Instruction, Error>
    where
        S: Into<String>,
    {
        Ok(self.push(Instruction::alloca(name)?))
    }

    /// Append `dst = src`.
    pub fn mov<S, T>(&mut self, dst: S, src: T) -> Result<&Instruction, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        Ok(self.push(Instruction::mov(dst, src)?))
    }

    /// Append `dst = *reference`.
    pub fn load<S, T>(&mut self, dst: S, reference: T) -> Result<&Instruction, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        Ok(self.push(Instruction::load(dst, reference)?))
    }

    /// Append `*reference = src`.
    pub fn store<S, T>(&mut self, reference: S, src: T) -> Result<&Instruction, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        Ok(self.push(Instruction::store(reference, src)?))
    }
}

fn read_file(filename: &Path) -> Result<String, Error> {
    let mut file = File::open(filename)?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(s: &str) -> Result<Program, Error> {
        parser::parse(s)
    }
}

impl From<Program> for Vec<Instruction> {
    fn from(program: Program) -> Vec<Instruction> {
        program.instructions
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Program {
        let mut program = Program::new();
        program.alloca("p0").unwrap();
        program.alloca("p1").unwrap();
        program.store("p0", "p1").unwrap();
        program.load("p2", "p0").unwrap();
        program.mov("p3", "p1").unwrap();
        program
    }

    #[test]
    fn builder() {
        let program = example();
        assert_eq!(program.len(), 5);
        assert!(program.instructions()[0].is_alloca());
        assert!(program.instructions()[2].is_store());
        assert!(program.instructions()[3].is_load());
        assert!(program.instructions()[4].is_move());

        let mut program = Program::new();
        assert!(program.mov("a", "").is_err());
        assert!(program.is_empty());
    }

    #[test]
    fn display_parses_back() {
        let program = example();
        let text = program.to_string();
        assert_eq!(text, "p0 = alloca\np1 = alloca\n*p0 = p1\np2 = *p0\np3 = p1\n");
        assert_eq!(text.parse::<Program>().unwrap(), program);
    }

    #[test]
    fn json() {
        let program = example();
        let json = program.to_json().unwrap();
        assert_eq!(Program::from_json(&json).unwrap(), program);

        let json = r#"[{"Alloca": {"name": "a"}}, {"Store": {"reference": "a", "src": "b"}}]"#;
        let program = Program::from_json(json).unwrap();
        assert_eq!(program.instructions()[1], Instruction::store("a", "b").unwrap());
    }

    #[test]
    fn json_rejects_malformed() {
        // missing field
        assert!(matches!(
            Program::from_json(r#"[{"Move": {"dst": "a"}}]"#),
            Err(Error::Json(_))
        ));
        // illegal name
        assert!(matches!(
            Program::from_json(r#"[{"Alloca": {"name": "*a"}}]"#),
            Err(Error::InvalidName(_))
        ));
    }
}
