//! Compiled program representation.
//!
//! A [`Program`] is the validated instruction sequence produced by the
//! [`assembler`](super::assembler). It is immutable after construction and holds no
//! run-state, so one compiled program can back any number of [`VM`](super::vm::VM)
//! executions through an `Arc`.

use crate::virtual_machine::assembler::{assemble_lines, assemble_source};
use crate::virtual_machine::errors::ProgramError;
use crate::virtual_machine::isa::Opcode;

/// Fixed cost charged for every executed instruction on top of its line length.
pub const INSTRUCTION_BASE_COST: u64 = 5;

/// A decoded source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    opcode: Opcode,
    operands: Vec<String>,
    cost: u64,
}

impl Instruction {
    /// Creates an instruction whose cost is derived from its source line.
    pub(crate) fn new(opcode: Opcode, operands: Vec<String>, line: &str) -> Self {
        Self {
            opcode,
            operands,
            cost: line.len() as u64 + INSTRUCTION_BASE_COST,
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Operand tokens in storage order (destination first).
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Returns operand `index`, or an empty token if the instruction has fewer.
    pub fn operand(&self, index: usize) -> &str {
        self.operands.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Cost charged each time this instruction executes.
    pub fn cost(&self) -> u64 {
        self.cost
    }
}

/// Validated, immutable instruction sequence indexed by 0-based line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub(crate) fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Compiles source lines, failing on the first unrecognized line.
    pub fn compile<S: AsRef<str>>(lines: &[S]) -> Result<Self, ProgramError> {
        assemble_lines(lines)
    }

    /// Compiles newline-separated source text.
    pub fn from_source(source: &str) -> Result<Self, ProgramError> {
        assemble_source(source)
    }

    /// Returns the instruction at `pc`, or `None` when `pc` is outside the program.
    pub fn get(&self, pc: i64) -> Option<&Instruction> {
        usize::try_from(pc)
            .ok()
            .and_then(|index| self.instructions.get(index))
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_is_line_length_plus_base() {
        let program = Program::compile(&["yoink a", "", "  go touch some grass  "]).unwrap();
        let costs: Vec<_> = program.instructions().iter().map(Instruction::cost).collect();
        assert_eq!(costs, vec![12, 5, 28]);
    }

    #[test]
    fn get_rejects_out_of_range_pc() {
        let program = Program::compile(&["", ""]).unwrap();
        assert!(program.get(0).is_some());
        assert!(program.get(1).is_some());
        assert!(program.get(2).is_none());
        assert!(program.get(-1).is_none());
        assert!(program.get(i64::MIN).is_none());
    }

    #[test]
    fn missing_operand_reads_as_empty_token() {
        let program = Program::compile(&["go touch some grass"]).unwrap();
        assert_eq!(program.instructions()[0].operand(0), "");
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        let program = Program::compile::<&str>(&[]).unwrap();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
    }
}
