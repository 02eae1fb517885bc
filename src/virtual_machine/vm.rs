//! Core execution engine.
//!
//! The VM walks a shared [`Program`] one instruction at a time. Every executed
//! instruction is charged its cost before its effect is applied, and `run` stops
//! as soon as the accumulated cost reaches the budget. Arithmetic wraps; every
//! other irregularity is a fault that aborts the run.

mod cost;
mod symbols;

pub use cost::CostProfile;

use crate::virtual_machine::errors::{ProgramError, RuntimeFault};
use crate::virtual_machine::isa::Opcode;
use crate::virtual_machine::operand::{is_identifier, parse_integer_literal};
use crate::virtual_machine::program::{Instruction, Program};
use std::collections::VecDeque;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;
use symbols::Symbols;

/// Runtime value held by a symbol or queued as input/output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Scalar(i64),
    /// Fixed-length sequence of integers.
    Array(Vec<i64>),
}

impl Value {
    /// Returns the kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Array(_) => "array",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Value::Array(items)
    }
}

impl From<&[i64]> for Value {
    fn from(items: &[i64]) -> Self {
        Value::Array(items.to_vec())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(value) => write!(f, "{value}"),
            Value::Array(items) => write!(f, "{items:?}"),
        }
    }
}

/// Dispatches an instruction to its `op_*` handler, passing operands by index.
macro_rules! exec_vm {
    (
        vm = $vm:ident,
        instr = $instr:ident,
        { $( $variant:ident => $handler:ident ( $( $index:literal ),* ) ),* $(,)? }
    ) => {{
        match $instr.opcode() {
            $( Opcode::$variant => $vm.$handler( $( $instr.operand($index) ),* ), )*
        }
    }};
}

/// Interpreter for a compiled [`Program`].
///
/// A VM owns all run-state of one execution: program counter, halt flag, cost
/// counter, symbol table and the two value queues. The program itself is shared.
///
/// The symbol table hashes identifiers with `S`, which defaults to the keyed
/// SipHash behind [`RandomState`]. Tests and tools that want a fixed iteration
/// order can plug in any other [`BuildHasher`] through [`VM::with_hasher`].
pub struct VM<S = RandomState> {
    /// Program being executed.
    program: Arc<Program>,
    /// Index of the next instruction. Jumps may move it outside the program.
    pc: i64,
    /// Set by `go touch some grass`.
    halted: bool,
    /// Cost accumulated by executed instructions.
    cost: u64,
    symbols: Symbols<S>,
    input: VecDeque<Value>,
    output: VecDeque<Value>,
    profile: CostProfile,
}

impl VM {
    /// Creates a VM with a randomly keyed symbol table.
    pub fn new(program: Arc<Program>) -> Self {
        Self::with_hasher(program, RandomState::new())
    }
}

impl<S: BuildHasher> VM<S> {
    /// Creates a VM whose symbol table uses `hasher`.
    pub fn with_hasher(program: Arc<Program>, hasher: S) -> Self {
        Self {
            program,
            pc: 0,
            halted: false,
            cost: 0,
            symbols: Symbols::with_hasher(hasher),
            input: VecDeque::new(),
            output: VecDeque::new(),
            profile: CostProfile::new(),
        }
    }

    /// Appends a value to the input queue.
    pub fn add_input(&mut self, value: impl Into<Value>) {
        self.input.push_back(value.into());
    }

    /// Executes until the program halts, faults, or spends `budget`.
    ///
    /// The budget is checked before each instruction, so the instruction that
    /// crosses it still completes. Returns [`ProgramError::TimeLimitExceeded`] at
    /// the current line if the budget ran out before a halt.
    pub fn run(&mut self, budget: u64) -> Result<(), ProgramError> {
        while !self.halted && self.cost < budget {
            self.step()?;
        }
        if self.halted {
            Ok(())
        } else {
            Err(ProgramError::time_limit(self.pc))
        }
    }

    /// Fetches, charges and executes the instruction at `pc`.
    fn step(&mut self) -> Result<(), ProgramError> {
        let pc = self.pc;
        let program = Arc::clone(&self.program);
        let instruction = program
            .get(pc)
            .ok_or_else(|| ProgramError::runtime(pc, RuntimeFault::NotALine))?;

        self.cost = self.cost.saturating_add(instruction.cost());
        self.profile.add(instruction.opcode(), instruction.cost());

        self.pc = self
            .exec(instruction)
            .map_err(|fault| ProgramError::runtime(pc, fault))?;
        Ok(())
    }

    /// Applies one instruction and returns the next program counter.
    fn exec(&mut self, instruction: &Instruction) -> Result<i64, RuntimeFault> {
        exec_vm! {
            vm = self,
            instr = instruction,
            {
                Nop => op_nop(),
                Input => op_input(0),
                Output => op_output(0),
                Assign => op_assign(0, 1),
                Add => op_add(0, 1),
                Sub => op_sub(0, 1),
                Compare => op_compare(0, 1),
                Jump => op_jump(0),
                Return => op_return(),
            }
        }
    }

    fn next_pc(&self) -> i64 {
        self.pc.wrapping_add(1)
    }

    fn op_nop(&mut self) -> Result<i64, RuntimeFault> {
        Ok(self.next_pc())
    }

    fn op_input(&mut self, dst: &str) -> Result<i64, RuntimeFault> {
        let value = self.input.pop_front().ok_or(RuntimeFault::EmptyInput)?;
        self.symbols.bind(dst, value)?;
        Ok(self.next_pc())
    }

    fn op_output(&mut self, src: &str) -> Result<i64, RuntimeFault> {
        let value = if let Some(value) = self.symbols.names_symbol(src) {
            value.clone()
        } else if is_identifier(src) {
            return Err(RuntimeFault::UndeclaredOutput);
        } else {
            Value::Scalar(self.symbols.read(src)?)
        };
        self.output.push_back(value);
        Ok(self.next_pc())
    }

    fn op_assign(&mut self, dst: &str, src: &str) -> Result<i64, RuntimeFault> {
        let value = self.symbols.read(src)?;
        *self.symbols.slot(dst, true)? = value;
        Ok(self.next_pc())
    }

    fn op_add(&mut self, dst: &str, src: &str) -> Result<i64, RuntimeFault> {
        let value = self.symbols.read(src)?;
        let slot = self.symbols.slot(dst, false)?;
        *slot = slot.wrapping_add(value);
        Ok(self.next_pc())
    }

    fn op_sub(&mut self, dst: &str, src: &str) -> Result<i64, RuntimeFault> {
        let value = self.symbols.read(src)?;
        let slot = self.symbols.slot(dst, false)?;
        *slot = slot.wrapping_sub(value);
        Ok(self.next_pc())
    }

    fn op_compare(&mut self, lhs: &str, rhs: &str) -> Result<i64, RuntimeFault> {
        let lhs = self.symbols.read(lhs)?;
        let rhs = self.symbols.read(rhs)?;
        let skip = if lhs > rhs { 1 } else { 2 };
        Ok(self.pc.wrapping_add(skip))
    }

    fn op_jump(&mut self, line: &str) -> Result<i64, RuntimeFault> {
        Ok(parse_integer_literal(line)?.wrapping_sub(1))
    }

    fn op_return(&mut self) -> Result<i64, RuntimeFault> {
        self.halted = true;
        Ok(self.next_pc())
    }

    /// Returns true while the output queue holds values.
    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }

    /// Inputs queued but not yet read, oldest first.
    pub fn pending_input(&self) -> impl Iterator<Item = &Value> {
        self.input.iter()
    }

    /// Removes and returns the oldest output value.
    pub fn fetch_output(&mut self) -> Option<Value> {
        self.output.pop_front()
    }

    /// Removes the oldest output if it is a scalar.
    ///
    /// The head stays queued when it is an array.
    pub fn fetch_scalar(&mut self) -> Result<i64, ProgramError> {
        match self.output.front() {
            None => Err(ProgramError::NoOutput),
            Some(Value::Scalar(value)) => {
                let value = *value;
                self.output.pop_front();
                Ok(value)
            }
            Some(other) => Err(ProgramError::OutputMismatch {
                expected: "scalar",
                actual: other.type_name(),
            }),
        }
    }

    /// Removes the oldest output if it is an array.
    ///
    /// The head stays queued when it is a scalar.
    pub fn fetch_array(&mut self) -> Result<Vec<i64>, ProgramError> {
        match self.output.front() {
            None => Err(ProgramError::NoOutput),
            Some(Value::Array(_)) => match self.output.pop_front() {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(ProgramError::NoOutput),
            },
            Some(other) => Err(ProgramError::OutputMismatch {
                expected: "array",
                actual: other.type_name(),
            }),
        }
    }

    /// Clears all run-state so the same program can run again.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.halted = false;
        self.cost = 0;
        self.symbols.clear();
        self.input.clear();
        self.output.clear();
        self.profile = CostProfile::new();
    }

    /// Index of the next instruction (0-based).
    pub fn pc(&self) -> i64 {
        self.pc
    }

    /// Cost accumulated so far.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn cost_profile(&self) -> &CostProfile {
        &self.profile
    }

    /// Current value of the symbol `name`, if bound.
    pub fn symbol(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }
}
