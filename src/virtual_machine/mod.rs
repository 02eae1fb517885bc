//! Template-matched assembly language and its cost-bounded interpreter.
//!
//! Programs are plain text, one instruction per line. Each line is matched as a
//! whole against a fixed set of keyword templates; there is no expression syntax
//! beyond single operand tokens.
//!
//! # Architecture
//!
//! - **Values**: every symbol is either a 64-bit scalar or an array of them; its
//!   kind is fixed on first bind and never coerced
//! - **Operands**: identifiers, `array[index]` elements and decimal literals,
//!   resolved at run time
//! - **Control flow**: a conditional skip (`vibe check`) and an absolute jump
//!   (`simp for`) to a 1-based line
//! - **Cost metering**: each executed line costs its byte length plus a fixed
//!   base; a run stops once the budget is spent
//! - **I/O**: FIFO input and output queues of whole values
//!
//! # Modules
//!
//! - [`assembler`]: line tokenizing, template matching and diagnostics
//! - [`errors`]: load, runtime and time-limit faults
//! - [`isa`]: opcode and template definitions
//! - [`operand`]: operand token syntax and literal parsing
//! - [`program`]: compiled, shareable instruction sequence
//! - [`vm`]: execution engine, symbol table and cost profile

pub mod assembler;
pub mod errors;
pub mod isa;
pub mod operand;
pub mod program;
pub mod vm;
