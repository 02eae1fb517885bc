//! Source loader and validator.
//!
//! Converts source lines into a [`Program`]. Each line is split on ASCII
//! whitespace and tested against the [`TEMPLATES`] in order; the first template
//! that matches decides the opcode and which tokens become operands. A line that
//! matches nothing aborts the whole load, so a [`Program`] is never partial.
//!
//! Operands are kept as raw tokens. Whether they name real variables or parse as
//! literals is only known at run time, and faults there are runtime faults.

use crate::virtual_machine::errors::ProgramError;
use crate::virtual_machine::isa::TEMPLATES;
use crate::virtual_machine::program::{Instruction, Program};
use std::fmt::Write;

/// Token separators: the C locale's whitespace set.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Tokenize a single source line.
fn tokenize(line: &str) -> Vec<&str> {
    line.split(is_separator)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Decodes one line, or returns `None` when no template matches.
pub fn decode_line(line: &str) -> Option<Instruction> {
    let tokens = tokenize(line);
    TEMPLATES.iter().find_map(|template| {
        template
            .matches(&tokens)
            .map(|operands| Instruction::new(template.opcode, operands, line))
    })
}

/// Assembles source lines into a program.
///
/// Returns [`ProgramError::Compile`] naming the first line that matches no
/// template; later lines are not decoded.
pub fn assemble_lines<S: AsRef<str>>(lines: &[S]) -> Result<Program, ProgramError> {
    let mut instructions = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let instruction = decode_line(line).ok_or_else(|| ProgramError::compile(index, line))?;
        instructions.push(instruction);
    }
    Ok(Program::new(instructions))
}

/// Assembles newline-separated source text.
///
/// A trailing newline does not add an empty line; a `\r` before a newline stays
/// part of its line (it tokenizes as whitespace but still counts towards cost).
pub fn assemble_source(source: &str) -> Result<Program, ProgramError> {
    let lines: Vec<&str> = source_lines(source).collect();
    assemble_lines(&lines)
}

/// Splits source text into lines the way the loader counts them.
pub fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}

/// Formats a compiler-style diagnostic for a compile fault.
///
/// Other errors render as a single `error:` line.
pub fn render_diagnostic(file: &str, source: &str, err: &ProgramError) -> String {
    let mut diag = String::new();
    let _ = writeln!(diag, "error: {err}");

    if let ProgramError::Compile { line, .. } = err {
        let _ = writeln!(diag, " --> {file}:{line}");
        if let Some(raw_line) = source_lines(source).nth(line.saturating_sub(1)) {
            let line_text = raw_line.trim_end_matches('\r');
            let indent = line_text.len() - line_text.trim_start().len();
            let width = line_text.trim().chars().count().max(1);
            let _ = writeln!(diag, "  |");
            let _ = writeln!(diag, "{:>4} | {}", line, line_text);
            let _ = writeln!(diag, "  | {}{}", " ".repeat(indent), "^".repeat(width));
        }
    }

    diag
}
