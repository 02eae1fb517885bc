use based_derive::Error;

/// Maximum characters of user text quoted in runtime fault messages.
pub(crate) const QUOTE_LIMIT: usize = 32;
/// Identifiers rejected for bad characters are quoted shorter.
pub(crate) const IDENTIFIER_QUOTE_LIMIT: usize = 20;
/// Maximum characters of an offending source line quoted in compile faults.
pub(crate) const LINE_QUOTE_LIMIT: usize = 60;

/// Truncates user-provided text for display, marking the cut with `...`.
///
/// Untrusted programs can contain arbitrarily long tokens; every message that
/// echoes source text goes through here.
pub fn compress(text: &str, max_len: usize) -> String {
    let max_len = max_len.max(3);
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}

/// Faults raised while loading or running a program, and output-draining errors.
///
/// `Compile`, `Runtime` and `TimeLimitExceeded` are terminal faults and carry the
/// 1-based source line where they happened. Runtime and time-limit lines are signed
/// because a jump can move the program counter outside the program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// A source line matched none of the instruction templates.
    #[error("line {line}: '{text}'? jesse, what are you talking about?")]
    Compile { line: usize, text: String },
    /// An instruction could not be executed.
    #[error("line {line}: ya code got L + ratioed because {fault}")]
    Runtime { line: i64, fault: RuntimeFault },
    /// The cost budget ran out before `go touch some grass` executed.
    #[error("line {line}: you have skill issue on speed smh")]
    TimeLimitExceeded { line: i64 },
    /// The head of the output queue has a different kind than requested.
    #[error("expected {expected} output, found {actual}")]
    OutputMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// The output queue is empty.
    #[error("no output to fetch")]
    NoOutput,
}

impl ProgramError {
    /// Builds a compile fault for the 0-based source line `index`.
    pub(crate) fn compile(index: usize, text: &str) -> Self {
        ProgramError::Compile {
            line: index + 1,
            text: compress(text, LINE_QUOTE_LIMIT),
        }
    }

    /// Builds a runtime fault at the 0-based program counter `pc`.
    pub(crate) fn runtime(pc: i64, fault: RuntimeFault) -> Self {
        ProgramError::Runtime {
            line: pc.wrapping_add(1),
            fault,
        }
    }

    /// Builds a time-limit fault at the 0-based program counter `pc`.
    pub(crate) fn time_limit(pc: i64) -> Self {
        ProgramError::TimeLimitExceeded {
            line: pc.wrapping_add(1),
        }
    }

    /// Returns true for the three terminal fault kinds.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            ProgramError::Compile { .. }
                | ProgramError::Runtime { .. }
                | ProgramError::TimeLimitExceeded { .. }
        )
    }

    /// Returns the 1-based source line of a fault, if this is one.
    pub fn line(&self) -> Option<i64> {
        match self {
            ProgramError::Compile { line, .. } => i64::try_from(*line).ok(),
            ProgramError::Runtime { line, .. } | ProgramError::TimeLimitExceeded { line } => {
                Some(*line)
            }
            ProgramError::OutputMismatch { .. } | ProgramError::NoOutput => None,
        }
    }
}

/// Reason a running program faulted.
///
/// Operand resolution runs without knowing the program counter; the VM attaches
/// the line when it wraps one of these into [`ProgramError::Runtime`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeFault {
    #[error("invalid identifier '{name}', only letters, numbers, and '_' are allowed")]
    InvalidCharacters { name: String },
    #[error("invalid identifier '{name}', cannot begin with a number")]
    LeadingDigit { name: String },
    #[error("expected number, found empty string")]
    EmptyOperand,
    #[error("failed to parse integer '{literal}'")]
    MalformedInteger { literal: String },
    #[error("integer literal '{literal}' is too long")]
    IntegerTooLong { literal: String },
    #[error("empty integer literal")]
    EmptyInteger,
    #[error("no such integer: '{name}'")]
    UnknownScalar { name: String },
    #[error("variable '{name}' is not an integer")]
    NotScalar { name: String },
    #[error("no such array: '{name}'")]
    UnknownArray { name: String },
    #[error("'{name}' is not an array")]
    NotArray { name: String },
    #[error("invalid index: '{index}'")]
    InvalidIndex { index: String },
    #[error("index {name}[{index}] out of bounds")]
    OutOfBounds { name: String, index: i64 },
    #[error("cannot parse '{token}' as an &mut integer")]
    NotAReference { token: String },
    #[error("'{name}' is {kind}, cannot bind {incoming} to it")]
    KindChange {
        name: String,
        kind: &'static str,
        incoming: &'static str,
    },
    #[error("you're reading from nothing")]
    EmptyInput,
    #[error("you're printing nothing")]
    UndeclaredOutput,
    #[error("that's not even a line")]
    NotALine,
}
