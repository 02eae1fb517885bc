//! Instruction Set Architecture (ISA) definitions.
//!
//! Defines the language's instruction set. The `for_each_instruction!` macro holds
//! the canonical instruction definitions and invokes a callback macro for code
//! generation, so the opcode enum and the recognition table never drift apart.
//!
//! This module generates:
//! - The [`Opcode`] enum with display names and mnemonics
//! - [`TEMPLATES`], the ordered token templates the assembler matches lines against
//!
//! # Line Format
//!
//! A line is split on ASCII whitespace into tokens. A template fixes the token
//! count and the keyword at every keyword position; the remaining positions are
//! operands, stored in the order given by their slot index:
//!
//! ```text
//! yoink <dst>                          ; dst = next input
//! yeet <src>                           ; emit src
//! bruh <dst> is lowkey just <src>      ; dst = src
//! *slaps <src> on top of <dst>*        ; dst += src
//! rip this <dst> fell off by <src>     ; dst -= src
//! vibe check <lhs> ratios <rhs>        ; skip next line unless lhs > rhs
//! simp for <line>                      ; continue at 1-based line
//! go touch some grass                  ; halt
//! ```

/// Number of opcodes (and templates).
pub const OPCODE_COUNT: usize = 9;

/// One token position of an instruction template.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    /// Token must equal the keyword exactly.
    Keyword(&'static str),
    /// Token is stored as the operand with this index.
    Operand(usize),
    /// Token must end with the sigil; the rest (non-empty) is stored as the operand.
    SigilOperand(usize, char),
}

/// Fixed token-count-and-keyword pattern recognizing one opcode.
#[derive(Clone, Copy, Debug)]
pub struct Template {
    pub opcode: Opcode,
    pub slots: &'static [Slot],
}

impl Template {
    /// Number of operands the template extracts.
    pub fn arity(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !matches!(slot, Slot::Keyword(_)))
            .count()
    }

    /// Matches a tokenized line, returning the operands in storage order.
    pub fn matches(&self, tokens: &[&str]) -> Option<Vec<String>> {
        if tokens.len() != self.slots.len() {
            return None;
        }
        let mut operands = vec![String::new(); self.arity()];
        for (slot, token) in self.slots.iter().zip(tokens) {
            match *slot {
                Slot::Keyword(keyword) => {
                    if *token != keyword {
                        return None;
                    }
                }
                Slot::Operand(index) => operands[index] = token.to_string(),
                Slot::SigilOperand(index, sigil) => {
                    let stripped = token.strip_suffix(sigil).filter(|rest| !rest.is_empty())?;
                    operands[index] = stripped.to_string();
                }
            }
        }
        Some(operands)
    }
}

/// Invokes a callback macro with the complete instruction definition list.
///
/// Order matters: it is the recognition priority of the templates.
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            /// (empty line) ; no effect
            Nop = "" => [],
            /// yoink dst ; dst = oldest queued input
            Input = "yoink" => [Slot::Keyword("yoink"), Slot::Operand(0)],
            /// yeet src ; append src to the output queue
            Output = "yeet" => [Slot::Keyword("yeet"), Slot::Operand(0)],
            /// bruh dst is lowkey just src ; dst = src
            Assign = "bruh" => [
                Slot::Keyword("bruh"),
                Slot::Operand(0),
                Slot::Keyword("is"),
                Slot::Keyword("lowkey"),
                Slot::Keyword("just"),
                Slot::Operand(1),
            ],
            /// *slaps src on top of dst* ; dst += src
            Add = "*slaps" => [
                Slot::Keyword("*slaps"),
                Slot::Operand(1),
                Slot::Keyword("on"),
                Slot::Keyword("top"),
                Slot::Keyword("of"),
                Slot::SigilOperand(0, '*'),
            ],
            /// rip this dst fell off by src ; dst -= src
            Sub = "rip this" => [
                Slot::Keyword("rip"),
                Slot::Keyword("this"),
                Slot::Operand(0),
                Slot::Keyword("fell"),
                Slot::Keyword("off"),
                Slot::Keyword("by"),
                Slot::Operand(1),
            ],
            /// vibe check lhs ratios rhs ; skip the next line unless lhs > rhs
            Compare = "vibe check" => [
                Slot::Keyword("vibe"),
                Slot::Keyword("check"),
                Slot::Operand(0),
                Slot::Keyword("ratios"),
                Slot::Operand(1),
            ],
            /// simp for line ; continue at the 1-based source line
            Jump = "simp for" => [Slot::Keyword("simp"), Slot::Keyword("for"), Slot::Operand(0)],
            /// go touch some grass ; halt
            Return = "go touch some grass" => [
                Slot::Keyword("go"),
                Slot::Keyword("touch"),
                Slot::Keyword("some"),
                Slot::Keyword("grass"),
            ],
        }
    };
}

macro_rules! define_instructions {
    (
        $( $(#[$doc:meta])* $name:ident = $mnemonic:literal => [ $( $slot:expr ),* $(,)? ] ),* $(,)?
    ) => {
        /// Discriminator selecting an instruction's execution behaviour.
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $( $(#[$doc])* $name, )*
        }

        impl Opcode {
            /// All opcodes in recognition order.
            pub const ALL: [Opcode; OPCODE_COUNT] = [ $( Opcode::$name, )* ];

            /// Returns the opcode's name.
            pub const fn name(&self) -> &'static str {
                match self {
                    $( Opcode::$name => stringify!($name), )*
                }
            }

            /// Returns the leading keywords that introduce the instruction.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }
        }

        /// Instruction templates in recognition order; the first match wins.
        pub const TEMPLATES: [Template; OPCODE_COUNT] = [
            $( Template { opcode: Opcode::$name, slots: &[ $( $slot ),* ] }, )*
        ];
    };
}

for_each_instruction!(define_instructions);
