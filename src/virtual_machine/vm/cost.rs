use crate::virtual_machine::isa::{OPCODE_COUNT, Opcode};

/// Per-opcode breakdown of the cost charged during a run.
///
/// Backed by a flat array indexed by [`Opcode`] discriminant, so charging a step
/// is a single saturating add.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CostProfile {
    counts: [u64; OPCODE_COUNT],
}

impl Default for CostProfile {
    fn default() -> Self {
        Self {
            counts: [0; OPCODE_COUNT],
        }
    }
}

impl CostProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds cost to the given opcode.
    #[inline(always)]
    pub fn add(&mut self, opcode: Opcode, amount: u64) {
        let slot = &mut self.counts[opcode as usize];
        *slot = slot.saturating_add(amount);
    }

    /// Cost charged to `opcode` so far.
    pub fn get(&self, opcode: Opcode) -> u64 {
        self.counts[opcode as usize]
    }

    /// Returns the total cost across all opcodes.
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |acc, &v| acc.saturating_add(v))
    }

    /// Iterates opcodes and their cost in recognition order.
    pub fn iter(&self) -> impl Iterator<Item = (Opcode, u64)> {
        Opcode::ALL.into_iter().zip(self.counts)
    }
}
