//! Contest tasks: input generation and expected answers.

use crate::checker::Verdict;
use crate::checker::rng::SignedBits;
use crate::virtual_machine::program::Program;
use crate::virtual_machine::vm::{VM, Value};
use rand_core::RngCore;
use std::sync::Arc;

/// Bit width of generated values.
const VALUE_BITS: u32 = 60;

/// Largest array length generated for the array tasks.
const MAX_ARRAY_LEN: usize = 50;

/// One test case of a task.
pub trait Task {
    /// Queues the test inputs on `vm` and returns the expected answer.
    fn prepare(&self, vm: &mut VM, rng: &mut dyn RngCore) -> i64;

    /// Runs `program` on a fresh test case and grades its output.
    ///
    /// The program must print exactly one scalar equal to the answer.
    fn run_and_check(&self, program: Arc<Program>, rng: &mut dyn RngCore, budget: u64) -> Verdict {
        let mut vm = VM::new(program);
        let answer = self.prepare(&mut vm, rng);
        if let Err(err) = vm.run(budget) {
            return Verdict::from(err);
        }
        match vm.fetch_output() {
            Some(Value::Scalar(_)) if vm.has_output() => {
                Verdict::WrongAnswer("too much stuff printed".into())
            }
            Some(Value::Scalar(output)) if output != answer => Verdict::WrongAnswer("git gud".into()),
            Some(Value::Scalar(_)) => Verdict::Correct,
            Some(Value::Array(_)) => Verdict::WrongAnswer("U PRINTERD AN ENTRIE ARRAY???".into()),
            None => Verdict::WrongAnswer("print something".into()),
        }
    }
}

/// Task 1: read `a`, `b`; print `a + b`.
pub struct SumOfTwo;

impl Task for SumOfTwo {
    fn prepare(&self, vm: &mut VM, rng: &mut dyn RngCore) -> i64 {
        let a = rng.next_signed(VALUE_BITS);
        let b = rng.next_signed(VALUE_BITS);
        vm.add_input(a);
        vm.add_input(b);
        a + b
    }
}

/// Task 2: read `a`; print `|a|`.
pub struct Absolute;

impl Task for Absolute {
    fn prepare(&self, vm: &mut VM, rng: &mut dyn RngCore) -> i64 {
        let a = rng.next_signed(VALUE_BITS);
        vm.add_input(a);
        a.abs()
    }
}

fn random_array(rng: &mut dyn RngCore, len: usize) -> Vec<i64> {
    (0..len).map(|_| rng.next_signed(VALUE_BITS)).collect()
}

/// Task 3: read `n` and an array of `n` items; print the maximum.
pub struct Maximum(pub usize);

impl Task for Maximum {
    fn prepare(&self, vm: &mut VM, rng: &mut dyn RngCore) -> i64 {
        let items = random_array(rng, self.0);
        let answer = items.iter().copied().max().unwrap_or_default();
        vm.add_input(self.0 as i64);
        vm.add_input(items);
        answer
    }
}

/// Task 4: read `n`, an array of `n` items and `k`; print the `k`-th largest.
pub struct KthLargest(pub usize);

impl Task for KthLargest {
    fn prepare(&self, vm: &mut VM, rng: &mut dyn RngCore) -> i64 {
        let n = self.0.max(1);
        let k = (rng.next_u64() % n as u64) as usize + 1;
        let items = random_array(rng, n);
        let mut sorted = items.clone();
        let answer = *sorted.select_nth_unstable(n - k).1;
        vm.add_input(n as i64);
        vm.add_input(items);
        vm.add_input(k as i64);
        answer
    }
}

/// Budget and test cases of one contest task.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TaskSpec {
    pub id: u32,
    /// Cost budget for each test case.
    pub budget: u64,
}

impl TaskSpec {
    pub const ALL: [TaskSpec; 4] = [
        TaskSpec { id: 1, budget: 100_000 },
        TaskSpec { id: 2, budget: 100_000 },
        TaskSpec { id: 3, budget: 100_000 },
        TaskSpec { id: 4, budget: 2_500_000 },
    ];

    pub fn for_id(id: u32) -> Option<TaskSpec> {
        Self::ALL.into_iter().find(|spec| spec.id == id)
    }

    /// Test cases in the order they are judged.
    pub fn trials(&self) -> Vec<Box<dyn Task>> {
        match self.id {
            1 => (0..10).map(|_| Box::new(SumOfTwo) as Box<dyn Task>).collect(),
            2 => (0..10).map(|_| Box::new(Absolute) as Box<dyn Task>).collect(),
            3 => (1..=MAX_ARRAY_LEN)
                .map(|n| Box::new(Maximum(n)) as Box<dyn Task>)
                .collect(),
            4 => (1..=MAX_ARRAY_LEN)
                .flat_map(|n| (0..25 / n + 1).map(move |_| Box::new(KthLargest(n)) as Box<dyn Task>))
                .collect(),
            _ => Vec::new(),
        }
    }
}
