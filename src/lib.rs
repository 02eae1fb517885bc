//! `based`: a joke-syntax assembly language, its interpreter and its contest checker.
//!
//! Source lines such as `yoink a` or `*slaps 1 on top of b*` are matched against
//! fixed templates, compiled into an immutable [`Program`](virtual_machine::program::Program)
//! and executed by a cost-bounded [`VM`](virtual_machine::vm::VM). The
//! [`checker`] grades programs against seeded test cases.

pub mod checker;
pub mod utils;
pub mod virtual_machine;
