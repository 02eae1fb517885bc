//! Test fixtures: sample programs and VM constructors.

#[cfg(test)]
pub mod utils {
    use crate::virtual_machine::program::Program;
    use crate::virtual_machine::vm::VM;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::BuildHasherDefault;
    use std::sync::Arc;

    /// Fixed-key hasher, so symbol-table layout is identical across runs.
    pub type FixedState = BuildHasherDefault<DefaultHasher>;

    /// Reads `a`, `b` and prints `a + b`.
    pub const A_PLUS_B: &str = "\
yoink a
yoink b
*slaps b on top of a*
yeet a
go touch some grass";

    /// Reads `a` and prints `|a|`.
    pub const ABS_VALUE: &str = "\
yoink a
vibe check 0 ratios a
simp for 6
yeet a
go touch some grass
bruh r is lowkey just 0
rip this r fell off by a
yeet r
go touch some grass";

    /// Reads `n`, an array of `n` items, and prints their sum.
    pub const ARRAY_SUM: &str = "\
yoink n
yoink arr
bruh i is lowkey just 0
bruh s is lowkey just 0
vibe check n ratios i
simp for 8
simp for 11
*slaps arr[i] on top of s*
*slaps 1 on top of i*
simp for 5
yeet s
go touch some grass";

    /// Reads `n >= 1`, an array of `n` items, and prints the largest.
    pub const ARRAY_MAX: &str = "\
yoink n
yoink arr
bruh m is lowkey just arr[0]
bruh i is lowkey just 1
vibe check n ratios i
simp for 9
yeet m
go touch some grass
vibe check arr[i] ratios m
bruh m is lowkey just arr[i]
*slaps 1 on top of i*
simp for 5";

    /// Reads `n`, an array of `n` items and `k`, and prints the `k`-th largest.
    ///
    /// Extracts the maximum `k` times, overwriting each pick with `i64::MIN`.
    pub const KTH_LARGEST: &str = "\
yoink n
yoink arr
yoink k
vibe check k ratios 0
simp for 8
yeet m
go touch some grass
bruh m is lowkey just arr[0]
bruh j is lowkey just 0
bruh i is lowkey just 1
vibe check n ratios i
simp for 17
bruh arr[j] is lowkey just -9223372036854775808
rip this k fell off by 1
simp for 4

vibe check arr[i] ratios m
simp for 22
*slaps 1 on top of i*
simp for 11

bruh m is lowkey just arr[i]
bruh j is lowkey just i
simp for 19";

    /// Compiles a fixture, panicking on a load fault.
    pub fn compile(source: &str) -> Arc<Program> {
        Arc::new(Program::from_source(source).expect("fixture should compile"))
    }

    /// Creates a VM with a fixed-key symbol table.
    pub fn deterministic_vm(program: Arc<Program>) -> VM<FixedState> {
        VM::with_hasher(program, FixedState::default())
    }

    /// Source lines of a fixture, as the checker reads them.
    pub fn lines(source: &str) -> Vec<String> {
        source.lines().map(str::to_string).collect()
    }
}
