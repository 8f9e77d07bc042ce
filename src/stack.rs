//! Stack growth for the recursive parser and evaluator
//!
//! The nesting ceiling bounds how deep parsing and evaluation may go, but a
//! large ceiling can still exceed a small thread stack. Wrapping each
//! recursive step in [`ensure_sufficient_stack`] grows the stack on demand.

/// Grow the stack when less than this remains
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_recursion_survives() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
        }

        assert_eq!(depth(100_000), 100_000);
    }
}
