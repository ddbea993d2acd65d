//! Stack growth for the recursive codec paths.
//!
//! Nesting is capped at [`MAX_RECURSION_DEPTH`](crate::MAX_RECURSION_DEPTH),
//! but a thousand codec frames still overflow a 2MB test-thread stack, so
//! every recursion step goes through [`ensure_sufficient_stack`].

/// Grow when less than this remains.
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
