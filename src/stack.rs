//! Stack growth for the recursive parser and interpreter.
//!
//! Nesting is already capped by the parser, but one level of nesting costs
//! several frames in every recursive pass, and a debug build's frames are
//! large. Wrapping the recursive entry points keeps the capped depth safe on
//! small thread stacks too.

/// If less than this remains, grow before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving onto a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
