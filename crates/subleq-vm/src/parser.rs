//! Program text parser.
//!
//! Programs are encoded as signed decimal integers joined by `x`, e.g.
//! `9x-1x3x10x-1x6x0x0x-1x72x105x0`. The letter keeps the encoding valid
//! inside a Kubernetes label value, which is where programs live.

use tracing::debug;

use crate::program::Program;

/// Token separator in the program text encoding.
pub const DELIMITER: char = 'x';

/// Minimum number of tokens for a well-formed program (one instruction).
const MIN_TOKENS: usize = 3;

/// Fallback program: prints "Hi" and halts.
#[rustfmt::skip]
pub const DEFAULT_PROGRAM: [i64; 12] = [
    9, -1, 3,
    10, -1, 6,
    0, 0, -1,
    72, 105, 0,
];

/// Parse program text into a [`Program`].
///
/// Never fails: text with fewer than three tokens, or with any token that
/// is not an integer, yields the [`DEFAULT_PROGRAM`] instead.
pub fn parse(input: &str) -> Program {
    match parse_memory(input) {
        Some(memory) => Program::new(memory),
        None => {
            debug!(input, "malformed program text, using default program");
            Program::new(DEFAULT_PROGRAM.to_vec())
        }
    }
}

fn parse_memory(input: &str) -> Option<Vec<i64>> {
    let memory = input
        .split(DELIMITER)
        .map(|token| token.parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;

    (memory.len() >= MIN_TOKENS).then_some(memory)
}
