//! subleq-vm — a one-instruction (subleq) machine.
//!
//! A [`Program`] is a flat block of `i64` memory read as instruction
//! triples `a b c`. Each step computes `mem[b] -= mem[a]` and jumps to `c`
//! when the result is not positive. Writes to address `-1` are the output
//! channel: the stepped value of `mem[a]` becomes the step's output.
//!
//! # Lifecycle
//!
//! ```text
//! parse("9x-1x3x...")  → Program { ip: 0, step: 0 }
//!   └── next_output()  → one instruction, returns the output
//!         ...
//!   ip < 0             → halted; next_output() returns -1 forever
//! ```

pub mod parser;
pub mod program;

pub use parser::{DEFAULT_PROGRAM, DELIMITER, parse};
pub use program::{HALTED, Program};
