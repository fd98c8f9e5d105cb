//! Program state and the single-step execution engine.

use tracing::trace;

/// Output returned by every step once a program has halted.
pub const HALTED: i64 = -1;

/// Destination address that marks a step as producing output.
const OUTPUT_ADDRESS: i64 = -1;

/// A subleq program: memory plus execution position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Instruction memory. Fixed length, mutated in place.
    memory: Vec<i64>,
    /// Start of the next instruction triple. Negative once halted.
    instruction_pointer: i64,
    /// Number of instructions executed so far. Unlike the instruction
    /// pointer this never revisits a value.
    step: u64,
    /// Output of the most recent step.
    last_output: i64,
}

impl Program {
    /// Create a program positioned at the first instruction.
    pub fn new(memory: Vec<i64>) -> Self {
        Self {
            memory,
            instruction_pointer: 0,
            step: 0,
            last_output: 0,
        }
    }

    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    pub fn instruction_pointer(&self) -> i64 {
        self.instruction_pointer
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn last_output(&self) -> i64 {
        self.last_output
    }

    pub fn is_halted(&self) -> bool {
        self.instruction_pointer < 0
    }

    /// Read memory at `address`, yielding 0 outside `[0, len)`.
    pub fn load(&self, address: i64) -> i64 {
        usize::try_from(address)
            .ok()
            .and_then(|i| self.memory.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Write memory at `address`. Out-of-range writes are dropped.
    pub fn store(&mut self, address: i64, value: i64) {
        if let Some(cell) = usize::try_from(address)
            .ok()
            .and_then(|i| self.memory.get_mut(i))
        {
            *cell = value;
        }
    }

    /// Execute one instruction and return its output.
    ///
    /// The output is the pre-subtraction value at `a` when the destination
    /// operand `b` is `-1`, and `0` otherwise. A halted program returns
    /// [`HALTED`] without touching memory, the step counter or the pointer.
    pub fn next_output(&mut self) -> i64 {
        if self.is_halted() {
            self.last_output = HALTED;
            return HALTED;
        }

        let p = self.instruction_pointer;
        let a = self.load(p);
        let b = self.load(p.wrapping_add(1));
        let c = self.load(p.wrapping_add(2));

        let reg_a = self.load(a);
        let reg_b = self.load(b);
        let diff = reg_b.wrapping_sub(reg_a);
        self.store(b, diff);

        self.step += 1;

        self.instruction_pointer = if diff > 0 { p.wrapping_add(3) } else { c };

        self.last_output = if b == OUTPUT_ADDRESS { reg_a } else { 0 };

        if self.is_halted() {
            trace!(step = self.step, "program halted");
        }

        self.last_output
    }

    /// Step until the program halts or `max_steps` instructions have run,
    /// returning every output produced along the way.
    pub fn run(&mut self, max_steps: u64) -> Vec<i64> {
        let mut outputs = Vec::new();
        for _ in 0..max_steps {
            if self.is_halted() {
                break;
            }
            outputs.push(self.next_output());
        }
        outputs
    }
}
