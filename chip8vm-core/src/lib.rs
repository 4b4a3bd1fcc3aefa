//! CHIP-8 virtual machine.
//!
//! [`Chip8Interpreter`] owns the whole machine: memory, registers, call
//! stack, timers, framebuffer and keypad. A host loop presses keys, calls
//! [`Chip8Interpreter::step`] once per cycle and reads the framebuffer back.
//! Nothing here touches files, the clock or a terminal.

mod display;
mod error;
mod instruction;
mod interpreter;
mod keyboard;
mod state;

pub use display::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, StepOutcome};
pub use keyboard::{Keypad, KEY_COUNT};
pub use state::{MEMORY_SIZE, PROGRAM_START};

pub fn display_width() -> usize {
    DISPLAY_WIDTH
}

pub fn display_height() -> usize {
    DISPLAY_HEIGHT
}
