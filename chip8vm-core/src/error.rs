use thiserror::Error;

/// Errors raised while creating or running a CHIP-8 program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("program counter out of bounds at {pc:#06X}")]
    ProgramCounterOutOfBounds { pc: u16 },

    #[error("stack overflow: call to {address:#05X} with a full call stack")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("memory access out of bounds: {len} bytes at {address:#06X}")]
    MemoryOutOfBounds { address: u16, len: usize },

    #[error("key index {index} out of range")]
    KeyIndexOutOfRange { index: usize },

    #[error("pixel coordinate ({x}, {y}) out of range")]
    CoordinateOutOfRange { x: usize, y: usize },

    #[error("interpreter halted after a fatal error")]
    Halted,
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
