use std::ops::Range;

use crate::{Chip8Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const STACK_SIZE: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;

/// Where the font glyphs live in memory.
pub const FONT_BASE: u16 = 0x000;
/// Bytes per font glyph.
pub const GLYPH_SIZE: u16 = 5;

pub const FONT: [u8; 16 * 5] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Registers, memory and call stack of one running program.
///
/// The stack pointer is the next free slot: 0 means empty, `STACK_SIZE`
/// means full.
#[derive(Debug, Clone)]
pub struct Chip8State {
    pub data_registers: [u8; REGISTER_COUNT],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub ram: [u8; MEMORY_SIZE],
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Default for Chip8State {
    fn default() -> Self {
        Self {
            data_registers: [0; REGISTER_COUNT],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack_pointer: 0,
            ram: [0; MEMORY_SIZE],
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
        }
    }
}

impl Chip8State {
    pub fn load_font_data(&mut self, fonts: &[u8]) {
        let start = FONT_BASE as usize;
        self.ram[start..start + fonts.len()].copy_from_slice(fonts);
    }

    /// Fresh state with the font installed and `program` copied to 0x200.
    pub fn with_program(program: &[u8]) -> Result<Self> {
        let max_size = MEMORY_SIZE - PROGRAM_START as usize;
        if program.len() > max_size {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max_size,
            });
        }

        let mut state = Self::default();
        state.load_font_data(&FONT);
        let start = PROGRAM_START as usize;
        state.ram[start..start + program.len()].copy_from_slice(program);
        Ok(state)
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.data_registers[register_index as usize]
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.data_registers[register_index as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        *self.register_mut(FLAG_REGISTER) = flag as u8;
    }

    /// Big-endian word at the program counter.
    pub fn fetch(&self) -> Result<u16> {
        let pc = self.program_counter as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::ProgramCounterOutOfBounds {
                pc: self.program_counter,
            });
        }
        Ok(u16::from_be_bytes([self.ram[pc], self.ram[pc + 1]]))
    }

    /// Checked range of `len` bytes starting at the index register.
    pub fn index_range(&self, len: usize) -> Result<Range<usize>> {
        let start = self.index_register as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: self.index_register,
                len,
            });
        }
        Ok(start..end)
    }

    pub fn push(&mut self, return_address: u16, target: u16) -> Result<()> {
        let slot = self.stack_pointer as usize;
        if slot >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { address: target });
        }
        self.stack[slot] = return_address;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.stack_pointer == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer as usize])
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
