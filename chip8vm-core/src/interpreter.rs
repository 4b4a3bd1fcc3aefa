use std::collections::HashSet;

use log::{debug, error, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    state::{Chip8State, FONT_BASE, GLYPH_SIZE},
    Chip8Error, Framebuffer, Instruction, Keypad, Result,
};

/// What a single [`Chip8Interpreter::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction ran to completion.
    Executed(Instruction),
    /// `Fx0A` found no key pressed; the same instruction runs again next step.
    AwaitingKey,
    /// The word matched no instruction. It was skipped.
    UnknownOpcode(u16),
}

/// One running CHIP-8 program.
///
/// The host presses keys with [`set_key`](Self::set_key), advances the
/// machine with [`step`](Self::step) and reads the screen back with
/// [`read_pixel`](Self::read_pixel). Any error returned by `step` halts the
/// interpreter for good; start over with a new instance.
pub struct Chip8Interpreter<R: Rng = StdRng> {
    state: Chip8State,
    display: Framebuffer,
    keyboard: Keypad,
    rng: R,
    current_opcode: u16,
    cycle_count: u64,
    halted: bool,
    /// Addresses whose unknown opcode has already been logged.
    unknown_at: HashSet<u16>,
}

impl Chip8Interpreter<StdRng> {
    /// Interpreter whose random source is seeded with `seed`.
    pub fn with_seed(program: &[u8], seed: u64) -> Result<Self> {
        Self::new(program, StdRng::seed_from_u64(seed))
    }

    /// Interpreter whose random source is seeded from the operating system.
    pub fn from_entropy(program: &[u8]) -> Result<Self> {
        Self::new(program, StdRng::from_entropy())
    }
}

impl<R: Rng> Chip8Interpreter<R> {
    pub fn new(program: &[u8], rng: R) -> Result<Self> {
        let state = Chip8State::with_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(Self {
            state,
            display: Framebuffer::default(),
            keyboard: Keypad::default(),
            rng,
            current_opcode: 0,
            cycle_count: 0,
            halted: false,
            unknown_at: HashSet::new(),
        })
    }

    /// Marks `key` as pressed for the next step only.
    pub fn set_key(&mut self, key: usize) -> Result<()> {
        self.keyboard.press(key)
    }

    pub fn read_pixel(&self, x: usize, y: usize) -> Result<bool> {
        self.display.pixel(x, y)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.display
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.state.register(register_index & 0xF)
    }

    pub fn index_register(&self) -> u16 {
        self.state.index_register
    }

    pub fn program_counter(&self) -> u16 {
        self.state.program_counter
    }

    pub fn stack_depth(&self) -> usize {
        self.state.stack_pointer as usize
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Last word fetched by `step`.
    pub fn current_opcode(&self) -> u16 {
        self.current_opcode
    }

    /// Number of cycles completed since creation.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.ram
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Runs one cycle: fetch, decode, execute, release all keys, tick timers.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        match self.cycle() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(
                    "halting at {:#06X} (opcode {:#06X}): {}",
                    self.state.program_counter, self.current_opcode, e
                );
                self.halted = true;
                Err(e)
            }
        }
    }

    fn cycle(&mut self) -> Result<StepOutcome> {
        //fetch
        self.current_opcode = self.state.fetch()?;

        //decode + execute
        let outcome = match Instruction::decode(self.current_opcode) {
            Some(instruction) => self.execute(instruction)?,
            None => {
                let pc = self.state.program_counter;
                if self.unknown_at.insert(pc) {
                    warn!("unknown opcode {:04X} at {:#06X}", self.current_opcode, pc);
                } else {
                    debug!("unknown opcode {:04X} at {:#06X}", self.current_opcode, pc);
                }
                self.state.program_counter = self.state.program_counter.wrapping_add(2);
                StepOutcome::UnknownOpcode(self.current_opcode)
            }
        };

        self.keyboard.release_all();
        self.state.tick_timers();
        self.cycle_count += 1;
        Ok(outcome)
    }

    /// Applies one instruction. Every check happens before any state changes,
    /// so a failing instruction leaves the machine as it was.
    fn execute(&mut self, instruction: Instruction) -> Result<StepOutcome> {
        let state = &mut self.state;
        let next = state.program_counter.wrapping_add(2);
        let skip = state.program_counter.wrapping_add(4);

        match instruction {
            Instruction::ClearScreen => self.display.clear(),
            Instruction::Return => {
                state.program_counter = state.pop()?;
                return Ok(StepOutcome::Executed(instruction));
            }
            Instruction::Jump { address } => {
                state.program_counter = address;
                return Ok(StepOutcome::Executed(instruction));
            }
            Instruction::Call { address } => {
                state.push(next, address)?;
                state.program_counter = address;
                return Ok(StepOutcome::Executed(instruction));
            }
            Instruction::SkipIfEqual { x, kk } => {
                if state.register(x) == kk {
                    state.program_counter = skip;
                    return Ok(StepOutcome::Executed(instruction));
                }
            }
            Instruction::SkipIfNotEqual { x, kk } => {
                if state.register(x) != kk {
                    state.program_counter = skip;
                    return Ok(StepOutcome::Executed(instruction));
                }
            }
            Instruction::SkipIfRegistersEqual { x, y } => {
                if state.register(x) == state.register(y) {
                    state.program_counter = skip;
                    return Ok(StepOutcome::Executed(instruction));
                }
            }
            Instruction::LoadImmediate { x, kk } => *state.register_mut(x) = kk,
            Instruction::AddImmediate { x, kk } => {
                *state.register_mut(x) = state.register(x).wrapping_add(kk)
            }
            Instruction::Copy { x, y } => *state.register_mut(x) = state.register(y),
            Instruction::Or { x, y } => *state.register_mut(x) |= state.register(y),
            Instruction::And { x, y } => *state.register_mut(x) &= state.register(y),
            Instruction::Xor { x, y } => *state.register_mut(x) ^= state.register(y),
            Instruction::AddWithCarry { x, y } => {
                let (result, overflow) = state.register(x).overflowing_add(state.register(y));
                *state.register_mut(x) = result;
                state.set_flag(overflow);
            }
            Instruction::Subtract { x, y } => {
                let (result, borrow) = state.register(x).overflowing_sub(state.register(y));
                *state.register_mut(x) = result;
                state.set_flag(!borrow);
            }
            Instruction::ShiftRight { x } => {
                let value = state.register(x);
                *state.register_mut(x) = value >> 1;
                state.set_flag(value & 0x01 != 0);
            }
            Instruction::SubtractReversed { x, y } => {
                let (result, borrow) = state.register(y).overflowing_sub(state.register(x));
                *state.register_mut(x) = result;
                state.set_flag(!borrow);
            }
            Instruction::ShiftLeft { x } => {
                let value = state.register(x);
                *state.register_mut(x) = value << 1;
                state.set_flag(value & 0x80 != 0);
            }
            Instruction::SkipIfRegistersNotEqual { x, y } => {
                if state.register(x) != state.register(y) {
                    state.program_counter = skip;
                    return Ok(StepOutcome::Executed(instruction));
                }
            }
            Instruction::LoadIndex { address } => state.index_register = address,
            Instruction::JumpWithOffset { address } => {
                state.program_counter = address + state.register(0x0) as u16;
                return Ok(StepOutcome::Executed(instruction));
            }
            Instruction::Random { x, kk } => *state.register_mut(x) = self.rng.gen::<u8>() & kk,
            Instruction::Draw { x, y, n } => {
                let range = state.index_range(n as usize)?;
                let collided =
                    self.display
                        .draw(state.register(x), state.register(y), &state.ram[range]);
                state.set_flag(collided);
            }
            Instruction::SkipIfKeyPressed { x } => {
                if self.keyboard.is_key_down(state.register(x))? {
                    state.program_counter = skip;
                    return Ok(StepOutcome::Executed(instruction));
                }
            }
            Instruction::SkipIfKeyNotPressed { x } => {
                if !self.keyboard.is_key_down(state.register(x))? {
                    state.program_counter = skip;
                    return Ok(StepOutcome::Executed(instruction));
                }
            }
            Instruction::LoadDelayTimer { x } => *state.register_mut(x) = state.delay_timer,
            Instruction::WaitForKey { x } => match self.keyboard.first_pressed() {
                Some(key) => *state.register_mut(x) = key,
                None => return Ok(StepOutcome::AwaitingKey),
            },
            Instruction::SetDelayTimer { x } => state.delay_timer = state.register(x),
            Instruction::SetSoundTimer { x } => state.sound_timer = state.register(x),
            Instruction::AddToIndex { x } => {
                state.index_register = state
                    .index_register
                    .wrapping_add(state.register(x) as u16)
            }
            Instruction::LoadFontGlyph { x } => {
                state.index_register = FONT_BASE + state.register(x) as u16 * GLYPH_SIZE
            }
            Instruction::StoreBcd { x } => {
                let range = state.index_range(3)?;
                let value = state.register(x);
                state.ram[range].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }
            Instruction::StoreRegisters { x } => {
                let range = state.index_range(x as usize + 1)?;
                state.ram[range].copy_from_slice(&state.data_registers[..=x as usize]);
            }
            Instruction::LoadRegisters { x } => {
                let range = state.index_range(x as usize + 1)?;
                state.data_registers[..=x as usize].copy_from_slice(&state.ram[range]);
            }
        }

        state.program_counter = next;
        Ok(StepOutcome::Executed(instruction))
    }
}
