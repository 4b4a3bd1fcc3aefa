use chip8vm_core::{
    display_height, display_width, Chip8Error, Chip8Interpreter, Instruction, StepOutcome,
    MEMORY_SIZE, PROGRAM_START,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_log::test;

fn assemble(opcodes: &[u16]) -> Vec<u8> {
    opcodes.iter().flat_map(|op| op.to_be_bytes()).collect()
}

fn boot(opcodes: &[u16]) -> Chip8Interpreter {
    Chip8Interpreter::with_seed(&assemble(opcodes), 8).unwrap()
}

fn lit_pixels(interpreter: &Chip8Interpreter) -> usize {
    let mut count = 0;
    for y in 0..display_height() {
        for x in 0..display_width() {
            if interpreter.read_pixel(x, y).unwrap() {
                count += 1;
            }
        }
    }
    count
}

#[test]
fn fresh_framebuffer_is_dark() {
    let interpreter = boot(&[0x00E0]);
    assert_eq!(display_width(), 64);
    assert_eq!(display_height(), 32);
    assert_eq!(lit_pixels(&interpreter), 0);
    assert_eq!(
        interpreter.read_pixel(64, 31),
        Err(Chip8Error::CoordinateOutOfRange { x: 64, y: 31 })
    );
}

#[test]
fn oversized_program_is_rejected() {
    let result = Chip8Interpreter::with_seed(&vec![0; 4096 - 511], 0);
    assert!(matches!(
        result,
        Err(Chip8Error::ProgramTooLarge {
            size: 3585,
            max_size: 3584
        })
    ));
}

#[test]
fn program_area_limits() {
    assert_eq!(MEMORY_SIZE, 4096);
    assert_eq!(PROGRAM_START, 0x200);
    let max = MEMORY_SIZE - PROGRAM_START as usize;
    assert!(Chip8Interpreter::with_seed(&vec![0; max], 0).is_ok());
    assert!(Chip8Interpreter::with_seed(&vec![0; max + 1], 0).is_err());
}

#[test]
fn running_off_the_end_of_memory_is_fatal() {
    // fill memory with "ld v0, 0" until the last word
    let program = assemble(&vec![0x6000; (4096 - 512) / 2]);
    let mut interpreter = Chip8Interpreter::with_seed(&program, 0).unwrap();
    for _ in 0..(4096 - 512) / 2 {
        interpreter.step().unwrap();
    }
    assert_eq!(interpreter.program_counter(), 0x1000);
    assert_eq!(
        interpreter.step(),
        Err(Chip8Error::ProgramCounterOutOfBounds { pc: 0x1000 })
    );
    assert_eq!(interpreter.step(), Err(Chip8Error::Halted));
}

#[test]
fn jumping_to_the_last_byte_is_fatal() {
    let mut interpreter = boot(&[0x1FFF]);
    interpreter.step().unwrap();
    assert_eq!(
        interpreter.step(),
        Err(Chip8Error::ProgramCounterOutOfBounds { pc: 0xFFF })
    );
}

#[test]
fn random_programs_never_fetch_out_of_bounds() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..50 {
        let len = rng.gen_range(0..=4096 - 512);
        let program: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let mut interpreter = Chip8Interpreter::with_seed(&program, rng.gen()).unwrap();
        for _ in 0..2000 {
            let pc = interpreter.program_counter();
            match interpreter.step() {
                Ok(_) => {
                    assert!(pc as usize + 1 < 4096);
                    let word = u16::from_be_bytes([
                        interpreter.memory()[pc as usize],
                        interpreter.memory()[pc as usize + 1],
                    ]);
                    // the fetched word is the one at the old program counter,
                    // unless the instruction just overwrote it
                    if !matches!(
                        Instruction::decode(interpreter.current_opcode()),
                        Some(Instruction::StoreBcd { .. } | Instruction::StoreRegisters { .. })
                    ) {
                        assert_eq!(interpreter.current_opcode(), word);
                    }
                }
                Err(Chip8Error::ProgramCounterOutOfBounds { pc }) => {
                    assert!(pc as usize + 1 >= 4096);
                    break;
                }
                Err(_) => {
                    assert!(interpreter.is_halted());
                    break;
                }
            }
        }
    }
}

#[test]
fn add_with_carry() {
    for (a, b) in [(250u8, 10u8), (10, 20), (255, 1), (128, 128), (0, 0), (255, 0)] {
        let mut interpreter = boot(&[0x6000 | a as u16, 0x6100 | b as u16, 0x8014]);
        for _ in 0..3 {
            interpreter.step().unwrap();
        }
        let sum = a as u16 + b as u16;
        assert_eq!(interpreter.register(0) as u16, sum % 256);
        assert_eq!(interpreter.register(0xF), (sum > 255) as u8);
    }
}

#[test]
fn subtract_with_borrow() {
    // 8xy7: vx = vy - vx
    let mut interpreter = boot(&[0x6005, 0x610A, 0x8017]);
    for _ in 0..3 {
        interpreter.step().unwrap();
    }
    assert_eq!(interpreter.register(0), 5);
    assert_eq!(interpreter.register(0xF), 1);

    let mut interpreter = boot(&[0x600A, 0x6105, 0x8017]);
    for _ in 0..3 {
        interpreter.step().unwrap();
    }
    assert_eq!(interpreter.register(0), 251);
    assert_eq!(interpreter.register(0xF), 0);
}

#[test]
fn shift_right() {
    let mut interpreter = boot(&[0x6003, 0x8006, 0x6102, 0x8116]);
    interpreter.step().unwrap();
    interpreter.step().unwrap();
    assert_eq!(interpreter.register(0), 1);
    assert_eq!(interpreter.register(0xF), 1);
    interpreter.step().unwrap();
    interpreter.step().unwrap();
    assert_eq!(interpreter.register(1), 1);
    assert_eq!(interpreter.register(0xF), 0);
}

#[test]
fn drawing_twice_erases_and_collides() {
    // I = 0x20A (the sprite byte below), draw at (v0, v1) twice
    let mut interpreter = boot(&[0x00E0, 0xA20A, 0xD011, 0xD011, 0x1208, 0xBD00]);
    for _ in 0..3 {
        interpreter.step().unwrap();
    }
    assert_eq!(interpreter.register(0xF), 0);
    assert_eq!(lit_pixels(&interpreter), 6);
    assert!(interpreter.read_pixel(0, 0).unwrap());
    assert!(!interpreter.read_pixel(1, 0).unwrap());

    interpreter.step().unwrap();
    assert_eq!(interpreter.register(0xF), 1);
    assert_eq!(lit_pixels(&interpreter), 0);
}

#[test]
fn drawing_wraps_around_the_right_edge() {
    // v0 = 62, v1 = 0, I = 0x208 (0xFF), draw one row
    let mut interpreter = boot(&[0x603E, 0x6100, 0xA208, 0xD011, 0xFF00]);
    for _ in 0..4 {
        interpreter.step().unwrap();
    }
    let lit: Vec<usize> = (0..64)
        .filter(|&x| interpreter.read_pixel(x, 0).unwrap())
        .collect();
    assert_eq!(lit, vec![0, 1, 2, 3, 4, 5, 62, 63]);
    assert_eq!(interpreter.register(0xF), 0);
}

#[test]
fn key_wait_blocks_until_a_key_is_pressed() {
    let mut interpreter = boot(&[0xF30A, 0x1202]);
    for _ in 0..10 {
        assert_eq!(interpreter.step(), Ok(StepOutcome::AwaitingKey));
        assert_eq!(interpreter.program_counter(), 0x200);
    }

    interpreter.set_key(0xE).unwrap();
    interpreter.set_key(0x2).unwrap();
    interpreter.set_key(0x9).unwrap();
    interpreter.step().unwrap();
    assert_eq!(interpreter.program_counter(), 0x202);
    assert_eq!(interpreter.register(3), 0x2);
}

#[test]
fn key_press_lasts_a_single_cycle() {
    // wait on a second key after the first one is consumed
    let mut interpreter = boot(&[0xF00A, 0xF10A, 0x1204]);
    interpreter.set_key(5).unwrap();
    interpreter.step().unwrap();
    assert_eq!(interpreter.register(0), 5);
    assert_eq!(interpreter.step(), Ok(StepOutcome::AwaitingKey));
    assert_eq!(interpreter.program_counter(), 0x202);
}

#[test]
fn delay_timer_counts_down_to_zero() {
    // v0 = 5; dt = v0; then spin on a jump
    let mut interpreter = boot(&[0x6005, 0xF015, 0x1204]);
    interpreter.step().unwrap();
    // the cycle that loads the timer also ticks it once
    interpreter.step().unwrap();
    assert_eq!(interpreter.delay_timer(), 4);
    for expected in (0..4).rev() {
        interpreter.step().unwrap();
        assert_eq!(interpreter.delay_timer(), expected);
    }
    for _ in 0..3 {
        interpreter.step().unwrap();
        assert_eq!(interpreter.delay_timer(), 0);
    }
}

#[test]
fn sound_timer_reports_activity() {
    let mut interpreter = boot(&[0x6002, 0xF018, 0x1204]);
    interpreter.step().unwrap();
    interpreter.step().unwrap();
    assert!(interpreter.sound_active());
    interpreter.step().unwrap();
    assert!(!interpreter.sound_active());
}

#[test]
fn unknown_opcodes_are_skipped() {
    let mut interpreter = boot(&[0x0123, 0x8FFF, 0x6142]);
    assert_eq!(interpreter.step(), Ok(StepOutcome::UnknownOpcode(0x0123)));
    assert_eq!(interpreter.step(), Ok(StepOutcome::UnknownOpcode(0x8FFF)));
    assert_eq!(
        interpreter.step(),
        Ok(StepOutcome::Executed(Instruction::LoadImmediate { x: 1, kk: 0x42 }))
    );
    assert_eq!(interpreter.register(1), 0x42);
    assert_eq!(interpreter.cycle_count(), 3);
}

#[test]
fn subroutine_prints_a_digit() {
    // main: v0 = 7; call 0x208; spin
    // 0x208: I = glyph(v0); draw at (v1, v1); ret
    let mut interpreter = boot(&[0x6007, 0x2208, 0x1204, 0x0000, 0xF029, 0xD115, 0x00EE]);
    for _ in 0..5 {
        interpreter.step().unwrap();
    }
    assert_eq!(interpreter.program_counter(), 0x204);
    assert_eq!(interpreter.stack_depth(), 0);
    // "7" is F0 10 20 40 40
    assert_eq!(lit_pixels(&interpreter), 4 + 1 + 1 + 1 + 1);
    assert!(interpreter.read_pixel(3, 1).unwrap());
    assert!(interpreter.read_pixel(1, 4).unwrap());
}

#[test]
fn bcd_then_load_registers() {
    // v5 = 173; I = 0x300; bcd v5; v0..v2 = [I..I+3)
    let mut interpreter = boot(&[0x65AD, 0xA300, 0xF533, 0xF265]);
    for _ in 0..4 {
        interpreter.step().unwrap();
    }
    assert_eq!(interpreter.register(0), 1);
    assert_eq!(interpreter.register(1), 7);
    assert_eq!(interpreter.register(2), 3);
    assert_eq!(interpreter.index_register(), 0x300);
}
