use anyhow::Context;
use chip8vm_core::{Chip8Interpreter, Framebuffer, StepOutcome};
use log::info;

/// Runs `cycles` cycles with no input and returns the final screen as text.
pub fn run(program: &[u8], seed: Option<u64>, cycles: u64) -> anyhow::Result<String> {
    let mut interpreter = match seed {
        Some(seed) => Chip8Interpreter::with_seed(program, seed)?,
        None => Chip8Interpreter::from_entropy(program)?,
    };

    let mut unknown = 0;
    for _ in 0..cycles {
        let outcome = interpreter
            .step()
            .with_context(|| format!("after {} cycles", interpreter.cycle_count()))?;
        if let StepOutcome::UnknownOpcode(_) = outcome {
            unknown += 1;
        }
    }
    info!(
        "ran {} cycles, {} unknown opcodes, pc {:#06X}",
        interpreter.cycle_count(),
        unknown,
        interpreter.program_counter()
    );

    Ok(render_text(interpreter.framebuffer()))
}

/// One line per row, `#` for a lit pixel and `.` for a dark one.
pub fn render_text(framebuffer: &Framebuffer) -> String {
    let mut out = String::new();
    for row in framebuffer.rows() {
        out.extend(row.iter().map(|&on| if on { '#' } else { '.' }));
        out.push('\n');
    }
    out
}
