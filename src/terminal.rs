use std::{
    io::{self, stdout, Stdout, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use chip8vm_core::{Chip8Interpreter, Framebuffer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Stylize},
    terminal,
};
use log::{debug, info};

use crate::keymap::{key_for, HeldKeys};

/// Time between two interpreter cycles.
const CYCLE_INTERVAL: Duration = Duration::from_micros(1_000_000 / 500);
/// Time between two screen refreshes.
const FRAME_INTERVAL: Duration = Duration::from_micros(1_000_000 / 60);

struct Timer {
    interval: Duration,
    last_tick: Instant,
}

impl Timer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
        }
    }

    fn tick(&mut self) -> bool {
        if self.last_tick.elapsed() >= self.interval {
            self.last_tick += self.interval;
            true
        } else {
            false
        }
    }
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

enum Command {
    Continue,
    Restart,
    Quit,
}

fn boot(program: &[u8], seed: Option<u64>) -> anyhow::Result<Chip8Interpreter> {
    let interpreter = match seed {
        Some(seed) => Chip8Interpreter::with_seed(program, seed)?,
        None => Chip8Interpreter::from_entropy(program)?,
    };
    Ok(interpreter)
}

fn poll_input(held: &mut HeldKeys) -> io::Result<Command> {
    while event::poll(Duration::ZERO)? {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Command::Quit)
            }
            KeyCode::Esc => return Ok(Command::Restart),
            KeyCode::Char(c) => match key_for(c) {
                Some(mapped) => held.press(mapped, Instant::now()),
                None => debug!("no CHIP-8 key for {:?}", c),
            },
            _ => {}
        }
    }
    Ok(Command::Continue)
}

fn draw(stdout: &mut Stdout, framebuffer: &Framebuffer) -> io::Result<()> {
    for (y, row) in framebuffer.rows().enumerate() {
        queue!(stdout, cursor::MoveTo(0, y as u16))?;
        for &on in row {
            if on {
                queue!(stdout, style::PrintStyledContent("██".yellow()))?;
            } else {
                queue!(stdout, style::PrintStyledContent("  ".black()))?;
            }
        }
    }
    stdout.flush()
}

/// Runs `program` in the terminal until the user quits. `Esc` starts the
/// program over, `Ctrl-C` quits.
pub fn run(program: &[u8], seed: Option<u64>) -> anyhow::Result<()> {
    let mut guard = TerminalGuard::enter().context("could not set up the terminal")?;
    let mut interpreter = boot(program, seed)?;
    let mut held = HeldKeys::default();
    let mut frame_timer = Timer::new(FRAME_INTERVAL);
    let mut shown: Option<Framebuffer> = None;
    let mut next_cycle = Instant::now() + CYCLE_INTERVAL;

    loop {
        match poll_input(&mut held)? {
            Command::Continue => {}
            Command::Restart => {
                info!("restarting after {} cycles", interpreter.cycle_count());
                interpreter = boot(program, seed)?;
                held.release_all();
                shown = None;
            }
            Command::Quit => return Ok(()),
        }

        for key in held.active(Instant::now()) {
            interpreter.set_key(key)?;
        }
        interpreter.step().with_context(|| {
            format!(
                "program stopped at {:#06X} after {} cycles",
                interpreter.program_counter(),
                interpreter.cycle_count()
            )
        })?;

        if frame_timer.tick() && shown.as_ref() != Some(interpreter.framebuffer()) {
            draw(&mut guard.stdout, interpreter.framebuffer())?;
            shown = Some(interpreter.framebuffer().clone());
        }

        let now = Instant::now();
        if next_cycle > now {
            thread::sleep(next_cycle - now);
        }
        next_cycle += CYCLE_INTERVAL;
    }
}
