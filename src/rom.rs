use std::{fs, path::Path};

use anyhow::{bail, Context};
use chip8vm_core::{MEMORY_SIZE, PROGRAM_START};
use log::debug;

/// Reads a program image from disk. An empty file is refused: it would
/// only ever execute the zeroed memory after it.
pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    let program =
        fs::read(path).with_context(|| format!("could not read ROM {}", path.display()))?;
    if program.is_empty() {
        bail!("ROM {} is empty", path.display());
    }
    debug!(
        "read {} of at most {} bytes from {}",
        program.len(),
        MEMORY_SIZE - PROGRAM_START as usize,
        path.display()
    );
    Ok(program)
}
