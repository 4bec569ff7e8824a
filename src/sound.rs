//! Alert sound playback
//!
//! Playback is best effort: callers ignore every failure.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Stdio;

pub trait SoundPlayer: Send + Sync {
    fn play(&self, path: &Path) -> Result<()>;
}

/// Plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Hands the file to an external audio program without waiting for it
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `afplay` on macOS, `paplay` elsewhere
    pub fn system_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("afplay")
        } else {
            Self::new("paplay")
        }
    }
}

impl SoundPlayer for CommandPlayer {
    fn play(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            bail!("Sound file {} not found", path.display());
        }

        tokio::process::Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;
        Ok(())
    }
}
