//! Command implementations.
//!
//! Each command takes its parsed arguments and the shared [`Context`] and
//! writes JSON to stdout, status lines to stderr.

pub mod check;
pub mod resolve;
pub mod split;

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tandem_config::{Mode, Settings};

use crate::cli::ModeArg;
use crate::error::Result;

pub use check::execute as check_execute;
pub use resolve::execute as resolve_execute;
pub use split::execute as split_execute;

/// State shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Context {
    pub fn load(root: PathBuf) -> Result<Self> {
        let settings = Settings::load(&root)?;
        Ok(Self { root, settings })
    }

    /// The mode from the command line, else from the project settings.
    pub fn mode(&self, arg: Option<ModeArg>) -> Mode {
        arg.map_or(self.settings.mode, Mode::from)
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if compact {
        serde_json::to_writer(&mut stdout, value)?;
    } else {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}
