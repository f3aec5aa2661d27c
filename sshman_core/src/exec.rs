use std::fmt::{self, Display};
use std::io;
use std::process::{Command, ExitStatus};

use log::info;

/// Failure to launch or wait on the selected command.
#[derive(Debug)]
pub enum ExecError {
    Io(io::Error),
}

impl From<io::Error> for ExecError {
    fn from(err: io::Error) -> ExecError {
        ExecError::Io(err)
    }
}

impl Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Io(e) => write!(f, "failed to run command: {}", e),
        }
    }
}

impl std::error::Error for ExecError {}

/// Narrow seam around "run this stored command string in a shell".
///
/// Stored commands are executed verbatim on purpose; keeping the capability
/// behind one trait lets tests substitute a recording fake and gives any
/// future command validation a single place to live.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<ExitStatus, ExecError>;
}

/// Runs the command through the system shell, inheriting the terminal so
/// interactive SSH sessions work. Blocks until the command exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<ExitStatus, ExecError> {
        info!("Executing: {}", command);
        #[cfg(windows)]
        let status = Command::new("cmd").args(["/C", command]).status()?;
        #[cfg(not(windows))]
        let status = Command::new("sh").args(["-c", command]).status()?;
        Ok(status)
    }
}
