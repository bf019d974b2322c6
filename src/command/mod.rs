//! Subcommands of the `unb` project utility.
//!
//! Each module exposes the [`Handler`](crate::Handler)s (or nested [`Group`](crate::Group))
//! wired into the tree by [`crate::cli`]. Commands build an argument vector, run it
//! synchronously and forward a non-zero exit status.

use std::process::Command;

use thiserror::Error;

pub mod build;
pub mod django;
pub mod heroku;
pub mod lint;
pub mod pip;
pub mod shell;
pub mod version;

/// Failure of an external program started by a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {code}")]
    Failed { program: String, code: i32 },
}

impl CommandError {
    /// Exit status `unb` should end with.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Spawn { .. } => 127,
            CommandError::Failed { code, .. } => *code,
        }
    }
}

/// Runs `cmd` to completion, inheriting stdio.
pub fn run(cmd: &mut Command) -> Result<(), CommandError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!("running {:?}", cmd);
    let status = cmd.status().map_err(|source| CommandError::Spawn {
        program: program.clone(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(CommandError::Failed {
            program,
            code: status.code().unwrap_or(1),
        })
    }
}

/// Builds a command from an argument vector whose first element is the program.
pub(crate) fn command_from(argv: &[String]) -> Option<Command> {
    let (program, args) = argv.split_first()?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    Some(cmd)
}
