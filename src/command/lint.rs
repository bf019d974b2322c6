//! `lint`: run the configured linter over the project.

use crate::{Handler, Namespace, project};

use super::{command_from, run};

const DOC: &str = "Run linters.

    The linter command line comes from the `lint` key of `unb.toml` and defaults to
    `flake8`. The project root is appended as the last argument.

    For a catch-all flake8 configuration, add a `~/.config/flake8` file:

        [flake8]
        ignore=E111,E121,F403
        exclude=migrations,venv
        max-line-length = 79
";

pub fn handler() -> Handler {
    Handler::new("lint", lint).doc(DOC)
}

fn lint(_: &Namespace) -> anyhow::Result<()> {
    let Some(project) = project::current() else {
        tracing::info!("Not in a project, nothing to lint.");
        return Ok(());
    };
    run_linter(project)
}

/// Runs the linter against `project`; shared with `dj test`.
pub(crate) fn run_linter(project: &project::Project) -> anyhow::Result<()> {
    let Some(mut cmd) = command_from(&project.config().lint) else {
        tracing::info!("No lint command configured.");
        return Ok(());
    };
    run(cmd.arg(project.root()))?;
    Ok(())
}
