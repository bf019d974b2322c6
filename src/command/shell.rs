//! `shell`: open an interactive shell for the project.

use std::process::Command;

use crate::{Handler, Namespace, project};

use super::{django, run};

pub fn handler() -> Handler {
    Handler::new("shell", shell).doc(
        "Run shell.

        Uses `manage.py shell_plus` inside a Django project and `ipython` elsewhere.",
    )
}

fn shell(_: &Namespace) -> anyhow::Result<()> {
    match project::current() {
        Some(project) if project.is_django() => django::manage(project, "shell_plus", &[]),
        _ => {
            run(&mut Command::new("ipython"))?;
            Ok(())
        }
    }
}
