//! `install-requirements`: pip install the project's requirement files.

use std::{path::Path, process::Command};

use crate::{ArgAction, ArgSpec, Handler, Namespace, annotate, project};

use super::run;

pub fn handler() -> Handler {
    annotate(
        ArgSpec::new(["-v", "--verbose"])
            .action(ArgAction::StoreTrue)
            .help("Show pip's full output"),
    )(Handler::new("install_requirements", install_requirements))
    .doc("pip install (dev-)requirements.txt")
}

/// The pip invocation for one requirements file.
pub fn pip_install(requirements: &Path, verbose: bool) -> Command {
    let mut cmd = Command::new("pip");
    cmd.args(["install", "-r"]).arg(requirements);
    if !verbose {
        cmd.arg("-q");
    }
    cmd
}

fn install_requirements(args: &Namespace) -> anyhow::Result<()> {
    let Some(project) = project::current() else {
        tracing::info!("Not in a project, no requirements to install.");
        return Ok(());
    };
    let verbose = args.get_flag("verbose");
    let config = project.config();

    println!("Installing project dependencies...");
    for file in [&config.requirements, &config.dev_requirements] {
        let path = project.resolve(file);
        if !path.is_file() {
            tracing::info!("No requirements file at {}.", path.display());
            continue;
        }
        run(&mut pip_install(&path, verbose))?;
    }
    Ok(())
}
