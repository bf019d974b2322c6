//! `heroku`: Heroku deployment helpers.

use std::process::Command;

use crate::{ArgSpec, Group, Handler, Namespace, Result};

use super::{CommandError, run};

const UPDATE_REMOTE_DOC: &str = "Update the Heroku git remote given a Heroku app name.

    Ensure the remote is set to use the ssh protocol, which also eliminates the
    need to specify the app name for each Heroku toolbelt command.
";

/// The `heroku` command group.
pub fn group() -> Result<Group> {
    let mut heroku = Group::new()
        .title("Heroku commands")
        .description("Manage the Heroku deployment of the current project.");
    heroku.register(
        Handler::new("update_remote", update_remote)
            .doc(UPDATE_REMOTE_DOC)
            .arg(ArgSpec::new(["app_name"]).help("Name of the Heroku app")),
        Some("update-remote"),
    )?;
    Ok(heroku)
}

/// Commands run by `update-remote`, in order.
pub fn update_remote_commands(app_name: &str) -> [Command; 2] {
    let mut remove = Command::new("git");
    remove.args(["remote", "rm", "heroku"]);
    let mut add = Command::new("heroku");
    add.args(["git:remote", "-a", app_name, "--ssh-git"]);
    [remove, add]
}

fn update_remote(args: &Namespace) -> anyhow::Result<()> {
    let app_name = args.get_str("app_name").unwrap_or_default();
    let [mut remove, mut add] = update_remote_commands(app_name);
    // A missing remote is fine; git reports it on its own.
    match run(&mut remove) {
        Ok(()) | Err(CommandError::Failed { .. }) => {}
        Err(err) => return Err(err.into()),
    }
    run(&mut add)?;
    Ok(())
}
