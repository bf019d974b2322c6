//! Command tree of the `unb` project utility.

use crate::{
    Group, Result,
    command::{build, django, heroku, lint, pip, shell, version},
    project,
};

/// Program name shown in help screens when argv carries none.
pub const PROG: &str = "unb";

/// Builds the full `unb` command tree.
pub fn build() -> Result<Group> {
    let mut cli = Group::new()
        .description("Project management utilities.")
        .epilog("Project settings are read from the nearest unb.toml.")
        .init(project::init);

    cli.register(build::handler(), None)?;
    cli.register(lint::handler(), None)?;
    cli.register(pip::handler(), Some("install-requirements"))?;
    cli.register(version::version_handler(), Some("version"))?;
    cli.register(version::bump_handler(), None)?;
    cli.register(shell::handler(), None)?;
    cli.add_group(heroku::group()?, "heroku");
    cli.add_group(django::group()?, "dj");
    Ok(cli)
}

/// Parses `argv` and runs the selected command.
pub fn run<I, T>(argv: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    build()?.dispatch(argv)
}

/// Verifies that every level of the tree builds a valid clap command.
#[test]
fn verify_cli() {
    let cli = build().unwrap();
    cli.parser(PROG).debug_assert();
    for entry in cli.entries() {
        if let crate::Target::Group(group) = entry.target() {
            group.parser(&format!("{PROG} {}", entry.name())).debug_assert();
        }
    }
}
