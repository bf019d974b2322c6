//! `dj`: Django management commands, run through the project's `manage.py`.

use std::process::Command;

use crate::{ArgSpec, Arity, Group, Handler, Namespace, Result, project::Project};

use super::{lint, run};

/// Environment variable Django reads its settings module from.
pub const SETTINGS_ENV: &str = "DJANGO_SETTINGS_MODULE";

/// The `dj` command group.
pub fn group() -> Result<Group> {
    let mut dj = Group::new()
        .title("Django commands")
        .description("Run Django management commands for the current project.")
        .replace_underscores_with_dashes(true);

    dj.register(
        Handler::new("m", m)
            .doc("Run manage.py commands (using the project's settings).")
            .arg(
                ArgSpec::new(["name"])
                    .arity(Arity::Optional)
                    .default_value("help")
                    .help("The name of the manage.py command you want to run."),
            )
            .arg(
                ArgSpec::new(["args"])
                    .arity(Arity::Remainder)
                    .help("Arguments to pass to the manage.py command."),
            ),
        None,
    )?;
    dj.register(
        Handler::new("migrate", |_: &Namespace| {
            with_django(&["makemigrations", "migrate"], |project| {
                manage(project, "makemigrations", &[])?;
                manage(project, "migrate", &[])
            })
        })
        .doc("Make migrations and run them."),
        None,
    )?;
    dj.register(
        Handler::new("clear_cache", |_: &Namespace| {
            println!("Clearing database cache...");
            with_django(&["clearsessions"], |project| {
                manage(project, "clearsessions", &[])
            })
        })
        .doc("Clear expired session data from the database-backed cache."),
        None,
    )?;
    dj.register(
        Handler::new("test", |_: &Namespace| {
            with_django(&["test"], |project| {
                lint::run_linter(project)?;
                manage(project, "test", &[])
            })
        })
        .doc("Run linters, then the test suite."),
        None,
    )?;
    dj.register(
        Handler::new("shell", |_: &Namespace| {
            with_django(&["shell_plus"], |project| manage(project, "shell_plus", &[]))
        })
        .doc("Run shell_plus."),
        None,
    )?;
    Ok(dj)
}

fn m(args: &Namespace) -> anyhow::Result<()> {
    let name = args.get_str("name").unwrap_or("help").to_string();
    let rest = args.get_strings("args");
    let mut described = vec![name.clone()];
    described.extend(rest.iter().cloned());
    with_django(&described, |project| manage(project, &name, &rest))
}

/// Runs `f` when the current project is a Django project, reporting `command` otherwise.
fn with_django<S, F>(command: &[S], f: F) -> anyhow::Result<()>
where
    S: AsRef<str>,
    F: FnOnce(&Project) -> anyhow::Result<()>,
{
    match crate::project::current() {
        Some(project) if project.is_django() => f(project),
        _ => {
            let command: Vec<&str> = command.iter().map(AsRef::as_ref).collect();
            println!(
                "Not in a Django project. Did not run command: {}",
                command.join(" ")
            );
            Ok(())
        }
    }
}

/// The `manage.py` invocation for `name` with `args`.
pub fn manage_command(project: &Project, name: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(&project.config().python);
    cmd.current_dir(project.root())
        .arg("manage.py")
        .arg(name)
        .args(args);
    if let Some(settings) = &project.config().django_settings {
        cmd.env(SETTINGS_ENV, settings);
    }
    cmd
}

/// Runs a management command of `project`.
pub fn manage(project: &Project, name: &str, args: &[String]) -> anyhow::Result<()> {
    run(&mut manage_command(project, name, args))?;
    Ok(())
}
