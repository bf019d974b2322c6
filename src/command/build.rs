//! `b`: run a named script from the project's `unb.toml`.

use anyhow::Context;

use crate::{ArgSpec, Arity, Handler, Namespace, project};

use super::{command_from, run};

pub fn handler() -> Handler {
    Handler::new("b", build)
        .doc(
            "Run a named script from the project's unb.toml.

            Scripts live in the `[scripts]` table; any extra arguments are appended to the
            script's command line.",
        )
        .arg(
            ArgSpec::new(["name"])
                .arity(Arity::Optional)
                .help("Name of the script to run"),
        )
        .arg(
            ArgSpec::new(["args"])
                .arity(Arity::Remainder)
                .help("Arguments passed on to the script"),
        )
}

/// Splits `script` into an argument vector and appends `extra`.
pub fn script_argv(script: &str, extra: &[String]) -> anyhow::Result<Vec<String>> {
    let mut argv =
        shlex::split(script).with_context(|| format!("malformed script: {script:?}"))?;
    argv.extend(extra.iter().cloned());
    Ok(argv)
}

fn build(args: &Namespace) -> anyhow::Result<()> {
    let Some(project) = project::current().filter(|p| !p.config().scripts.is_empty()) else {
        tracing::info!("No build script found.");
        return Ok(());
    };
    let scripts = &project.config().scripts;

    let Some(name) = args.get_str("name") else {
        println!("Available scripts:");
        for name in scripts.keys() {
            println!("  {name}");
        }
        return Ok(());
    };
    let Some(script) = scripts.get(name) else {
        tracing::info!("Script ({name}) not found.");
        println!("Available scripts: {}", join_keys(scripts.keys()));
        return Ok(());
    };

    let argv = script_argv(script, &args.get_strings("args"))?;
    let Some(mut cmd) = command_from(&argv) else {
        tracing::info!("Script ({name}) is empty.");
        return Ok(());
    };
    run(cmd.current_dir(project.root()))?;
    Ok(())
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}
