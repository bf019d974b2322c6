//! Routes an argument vector to exactly one leaf handler, descending into nested groups.

use std::{iter, path::Path};

use crate::{
    error::{Error, Result},
    group::{Group, HELP_FLAG, REMAINDER_ID, Target},
    handler::Handler,
    namespace::Namespace,
};

/// Program name used when the argument vector is empty.
const DEFAULT_PROG: &str = "command";

/// Outcome of parsing one level of the tree.
enum Resolved<'a> {
    Leaf {
        handler: &'a Handler,
        values: Namespace,
    },
    Group {
        name: &'a str,
        group: &'a Group,
        args: Vec<String>,
    },
}

impl Group {
    /// Parses `argv` (program name first) and runs the command it names.
    ///
    /// An argv holding only the program name shows this group's help. Help screens and usage
    /// errors come back as [`Error::Usage`]; handler errors as [`Error::Handler`].
    pub fn dispatch<I, T>(&self, argv: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let prog = argv
            .next()
            .map(|arg0| program_name(&arg0))
            .unwrap_or_else(|| DEFAULT_PROG.to_string());
        let mut args: Vec<String> = argv.collect();
        if args.is_empty() {
            args.push(HELP_FLAG.to_string());
        }

        let resolved = self.resolve(&prog, args)?;

        if let Some(init) = self.init_hook() {
            init().map_err(Error::Init)?;
        }

        match resolved {
            Resolved::Group { name, group, args } => {
                let prog = format!("{prog} {name}");
                if args.is_empty() {
                    tracing::debug!(group = %prog, "no arguments for nested group, showing help");
                    return Err(Error::Usage(group.help(&prog)));
                }
                tracing::debug!(group = %prog, "descending into nested group");
                group.dispatch(iter::once(prog).chain(args))
            }
            Resolved::Leaf { handler, values } => {
                tracing::debug!(
                    command = handler.name(),
                    fields = values.len(),
                    "running command"
                );
                handler.call(&values).map_err(Error::Handler)
            }
        }
    }

    /// Dispatches the arguments this process was started with; [`dispatch`](Group::dispatch)
    /// over [`std::env::args`].
    pub fn dispatch_env(&self) -> Result<()> {
        self.dispatch(std::env::args())
    }

    fn resolve(&self, prog: &str, args: Vec<String>) -> Result<Resolved<'_>> {
        let matches = self
            .parser(prog)
            .try_get_matches_from(iter::once(prog.to_string()).chain(args))?;
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| Error::Usage(self.help(prog)))?;
        let entry = self
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;

        Ok(match entry.target() {
            Target::Leaf(handler) => Resolved::Leaf {
                handler,
                values: Namespace::from_matches(handler.arg_specs(), sub_matches),
            },
            Target::Group(group) => Resolved::Group {
                name: entry.name(),
                group,
                args: sub_matches
                    .get_many::<String>(REMAINDER_ID)
                    .into_iter()
                    .flatten()
                    .cloned()
                    .collect(),
            },
        })
    }
}

fn program_name(arg0: &str) -> String {
    Path::new(arg0)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(arg0)
        .to_string()
}
