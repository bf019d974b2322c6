//! Command groups: a registry of named commands rendered as one clap parser tree.

use std::fmt;

use clap::Arg;

use crate::{
    arg,
    doc::DocParts,
    error::{Error, Result},
    handler::Handler,
};

/// Listing heading used when a group has no explicit title.
pub const DEFAULT_TITLE: &str = "Commands";

/// Field the remainder of a nested group's arguments is captured under.
pub(crate) const REMAINDER_ID: &str = "args";

/// Flag substituted for an empty argument list.
pub(crate) const HELP_FLAG: &str = "-h";

/// Hook run after parsing succeeds and before the command runs.
pub type InitHook = dyn Fn() -> anyhow::Result<()>;

/// What a registered name resolves to.
#[derive(Debug)]
pub enum Target {
    Leaf(Handler),
    Group(Box<Group>),
}

/// One registered command: its name, target and subparser.
#[derive(Debug)]
pub struct CommandEntry {
    name: String,
    target: Target,
    parser: clap::Command,
}

impl CommandEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn parser(&self) -> &clap::Command {
        &self.parser
    }
}

/// A collection of commands sharing one help and usage surface.
///
/// Groups are populated with [`register`](Group::register) and
/// [`add_group`](Group::add_group) before the first dispatch and only read afterwards.
pub struct Group {
    title: String,
    description: String,
    epilog: String,
    replace_underscores_with_dashes: bool,
    init: Option<Box<InitHook>>,
    entries: Vec<CommandEntry>,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            epilog: String::new(),
            replace_underscores_with_dashes: false,
            init: None,
            entries: Vec::new(),
        }
    }

    /// Heading of the command listing. Empty keeps [`DEFAULT_TITLE`].
    pub fn title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.is_empty() {
            self.title = title;
        }
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = epilog.into();
        self
    }

    /// Derive `foo-bar` rather than `foo_bar` from handler names when no name is given.
    pub fn replace_underscores_with_dashes(mut self, replace: bool) -> Self {
        self.replace_underscores_with_dashes = replace;
        self
    }

    /// Runs `hook` once per dispatch, after a successful parse and before the command.
    pub fn init<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.init = Some(Box::new(hook));
        self
    }

    pub fn get_title(&self) -> &str {
        &self.title
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_epilog(&self) -> &str {
        &self.epilog
    }

    pub(crate) fn init_hook(&self) -> Option<&InitHook> {
        self.init.as_deref()
    }

    /// Registers a leaf command and returns its subparser.
    ///
    /// The name is `name` when given, else the handler's name. Registering an existing name
    /// replaces the earlier command in place. Fails when the handler's positional arguments
    /// cannot be parsed in their declared order.
    pub fn register(&mut self, handler: Handler, name: Option<&str>) -> Result<&clap::Command> {
        let name = self.command_name(&handler, name);
        let layout = arg::layout(handler.arg_specs()).map_err(|reason| Error::Layout {
            command: name.clone(),
            reason,
        })?;
        let doc = DocParts::parse(handler.documentation());

        let mut parser = clap::Command::new(name.clone())
            .args(layout.args)
            .allow_missing_positional(layout.allow_missing_positional);
        if !doc.title.is_empty() {
            parser = parser.about(doc.title);
        }
        if !doc.body.is_empty() {
            parser = parser.after_help(doc.body);
        }

        Ok(self.insert(CommandEntry {
            name,
            target: Target::Leaf(handler),
            parser,
        }))
    }

    /// Registering form for declaration sites: registers `handler` and hands it back.
    pub fn command<'a>(
        &'a mut self,
        name: Option<&'a str>,
    ) -> impl FnOnce(Handler) -> Result<Handler> + 'a {
        move |handler| {
            self.register(handler.clone(), name)?;
            Ok(handler)
        }
    }

    /// Registers `group` as a pseudo-command that forwards its remaining arguments.
    pub fn add_group(&mut self, group: Group, name: &str) -> &clap::Command {
        let mut parser = clap::Command::new(name.to_string()).about(group.title.clone());
        if !group.description.is_empty() {
            parser = parser.before_help(group.description.clone());
        }
        if !group.epilog.is_empty() {
            parser = parser.after_help(group.epilog.clone());
        }
        parser = parser.arg(
            Arg::new(REMAINDER_ID)
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .value_name("ARGS")
                .help(format!("Arguments for the {name} commands")),
        );

        self.insert(CommandEntry {
            name: name.to_string(),
            target: Target::Group(Box::new(group)),
            parser,
        })
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Registered command names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Assembles the full parser tree under program name `prog`.
    pub fn parser(&self, prog: &str) -> clap::Command {
        let mut root = clap::Command::new(prog.to_string())
            .bin_name(prog.to_string())
            .subcommand_required(true)
            .disable_help_subcommand(true)
            .subcommand_value_name("COMMAND")
            .subcommand_help_heading(self.title.clone());
        if !self.description.is_empty() {
            root = root.about(self.description.clone());
        }
        if !self.epilog.is_empty() {
            root = root.after_help(self.epilog.clone());
        }
        root.subcommands(self.entries.iter().map(|entry| entry.parser.clone()))
    }

    /// The help screen of this group, as clap reports an explicit help request.
    pub fn help(&self, prog: &str) -> clap::Error {
        self.parser(prog)
            .try_get_matches_from([prog, HELP_FLAG])
            .err()
            .unwrap_or_else(|| clap::Error::new(clap::error::ErrorKind::DisplayHelp))
    }

    fn command_name(&self, handler: &Handler, name: Option<&str>) -> String {
        match name.filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None if self.replace_underscores_with_dashes => handler.name().replace('_', "-"),
            None => handler.name().to_string(),
        }
    }

    fn insert(&mut self, entry: CommandEntry) -> &clap::Command {
        let index = match self.entries.iter().position(|e| e.name == entry.name) {
            Some(index) => {
                tracing::warn!("Overwriting command: {}", entry.name);
                self.entries[index] = entry;
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        &self.entries[index].parser
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("epilog", &self.epilog)
            .field(
                "replace_underscores_with_dashes",
                &self.replace_underscores_with_dashes,
            )
            .field("init", &self.init.is_some())
            .field("entries", &self.entries)
            .finish()
    }
}
