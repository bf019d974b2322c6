//! Leaf command handlers.

use std::{fmt, rc::Rc};

use crate::{arg::ArgSpec, namespace::Namespace};

/// Signature of the function behind a leaf command.
pub type HandlerFn = dyn Fn(&Namespace) -> anyhow::Result<()>;

/// A callable command target together with its declared name, documentation and arguments.
///
/// Cloning a handler shares the function but copies the argument list, so annotating a
/// clone never changes the original.
#[derive(Clone)]
pub struct Handler {
    name: String,
    doc: Option<String>,
    args: Vec<ArgSpec>,
    func: Rc<HandlerFn>,
}

impl Handler {
    /// Creates a handler; `name` becomes the command name unless one is given at registration.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Namespace) -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            args: Vec::new(),
            func: Rc::new(func),
        }
    }

    /// Sets the documentation string: first line is the summary, the rest the description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends an argument declaration.
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    /// Appends several argument declarations in order.
    pub fn args(mut self, specs: impl IntoIterator<Item = ArgSpec>) -> Self {
        self.args.extend(specs);
        self
    }

    pub(crate) fn prepend_arg(mut self, spec: ArgSpec) -> Self {
        self.args.insert(0, spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn arg_specs(&self) -> &[ArgSpec] {
        &self.args
    }

    /// Invokes the handler with parsed values.
    pub fn call(&self, values: &Namespace) -> anyhow::Result<()> {
        (self.func)(values)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
