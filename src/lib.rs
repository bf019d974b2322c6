//! Declarative subcommand trees on top of clap.
//!
//! Commands are plain functions wrapped in a [`Handler`] together with their documentation
//! and an ordered list of [`ArgSpec`]s. A [`Group`] turns each handler into a clap
//! subcommand, can nest other groups as pseudo-commands, and [`Group::dispatch`] routes an
//! argument vector to exactly one handler.
//!
//! ```rust,ignore
//! use clams::{ArgSpec, Group, Handler, Namespace, ValueKind, annotate};
//!
//! fn echo(args: &Namespace) -> anyhow::Result<()> {
//!     println!("num = {:?}", args.get_int("num"));
//!     Ok(())
//! }
//!
//! let mut cli = Group::new();
//! let echo = annotate(
//!     ArgSpec::new(["-n", "--num"])
//!         .value_kind(ValueKind::Integer)
//!         .default_value("42"),
//! )(Handler::new("echo", echo).doc("Print the parsed arguments."));
//! cli.register(echo, None)?;
//!
//! if let Err(err) = cli.dispatch(std::env::args()) {
//!     std::process::exit(err.exit_code());
//! }
//! ```
//!
//! The `unb` binary built from [`cli`] and [`command`] is a complete application of the
//! library.

pub mod arg;
pub mod cli;
pub mod command;
mod dispatch;
pub mod doc;
pub mod error;
pub mod group;
pub mod handler;
pub mod namespace;
pub mod project;

pub use arg::{ArgAction, ArgSpec, Arity, ValueKind, annotate};
pub use doc::DocParts;
pub use error::{Error, Result};
pub use group::{CommandEntry, Group, Target};
pub use handler::Handler;
pub use namespace::{Namespace, Value};
