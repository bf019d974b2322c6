//! `version` and `bump`: read and bump the project's semantic version file.

use std::{fmt, fs, io, path::Path, str::FromStr};

use anyhow::Context;
use thiserror::Error;

use crate::{ArgSpec, Arity, Handler, Namespace, project};

/// Version assumed when the version file does not exist yet.
pub const INITIAL_VERSION: Version = Version {
    major: 0,
    minor: 0,
    patch: 0,
};

/// A `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid version string: {0:?}")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u64, ParseVersionError> {
            parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(invalid)
        };
        let version = Version {
            major: next()?,
            minor: next()?,
            patch: next()?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Major,
    Minor,
    Patch,
}

impl Part {
    pub const NAMES: [&'static str; 3] = ["major", "minor", "patch"];
}

impl FromStr for Part {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Part::Major),
            "minor" => Ok(Part::Minor),
            "patch" => Ok(Part::Patch),
            other => anyhow::bail!("unknown version part: {other}"),
        }
    }
}

impl Version {
    /// Increments `part`, resetting the smaller components.
    pub fn bump(self, part: Part) -> Self {
        match part {
            Part::Major => Version {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
            Part::Minor => Version {
                minor: self.minor + 1,
                patch: 0,
                ..self
            },
            Part::Patch => Version {
                patch: self.patch + 1,
                ..self
            },
        }
    }
}

/// Reads the version stored at `path`; `None` when the file does not exist.
pub fn read(path: &Path) -> anyhow::Result<Option<Version>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.parse().with_context(|| {
            format!("failed to parse version file {}", path.display())
        })?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Bumps the version stored at `path`, starting from `initial` when absent.
pub fn bump_file(path: &Path, part: Part, initial: Version) -> anyhow::Result<Version> {
    let version = read(path)?.unwrap_or(initial).bump(part);
    fs::write(path, format!("{version}\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(version)
}

pub fn version_handler() -> Handler {
    Handler::new("get_version", show).doc("Print the version number of the current project.")
}

pub fn bump_handler() -> Handler {
    Handler::new("bump", bump).doc("Bump the version number.").arg(
        ArgSpec::new(["part"])
            .arity(Arity::Optional)
            .choices(Part::NAMES)
            .default_value("patch")
            .help("Version component to increment"),
    )
}

fn show(_: &Namespace) -> anyhow::Result<()> {
    let Some(project) = project::current() else {
        tracing::info!("Not in a project.");
        return Ok(());
    };
    let path = project.resolve(&project.config().version_file);
    match read(&path)? {
        Some(version) => println!("{version}"),
        None => tracing::info!("No version file found at {}.", path.display()),
    }
    Ok(())
}

fn bump(args: &Namespace) -> anyhow::Result<()> {
    let Some(project) = project::current() else {
        tracing::info!("Not in a project.");
        return Ok(());
    };
    let part: Part = args.get_str("part").unwrap_or("patch").parse()?;
    let path = project.resolve(&project.config().version_file);
    let version = bump_file(&path, part, INITIAL_VERSION)?;
    println!("{version}");
    Ok(())
}
