//! Parsed values handed to a leaf handler.

use clap::{ArgMatches, parser::ValueSource};

use crate::arg::{ArgAction, ArgSpec, ValueKind, arg_ids};

/// A single parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Argument was absent and has no default.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Field values of one invocation, keyed by destination name in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    fields: Vec<(String, Value)>,
}

impl Namespace {
    /// Sets a field, replacing an existing one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// True only for a boolean field set to `true`.
    pub fn get_flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// String contents of a list field, or of a single string field. Missing is empty.
    pub fn get_strings(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(Value::List(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::Str(value)) => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collects the values of `specs` out of clap's matches.
    ///
    /// Specs sharing a destination yield one field: the one given last on the command line,
    /// else the first declared.
    pub(crate) fn from_matches(specs: &[ArgSpec], matches: &ArgMatches) -> Self {
        let ids = arg_ids(specs);
        let mut chosen: Vec<(String, usize)> = Vec::new();
        for (index, spec) in specs.iter().enumerate() {
            let name = spec.field_name();
            match chosen.iter_mut().find(|(field, _)| *field == name) {
                Some((_, current)) => {
                    if given_after(matches, &ids[index], &ids[*current]) {
                        *current = index;
                    }
                }
                None => chosen.push((name, index)),
            }
        }

        let mut namespace = Self::default();
        for (name, index) in chosen {
            namespace.insert(name, value(&specs[index], matches, &ids[index]));
        }
        namespace
    }
}

fn value(spec: &ArgSpec, matches: &ArgMatches, id: &str) -> Value {
    match spec.get_action() {
        ArgAction::StoreTrue | ArgAction::StoreFalse => Value::Bool(matches.get_flag(id)),
        ArgAction::Count => Value::Int(i64::from(matches.get_count(id))),
        _ if spec.collects_many() => Value::List(many(spec.kind(), matches, id)),
        _ => one(spec.kind(), matches, id),
    }
}

/// Position of the last command-line occurrence of `id`.
fn last_given(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.indices_of(id).and_then(Iterator::max)
}

fn given_after(matches: &ArgMatches, id: &str, other: &str) -> bool {
    match (last_given(matches, id), last_given(matches, other)) {
        (Some(index), Some(other)) => index > other,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn one(kind: ValueKind, matches: &ArgMatches, id: &str) -> Value {
    match kind {
        ValueKind::String => matches
            .get_one::<String>(id)
            .cloned()
            .map_or(Value::None, Value::Str),
        ValueKind::Integer => matches
            .get_one::<i64>(id)
            .copied()
            .map_or(Value::None, Value::Int),
        ValueKind::Float => matches
            .get_one::<f64>(id)
            .copied()
            .map_or(Value::None, Value::Float),
    }
}

fn many(kind: ValueKind, matches: &ArgMatches, id: &str) -> Vec<Value> {
    match kind {
        ValueKind::String => matches
            .get_many::<String>(id)
            .into_iter()
            .flatten()
            .cloned()
            .map(Value::Str)
            .collect(),
        ValueKind::Integer => matches
            .get_many::<i64>(id)
            .into_iter()
            .flatten()
            .copied()
            .map(Value::Int)
            .collect(),
        ValueKind::Float => matches
            .get_many::<f64>(id)
            .into_iter()
            .flatten()
            .copied()
            .map(Value::Float)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Command;

    use super::*;
    use crate::arg::{Arity, layout};

    fn parse(specs: &[ArgSpec], argv: &[&str]) -> Namespace {
        let matches = Command::new("test")
            .args(layout(specs).unwrap().args)
            .try_get_matches_from(argv)
            .unwrap();
        Namespace::from_matches(specs, &matches)
    }

    #[test]
    fn test_insert_replaces_and_keeps_order() {
        let mut values = Namespace::default();
        values.insert("a", Value::Int(1));
        values.insert("b", Value::Bool(true));
        values.insert("a", Value::Int(2));
        assert_eq!(values.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(values.get_int("a"), Some(2));
        assert!(values.get_flag("b"));
        assert!(!values.get_flag("missing"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_typed_values_and_defaults() {
        let specs = [
            ArgSpec::new(["-n", "--num"])
                .value_kind(ValueKind::Integer)
                .default_value("42"),
            ArgSpec::new(["--ratio"]).value_kind(ValueKind::Float),
            ArgSpec::new(["name"]).arity(Arity::Optional),
        ];
        let values = parse(&specs, &["test", "--ratio", "0.5"]);
        assert_eq!(values.get_int("num"), Some(42));
        assert_eq!(values.get_float("ratio"), Some(0.5));
        assert_eq!(values.get("name"), Some(&Value::None));
    }

    #[test]
    fn test_flags_and_counts() {
        let specs = [
            ArgSpec::new(["-q"]).action(ArgAction::StoreFalse).dest("loud"),
            ArgSpec::new(["-v"]).action(ArgAction::Count).dest("verbosity"),
            ArgSpec::new(["--dry-run"]).action(ArgAction::StoreTrue),
        ];
        let values = parse(&specs, &["test", "-q", "-vvv"]);
        assert_eq!(values.get("loud"), Some(&Value::Bool(false)));
        assert_eq!(values.get_int("verbosity"), Some(3));
        assert!(!values.get_flag("dry_run"));
    }

    #[test]
    fn test_remainder_keeps_flag_like_tokens() {
        let specs = [
            ArgSpec::new(["name"]).arity(Arity::Optional),
            ArgSpec::new(["args"]).arity(Arity::Remainder),
        ];
        let values = parse(&specs, &["test", "migrate", "app", "--fake", "-v", "2"]);
        assert_eq!(values.get_str("name"), Some("migrate"));
        assert_eq!(values.get_strings("args"), ["app", "--fake", "-v", "2"]);

        let values = parse(&specs, &["test"]);
        assert_eq!(values.get_strings("args"), Vec::<String>::new());
    }

    #[test]
    fn test_append_collects_occurrences() {
        let specs = [ArgSpec::new(["-I", "--include"]).action(ArgAction::Append)];
        let values = parse(&specs, &["test", "-I", "a", "--include", "b"]);
        assert_eq!(
            values.get("include"),
            Some(&Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]))
        );
    }

    #[test]
    fn test_shared_dest_takes_last_given() {
        let specs = [
            ArgSpec::new(["--enable"])
                .action(ArgAction::StoreTrue)
                .dest("feature"),
            ArgSpec::new(["--disable"])
                .action(ArgAction::StoreFalse)
                .dest("feature"),
        ];
        assert!(!parse(&specs, &["test"]).get_flag("feature"));
        assert!(parse(&specs, &["test", "--enable"]).get_flag("feature"));
        assert!(!parse(&specs, &["test", "--enable", "--disable"]).get_flag("feature"));
        assert!(parse(&specs, &["test", "--disable", "--enable"]).get_flag("feature"));
        assert_eq!(parse(&specs, &["test"]).len(), 1);
    }

    #[test]
    fn test_optional_multi_positional_before_required() {
        let specs = [
            ArgSpec::new(["srcs"]).arity(Arity::ZeroOrMore),
            ArgSpec::new(["dst"]),
        ];
        let matches = Command::new("test")
            .args(layout(&specs).unwrap().args)
            .allow_missing_positional(true)
            .try_get_matches_from(["test", "a", "b", "c"])
            .unwrap();
        let values = Namespace::from_matches(&specs, &matches);
        assert_eq!(values.get_strings("srcs"), ["a", "b"]);
        assert_eq!(values.get_str("dst"), Some("c"));
    }
}
