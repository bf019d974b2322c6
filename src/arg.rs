//! Argument declarations attached to command handlers.
//!
//! An [`ArgSpec`] is the flag-or-positional identifiers of one argument plus its parsing
//! attributes. Specs are collected on a [`Handler`] in declaration order and turned into
//! [`clap::Arg`]s when the handler is registered on a group.

use std::collections::HashSet;

use clap::{
    Arg,
    builder::{PossibleValuesParser, TypedValueParser, ValueParser},
    value_parser,
};

use crate::handler::Handler;

/// Type the raw token is converted to before it reaches the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    String,
    Integer,
    Float,
}

/// What happens when the argument is encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgAction {
    /// Store the value(s).
    #[default]
    Store,
    /// Flag that stores `true` when present.
    StoreTrue,
    /// Flag that stores `false` when present.
    StoreFalse,
    /// Count occurrences.
    Count,
    /// Collect the values of every occurrence.
    Append,
}

/// How many tokens one occurrence consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    #[default]
    One,
    /// Zero or one.
    Optional,
    ZeroOrMore,
    OneOrMore,
    Exactly(usize),
    /// Every remaining token, including ones that look like flags.
    Remainder,
}

/// One declared command-line argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgSpec {
    flags: Vec<String>,
    kind: ValueKind,
    action: ArgAction,
    arity: Arity,
    defaults: Vec<String>,
    choices: Vec<String>,
    required: bool,
    help: Option<String>,
    metavar: Option<String>,
    dest: Option<String>,
}

/// Returns a transform that prepends `spec` to a handler's argument list.
///
/// Nested annotations apply innermost first, so prepending makes
/// `annotate(a)(annotate(b)(handler))` declare `a` before `b`.
pub fn annotate(spec: ArgSpec) -> impl FnOnce(Handler) -> Handler {
    move |handler| handler.prepend_arg(spec)
}

impl ArgSpec {
    /// Declares an argument from its identifiers, e.g. `["-n", "--num"]` or `["path"]`.
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn value_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn action(mut self, action: ArgAction) -> Self {
        self.action = action;
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.defaults = vec![value.into()];
        self
    }

    pub fn default_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = values.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the accepted values; checked before type conversion.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Display name for the value in usage messages.
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Field name the value is stored under in the [`Namespace`](crate::Namespace).
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn get_action(&self) -> ArgAction {
        self.action
    }

    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    pub fn is_positional(&self) -> bool {
        self.flags.first().is_some_and(|flag| !flag.starts_with('-'))
    }

    /// Field name of the parsed value.
    ///
    /// An explicit `dest` wins, then the positional name, then the first long flag (or the
    /// first flag) without its dashes and with inner dashes turned into underscores.
    pub fn field_name(&self) -> String {
        if let Some(dest) = &self.dest {
            return dest.clone();
        }
        if self.is_positional() {
            return self.flags[0].clone();
        }
        self.flags
            .iter()
            .find(|flag| flag.starts_with("--"))
            .or_else(|| self.flags.first())
            .map(|flag| flag.trim_start_matches('-').replace('-', "_"))
            .unwrap_or_default()
    }

    /// True when the parsed value is a list rather than a single value.
    pub fn collects_many(&self) -> bool {
        match self.action {
            ArgAction::StoreTrue | ArgAction::StoreFalse | ArgAction::Count => false,
            ArgAction::Append => true,
            ArgAction::Store => match self.arity {
                Arity::One | Arity::Optional => false,
                Arity::Exactly(n) => n != 1,
                Arity::ZeroOrMore | Arity::OneOrMore | Arity::Remainder => true,
            },
        }
    }

    /// True when clap must see at least one value for this argument.
    fn is_required(&self) -> bool {
        let implicitly_required = self.is_positional()
            && self.defaults.is_empty()
            && matches!(self.arity, Arity::One | Arity::OneOrMore | Arity::Exactly(_));
        self.required || implicitly_required
    }

    /// True for a positional that accepts an open-ended number of values.
    fn is_unbounded(&self) -> bool {
        self.collects_many() && !matches!(self.arity, Arity::Exactly(_))
    }

    /// Builds the clap argument for this declaration under the clap id `id`.
    pub(crate) fn to_arg(&self, id: &str) -> Arg {
        let mut arg = Arg::new(id.to_string());

        if !self.is_positional() {
            let mut longs = Vec::new();
            let mut shorts = Vec::new();
            for flag in &self.flags {
                match flag.strip_prefix("--") {
                    Some(long) => longs.push(long.to_string()),
                    None => {
                        let name = flag.trim_start_matches('-');
                        let mut chars = name.chars();
                        match (chars.next(), chars.next()) {
                            (Some(short), None) => shorts.push(short),
                            _ => longs.push(name.to_string()),
                        }
                    }
                }
            }
            let mut longs = longs.into_iter();
            if let Some(long) = longs.next() {
                arg = arg.long(long).aliases(longs);
            }
            let mut shorts = shorts.into_iter();
            if let Some(short) = shorts.next() {
                arg = arg.short(short).short_aliases(shorts);
            }
        }

        arg = match self.action {
            ArgAction::StoreTrue => arg.action(clap::ArgAction::SetTrue),
            ArgAction::StoreFalse => arg.action(clap::ArgAction::SetFalse),
            ArgAction::Count => arg.action(clap::ArgAction::Count),
            ArgAction::Append => self.with_values(arg.action(clap::ArgAction::Append), id),
            ArgAction::Store if self.is_positional() && self.collects_many() => {
                self.with_values(arg.action(clap::ArgAction::Append), id)
            }
            ArgAction::Store => self.with_values(arg.action(clap::ArgAction::Set), id),
        };

        if self.required && !self.is_positional() {
            arg = arg.required(true);
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        arg
    }

    fn with_values(&self, mut arg: Arg, id: &str) -> Arg {
        arg = arg.value_parser(self.value_parser());

        // Positionals that may be absent are expressed through `required`, so they only
        // need a minimum arity when present.
        let positional = self.is_positional();
        arg = match self.arity {
            Arity::One => arg,
            Arity::Optional if positional => arg,
            Arity::Optional => arg.num_args(0..=1),
            Arity::ZeroOrMore if positional => arg.num_args(1..),
            Arity::ZeroOrMore => arg.num_args(0..),
            Arity::OneOrMore => arg.num_args(1..),
            Arity::Exactly(n) => arg.num_args(n),
            Arity::Remainder if positional => arg
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
            Arity::Remainder => arg.num_args(0..).allow_hyphen_values(true),
        };

        if self.is_required() {
            arg = arg.required(true);
        }
        if !self.defaults.is_empty() {
            arg = arg.default_values(self.defaults.clone());
        }
        match &self.metavar {
            Some(metavar) => arg.value_name(metavar.clone()),
            None if id != self.field_name() => arg.value_name(self.field_name()),
            None => arg,
        }
    }

    fn value_parser(&self) -> ValueParser {
        let choices =
            (!self.choices.is_empty()).then(|| PossibleValuesParser::new(self.choices.clone()));
        match (self.kind, choices) {
            (ValueKind::String, None) => ValueParser::string(),
            (ValueKind::String, Some(choices)) => ValueParser::new(choices),
            (ValueKind::Integer, None) => value_parser!(i64).into(),
            (ValueKind::Integer, Some(choices)) => {
                ValueParser::new(choices.try_map(|value: String| value.parse::<i64>()))
            }
            (ValueKind::Float, None) => value_parser!(f64).into(),
            (ValueKind::Float, Some(choices)) => {
                ValueParser::new(choices.try_map(|value: String| value.parse::<f64>()))
            }
        }
    }
}

/// Clap ids for `specs`: the field name, suffixed with the position for every spec after
/// the first one sharing that field.
pub(crate) fn arg_ids(specs: &[ArgSpec]) -> Vec<String> {
    let mut seen = HashSet::new();
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let name = spec.field_name();
            if seen.insert(name.clone()) {
                name
            } else {
                format!("{name}#{index}")
            }
        })
        .collect()
}

/// Clap arguments of one command, in declaration order.
pub(crate) struct ArgLayout {
    pub(crate) args: Vec<Arg>,
    /// An optional positional sits right before the last, required one.
    pub(crate) allow_missing_positional: bool,
}

/// Builds the clap arguments for `specs`, rejecting positional layouts clap cannot parse.
pub(crate) fn layout(specs: &[ArgSpec]) -> Result<ArgLayout, String> {
    let positionals: Vec<&ArgSpec> = specs.iter().filter(|spec| spec.is_positional()).collect();
    let count = positionals.len();

    for (index, spec) in positionals.iter().enumerate() {
        let name = spec.field_name();
        let remaining = count - index - 1;
        if spec.arity == Arity::Remainder && remaining > 0 {
            return Err(format!("remainder positional `{name}` must be the last positional"));
        }
        if spec.collects_many() && remaining > 1 {
            return Err(format!(
                "positional `{name}` takes several values but {remaining} positionals follow it"
            ));
        }
        if spec.collects_many() && remaining == 1 {
            let last = positionals[index + 1];
            if !last.is_required() {
                return Err(format!(
                    "positional `{name}` takes several values, so `{}` after it must be required",
                    last.field_name()
                ));
            }
            if spec.is_unbounded() && last.is_unbounded() {
                return Err(format!(
                    "positionals `{name}` and `{}` both take an open-ended number of values",
                    last.field_name()
                ));
            }
        }
    }

    let mut allow_missing_positional = false;
    if let Some(last_required) = positionals.iter().rposition(|spec| spec.is_required()) {
        let optional: Vec<usize> = (0..last_required)
            .filter(|&index| !positionals[index].is_required())
            .collect();
        match optional.as_slice() {
            [] => {}
            // One optional positional right before the final required one.
            [index] if index + 2 == count => allow_missing_positional = true,
            [index, ..] => {
                return Err(format!(
                    "optional positional `{}` cannot come before required positional `{}`",
                    positionals[*index].field_name(),
                    positionals[last_required].field_name()
                ));
            }
        }
    }

    let ids = arg_ids(specs);
    let args = specs
        .iter()
        .zip(&ids)
        .map(|(spec, id)| spec.to_arg(id))
        .collect();
    Ok(ArgLayout {
        args,
        allow_missing_positional,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Namespace;

    fn noop(_: &Namespace) -> anyhow::Result<()> {
        Ok(())
    }

    fn single(spec: ArgSpec) -> Arg {
        spec.to_arg(&spec.field_name())
    }

    fn names(handler: &Handler) -> Vec<String> {
        handler.arg_specs().iter().map(ArgSpec::field_name).collect()
    }

    #[test]
    fn test_field_name_from_long_flag() {
        let spec = ArgSpec::new(["-s", "--some-switch"]);
        assert!(!spec.is_positional());
        assert_eq!(spec.field_name(), "some_switch");
    }

    #[test]
    fn test_field_name_from_short_flag() {
        assert_eq!(ArgSpec::new(["-n"]).field_name(), "n");
    }

    #[test]
    fn test_field_name_positional_and_explicit_dest() {
        let spec = ArgSpec::new(["app_name"]);
        assert!(spec.is_positional());
        assert_eq!(spec.field_name(), "app_name");
        assert_eq!(ArgSpec::new(["-n", "--num"]).dest("count").field_name(), "count");
    }

    #[test]
    fn test_annotations_keep_declaration_order() {
        let handler = annotate(ArgSpec::new(["first"]))(annotate(ArgSpec::new(["second"]))(
            annotate(ArgSpec::new(["third"]))(Handler::new("cmd", noop)),
        ));
        assert_eq!(names(&handler), ["first", "second", "third"]);
    }

    #[test]
    fn test_annotate_after_builder_args() {
        let handler = annotate(ArgSpec::new(["top"]))(
            Handler::new("cmd", noop).arg(ArgSpec::new(["bottom"])),
        );
        assert_eq!(names(&handler), ["top", "bottom"]);
    }

    #[test]
    fn test_annotations_do_not_leak_between_clones() {
        let template = Handler::new("template", noop).arg(ArgSpec::new(["shared"]));
        let left = annotate(ArgSpec::new(["-l"]))(template.clone());
        let right = annotate(ArgSpec::new(["-r"]))(template.clone());

        assert_eq!(names(&template), ["shared"]);
        assert_eq!(names(&left), ["l", "shared"]);
        assert_eq!(names(&right), ["r", "shared"]);
    }

    #[test]
    fn test_to_arg_flags() {
        let arg = single(ArgSpec::new(["-n", "--num", "--number"]).help("How many"));
        assert_eq!(arg.get_id().as_str(), "num");
        assert_eq!(arg.get_short(), Some('n'));
        assert_eq!(arg.get_long(), Some("num"));
        assert_eq!(arg.get_all_aliases().unwrap_or_default(), vec!["number"]);
        assert_eq!(
            arg.get_help().map(ToString::to_string).as_deref(),
            Some("How many")
        );
    }

    #[test]
    fn test_single_dash_word_becomes_long() {
        let arg = single(ArgSpec::new(["-verbose"]).action(ArgAction::StoreTrue));
        assert_eq!(arg.get_long(), Some("verbose"));
        assert_eq!(arg.get_short(), None);
    }

    #[test]
    fn test_positional_requiredness() {
        assert!(single(ArgSpec::new(["path"])).is_required_set());
        assert!(!single(ArgSpec::new(["path"]).arity(Arity::Optional)).is_required_set());
        assert!(!single(ArgSpec::new(["path"]).default_value("x")).is_required_set());
        assert!(!single(ArgSpec::new(["--path"])).is_required_set());
        assert!(single(ArgSpec::new(["--path"]).required(true)).is_required_set());
    }

    #[test]
    fn test_collects_many() {
        assert!(!ArgSpec::new(["x"]).collects_many());
        assert!(ArgSpec::new(["x"]).arity(Arity::Remainder).collects_many());
        assert!(ArgSpec::new(["-x"]).action(ArgAction::Append).collects_many());
        assert!(!ArgSpec::new(["x"]).arity(Arity::Exactly(1)).collects_many());
        assert!(ArgSpec::new(["x"]).arity(Arity::Exactly(2)).collects_many());
        assert!(!ArgSpec::new(["-x"]).action(ArgAction::Count).collects_many());
    }

    #[test]
    fn test_shared_dest_gets_distinct_ids() {
        let specs = [
            ArgSpec::new(["--enable"])
                .action(ArgAction::StoreTrue)
                .dest("feature"),
            ArgSpec::new(["--disable"])
                .action(ArgAction::StoreFalse)
                .dest("feature"),
            ArgSpec::new(["--level"]).dest("feature"),
        ];
        assert_eq!(arg_ids(&specs), ["feature", "feature#1", "feature#2"]);

        let args = layout(&specs).unwrap().args;
        assert_eq!(args[2].get_id().as_str(), "feature#2");
        assert_eq!(args[2].get_value_names().unwrap_or_default(), ["feature"]);
    }

    #[test]
    fn test_optional_positional_before_last_required() {
        let specs = [
            ArgSpec::new(["srcs"]).arity(Arity::ZeroOrMore),
            ArgSpec::new(["dst"]),
        ];
        let layout = layout(&specs).unwrap();
        assert!(layout.allow_missing_positional);
        assert!(!layout.args[0].is_required_set());
        assert!(layout.args[1].is_required_set());

        let plain = super::layout(&[ArgSpec::new(["src"]), ArgSpec::new(["dst"])]).unwrap();
        assert!(!plain.allow_missing_positional);
    }

    #[test]
    fn test_unparseable_positional_layouts_are_rejected() {
        let layouts = [
            vec![
                ArgSpec::new(["rest"]).arity(Arity::Remainder),
                ArgSpec::new(["last"]),
            ],
            vec![
                ArgSpec::new(["a"]).arity(Arity::ZeroOrMore),
                ArgSpec::new(["b"]).arity(Arity::Optional),
            ],
            vec![
                ArgSpec::new(["a"]).arity(Arity::OneOrMore),
                ArgSpec::new(["b"]).arity(Arity::OneOrMore),
            ],
            vec![
                ArgSpec::new(["a"]).arity(Arity::OneOrMore),
                ArgSpec::new(["b"]),
                ArgSpec::new(["c"]),
            ],
            vec![
                ArgSpec::new(["a"]).arity(Arity::Optional),
                ArgSpec::new(["b"]),
                ArgSpec::new(["c"]),
            ],
        ];
        for specs in layouts {
            assert!(layout(&specs).is_err(), "{specs:?} should be rejected");
        }
    }
}
