// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::convert::Converter;
use crate::deprecated::DeprecatedAttributes;
use crate::error::{Error, Result};

const OPT_PREFIX: &str = "-";
const LONG_OPT_PREFIX: &str = "--";

/// String to show if an option is required
const REQUIRED_STR: &str = " (required)";

/// Number of values an option consumes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Arity {
    /// Not specified: the option is a flag.
    Unset,
    /// Exactly this many values.
    Fixed(usize),
    /// Any number of values (at least one).
    Unlimited,
}

impl Default for Arity {
    fn default() -> Self {
        Arity::Unset
    }
}

fn is_valid_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Check a short option name can be typed on a command-line.
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();

    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if is_valid_char(ch) || ch == '?' || ch == '@' {
            return Ok(());
        }

        return Err(Error::IllegalOptionName {
            name: name.into(),
            ch,
        });
    }

    match name.chars().find(|c| !is_valid_char(*c)) {
        Some(ch) => Err(Error::IllegalOptionName {
            name: name.into(),
            ch,
        }),
        None if name.is_empty() => Err(Error::NoOptionName),
        None => Ok(()),
    }
}

/// A declared option.
///
/// An `Opt` added to an [Options](crate::Options) catalog is a template. The
/// parser clones the template each time the option is found on the
/// command-line; the clones hold the values given and are returned in the
/// [CommandLine](crate::CommandLine).
///
/// Two options are equal if they have the same short and long names.
#[derive(Clone, Debug)]
pub struct Opt {
    short: Option<String>,
    long: Option<String>,
    description: Option<String>,
    arg_name: Option<String>,
    since: Option<String>,
    required: bool,
    optional_arg: bool,
    arity: Arity,
    value_separator: Option<char>,
    converter: Converter,
    deprecated: Option<DeprecatedAttributes>,
    values: Vec<String>,
}

impl Opt {
    /// Start declaring an option.
    pub fn builder() -> OptBuilder {
        OptBuilder::default()
    }

    /// Declare an option with a short name, an optional long name and at
    /// most one value.
    pub fn new(short: &str, long: Option<&str>, has_arg: bool, description: &str) -> Result<Self> {
        let builder = Opt::builder().short(short).desc(description);

        let builder = match long {
            Some(long) => builder.long(long),
            None => builder,
        };

        builder.has_arg(has_arg).build()
    }

    /// Returns the short name if it has one, otherwise the long name.
    pub fn key(&self) -> &str {
        match (&self.short, &self.long) {
            (Some(short), _) => short,
            (None, Some(long)) => long,
            // The builder guarantees at least one name.
            (None, None) => "",
        }
    }

    /// The name as typed on the command-line (`-a` or `--all`).
    pub fn display_name(&self) -> String {
        match &self.short {
            Some(short) => format!("{}{}", OPT_PREFIX, short),
            None => format!("{}{}", LONG_OPT_PREFIX, self.key()),
        }
    }

    /// Returns the short name.
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Returns the long name.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Returns `true` if the option has a long name.
    pub fn has_long(&self) -> bool {
        self.long.is_some()
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the display name of the option's value.
    pub fn arg_name(&self) -> Option<&str> {
        self.arg_name.as_deref()
    }

    /// Returns the version the option was added in.
    pub fn since(&self) -> Option<&str> {
        self.since.as_deref()
    }

    /// Returns the number of values the option consumes.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Returns `true` if the option must be specified.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Returns `true` if the option's value may be omitted.
    pub fn has_optional_arg(&self) -> bool {
        self.optional_arg
    }

    /// Returns the character that splits a single value into several.
    pub fn value_separator(&self) -> Option<char> {
        self.value_separator
    }

    /// Returns `true` if the option has a value separator.
    pub fn has_value_separator(&self) -> bool {
        self.value_separator.is_some()
    }

    /// Returns the converter used by typed accessors.
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Returns the deprecation details, if the option is deprecated.
    pub fn deprecated(&self) -> Option<&DeprecatedAttributes> {
        self.deprecated.as_ref()
    }

    /// Returns `true` if the option is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }

    /// Describe the deprecation of this option.
    pub fn deprecated_message(&self) -> String {
        let details = match &self.deprecated {
            Some(attrs) => attrs.to_string(),
            None => "Deprecated".into(),
        };

        format!("Option '{}': {}", self.key(), details)
    }

    /// Returns `true` if the option takes at least one value.
    pub fn has_arg(&self) -> bool {
        matches!(self.arity, Arity::Fixed(n) if n > 0) || self.arity == Arity::Unlimited
    }

    /// Returns `true` if the option takes more than one value.
    pub fn has_args(&self) -> bool {
        matches!(self.arity, Arity::Fixed(n) if n > 1) || self.arity == Arity::Unlimited
    }

    /// Returns `true` if the option can take another value.
    pub(crate) fn accepts_arg(&self) -> bool {
        let room = match self.arity {
            Arity::Fixed(n) if n > 0 => self.values.len() < n,
            _ => true,
        };

        (self.has_arg() || self.optional_arg) && room
    }

    /// Returns `true` if the option cannot be complete without another value.
    pub(crate) fn requires_arg(&self) -> bool {
        if self.optional_arg {
            return false;
        }

        if self.arity == Arity::Unlimited {
            return self.values.is_empty();
        }

        self.accepts_arg()
    }

    /// Returns the values given to the option.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the first value given to the option.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(|v| v.as_str())
    }

    /// Returns the value at `index`.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|v| v.as_str())
    }

    /// Returns the first value given to the option, or `default`.
    pub fn value_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.value().unwrap_or(default)
    }

    /// Values can only be added by the parser.
    #[deprecated(note = "values are recorded by the parser")]
    pub fn add_value(&mut self, _value: &str) -> Result<()> {
        Err(Error::Unsupported(
            "Opt::add_value is not intended for client use".into(),
        ))
    }

    /// Record a value found on the command-line, splitting it at the value
    /// separator if the option has one.
    pub(crate) fn add_value_for_processing(&mut self, value: &str) -> Result<()> {
        if self.arity == Arity::Unset {
            return Err(Error::NoArgsAllowed(self.key().into()));
        }

        self.process_value(value)
    }

    fn process_value(&mut self, value: &str) -> Result<()> {
        let mut value = value;

        if let Some(sep) = self.value_separator {
            while let Some(index) = value.find(sep) {
                // Leave the rest of the value for the last slot.
                if let Arity::Fixed(n) = self.arity {
                    if n > 0 && self.values.len() == n - 1 {
                        break;
                    }
                }

                self.add(&value[..index])?;

                value = &value[index + sep.len_utf8()..];
            }
        }

        self.add(value)
    }

    fn add(&mut self, value: &str) -> Result<()> {
        if !self.accepts_arg() {
            return Err(Error::ValueListFull(self.key().into()));
        }

        self.values.push(value.into());

        Ok(())
    }

    /// Create a fresh instance of this template to hold values.
    pub(crate) fn instance(&self) -> Opt {
        Opt {
            values: Vec::new(),
            ..self.clone()
        }
    }
}

impl PartialEq for Opt {
    fn eq(&self, other: &Opt) -> bool {
        self.short == other.short && self.long == other.long
    }
}

impl Eq for Opt {}

impl Hash for Opt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.short.hash(state);
        self.long.hash(state);
    }
}

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = match (&self.short, &self.long) {
            (Some(short), Some(long)) => {
                format!("{}{},{}{}", OPT_PREFIX, short, LONG_OPT_PREFIX, long)
            }
            _ => self.display_name(),
        };

        let value = if self.has_args() {
            " <value>..."
        } else if self.has_arg() {
            " <value>"
        } else {
            ""
        };

        let required = if self.required { REQUIRED_STR } else { "" };

        let help: String = match &self.description {
            Some(help) => format!(" # {}", help),
            _ => "".into(),
        };

        write!(f, "{}{}{}{}", names, value, required, help)
    }
}

/// Used to declare an [Opt].
#[derive(Clone, Debug, Default)]
pub struct OptBuilder {
    short: Option<String>,
    long: Option<String>,
    description: Option<String>,
    arg_name: Option<String>,
    since: Option<String>,
    required: bool,
    optional_arg: bool,
    arity: Arity,
    value_separator: Option<char>,
    converter: Converter,
    deprecated: Option<DeprecatedAttributes>,
}

impl OptBuilder {
    /// Specify the short name (usually a single character).
    pub fn short(self, short: &str) -> Self {
        OptBuilder {
            short: Some(short.into()),
            ..self
        }
    }

    /// Specify the long name.
    pub fn long(self, long: &str) -> Self {
        OptBuilder {
            long: Some(long.into()),
            ..self
        }
    }

    /// Specify the description of the option.
    pub fn desc(self, description: &str) -> Self {
        OptBuilder {
            description: Some(description.into()),
            ..self
        }
    }

    /// Specify the display name of the option's value.
    pub fn arg_name(self, arg_name: &str) -> Self {
        OptBuilder {
            arg_name: Some(arg_name.into()),
            ..self
        }
    }

    /// Specify the version the option was added in.
    pub fn since(self, since: &str) -> Self {
        OptBuilder {
            since: Some(since.into()),
            ..self
        }
    }

    /// Specify that the option must be provided on the command-line.
    pub fn required(self) -> Self {
        OptBuilder {
            required: true,
            ..self
        }
    }

    /// Specify whether the option takes one value.
    pub fn has_arg(self, has_arg: bool) -> Self {
        let arity = if has_arg { Arity::Fixed(1) } else { Arity::Unset };

        OptBuilder { arity, ..self }
    }

    /// Specify that the option takes any number of values.
    pub fn has_args(self) -> Self {
        OptBuilder {
            arity: Arity::Unlimited,
            ..self
        }
    }

    /// Specify that the option takes exactly `count` values.
    pub fn number_of_args(self, count: usize) -> Self {
        OptBuilder {
            arity: Arity::Fixed(count),
            ..self
        }
    }

    /// Specify the number of values.
    pub fn arity(self, arity: Arity) -> Self {
        OptBuilder { arity, ..self }
    }

    /// Specify that the option's value may be omitted.
    ///
    /// An option with no declared arity then takes one value.
    pub fn optional_arg(self) -> Self {
        let arity = match self.arity {
            Arity::Unset => Arity::Fixed(1),
            arity => arity,
        };

        OptBuilder {
            optional_arg: true,
            arity,
            ..self
        }
    }

    /// Split each value at `sep`, for example `=` for `-Dkey=value`.
    pub fn value_separator(self, sep: char) -> Self {
        OptBuilder {
            value_separator: Some(sep),
            ..self
        }
    }

    /// Specify the converter used by typed accessors.
    pub fn converter(self, converter: Converter) -> Self {
        OptBuilder { converter, ..self }
    }

    /// Mark the option as deprecated.
    pub fn deprecated(self, attrs: DeprecatedAttributes) -> Self {
        OptBuilder {
            deprecated: Some(attrs),
            ..self
        }
    }

    /// Create the option.
    pub fn build(self) -> Result<Opt> {
        if self.short.is_none() && self.long.is_none() {
            return Err(Error::NoOptionName);
        }

        if let Some(short) = &self.short {
            validate_name(short)?;
        }

        // An optional value is still a value, whatever order the builder
        // methods were called in.
        let arity = match (self.optional_arg, self.arity) {
            (true, Arity::Unset) | (true, Arity::Fixed(0)) => Arity::Fixed(1),
            (_, arity) => arity,
        };

        Ok(Opt {
            short: self.short,
            long: self.long,
            description: self.description,
            arg_name: self.arg_name,
            since: self.since,
            required: self.required,
            optional_arg: self.optional_arg,
            arity,
            value_separator: self.value_separator,
            converter: self.converter,
            deprecated: self.deprecated,
            values: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(opt: &mut Opt, values: &[&str]) -> Result<()> {
        for value in values {
            opt.add_value_for_processing(value)?;
        }

        Ok(())
    }

    #[test]
    fn test_arity() {
        assert_eq!(Arity::default(), Arity::Unset);
    }

    #[test]
    fn test_build() {
        #[derive(Debug)]
        struct TestData {
            builder: OptBuilder,
            result: Result<()>,
            key: &'static str,
        }

        let tests = vec![
            TestData {
                builder: Opt::builder(),
                result: Err(Error::NoOptionName),
                key: "",
            },
            TestData {
                builder: Opt::builder().short("a"),
                result: Ok(()),
                key: "a",
            },
            TestData {
                builder: Opt::builder().long("all"),
                result: Ok(()),
                key: "all",
            },
            TestData {
                builder: Opt::builder().short("a").long("all"),
                result: Ok(()),
                key: "a",
            },
            TestData {
                builder: Opt::builder().short("?"),
                result: Ok(()),
                key: "?",
            },
            TestData {
                builder: Opt::builder().short("@"),
                result: Ok(()),
                key: "@",
            },
            TestData {
                builder: Opt::builder().short("Xmx"),
                result: Ok(()),
                key: "Xmx",
            },
            TestData {
                builder: Opt::builder().short("人"),
                result: Ok(()),
                key: "人",
            },
            TestData {
                builder: Opt::builder().short(""),
                result: Err(Error::NoOptionName),
                key: "",
            },
            TestData {
                builder: Opt::builder().short("-"),
                result: Err(Error::IllegalOptionName {
                    name: "-".into(),
                    ch: '-',
                }),
                key: "",
            },
            TestData {
                builder: Opt::builder().short("a?"),
                result: Err(Error::IllegalOptionName {
                    name: "a?".into(),
                    ch: '?',
                }),
                key: "",
            },
            TestData {
                builder: Opt::builder().short("a b"),
                result: Err(Error::IllegalOptionName {
                    name: "a b".into(),
                    ch: ' ',
                }),
                key: "",
            },
        ];

        for (i, d) in tests.into_iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = d.builder.build();

            match (&result, &d.result) {
                (Ok(opt), Ok(())) => assert_eq!(opt.key(), d.key, "{}", msg),
                (Err(actual), Err(expected)) => assert_eq!(actual, expected, "{}", msg),
                _ => panic!("{}, result: {:?}", msg, result),
            }
        }
    }

    #[test]
    fn test_new() {
        let opt = Opt::new("b", Some("bfile"), true, "set the value of [b]").unwrap();

        assert_eq!(opt.short(), Some("b"));
        assert_eq!(opt.long(), Some("bfile"));
        assert_eq!(opt.arity(), Arity::Fixed(1));
        assert_eq!(opt.description(), Some("set the value of [b]"));
        assert!(opt.has_arg());
        assert!(!opt.has_args());
        assert!(!opt.is_required());

        let flag = Opt::new("a", None, false, "turn [a] on").unwrap();
        assert_eq!(flag.arity(), Arity::Unset);
        assert!(!flag.has_arg());
        assert!(!flag.has_long());
    }

    #[test]
    fn test_equality() {
        let a1 = Opt::new("a", Some("all"), false, "one").unwrap();
        let a2 = Opt::new("a", Some("all"), true, "two").unwrap();
        let a3 = Opt::new("a", None, false, "one").unwrap();

        assert_eq!(a1, a2);
        assert_ne!(a1, a3);
    }

    #[test]
    fn test_optional_arg() {
        let opt = Opt::builder().short("o").optional_arg().build().unwrap();
        assert_eq!(opt.arity(), Arity::Fixed(1));
        assert!(opt.has_optional_arg());
        assert!(opt.accepts_arg());
        assert!(!opt.requires_arg());

        let opt = Opt::builder()
            .short("o")
            .has_args()
            .optional_arg()
            .build()
            .unwrap();
        assert_eq!(opt.arity(), Arity::Unlimited);

        let tests = vec![
            Opt::builder().short("o").optional_arg().has_arg(false),
            Opt::builder().short("o").optional_arg().number_of_args(0),
            Opt::builder().short("o").optional_arg().arity(Arity::Unset),
        ];

        for (i, builder) in tests.into_iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, builder);

            let mut opt = builder.build().unwrap();
            assert_eq!(opt.arity(), Arity::Fixed(1), "{}", msg);
            assert!(opt.accepts_arg(), "{}", msg);

            opt.add_value_for_processing("x").unwrap();
            assert_eq!(opt.values(), &["x".to_string()], "{}", msg);
        }
    }

    #[test]
    fn test_accepts_and_requires() {
        #[derive(Debug)]
        struct TestData {
            builder: OptBuilder,
            values: Vec<&'static str>,
            accepts: bool,
            requires: bool,
        }

        let tests = vec![
            TestData {
                builder: Opt::builder().short("f"),
                values: vec![],
                accepts: false,
                requires: false,
            },
            TestData {
                builder: Opt::builder().short("f").has_arg(true),
                values: vec![],
                accepts: true,
                requires: true,
            },
            TestData {
                builder: Opt::builder().short("f").has_arg(true),
                values: vec!["one"],
                accepts: false,
                requires: false,
            },
            TestData {
                builder: Opt::builder().short("f").number_of_args(2),
                values: vec!["one"],
                accepts: true,
                requires: true,
            },
            TestData {
                builder: Opt::builder().short("f").has_args(),
                values: vec![],
                accepts: true,
                requires: true,
            },
            TestData {
                builder: Opt::builder().short("f").has_args(),
                values: vec!["one", "two", "three"],
                accepts: true,
                requires: false,
            },
            TestData {
                builder: Opt::builder().short("f").optional_arg(),
                values: vec![],
                accepts: true,
                requires: false,
            },
            TestData {
                builder: Opt::builder().short("f").number_of_args(0),
                values: vec![],
                accepts: false,
                requires: false,
            },
        ];

        for (i, d) in tests.into_iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let mut opt = d.builder.build().unwrap();
            feed(&mut opt, &d.values).unwrap();

            assert_eq!(opt.accepts_arg(), d.accepts, "{}", msg);
            assert_eq!(opt.requires_arg(), d.requires, "{}", msg);
        }
    }

    #[test]
    fn test_process_value() {
        #[derive(Debug)]
        struct TestData {
            builder: OptBuilder,
            values: Vec<&'static str>,
            result: Result<Vec<&'static str>>,
        }

        let tests = vec![
            TestData {
                builder: Opt::builder().short("D").has_args().value_separator('='),
                values: vec!["key=value"],
                result: Ok(vec!["key", "value"]),
            },
            TestData {
                builder: Opt::builder().short("D").has_args().value_separator('='),
                values: vec!["a=b=c", "d"],
                result: Ok(vec!["a", "b", "c", "d"]),
            },
            TestData {
                builder: Opt::builder().short("D").number_of_args(2).value_separator('='),
                values: vec!["key=value=more"],
                result: Ok(vec!["key", "value=more"]),
            },
            TestData {
                builder: Opt::builder()
                    .short("j")
                    .number_of_args(1)
                    .value_separator(','),
                values: vec!["a,b"],
                result: Ok(vec!["a,b"]),
            },
            TestData {
                builder: Opt::builder()
                    .short("j")
                    .number_of_args(3)
                    .value_separator(','),
                values: vec!["a,b,c,d"],
                result: Ok(vec!["a", "b", "c,d"]),
            },
            TestData {
                builder: Opt::builder().short("v").has_arg(true),
                values: vec!["one", "two"],
                result: Err(Error::ValueListFull("v".into())),
            },
            TestData {
                builder: Opt::builder().short("f"),
                values: vec!["one"],
                result: Err(Error::NoArgsAllowed("f".into())),
            },
        ];

        for (i, d) in tests.into_iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let mut opt = d.builder.build().unwrap();
            let result = feed(&mut opt, &d.values);

            match d.result {
                Ok(expected) => {
                    assert!(result.is_ok(), "{}, result: {:?}", msg, result);
                    assert_eq!(opt.values(), expected.as_slice(), "{}", msg);
                }
                Err(expected) => assert_eq!(result, Err(expected), "{}", msg),
            }
        }
    }

    #[test]
    fn test_values() {
        let mut opt = Opt::builder().short("v").has_args().build().unwrap();

        assert_eq!(opt.value(), None);
        assert_eq!(opt.value_or("dflt"), "dflt");

        feed(&mut opt, &["one", "two"]).unwrap();

        assert_eq!(opt.value(), Some("one"));
        assert_eq!(opt.value_at(1), Some("two"));
        assert_eq!(opt.value_at(2), None);
        assert_eq!(opt.value_or("dflt"), "one");

        let instance = opt.instance();
        assert!(instance.values().is_empty());
        assert_eq!(instance, opt);
    }

    #[test]
    #[allow(deprecated)]
    fn test_add_value_unsupported() {
        let mut opt = Opt::builder().short("v").has_arg(true).build().unwrap();

        let result = opt.add_value("foo");

        assert!(matches!(result, Err(Error::Unsupported(_))));
        assert!(opt.values().is_empty());
    }

    #[test]
    fn test_deprecated_message() {
        let opt = Opt::builder()
            .long("old")
            .deprecated(DeprecatedAttributes::new().with_since("1.2").with_description("use --new"))
            .build()
            .unwrap();

        assert!(opt.is_deprecated());
        assert_eq!(
            opt.deprecated_message(),
            "Option 'old': Deprecated since 1.2: use --new"
        );
    }

    #[test]
    fn test_display() {
        #[derive(Debug)]
        struct TestData {
            builder: OptBuilder,
            display: &'static str,
        }

        let tests = vec![
            TestData {
                builder: Opt::builder().short("d"),
                display: "-d",
            },
            TestData {
                builder: Opt::builder().long("debug"),
                display: "--debug",
            },
            TestData {
                builder: Opt::builder().short("d").long("debug").has_arg(true),
                display: "-d,--debug <value>",
            },
            TestData {
                builder: Opt::builder().short("D").has_args(),
                display: "-D <value>...",
            },
            TestData {
                builder: Opt::builder().short("d").required().desc("some help text"),
                display: "-d (required) # some help text",
            },
        ];

        for (i, d) in tests.into_iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let opt = d.builder.build().unwrap();

            assert_eq!(opt.to_string(), d.display, "{}", msg);
        }
    }
}
