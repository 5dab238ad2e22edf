// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;

use tracing::{debug, trace};

use crate::command_line::CommandLine;
use crate::error::{Error, Missing, Result};
use crate::group::Selection;
use crate::option::{Arity, Opt};
use crate::options::{Options, Required};
use crate::util::{char_offset, strip_leading_hyphens, strip_quotes};

const END_OF_OPTIONS: &str = "--";

/// Values that enable a flag given a default.
const TRUTHY: &[&str] = &["yes", "true", "1"];

/// Controls when a layer of surrounding double quotes is removed from an
/// option value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteStripping {
    /// Strip values given as a separate argument (`-f "foo"`) but not
    /// values joined to the option (`--file="foo"`).
    Historic,
    /// Strip every value.
    Always,
    /// Never strip.
    Never,
}

impl Default for QuoteStripping {
    fn default() -> Self {
        QuoteStripping::Historic
    }
}

impl QuoteStripping {
    fn separate(self, value: &str) -> &str {
        match self {
            QuoteStripping::Never => value,
            _ => strip_quotes(value),
        }
    }

    fn inline(self, value: &str) -> &str {
        match self {
            QuoteStripping::Always => strip_quotes(value),
            _ => value,
        }
    }
}

/// Settings used to control the parsers behaviour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settings {
    /// If set, a long option may be abbreviated to any unambiguous prefix
    /// (`--verb` for `--verbose`).
    allow_partial_matching: bool,

    /// Which option values lose their surrounding quotes.
    quotes: QuoteStripping,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            allow_partial_matching: true,
            quotes: QuoteStripping::default(),
        }
    }
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Specify that long options must be given in full.
    ///
    /// # Example
    ///
    /// With long options `--verbose` and `--version`, `--verb` is
    /// normally accepted as `--verbose`. With this setting it is an
    /// unrecognised option.
    pub fn no_partial_matching(self) -> Self {
        Settings {
            allow_partial_matching: false,
            ..self
        }
    }

    /// Specify when quotes are stripped from values.
    pub fn quotes(self, quotes: QuoteStripping) -> Self {
        Settings { quotes, ..self }
    }

    /// Strip quotes from every value.
    pub fn strip_quotes(self) -> Self {
        self.quotes(QuoteStripping::Always)
    }

    /// Never strip quotes from values.
    pub fn keep_quotes(self) -> Self {
        self.quotes(QuoteStripping::Never)
    }

    /// Returns `true` if long options may be abbreviated.
    pub fn allow_partial_matching(&self) -> bool {
        self.allow_partial_matching
    }

    /// Returns the quote policy.
    pub fn quote_stripping(&self) -> QuoteStripping {
        self.quotes
    }
}

/// Get a list of all command-line arguments specified to the program with
/// the program name (the first argument) removed.
pub fn args_from_env() -> Vec<String> {
    env::args().skip(1).collect()
}

/// Parses command-lines against an [Options] catalog.
///
/// A parser holds no state between parses so one parser can be used for
/// any number of command-lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Parser {
    settings: Settings,
}

impl Parser {
    /// Create a parser with the default settings.
    pub fn new() -> Self {
        Parser::default()
    }

    /// Create a parser with the specified settings.
    pub fn with_settings(settings: Settings) -> Self {
        Parser { settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Parse `arguments` (which should not include the program name).
    ///
    /// If `stop_at_non_option` is set, the first argument that is not an
    /// option and every argument after it is left over.
    pub fn parse<S: AsRef<str>>(
        &self,
        options: &Options,
        arguments: &[S],
        stop_at_non_option: bool,
    ) -> Result<CommandLine> {
        self.parse_with_defaults(
            options,
            arguments,
            Vec::<(String, String)>::new(),
            stop_at_non_option,
        )
    }

    /// Parse `arguments`, then apply `defaults` (pairs of option name and
    /// value) for options that were not found.
    ///
    /// A default for a flag only takes effect if its value is `yes`, `true`
    /// or `1` (in any case).
    pub fn parse_with_defaults<S, I, K, V>(
        &self,
        options: &Options,
        arguments: &[S],
        defaults: I,
        stop_at_non_option: bool,
    ) -> Result<CommandLine>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut session = Session::new(options, self.settings, stop_at_non_option);

        for arg in arguments {
            session.handle_token(arg.as_ref())?;
        }

        session.check_required_args()?;

        for (name, value) in defaults {
            session.handle_default(name.as_ref(), value.as_ref())?;
        }

        session.check_required_options()?;

        debug!(
            options = session.cmd.options().len(),
            args = session.cmd.args().len(),
            "parsed command-line"
        );

        Ok(session.cmd)
    }
}

/// How an argument is handled, in order of precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TokenKind {
    /// After `--` or the first non-option: kept as an argument.
    Skipped,
    /// `--`
    EndOfOptions,
    /// A value for the option that is still collecting values.
    Value,
    /// `--...`
    Long,
    /// `-...` (but not `-`)
    Short,
    /// Anything else.
    Plain,
}

/// The forms a single dash argument can take, in order of precedence.
///
/// `S` is a short name, `L` a long name (or prefix of one), `V` a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ShortForm<'t> {
    /// `-S`
    Single,
    /// `-SS` where `SS` is a multi-char key
    Key,
    /// `-L`
    LongMatch,
    /// `-LV` (`-Xmx512m`)
    LongPrefix { name: &'t str, value: &'t str },
    /// `-SV` (`-Dflag`)
    Property { name: &'t str, value: &'t str },
    /// `-S1S2S3` or `-S1S2V`
    Cluster,
    /// `-S=V`
    ShortEq { name: &'t str, value: &'t str },
    /// `-SV1=V2` (`-Dkey=value`)
    PropertyEq {
        name: &'t str,
        key: &'t str,
        value: &'t str,
    },
    /// `-L=V`
    LongEq,
}

fn split_at_equal(token: &str) -> (&str, Option<&str>) {
    match token.find('=') {
        Some(pos) => (&token[..pos], Some(&token[pos + 1..])),
        None => (token, None),
    }
}

fn split_first_char(s: &str) -> (&str, &str) {
    s.split_at(char_offset(s, 1))
}

/// Returns `true` for a signed or unsigned decimal number (`-5`, `+1.5`,
/// `-2e10`), but not for `inf` or `NaN`.
fn is_number(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && token.parse::<f64>().is_ok()
}

fn is_truthy(value: &str) -> bool {
    TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(value))
}

/// The state of a single parse.
struct Session<'a> {
    options: &'a Options,
    settings: Settings,
    stop_at_non_option: bool,
    cmd: CommandLine,

    /// Index (in `cmd`) of the option still collecting values.
    current: Option<usize>,

    /// Set once `--` or (with `stop_at_non_option`) a non-option is seen.
    skip_parsing: bool,

    /// Required options and groups not yet seen.
    expected: Vec<Required>,

    /// The member chosen for each group.
    selections: Vec<Selection>,
}

impl<'a> Session<'a> {
    fn new(options: &'a Options, settings: Settings, stop_at_non_option: bool) -> Self {
        Session {
            options,
            settings,
            stop_at_non_option,
            cmd: CommandLine::default(),
            current: None,
            skip_parsing: false,
            expected: options.required_options().to_vec(),
            selections: vec![Selection::default(); options.groups().len()],
        }
    }

    fn current_opt(&self) -> Option<&Opt> {
        self.current.and_then(|i| self.cmd.option_at(i))
    }

    fn classify(&self, token: &str) -> TokenKind {
        let accepts_arg = self.current_opt().map_or(false, |o| o.accepts_arg());

        if self.skip_parsing {
            TokenKind::Skipped
        } else if token == END_OF_OPTIONS {
            TokenKind::EndOfOptions
        } else if accepts_arg && self.is_argument(token) {
            TokenKind::Value
        } else if token.starts_with(END_OF_OPTIONS) {
            TokenKind::Long
        } else if token.starts_with('-') && token != "-" {
            TokenKind::Short
        } else {
            TokenKind::Plain
        }
    }

    fn handle_token(&mut self, token: &str) -> Result<()> {
        let kind = self.classify(token);

        trace!(token, ?kind, "classified argument");

        match kind {
            TokenKind::Skipped => self.cmd.add_arg(token),
            TokenKind::EndOfOptions => self.skip_parsing = true,
            TokenKind::Value => {
                let value = self.settings.quotes.separate(token);

                if let Some(index) = self.current {
                    self.feed(index, value)?;
                }
            }
            TokenKind::Long => self.handle_long(token)?,
            TokenKind::Short => self.handle_short(token)?,
            TokenKind::Plain => self.handle_unknown(token)?,
        }

        if !self.current_opt().map_or(false, |o| o.accepts_arg()) {
            self.current = None;
        }

        Ok(())
    }

    /// A token is a value unless it looks like an option, but negative
    /// numbers are always values.
    fn is_argument(&self, token: &str) -> bool {
        !self.is_option(token) || is_number(token)
    }

    fn is_option(&self, token: &str) -> bool {
        self.is_long_option(token) || self.is_short_option(token)
    }

    fn is_long_option(&self, token: &str) -> bool {
        if !token.starts_with('-') || token.len() == 1 {
            return false;
        }

        let (name, _) = split_at_equal(token);

        if !self.long_matches(name).is_empty() {
            return true;
        }

        self.long_prefix(token).is_some() && !token.starts_with(END_OF_OPTIONS)
    }

    fn is_short_option(&self, token: &str) -> bool {
        if !token.starts_with('-') || token.len() == 1 {
            return false;
        }

        let (name, _) = split_at_equal(&token[1..]);

        if self.options.has_short_option(name) {
            return true;
        }

        match name.chars().next() {
            Some(ch) => self.options.has_short_option(&ch.to_string()),
            None => false,
        }
    }

    /// Returns the long names `name` could refer to.
    fn long_matches(&self, name: &str) -> Vec<&'a str> {
        let options = self.options;

        if self.settings.allow_partial_matching {
            return options.matching_options(name);
        }

        if !options.has_long_option(name) {
            return Vec::new();
        }

        options
            .option(name)
            .and_then(|o| o.long())
            .into_iter()
            .collect()
    }

    /// Returns the longest long name that is a strict prefix of `token`
    /// (ignoring leading hyphens) and the rest of the token.
    fn long_prefix<'t>(&self, token: &'t str) -> Option<(&'t str, &'t str)> {
        let t = strip_leading_hyphens(token);
        let len = t.chars().count();

        (2..len.saturating_sub(1))
            .rev()
            .map(|n| t.split_at(char_offset(t, n)))
            .find(|(prefix, _)| self.options.has_long_option(prefix))
    }

    /// Returns the option named by the first char of `t` if it takes
    /// several values.
    fn property_option(&self, t: &str) -> Option<&'a Opt> {
        let options = self.options;

        let first = t.chars().next()?;
        let opt = options.option(&first.to_string())?;

        match opt.arity() {
            Arity::Fixed(n) if n >= 2 => Some(opt),
            Arity::Unlimited => Some(opt),
            _ => None,
        }
    }

    fn key_option(&self, name: &str) -> Option<&'a Opt> {
        let options = self.options;

        if options.has_short_option(name) {
            options.option(name)
        } else {
            None
        }
    }

    fn classify_short<'t>(&self, token: &'t str) -> ShortForm<'t> {
        let t = strip_leading_hyphens(token);

        if t.chars().count() == 1 {
            return ShortForm::Single;
        }

        match split_at_equal(t) {
            (_, None) => {
                if self.options.has_short_option(t) {
                    return ShortForm::Key;
                }

                if !self.long_matches(t).is_empty() {
                    return ShortForm::LongMatch;
                }

                let accepts_arg = |name: &str| {
                    self.options
                        .option(name)
                        .map_or(false, |o| o.accepts_arg())
                };

                if let Some((name, value)) = self.long_prefix(t) {
                    if accepts_arg(name) {
                        return ShortForm::LongPrefix { name, value };
                    }
                }

                if self.property_option(t).is_some() {
                    let (name, value) = split_first_char(t);

                    return ShortForm::Property { name, value };
                }

                ShortForm::Cluster
            }
            (name, Some(value)) => {
                if name.chars().count() == 1 {
                    return ShortForm::ShortEq { name, value };
                }

                if self.property_option(name).is_some() {
                    let (name, key) = split_first_char(name);

                    return ShortForm::PropertyEq { name, key, value };
                }

                ShortForm::LongEq
            }
        }
    }

    fn handle_short(&mut self, token: &str) -> Result<()> {
        let form = self.classify_short(token);

        trace!(token, ?form, "single dash argument");

        let options = self.options;
        let quotes = self.settings.quotes;

        match form {
            ShortForm::Single | ShortForm::Key => {
                match self.key_option(strip_leading_hyphens(token)) {
                    Some(template) => {
                        self.activate(template)?;
                    }
                    None => self.handle_unknown(token)?,
                }
            }
            ShortForm::LongMatch => self.handle_long_without_equal(token)?,
            ShortForm::LongPrefix { name, value } | ShortForm::Property { name, value } => {
                match options.option(name) {
                    Some(template) => {
                        let index = self.activate(template)?;
                        self.feed(index, quotes.inline(value))?;
                        self.current = None;
                    }
                    None => self.handle_unknown(token)?,
                }
            }
            ShortForm::Cluster => self.handle_cluster(token)?,
            ShortForm::ShortEq { name, value } => match options.option(name) {
                Some(template) if template.accepts_arg() => {
                    let index = self.activate(template)?;
                    self.feed(index, value)?;
                    self.current = None;
                }
                _ => self.handle_unknown(token)?,
            },
            ShortForm::PropertyEq { name, key, value } => match options.option(name) {
                Some(template) => {
                    let index = self.activate(template)?;
                    self.feed(index, key)?;
                    self.feed(index, value)?;
                    self.current = None;
                }
                None => self.handle_unknown(token)?,
            },
            ShortForm::LongEq => self.handle_long_with_equal(token)?,
        }

        Ok(())
    }

    fn handle_long(&mut self, token: &str) -> Result<()> {
        if token.contains('=') {
            self.handle_long_with_equal(token)
        } else {
            self.handle_long_without_equal(token)
        }
    }

    /// Find the option a long name (or prefix of one) refers to.
    fn resolve_long(&self, name: &str) -> Result<Option<&'a Opt>> {
        let options = self.options;

        let matches = self.long_matches(name);

        if matches.is_empty() {
            return Ok(None);
        }

        let exact = options.has_long_option(name);

        if matches.len() > 1 && !exact {
            return Err(Error::AmbiguousOption {
                token: name.into(),
                candidates: matches.iter().map(|m| m.to_string()).collect(),
            });
        }

        let key = if exact { name } else { matches[0] };

        Ok(options.option(key))
    }

    fn handle_long_without_equal(&mut self, token: &str) -> Result<()> {
        match self.resolve_long(token)? {
            Some(template) => {
                self.activate(template)?;
                Ok(())
            }
            None => self.handle_unknown(token),
        }
    }

    fn handle_long_with_equal(&mut self, token: &str) -> Result<()> {
        let (name, value) = split_at_equal(token);
        let value = value.unwrap_or_default();

        match self.resolve_long(name)? {
            Some(template) if template.accepts_arg() => {
                let index = self.activate(template)?;
                self.feed(index, self.settings.quotes.inline(value))?;
                self.current = None;

                Ok(())
            }
            _ => self.handle_unknown(token),
        }
    }

    /// Handle `-abc` as `-a -b -c`. The first option that takes a value
    /// consumes the rest of the argument.
    fn handle_cluster(&mut self, token: &str) -> Result<()> {
        let options = self.options;

        for (i, (offset, ch)) in token.char_indices().enumerate().skip(1) {
            let template = match options.option(&ch.to_string()) {
                Some(template) => template,
                None => {
                    let unknown = if self.stop_at_non_option && i > 1 {
                        &token[offset..]
                    } else {
                        token
                    };

                    return self.handle_unknown(unknown);
                }
            };

            let index = self.activate(template)?;

            let rest = &token[offset + ch.len_utf8()..];

            if self.current.is_some() && !rest.is_empty() {
                return self.feed(index, self.settings.quotes.inline(rest));
            }
        }

        Ok(())
    }

    fn handle_unknown(&mut self, token: &str) -> Result<()> {
        if token.starts_with('-') && token.len() > 1 && !self.stop_at_non_option {
            return Err(Error::UnrecognizedOption {
                token: token.into(),
            });
        }

        self.cmd.add_arg(token);

        if self.stop_at_non_option {
            self.skip_parsing = true;
        }

        Ok(())
    }

    /// Record an occurrence of an option, returning its index in the
    /// command-line.
    fn activate(&mut self, template: &Opt) -> Result<usize> {
        self.check_required_args()?;

        let opt = template.instance();

        self.update_required(&opt)?;

        debug!(option = opt.key(), "activated option");

        let has_arg = opt.has_arg();
        let index = self.cmd.add_option(opt);

        self.current = if has_arg { Some(index) } else { None };

        Ok(index)
    }

    fn update_required(&mut self, opt: &Opt) -> Result<()> {
        let options = self.options;

        if opt.is_required() {
            let entry = Required::Option(opt.key().into());

            self.expected.retain(|r| *r != entry);
        }

        let index = match options.group_index(opt.key()) {
            Some(index) => index,
            None => return Ok(()),
        };

        if let (Some(group), Some(selection)) =
            (options.groups().get(index), self.selections.get_mut(index))
        {
            if group.is_required() {
                self.expected.retain(|r| *r != Required::Group(index));
            }

            selection.select(group, opt)?;

            debug!(group = ?group.names(), option = opt.key(), "selected group member");
        }

        Ok(())
    }

    fn feed(&mut self, index: usize, value: &str) -> Result<()> {
        match self.cmd.option_mut(index) {
            Some(opt) => opt.add_value_for_processing(value),
            None => Ok(()),
        }
    }

    fn check_required_args(&self) -> Result<()> {
        match self.current_opt() {
            Some(opt) if opt.requires_arg() => Err(Error::MissingArgument {
                option: opt.key().into(),
            }),
            _ => Ok(()),
        }
    }

    fn handle_default(&mut self, name: &str, value: &str) -> Result<()> {
        let options = self.options;

        let template = options
            .option(name)
            .ok_or_else(|| Error::UnrecognizedOption { token: name.into() })?;

        let selected = options
            .group_index(template.key())
            .and_then(|i| self.selections.get(i))
            .map_or(false, |s| s.selected().is_some());

        if selected || self.cmd.resolve(name).is_some() {
            return Ok(());
        }

        if template.has_arg() {
            let index = self.activate(template)?;
            self.feed(index, self.settings.quotes.inline(value))?;
        } else if is_truthy(value) {
            self.activate(template)?;
        } else {
            return Ok(());
        }

        trace!(option = name, value, "applied default");

        self.current = None;

        Ok(())
    }

    fn check_required_options(&self) -> Result<()> {
        if self.expected.is_empty() {
            return Ok(());
        }

        let missing = self
            .expected
            .iter()
            .map(|r| match r {
                Required::Option(key) => Missing::Option(key.clone()),
                Required::Group(index) => Missing::Group(
                    self.options
                        .groups()
                        .get(*index)
                        .map(|g| g.display_names())
                        .unwrap_or_default(),
                ),
            })
            .collect();

        Err(Error::MissingRequiredOptions(missing))
    }
}
