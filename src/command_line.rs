// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::{BoxError, Cause, Error, Result};
use crate::group::OptGroup;
use crate::option::Opt;
use crate::util::strip_leading_hyphens;

/// Called when a deprecated option is queried.
pub type DeprecatedHandler = dyn Fn(&Opt) + Send + Sync;

fn log_deprecated(opt: &Opt) {
    warn!(option = opt.key(), "{}", opt.deprecated_message());
}

/// The result of a parse: the options found, in the order they were found,
/// and the arguments left over.
///
/// An option given several times appears once per occurrence, each with
/// its own values.
#[derive(Clone)]
pub struct CommandLine {
    options: Vec<Opt>,
    args: Vec<String>,
    deprecated_handler: Option<Arc<DeprecatedHandler>>,
}

impl Default for CommandLine {
    fn default() -> Self {
        CommandLine {
            options: Vec::new(),
            args: Vec::new(),
            deprecated_handler: Some(Arc::new(log_deprecated)),
        }
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CommandLine")
            .field("options", &self.options)
            .field("args", &self.args)
            .field("deprecated_handler", &self.deprecated_handler.is_some())
            .finish()
    }
}

impl CommandLine {
    /// Replace the handler called when a deprecated option is queried.
    ///
    /// By default a warning is logged.
    pub fn with_deprecated_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&Opt) + Send + Sync + 'static,
    {
        CommandLine {
            deprecated_handler: Some(Arc::new(handler)),
            ..self
        }
    }

    /// Do not report use of deprecated options.
    pub fn without_deprecated_handler(self) -> Self {
        CommandLine {
            deprecated_handler: None,
            ..self
        }
    }

    pub(crate) fn add_arg(&mut self, arg: &str) {
        self.args.push(arg.into());
    }

    pub(crate) fn add_option(&mut self, opt: Opt) -> usize {
        self.options.push(opt);
        self.options.len() - 1
    }

    pub(crate) fn option_at(&self, index: usize) -> Option<&Opt> {
        self.options.get(index)
    }

    pub(crate) fn option_mut(&mut self, index: usize) -> Option<&mut Opt> {
        self.options.get_mut(index)
    }

    /// Find the first occurrence of the option with key or long name `name`
    /// without reporting deprecation.
    pub(crate) fn resolve(&self, name: &str) -> Option<&Opt> {
        let name = strip_leading_hyphens(name);

        self.options
            .iter()
            .find(|o| o.short() == Some(name) || o.long() == Some(name))
    }

    fn handle_deprecated(&self, opt: &Opt) {
        if !opt.is_deprecated() {
            return;
        }

        if let Some(handler) = &self.deprecated_handler {
            handler(opt);
        }
    }

    /// Returns `true` if the option with key or long name `name` was found.
    pub fn has_option(&self, name: &str) -> bool {
        match self.resolve(name) {
            Some(opt) => {
                self.handle_deprecated(opt);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `opt` was found.
    pub fn has_opt(&self, opt: &Opt) -> bool {
        match self.options.iter().find(|o| *o == opt) {
            Some(found) => {
                self.handle_deprecated(found);
                true
            }
            None => false,
        }
    }

    /// Returns every value given to the option, across all occurrences,
    /// or `None` if the option was not found or has no values.
    pub fn option_values(&self, name: &str) -> Option<Vec<&str>> {
        let opt = self.resolve(name)?;

        self.opt_values(opt)
    }

    /// Like [CommandLine::option_values()] but identifies the option
    /// directly.
    pub fn opt_values(&self, opt: &Opt) -> Option<Vec<&str>> {
        let mut values = Vec::new();

        for found in self.options.iter().filter(|o| *o == opt) {
            self.handle_deprecated(found);
            values.extend(found.values().iter().map(|v| v.as_str()));
        }

        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    /// Returns the first value of the option.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.option_values(name)
            .and_then(|values| values.first().copied())
    }

    /// Returns the first value of `opt`.
    pub fn opt_value(&self, opt: &Opt) -> Option<&str> {
        self.opt_values(opt).and_then(|values| values.first().copied())
    }

    /// Returns the first value of the option, or `default`.
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.option_value(name).unwrap_or(default)
    }

    /// Returns the member of `group` that was found.
    pub fn selected(&self, group: &OptGroup) -> Option<&Opt> {
        self.options.iter().find(|o| group.contains(o.key()))
    }

    /// Returns the first value of the member of `group` that was found.
    pub fn group_value(&self, group: &OptGroup) -> Option<&str> {
        let opt = self.selected(group)?;

        self.opt_value(opt)
    }

    /// Convert the first value of the option with its [Converter](crate::Converter).
    ///
    /// Returns `Ok(None)` if the option was not found or has no value.
    pub fn parsed_value<T: Any>(&self, name: &str) -> Result<Option<T>> {
        let opt = match self.resolve(name) {
            Some(opt) => opt,
            None => return Ok(None),
        };

        let value = match self.opt_value(opt) {
            Some(value) => value,
            None => return Ok(None),
        };

        let converted = opt
            .converter()
            .convert(value)
            .map_err(|e| conversion_error(opt, value, e))?;

        match converted.downcast::<T>() {
            Ok(v) => Ok(Some(*v)),
            Err(_) => {
                let msg = format!(
                    "{} converter cannot produce a {}",
                    opt.converter().name(),
                    std::any::type_name::<T>()
                );

                Err(conversion_error(opt, value, msg.into()))
            }
        }
    }

    /// Like [CommandLine::parsed_value()] but returns `default` if the
    /// option was not found.
    pub fn parsed_value_or<T: Any>(&self, name: &str, default: T) -> Result<T> {
        Ok(self.parsed_value(name)?.unwrap_or(default))
    }

    /// Returns the values of a property style option (`-Dkey=value`) as
    /// a map. Values are taken in pairs; an unpaired key maps to `"true"`.
    pub fn option_properties(&self, name: &str) -> BTreeMap<String, String> {
        match self.resolve(name) {
            Some(opt) => self.opt_properties(opt),
            None => BTreeMap::new(),
        }
    }

    /// Like [CommandLine::option_properties()] but identifies the option
    /// directly.
    pub fn opt_properties(&self, opt: &Opt) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();

        for found in self.options.iter().filter(|o| *o == opt) {
            for pair in found.values().chunks(2) {
                let value = pair.get(1).map(|v| v.as_str()).unwrap_or("true");

                props.insert(pair[0].clone(), value.to_string());
            }
        }

        props
    }

    /// Returns the arguments that were not options or option values.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the left over arguments as a list of string slices.
    pub fn arg_list(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.as_str()).collect()
    }

    /// Consume the command-line, returning the left over arguments.
    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Returns the options found, in order.
    pub fn options(&self) -> &[Opt] {
        &self.options
    }

    /// Iterate over the options found.
    pub fn iter(&self) -> std::slice::Iter<'_, Opt> {
        self.options.iter()
    }
}

impl<'a> IntoIterator for &'a CommandLine {
    type Item = &'a Opt;
    type IntoIter = std::slice::Iter<'a, Opt>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

fn conversion_error(opt: &Opt, value: &str, err: BoxError) -> Error {
    // Converters may report one of our own errors.
    match err.downcast::<Error>() {
        Ok(err) => *err,
        Err(err) => Error::Conversion {
            option: opt.key().into(),
            value: value.into(),
            cause: Cause::new(err),
        },
    }
}
