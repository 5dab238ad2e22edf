// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Boxed error returned by value converters.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An entry of the required list that was never satisfied by a parse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Missing {
    /// A required option, identified by its key.
    Option(String),
    /// A required option group, identified by the display names of its
    /// members (`-x`, `--verbose`, ...).
    Group(Vec<String>),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Missing::Option(key) => write!(f, "{}", key),
            Missing::Group(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// The underlying failure of a value converter.
///
/// Shared so that [Error] stays cheap to clone.
#[derive(Clone, Debug)]
pub struct Cause(Arc<dyn StdError + Send + Sync + 'static>);

impl Cause {
    /// Wrap a converter failure.
    pub fn new(err: BoxError) -> Self {
        Cause(Arc::from(err))
    }

    /// The wrapped error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Cause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

// Causes are opaque: two causes are the same if they say the same thing.
impl PartialEq for Cause {
    fn eq(&self, other: &Cause) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Cause {}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<String>>()
        .join(", ")
}

fn missing_list(missing: &[Missing]) -> String {
    let plural = if missing.len() == 1 { "" } else { "s" };

    let entries = missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<String>>()
        .join(", ");

    format!("{}: {}", plural, entries)
}

/// The error type.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    //------------------------------
    // Incorrect API usage errors (programmer error)
    //------------------------------
    /// An option was declared with neither a short nor a long name.
    #[error("either a short or a long option name must be specified")]
    NoOptionName,

    /// An option name contains a character that cannot be typed as part of
    /// an option on the command-line.
    #[error("illegal option name {name:?}: invalid character {ch:?}")]
    IllegalOptionName {
        /// The rejected name.
        name: String,
        /// The first offending character.
        ch: char,
    },

    /// Two catalogs being merged both declare the same option key.
    #[error("duplicate option key: {0}")]
    DuplicateKey(String),

    /// A value was given to an option that was declared without arguments.
    #[error("option {0} does not accept arguments")]
    NoArgsAllowed(String),

    /// A value was given to an option that already holds all the values
    /// it was declared to take.
    #[error("cannot add value to option {0}: list full")]
    ValueListFull(String),

    //------------------------------
    // Runtime errors (user error)
    //------------------------------
    /// A token looks like an option but matches no declared option.
    #[error("unrecognized option: {token}")]
    UnrecognizedOption {
        /// The offending token, as given.
        token: String,
    },

    /// A long option prefix matches several declared long options and
    /// none of them exactly.
    #[error("ambiguous option: '{token}' (could be: {})", quoted_list(.candidates))]
    AmbiguousOption {
        /// The offending token, as given.
        token: String,
        /// Every long option name the token is a prefix of.
        candidates: Vec<String>,
    },

    /// An option did not receive the values it requires.
    #[error("missing argument for option: {option}")]
    MissingArgument {
        /// Key of the option.
        option: String,
    },

    /// Required options or groups were not specified.
    #[error("missing required option{}", missing_list(.0))]
    MissingRequiredOptions(Vec<Missing>),

    /// A second member of a mutually exclusive group was specified.
    #[error(
        "the option '{option}' was specified but an option from this group has already been selected: '{selected}'"
    )]
    AlreadySelected {
        /// Keys of the group members.
        group: Vec<String>,
        /// Key of the member selected first.
        selected: String,
        /// Key of the option that was rejected.
        option: String,
    },

    /// A typed accessor could not convert an option value.
    #[error("unable to convert value {value:?} of option {option}: {cause}")]
    Conversion {
        /// Key of the option.
        option: String,
        /// The raw value.
        value: String,
        /// Why the converter failed.
        #[source]
        cause: Cause,
    },

    //------------------------------
    // Limitations
    //------------------------------
    /// The operation is retired or not supported.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl Error {
    /// Returns `true` for errors caused by the command-line being parsed or
    /// queried, as opposed to incorrect use of the API.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::UnrecognizedOption { .. }
                | Error::AmbiguousOption { .. }
                | Error::MissingArgument { .. }
                | Error::MissingRequiredOptions(_)
                | Error::AlreadySelected { .. }
                | Error::Conversion { .. }
        )
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
