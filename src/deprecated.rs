// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

/// Details shown when a deprecated option is used.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DeprecatedAttributes {
    description: String,
    since: String,
    for_removal: bool,
}

impl DeprecatedAttributes {
    /// Create an empty set of deprecation details.
    pub fn new() -> Self {
        DeprecatedAttributes::default()
    }

    /// Explain what to use instead.
    pub fn with_description(self, description: &str) -> Self {
        DeprecatedAttributes {
            description: description.into(),
            ..self
        }
    }

    /// Specify the version in which the option was deprecated.
    pub fn with_since(self, since: &str) -> Self {
        DeprecatedAttributes {
            since: since.into(),
            ..self
        }
    }

    /// Specify that the option will be removed in a future version.
    pub fn for_removal(self) -> Self {
        DeprecatedAttributes {
            for_removal: true,
            ..self
        }
    }

    /// Returns the description (empty if unset).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the version the option was deprecated in (empty if unset).
    pub fn since(&self) -> &str {
        &self.since
    }

    /// Returns `true` if the option will be removed.
    pub fn is_for_removal(&self) -> bool {
        self.for_removal
    }
}

impl fmt::Display for DeprecatedAttributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Deprecated")?;

        if self.for_removal {
            write!(f, " for removal")?;
        }

        if !self.since.is_empty() {
            write!(f, " since {}", self.since)?;
        }

        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }

        Ok(())
    }
}
