// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

use crate::error::{Error, Result};
use crate::option::Opt;

/// A set of mutually exclusive options: at most one member may appear on a
/// command-line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptGroup {
    options: Vec<Opt>,
    required: bool,
}

impl OptGroup {
    /// Create an empty, optional group.
    pub fn new() -> Self {
        OptGroup::default()
    }

    /// Add a member. Adding an option already in the group has no effect.
    pub fn add(self, opt: Opt) -> Self {
        let mut options = self.options;

        if !options.contains(&opt) {
            options.push(opt);
        }

        OptGroup { options, ..self }
    }

    /// Specify that one member must be present.
    pub fn required(self) -> Self {
        OptGroup {
            required: true,
            ..self
        }
    }

    /// Returns `true` if one member must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the members in the order they were added.
    pub fn options(&self) -> &[Opt] {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut [Opt] {
        &mut self.options
    }

    /// Returns the keys of the members.
    pub fn names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.key()).collect()
    }

    /// Returns `true` if an option with key `key` is a member.
    pub fn contains(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key() == key)
    }

    pub(crate) fn display_names(&self) -> Vec<String> {
        self.options.iter().map(|o| o.display_name()).collect()
    }
}

impl fmt::Display for OptGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let members = self
            .options
            .iter()
            .map(|o| match o.description() {
                Some(desc) => format!("{} {}", o.display_name(), desc),
                None => o.display_name(),
            })
            .collect::<Vec<String>>()
            .join(", ");

        write!(f, "[{}]", members)
    }
}

/// Records which member of a group a parse has chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    /// Returns the key of the selected member.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Choose `opt` for `group`. Choosing the same member again is allowed.
    pub fn select(&mut self, group: &OptGroup, opt: &Opt) -> Result<()> {
        match &self.selected {
            Some(selected) if selected != opt.key() => Err(Error::AlreadySelected {
                group: group.names().into_iter().map(String::from).collect(),
                selected: selected.clone(),
                option: opt.key().into(),
            }),
            _ => {
                self.selected = Some(opt.key().into());
                Ok(())
            }
        }
    }
}
