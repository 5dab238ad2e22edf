// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::group::OptGroup;
use crate::option::Opt;
use crate::util::strip_leading_hyphens;

/// An entry in the list of things a command-line must contain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Required {
    /// The key of a required option.
    Option(String),
    /// Index (into [Options::groups()]) of a required group.
    Group(usize),
}

/// Names in insertion order, each mapped to a template slot. Re-inserting a
/// name keeps its original position.
#[derive(Clone, Debug, Default)]
struct NameIndex {
    names: Vec<String>,
    slots: HashMap<String, usize>,
}

impl NameIndex {
    fn insert(&mut self, name: &str, slot: usize) {
        if self.slots.insert(name.into(), slot).is_none() {
            self.names.push(name.into());
        }
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.names.iter().filter_map(move |n| self.get(n))
    }
}

/// The catalog of options a parser recognises.
///
/// Options are registered under their key (the short name, or the long
/// name for long-only options) and, if they have one, their long name.
/// A catalog is not changed by parsing so it can be shared between
/// threads and reused.
#[derive(Clone, Debug, Default)]
pub struct Options {
    templates: Vec<Opt>,
    keys: NameIndex,
    longs: NameIndex,
    groups: Vec<OptGroup>,
    group_of: HashMap<String, usize>,
    required: Vec<Required>,
}

impl Options {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Options::default()
    }

    /// Register an option.
    ///
    /// An option with the same key replaces the existing one.
    pub fn add_option(mut self, opt: Opt) -> Self {
        self.register(opt);
        self
    }

    fn register(&mut self, opt: Opt) {
        let key = opt.key().to_string();
        let slot = self.templates.len();

        if let Some(long) = opt.long() {
            self.longs.insert(long, slot);
        }

        if opt.is_required() {
            let entry = Required::Option(key.clone());

            self.required.retain(|r| *r != entry);
            self.required.push(entry);
        }

        self.keys.insert(&key, slot);
        self.templates.push(opt);
    }

    /// Register a simple option.
    pub fn add(self, short: &str, long: Option<&str>, has_arg: bool, description: &str) -> Result<Self> {
        let opt = Opt::new(short, long, has_arg, description)?;

        Ok(self.add_option(opt))
    }

    /// Register a simple option that must be specified.
    pub fn add_required(
        self,
        short: &str,
        long: Option<&str>,
        has_arg: bool,
        description: &str,
    ) -> Result<Self> {
        let builder = Opt::builder()
            .short(short)
            .desc(description)
            .has_arg(has_arg)
            .required();

        let builder = match long {
            Some(long) => builder.long(long),
            None => builder,
        };

        Ok(self.add_option(builder.build()?))
    }

    /// Register every member of a group.
    ///
    /// Members are never individually required: the group decides that.
    pub fn add_option_group(mut self, mut group: OptGroup) -> Self {
        let index = self.groups.len();

        if group.is_required() {
            self.required.push(Required::Group(index));
        }

        for opt in group.options_mut() {
            opt.set_required(false);

            self.register(opt.clone());
            self.group_of.insert(opt.key().into(), index);
        }

        self.groups.push(group);

        self
    }

    /// Merge another catalog into this one.
    pub fn add_options(self, other: Options) -> Result<Self> {
        let mut options = self;

        for opt in other.options() {
            if options.has_option(opt.key()) {
                return Err(Error::DuplicateKey(opt.key().into()));
            }

            options = options.add_option(opt.clone());
        }

        for group in other.groups {
            options = options.add_option_group(group);
        }

        Ok(options)
    }

    /// Returns the options in the order their keys were first registered.
    pub fn options(&self) -> Vec<&Opt> {
        self.keys.slots().map(|slot| &self.templates[slot]).collect()
    }

    /// Returns the groups in the order they were added.
    pub fn groups(&self) -> &[OptGroup] {
        &self.groups
    }

    /// Returns what a command-line must contain.
    pub fn required_options(&self) -> &[Required] {
        &self.required
    }

    /// Returns the option whose key or long name is `name` (leading
    /// hyphens are ignored).
    pub fn option(&self, name: &str) -> Option<&Opt> {
        let name = strip_leading_hyphens(name);

        self.keys
            .get(name)
            .or_else(|| self.longs.get(name))
            .map(|slot| &self.templates[slot])
    }

    /// Returns `true` if `name` is the key of an option.
    pub fn has_short_option(&self, name: &str) -> bool {
        self.keys.contains(strip_leading_hyphens(name))
    }

    /// Returns `true` if `name` is the long name of an option.
    pub fn has_long_option(&self, name: &str) -> bool {
        self.longs.contains(strip_leading_hyphens(name))
    }

    /// Returns `true` if `name` is the key or long name of an option.
    pub fn has_option(&self, name: &str) -> bool {
        self.has_short_option(name) || self.has_long_option(name)
    }

    /// Returns the long names that `name` could refer to.
    ///
    /// An exact match is the only result. Otherwise every long name that
    /// starts with `name` is returned, in declaration order.
    pub fn matching_options(&self, name: &str) -> Vec<&str> {
        let name = strip_leading_hyphens(name);

        if let Some((exact, _)) = self.longs.slots.get_key_value(name) {
            return vec![exact.as_str()];
        }

        self.longs
            .names
            .iter()
            .filter(|long| long.starts_with(name))
            .map(|long| long.as_str())
            .collect()
    }

    /// Returns the group `opt` belongs to.
    pub fn option_group(&self, opt: &Opt) -> Option<&OptGroup> {
        self.group_index(opt.key()).map(|i| &self.groups[i])
    }

    pub(crate) fn group_index(&self, key: &str) -> Option<usize> {
        self.group_of.get(key).copied()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let opts = self
            .options()
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        write!(f, "[ Options: {} ]", opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(short: &str, long: Option<&str>) -> Opt {
        Opt::new(short, long, false, "").unwrap()
    }

    fn long_only(long: &str) -> Opt {
        Opt::builder().long(long).build().unwrap()
    }

    #[test]
    fn test_lookup() {
        let options = Options::new()
            .add("a", Some("all"), false, "show all")
            .unwrap()
            .add_option(long_only("color"))
            .add("b", None, true, "block size")
            .unwrap();

        #[derive(Debug)]
        struct TestData {
            name: &'static str,
            short: bool,
            long: bool,
            key: Option<&'static str>,
        }

        let tests = &[
            TestData {
                name: "a",
                short: true,
                long: false,
                key: Some("a"),
            },
            TestData {
                name: "-a",
                short: true,
                long: false,
                key: Some("a"),
            },
            TestData {
                name: "--all",
                short: false,
                long: true,
                key: Some("a"),
            },
            TestData {
                name: "color",
                short: true,
                long: true,
                key: Some("color"),
            },
            TestData {
                name: "b",
                short: true,
                long: false,
                key: Some("b"),
            },
            TestData {
                name: "al",
                short: false,
                long: false,
                key: None,
            },
            TestData {
                name: "---a",
                short: false,
                long: false,
                key: None,
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            assert_eq!(options.has_short_option(d.name), d.short, "{}", msg);
            assert_eq!(options.has_long_option(d.name), d.long, "{}", msg);
            assert_eq!(options.has_option(d.name), d.short || d.long, "{}", msg);
            assert_eq!(options.option(d.name).map(|o| o.key()), d.key, "{}", msg);
        }

        let keys: Vec<&str> = options.options().iter().map(|o| o.key()).collect();
        assert_eq!(keys, vec!["a", "color", "b"]);
    }

    #[test]
    fn test_matching_options() {
        let options = Options::new()
            .add_option(long_only("chicken"))
            .add_option(long_only("chin"))
            .add_option(long_only("version"))
            .add_option(long_only("verbose"))
            .add_option(long_only("verb"));

        #[derive(Debug)]
        struct TestData {
            name: &'static str,
            matches: Vec<&'static str>,
        }

        let tests = &[
            TestData {
                name: "--ch",
                matches: vec!["chicken", "chin"],
            },
            TestData {
                name: "chin",
                matches: vec!["chin"],
            },
            TestData {
                name: "--ve",
                matches: vec!["version", "verbose", "verb"],
            },
            TestData {
                name: "verb",
                matches: vec!["verb"],
            },
            TestData {
                name: "verbo",
                matches: vec!["verbose"],
            },
            TestData {
                name: "x",
                matches: vec![],
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            assert_eq!(options.matching_options(d.name), d.matches, "{}", msg);
        }
    }

    #[test]
    fn test_required() {
        let required = Opt::builder().short("r").required().build().unwrap();

        let options = Options::new()
            .add_option(required.clone())
            .add_option(flag("f", None))
            .add_option(required)
            .add_required("o", Some("output"), true, "output file")
            .unwrap();

        assert_eq!(
            options.required_options(),
            &[Required::Option("r".into()), Required::Option("o".into())]
        );

        assert!(options.option("output").unwrap().is_required());
    }

    #[test]
    fn test_replace_keeps_position() {
        let options = Options::new()
            .add("a", None, false, "first")
            .unwrap()
            .add("b", None, false, "")
            .unwrap()
            .add("a", None, true, "second")
            .unwrap();

        let opts = options.options();

        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].key(), "a");
        assert_eq!(opts[0].description(), Some("second"));
        assert!(opts[0].has_arg());
    }

    #[test]
    fn test_groups() {
        let x = Opt::builder().short("x").required().build().unwrap();

        let group = OptGroup::new().add(x).add(flag("y", Some("yes"))).required();

        let options = Options::new()
            .add_option(flag("a", None))
            .add_option_group(group);

        assert_eq!(options.required_options(), &[Required::Group(0)]);

        // Group members are never individually required.
        assert!(!options.option("x").unwrap().is_required());
        assert!(!options.groups()[0].options()[0].is_required());

        let y = options.option("--yes").unwrap();
        let owner = options.option_group(y).unwrap();
        assert_eq!(owner.names(), vec!["x", "y"]);

        let a = options.option("a").unwrap();
        assert!(options.option_group(a).is_none());
    }

    #[test]
    fn test_add_options() {
        let base = Options::new().add("a", None, false, "").unwrap();

        let extra = Options::new()
            .add("b", None, false, "")
            .unwrap()
            .add_option_group(OptGroup::new().add(flag("x", None)).add(flag("y", None)));

        let merged = base.clone().add_options(extra).unwrap();

        assert!(merged.has_option("b"));
        assert!(merged.has_option("y"));
        assert_eq!(merged.groups().len(), 1);
        assert!(merged.option_group(merged.option("x").unwrap()).is_some());

        let dup = Options::new().add("a", Some("again"), false, "").unwrap();
        let result = base.add_options(dup);

        assert_eq!(result.err(), Some(Error::DuplicateKey("a".into())));
    }

    #[test]
    fn test_send_sync() {
        fn check<T: Send + Sync>() {}

        check::<Options>();
    }
}
