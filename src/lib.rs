// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Crate for parsing command-line options in the style of `getopt_long(3)`:
//! short and long options, option bundling, abbreviated long options,
//! `key=value` properties, mutually exclusive option groups and required
//! options.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Quickstart](#quickstart)
//! * [Examples](#examples)
//! * [Details](#details)
//! * [Terminology](#terminology)
//! * [Summary of features and behaviour](#summary-of-features-and-behaviour)
//! * [Limitations](#limitations)
//!
//! ---
//!
//! # Overview
//!
//! Declare the options your program accepts in an [Options] catalog, hand
//! the catalog and the command-line to a [Parser] and query the resulting
//! [CommandLine].
//!
//! The catalog is never modified by parsing, so it can be built once and
//! shared (it is `Send + Sync`).
//!
//! # Quickstart
//!
//! > **Note:** If you are not familiar with command-line handling,
//! > see the [terminology](#terminology) section.
//!
//! 1. Declare the options.
//!
//!    ```rust
//!    use argot::{Opt, Options, Result};
//!
//!    fn options() -> Result<Options> {
//!        let options = Options::new()
//!            // Support "-d" and "--debug" flags.
//!            .add("d", Some("debug"), false, "enable debug")?
//!            // Support "-f <file>" and "--file <file>".
//!            .add_option(
//!                Opt::builder()
//!                    .short("f")
//!                    .long("file")
//!                    .has_arg(true)
//!                    .arg_name("file")
//!                    .required()
//!                    .desc("file to process")
//!                    .build()?,
//!            );
//!
//!        Ok(options)
//!    }
//!    # options().unwrap();
//!    ```
//!
//! 1. Parse the command-line.
//!
//!    ```rust
//!    # use argot::{Options, Parser, Result};
//!    #
//!    # fn main() -> Result<()> {
//!    # let options = Options::new()
//!    #     .add("d", Some("debug"), false, "enable debug")?
//!    #     .add_required("f", Some("file"), true, "file to process")?;
//!    #
//!    // Normally, you would pass argot::args_from_env() here.
//!    let args = vec!["--debug", "-f", "foo.txt", "bar.txt"];
//!
//!    let cmd = Parser::new().parse(&options, &args, false)?;
//!    #
//!    # assert!(cmd.has_option("d"));
//!    # Ok(())
//!    # }
//!    ```
//!
//! 1. Query the result.
//!
//!    ```rust
//!    # use argot::{Options, Parser, Result};
//!    #
//!    # fn main() -> Result<()> {
//!    # let options = Options::new()
//!    #     .add("d", Some("debug"), false, "enable debug")?
//!    #     .add_required("f", Some("file"), true, "file to process")?;
//!    #
//!    # let args = vec!["--debug", "-f", "foo.txt", "bar.txt"];
//!    # let cmd = Parser::new().parse(&options, &args, false)?;
//!    #
//!    assert!(cmd.has_option("debug"));
//!    assert_eq!(cmd.option_value("file"), Some("foo.txt"));
//!    assert_eq!(cmd.args(), &["bar.txt".to_string()]);
//!    # Ok(())
//!    # }
//!    ```
//!
//! # Examples
//!
//! Below is a full example showing option groups, property options and
//! typed values.
//!
//! ```rust
//! use argot::{Converter, Error, Missing, Number, Opt, OptGroup, Options, Parser, Result};
//!
//! fn main() -> Result<()> {
//!     let format = OptGroup::new()
//!         .add(Opt::new("j", Some("json"), false, "JSON output")?)
//!         .add(Opt::new("y", Some("yaml"), false, "YAML output")?)
//!         .required();
//!
//!     let options = Options::new()
//!         .add_option(
//!             Opt::builder()
//!                 .short("D")
//!                 .has_args()
//!                 .value_separator('=')
//!                 .desc("define a property")
//!                 .build()?,
//!         )
//!         .add_option(
//!             Opt::builder()
//!                 .short("n")
//!                 .long("count")
//!                 .has_arg(true)
//!                 .converter(Converter::number())
//!                 .build()?,
//!         )
//!         .add_option_group(format.clone());
//!
//!     let parser = Parser::new();
//!
//!     let cmd = parser.parse(&options, &["-Dlevel=3", "--yaml", "-n", "-12"], false)?;
//!
//!     let props = cmd.option_properties("D");
//!     assert_eq!(props.get("level").map(|s| s.as_str()), Some("3"));
//!
//!     assert_eq!(cmd.selected(&format).map(|o| o.key()), Some("y"));
//!     assert_eq!(cmd.parsed_value::<Number>("count")?, Some(Number::Integer(-12)));
//!
//!     // One of the group must be specified.
//!     let result = parser.parse(&options, &["-n", "1"], false);
//!
//!     assert_eq!(
//!         result.err(),
//!         Some(Error::MissingRequiredOptions(vec![Missing::Group(vec![
//!             "-j".into(),
//!             "-y".into()
//!         ])]))
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! For further examples, try out the programs in the `demos/` directory:
//!
//! ```bash
//! $ cargo run --example simple -- -v --name=world -vv rest
//! $ cargo run --example properties -- -Dfoo=bar -Dflag -Xmx512m
//! $ cargo run --example option-groups -- --json
//! $ cargo run --example error-handler -- --ver
//! ```
//!
//! # Details
//!
//! ## Terminology
//!
//! - An "argument" is a value passed to a program on the command-line.
//!
//!   Arguments can be "options", "option values" or "left over arguments".
//!
//! - A "short option" starts with a single dash (`-v`). Its name is
//!   usually a single character but may be longer (`-Xmx`).
//!
//! - A "long option" starts with two dashes (`--verbose`). It may be
//!   abbreviated to any prefix that only one long option starts with
//!   (`--verb`). A single dash also works for long options (`-verbose`).
//!
//! - An option "value" is given in the next argument (`-f foo`), after an
//!   `=` (`-f=foo`, `--file=foo`) or joined to the option (`-ffoo`).
//!
//! - "Bundling" (or "bursting") allows several single character flags to
//!   be combined: `-abc` is `-a -b -c`. If one of them takes a value, the
//!   rest of the argument is that value (`-abfoo.txt`).
//!
//! - A "property option" takes two values, usually a key and a value
//!   (`-Dkey=value`).
//!
//! - An "option group" is a set of options of which at most one may be
//!   given.
//!
//! - The special argument `--` means "end of all options": every argument
//!   after it is left over, even if it starts with a dash.
//!
//! ## How an argument is interpreted
//!
//! Each argument is tried against the following, in order:
//!
//! 1. After `--` (or the first non-option when `stop_at_non_option` is set)
//!    the argument is left over.
//! 1. `--` ends option parsing.
//! 1. If the previous option still accepts a value, the argument is that
//!    value unless it looks like a known option. Negative numbers (`-5`)
//!    are always values.
//! 1. `--name` and `--name=value` are long options.
//! 1. `-...` is tried as a short option name, then a long option, then
//!    a long option with a joined value (`-Xmx512m`), then a property
//!    (`-Dkey`), then a bundle of flags.
//! 1. Anything else is left over.
//!
//! # Summary of features and behaviour
//!
//! - Short, long and long-only options.
//! - Abbreviated long options (can be disabled with
//!   [Settings::no_partial_matching()]).
//! - Options that take an optional value, a fixed number of values or
//!   any number of values.
//! - Values split at a separator character (`-Dkey=value`).
//! - Required options and mutually exclusive option groups.
//! - Default values applied after parsing
//!   ([Parser::parse_with_defaults()]).
//! - Typed values through [Converter]s.
//! - Deprecated options reported when queried.
//! - Help text generation with [HelpFormatter].
//! - Structured diagnostics through the `tracing` crate.
//!
//! # Limitations
//!
//! - No shell completion generation.
//! - Error messages are not translated.
//! - An option group is reported as missing by listing its members rather
//!   than by a name.

mod command_line;
mod convert;
mod deprecated;
mod error;
mod group;
mod help;
mod option;
mod options;
mod parser;
mod util;

pub use error::{BoxError, Cause, Error, Missing, Result};

pub use command_line::{CommandLine, DeprecatedHandler};
pub use convert::{Converter, Number, DATE_FORMAT};
pub use deprecated::DeprecatedAttributes;
pub use group::{OptGroup, Selection};
pub use help::{HelpFormatter, DEFAULT_DESC_PAD, DEFAULT_LEFT_PAD, DEFAULT_WIDTH};
pub use option::{Arity, Opt, OptBuilder};
pub use options::{Options, Required};
pub use parser::{args_from_env, Parser, QuoteStripping, Settings};
