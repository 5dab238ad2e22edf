// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to inspect parse errors, convert values and
/// report deprecated options.
use std::process::exit;

use argot::{
    args_from_env, Converter, DeprecatedAttributes, Error, Number, Opt, Options, Parser, Result,
};

fn options() -> Result<Options> {
    let options = Options::new()
        .add("V", Some("version"), false, "show version")?
        // "--ver" is ambiguous.
        .add_option(Opt::builder().long("verbose").desc("be chatty").build()?)
        .add_option(
            Opt::builder()
                .short("c")
                .long("count")
                .has_arg(true)
                .converter(Converter::number())
                .desc("number of repetitions")
                .build()?,
        )
        .add_option(
            Opt::builder()
                .long("old-count")
                .has_arg(true)
                .deprecated(
                    DeprecatedAttributes::new()
                        .with_since("0.2")
                        .with_description("use --count instead"),
                )
                .build()?,
        );

    Ok(options)
}

fn main() -> Result<()> {
    let options = options()?;

    let cmd = match Parser::new().parse(&options, &args_from_env(), false) {
        Ok(cmd) => cmd,
        Err(e @ Error::AmbiguousOption { .. }) => {
            eprintln!("ERROR: {} (be more specific)", e);
            exit(1);
        }
        Err(e) if e.is_parse_error() => {
            eprintln!("ERROR: {}", e);
            exit(2);
        }
        Err(e) => return Err(e),
    };

    let cmd = cmd.with_deprecated_handler(|opt| eprintln!("WARNING: {}", opt.deprecated_message()));

    if cmd.has_option("old-count") {
        println!("INFO: old count: {}", cmd.value_or("old-count", ""));
    }

    match cmd.parsed_value::<Number>("count") {
        Ok(Some(count)) => println!("INFO: count: {}", count),
        Ok(None) => println!("INFO: no count"),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    }

    Ok(())
}
