// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing `key=value` property options and options whose
/// value is joined to a long name (`-Xmx512m`).
use argot::{args_from_env, Opt, Options, Parser, Result};

fn main() -> Result<()> {
    let options = Options::new()
        // Support "-Dkey=value" and "-Dkey" (which means "key=true").
        .add_option(
            Opt::builder()
                .short("D")
                .has_args()
                .value_separator('=')
                .arg_name("property=value")
                .desc("define a property")
                .build()?,
        )
        // Support "-Xmx<size>" and "--Xmx=<size>".
        .add_option(
            Opt::builder()
                .long("Xmx")
                .has_arg(true)
                .arg_name("size")
                .desc("maximum heap size")
                .build()?,
        );

    let cmd = Parser::new().parse(&options, &args_from_env(), false)?;

    for (key, value) in cmd.option_properties("D") {
        println!("INFO: property {:?} = {:?}", key, value);
    }

    if let Some(size) = cmd.option_value("Xmx") {
        println!("INFO: maximum heap size: {}", size);
    }

    println!("INFO: arguments: {:?}", cmd.args());

    Ok(())
}
