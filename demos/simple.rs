// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// A simple example showing flags, options that need a value and left
/// over arguments.
use argot::{args_from_env, BoxError, HelpFormatter, Opt, Options, Parser, Result};

fn options() -> Result<Options> {
    let options = Options::new()
        // Support "-h" and "--help" flags.
        .add("h", Some("help"), false, "show this help")?
        // Support "-v" and "--verbose" flags. Can be specified multiple
        // times.
        .add("v", Some("verbose"), false, "increase verbosity")?
        // Support "-n <name>", "--name <name>" and "--name=<name>".
        .add_option(
            Opt::builder()
                .short("n")
                .long("name")
                .has_arg(true)
                .arg_name("name")
                .desc("who to greet")
                .build()?,
        )
        // Support "--colour" and "--colour=<when>".
        .add_option(
            Opt::builder()
                .long("colour")
                .optional_arg()
                .arg_name("when")
                .desc("colourise output (always, never or auto)")
                .build()?,
        );

    Ok(options)
}

fn main() -> std::result::Result<(), BoxError> {
    tracing_subscriber::fmt::init();

    let options = options()?;

    let cmd = Parser::new().parse(&options, &args_from_env(), false)?;

    if cmd.has_option("help") {
        let mut stdout = std::io::stdout();

        HelpFormatter::new()
            .print_help(&mut stdout, "simple", "Options:", &options, "", true)?;

        return Ok(());
    }

    let verbosity = cmd.iter().filter(|o| o.key() == "v").count();

    println!("INFO: verbosity: {}", verbosity);
    println!("INFO: hello, {}", cmd.value_or("name", "world"));

    if cmd.has_option("colour") {
        println!("INFO: colour: {}", cmd.value_or("colour", "auto"));
    }

    for (i, arg) in cmd.args().iter().enumerate() {
        println!("INFO: argument {}: {:?}", i, arg);
    }

    Ok(())
}
