// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing a required group of mutually exclusive options.
use argot::{args_from_env, HelpFormatter, Opt, OptGroup, Options, Parser, Result};

fn main() -> Result<()> {
    // Exactly one output format must be chosen.
    let format = OptGroup::new()
        .add(Opt::new("j", Some("json"), false, "JSON output")?)
        .add(Opt::new("y", Some("yaml"), false, "YAML output")?)
        .add(Opt::new("t", Some("toml"), false, "TOML output")?)
        .required();

    let options = Options::new()
        .add("p", Some("pretty"), false, "pretty print output")?
        .add_option_group(format.clone());

    println!("INFO: {}", HelpFormatter::new().render_usage("option-groups", &options));

    let cmd = Parser::new().parse(&options, &args_from_env(), false)?;

    if let Some(opt) = cmd.selected(&format) {
        println!(
            "INFO: format: {} (pretty: {})",
            opt.long().unwrap_or_else(|| opt.key()),
            cmd.has_option("pretty")
        );
    }

    Ok(())
}
