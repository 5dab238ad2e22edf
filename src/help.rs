// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::io::{self, Write};

use crate::group::OptGroup;
use crate::option::Opt;
use crate::options::Options;

/// Default number of characters per line.
pub const DEFAULT_WIDTH: usize = 74;

/// Default padding to the left of each option.
pub const DEFAULT_LEFT_PAD: usize = 1;

/// Default padding between an option and its description.
pub const DEFAULT_DESC_PAD: usize = 3;

const DEFAULT_SYNTAX_PREFIX: &str = "usage: ";
const DEFAULT_ARG_NAME: &str = "arg";
const DEFAULT_OPT_PREFIX: &str = "-";
const DEFAULT_LONG_OPT_PREFIX: &str = "--";
const DEFAULT_LONG_OPT_SEPARATOR: &str = " ";
const DEPRECATED_PREFIX: &str = "[Deprecated] ";

/// Renders usage and help text for an [Options] catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HelpFormatter {
    width: usize,
    left_pad: usize,
    desc_pad: usize,
    syntax_prefix: String,
    arg_name: String,
    opt_prefix: String,
    long_opt_prefix: String,
    long_opt_separator: String,
    sorted: bool,
    show_deprecated: bool,
}

impl Default for HelpFormatter {
    fn default() -> Self {
        HelpFormatter {
            width: DEFAULT_WIDTH,
            left_pad: DEFAULT_LEFT_PAD,
            desc_pad: DEFAULT_DESC_PAD,
            syntax_prefix: DEFAULT_SYNTAX_PREFIX.into(),
            arg_name: DEFAULT_ARG_NAME.into(),
            opt_prefix: DEFAULT_OPT_PREFIX.into(),
            long_opt_prefix: DEFAULT_LONG_OPT_PREFIX.into(),
            long_opt_separator: DEFAULT_LONG_OPT_SEPARATOR.into(),
            sorted: true,
            show_deprecated: true,
        }
    }
}

impl HelpFormatter {
    /// Create a formatter with the default settings.
    pub fn new() -> Self {
        HelpFormatter::default()
    }

    /// Specify the number of characters per line.
    pub fn width(self, width: usize) -> Self {
        HelpFormatter { width, ..self }
    }

    /// Specify the padding to the left of each option.
    pub fn left_pad(self, left_pad: usize) -> Self {
        HelpFormatter { left_pad, ..self }
    }

    /// Specify the padding between an option and its description.
    pub fn desc_pad(self, desc_pad: usize) -> Self {
        HelpFormatter { desc_pad, ..self }
    }

    /// Specify the text shown before the usage line.
    pub fn syntax_prefix(self, prefix: &str) -> Self {
        HelpFormatter {
            syntax_prefix: prefix.into(),
            ..self
        }
    }

    /// Specify the name shown for values of options without an argument
    /// name.
    pub fn arg_name(self, arg_name: &str) -> Self {
        HelpFormatter {
            arg_name: arg_name.into(),
            ..self
        }
    }

    /// Specify the text between a long option and its value (for example
    /// `=` to show `--file=<arg>`).
    pub fn long_opt_separator(self, separator: &str) -> Self {
        HelpFormatter {
            long_opt_separator: separator.into(),
            ..self
        }
    }

    /// Show options in declaration order rather than sorted by key.
    pub fn unsorted(self) -> Self {
        HelpFormatter {
            sorted: false,
            ..self
        }
    }

    /// Specify whether deprecated options are marked as such.
    pub fn show_deprecated(self, show_deprecated: bool) -> Self {
        HelpFormatter {
            show_deprecated,
            ..self
        }
    }

    fn ordered<'o>(&self, mut opts: Vec<&'o Opt>) -> Vec<&'o Opt> {
        if self.sorted {
            opts.sort_by_key(|o| o.key().to_lowercase());
        }

        opts
    }

    fn append_option(&self, buf: &mut String, opt: &Opt, required: bool) {
        if !required {
            buf.push('[');
        }

        match opt.short() {
            Some(short) => {
                buf.push_str(&self.opt_prefix);
                buf.push_str(short);
            }
            None => {
                buf.push_str(&self.long_opt_prefix);
                buf.push_str(opt.key());
            }
        }

        let arg_name = opt.arg_name();

        if opt.has_arg() && arg_name != Some("") {
            let separator = match opt.short() {
                Some(_) => " ",
                None => self.long_opt_separator.as_str(),
            };

            buf.push_str(separator);
            buf.push('<');
            buf.push_str(arg_name.unwrap_or(&self.arg_name));
            buf.push('>');
        }

        if !required {
            buf.push(']');
        }
    }

    fn append_group(&self, buf: &mut String, group: &OptGroup) {
        if !group.is_required() {
            buf.push('[');
        }

        let members = self.ordered(group.options().iter().collect());

        for (i, opt) in members.iter().enumerate() {
            if i > 0 {
                buf.push_str(" | ");
            }

            // Requiredness is decided by the group.
            self.append_option(buf, opt, true);
        }

        if !group.is_required() {
            buf.push(']');
        }
    }

    /// Returns the usage line for `app`, listing every option.
    pub fn usage(&self, app: &str, options: &Options) -> String {
        let mut done = Vec::<usize>::new();
        let mut clauses = Vec::<String>::new();

        for opt in self.ordered(options.options()) {
            let mut clause = String::new();

            let group = options
                .group_index(opt.key())
                .and_then(|i| options.groups().get(i).map(|g| (i, g)));

            match group {
                Some((index, group)) => {
                    // Every member is shown with the first one found.
                    if done.contains(&index) {
                        continue;
                    }

                    done.push(index);
                    self.append_group(&mut clause, group);
                }
                None => self.append_option(&mut clause, opt, opt.is_required()),
            }

            clauses.push(clause);
        }

        let mut line = format!("{}{}", self.syntax_prefix, app);

        if !clauses.is_empty() {
            line.push(' ');
            line.push_str(&clauses.join(" "));
        }

        line
    }

    /// Returns the usage line, wrapped to the width.
    pub fn render_usage(&self, app: &str, options: &Options) -> String {
        let line = self.usage(app, options);

        let tab_stop = line.chars().position(|c| c == ' ').map_or(0, |p| p + 1);

        self.render_wrapped_block(tab_stop, &line)
    }

    /// Returns the table of options and their descriptions.
    pub fn render_options(&self, options: &Options) -> String {
        let lpad = " ".repeat(self.left_pad);
        let dpad = " ".repeat(self.desc_pad);

        let opts = self.ordered(options.options());

        let prefixes: Vec<String> = opts
            .iter()
            .map(|opt| {
                let mut buf = lpad.clone();

                match opt.short() {
                    Some(short) => {
                        buf.push_str(&self.opt_prefix);
                        buf.push_str(short);

                        if let Some(long) = opt.long() {
                            buf.push(',');
                            buf.push_str(&self.long_opt_prefix);
                            buf.push_str(long);
                        }
                    }
                    None => {
                        buf.push_str("   ");
                        buf.push_str(&self.long_opt_prefix);
                        buf.push_str(opt.key());
                    }
                }

                if opt.has_arg() {
                    match opt.arg_name() {
                        Some("") => buf.push(' '),
                        arg_name => {
                            let separator = if opt.has_long() {
                                self.long_opt_separator.as_str()
                            } else {
                                " "
                            };

                            buf.push_str(separator);
                            buf.push('<');
                            buf.push_str(arg_name.unwrap_or(&self.arg_name));
                            buf.push('>');
                        }
                    }
                }

                buf
            })
            .collect();

        let max = prefixes
            .iter()
            .map(|p| p.chars().count())
            .max()
            .unwrap_or(0);

        let tab_stop = max + self.desc_pad;

        let rows: Vec<String> = opts
            .iter()
            .zip(prefixes.iter())
            .map(|(opt, prefix)| {
                let len = prefix.chars().count();

                let mut row = format!("{}{}{}", prefix, " ".repeat(max - len), dpad);

                if self.show_deprecated && opt.is_deprecated() {
                    let desc = format!("{}{}", DEPRECATED_PREFIX, opt.description().unwrap_or(""));
                    row.push_str(desc.trim());
                } else if let Some(desc) = opt.description() {
                    row.push_str(desc);
                }

                self.render_wrapped_text(self.width, tab_stop, &row)
            })
            .collect();

        rows.join("\n")
    }

    /// Wrap `text` to `width`, indenting continuation lines by
    /// `tab_stop` spaces.
    pub fn render_wrapped_text(&self, width: usize, tab_stop: usize, text: &str) -> String {
        let mut out = String::new();

        let mut render: Vec<char> = text.chars().collect();

        let mut pos = match find_wrap_pos(&render, width, 0) {
            Some(pos) => pos,
            None => {
                out.push_str(text.trim_end());
                return out;
            }
        };

        out.push_str(&rtrim(&render[..pos]));
        out.push('\n');

        // A tab stop past the width would never make progress.
        let tab_stop = if tab_stop >= width { 1 } else { tab_stop };
        let padding = " ".repeat(tab_stop);

        loop {
            let rest: String = render[pos..].iter().collect();
            let next = format!("{}{}", padding, rest.trim());

            render = next.chars().collect();

            pos = match find_wrap_pos(&render, width, 0) {
                Some(pos) => pos,
                None => {
                    out.push_str(&next);
                    return out;
                }
            };

            if render.len() > width && pos + 1 == tab_stop {
                pos = width;
            }

            out.push_str(&rtrim(&render[..pos]));
            out.push('\n');
        }
    }

    /// Wrap each line of `text` separately.
    fn render_wrapped_block(&self, tab_stop: usize, text: &str) -> String {
        text.lines()
            .map(|line| self.render_wrapped_text(self.width, tab_stop, line))
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// Write the usage line for `app`.
    pub fn print_usage<W: Write>(&self, writer: &mut W, app: &str, options: &Options) -> io::Result<()> {
        writeln!(writer, "{}", self.render_usage(app, options))
    }

    /// Write a full help statement: the usage line (generated from the
    /// options if `auto_usage` is set, otherwise `syntax` as given), the
    /// header, the options table and the footer.
    pub fn print_help<W: Write>(
        &self,
        writer: &mut W,
        syntax: &str,
        header: &str,
        options: &Options,
        footer: &str,
        auto_usage: bool,
    ) -> io::Result<()> {
        if syntax.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "command-line syntax not provided",
            ));
        }

        if auto_usage {
            self.print_usage(writer, syntax, options)?;
        } else {
            let tab_stop = syntax.chars().position(|c| c == ' ').map_or(0, |p| p + 1)
                + self.syntax_prefix.chars().count();
            let line = format!("{}{}", self.syntax_prefix, syntax);

            writeln!(writer, "{}", self.render_wrapped_block(tab_stop, &line))?;
        }

        if !header.is_empty() {
            writeln!(writer, "{}", self.render_wrapped_block(0, header))?;
        }

        writeln!(writer, "{}", self.render_options(options))?;

        if !footer.is_empty() {
            writeln!(writer, "{}", self.render_wrapped_block(0, footer))?;
        }

        Ok(())
    }
}

fn rtrim(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim_end().to_string()
}

/// Returns the position at which to break `text` so that the line starting
/// at `start` fits in `width`, or `None` if it already fits.
fn find_wrap_pos(text: &[char], width: usize, start: usize) -> Option<usize> {
    let find = |c: char| {
        text[start..]
            .iter()
            .position(|&x| x == c)
            .map(|p| p + start)
    };

    if let Some(pos) = find('\n').filter(|p| *p <= width) {
        return Some(pos + 1);
    }

    if let Some(pos) = find('\t').filter(|p| *p <= width) {
        return Some(pos + 1);
    }

    if start + width >= text.len() {
        return None;
    }

    let space = (start..=start + width)
        .rev()
        .find(|&p| matches!(text[p], ' ' | '\n' | '\r'));

    if let Some(pos) = space.filter(|p| *p > start) {
        return Some(pos);
    }

    let pos = start + width;

    if pos == text.len() {
        None
    } else {
        Some(pos)
    }
}
