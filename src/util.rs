// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

const QUOTE: char = '"';

/// Remove one or two leading dashes.
pub(crate) fn strip_leading_hyphens(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix("--") {
        rest
    } else if let Some(rest) = s.strip_prefix('-') {
        rest
    } else {
        s
    }
}

/// Remove one layer of balanced double quotes, but only if the string
/// contains no other double quote.
pub(crate) fn strip_quotes(s: &str) -> &str {
    if s.len() > 1 && s.starts_with(QUOTE) && s.ends_with(QUOTE) {
        let inner = &s[1..s.len() - 1];

        if !inner.contains(QUOTE) {
            return inner;
        }
    }

    s
}

/// Byte offset of the end of the first `n` chars of `s`.
pub(crate) fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or_else(|| s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_hyphens() {
        let tests = &[
            ("", ""),
            ("-", ""),
            ("--", ""),
            ("---", "-"),
            ("-a", "a"),
            ("--all", "all"),
            ("a-b", "a-b"),
        ];

        for (i, (input, expected)) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, input);

            assert_eq!(strip_leading_hyphens(input), *expected, "{}", msg);
        }
    }

    #[test]
    fn test_strip_quotes() {
        let tests = &[
            ("", ""),
            ("\"", "\""),
            ("\"\"", ""),
            ("\"foo\"", "foo"),
            ("\"foo bar\"", "foo bar"),
            ("\"foo", "\"foo"),
            ("foo\"", "foo\""),
            ("\"foo\"bar\"", "\"foo\"bar\""),
            ("foo", "foo"),
        ];

        for (i, (input, expected)) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, input);

            assert_eq!(strip_quotes(input), *expected, "{}", msg);
        }
    }

    #[test]
    fn test_char_offset() {
        assert_eq!(char_offset("abc", 0), 0);
        assert_eq!(char_offset("abc", 2), 2);
        assert_eq!(char_offset("abc", 3), 3);
        assert_eq!(char_offset("abc", 9), 3);
        assert_eq!(char_offset("人a", 1), 3);
    }
}
