// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use url::Url;

use crate::error::BoxError;

/// Format accepted by [Converter::date()], for example
/// `Thu Jun 06 17:48:57 EDT 2002`. The zone name is skipped.
pub const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

type ConvertFn = dyn Fn(&str) -> Result<Box<dyn Any + Send + Sync>, BoxError> + Send + Sync;

/// A number produced by [Converter::number()].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Text without a decimal point.
    Integer(i64),
    /// Text with a decimal point.
    Float(f64),
}

impl Number {
    /// Returns the number as a float, whatever its form.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Converts an option value from a string into a typed value.
///
/// Converters are only run when a typed accessor such as
/// [CommandLine::parsed_value()](crate::CommandLine::parsed_value) is called.
#[derive(Clone)]
pub struct Converter {
    name: &'static str,
    func: Arc<ConvertFn>,
}

impl Converter {
    /// Create a converter from a fallible function.
    ///
    /// The `name` is only used in diagnostics.
    pub fn new<T, E, F>(name: &'static str, func: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let func = move |s: &str| -> Result<Box<dyn Any + Send + Sync>, BoxError> {
            match func(s) {
                Ok(value) => Ok(Box::new(value) as Box<dyn Any + Send + Sync>),
                Err(e) => Err(e.into()),
            }
        };

        Converter {
            name,
            func: Arc::new(func),
        }
    }

    /// Pass-through converter producing a [String].
    pub fn string() -> Self {
        Converter::new("string", |s| Ok::<String, Infallible>(s.to_string()))
    }

    /// Produces a [Number]: a float if the text contains a `.`, otherwise
    /// an integer.
    pub fn number() -> Self {
        Converter::new("number", |s| -> Result<Number, BoxError> {
            if s.contains('.') {
                Ok(Number::Float(s.parse::<f64>()?))
            } else {
                Ok(Number::Integer(s.parse::<i64>()?))
            }
        })
    }

    /// Produces a [bool] from `true` or `false` in any case.
    pub fn boolean() -> Self {
        Converter::new("boolean", |s| s.to_ascii_lowercase().parse::<bool>())
    }

    /// Produces a [PathBuf]. Never fails.
    pub fn path() -> Self {
        Converter::new("path", |s| Ok::<PathBuf, Infallible>(PathBuf::from(s)))
    }

    /// Opens the named file for reading, producing a [File].
    pub fn existing_file() -> Self {
        Converter::new("existing file", |s| File::open(s))
    }

    /// Produces a [Url].
    pub fn url() -> Self {
        Converter::new("url", |s| Url::parse(s))
    }

    /// Produces a [NaiveDateTime] from text in [DATE_FORMAT].
    pub fn date() -> Self {
        Converter::new("date", |s| NaiveDateTime::parse_from_str(s, DATE_FORMAT))
    }

    /// Returns the converter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the converter.
    pub fn convert(&self, value: &str) -> Result<Box<dyn Any + Send + Sync>, BoxError> {
        (self.func)(value)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::string()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Converter({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Datelike, Timelike};

    fn convert<T: Any>(converter: &Converter, value: &str) -> Result<T, String> {
        converter
            .convert(value)
            .map_err(|e| e.to_string())
            .map(|v| *v.downcast::<T>().unwrap())
    }

    #[test]
    fn test_number() {
        #[derive(Debug)]
        struct TestData {
            value: &'static str,
            result: Option<Number>,
        }

        let tests = &[
            TestData {
                value: "1",
                result: Some(Number::Integer(1)),
            },
            TestData {
                value: "-15",
                result: Some(Number::Integer(-15)),
            },
            TestData {
                value: "1.5",
                result: Some(Number::Float(1.5)),
            },
            TestData {
                value: "-0.25",
                result: Some(Number::Float(-0.25)),
            },
            TestData {
                value: "abc",
                result: None,
            },
            TestData {
                value: "1.2.3",
                result: None,
            },
            TestData {
                value: "",
                result: None,
            },
        ];

        let converter = Converter::number();

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = convert::<Number>(&converter, d.value).ok();

            assert_eq!(result, d.result, "{}", msg);
        }
    }

    #[test]
    fn test_number_as_f64() {
        assert_eq!(Number::Integer(3).as_f64(), 3.0);
        assert_eq!(Number::Float(2.5).as_f64(), 2.5);
        assert_eq!(Number::Integer(-7).to_string(), "-7");
    }

    #[test]
    fn test_string_and_path() {
        let s = convert::<String>(&Converter::string(), "hello world").unwrap();
        assert_eq!(s, "hello world");

        let p = convert::<PathBuf>(&Converter::path(), "/tmp/foo.txt").unwrap();
        assert_eq!(p, PathBuf::from("/tmp/foo.txt"));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(convert::<bool>(&Converter::boolean(), "TRUE"), Ok(true));
        assert_eq!(convert::<bool>(&Converter::boolean(), "false"), Ok(false));
        assert!(convert::<bool>(&Converter::boolean(), "yes").is_err());
    }

    #[test]
    fn test_url() {
        let url = convert::<Url>(&Converter::url(), "https://example.com/a?b=c").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/a");

        assert!(convert::<Url>(&Converter::url(), "not a url").is_err());
    }

    #[test]
    fn test_date() {
        let date =
            convert::<NaiveDateTime>(&Converter::date(), "Thu Jun 06 17:48:57 EDT 2002").unwrap();

        assert_eq!(date.year(), 2002);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 6);
        assert_eq!(date.hour(), 17);
        assert_eq!(date.second(), 57);

        assert!(convert::<NaiveDateTime>(&Converter::date(), "2002-06-06").is_err());
    }

    #[test]
    fn test_existing_file() {
        assert!(convert::<File>(&Converter::existing_file(), "/this/file/does/not/exist").is_err());
    }

    #[test]
    fn test_custom_and_debug() {
        let converter = Converter::new("even", |s| -> Result<u32, BoxError> {
            let n = s.parse::<u32>()?;

            if n % 2 != 0 {
                return Err(format!("{} is odd", n).into());
            }

            Ok(n)
        });

        assert_eq!(convert::<u32>(&converter, "4"), Ok(4));
        assert_eq!(convert::<u32>(&converter, "3"), Err("3 is odd".to_string()));
        assert_eq!(format!("{:?}", converter), "Converter(even)");
        assert_eq!(Converter::default().name(), "string");
    }
}
