// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decoding of backslash escapes in PO string literals.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use thiserror::Error;

/// A numeric escape sequence whose body does not name a character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid escape sequence \\{sequence}")]
pub struct EscapeError {
    /// The escape body without the leading backslash.
    pub sequence: String,
}

fn escape_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r#"(?x)
              \\
              ( [ntr\\"]          # single character escapes
              | [0-7]{1,3}        # octal code point
              | x[0-9a-fA-F]{2}   # hexadecimal code point
              )
        "#;
        Regex::new(pattern).expect("well-formed regex")
    })
}

/// Resolve the backslash escapes in the interior of a quoted string.
///
/// Recognized escapes are `\n`, `\t`, `\r`, `\\`, `\"`, one to three
/// octal digits and `\x` followed by exactly two hexadecimal digits.
/// Any other backslash sequence is kept exactly as written.
///
/// # Examples
///
/// ```
/// use gettext_msgfmt::escape::unescape;
///
/// assert_eq!(unescape(r"Tab\tNewline\n").unwrap(), "Tab\tNewline\n");
/// assert_eq!(unescape(r"\x41\102").unwrap(), "AB");
/// assert_eq!(unescape(r"C:\path").unwrap(), r"C:\path");
/// ```
pub fn unescape(value: &str) -> Result<Cow<'_, str>, EscapeError> {
    if !value.contains('\\') {
        return Ok(Cow::Borrowed(value));
    }

    let mut result = String::with_capacity(value.len());
    let mut last_end = 0;
    for escape in escape_regex().find_iter(value) {
        result.push_str(&value[last_end..escape.start()]);
        // Skip the backslash.
        result.push(resolve(&escape.as_str()[1..])?);
        last_end = escape.end();
    }
    result.push_str(&value[last_end..]);
    Ok(Cow::Owned(result))
}

fn resolve(body: &str) -> Result<char, EscapeError> {
    let (digits, radix) = match body {
        "n" => return Ok('\n'),
        "t" => return Ok('\t'),
        "r" => return Ok('\r'),
        "\\" => return Ok('\\'),
        "\"" => return Ok('"'),
        _ => match body.strip_prefix('x') {
            Some(hex) => (hex, 16),
            None => (body, 8),
        },
    };
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| EscapeError {
            sequence: body.to_string(),
        })
}
