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

//! Line-oriented parser for GNU Gettext PO files.
//!
//! The parser is a small state machine: directives such as `msgid`
//! and `msgstr` set a field of the message being built and make that
//! field the target of the following continuation lines. A blank line
//! completes the message.

use crate::error::{Error, Result};
use crate::escape::unescape;
use log::{debug, warn};
use regex::Regex;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// A message parsed from a PO file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// The `msgctxt` of the message, if any.
    pub context: Option<String>,
    /// The untranslated source string.
    pub id: String,
    /// The `msgid_plural` of the message, if any.
    pub id_plural: Option<String>,
    /// The translations, keyed by plural index. A singular `msgstr`
    /// is stored at index 0.
    pub translations: BTreeMap<usize, String>,
    /// Flags from `#,` comments, such as `fuzzy` or `c-format`.
    pub flags: BTreeSet<String>,
    /// The line of the `msgid` directive.
    pub line: usize,
}

impl Message {
    /// Returns true if the message is marked as `fuzzy`.
    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains("fuzzy")
    }

    /// Returns true if this is the catalog header, the message with
    /// an empty `msgid` and no context.
    pub fn is_header(&self) -> bool {
        self.id.is_empty() && self.context.is_none()
    }

    /// Returns true if every translation slot up to the highest plural
    /// index holds a non-empty string.
    pub fn is_translated(&self) -> bool {
        let Some(&max_index) = self.translations.keys().next_back() else {
            return false;
        };
        (0..=max_index).all(|idx| {
            self.translations
                .get(&idx)
                .is_some_and(|msgstr| !msgstr.is_empty())
        })
    }
}

/// The field which absorbs the next continuation line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Target {
    #[default]
    None,
    Context,
    Id,
    IdPlural,
    Translation(usize),
}

/// Incremental PO parser.
///
/// Feed the lines of a PO file to [`Parser::parse_line`] and call
/// [`Parser::finish`] to get the completed messages.
#[derive(Debug, Default)]
pub struct Parser {
    context: Option<String>,
    id: Option<String>,
    id_plural: Option<String>,
    translations: BTreeMap<usize, String>,
    flags: BTreeSet<String>,
    id_line: usize,
    target: Target,
    messages: Vec<Message>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single line without its line terminator.
    ///
    /// The `lineno` is only used for error messages and logging.
    pub fn parse_line(&mut self, lineno: usize, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            self.flush();
        } else if let Some(flags) = line.strip_prefix("#,") {
            self.flags.extend(
                flags
                    .split(',')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(String::from),
            );
        } else if line.starts_with('#') {
            // Translator, extracted and reference comments as well as
            // obsolete messages are not part of the compiled catalog.
        } else if let Some(rest) = line.strip_prefix("msgctxt") {
            self.context = Some(parse_quoted(lineno, rest)?);
            self.target = Target::Context;
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            self.id_plural = Some(parse_quoted(lineno, rest)?);
            self.target = Target::IdPlural;
        } else if let Some(rest) = line.strip_prefix("msgid") {
            self.id = Some(parse_quoted(lineno, rest)?);
            self.id_line = lineno;
            self.target = Target::Id;
        } else if let Some(rest) = line.strip_prefix("msgstr[") {
            let (index, rest) = parse_plural_index(lineno, line, rest)?;
            self.translations.insert(index, parse_quoted(lineno, rest)?);
            self.target = Target::Translation(index);
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            self.translations.insert(0, parse_quoted(lineno, rest)?);
            self.target = Target::Translation(0);
        } else if line.trim_start().starts_with('"') {
            let value = parse_quoted(lineno, line)?;
            self.append(lineno, &value);
        } else {
            debug!("Ignoring unknown line {lineno}: {line:?}");
        }
        Ok(())
    }

    /// Complete the last message and return all messages in the order
    /// they appeared.
    pub fn finish(mut self) -> Vec<Message> {
        self.flush();
        self.messages
    }

    fn append(&mut self, lineno: usize, value: &str) {
        let field = match self.target {
            Target::None => {
                warn!("Ignoring continuation line {lineno} outside of a message");
                return;
            }
            Target::Context => self.context.get_or_insert_with(String::new),
            Target::Id => self.id.get_or_insert_with(String::new),
            Target::IdPlural => self.id_plural.get_or_insert_with(String::new),
            Target::Translation(idx) => self.translations.entry(idx).or_default(),
        };
        field.push_str(value);
    }

    /// Move the fields collected so far into a completed message and
    /// reset the state.
    ///
    /// Fields without a `msgid` are dropped. This happens for comment
    /// blocks and repeated blank lines.
    fn flush(&mut self) {
        let context = self.context.take();
        let id_plural = self.id_plural.take();
        let translations = std::mem::take(&mut self.translations);
        let flags = std::mem::take(&mut self.flags);
        self.target = Target::None;

        if let Some(id) = self.id.take() {
            self.messages.push(Message {
                context,
                id,
                id_plural,
                translations,
                flags,
                line: self.id_line,
            });
        }
    }
}

/// Parse PO text into messages.
///
/// # Examples
///
/// ```
/// use gettext_msgfmt::po::parse;
///
/// let messages = parse("msgid \"Hello\"\nmsgstr \"Bonjour\"\n").unwrap();
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].id, "Hello");
/// assert_eq!(messages[0].translations[&0], "Bonjour");
/// ```
pub fn parse(text: &str) -> Result<Vec<Message>> {
    let mut parser = Parser::new();
    for (idx, line) in split_lines(text).enumerate() {
        parser.parse_line(idx + 1, line)?;
    }
    let messages = parser.finish();
    debug!("Parsed {} messages", messages.len());
    Ok(messages)
}

/// Split text into lines ending in `\n`, `\r\n` or a lone `\r`.
///
/// The terminators are not part of the lines. A terminator at the end
/// of the text does not start another line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("well-formed regex"));
    let body = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text);
    let count = if text.is_empty() { 0 } else { usize::MAX };
    re.split(body).take(count)
}

/// Decode a string enclosed in double quotes.
fn parse_quoted(lineno: usize, text: &str) -> Result<String> {
    let text = text.trim();
    let interior = match text.strip_prefix('"') {
        Some(rest) if text.ends_with('"') => rest.strip_suffix('"').unwrap_or(rest),
        _ => {
            return Err(Error::Quoting {
                line: lineno,
                text: text.to_string(),
            })
        }
    };
    unescape(interior)
        .map(Cow::into_owned)
        .map_err(|source| Error::Escape {
            line: lineno,
            source,
        })
}

/// Split `rest` (the part of `line` after `msgstr[`) into the plural
/// index and the remainder after the closing bracket.
fn parse_plural_index<'a>(lineno: usize, line: &str, rest: &'a str) -> Result<(usize, &'a str)> {
    let invalid = || Error::PluralIndex {
        line: lineno,
        text: line.to_string(),
    };
    let (index, rest) = rest.split_once(']').ok_or_else(invalid)?;
    let index = index.trim().parse().map_err(|_| invalid())?;
    Ok((index, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn translations(msgstrs: &[(usize, &str)]) -> BTreeMap<usize, String> {
        msgstrs
            .iter()
            .map(|&(idx, msgstr)| (idx, String::from(msgstr)))
            .collect()
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("\n\n   \n").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_singular() {
        assert_eq!(
            parse("msgid \"Hello\"\nmsgstr \"Bonjour\"\n").unwrap(),
            vec![Message {
                id: String::from("Hello"),
                translations: translations(&[(0, "Bonjour")]),
                line: 1,
                ..Message::default()
            }]
        );
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let messages = parse("msgid \"foo\"\nmsgstr \"FOO\"").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].translations, translations(&[(0, "FOO")]));
    }

    #[test]
    fn test_parse_crlf() {
        let messages = parse("msgid \"foo\"\r\nmsgstr \"FOO\"\r\n\r\nmsgid \"bar\"\r\n").unwrap();
        assert_eq!(
            messages.iter().map(|msg| msg.id.as_str()).collect::<Vec<_>>(),
            vec!["foo", "bar"]
        );
    }

    #[test]
    fn test_parse_lone_carriage_returns() {
        let messages = parse("msgid \"a\"\rmsgstr \"A\"\r\rmsgid \"b\"\rmsgstr \"B\"\r").unwrap();
        assert_eq!(
            messages
                .iter()
                .map(|msg| (msg.id.as_str(), msg.translations[&0].as_str(), msg.line))
                .collect::<Vec<_>>(),
            vec![("a", "A", 1), ("b", "B", 4)]
        );
    }

    #[test]
    fn test_parse_mixed_line_endings() {
        let messages = parse("msgid \"a\"\r\nmsgstr \"A\"\r\n\nmsgid \"b\"\rmsgstr \"B\"").unwrap();
        assert_eq!(
            messages.iter().map(|msg| msg.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(messages[1].line, 4);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("a\n").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(
            split_lines("a\r\rb\r\nc\nd").collect::<Vec<_>>(),
            vec!["a", "", "b", "c", "d"]
        );
        assert_eq!(split_lines("\n").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_parse_multiple_messages() {
        let messages = parse(
            "msgid \"foo\"\n\
             msgstr \"FOO\"\n\
             \n\
             msgid \"bar\"\n\
             msgstr \"BAR\"\n",
        )
        .unwrap();
        assert_eq!(
            messages
                .iter()
                .map(|msg| (msg.id.as_str(), msg.translations[&0].as_str(), msg.line))
                .collect::<Vec<_>>(),
            vec![("foo", "FOO", 1), ("bar", "BAR", 4)]
        );
    }

    #[test]
    fn test_parse_header_comment_block_is_dropped() {
        let messages = parse(
            "# SOME DESCRIPTIVE TITLE.\n\
             # Copyright (C) YEAR\n\
             \n\
             \n\
             msgid \"foo\"\n\
             msgstr \"FOO\"\n",
        )
        .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "foo");
    }

    #[test]
    fn test_parse_metadata_header() {
        let messages = parse(
            "msgid \"\"\n\
             msgstr \"\"\n\
             \"Language: fr\\n\"\n\
             \"Content-Type: text/plain; charset=UTF-8\\n\"\n",
        )
        .unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_header());
        assert_eq!(
            messages[0].translations[&0],
            "Language: fr\nContent-Type: text/plain; charset=UTF-8\n"
        );
    }

    #[test]
    fn test_parse_continuation_lines() {
        let messages = parse(
            "msgid \"\"\n\
             \"Part1\"\n\
             \"Part2\"\n\
             msgstr \"\"\n\
             \"Teil1\"\n\
             \"Teil2\"\n",
        )
        .unwrap();
        assert_eq!(messages[0].id, "Part1Part2");
        assert_eq!(messages[0].translations, translations(&[(0, "Teil1Teil2")]));
    }

    #[test]
    fn test_parse_indented_continuation_line() {
        let messages = parse("msgid \"foo\"\n   \"bar\"  \n").unwrap();
        assert_eq!(messages[0].id, "foobar");
    }

    #[test]
    fn test_parse_continuation_without_target_is_ignored() {
        let messages = parse(
            "\"stray\"\n\
             msgid \"foo\"\n",
        )
        .unwrap();
        assert_eq!(messages[0].id, "foo");
    }

    #[test]
    fn test_parse_context() {
        let messages = parse(
            "msgctxt \"me\"\n\
             \"nu\"\n\
             msgid \"Open\"\n\
             msgstr \"Ouvrir\"\n",
        )
        .unwrap();
        assert_eq!(messages[0].context.as_deref(), Some("menu"));
        assert_eq!(messages[0].id, "Open");
        assert_eq!(messages[0].line, 3);
    }

    #[test]
    fn test_parse_plural() {
        let messages = parse(
            "msgid \"apple\"\n\
             msgid_plural \"apples\"\n\
             msgstr[0] \"\"\n\
             msgstr[1] \"pom\"\n\
             \"mes\"\n",
        )
        .unwrap();
        assert_eq!(
            messages,
            vec![Message {
                id: String::from("apple"),
                id_plural: Some(String::from("apples")),
                translations: translations(&[(0, ""), (1, "pommes")]),
                line: 1,
                ..Message::default()
            }]
        );
    }

    #[test]
    fn test_parse_plural_index_with_spaces() {
        let messages = parse("msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[ 2 ]\"c\"\n").unwrap();
        assert_eq!(messages[0].translations, translations(&[(2, "c")]));
    }

    #[test]
    fn test_parse_flags() {
        let messages = parse(
            "#, fuzzy, c-format\n\
             #,python-format,,\n\
             msgid \"foo\"\n\
             msgstr \"FOO\"\n",
        )
        .unwrap();
        assert_eq!(
            messages[0].flags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["c-format", "fuzzy", "python-format"]
        );
        assert!(messages[0].is_fuzzy());
    }

    #[test]
    fn test_parse_flags_are_case_sensitive() {
        let messages = parse("#, Fuzzy\nmsgid \"foo\"\n").unwrap();
        assert!(!messages[0].is_fuzzy());
    }

    #[test]
    fn test_parse_flags_do_not_change_target() {
        let messages = parse(
            "msgid \"foo\"\n\
             #, fuzzy\n\
             \"bar\"\n",
        )
        .unwrap();
        assert_eq!(messages[0].id, "foobar");
        assert!(messages[0].is_fuzzy());
    }

    #[test]
    fn test_parse_comments_are_ignored() {
        let messages = parse(
            "# translator comment\n\
             #. extracted comment\n\
             #: src/main.rs:10\n\
             #~ msgid \"obsolete\"\n\
             msgid \"foo\"\n",
        )
        .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "foo");
        assert!(messages[0].flags.is_empty());
    }

    #[test]
    fn test_parse_flags_without_msgid_are_dropped() {
        let messages = parse(
            "#, fuzzy\n\
             \n\
             msgid \"foo\"\n",
        )
        .unwrap();
        assert!(!messages[0].is_fuzzy());
    }

    #[test]
    fn test_parse_msgstr_without_msgid_is_dropped() {
        let messages = parse("msgstr \"orphan\"\n\nmsgid \"foo\"\n").unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].translations.is_empty());
    }

    #[test]
    fn test_parse_escapes() {
        let messages = parse(r#"msgid "Tab\tNewline\n""#).unwrap();
        assert_eq!(messages[0].id, "Tab\tNewline\n");
    }

    #[test]
    fn test_parse_lone_quote_is_empty_string() {
        let messages = parse("msgid \"\nmsgstr \"x\"\n").unwrap();
        assert_eq!(messages[0].id, "");
    }

    #[test]
    fn test_parse_missing_quotes() {
        let err = parse("msgid Hello\nmsgstr \"Bonjour\"\n").unwrap_err();
        assert!(matches!(err, Error::Quoting { line: 1, .. }), "{err:?}");
        assert_eq!(err.to_string(), "line 1: invalid PO string: \"Hello\"");
    }

    #[test]
    fn test_parse_unterminated_string() {
        let err = parse("msgid \"foo\"\nmsgstr \"bar\n").unwrap_err();
        assert!(matches!(err, Error::Quoting { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_malformed_continuation_line() {
        let err = parse("msgid \"foo\"\n\"bar\n").unwrap_err();
        assert!(matches!(err, Error::Quoting { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_malformed_continuation_line_without_target() {
        let err = parse("\"bar\n").unwrap_err();
        assert!(matches!(err, Error::Quoting { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_invalid_plural_index() {
        for line in ["msgstr[x] \"a\"", "msgstr[-1] \"a\"", "msgstr[] \"a\"", "msgstr[1 \"a\""] {
            let err = parse(&format!("msgid \"a\"\n{line}\n")).unwrap_err();
            assert!(matches!(err, Error::PluralIndex { line: 2, .. }), "{err:?}");
        }
    }

    #[test]
    fn test_parser_state_machine() {
        let mut parser = Parser::new();
        parser.parse_line(1, "msgid \"foo\"").unwrap();
        parser.parse_line(2, "msgstr \"FOO\"").unwrap();
        parser.parse_line(3, "").unwrap();
        parser.parse_line(4, "\"ignored\"").unwrap();
        parser.parse_line(5, "msgid \"bar\"").unwrap();
        let messages = parser.finish();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].id, "bar");
        assert!(messages[1].translations.is_empty());
    }

    #[test]
    fn test_message_is_translated() {
        let mut message = Message {
            id: String::from("apple"),
            ..Message::default()
        };
        assert!(!message.is_translated());
        message.translations = translations(&[(0, "pomme"), (2, "pommes")]);
        assert!(!message.is_translated());
        message.translations = translations(&[(0, "pomme"), (1, "")]);
        assert!(!message.is_translated());
        message.translations = translations(&[(0, "pomme"), (1, "pommes")]);
        assert!(message.is_translated());
    }
}
