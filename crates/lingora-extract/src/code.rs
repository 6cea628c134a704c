//! Scanner for translation calls in source code.
//!
//! Recognizes calls to the configured translation function, e.g.
//! `__("Message")`, with the context either as a `context="..."` keyword
//! argument or as a string in third-or-later position after skipped
//! format-placeholder arguments: `__("Message", [args], "context")`.
//! Implemented as a small cursor machine rather than a regex so nested
//! and escaped quoting inside the message cannot derail matching.

use std::path::Path;

use lingora_core::{RawMessage, Result};

use crate::Extractor;

pub struct CodeExtractor {
    func: &'static str,
}

impl CodeExtractor {
    /// `func` is the translation function name, e.g. `"_"` or `"__"`.
    pub fn new(func: &'static str) -> Self {
        Self { func }
    }
}

impl Extractor for CodeExtractor {
    fn name(&self) -> &'static str {
        "code"
    }

    fn extract(&self, text: &str, origin: &Path) -> Result<Vec<RawMessage>> {
        let origin = origin.to_string_lossy();
        let line_starts = line_starts_of(text);
        let mut out = Vec::new();
        let mut cursor = Cursor::new(text);

        while let Some(call_start) = cursor.find_call(self.func) {
            let line = byte_pos_to_line(call_start, &line_starts);
            if let Some((message, context)) = cursor.parse_call() {
                if !message.is_empty() {
                    let mut msg = RawMessage::new(origin.as_ref(), message).with_line(line);
                    if let Some(ctx) = context {
                        msg.context = Some(ctx);
                    }
                    out.push(msg);
                }
            }
        }
        Ok(out)
    }
}

fn line_starts_of(text: &str) -> Vec<usize> {
    let mut starts = Vec::with_capacity(256);
    starts.push(0);
    for (i, b) in text.as_bytes().iter().enumerate() {
        if *b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn byte_pos_to_line(pos: usize, starts: &[usize]) -> u32 {
    let idx = starts.partition_point(|&s| s <= pos);
    (idx as u32).max(1)
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Advance to just past the opening paren of the next `func(` call,
    /// returning the byte position of the call. Both ends of the
    /// function name must be identifier boundaries, so `some_(` never
    /// matches `_` and `___(` never matches `__`.
    fn find_call(&mut self, func: &str) -> Option<usize> {
        let bytes = self.bytes();
        loop {
            let rel = self.text[self.pos..].find(func)?;
            let start = self.pos + rel;
            let end = start + func.len();
            self.pos = start + 1;

            if start > 0 && is_ident(bytes[start - 1]) {
                continue;
            }
            if end < bytes.len() && is_ident(bytes[end]) {
                continue;
            }

            let mut probe = Cursor {
                text: self.text,
                pos: end,
            };
            probe.skip_ws();
            if probe.peek() == Some(b'(') {
                self.pos = probe.pos + 1;
                return Some(start);
            }
        }
    }

    /// Parse the argument list after the opening paren. Returns the
    /// message and optional context, or `None` when the call shape does
    /// not start with a string literal or never closes.
    fn parse_call(&mut self) -> Option<(String, Option<String>)> {
        self.skip_ws();
        let message = self.parse_string()?;
        let mut context: Option<String> = None;
        let mut arg_index = 1usize;

        loop {
            self.skip_ws();
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    return Some((message, context));
                }
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                    arg_index += 1;

                    if self.eat_context_keyword() {
                        self.skip_ws();
                        if let Some(ctx) = self.parse_string() {
                            context = Some(ctx);
                        } else if !self.skip_argument() {
                            return None;
                        }
                    } else if matches!(self.peek(), Some(b'"' | b'\'')) {
                        let value = self.parse_string()?;
                        // a second-position string is a format argument,
                        // not a context
                        if arg_index >= 3 {
                            context = Some(value);
                        }
                    } else if !self.skip_argument() {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    /// Consume `context =` if present, leaving the cursor at the value.
    fn eat_context_keyword(&mut self) -> bool {
        let bytes = self.bytes();
        let rest = &bytes[self.pos.min(bytes.len())..];
        if !rest.starts_with(b"context") {
            return false;
        }
        if rest.len() > 7 && is_ident(rest[7]) {
            return false;
        }
        let mut probe = Cursor {
            text: self.text,
            pos: self.pos + 7,
        };
        probe.skip_ws();
        // `=` but not `==`
        if probe.peek() != Some(b'=') || probe.bytes().get(probe.pos + 1) == Some(&b'=') {
            return false;
        }
        self.pos = probe.pos + 1;
        true
    }

    /// Parse a quoted string literal at the cursor, handling escape
    /// sequences and tripled quotes. Returns the unescaped content.
    fn parse_string(&mut self) -> Option<String> {
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return None,
        };
        let bytes = self.bytes();
        let triple = bytes.get(self.pos + 1) == Some(&quote) && bytes.get(self.pos + 2) == Some(&quote);
        self.pos += if triple { 3 } else { 1 };

        let mut value = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch == '\\' {
                match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, other)) => value.push(other),
                    None => return None,
                }
                continue;
            }
            if ch as u32 == quote as u32 {
                if !triple {
                    self.pos += offset + 1;
                    return Some(value);
                }
                let abs = self.pos + offset;
                if bytes.get(abs + 1) == Some(&quote) && bytes.get(abs + 2) == Some(&quote) {
                    self.pos = abs + 3;
                    return Some(value);
                }
            }
            value.push(ch);
        }
        None
    }

    /// Skip one balanced non-string argument, stopping before the `,` or
    /// `)` that ends it. Returns false when the input runs out first.
    fn skip_argument(&mut self) -> bool {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return false,
                Some(b',') | Some(b')') if depth == 0 => return true,
                Some(b'(') | Some(b'[') | Some(b'{') => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(b')') | Some(b']') | Some(b'}') => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                }
                Some(b'"' | b'\'') => {
                    if self.parse_string().is_none() {
                        return false;
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(func: &'static str, text: &str) -> Vec<(String, Option<String>, u32)> {
        CodeExtractor::new(func)
            .extract(text, Path::new("test.src"))
            .unwrap()
            .into_iter()
            .map(|m| (m.message, m.context, m.line.unwrap()))
            .collect()
    }

    #[test]
    fn finds_simple_calls_with_line_numbers() {
        let src = "let a = 1;\nlet b = __(\"Hello\");\nlet c = __('World');\n";
        assert_eq!(
            extract("__", src),
            vec![
                ("Hello".into(), None, 2),
                ("World".into(), None, 3),
            ]
        );
    }

    #[test]
    fn respects_identifier_boundaries() {
        assert!(extract("__", "custom__(\"No\")").is_empty());
        assert!(extract("_", "some__(\"No\")").is_empty());
        assert_eq!(extract("_", "x = _(\"Yes\")").len(), 1);
    }

    #[test]
    fn keyword_context() {
        assert_eq!(
            extract("_", r#"_("Open", context="verb")"#),
            vec![("Open".into(), Some("verb".into()), 1)]
        );
        // a comparison is not a keyword argument
        assert_eq!(
            extract("_", r#"_("Open", context == verb)"#),
            vec![("Open".into(), None, 1)]
        );
    }

    #[test]
    fn positional_context_after_format_args() {
        assert_eq!(
            extract("__", r#"__("{0} items", [count], "cart")"#),
            vec![("{0} items".into(), Some("cart".into()), 1)]
        );
        assert_eq!(
            extract("__", r#"__("Open", null, "verb")"#),
            vec![("Open".into(), Some("verb".into()), 1)]
        );
        // second-position strings are format replacements, not context
        assert_eq!(
            extract("__", r#"__("a", "b")"#),
            vec![("a".into(), None, 1)]
        );
    }

    #[test]
    fn tolerates_nested_and_escaped_quotes() {
        assert_eq!(
            extract("__", r#"__('He said "hi" to her')"#),
            vec![("He said \"hi\" to her".into(), None, 1)]
        );
        assert_eq!(
            extract("__", r#"__("Don\"t panic\n")"#),
            vec![("Don\"t panic\n".into(), None, 1)]
        );
    }

    #[test]
    fn triple_quoted_strings() {
        let src = r#"_("""He said "hi" and left""")"#;
        assert_eq!(
            extract("_", src),
            vec![("He said \"hi\" and left".into(), None, 1)]
        );
    }

    #[test]
    fn multiline_call_with_trailing_comma() {
        let src = "__(\n    \"Spread\",\n)";
        assert_eq!(extract("__", src), vec![("Spread".into(), None, 1)]);
    }

    #[test]
    fn unterminated_call_is_dropped() {
        assert!(extract("__", r#"__("dangling"#).is_empty());
        assert!(extract("__", r#"__(variable)"#).is_empty());
    }

    #[test]
    fn empty_messages_are_skipped() {
        assert!(extract("__", r#"__("")"#).is_empty());
    }
}
