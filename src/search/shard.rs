//! Readers for Doxygen search shards.
//!
//! A shard is a JavaScript file such as `search/all_63.js`:
//!
//! ```text
//! var searchData=
//! [
//!   ['cli_2eh',['CLI.h',['../_c_l_i_8h.html',1,'']]],
//!   ...
//! ];
//! ```
//!
//! Each row is `[key, [label, occurrence...]]` and each occurrence is
//! `[anchor, flag, description]`. The literal is tokenized into a
//! `serde_json::Value` tree and then lifted into [`RawEntry`] rows; validation
//! of the rows themselves happens when the table is loaded.

use crate::error::{LoadError, Malformation};
use serde_json::{Number, Value};

use super::entry::{Occurrence, RawEntry};

/// Variable name the generator assigns the table to.
const TABLE_VARIABLE: &str = "searchData";

/// Deepest array nesting accepted. Real shards nest four levels.
const MAX_DEPTH: usize = 64;

/// Parses the JavaScript source of a search shard into raw rows.
///
/// The `var searchData=` prefix and the trailing `;` are optional, so a bare
/// array literal is accepted too.
pub fn parse_shard(source: &str) -> Result<Vec<RawEntry>, LoadError> {
    let mut reader = LiteralReader::new(source);
    reader.declaration()?;
    let value = reader.value()?;
    reader.finish()?;

    rows_from_value(value)
}

/// Parses the tagged-record JSON rendition of a table.
pub fn parse_json(source: &str) -> Result<Vec<RawEntry>, LoadError> {
    serde_json::from_str(source).map_err(|e| {
        LoadError::syntax(
            byte_offset(source, e.line(), e.column()),
            e.to_string(),
        )
    })
}

/// Splits a shard file name such as `all_63.js` into its category and the
/// first character it indexes.
///
/// Returns `None` for names that do not follow the `<category>_<hex>` scheme.
pub fn shard_name(file_name: &str) -> Option<(&str, char)> {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    let (category, code) = stem.rsplit_once('_')?;
    if category.is_empty() || code.is_empty() {
        return None;
    }
    let first = u32::from_str_radix(code, 16).ok().and_then(char::from_u32)?;
    Some((category, first))
}

/// Lifts the parsed literal into rows, checking only the structural layout.
fn rows_from_value(value: Value) -> Result<Vec<RawEntry>, LoadError> {
    let Value::Array(rows) = value else {
        return Err(LoadError::syntax(0, "expected an array of rows"));
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            row_from_value(row).map_err(|what| {
                LoadError::malformed(index, Malformation::UnexpectedShape(what))
            })
        })
        .collect()
}

fn row_from_value(row: Value) -> Result<RawEntry, &'static str> {
    let Value::Array(fields) = row else {
        return Err("row is not an array");
    };
    if fields.len() > 2 {
        return Err("row has trailing fields");
    }
    let mut fields = fields.into_iter();

    let key = match fields.next() {
        None => None,
        Some(Value::String(key)) => Some(key),
        Some(_) => return Err("key is not a string"),
    };

    let mut raw = RawEntry {
        key,
        label: None,
        occurrences: Vec::new(),
    };

    let body = match fields.next() {
        None => return Ok(raw),
        Some(Value::Array(body)) => body,
        Some(_) => return Err("row body is not an array"),
    };
    let mut body = body.into_iter();

    raw.label = match body.next() {
        None => None,
        Some(Value::String(label)) => Some(label),
        Some(_) => return Err("label is not a string"),
    };

    for occurrence in body {
        raw.occurrences.push(occurrence_from_value(occurrence)?);
    }

    Ok(raw)
}

fn occurrence_from_value(value: Value) -> Result<Occurrence, &'static str> {
    let Value::Array(parts) = value else {
        return Err("occurrence is not an array");
    };
    if parts.len() > 3 {
        return Err("occurrence has trailing fields");
    }
    let mut parts = parts.into_iter();

    let anchor = match parts.next() {
        None => String::new(),
        Some(Value::String(anchor)) => anchor,
        Some(_) => return Err("anchor is not a string"),
    };
    let open_in_parent = match parts.next() {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => return Err("link flag is not a number"),
    };
    let description = match parts.next() {
        None => String::new(),
        Some(Value::String(description)) => description,
        Some(_) => return Err("description is not a string"),
    };

    Ok(Occurrence {
        anchor,
        description,
        open_in_parent,
    })
}

/// Converts serde_json's 1-based line/column into a byte offset.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Reader for the subset of JavaScript literals a shard uses: nested arrays,
/// quoted strings, numbers, and `true`/`false`/`null`.
struct LiteralReader<'a> {
    source: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralReader<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> LoadError {
        LoadError::syntax(self.pos, message)
    }

    /// Skips a leading `var searchData =` (or `searchData =`) if present.
    ///
    /// Only the text before the literal is considered, so a `searchData`
    /// inside a string is never mistaken for the declaration.
    fn declaration(&mut self) -> Result<(), LoadError> {
        self.skip_whitespace();
        if let Some(after) = self.rest().strip_prefix("var")
            && after.starts_with(char::is_whitespace)
        {
            self.pos += "var".len();
            self.skip_whitespace();
        }

        if !self.rest().starts_with(TABLE_VARIABLE) {
            return Ok(());
        }
        self.pos += TABLE_VARIABLE.len();
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Err(self.error(format!("expected '=' after {}", TABLE_VARIABLE)));
        }
        self.bump();
        Ok(())
    }

    fn value(&mut self) -> Result<Value, LoadError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.array(),
            Some(quote @ ('\'' | '"')) => self.string(quote).map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn array(&mut self) -> Result<Value, LoadError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(format!("arrays nested deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let items = self.array_items();
        self.depth -= 1;
        items
    }

    fn array_items(&mut self) -> Result<Value, LoadError> {
        self.bump();
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }

            items.push(self.value()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some(']') => return Ok(Value::Array(items)),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return Err(self.error(format!("expected ',' or ']', found '{}'", c)));
                }
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LoadError> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(LoadError::syntax(start, "unterminated string"));
                }
                Some(c) if c == quote => return Ok(text),
                Some('\\') => self.escape(&mut text)?,
                Some(c) => text.push(c),
            }
        }
    }

    fn escape(&mut self, text: &mut String) -> Result<(), LoadError> {
        let escape_at = self.pos - 1;
        let c = match self.bump() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            Some('0') => '\0',
            // Line continuation
            Some('\n') => return Ok(()),
            Some('x') => self.hex_escape(2, escape_at)?,
            Some('u') => self.hex_escape(4, escape_at)?,
            Some(other) => other,
            None => return Err(LoadError::syntax(escape_at, "unterminated escape")),
        };
        text.push(c);
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, escape_at: usize) -> Result<char, LoadError> {
        let hex = self
            .source
            .get(self.pos..self.pos + digits)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| LoadError::syntax(escape_at, "invalid hex escape"))?;
        self.pos += digits;
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| LoadError::syntax(escape_at, "escape is not a valid character"))
    }

    fn number(&mut self) -> Result<Value, LoadError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        let literal = &self.source[start..self.pos];

        if let Ok(n) = literal.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LoadError::syntax(start, format!("invalid number '{}'", literal)))
    }

    fn word(&mut self) -> Result<Value, LoadError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.bump();
        }
        match &self.source[start..self.pos] {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            other => Err(LoadError::syntax(
                start,
                format!("unexpected identifier '{}'", other),
            )),
        }
    }

    /// Accepts an optional `;` and trailing whitespace, nothing else.
    fn finish(&mut self) -> Result<(), LoadError> {
        self.skip_whitespace();
        if self.peek() == Some(';') {
            self.bump();
            self.skip_whitespace();
        }
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected trailing character '{}'", c))),
        }
    }
}
