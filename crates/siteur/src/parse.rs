//! Reader for the station-table literal produced by `export`.
//!
//! Accepts the subset of object-literal syntax the exporter writes:
//! single- or double-quoted strings, numbers, `true`/`false`, arrays,
//! trailing commas and `//` comments. The table is either a bare array
//! or the array of an `export const STATIONS: Station[] =` declaration,
//! possibly surrounded by other declarations.

use crate::line::LineId;
use crate::station::{LatLng, Station};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {found:?} at byte {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("invalid number {text:?} at byte {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("unknown field `{field}` at byte {offset}")]
    UnknownField { field: String, offset: usize },
    #[error("field `{field}` at byte {offset} has the wrong type")]
    WrongType { field: &'static str, offset: usize },
    #[error("station entry at byte {offset} is missing `{field}`")]
    MissingField { field: &'static str, offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<Value>),
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.text[self.pos..];
            if rest.starts_with("//") {
                let end = rest.find('\n').unwrap_or(rest.len());
                self.pos += end;
            } else if let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
                self.pos += c.len_utf8();
            } else {
                return;
            }
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::Unexpected {
                found,
                offset: self.pos,
            },
            None => ParseError::UnexpectedEof,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        self.skip_trivia();
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Consume `c` if it is next; report whether it was.
    fn eat(&mut self, c: char) -> bool {
        self.skip_trivia();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<String, ParseError> {
        self.skip_trivia();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            match self.bump().ok_or(ParseError::UnexpectedEof)? {
                c if c == quote => return Ok(out),
                '\\' => match self.bump().ok_or(ParseError::UnexpectedEof)? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            text: text.to_string(),
            offset: start,
        })
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.pos += 1;
                self.string(q).map(Value::Str)
            }
            Some('[') => {
                self.pos += 1;
                let mut items = Vec::new();
                while !self.eat(']') {
                    items.push(self.value()?);
                    if !self.eat(',') {
                        self.expect(']')?;
                        break;
                    }
                }
                Ok(Value::List(items))
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => {
                self.number().map(Value::Num)
            }
            Some(_) => {
                let offset = self.pos;
                match self.ident()?.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => {
                        self.pos = offset;
                        Err(self.unexpected())
                    }
                }
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }
}

fn line_id(
    value: Value,
    field: &'static str,
    offset: usize,
) -> Result<LineId, ParseError> {
    match value {
        Value::Num(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => {
            Ok(LineId::Number(n as u32))
        }
        Value::Str(code) => Ok(LineId::Code(code)),
        _ => Err(ParseError::WrongType { field, offset }),
    }
}

#[derive(Default)]
struct Fields {
    id: Option<String>,
    name: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    line: Option<LineId>,
    is_transfer: bool,
    transfer_lines: Vec<LineId>,
    description: Option<String>,
}

fn entry(cursor: &mut Cursor) -> Result<Station, ParseError> {
    cursor.skip_trivia();
    let entry_offset = cursor.pos;
    cursor.expect('{')?;
    let mut fields = Fields::default();

    while !cursor.eat('}') {
        cursor.skip_trivia();
        let offset = cursor.pos;
        let key = cursor.ident()?;
        cursor.expect(':')?;
        let value = cursor.value()?;
        let wrong = |field| ParseError::WrongType { field, offset };
        match (key.as_str(), value) {
            ("id", Value::Str(s)) => fields.id = Some(s),
            ("name", Value::Str(s)) => fields.name = Some(s),
            ("lat", Value::Num(n)) => fields.lat = Some(n),
            ("lng", Value::Num(n)) => fields.lng = Some(n),
            ("line", v) => fields.line = Some(line_id(v, "line", offset)?),
            ("isTransfer", Value::Bool(b)) => fields.is_transfer = b,
            ("transferLines", Value::List(items)) => {
                fields.transfer_lines = items
                    .into_iter()
                    .map(|v| line_id(v, "transferLines", offset))
                    .collect::<Result<_, _>>()?;
            }
            ("description", Value::Str(s)) => fields.description = Some(s),
            ("id", _) => return Err(wrong("id")),
            ("name", _) => return Err(wrong("name")),
            ("lat", _) => return Err(wrong("lat")),
            ("lng", _) => return Err(wrong("lng")),
            ("isTransfer", _) => return Err(wrong("isTransfer")),
            ("transferLines", _) => return Err(wrong("transferLines")),
            ("description", _) => return Err(wrong("description")),
            (other, _) => {
                return Err(ParseError::UnknownField {
                    field: other.to_string(),
                    offset,
                })
            }
        }
        if !cursor.eat(',') {
            cursor.expect('}')?;
            break;
        }
    }

    let missing = |field| ParseError::MissingField {
        field,
        offset: entry_offset,
    };
    Ok(Station {
        id: fields.id.ok_or_else(|| missing("id"))?,
        name: fields.name.ok_or_else(|| missing("name"))?,
        position: LatLng::new(
            fields.lat.ok_or_else(|| missing("lat"))?,
            fields.lng.ok_or_else(|| missing("lng"))?,
        ),
        line: fields.line.ok_or_else(|| missing("line"))?,
        is_transfer: fields.is_transfer,
        transfer_lines: fields.transfer_lines,
        description: fields.description,
    })
}

/// Name of the declaration that holds the table in exported files.
const TABLE_NAME: &str = "STATIONS";

enum Table {
    /// The text is the array literal itself.
    Bare(usize),
    /// The array follows a `STATIONS = ` declaration; text after it is
    /// other source and is left alone.
    Declared(usize),
}

fn locate_table(text: &str) -> Table {
    let mut cursor = Cursor { text, pos: 0 };
    cursor.skip_trivia();
    if cursor.peek() == Some('[') {
        return Table::Bare(cursor.pos);
    }
    let declaration = text.find(TABLE_NAME).and_then(|name| {
        text[name..].find('=').map(|eq| name + eq + 1)
    });
    if let Some(start) = declaration {
        return Table::Declared(start);
    }
    match (text.find('='), text.find('[')) {
        (Some(eq), Some(open)) if eq < open => Table::Declared(eq + 1),
        _ => Table::Bare(0),
    }
}

/// Parse a station table literal back into stations, in file order.
///
/// Accepts a bare array, or source text declaring `STATIONS = [...]`
/// among other declarations.
pub fn parse_stations(text: &str) -> Result<Vec<Station>, ParseError> {
    let (start, declared) = match locate_table(text) {
        Table::Bare(start) => (start, false),
        Table::Declared(start) => (start, true),
    };
    let mut cursor = Cursor { text, pos: start };
    cursor.expect('[')?;

    let mut stations = Vec::new();
    while !cursor.eat(']') {
        stations.push(entry(&mut cursor)?);
        if !cursor.eat(',') {
            cursor.expect(']')?;
            break;
        }
    }
    cursor.eat(';');
    if declared {
        return Ok(stations);
    }
    cursor.skip_trivia();
    if cursor.peek().is_some() {
        return Err(cursor.unexpected());
    }
    Ok(stations)
}
