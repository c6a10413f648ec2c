// src/internal/logger/formatter.rs

//! Rendering of [`LogRecord`]s.
//!
//! Message templates use `%(field)s` placeholders with an optional `-` (left
//! align) and minimum width, e.g. `[%(levelname)-8s]`. `%%` is a literal percent.
//!
//! | field       | value                                                    |
//! |-------------|----------------------------------------------------------|
//! | `asctime`   | timestamp rendered with the date format (strftime)       |
//! | `levelname` | severity name                                            |
//! | `levelno`   | severity value                                           |
//! | `name`      | logger name                                              |
//! | `message`   | message prefixed with its call site (see below)          |
//! | `msg`       | message as logged                                        |
//! | `filename`  | call-site file                                           |
//! | `funcName`  | call-site function                                       |
//! | `lineno`    | call-site line                                           |
//! | `module`    | call-site file without extension                         |
//!
//! `message` is `{file} - function:line` right-aligned to 64 columns, then
//! ` - ` and the text. Records whose origin is unknown get the bare text.

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use std::fmt::Write;
use std::path::Path;
use std::sync::OnceLock;

use super::colors::StyleTable;
use super::record::LogRecord;

pub const DEFAULT_MESSAGE_FORMAT: &str = "[%(asctime)s] [%(levelname)-8s] - %(message)s";
pub const DETAILED_MESSAGE_FORMAT: &str =
    "[%(asctime)s] [%(levelname)-8s] {%(filename)-32s} - %(message)s";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ORIGIN_WIDTH: usize = 64;
const PLACEHOLDER_PATTERN: &str = r"%(?:(%)|\((\w+)\)(-)?(\d+)?([sd]))";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("no style registered for severity {name} ({value})")]
    UnformattableLevel { name: String, value: u16 },
    #[error("unknown format field: %({0})")]
    UnknownField(String),
    #[error("invalid date format: {0:?}")]
    InvalidDateFormat(String),
    #[error("invalid message template: {0}")]
    Template(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asctime,
    Levelname,
    Levelno,
    Name,
    Message,
    Msg,
    Filename,
    FuncName,
    Lineno,
    Module,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "asctime" => Field::Asctime,
            "levelname" => Field::Levelname,
            "levelno" => Field::Levelno,
            "name" => Field::Name,
            "message" => Field::Message,
            "msg" => Field::Msg,
            "filename" => Field::Filename,
            "funcName" => Field::FuncName,
            "lineno" => Field::Lineno,
            "module" => Field::Module,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        left: bool,
        width: Option<usize>,
    },
}

/// Formats records from a message template and a date format, wrapping the
/// result in the severity's style when color is on.
#[derive(Debug, Clone)]
pub struct ColorFormatter {
    message_format: String,
    segments: Vec<Segment>,
    date_format: String,
    styles: StyleTable,
    color: bool,
}

impl ColorFormatter {
    /// Color starts out disabled; see [`ColorFormatter::with_color`].
    pub fn new(
        message_format: &str,
        date_format: &str,
        styles: StyleTable,
    ) -> Result<Self, FormatError> {
        validate_date_format(date_format)?;
        Ok(Self {
            message_format: message_format.to_string(),
            segments: parse_template(message_format)?,
            date_format: date_format.to_string(),
            styles,
            color: false,
        })
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn message_format(&self) -> &str {
        &self.message_format
    }

    pub fn set_message_format(&mut self, message_format: &str) -> Result<(), FormatError> {
        self.segments = parse_template(message_format)?;
        self.message_format = message_format.to_string();
        Ok(())
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn set_date_format(&mut self, date_format: &str) -> Result<(), FormatError> {
        validate_date_format(date_format)?;
        self.date_format = date_format.to_string();
        Ok(())
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Renders `record`. A severity without a style is an error even when color
    /// is off, so a registry/style mismatch surfaces on every sink alike.
    pub fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        let style = self.styles.get(record.level.value()).ok_or_else(|| {
            FormatError::UnformattableLevel {
                name: record.level.name().to_string(),
                value: record.level.value(),
            }
        })?;

        let body = self.render(record)?;
        if self.color {
            Ok(format!("{}{}{}", style.prefix, body, style.suffix))
        } else {
            Ok(body)
        }
    }

    fn render(&self, record: &LogRecord) -> Result<String, FormatError> {
        let mut out = String::with_capacity(self.message_format.len() + record.message.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, left, width } => {
                    let value = self.field_value(*field, record)?;
                    push_padded(&mut out, &value, *left, *width);
                }
            }
        }
        Ok(out)
    }

    fn field_value(&self, field: Field, record: &LogRecord) -> Result<String, FormatError> {
        let site = &record.call_site;
        Ok(match field {
            Field::Asctime => {
                let mut stamp = String::new();
                write!(stamp, "{}", record.timestamp.format(&self.date_format))
                    .map_err(|_| FormatError::InvalidDateFormat(self.date_format.clone()))?;
                stamp
            }
            Field::Levelname => record.level.name().to_string(),
            Field::Levelno => record.level.value().to_string(),
            Field::Name => record.logger.clone(),
            Field::Message => augmented_message(record),
            Field::Msg => record.message.clone(),
            Field::Filename => site.file.clone(),
            Field::FuncName => site.function.clone(),
            Field::Lineno => site.line.to_string(),
            Field::Module => Path::new(&site.file)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

/// The text with its origin in front, or the bare text when the origin is unknown.
pub fn augmented_message(record: &LogRecord) -> String {
    if record.call_site.is_unknown() {
        return record.message.clone();
    }
    format!(
        "{:>width$} - {}",
        record.call_site.origin(),
        record.message,
        width = ORIGIN_WIDTH
    )
}

fn push_padded(out: &mut String, value: &str, left: bool, width: Option<usize>) {
    match width {
        Some(width) if left => {
            let _ = write!(out, "{:<width$}", value, width = width);
        }
        Some(width) => {
            let _ = write!(out, "{:>width$}", value, width = width);
        }
        None => out.push_str(value),
    }
}

fn placeholder_regex() -> Result<&'static Regex, FormatError> {
    static PLACEHOLDER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(PLACEHOLDER_PATTERN))
        .as_ref()
        .map_err(|e| FormatError::Template(e.to_string()))
}

fn parse_template(template: &str) -> Result<Vec<Segment>, FormatError> {
    let placeholder = placeholder_regex()?;
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in placeholder.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            segments.push(Segment::Literal(template[last..whole.start()].to_string()));
        }

        if caps.get(1).is_some() {
            segments.push(Segment::Literal("%".to_string()));
        } else {
            let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let field =
                Field::parse(name).ok_or_else(|| FormatError::UnknownField(name.to_string()))?;
            segments.push(Segment::Field {
                field,
                left: caps.get(3).is_some(),
                width: caps.get(4).and_then(|m| m.as_str().parse().ok()),
            });
        }
        last = whole.end();
    }

    if last < template.len() {
        segments.push(Segment::Literal(template[last..].to_string()));
    }
    Ok(segments)
}

fn validate_date_format(date_format: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::InvalidDateFormat(date_format.to_string()));
    }
    Ok(())
}
