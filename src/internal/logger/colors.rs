// src/internal/logger/colors.rs

use std::collections::BTreeMap;

use super::formatter::FormatError;
use super::level::{self, LevelRegistry};

/// ANSI escape codes used for console output.
pub struct Colors;

impl Colors {
    pub const BLACK: &'static str = "\x1b[0;30m";
    pub const RED: &'static str = "\x1b[0;31m";
    pub const GREEN: &'static str = "\x1b[0;32m";
    pub const BROWN: &'static str = "\x1b[0;33m";
    pub const BLUE: &'static str = "\x1b[0;34m";
    pub const PURPLE: &'static str = "\x1b[0;35m";
    pub const CYAN: &'static str = "\x1b[0;36m";
    pub const LIGHT_GRAY: &'static str = "\x1b[0;37m";
    pub const DARK_GRAY: &'static str = "\x1b[1;30m";
    pub const LIGHT_RED: &'static str = "\x1b[1;31m";
    pub const LIGHT_GREEN: &'static str = "\x1b[1;32m";
    pub const YELLOW: &'static str = "\x1b[1;33m";
    pub const LIGHT_BLUE: &'static str = "\x1b[1;34m";
    pub const LIGHT_PURPLE: &'static str = "\x1b[1;35m";
    pub const LIGHT_CYAN: &'static str = "\x1b[1;36m";
    pub const LIGHT_WHITE: &'static str = "\x1b[1;37m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const FAINT: &'static str = "\x1b[2m";
    pub const ITALIC: &'static str = "\x1b[3m";
    pub const UNDERLINE: &'static str = "\x1b[4m";
    pub const BLINK: &'static str = "\x1b[5m";
    pub const NEGATIVE: &'static str = "\x1b[7m";
    pub const CROSSED: &'static str = "\x1b[9m";
    pub const END: &'static str = "\x1b[0m";

    /// Every named code, in alphabetical order.
    pub fn palette() -> &'static [(&'static str, &'static str)] {
        &[
            ("BLACK", Self::BLACK),
            ("BLINK", Self::BLINK),
            ("BLUE", Self::BLUE),
            ("BOLD", Self::BOLD),
            ("BROWN", Self::BROWN),
            ("CROSSED", Self::CROSSED),
            ("CYAN", Self::CYAN),
            ("DARK_GRAY", Self::DARK_GRAY),
            ("END", Self::END),
            ("FAINT", Self::FAINT),
            ("GREEN", Self::GREEN),
            ("ITALIC", Self::ITALIC),
            ("LIGHT_BLUE", Self::LIGHT_BLUE),
            ("LIGHT_CYAN", Self::LIGHT_CYAN),
            ("LIGHT_GRAY", Self::LIGHT_GRAY),
            ("LIGHT_GREEN", Self::LIGHT_GREEN),
            ("LIGHT_PURPLE", Self::LIGHT_PURPLE),
            ("LIGHT_RED", Self::LIGHT_RED),
            ("LIGHT_WHITE", Self::LIGHT_WHITE),
            ("NEGATIVE", Self::NEGATIVE),
            ("PURPLE", Self::PURPLE),
            ("RED", Self::RED),
            ("UNDERLINE", Self::UNDERLINE),
            ("YELLOW", Self::YELLOW),
        ]
    }

    /// One line per code, each rendered in its own style, followed by a reset.
    /// With `enabled == false` the codes collapse to nothing and only names remain.
    pub fn palette_lines(enabled: bool) -> Vec<String> {
        let code = |c: &str| if enabled { c.to_string() } else { String::new() };
        let mut lines: Vec<String> = Self::palette()
            .iter()
            .map(|(name, c)| format!("{} {}", code(c), name))
            .collect();
        lines.push(code(Self::END));
        lines
    }
}

/// Escape sequences wrapped around a rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub prefix: String,
    pub suffix: String,
}

impl Style {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// `codes` in front, a reset behind.
    pub fn of(codes: &[&str]) -> Self {
        Self::new(codes.concat(), Colors::END)
    }
}

/// Maps severity values to styles. Every level that can be formatted needs an
/// entry; there is no fallback style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    styles: BTreeMap<u16, Style>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert(level::DEBUG.value(), Style::of(&[Colors::LIGHT_WHITE]));
        table.insert(level::INFO.value(), Style::of(&[Colors::LIGHT_BLUE]));
        table.insert(
            level::SUCCESS.value(),
            Style::of(&[Colors::GREEN, Colors::BOLD]),
        );
        table.insert(
            level::FAILURE.value(),
            Style::of(&[Colors::RED, Colors::BOLD]),
        );
        table.insert(
            level::WARNING.value(),
            Style::of(&[Colors::YELLOW, Colors::BOLD]),
        );
        table.insert(level::ERROR.value(), Style::of(&[Colors::RED, Colors::BOLD]));
        table.insert(
            level::CRITICAL.value(),
            Style::of(&[Colors::PURPLE, Colors::BOLD]),
        );
        table.insert(
            level::FLAG.value(),
            Style::new(
                [Colors::BOLD, Colors::LIGHT_RED].concat(),
                [Colors::BLINK, Colors::END].concat(),
            ),
        );
        table
    }

    pub fn insert(&mut self, value: u16, style: Style) -> Option<Style> {
        self.styles.insert(value, style)
    }

    pub fn get(&self, value: u16) -> Option<&Style> {
        self.styles.get(&value)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Fails on the first registered level without a style.
    pub fn ensure_covers(&self, registry: &LevelRegistry) -> Result<(), FormatError> {
        match registry.levels().find(|level| self.get(level.value()).is_none()) {
            Some(level) => Err(FormatError::UnformattableLevel {
                name: level.name().to_string(),
                value: level.value(),
            }),
            None => Ok(()),
        }
    }
}
