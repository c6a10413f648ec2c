// src/internal/logger/level.rs

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Logger level meaning "inherit the threshold from the parent logger".
pub const NOTSET: u16 = 0;

pub const DEBUG: SeverityLevel = SeverityLevel::builtin("DEBUG", 10);
pub const INFO: SeverityLevel = SeverityLevel::builtin("INFO", 20);
pub const SUCCESS: SeverityLevel = SeverityLevel::builtin("SUCCESS", 21);
pub const FAILURE: SeverityLevel = SeverityLevel::builtin("FAILURE", 22);
pub const WARNING: SeverityLevel = SeverityLevel::builtin("WARNING", 30);
pub const ERROR: SeverityLevel = SeverityLevel::builtin("ERROR", 40);
pub const CRITICAL: SeverityLevel = SeverityLevel::builtin("CRITICAL", 50);
/// Never filtered out by any sane threshold.
pub const FLAG: SeverityLevel = SeverityLevel::builtin("FLAG", 60);

/// Alternative name for [`CRITICAL`].
pub const FATAL_ALIAS: &str = "FATAL";

/// A named, numerically ordered severity.
///
/// Ordering and equality of thresholds only ever look at `value`; the name is
/// carried for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeverityLevel {
    name: Cow<'static, str>,
    value: u16,
}

impl SeverityLevel {
    const fn builtin(name: &'static str, value: u16) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value,
        }
    }

    pub fn new(name: impl Into<String>, value: u16) -> Self {
        Self {
            name: Cow::Owned(name.into().to_ascii_uppercase()),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// The standard set, lowest first.
    pub fn standard() -> [SeverityLevel; 8] {
        [DEBUG, INFO, SUCCESS, FAILURE, WARNING, ERROR, CRITICAL, FLAG]
    }
}

impl PartialOrd for SeverityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeverityLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifies a level either by name or by numeric value.
///
/// Deserializes from a bare integer or a string, so configuration files can say
/// `level: 21` or `level: success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelId {
    Value(u16),
    Name(String),
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Value(value) => write!(f, "{}", value),
            LevelId::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for LevelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<u16>() {
            Ok(value) => LevelId::Value(value),
            Err(_) => LevelId::Name(trimmed.to_string()),
        })
    }
}

impl From<u16> for LevelId {
    fn from(value: u16) -> Self {
        LevelId::Value(value)
    }
}

impl From<&str> for LevelId {
    fn from(name: &str) -> Self {
        // FromStr is infallible
        name.parse().unwrap_or_else(|never| match never {})
    }
}

impl From<&SeverityLevel> for LevelId {
    fn from(level: &SeverityLevel) -> Self {
        LevelId::Value(level.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("cannot register {name}={value}: already registered as {existing}")]
    DuplicateLevel {
        name: String,
        value: u16,
        existing: String,
    },
    #[error("unknown severity level: {0}")]
    UnknownLevel(String),
    #[error("severity value {0} is reserved")]
    Reserved(u16),
}

/// Ordered set of severities known to a logging context.
#[derive(Debug, Clone, Default)]
pub struct LevelRegistry {
    by_value: BTreeMap<u16, SeverityLevel>,
    // upper-cased names, aliases included
    by_name: HashMap<String, u16>,
}

impl LevelRegistry {
    /// An empty registry. Most callers want [`LevelRegistry::standard`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional levels plus SUCCESS, FAILURE and FLAG, with FATAL as an
    /// alias of CRITICAL.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for level in SeverityLevel::standard() {
            registry.insert(level);
        }
        registry
            .by_name
            .insert(FATAL_ALIAS.to_string(), CRITICAL.value());
        registry
    }

    /// Registers `name` at `value`.
    ///
    /// Registering the same pair twice is a no-op. A value already held by a
    /// different name, or a name already bound to a different value, is a
    /// [`LevelError::DuplicateLevel`]; use [`LevelRegistry::register_override`]
    /// to replace deliberately.
    pub fn register(&mut self, name: &str, value: u16) -> Result<SeverityLevel, LevelError> {
        if value == NOTSET {
            return Err(LevelError::Reserved(value));
        }
        let key = name.trim().to_ascii_uppercase();

        if let Some(&bound) = self.by_name.get(&key) {
            if bound == value {
                return self.resolve_value(value);
            }
            return Err(LevelError::DuplicateLevel {
                name: key,
                value,
                existing: format!("{}={}", name.trim(), bound),
            });
        }

        if let Some(holder) = self.by_value.get(&value) {
            return Err(LevelError::DuplicateLevel {
                name: key,
                value,
                existing: holder.name().to_string(),
            });
        }

        let level = SeverityLevel::new(key, value);
        self.insert(level.clone());
        Ok(level)
    }

    /// Registers `name` at `value`, evicting whatever held either of them.
    pub fn register_override(
        &mut self,
        name: &str,
        value: u16,
    ) -> Result<SeverityLevel, LevelError> {
        if value == NOTSET {
            return Err(LevelError::Reserved(value));
        }
        let key = name.trim().to_ascii_uppercase();

        if let Some(old_value) = self.by_name.get(&key).copied() {
            if old_value != value {
                self.by_value.remove(&old_value);
                self.by_name.retain(|_, bound| *bound != old_value);
            }
        }
        // aliases of an evicted value go with it
        if self.by_value.remove(&value).is_some() {
            self.by_name.retain(|_, bound| *bound != value);
        }

        let level = SeverityLevel::new(key, value);
        self.insert(level.clone());
        Ok(level)
    }

    /// Adds an extra name for an already registered value.
    pub fn alias(&mut self, name: &str, value: u16) -> Result<(), LevelError> {
        let key = name.trim().to_ascii_uppercase();
        if !self.by_value.contains_key(&value) {
            return Err(LevelError::UnknownLevel(value.to_string()));
        }
        match self.by_name.get(&key) {
            Some(&bound) if bound != value => Err(LevelError::DuplicateLevel {
                name: key,
                value,
                existing: format!("{}={}", name.trim(), bound),
            }),
            _ => {
                self.by_name.insert(key, value);
                Ok(())
            }
        }
    }

    /// Looks a level up by name (case-insensitive) or by value.
    pub fn resolve(&self, id: &LevelId) -> Result<SeverityLevel, LevelError> {
        match id {
            LevelId::Value(value) => self.resolve_value(*value),
            LevelId::Name(name) => {
                let key = name.trim().to_ascii_uppercase();
                match self.by_name.get(&key) {
                    Some(&value) => self.resolve_value(value),
                    None => Err(LevelError::UnknownLevel(name.clone())),
                }
            }
        }
    }

    pub fn resolve_value(&self, value: u16) -> Result<SeverityLevel, LevelError> {
        self.by_value
            .get(&value)
            .cloned()
            .ok_or_else(|| LevelError::UnknownLevel(value.to_string()))
    }

    pub fn contains_value(&self, value: u16) -> bool {
        self.by_value.contains_key(&value)
    }

    /// Canonical levels in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = &SeverityLevel> {
        self.by_value.values()
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }

    fn insert(&mut self, level: SeverityLevel) {
        self.by_name.insert(level.name().to_string(), level.value());
        self.by_value.insert(level.value(), level);
    }
}
