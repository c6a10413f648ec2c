// src/internal/instrument/owner.rs

use std::panic::Location;

use serde_json::Value;

use crate::internal::logger::level::{self, SeverityLevel};
use crate::internal::logger::{Logger, Logging};

/// A type that logs in its own name.
///
/// Records go to [`logger`](LogOwner::logger) when it returns one, otherwise
/// to the context's root, and carry `Owner.method` in their origin.
pub trait LogOwner {
    fn logger(&self) -> Option<&Logger> {
        None
    }

    /// Last path segment of the type name, without generics.
    fn owner_name(&self) -> String {
        short_type_name::<Self>()
    }

    /// Logs `message` at `level` with the owner's name in the origin.
    #[track_caller]
    fn print_status(&self, ctx: &Logging, message: &str, level: &SeverityLevel) {
        let location = Location::caller();
        let target = self.logger().cloned().unwrap_or_else(|| ctx.root());
        if !target.is_enabled_for(level) {
            return;
        }
        let call_site = ctx.settings().call_sites.resolve(location);
        target.log_at(level, message, call_site.with_owner(self.owner_name()));
    }

    /// Logs every entry of `value` at DEBUG, one tab of indent per nesting
    /// depth. Nested objects log their key and recurse; arrays are reported by
    /// length only.
    #[track_caller]
    fn iterdict(&self, ctx: &Logging, value: &Value) {
        for line in iterdict_lines(value) {
            self.print_status(ctx, &line, &level::DEBUG);
        }
    }
}

/// `a::b::Thing<c::D>` becomes `Thing`.
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

fn iterdict_lines(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    if let Value::Object(map) = value {
        collect(map, 0, &mut lines);
    }
    lines
}

fn collect(map: &serde_json::Map<String, Value>, depth: usize, lines: &mut Vec<String>) {
    let indent = "\t".repeat(depth);
    for (key, value) in map {
        match value {
            Value::Object(inner) => {
                lines.push(format!("{indent}{key}"));
                collect(inner, depth + 1, lines);
            }
            Value::Array(items) => lines.push(format!("{indent}{key}: ({},)", items.len())),
            Value::String(s) => lines.push(format!("{indent}{key}: {s}")),
            other => lines.push(format!("{indent}{key}: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Widget;
    impl LogOwner for Widget {}

    #[test]
    fn test_short_type_name() {
        assert_eq!(Widget.owner_name(), "Widget");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(short_type_name::<str>(), "str");
    }

    #[test]
    fn test_iterdict_lines() {
        let value = json!({
            "name": "toolbox",
            "shape": [1, 2, 3],
            "nested": { "depth": 1, "deeper": { "flag": true } }
        });
        let lines = iterdict_lines(&value);
        assert!(lines.contains(&"name: toolbox".to_string()));
        assert!(lines.contains(&"shape: (3,)".to_string()));
        assert!(lines.contains(&"nested".to_string()));
        assert!(lines.contains(&"\tdepth: 1".to_string()));
        assert!(lines.contains(&"\tdeeper".to_string()));
        assert!(lines.contains(&"\t\tflag: true".to_string()));
    }

    #[test]
    fn test_iterdict_ignores_non_objects() {
        assert!(iterdict_lines(&json!([1, 2])).is_empty());
        assert!(iterdict_lines(&json!("text")).is_empty());
    }
}
