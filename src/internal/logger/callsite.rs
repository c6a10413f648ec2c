// src/internal/logger/callsite.rs

//! Locating where a log-worthy event came from.
//!
//! Two strategies are offered. [`resolve_caller`] walks the live stack and skips
//! frames whose function name contains one of a set of "internal" terms. It is a
//! heuristic: matching is by case-insensitive substring, so a user function
//! that happens to be called `wrapper_utils` is skipped along with the real
//! wrappers. [`CallSite::from_location`] instead takes a location handed down by
//! `#[track_caller]` and involves no name matching at all.

use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Function names treated as logging plumbing by default.
pub const DEFAULT_SKIP_NAMES: &[&str] = &[
    "print_status",
    "log_message",
    "iterdict",
    "get_frame_info",
    "wrapper",
];

const RESOLVER_PREFIX: &str = "toolbox::internal::logger::callsite::";

// Symbol prefixes that make up the resolver's own frames. Only the leading run
// of such frames is dropped before the name heuristic is applied.
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "toolbox::internal::logger::",
    "toolbox::internal::instrument::",
];

/// `(file, function, line)` of a log call, plus the owning type when known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub function: String,
    pub line: u32,
    pub owner: Option<String>,
}

impl CallSite {
    /// The "origin unknown" sentinel: `("", "", 0)`.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
            owner: None,
        }
    }

    /// Builds a call site from a location captured with `#[track_caller]`.
    /// The function name is not available this way and is left empty.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(basename(location.file()), "", location.line())
    }

    /// The call site of whoever called this function.
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.function.is_empty() && self.line == 0
    }

    /// `{file} - Owner.function:line`, as embedded in rendered messages.
    /// Without a function or an owner this is just `{file}:line`.
    pub fn origin(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() && self.owner.is_none() {
            return write!(f, "{{{}}}:{}", self.file, self.line);
        }
        write!(f, "{{{}}} - ", self.file)?;
        match &self.owner {
            Some(owner) if self.function.is_empty() => write!(f, "{}", owner)?,
            Some(owner) => write!(f, "{}.{}", owner, self.function)?,
            None => f.write_str(&self.function)?,
        }
        write!(f, ":{}", self.line)
    }
}

/// One resolved stack frame, innermost first when collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Bare function name, e.g. `user_fn`.
    pub function: String,
    /// Full demangled symbol path, e.g. `my_crate::jobs::user_fn`.
    pub path: String,
    pub file: String,
    pub line: u32,
}

impl FrameInfo {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        let function = function.into();
        Self {
            path: function.clone(),
            function,
            file: file.into(),
            line,
        }
    }
}

/// Returns the first frame whose function name contains none of `skip_names`.
///
/// `frames` must start just outside the resolver. Frames without a symbol name
/// are never returned. An exhausted stack yields [`CallSite::unknown`].
pub fn resolve_from_frames<S: AsRef<str>>(frames: &[FrameInfo], skip_names: &[S]) -> CallSite {
    let skip: Vec<String> = skip_names
        .iter()
        .map(|term| term.as_ref().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect();

    frames
        .iter()
        .filter(|frame| !frame.function.is_empty())
        .find(|frame| {
            let name = frame.function.to_lowercase();
            !skip.iter().any(|term| name.contains(term.as_str()))
        })
        .map(|frame| CallSite::new(basename(&frame.file), frame.function.clone(), frame.line))
        .unwrap_or_default()
}

/// Walks the current stack outward from this function and returns the first
/// frame not matching `skip_names`.
///
/// Accuracy depends on debug info being present and on the optimizer not
/// inlining the frames of interest away.
#[inline(never)]
pub fn resolve_caller<S: AsRef<str>>(skip_names: &[S]) -> CallSite {
    let frames = capture_frames();
    // unwinder frames may sit above the resolver's own
    let anchor = frames
        .iter()
        .position(|frame| frame.path.trim_start_matches('<').starts_with(RESOLVER_PREFIX))
        .unwrap_or(0);
    let start = frames[anchor..]
        .iter()
        .position(|frame| !is_internal(&frame.path))
        .map_or(frames.len(), |offset| anchor + offset);
    resolve_from_frames(&frames[start..], skip_names)
}

/// How a logging context attributes records to their origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSiteStrategy {
    /// Stack walk with name-based skipping.
    StackWalk { skip_names: Vec<String> },
    /// Caller location propagated through `#[track_caller]`; exact file and line,
    /// no function name.
    TrackCaller,
}

impl Default for CallSiteStrategy {
    fn default() -> Self {
        CallSiteStrategy::StackWalk {
            skip_names: DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CallSiteStrategy {
    pub fn resolve(&self, location: &Location<'_>) -> CallSite {
        match self {
            CallSiteStrategy::StackWalk { skip_names } => resolve_caller(skip_names),
            CallSiteStrategy::TrackCaller => CallSite::from_location(location),
        }
    }
}

/// Final path component, or the input when it has none.
pub fn basename(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

fn is_internal(path: &str) -> bool {
    let path = path.trim_start_matches('<');
    path.is_empty() || INTERNAL_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn capture_frames() -> Vec<FrameInfo> {
    let trace = backtrace::Backtrace::new();
    let mut frames = Vec::new();
    for frame in trace.frames() {
        for symbol in frame.symbols() {
            let path = symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_default();
            frames.push(FrameInfo {
                function: function_name(&path),
                path,
                file: symbol
                    .filename()
                    .map(|file| file.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                line: symbol.lineno().unwrap_or(0),
            });
        }
    }
    frames
}

/// Reduces a demangled symbol path to the name of the enclosing function.
///
/// `a::b::Type::method::{{closure}}::h0123456789abcdef` becomes `method`, and
/// so does `a::b::Type::method::<u8>`.
fn function_name(path: &str) -> String {
    let path = strip_generic_args(path);
    path.rsplit("::")
        .map(|segment| segment.trim_end_matches('>'))
        .find(|segment| {
            !segment.is_empty() && !segment.starts_with("{{") && !is_symbol_hash(segment)
        })
        .map(|segment| match segment.find('<') {
            Some(0) | None => segment.trim_start_matches('<').to_string(),
            Some(idx) => segment[..idx].to_string(),
        })
        .unwrap_or_default()
}

/// Drops `::<...>` generic argument segments, nested ones included.
fn strip_generic_args(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(idx) = rest.find("::<") {
        out.push_str(&rest[..idx]);
        let args = &rest[idx + 2..];
        let mut depth = 0usize;
        let mut end = args.len();
        let mut prev = ' ';
        for (i, c) in args.char_indices() {
            match c {
                '<' => depth += 1,
                // `->` in fn pointer arguments is not a closing bracket
                '>' if prev != '-' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = i + 1;
                        break;
                    }
                }
                _ => {}
            }
            prev = c;
        }
        rest = &args[end..];
    }
    out.push_str(rest);
    out
}

fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_name_strips_path_hash_and_closures() {
        assert_eq!(
            function_name("app::jobs::run_job::{{closure}}::h0123456789abcdef"),
            "run_job"
        );
        assert_eq!(function_name("app::Worker::step"), "step");
        assert_eq!(function_name("main"), "main");
        assert_eq!(function_name(""), "");
    }

    #[test]
    fn function_name_skips_generic_arguments() {
        assert_eq!(function_name("app::run::<u8>"), "run");
        assert_eq!(
            function_name("app::run::<alloc::string::String>::{{closure}}::h0123456789abcdef"),
            "run"
        );
        assert_eq!(function_name("app::apply::<fn() -> u8, Vec<u8>>"), "apply");
        assert_eq!(function_name("<app::Worker as app::Step>::step"), "step");
    }

    #[test]
    fn internal_prefixes_cover_resolver_frames() {
        assert!(is_internal("backtrace::capture::Backtrace::new"));
        assert!(is_internal("toolbox::internal::logger::callsite::resolve_caller"));
        assert!(is_internal(""));
        assert!(!is_internal("app::main"));
    }

    #[test]
    fn basename_drops_directories() {
        assert_eq!(basename("src/bin/tool.rs"), "tool.rs");
        assert_eq!(basename("tool.rs"), "tool.rs");
    }
}
