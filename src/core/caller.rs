//! Caller attribution
//!
//! A log line is attributed to the first stack frame above the logging
//! library's own frames. The live stack is captured at the public entry
//! point, bounded to [`MAX_CALLER_DEPTH`] frames, and searched for the last
//! frame whose qualified name contains a boundary marker. The frame right
//! after it names the calling function.
//!
//! The directory label comes from the call site's [`Location`], which the
//! `#[track_caller]` entry points provide even without debug info. Without
//! debug info, inlined callers vanish from the stack and the frame above the
//! boundary may belong to the standard library. Such frames, and frames with
//! no source file, resolve to [`UNKNOWN`] rather than to a wrong name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Placeholder used when a caller label cannot be determined.
pub const UNKNOWN: &str = "unknown";

/// Maximum number of frames captured per log call.
pub const MAX_CALLER_DEPTH: usize = 32;

/// Crates whose frames are never a caller.
const RUNTIME_CRATES: [&str; 3] = ["core::", "std::", "alloc::"];

/// One resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Qualified symbol name, e.g. `my_app::db::connect`.
    pub function: String,
    /// Source file, when debug info is available.
    pub file: Option<PathBuf>,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: Option<impl Into<PathBuf>>) -> Self {
        Self {
            function: function.into(),
            file: file.map(Into::into),
        }
    }
}

/// The function and component directory a log line is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub function: String,
    pub directory: String,
}

impl CallerInfo {
    pub fn new(function: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            directory: directory.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    pub fn is_unknown(&self) -> bool {
        self.function == UNKNOWN && self.directory == UNKNOWN
    }

    /// Derive the labels for a single frame.
    ///
    /// A frame without a source file, or one inside the standard library,
    /// cannot be trusted to be the real caller and yields [`unknown`](Self::unknown).
    pub fn from_frame(frame: &Frame) -> Self {
        let Some(file) = frame.file.as_deref() else {
            return Self::unknown();
        };
        if is_runtime_frame(&frame.function) {
            return Self::unknown();
        }
        Self {
            function: short_function_name(&frame.function),
            directory: directory_label(file).unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

impl Default for CallerInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}]", self.directory, self.function)
    }
}

/// Walk the live stack and return up to `max_depth` resolved frames,
/// innermost first.
#[inline(never)]
pub fn capture_frames(max_depth: usize) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(max_depth);
    backtrace::trace(|raw| {
        let before = frames.len();
        // One physical frame may resolve to several inlined functions,
        // reported innermost first
        backtrace::resolve_frame(raw, |symbol| {
            if frames.len() < max_depth {
                if let Some(name) = symbol.name() {
                    // `{:#}` drops the trailing `::h<hash>` of legacy mangling
                    frames.push(Frame {
                        function: format!("{:#}", name),
                        file: symbol.filename().map(Path::to_path_buf),
                    });
                }
            }
        });
        // Frames without symbols still count towards the depth bound
        if frames.len() == before && frames.len() < max_depth {
            frames.push(Frame {
                function: String::new(),
                file: None,
            });
        }
        frames.len() < max_depth
    });
    frames
}

/// Find the caller above the last boundary frame.
///
/// Returns [`CallerInfo::unknown`] if no frame matches a marker, or if the
/// last matching frame is the outermost captured one.
pub fn resolve_caller(frames: &[Frame], markers: &[&str]) -> CallerInfo {
    let is_boundary = |frame: &Frame| markers.iter().any(|m| frame.function.contains(m));

    frames
        .iter()
        .rposition(is_boundary)
        .and_then(|last| frames.get(last + 1))
        .filter(|frame| !frame.function.is_empty())
        .map(CallerInfo::from_frame)
        .unwrap_or_else(CallerInfo::unknown)
}

/// Capture the current stack and resolve the caller above `markers`.
///
/// The function label comes from the stack, the directory label from
/// `location`.
#[inline(never)]
pub fn current_caller(markers: &[&str], location: &Location<'_>) -> CallerInfo {
    let resolved = resolve_caller(&capture_frames(MAX_CALLER_DEPTH), markers);
    CallerInfo::new(resolved.function, location_directory(location))
}

/// Directory label of a call site.
pub fn location_directory(location: &Location<'_>) -> String {
    directory_label(Path::new(location.file())).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Whether `function` is standard library code. Trait impls count when the
/// self type is a standard library type, or a bare type parameter (closure
/// shims) implementing a standard library trait.
fn is_runtime_frame(function: &str) -> bool {
    let in_runtime = |path: &str| RUNTIME_CRATES.iter().any(|p| path.starts_with(p));
    let Some(qualified) = function.strip_prefix('<') else {
        return in_runtime(function);
    };
    match qualified.split_once(" as ") {
        Some((self_ty, trait_path)) => {
            in_runtime(self_ty) || (!self_ty.contains("::") && in_runtime(trait_path))
        }
        None => in_runtime(qualified),
    }
}

/// Last path segment of a qualified name, ignoring closure segments and
/// generic arguments.
pub fn short_function_name(qualified: &str) -> String {
    let mut name = strip_generics(qualified);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    let short = name.rsplit("::").next().unwrap_or(name);
    if short.is_empty() {
        UNKNOWN.to_string()
    } else {
        short.to_string()
    }
}

/// Drop a trailing `::<...>` generic argument list, if any.
fn strip_generics(name: &str) -> &str {
    if !name.ends_with('>') {
        return name;
    }
    let mut depth = 0usize;
    for (idx, ch) in name.char_indices().rev() {
        match ch {
            '>' => depth += 1,
            '<' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return name[..idx].strip_suffix("::").unwrap_or(&name[..idx]);
                }
            }
            _ => {}
        }
    }
    name
}

/// Basename of the directory containing `file`.
fn directory_label(file: &Path) -> Option<String> {
    file.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}
