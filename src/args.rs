//! Splitting raw argv into target files and passthrough flags.
//!
//! Everything before the first `--` names files to check (plus our own
//! options, which clap picks out later). The `--` itself and everything after
//! it is forwarded verbatim to every tool invocation. The separator is kept
//! because `clang-tidy` reads `-- <compiler flags>` as its own convention.

use std::ffi::{OsStr, OsString};

/// The literal token dividing target files from passthrough flags.
pub const SEPARATOR: &str = "--";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSegments<T = OsString> {
    /// Arguments before the first separator. Never contains the separator.
    pub files: Vec<T>,
    /// The separator and everything after it, or empty if there was none.
    pub trailing_args: Vec<T>,
}

/// Split `args` at the first element equal to [`SEPARATOR`].
///
/// Later separators are ordinary elements of `trailing_args`.
pub fn partition<I, T>(args: I) -> ArgumentSegments<T>
where
    I: IntoIterator<Item = T>,
    T: AsRef<OsStr>,
{
    let mut files: Vec<T> = args.into_iter().collect();
    let trailing_args = match files.iter().position(|a| a.as_ref() == SEPARATOR) {
        Some(i) => files.split_off(i),
        None => Vec::new(),
    };
    ArgumentSegments {
        files,
        trailing_args,
    }
}
