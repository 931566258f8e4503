//! Filesystem backends.
//!
//! Backends implement [`Filesystem`](crate::Filesystem) for different
//! storage types.

mod local;
mod memory;

pub use local::LocalFs;
pub use memory::MemoryFs;

use crate::error::AddError;
use crate::path::{Separators, is_valid_segment};

/// A relative path handed to `add`, split into validated segments.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RelativeSpec<'a> {
    pub segments: Vec<&'a str>,
    /// A trailing separator asks for a directory.
    pub is_dir: bool,
}

/// Split and validate the relative path argument of `add`.
pub(crate) fn parse_relative(relative: &str, seps: Separators) -> Result<RelativeSpec<'_>, AddError> {
    let (body, is_dir) = match relative.strip_suffix(seps.segment) {
        Some(body) => (body, true),
        None => (relative, false),
    };
    if body.is_empty() {
        return Err(AddError::InvalidName(relative.to_string()));
    }
    let segments: Vec<&str> = body.split(seps.segment).collect();
    if !segments.iter().all(|s| is_valid_segment(s, seps)) {
        return Err(AddError::InvalidName(relative.to_string()));
    }
    Ok(RelativeSpec { segments, is_dir })
}
