//! Per-operation error types.
//!
//! Each operation group has its own enum so a caller matching on an
//! [`AddError`] can never confuse it with a [`RemoveError`]. Backends map
//! every internal failure onto a variant of the enum for the operation that
//! failed; host I/O failures that fit no other variant land in `Io`.

use std::io;
use thiserror::Error;

use crate::path::Path;

/// Failure of [`Filesystem::parent`](crate::Filesystem::parent).
#[derive(Debug, Error)]
pub enum ParentError {
    /// The root has no parent.
    #[error("root has no parent")]
    IsRoot,

    #[error("not found: {0}")]
    NotFound(Path),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::children_count`](crate::Filesystem::children_count).
#[derive(Debug, Error)]
pub enum ChildrenCountError {
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::child`](crate::Filesystem::child).
#[derive(Debug, Error)]
pub enum ChildError {
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("not a directory: {0}")]
    NotADirectory(Path),

    /// `index` was outside `[0, count)` for the directory's current children.
    #[error("child index {index} out of range for {path} ({count} children)")]
    IndexOutOfRange {
        path: Path,
        index: usize,
        count: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::add`](crate::Filesystem::add).
#[derive(Debug, Error)]
pub enum AddError {
    /// The parent does not exist.
    #[error("not found: {0}")]
    NotFound(Path),

    /// The parent, or an intermediate segment of the relative path, is a file.
    #[error("not a directory: {0}")]
    NotADirectory(Path),

    #[error("already exists: {0}")]
    AlreadyExists(Path),

    /// Empty segment, `.`, `..`, or a name the backend cannot store.
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("filesystem is read-only")]
    ReadOnly,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::remove`](crate::Filesystem::remove).
#[derive(Debug, Error)]
pub enum RemoveError {
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("cannot remove root")]
    IsRoot,

    /// Non-empty directory and recursive removal is not enabled.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(Path),

    #[error("filesystem is read-only")]
    ReadOnly,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::rename`](crate::Filesystem::rename).
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("cannot rename root")]
    IsRoot,

    /// The new name contains a segment separator or is otherwise unusable.
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// A sibling already has the new name.
    #[error("already exists: {0}")]
    AlreadyExists(Path),

    #[error("filesystem is read-only")]
    ReadOnly,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::move_to`](crate::Filesystem::move_to).
#[derive(Debug, Error)]
pub enum MoveError {
    /// The source or the target parent does not exist.
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("cannot move root")]
    IsRoot,

    #[error("not a directory: {0}")]
    NotADirectory(Path),

    /// The target parent is the node itself or one of its descendants.
    #[error("cannot move {path} into its own subtree at {new_parent}")]
    Cycle { path: Path, new_parent: Path },

    /// The target parent already has an entry with the same leaf name.
    #[error("already exists: {0}")]
    AlreadyExists(Path),

    #[error("filesystem is read-only")]
    ReadOnly,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::read`](crate::Filesystem::read).
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("is a directory: {0}")]
    IsADirectory(Path),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of [`Filesystem::write`](crate::Filesystem::write).
#[derive(Debug, Error)]
pub enum WriteError {
    /// Nothing exists at the path and implicit creation is disabled (or the
    /// parent is missing).
    #[error("not found: {0}")]
    NotFound(Path),

    #[error("is a directory: {0}")]
    IsADirectory(Path),

    #[error("filesystem is read-only")]
    ReadOnly,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = ChildError::IndexOutOfRange {
            path: Path::new("/docs"),
            index: 3,
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "child index 3 out of range for /docs (3 children)"
        );

        let err = MoveError::Cycle {
            path: Path::new("/a"),
            new_parent: Path::new("/a/b"),
        };
        assert_eq!(err.to_string(), "cannot move /a into its own subtree at /a/b");

        assert_eq!(
            AddError::InvalidName("..".into()).to_string(),
            "invalid name: \"..\""
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: WriteError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, WriteError::Io(_)));
    }
}
