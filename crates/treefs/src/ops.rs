//! The filesystem operations trait.
//!
//! Backends expose a tree of directories and files addressed by [`Path`].
//! The trait is synchronous: every call returns before the next begins.

use crate::error::{
    AddError, ChildError, ChildrenCountError, MoveError, ParentError, ReadError, RemoveError,
    RenameError, WriteError,
};
use crate::path::{Path, Separators};

/// Core filesystem operations.
///
/// Every node is either a directory, with children enumerated by index
/// `0..children_count`, or a file with byte content. Nodes never change
/// kind; remove and re-add to turn a file into a directory.
///
/// Child indices are only stable between calls that do not mutate the
/// directory. Any of `add`, `remove`, `rename`, `move_to` may renumber
/// siblings, so callers must not cache indices across them.
///
/// Implementations document their own thread-safety; the `Send + Sync`
/// bound only makes sharing possible.
pub trait Filesystem: Send + Sync {
    // ========================================================================
    // Navigation
    // ========================================================================

    /// Path of the tree root.
    fn root(&self) -> Path;

    /// Parent of an existing node.
    fn parent(&self, path: &Path) -> Result<Path, ParentError>;

    /// Number of children of a directory; `0` for a file.
    fn children_count(&self, path: &Path) -> Result<usize, ChildrenCountError>;

    /// The child at `idx` in the directory's current enumeration order.
    fn child(&self, path: &Path, idx: usize) -> Result<Path, ChildError>;

    // ========================================================================
    // Classification
    //
    // Existence-agnostic: a missing path is neither a directory nor a file,
    // and that is not an error.
    // ========================================================================

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    // ========================================================================
    // Structural mutation
    // ========================================================================

    /// Create an entry below `parent`.
    ///
    /// `relative_path` may span several segments; missing intermediate
    /// directories are created. A trailing segment separator creates a
    /// directory, otherwise an empty file is created. Returns the new
    /// entry's path.
    fn add(&self, parent: &Path, relative_path: &str) -> Result<Path, AddError>;

    /// Remove a file or directory.
    fn remove(&self, path: &Path) -> Result<(), RemoveError>;

    /// Give a node a new leaf name under the same parent.
    fn rename(&self, path: &Path, new_name: &str) -> Result<Path, RenameError>;

    /// Re-parent a node, keeping its leaf name.
    fn move_to(&self, path: &Path, new_parent: &Path) -> Result<Path, MoveError>;

    // ========================================================================
    // Content
    // ========================================================================

    /// Entire content of a file.
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError>;

    /// Replace the entire content of a file.
    fn write(&self, path: &Path, buf: &[u8]) -> Result<(), WriteError>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns true if mutations are refused.
    fn read_only(&self) -> bool;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Separators this backend parses and builds paths with.
    fn separators(&self) -> Separators {
        self.root().separators()
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_dir(path) || self.is_file(path)
    }

    /// Create an empty file named `name` directly below `parent`.
    fn add_file(&self, parent: &Path, name: &str) -> Result<Path, AddError> {
        if name.ends_with(self.separators().segment) {
            return Err(AddError::InvalidName(name.to_string()));
        }
        self.add(parent, name)
    }

    /// Create a directory named `name` directly below `parent`.
    fn add_dir(&self, parent: &Path, name: &str) -> Result<Path, AddError> {
        let sep = self.separators().segment;
        if name.ends_with(sep) {
            return self.add(parent, name);
        }
        let mut relative = name.to_string();
        relative.push(sep);
        self.add(parent, &relative)
    }

    /// All children of a directory, in enumeration order.
    fn children(&self, path: &Path) -> Result<Vec<Path>, ChildError> {
        if self.is_file(path) {
            return Err(ChildError::NotADirectory(path.clone()));
        }
        let count = self.children_count(path).map_err(|e| match e {
            ChildrenCountError::NotFound(p) => ChildError::NotFound(p),
            ChildrenCountError::Io(e) => ChildError::Io(e),
        })?;
        (0..count).map(|idx| self.child(path, idx)).collect()
    }
}
