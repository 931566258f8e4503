//! Backend-agnostic hierarchical filesystem contract.
//!
//! Key components:
//!
//! - [`Path`] - Immutable path value: full string, leaf name, extension
//! - [`Filesystem`] - Navigation, classification, mutation and content I/O
//! - [`MemoryFs`] - In-memory backend (testing, scratch trees)
//! - [`LocalFs`] - Host directory backend (with path security)
//! - [`walk`] / [`render_tree`] - Traversal over any backend
//!
//! ## Design Decisions
//!
//! - **Identity is the full string**: `name` and `ext` are derived views.
//!   Two paths are equal iff their full strings are.
//! - **One error enum per operation**: an [`AddError`] cannot be mistaken
//!   for a [`RemoveError`]; callers match on variants, never on messages.
//! - **Index-addressed children**: `child(dir, idx)` for
//!   `idx in 0..children_count(dir)`. Indices may shift after any mutation.
//! - **Synchronous**: every call completes before returning. Backends hide
//!   their own latency strategy behind that contract.
//!
//! ```
//! use treefs::{Filesystem, MemoryFs};
//!
//! let fs = MemoryFs::new();
//! let notes = fs.add(&fs.root(), "notes/todo.md").unwrap();
//! fs.write(&notes, b"- ship it").unwrap();
//!
//! assert_eq!(notes.name(), "todo");
//! assert_eq!(notes.ext(), "md");
//! assert_eq!(fs.read(&notes).unwrap(), b"- ship it");
//! ```

pub mod backends;
pub mod config;
mod error;
mod ops;
pub mod path;
pub mod walk;

pub use backends::{LocalFs, MemoryFs};
pub use config::{ConfigError, FsConfig};
pub use error::{
    AddError, ChildError, ChildrenCountError, MoveError, ParentError, ReadError, RemoveError,
    RenameError, WriteError,
};
pub use ops::Filesystem;
pub use path::{Path, Separators};
pub use walk::{WalkError, render_tree, walk};
