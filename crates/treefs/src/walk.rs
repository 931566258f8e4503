//! Traversal helpers built only on the navigation operations, so they work
//! against any backend.

use thiserror::Error;

use crate::error::{ChildError, ChildrenCountError};
use crate::ops::Filesystem;
use crate::path::Path;

/// Failure while traversing a tree.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    ChildrenCount(#[from] ChildrenCountError),

    #[error(transparent)]
    Child(#[from] ChildError),
}

/// Every path from `start` down, depth-first pre-order, children in
/// enumeration order. `start` itself comes first.
pub fn walk<F: Filesystem + ?Sized>(fs: &F, start: &Path) -> Result<Vec<Path>, WalkError> {
    let mut out = Vec::new();
    let mut stack = vec![start.clone()];
    while let Some(path) = stack.pop() {
        let count = fs.children_count(&path)?;
        // Push in reverse so index 0 is visited first.
        for idx in (0..count).rev() {
            stack.push(fs.child(&path, idx)?);
        }
        out.push(path);
    }
    Ok(out)
}

/// Render the tree under `start` as ASCII lines.
///
/// Directories carry a trailing segment separator. `max_depth` limits how
/// many levels below `start` are shown.
pub fn render_tree<F: Filesystem + ?Sized>(
    fs: &F,
    start: &Path,
    max_depth: Option<usize>,
) -> Result<Vec<String>, WalkError> {
    let mut lines = vec![label(fs, start, start.path())];
    render_children(fs, start, "", 1, max_depth, &mut lines)?;
    Ok(lines)
}

fn render_children<F: Filesystem + ?Sized>(
    fs: &F,
    dir: &Path,
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
    lines: &mut Vec<String>,
) -> Result<(), WalkError> {
    if max_depth.is_some_and(|max| depth > max) {
        return Ok(());
    }
    let count = fs.children_count(dir)?;
    for idx in 0..count {
        let child = fs.child(dir, idx)?;
        let is_last = idx + 1 == count;
        let connector = if is_last { "└─ " } else { "├─ " };
        lines.push(format!("{prefix}{connector}{}", label(fs, &child, child.leaf())));

        if fs.is_dir(&child) {
            let child_prefix = if is_last {
                format!("{prefix}   ")
            } else {
                format!("{prefix}│  ")
            };
            render_children(fs, &child, &child_prefix, depth + 1, max_depth, lines)?;
        }
    }
    Ok(())
}

fn label<F: Filesystem + ?Sized>(fs: &F, path: &Path, text: &str) -> String {
    let sep = fs.separators().segment;
    if fs.is_dir(path) && !text.ends_with(sep) {
        format!("{text}{sep}")
    } else {
        text.to_string()
    }
}
