//! In-memory filesystem backend.
//!
//! Used for testing and scratch trees. All data is ephemeral.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::backends::parse_relative;
use crate::config::FsConfig;
use crate::error::{
    AddError, ChildError, ChildrenCountError, MoveError, ParentError, ReadError, RemoveError,
    RenameError, WriteError,
};
use crate::ops::Filesystem;
use crate::path::{Path, Separators, is_valid_segment};

type NodeId = u64;

const ROOT: NodeId = 0;

#[derive(Debug)]
enum NodeKind {
    File(Vec<u8>),
    /// Child ids, kept sorted by child name.
    Directory(Vec<NodeId>),
}

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// Arena of nodes; only ever touched under the `MemoryFs` lock.
#[derive(Debug)]
struct Tree {
    nodes: HashMap<NodeId, Node>,
    next_id: NodeId,
    seps: Separators,
}

impl Tree {
    fn new(seps: Separators) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT,
            Node {
                name: String::new(),
                parent: None,
                kind: NodeKind::Directory(Vec::new()),
            },
        );
        Self {
            nodes,
            next_id: ROOT + 1,
            seps,
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        match &self.node(id)?.kind {
            NodeKind::Directory(children) => Some(children),
            NodeKind::File(_) => None,
        }
    }

    fn is_dir(&self, id: NodeId) -> bool {
        self.children(id).is_some()
    }

    fn name(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    /// Binary search a directory's children by name.
    ///
    /// `Ok` holds the index of the match, `Err` the insertion point.
    /// Returns `None` if `dir` is not a directory.
    fn search(&self, dir: NodeId, name: &str) -> Option<Result<usize, usize>> {
        let children = self.children(dir)?;
        Some(children.binary_search_by(|id| self.name(*id).cmp(name)))
    }

    fn find_child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        let idx = self.search(dir, name)?.ok()?;
        self.children(dir).map(|c| c[idx])
    }

    /// Resolve a canonical path to a node.
    ///
    /// A path built with other separators than the tree's names nothing.
    fn lookup(&self, path: &Path) -> Option<NodeId> {
        if !path.is_canonical() || path.separators() != self.seps {
            return None;
        }
        path.segments()
            .try_fold(ROOT, |dir, segment| self.find_child(dir, segment))
    }

    /// True if `ancestor` lies on the parent chain of `id` (or is `id`).
    fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    /// Allocate a node and link it into `dir` at its sorted position.
    ///
    /// The caller has already checked that `dir` is a directory with no
    /// child called `name`.
    fn attach_new(&mut self, dir: NodeId, name: &str, kind: NodeKind) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent: Some(dir),
                kind,
            },
        );
        self.link(dir, id);
        id
    }

    /// Insert an existing node into `dir`'s sorted child list.
    fn link(&mut self, dir: NodeId, id: NodeId) {
        let name = self.name(id).to_string();
        let pos = match self.search(dir, &name) {
            Some(Ok(pos)) | Some(Err(pos)) => pos,
            None => return,
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(dir);
        }
        if let Some(Node {
            kind: NodeKind::Directory(children),
            ..
        }) = self.nodes.get_mut(&dir)
        {
            children.insert(pos, id);
        }
    }

    /// Remove a node from its parent's child list.
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(Node {
            kind: NodeKind::Directory(children),
            ..
        }) = self.nodes.get_mut(&parent)
        {
            children.retain(|c| *c != id);
        }
    }

    /// Drop a node and everything below it from the arena.
    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                if let NodeKind::Directory(children) = node.kind {
                    stack.extend(children);
                }
            }
        }
    }
}

/// In-memory filesystem backend.
///
/// Thread-safe via an internal `RwLock`: each operation holds the lock for
/// its whole duration, so calls from different threads never observe a
/// half-applied mutation. All data is lost when dropped.
///
/// Children are enumerated in ascending order of their names.
#[derive(Debug)]
pub struct MemoryFs {
    tree: RwLock<Tree>,
    config: FsConfig,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty tree with default configuration.
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    pub fn with_config(config: FsConfig) -> Self {
        Self {
            tree: RwLock::new(Tree::new(config.separators)),
            config,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    fn seps(&self) -> Separators {
        self.config.separators
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.tree.read().nodes.len()
    }
}

impl Filesystem for MemoryFs {
    fn root(&self) -> Path {
        Path::with_separators(self.seps().segment, self.seps())
    }

    fn parent(&self, path: &Path) -> Result<Path, ParentError> {
        let tree = self.tree.read();
        let id = tree
            .lookup(path)
            .ok_or_else(|| ParentError::NotFound(path.clone()))?;
        if id == ROOT {
            return Err(ParentError::IsRoot);
        }
        path.lexical_parent()
            .ok_or_else(|| ParentError::NotFound(path.clone()))
    }

    fn children_count(&self, path: &Path) -> Result<usize, ChildrenCountError> {
        let tree = self.tree.read();
        let id = tree
            .lookup(path)
            .ok_or_else(|| ChildrenCountError::NotFound(path.clone()))?;
        Ok(tree.children(id).map_or(0, <[NodeId]>::len))
    }

    fn child(&self, path: &Path, idx: usize) -> Result<Path, ChildError> {
        let tree = self.tree.read();
        let id = tree
            .lookup(path)
            .ok_or_else(|| ChildError::NotFound(path.clone()))?;
        let children = tree
            .children(id)
            .ok_or_else(|| ChildError::NotADirectory(path.clone()))?;
        let child = children.get(idx).ok_or(ChildError::IndexOutOfRange {
            path: path.clone(),
            index: idx,
            count: children.len(),
        })?;
        Ok(path.join(tree.name(*child)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let tree = self.tree.read();
        tree.lookup(path).is_some_and(|id| tree.is_dir(id))
    }

    fn is_file(&self, path: &Path) -> bool {
        let tree = self.tree.read();
        tree.lookup(path).is_some_and(|id| !tree.is_dir(id))
    }

    fn add(&self, parent: &Path, relative_path: &str) -> Result<Path, AddError> {
        if self.config.read_only {
            return Err(AddError::ReadOnly);
        }
        let spec = parse_relative(relative_path, self.seps())?;

        let mut tree = self.tree.write();
        let mut dir = tree
            .lookup(parent)
            .ok_or_else(|| AddError::NotFound(parent.clone()))?;
        if !tree.is_dir(dir) {
            return Err(AddError::NotADirectory(parent.clone()));
        }

        // Every failure is detected before the first node is created: once a
        // segment is missing, everything after it is created fresh.
        let (last, intermediate) = spec
            .segments
            .split_last()
            .ok_or_else(|| AddError::InvalidName(relative_path.to_string()))?;
        let mut current = parent.clone();
        for segment in intermediate {
            current = current.join(segment);
            dir = match tree.find_child(dir, segment) {
                Some(id) if tree.is_dir(id) => id,
                Some(_) => return Err(AddError::NotADirectory(current)),
                None => tree.attach_new(dir, segment, NodeKind::Directory(Vec::new())),
            };
        }

        let created = current.join(last);
        if tree.find_child(dir, last).is_some() {
            return Err(AddError::AlreadyExists(created));
        }
        let kind = if spec.is_dir {
            NodeKind::Directory(Vec::new())
        } else {
            NodeKind::File(Vec::new())
        };
        tree.attach_new(dir, last, kind);
        tracing::debug!(path = %created, dir = spec.is_dir, "memfs.add");
        Ok(created)
    }

    fn remove(&self, path: &Path) -> Result<(), RemoveError> {
        if self.config.read_only {
            return Err(RemoveError::ReadOnly);
        }
        let mut tree = self.tree.write();
        let id = tree
            .lookup(path)
            .ok_or_else(|| RemoveError::NotFound(path.clone()))?;
        if id == ROOT {
            return Err(RemoveError::IsRoot);
        }
        let non_empty = tree.children(id).is_some_and(|c| !c.is_empty());
        if non_empty && !self.config.recursive_remove {
            return Err(RemoveError::DirectoryNotEmpty(path.clone()));
        }
        tree.unlink(id);
        tree.drop_subtree(id);
        tracing::debug!(path = %path, "memfs.remove");
        Ok(())
    }

    fn rename(&self, path: &Path, new_name: &str) -> Result<Path, RenameError> {
        if self.config.read_only {
            return Err(RenameError::ReadOnly);
        }
        if !is_valid_segment(new_name, self.seps()) {
            return Err(RenameError::InvalidName(new_name.to_string()));
        }
        let mut tree = self.tree.write();
        let id = tree
            .lookup(path)
            .ok_or_else(|| RenameError::NotFound(path.clone()))?;
        let parent = match tree.node(id).and_then(|n| n.parent) {
            Some(parent) => parent,
            None => return Err(RenameError::IsRoot),
        };
        if tree.name(id) == new_name {
            return Ok(path.clone());
        }
        let renamed = path.with_leaf(new_name);
        if tree.find_child(parent, new_name).is_some() {
            return Err(RenameError::AlreadyExists(renamed));
        }

        tree.unlink(id);
        if let Some(node) = tree.nodes.get_mut(&id) {
            node.name = new_name.to_string();
        }
        tree.link(parent, id);
        tracing::debug!(from = %path, to = %renamed, "memfs.rename");
        Ok(renamed)
    }

    fn move_to(&self, path: &Path, new_parent: &Path) -> Result<Path, MoveError> {
        if self.config.read_only {
            return Err(MoveError::ReadOnly);
        }
        let mut tree = self.tree.write();
        let id = tree
            .lookup(path)
            .ok_or_else(|| MoveError::NotFound(path.clone()))?;
        let old_parent = match tree.node(id).and_then(|n| n.parent) {
            Some(parent) => parent,
            None => return Err(MoveError::IsRoot),
        };
        let dest = tree
            .lookup(new_parent)
            .ok_or_else(|| MoveError::NotFound(new_parent.clone()))?;
        if !tree.is_dir(dest) {
            return Err(MoveError::NotADirectory(new_parent.clone()));
        }
        if tree.is_within(dest, id) {
            return Err(MoveError::Cycle {
                path: path.clone(),
                new_parent: new_parent.clone(),
            });
        }
        if dest == old_parent {
            return Ok(path.clone());
        }
        let name = tree.name(id).to_string();
        let moved = new_parent.join(&name);
        if tree.find_child(dest, &name).is_some() {
            return Err(MoveError::AlreadyExists(moved));
        }

        tree.unlink(id);
        tree.link(dest, id);
        tracing::debug!(from = %path, to = %moved, "memfs.move");
        Ok(moved)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        let tree = self.tree.read();
        let id = tree
            .lookup(path)
            .ok_or_else(|| ReadError::NotFound(path.clone()))?;
        match tree.node(id).map(|n| &n.kind) {
            Some(NodeKind::File(data)) => Ok(data.clone()),
            Some(NodeKind::Directory(_)) => Err(ReadError::IsADirectory(path.clone())),
            None => Err(ReadError::NotFound(path.clone())),
        }
    }

    fn write(&self, path: &Path, buf: &[u8]) -> Result<(), WriteError> {
        if self.config.read_only {
            return Err(WriteError::ReadOnly);
        }
        let mut tree = self.tree.write();
        let id = match tree.lookup(path) {
            Some(id) => id,
            None => {
                let dir = self
                    .creatable_parent(&tree, path)
                    .ok_or_else(|| WriteError::NotFound(path.clone()))?;
                let id = tree.attach_new(dir, path.leaf(), NodeKind::File(Vec::new()));
                tracing::debug!(path = %path, "memfs.write created file");
                id
            }
        };
        match tree.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::File(data)) => {
                data.clear();
                data.extend_from_slice(buf);
                tracing::debug!(path = %path, len = buf.len(), "memfs.write");
                Ok(())
            }
            Some(NodeKind::Directory(_)) => Err(WriteError::IsADirectory(path.clone())),
            None => Err(WriteError::NotFound(path.clone())),
        }
    }

    fn read_only(&self) -> bool {
        self.config.read_only
    }
}

impl MemoryFs {
    /// The directory a `write` may create `path` in, when implicit creation
    /// is enabled.
    fn creatable_parent(&self, tree: &Tree, path: &Path) -> Option<NodeId> {
        if !self.config.create_on_write
            || !path.is_canonical()
            || !is_valid_segment(path.leaf(), self.seps())
        {
            return None;
        }
        let dir = tree.lookup(&path.lexical_parent()?)?;
        if !tree.is_dir(dir) || tree.find_child(dir, path.leaf()).is_some() {
            return None;
        }
        Some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Path {
        Path::new(s)
    }

    #[test]
    fn test_empty_root() {
        let fs = MemoryFs::new();
        assert_eq!(fs.root(), p("/"));
        assert!(fs.is_dir(&fs.root()));
        assert_eq!(fs.children_count(&fs.root()).unwrap(), 0);
        assert!(matches!(fs.parent(&fs.root()), Err(ParentError::IsRoot)));
    }

    #[test]
    fn test_add_file_and_dir() {
        let fs = MemoryFs::new();
        let dir = fs.add(&fs.root(), "docs/").unwrap();
        assert_eq!(dir, p("/docs"));
        assert!(fs.is_dir(&dir));

        let file = fs.add(&dir, "readme.md").unwrap();
        assert_eq!(file, p("/docs/readme.md"));
        assert!(fs.is_file(&file));
        assert_eq!(fs.parent(&file).unwrap(), dir);
    }

    #[test]
    fn test_add_creates_intermediates() {
        let fs = MemoryFs::new();
        let leaf = fs.add(&fs.root(), "a/b/c.txt").unwrap();
        assert_eq!(leaf, p("/a/b/c.txt"));
        assert!(fs.is_dir(&p("/a")));
        assert!(fs.is_dir(&p("/a/b")));

        // Existing intermediates are reused.
        fs.add(&fs.root(), "a/b/d.txt").unwrap();
        assert_eq!(fs.children_count(&p("/a/b")).unwrap(), 2);
    }

    #[test]
    fn test_add_through_file_fails_without_side_effects() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "f").unwrap();
        let before = fs.node_count();
        let err = fs.add(&fs.root(), "f/x/y").unwrap_err();
        assert!(matches!(err, AddError::NotADirectory(ref at) if *at == p("/f")));
        assert_eq!(fs.node_count(), before);
    }

    #[test]
    fn test_add_errors() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "x").unwrap();
        assert!(matches!(
            fs.add(&fs.root(), "x"),
            Err(AddError::AlreadyExists(_))
        ));
        assert!(matches!(
            fs.add(&p("/x"), "y"),
            Err(AddError::NotADirectory(_))
        ));
        assert!(matches!(
            fs.add(&p("/missing"), "y"),
            Err(AddError::NotFound(_))
        ));
        assert!(matches!(
            fs.add(&fs.root(), ".."),
            Err(AddError::InvalidName(_))
        ));
    }

    #[test]
    fn test_children_sorted_by_name() {
        let fs = MemoryFs::new();
        for name in ["zeta", "alpha", "mid/"] {
            fs.add(&fs.root(), name).unwrap();
        }
        let children = fs.children(&fs.root()).unwrap();
        assert_eq!(children, vec![p("/alpha"), p("/mid"), p("/zeta")]);
    }

    #[test]
    fn test_child_out_of_range_and_on_file() {
        let fs = MemoryFs::new();
        let file = fs.add(&fs.root(), "f").unwrap();
        let count = fs.children_count(&fs.root()).unwrap();
        assert!(matches!(
            fs.child(&fs.root(), count),
            Err(ChildError::IndexOutOfRange { index: 1, count: 1, .. })
        ));
        assert!(matches!(
            fs.child(&file, 0),
            Err(ChildError::NotADirectory(_))
        ));
        assert_eq!(fs.children_count(&file).unwrap(), 0);
    }

    #[test]
    fn test_non_canonical_paths_do_not_exist() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "a/").unwrap();
        assert!(!fs.is_dir(&p("a")));
        assert!(!fs.is_dir(&p("/a/")));
        assert!(!fs.is_dir(&p("//a")));
        assert!(matches!(fs.parent(&p("")), Err(ParentError::NotFound(_))));
    }

    #[test]
    fn test_remove() {
        let fs = MemoryFs::new();
        let dir = fs.add(&fs.root(), "d/").unwrap();
        let file = fs.add(&dir, "f").unwrap();

        assert!(matches!(
            fs.remove(&dir),
            Err(RemoveError::DirectoryNotEmpty(_))
        ));
        fs.remove(&file).unwrap();
        assert!(!fs.exists(&file));
        assert_eq!(fs.children_count(&dir).unwrap(), 0);
        fs.remove(&dir).unwrap();
        assert!(matches!(fs.remove(&dir), Err(RemoveError::NotFound(_))));
        assert!(matches!(fs.remove(&fs.root()), Err(RemoveError::IsRoot)));
    }

    #[test]
    fn test_recursive_remove_frees_subtree() {
        let fs = MemoryFs::with_config(FsConfig::default().with_recursive_remove(true));
        fs.add(&fs.root(), "d/e/f.txt").unwrap();
        fs.add(&fs.root(), "keep").unwrap();
        fs.remove(&p("/d")).unwrap();
        assert!(!fs.exists(&p("/d/e/f.txt")));
        // root + keep
        assert_eq!(fs.node_count(), 2);
    }

    #[test]
    fn test_rename() {
        let fs = MemoryFs::new();
        let dir = fs.add(&fs.root(), "d/").unwrap();
        let file = fs.add(&dir, "old.txt").unwrap();
        fs.write(&file, b"content").unwrap();
        fs.add(&dir, "taken").unwrap();

        let renamed = fs.rename(&file, "new.txt").unwrap();
        assert_eq!(renamed, p("/d/new.txt"));
        assert_eq!(fs.parent(&renamed).unwrap(), dir);
        assert!(!fs.exists(&file));
        assert_eq!(fs.read(&renamed).unwrap(), b"content");

        assert!(matches!(
            fs.rename(&renamed, "taken"),
            Err(RenameError::AlreadyExists(_))
        ));
        assert!(matches!(
            fs.rename(&renamed, "a/b"),
            Err(RenameError::InvalidName(_))
        ));
        assert!(matches!(fs.rename(&fs.root(), "x"), Err(RenameError::IsRoot)));
        assert_eq!(fs.rename(&renamed, "new.txt").unwrap(), renamed);
    }

    #[test]
    fn test_rename_directory_carries_subtree() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "src/lib.rs").unwrap();
        let renamed = fs.rename(&p("/src"), "source").unwrap();
        assert!(fs.is_file(&renamed.join("lib.rs")));
        assert!(!fs.exists(&p("/src/lib.rs")));
    }

    #[test]
    fn test_move() {
        let fs = MemoryFs::new();
        let a = fs.add(&fs.root(), "a/").unwrap();
        let b = fs.add(&a, "b/").unwrap();
        let f = fs.add(&fs.root(), "f.txt").unwrap();

        let moved = fs.move_to(&f, &b).unwrap();
        assert_eq!(moved, p("/a/b/f.txt"));
        assert_eq!(fs.parent(&moved).unwrap(), b);

        assert!(matches!(fs.move_to(&a, &b), Err(MoveError::Cycle { .. })));
        assert!(matches!(fs.move_to(&a, &a), Err(MoveError::Cycle { .. })));
        assert!(matches!(
            fs.move_to(&a, &moved),
            Err(MoveError::NotADirectory(_))
        ));
        assert!(matches!(fs.move_to(&fs.root(), &a), Err(MoveError::IsRoot)));
        assert_eq!(fs.move_to(&b, &a).unwrap(), b);
    }

    #[test]
    fn test_move_collision() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "x").unwrap();
        fs.add(&fs.root(), "d/x").unwrap();
        assert!(matches!(
            fs.move_to(&p("/x"), &p("/d")),
            Err(MoveError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_read_write() {
        let fs = MemoryFs::new();
        let f = fs.add(&fs.root(), "f").unwrap();
        assert_eq!(fs.read(&f).unwrap(), b"");
        fs.write(&f, b"hello world").unwrap();
        fs.write(&f, b"short").unwrap();
        assert_eq!(fs.read(&f).unwrap(), b"short");

        assert!(matches!(
            fs.read(&fs.root()),
            Err(ReadError::IsADirectory(_))
        ));
        assert!(matches!(
            fs.write(&fs.root(), b"x"),
            Err(WriteError::IsADirectory(_))
        ));
        assert!(matches!(
            fs.write(&p("/missing"), b"x"),
            Err(WriteError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_on_write() {
        let fs = MemoryFs::with_config(FsConfig::default().with_create_on_write(true));
        fs.write(&p("/new.txt"), b"hi").unwrap();
        assert_eq!(fs.read(&p("/new.txt")).unwrap(), b"hi");
        // Parent must already exist.
        assert!(matches!(
            fs.write(&p("/no/such.txt"), b"x"),
            Err(WriteError::NotFound(_))
        ));

        // Another spelling of an existing name must not create a sibling.
        assert!(matches!(
            fs.write(&p("//new.txt"), b"dup"),
            Err(WriteError::NotFound(_))
        ));
        assert_eq!(fs.children(&fs.root()).unwrap(), vec![p("/new.txt")]);
        assert_eq!(fs.read(&p("/new.txt")).unwrap(), b"hi");
    }

    #[test]
    fn test_read_only() {
        let fs = MemoryFs::with_config(FsConfig::default().with_read_only(true));
        assert!(fs.read_only());
        assert!(matches!(fs.add(&fs.root(), "x"), Err(AddError::ReadOnly)));
        assert!(matches!(
            fs.write(&p("/x"), b""),
            Err(WriteError::ReadOnly)
        ));
    }

    #[test]
    fn test_custom_separators() {
        let seps = Separators {
            segment: ':',
            extension: '.',
        };
        let fs = MemoryFs::with_config(FsConfig::default().with_separators(seps));
        assert_eq!(fs.root().path(), ":");
        let f = fs.add(&fs.root(), "a:b.txt").unwrap();
        assert_eq!(f.path(), ":a:b.txt");
        assert_eq!(f.ext(), "txt");
        assert_eq!(fs.parent(&f).unwrap().path(), ":a");

        // Paths spelled with the default separators name nothing here.
        let foreign = p("/a");
        assert!(!fs.exists(&foreign));
        assert!(matches!(fs.parent(&foreign), Err(ParentError::NotFound(_))));
        assert!(matches!(
            fs.children_count(&foreign),
            Err(ChildrenCountError::NotFound(_))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let fs = Arc::new(MemoryFs::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let fs = Arc::clone(&fs);
                std::thread::spawn(move || {
                    let f = fs.add(&fs.root(), &format!("f{i}")).unwrap();
                    fs.write(&f, format!("{i}").as_bytes()).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(fs.children_count(&fs.root()).unwrap(), 8);
        assert_eq!(fs.read(&p("/f3")).unwrap(), b"3");
    }
}
