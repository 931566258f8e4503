//! Local filesystem backend.
//!
//! Maps tree paths onto a host directory, with path security to prevent
//! escaping the root directory.

use std::fs;
use std::io;
use std::path::{Path as HostPath, PathBuf};

use crate::backends::parse_relative;
use crate::config::FsConfig;
use crate::error::{
    AddError, ChildError, ChildrenCountError, MoveError, ParentError, ReadError, RemoveError,
    RenameError, WriteError,
};
use crate::ops::Filesystem;
use crate::path::{Path, Separators, is_valid_segment};

/// Local filesystem backend.
///
/// The tree root `/` is the host directory `root`; `/src/main.rs` is
/// `<root>/src/main.rs`. Children are enumerated in ascending name order.
/// Host names that are not valid UTF-8 are listed lossily and cannot be
/// addressed.
///
/// Every call is a short sequence of blocking `std::fs` syscalls. Calls are
/// safe from several threads but not atomic against each other or against
/// other processes touching the same directory.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
    config: FsConfig,
}

impl LocalFs {
    /// Create a local filesystem rooted at the given directory.
    ///
    /// The root is canonicalized at construction time to handle symlinks
    /// (e.g. macOS `/tmp` → `/private/tmp`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, FsConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: FsConfig) -> Self {
        let root: PathBuf = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self { root, config }
    }

    /// The host directory backing the tree root.
    pub fn host_root(&self) -> &HostPath {
        &self.root
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    fn seps(&self) -> Separators {
        self.config.separators
    }

    /// Translate a canonical tree path to a host path, without touching disk.
    fn host_path(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_canonical() || path.separators() != self.seps() {
            return None;
        }
        let mut host = self.root.clone();
        for segment in path.segments() {
            if !is_valid_segment(segment, self.seps()) || segment.contains(std::path::is_separator)
            {
                return None;
            }
            host.push(segment);
        }
        Some(host)
    }

    /// Resolve a path that must exist and stay under the root.
    ///
    /// Symlinks are followed; one that leads outside the root is treated as
    /// missing.
    fn resolve(&self, path: &Path) -> Option<(PathBuf, fs::Metadata)> {
        let host = self.host_path(path)?;
        let meta = fs::metadata(&host).ok()?;
        let canonical = host.canonicalize().ok()?;
        if !canonical.starts_with(&self.root) {
            tracing::warn!(path = %path, host = %canonical.display(), "path escapes root");
            return None;
        }
        Some((host, meta))
    }

    /// True if an existing host path canonicalizes to somewhere under the root.
    fn within_root(&self, host: &HostPath) -> bool {
        match host.canonicalize() {
            Ok(canonical) if canonical.starts_with(&self.root) => true,
            Ok(canonical) => {
                tracing::warn!(host = %canonical.display(), "path escapes root");
                false
            }
            Err(_) => false,
        }
    }

    fn resolve_dir(&self, path: &Path) -> Option<PathBuf> {
        self.resolve(path)
            .and_then(|(host, meta)| meta.is_dir().then_some(host))
    }

    /// Directory entries sorted by name.
    fn sorted_names(dir: &HostPath) -> io::Result<Vec<String>> {
        let mut names = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn exists_on_host(host: &HostPath) -> bool {
        fs::symlink_metadata(host).is_ok()
    }

    /// True if `dest` is `source` or lies below it once symlinks are
    /// resolved. `source` itself is not followed.
    fn lands_inside(source: &HostPath, dest: &HostPath) -> bool {
        let (Some(dir), Some(name)) = (source.parent(), source.file_name()) else {
            return false;
        };
        match (dir.canonicalize(), dest.canonicalize()) {
            (Ok(dir), Ok(dest)) => dest.starts_with(dir.join(name)),
            _ => false,
        }
    }
}

/// Log a host failure before it is surfaced to the caller.
fn host_error(op: &str, path: &Path, e: io::Error) -> io::Error {
    tracing::warn!(op, path = %path, error = %e, "host I/O failure");
    e
}

impl Filesystem for LocalFs {
    fn root(&self) -> Path {
        Path::with_separators(self.seps().segment, self.seps())
    }

    fn parent(&self, path: &Path) -> Result<Path, ParentError> {
        if self.resolve(path).is_none() {
            return Err(ParentError::NotFound(path.clone()));
        }
        if path.is_root() {
            return Err(ParentError::IsRoot);
        }
        path.lexical_parent()
            .ok_or_else(|| ParentError::NotFound(path.clone()))
    }

    fn children_count(&self, path: &Path) -> Result<usize, ChildrenCountError> {
        let (host, meta) = self
            .resolve(path)
            .ok_or_else(|| ChildrenCountError::NotFound(path.clone()))?;
        if !meta.is_dir() {
            return Ok(0);
        }
        let names = Self::sorted_names(&host).map_err(|e| host_error("children_count", path, e))?;
        Ok(names.len())
    }

    fn child(&self, path: &Path, idx: usize) -> Result<Path, ChildError> {
        let (host, meta) = self
            .resolve(path)
            .ok_or_else(|| ChildError::NotFound(path.clone()))?;
        if !meta.is_dir() {
            return Err(ChildError::NotADirectory(path.clone()));
        }
        let names = Self::sorted_names(&host).map_err(|e| host_error("child", path, e))?;
        let name = names.get(idx).ok_or(ChildError::IndexOutOfRange {
            path: path.clone(),
            index: idx,
            count: names.len(),
        })?;
        Ok(path.join(name))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_some_and(|(_, meta)| meta.is_dir())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path).is_some_and(|(_, meta)| meta.is_file())
    }

    #[tracing::instrument(skip(self), name = "localfs.add")]
    fn add(&self, parent: &Path, relative_path: &str) -> Result<Path, AddError> {
        if self.config.read_only {
            return Err(AddError::ReadOnly);
        }
        let spec = parse_relative(relative_path, self.seps())?;
        if spec.segments.iter().any(|s| s.contains(std::path::is_separator)) {
            return Err(AddError::InvalidName(relative_path.to_string()));
        }
        let (mut host, meta) = self
            .resolve(parent)
            .ok_or_else(|| AddError::NotFound(parent.clone()))?;
        if !meta.is_dir() {
            return Err(AddError::NotADirectory(parent.clone()));
        }

        let (last, intermediate) = spec
            .segments
            .split_last()
            .ok_or_else(|| AddError::InvalidName(relative_path.to_string()))?;
        let mut current = parent.clone();
        for segment in intermediate {
            current = current.join(segment);
            host.push(segment);
            match fs::metadata(&host) {
                // A symlinked directory may point out of the root.
                Ok(meta) if meta.is_dir() => {
                    if !self.within_root(&host) {
                        return Err(AddError::NotFound(current));
                    }
                }
                Ok(_) => return Err(AddError::NotADirectory(current)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    fs::create_dir(&host).map_err(|e| host_error("add", &current, e))?;
                }
                Err(e) => return Err(host_error("add", &current, e).into()),
            }
        }

        let created = current.join(last);
        host.push(last);
        if Self::exists_on_host(&host) {
            return Err(AddError::AlreadyExists(created));
        }
        let result = if spec.is_dir {
            fs::create_dir(&host)
        } else {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&host)
                .map(|_| ())
        };
        match result {
            Ok(()) => {
                tracing::debug!(path = %created, dir = spec.is_dir, "added");
                Ok(created)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(AddError::AlreadyExists(created))
            }
            Err(e) => Err(host_error("add", &created, e).into()),
        }
    }

    #[tracing::instrument(skip(self), name = "localfs.remove")]
    fn remove(&self, path: &Path) -> Result<(), RemoveError> {
        if self.config.read_only {
            return Err(RemoveError::ReadOnly);
        }
        let (host, meta) = self
            .resolve(path)
            .ok_or_else(|| RemoveError::NotFound(path.clone()))?;
        if path.is_root() {
            return Err(RemoveError::IsRoot);
        }
        let result = if !meta.is_dir() {
            fs::remove_file(&host)
        } else if self.config.recursive_remove {
            fs::remove_dir_all(&host)
        } else {
            let mut entries = fs::read_dir(&host).map_err(|e| host_error("remove", path, e))?;
            if entries.next().is_some() {
                return Err(RemoveError::DirectoryNotEmpty(path.clone()));
            }
            fs::remove_dir(&host)
        };
        result.map_err(|e| host_error("remove", path, e))?;
        tracing::debug!(path = %path, "removed");
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "localfs.rename")]
    fn rename(&self, path: &Path, new_name: &str) -> Result<Path, RenameError> {
        if self.config.read_only {
            return Err(RenameError::ReadOnly);
        }
        if !is_valid_segment(new_name, self.seps()) || new_name.contains(std::path::is_separator) {
            return Err(RenameError::InvalidName(new_name.to_string()));
        }
        let (host, _) = self
            .resolve(path)
            .ok_or_else(|| RenameError::NotFound(path.clone()))?;
        if path.is_root() {
            return Err(RenameError::IsRoot);
        }
        if path.leaf() == new_name {
            return Ok(path.clone());
        }
        let renamed = path.with_leaf(new_name);
        let target = host.with_file_name(new_name);
        if Self::exists_on_host(&target) {
            return Err(RenameError::AlreadyExists(renamed));
        }
        fs::rename(&host, &target).map_err(|e| host_error("rename", path, e))?;
        tracing::debug!(to = %renamed, "renamed");
        Ok(renamed)
    }

    #[tracing::instrument(skip(self), name = "localfs.move")]
    fn move_to(&self, path: &Path, new_parent: &Path) -> Result<Path, MoveError> {
        if self.config.read_only {
            return Err(MoveError::ReadOnly);
        }
        let (host, _) = self
            .resolve(path)
            .ok_or_else(|| MoveError::NotFound(path.clone()))?;
        if path.is_root() {
            return Err(MoveError::IsRoot);
        }
        let (dest, dest_meta) = self
            .resolve(new_parent)
            .ok_or_else(|| MoveError::NotFound(new_parent.clone()))?;
        if !dest_meta.is_dir() {
            return Err(MoveError::NotADirectory(new_parent.clone()));
        }
        if path == new_parent || path.is_ancestor_of(new_parent) {
            return Err(MoveError::Cycle {
                path: path.clone(),
                new_parent: new_parent.clone(),
            });
        }
        if path.lexical_parent().as_ref() == Some(new_parent) {
            return Ok(path.clone());
        }
        if Self::lands_inside(&host, &dest) {
            return Err(MoveError::Cycle {
                path: path.clone(),
                new_parent: new_parent.clone(),
            });
        }
        let moved = new_parent.join(path.leaf());
        let target = dest.join(path.leaf());
        if Self::exists_on_host(&target) {
            return Err(MoveError::AlreadyExists(moved));
        }
        fs::rename(&host, &target).map_err(|e| host_error("move", path, e))?;
        tracing::debug!(to = %moved, "moved");
        Ok(moved)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        let (host, meta) = self
            .resolve(path)
            .ok_or_else(|| ReadError::NotFound(path.clone()))?;
        if meta.is_dir() {
            return Err(ReadError::IsADirectory(path.clone()));
        }
        fs::read(&host).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ReadError::NotFound(path.clone()),
            _ => host_error("read", path, e).into(),
        })
    }

    #[tracing::instrument(skip(self, buf), fields(len = buf.len()), name = "localfs.write")]
    fn write(&self, path: &Path, buf: &[u8]) -> Result<(), WriteError> {
        if self.config.read_only {
            return Err(WriteError::ReadOnly);
        }
        let host = match self.resolve(path) {
            Some((_, meta)) if meta.is_dir() => {
                return Err(WriteError::IsADirectory(path.clone()));
            }
            Some((host, _)) => host,
            None => self
                .creatable_host_path(path)
                .ok_or_else(|| WriteError::NotFound(path.clone()))?,
        };
        fs::write(&host, buf).map_err(|e| host_error("write", path, e))?;
        tracing::debug!("written");
        Ok(())
    }

    fn read_only(&self) -> bool {
        self.config.read_only
    }
}

impl LocalFs {
    /// Host path a `write` may create, when implicit creation is enabled.
    fn creatable_host_path(&self, path: &Path) -> Option<PathBuf> {
        if !self.config.create_on_write {
            return None;
        }
        let host = self.host_path(path)?;
        if Self::exists_on_host(&host) {
            // Present but unresolvable, e.g. a dangling or escaping symlink.
            return None;
        }
        let parent = path.lexical_parent()?;
        self.resolve_dir(&parent)?;
        Some(host)
    }
}
