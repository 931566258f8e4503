//! treefs command-line front end.
//!
//! Usage:
//!   # Inspect a directory through the local backend
//!   cargo run -p treefs-cli -- --root ./some/dir tree
//!   cargo run -p treefs-cli -- --root ./some/dir add / notes/todo.md
//!   echo hello | cargo run -p treefs-cli -- --root ./some/dir write notes/todo.md
//!
//!   # Without --root, commands run against an empty in-memory tree
//!   cargo run -p treefs-cli -- tree
//!
//! Paths may omit the leading separator: `notes/todo.md` means
//! `/notes/todo.md`.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use treefs::{Filesystem, FsConfig, LocalFs, MemoryFs, Path, render_tree};

/// Browse and edit a tree through a treefs backend.
#[derive(Parser, Debug)]
#[command(name = "treefs")]
#[command(about = "Browse and edit a tree through a treefs backend")]
struct Args {
    /// Host directory to serve as the tree root (in-memory tree if omitted)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// TOML file with backend configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree below a path
    Tree {
        #[arg(default_value = "/")]
        path: String,

        /// Levels below the path to show
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// List the children of a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a file's content
    Cat { path: String },
    /// Create an entry below a directory (trailing `/` makes a directory)
    Add { parent: String, relative: String },
    /// Remove a file or directory
    Rm { path: String },
    /// Give an entry a new name in the same directory
    Rename { path: String, new_name: String },
    /// Move an entry into another directory
    Mv { path: String, new_parent: String },
    /// Replace a file's content with stdin
    Write { path: String },
    /// Show what a path is
    Stat { path: String },
}

fn main() -> Result<()> {
    // Logs go to stderr so `cat` output stays clean.
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FsConfig::default(),
    };

    let fs: Box<dyn Filesystem> = match &args.root {
        Some(root) => {
            anyhow::ensure!(root.is_dir(), "root {} is not a directory", root.display());
            tracing::info!(root = %root.display(), "using local backend");
            Box::new(LocalFs::with_config(root, config))
        }
        None => {
            tracing::info!("using in-memory backend");
            Box::new(MemoryFs::with_config(config))
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(fs.as_ref(), args.command, &mut io::stdin().lock(), &mut out)
}

/// Resolve a user-typed path against the backend's root.
fn tree_path(fs: &dyn Filesystem, raw: &str) -> Path {
    let sep = fs.separators().segment;
    let trimmed = raw.trim_end_matches(sep);
    if trimmed.is_empty() {
        return fs.root();
    }
    if trimmed.starts_with(sep) {
        Path::with_separators(trimmed, fs.separators())
    } else {
        fs.root().join(trimmed)
    }
}

fn run(
    fs: &dyn Filesystem,
    command: Command,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Tree { path, depth } => {
            let path = tree_path(fs, &path);
            for line in render_tree(fs, &path, depth)? {
                writeln!(out, "{line}")?;
            }
        }
        Command::Ls { path } => {
            let path = tree_path(fs, &path);
            let sep = fs.separators().segment;
            for child in fs.children(&path)? {
                if fs.is_dir(&child) {
                    writeln!(out, "{}{sep}", child.leaf())?;
                } else {
                    writeln!(out, "{}", child.leaf())?;
                }
            }
        }
        Command::Cat { path } => {
            let path = tree_path(fs, &path);
            out.write_all(&fs.read(&path)?)?;
        }
        Command::Add { parent, relative } => {
            let parent = tree_path(fs, &parent);
            let created = fs
                .add(&parent, &relative)
                .with_context(|| format!("adding {relative:?} under {parent}"))?;
            writeln!(out, "{created}")?;
        }
        Command::Rm { path } => {
            let path = tree_path(fs, &path);
            fs.remove(&path)?;
        }
        Command::Rename { path, new_name } => {
            let path = tree_path(fs, &path);
            writeln!(out, "{}", fs.rename(&path, &new_name)?)?;
        }
        Command::Mv { path, new_parent } => {
            let path = tree_path(fs, &path);
            let new_parent = tree_path(fs, &new_parent);
            writeln!(out, "{}", fs.move_to(&path, &new_parent)?)?;
        }
        Command::Write { path } => {
            let path = tree_path(fs, &path);
            let mut buf = Vec::new();
            input.read_to_end(&mut buf).context("reading stdin")?;
            fs.write(&path, &buf)?;
        }
        Command::Stat { path } => {
            let path = tree_path(fs, &path);
            let kind = if fs.is_dir(&path) {
                "directory"
            } else if fs.is_file(&path) {
                "file"
            } else {
                anyhow::bail!("not found: {path}");
            };
            writeln!(out, "path: {}", path.path())?;
            writeln!(out, "name: {}", path.name())?;
            writeln!(out, "ext:  {}", path.ext())?;
            writeln!(out, "kind: {kind}")?;
            if fs.is_dir(&path) {
                writeln!(out, "children: {}", fs.children_count(&path)?)?;
            } else {
                writeln!(out, "size: {}", fs.read(&path)?.len())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec(fs: &dyn Filesystem, command: Command, stdin: &[u8]) -> Result<String> {
        let mut input = stdin;
        let mut out = Vec::new();
        run(fs, command, &mut input, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_tree_path() {
        let fs = MemoryFs::new();
        assert_eq!(tree_path(&fs, "/"), Path::new("/"));
        assert_eq!(tree_path(&fs, ""), Path::new("/"));
        assert_eq!(tree_path(&fs, "a/b"), Path::new("/a/b"));
        assert_eq!(tree_path(&fs, "/a/b/"), Path::new("/a/b"));
    }

    #[test]
    fn test_add_write_cat() {
        let fs = MemoryFs::new();
        let created = exec(
            &fs,
            Command::Add {
                parent: "/".into(),
                relative: "notes/todo.md".into(),
            },
            b"",
        )
        .unwrap();
        assert_eq!(created, "/notes/todo.md\n");

        exec(
            &fs,
            Command::Write {
                path: "notes/todo.md".into(),
            },
            b"- ship it\n",
        )
        .unwrap();
        let content = exec(
            &fs,
            Command::Cat {
                path: "notes/todo.md".into(),
            },
            b"",
        )
        .unwrap();
        assert_eq!(content, "- ship it\n");
    }

    #[test]
    fn test_ls_and_tree() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "src/main.rs").unwrap();
        fs.add(&fs.root(), "README").unwrap();

        let listing = exec(&fs, Command::Ls { path: "/".into() }, b"").unwrap();
        assert_eq!(listing, "README\nsrc/\n");

        let tree = exec(
            &fs,
            Command::Tree {
                path: "/".into(),
                depth: None,
            },
            b"",
        )
        .unwrap();
        assert_eq!(tree, "/\n├─ README\n└─ src/\n   └─ main.rs\n");
    }

    #[test]
    fn test_stat() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "archive.tar.gz").unwrap();
        let stat = exec(
            &fs,
            Command::Stat {
                path: "archive.tar.gz".into(),
            },
            b"",
        )
        .unwrap();
        assert!(stat.contains("name: archive.tar\n"));
        assert!(stat.contains("ext:  gz\n"));
        assert!(stat.contains("kind: file\n"));

        assert!(exec(&fs, Command::Stat { path: "nope".into() }, b"").is_err());
    }

    #[test]
    fn test_errors_surface() {
        let fs = MemoryFs::new();
        fs.add(&fs.root(), "a/").unwrap();
        fs.add(&fs.root(), "a/b/").unwrap();
        let err = exec(
            &fs,
            Command::Mv {
                path: "a".into(),
                new_parent: "a/b".into(),
            },
            b"",
        )
        .unwrap_err();
        assert!(err.to_string().contains("own subtree"));
    }

    #[test]
    fn test_against_local_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let fs = LocalFs::new(dir.path());
        exec(
            &fs,
            Command::Add {
                parent: "/".into(),
                relative: "x.txt".into(),
            },
            b"",
        )
        .unwrap();
        exec(&fs, Command::Rename { path: "x.txt".into(), new_name: "y.txt".into() }, b"")
            .unwrap();
        assert!(dir.path().join("y.txt").is_file());
        exec(&fs, Command::Rm { path: "y.txt".into() }, b"").unwrap();
        assert!(!dir.path().join("y.txt").exists());
    }
}
