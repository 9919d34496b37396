//! A minimal filesystem walker producing snapshot trees.
//!
//! Entries are visited in file-name order so snapshots of the same content
//! are identical across platforms. Symbolic links are followed unless they
//! lead back to a directory that is still being walked; such links, and
//! anything that is neither a readable file nor a directory, are recorded as
//! missing.

use std::path::{Path, PathBuf};

use cairn_common::ContentHash;
use cairn_snapshot::{SnapshotBuilder, SnapshotNode};

/// Snapshots the file or directory at `root`.
///
/// A non-existent `root` yields a single missing node.
pub fn snapshot_path(root: &Path) -> Result<SnapshotNode, Box<dyn std::error::Error>> {
    let root = if root.exists() {
        std::fs::canonicalize(root)?
    } else {
        std::env::current_dir()?.join(root)
    };

    let mut builder = SnapshotBuilder::new();
    let mut open_dirs = Vec::new();
    walk(&root, &mut builder, &mut open_dirs)?;
    Ok(builder.finish()?)
}

/// `open_dirs` holds the real paths of the directories currently entered.
fn walk(
    path: &Path,
    builder: &mut SnapshotBuilder,
    open_dirs: &mut Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if path.is_dir() {
        let is_link = std::fs::symlink_metadata(path)?.file_type().is_symlink();
        let real = match (open_dirs.last(), path.file_name()) {
            (Some(parent), Some(file_name)) if !is_link => parent.join(file_name),
            _ => std::fs::canonicalize(path)?,
        };
        if open_dirs.contains(&real) {
            tracing::warn!(
                target = "cairn.walk",
                path = %path.display(),
                target_dir = %real.display(),
                "not following symlink back into a directory being walked"
            );
            builder.add_missing(path, name)?;
            return Ok(());
        }

        builder.enter_directory(path, name)?;
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();
        open_dirs.push(real);
        for entry in &entries {
            walk(entry, builder, open_dirs)?;
        }
        open_dirs.pop();
        builder.leave_directory()?;
    } else if path.is_file() {
        let content = std::fs::read(path)?;
        builder.add_file(path, name, ContentHash::from_bytes(&content))?;
    } else {
        builder.add_missing(path, name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_snapshot::FileType;

    #[test]
    fn snapshots_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("a.txt"), "a").unwrap();

        let root = snapshot_path(dir.path()).unwrap();
        let root_dir = root.as_directory().unwrap();
        let names: Vec<_> = root_dir.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["b.txt", "sub"]);
        let sub = root_dir.child("sub").and_then(|c| c.as_directory()).unwrap();
        assert_eq!(sub.children()[0].hash(), ContentHash::from_bytes(b"a"));
    }

    #[test]
    fn missing_root_is_missing_node() {
        let dir = tempfile::tempdir().unwrap();
        let root = snapshot_path(&dir.path().join("absent")).unwrap();
        assert_eq!(root.file_type(), FileType::Missing);
        assert_eq!(root.name(), "absent");
    }

    #[test]
    fn content_change_changes_tree_hash() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "one").unwrap();
        let before = snapshot_path(dir.path()).unwrap();
        std::fs::write(&file, "two").unwrap();
        let after = snapshot_path(dir.path()).unwrap();
        assert_ne!(before.hash(), after.hash());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycles_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        symlink(".", dir.path().join("l1")).unwrap();
        symlink(".", dir.path().join("l2")).unwrap();

        let root = snapshot_path(dir.path()).unwrap();
        let root_dir = root.as_directory().unwrap();
        let names: Vec<_> = root_dir.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a.txt", "l1", "l2"]);
        assert_eq!(root_dir.child("l1").unwrap().file_type(), FileType::Missing);
        assert_eq!(root_dir.child("l2").unwrap().file_type(), FileType::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_sibling_directory_is_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("a.txt"), "a").unwrap();
        symlink("sub", dir.path().join("alias")).unwrap();

        let root = snapshot_path(dir.path()).unwrap();
        let alias = root
            .as_directory()
            .and_then(|d| d.child("alias"))
            .and_then(|c| c.as_directory())
            .unwrap();
        assert_eq!(alias.children()[0].hash(), ContentHash::from_bytes(b"a"));
    }

    #[test]
    fn unchanged_tree_hashes_equal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "same").unwrap();
        let first = snapshot_path(dir.path()).unwrap();
        let second = snapshot_path(dir.path()).unwrap();
        assert_eq!(first, second);
    }
}
