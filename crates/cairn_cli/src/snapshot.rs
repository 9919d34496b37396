//! `cairn snapshot`: snapshot a directory and print its hashes.

use cairn_snapshot::{
    CollectedEntry, Excluding, FileType, RelativePathCollector, SnapshotBuilder, SnapshotNode,
};
use serde::Serialize;

use crate::walk::snapshot_path;
use crate::{GlobalArgs, ReportFormat, SnapshotArgs};

/// JSON form of a snapshot report.
#[derive(Debug, Serialize)]
struct SnapshotReport {
    root: String,
    tree_hash: String,
    entries: Vec<ReportEntry>,
}

#[derive(Debug, Serialize)]
struct ReportEntry {
    path: String,
    kind: String,
    hash: String,
}

/// Runs the `cairn snapshot` command.
pub fn run(args: &SnapshotArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let full = snapshot_path(&args.path)?;
    let tree = prune(&full, &args.exclude)?;
    let entries = collect(&tree);

    match args.format {
        ReportFormat::Json => {
            let report = SnapshotReport {
                root: tree.path().display().to_string(),
                tree_hash: tree.hash().to_string(),
                entries: entries
                    .iter()
                    .map(|entry| ReportEntry {
                        path: entry.relative_path.clone(),
                        kind: entry.file_type.to_string(),
                        hash: entry.hash.to_string(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => {
            for entry in &entries {
                match entry.file_type {
                    FileType::Missing => println!("{:<32} {}", "(missing)", entry.relative_path),
                    _ => println!("{} {}", entry.hash, entry.relative_path),
                }
            }
            if !global.quiet {
                eprintln!("    Snapshot {} ({} entries)", tree.path().display(), entries.len());
                eprintln!("   Tree hash {}", tree.hash());
            }
        }
    }
    Ok(0)
}

/// Copies `tree` without the directories named in `excluded`.
fn prune(tree: &SnapshotNode, excluded: &[String]) -> Result<SnapshotNode, Box<dyn std::error::Error>> {
    if excluded.is_empty() {
        return Ok(tree.clone());
    }
    let mut visitor = Excluding::new(SnapshotBuilder::new(), |name: &str| {
        excluded.iter().any(|e| e == name)
    });
    tree.accept(&mut visitor)?;
    Ok(visitor.into_inner().finish()?)
}

fn collect(tree: &SnapshotNode) -> Vec<CollectedEntry> {
    let mut collector = RelativePathCollector::new();
    match tree.accept(&mut collector) {
        Ok(()) => collector.into_entries(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_common::ContentHash;

    fn sample() -> SnapshotNode {
        SnapshotNode::directory(
            "/p",
            vec![
                SnapshotNode::file("/p/a.rs", ContentHash::from_bytes(b"a")),
                SnapshotNode::directory(
                    "/p/target",
                    vec![SnapshotNode::file("/p/target/x", ContentHash::from_bytes(b"x"))],
                ),
            ],
        )
    }

    #[test]
    fn prune_without_excludes_is_identity() {
        let tree = sample();
        assert_eq!(prune(&tree, &[]).unwrap(), tree);
    }

    #[test]
    fn prune_drops_excluded_directories() {
        let pruned = prune(&sample(), &["target".to_string()]).unwrap();
        let paths: Vec<_> = collect(&pruned)
            .into_iter()
            .map(|e| e.relative_path)
            .collect();
        assert_eq!(paths, vec!["a.rs"]);
    }

    #[test]
    fn excluding_the_root_fails() {
        assert!(prune(&sample(), &["p".to_string()]).is_err());
    }
}
