//! `cairn history`: show the format history of one cache entry.

use cairn_layout::{CacheLayoutRegistry, LayoutId, Release};

use crate::registry::load_registry;
use crate::{GlobalArgs, HistoryArgs};

/// Runs the `cairn history` command.
pub fn run(args: &HistoryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = load_registry(global)?;
    let (id, entry) = registry
        .lookup(&args.entry)
        .and_then(|id| Some((id, registry.get(id)?)))
        .ok_or_else(|| format!("unknown cache entry '{}'", args.entry))?;

    for line in history_lines(&registry, id) {
        println!("{line}");
    }

    if let Some(ref label) = args.release {
        let release: Release = label.parse()?;
        match entry.history().version_used_by(&release) {
            Some(version) => println!("release {release} writes version {version}"),
            None => println!("release {release} predates {}", args.entry),
        }
    }
    Ok(0)
}

/// One line per history record, newest last, marking the version in use.
pub fn history_lines(registry: &CacheLayoutRegistry, id: LayoutId) -> Vec<String> {
    let entry = registry.entry(id);
    let latest = entry.effective_version();
    entry
        .history()
        .records()
        .iter()
        .map(|record| {
            let marker = if record.version == latest { " (current)" } else { "" };
            format!("{:>4}  {}{marker}", record.version, record.release)
        })
        .collect()
}
