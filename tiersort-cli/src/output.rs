/// Output formatting: tier listings and snapshot files.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tiersort_core::{Snapshot, Stats, Tier};

/// Listing of every tier, or of one tier, best entry first.
pub fn format_list(stats: &Stats, only: Option<Tier>) -> Vec<String> {
    let mut lines = Vec::new();
    for tier in Tier::ALL {
        if only.is_some_and(|t| t != tier) {
            continue;
        }
        let entries = stats.tier(tier);
        lines.push(format!("{tier}-tier ({}):", entries.len()));
        let width = entries.len().to_string().len();
        for entry in entries {
            lines.push(format!(
                "  {:>width$}. #{} {} [{}]",
                entry.rank() + 1,
                entry.number(),
                entry.title(),
                entry.topic(),
            ));
        }
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// File name for a snapshot taken at `unix_seconds`.
pub fn snapshot_file_name(unix_seconds: u64) -> String {
    format!("tiersort-{unix_seconds}.json")
}

/// Write `snapshot` as pretty JSON into `dir`, named after the current time.
pub fn write_snapshot_to_dir(snapshot: &Snapshot, dir: &Path) -> Result<PathBuf, String> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System clock is before 1970: {e}"))?
        .as_secs();
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create directory {}: {e}", dir.display()))?;
    let path = dir.join(snapshot_file_name(seconds));
    write_snapshot(snapshot, &path)?;
    Ok(path)
}

/// Write `snapshot` as pretty JSON to `path`.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| format!("Failed to serialize snapshot: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
