use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{FrameSnapshot, RunSummary};
use serde::Serialize;

use super::scene::EditStats;
use super::ExplorerError;

/// JSON document written at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExplorerReport {
    pub(crate) run: RunSummary,
    pub(crate) edits: EditStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_frame: Option<FrameSnapshot>,
}

pub(crate) fn write_report(path: &Path, report: &ExplorerReport) -> Result<(), ExplorerError> {
    let mut text = serde_json::to_string_pretty(report).map_err(ExplorerError::EncodeSummary)?;
    text.push('\n');
    replace_via_staging(path, &text).map_err(|source| ExplorerError::WriteSummary {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `<path>.tmp` beside the target and renames it over `path`.
fn replace_via_staging(path: &Path, text: &str) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut staging = path.as_os_str().to_os_string();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, text)?;
    fs::rename(&staging, path).inspect_err(|_| {
        let _ = fs::remove_file(&staging);
    })
}

#[cfg(test)]
mod tests {
    use engine::{PlayerState, Vec2};

    use super::*;

    fn report() -> ExplorerReport {
        ExplorerReport {
            run: RunSummary {
                ticks: 12,
                frames: 12,
                moving_ticks: 10,
                blocked_ticks: 2,
                regenerations: 0,
                failed_regenerations: 0,
                seed: Some(3),
                world_width: 8,
                world_height: 6,
                object_count: 4,
                fingerprint: "ab".repeat(32),
                player: PlayerState::at(Vec2 { x: 40.0, y: 8.0 }),
                camera: Vec2::default(),
            },
            edits: EditStats::default(),
            last_frame: None,
        }
    }

    #[test]
    fn report_is_written_into_nested_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("runs").join("summary.json");

        write_report(&path, &report()).expect("write");

        let raw = fs::read_to_string(&path).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["run"]["ticks"], 12);
        assert_eq!(value["run"]["player"]["facing"], "down");
        assert_eq!(value["edits"]["objects_placed"], 0);
        assert!(value.get("last_frame").is_none());
        let leftovers: Vec<_> = fs::read_dir(path.parent().expect("runs dir"))
            .expect("list runs dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("summary.json")]);
    }

    #[test]
    fn existing_report_is_replaced() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("summary.json");
        fs::write(&path, "stale").expect("seed file");

        write_report(&path, &report()).expect("write");

        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.starts_with('{'));
    }
}
