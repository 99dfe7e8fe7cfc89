// crates/framecut-editor/src/project_io.rs
//
// Project documents on disk: a ProjectState serialised as JSON. Used by the
// CLI and for offline fixtures; the live editor goes through ProjectStore.

use std::path::Path;
use anyhow::{Context, Result};
use log::info;
use framecut_core::state::ProjectState;

/// Read a project document. Track order is normalised on load.
pub fn load_project(path: &Path) -> Result<ProjectState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading project {}", path.display()))?;
    let mut state: ProjectState = serde_json::from_str(&text)
        .with_context(|| format!("parsing project {}", path.display()))?;
    state.normalize_order();
    info!("[project] loaded {} ({} tracks)", path.display(), state.tracks.len());
    Ok(state)
}

pub fn save_project(path: &Path, state: &ProjectState) -> Result<()> {
    let text = serde_json::to_string_pretty(state).context("serialising project")?;
    std::fs::write(path, text)
        .with_context(|| format!("writing project {}", path.display()))?;
    info!("[project] saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use framecut_core::state::{Clip, TrackKind};

    #[test]
    fn save_then_load_keeps_tracks_and_clips() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");

        let mut s = ProjectState::new(Uuid::new_v4());
        let t = s.add_track(TrackKind::Text);
        s.insert_clip(t, Clip::text(t, "hello", 1.0, 2.0)).unwrap();
        save_project(&path, &s).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.project_id, s.project_id);
        assert_eq!(loaded.tracks, s.tracks);
    }

    #[test]
    fn out_of_order_tracks_are_renumbered() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");

        let mut s = ProjectState::new(Uuid::nil());
        s.add_track(TrackKind::Video);
        s.add_track(TrackKind::Audio);
        s.tracks[0].order = 7;
        save_project(&path, &s).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.tracks[0].kind, TrackKind::Audio);
        assert_eq!(loaded.tracks.iter().map(|t| t.order).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn garbage_reports_the_path() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load_project(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }
}
