//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveGitRepo};
use crate::adapters::recording::{RecordingClock, RecordingFileSystem, RecordingGitRepo};
use crate::adapters::replaying::{ReplayingClock, ReplayingFileSystem, ReplayingGitRepo};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::{Clock, FileSystem, GitRepo, PortResult};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying); everything downstream only sees the traits.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for workspace I/O.
    pub fs: Box<dyn FileSystem>,
    /// Git repository for version-control queries.
    pub git: Box<dyn GitRepo>,
}

impl ServiceContext {
    /// Creates a live context whose git commands run inside `root`.
    #[must_use]
    pub fn live(root: &Path) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            git: Box::new(LiveGitRepo::new(root)),
        }
    }

    /// Creates a recording context over live adapters.
    ///
    /// Cassettes land in `<dir>/<timestamp>/` once the returned session is
    /// finished; the context must be dropped before that.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(dir: &Path, root: &Path) -> Result<(Self, RecordingSession), String> {
        let commit = LiveGitRepo::new(root).current_commit().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read commit hash for recording, using 'unknown'");
            "unknown".to_string()
        });
        let session = RecordingSession::new(dir, &commit)?;
        let ctx = Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            fs: Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&session.fs))),
            git: Box::new(RecordingGitRepo::new(
                Box::new(LiveGitRepo::new(root)),
                Arc::clone(&session.git),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette file.
    ///
    /// Each port gets its own replayer over the same cassette, so per-port
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::replaying_cassette(&cassette))
    }

    /// Creates a replaying context from an in-memory cassette.
    #[must_use]
    pub fn replaying_cassette(cassette: &Cassette) -> Self {
        Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(cassette))),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(cassette))),
            git: Box::new(ReplayingGitRepo::new(CassetteReplayer::new(cassette))),
        }
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(Unconfigured),
            },
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(Unconfigured),
            },
            git: match replayers.git {
                Some(r) => Box::new(ReplayingGitRepo::new(r)),
                None => Box::new(Unconfigured),
            },
        })
    }
}

/// Stand-in for a port that has no cassette in per-port replay.
struct Unconfigured;

fn unconfigured(port: &str) -> ! {
    panic!("{port} port not configured in CassetteConfig: no cassette loaded for it");
}

impl Clock for Unconfigured {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        unconfigured("clock")
    }
}

impl FileSystem for Unconfigured {
    fn read_to_string(&self, _path: &Path) -> PortResult<String> {
        unconfigured("fs")
    }
    fn write(&self, _path: &Path, _contents: &str) -> PortResult<()> {
        unconfigured("fs")
    }
    fn exists(&self, _path: &Path) -> bool {
        unconfigured("fs")
    }
    fn walk(&self, _root: &Path, _skip_dirs: &[String]) -> PortResult<Vec<String>> {
        unconfigured("fs")
    }
}

impl GitRepo for Unconfigured {
    fn current_commit(&self) -> PortResult<String> {
        unconfigured("git")
    }
    fn changed_files(&self, _base: &str, _head: Option<&str>) -> PortResult<Vec<String>> {
        unconfigured("git")
    }
    fn list_files(&self, _path: &Path) -> PortResult<Vec<String>> {
        unconfigured("git")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn replaying_context_from_single_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&path, "full", "abc");
        recorder.record("clock", "now", json!(null), json!("2024-06-15T10:30:00Z"));
        recorder.record("git", "current_commit", json!(null), json!({"ok": "abc123"}));
        recorder.finish().unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.git.current_commit().unwrap(), "abc123");
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
    }

    #[test]
    fn replaying_from_per_port_cassettes() {
        let dir = tempfile::tempdir().unwrap();
        let clock_path = dir.path().join("clock.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&clock_path, "clock", "abc");
        recorder.record("clock", "now", json!(null), json!("2024-01-01T00:00:00Z"));
        recorder.finish().unwrap();

        let config = CassetteConfig { clock: Some(clock_path), ..CassetteConfig::default() };
        let ctx = ServiceContext::replaying_from(&config).unwrap();
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unconfigured_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::default()).unwrap();
        let _ = ctx.git.current_commit();
    }

    #[test]
    fn recording_context_writes_session_cassettes() {
        let workspace = tempfile::tempdir().unwrap();
        std::fs::write(workspace.path().join("index.ts"), "export {};\n").unwrap();
        let cassettes = tempfile::tempdir().unwrap();

        let (ctx, session) = ServiceContext::recording_at(cassettes.path(), workspace.path()).unwrap();
        let files = ctx.fs.walk(workspace.path(), &[]).unwrap();
        assert_eq!(files, vec!["index.ts"]);
        drop(ctx);

        let out = session.finish().unwrap();
        let replay = ServiceContext::replaying_from(&CassetteConfig::from_session_dir(&out)).unwrap();
        assert_eq!(replay.fs.walk(Path::new("/elsewhere"), &[]).unwrap(), vec!["index.ts"]);
    }
}
