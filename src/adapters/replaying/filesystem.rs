//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{FileSystem, PortResult};

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> PortResult<String> {
        replay_result(next_output(&self.replayer, "fs", "read_to_string"), "fs::read_to_string")
    }

    fn write(&self, _path: &Path, _contents: &str) -> PortResult<()> {
        replay_result(next_output(&self.replayer, "fs", "write"), "fs::write")
    }

    fn exists(&self, _path: &Path) -> bool {
        next_output(&self.replayer, "fs", "exists")
            .as_bool()
            .expect("fs::exists: expected boolean output")
    }

    fn walk(&self, _root: &Path, _skip_dirs: &[String]) -> PortResult<Vec<String>> {
        replay_result(next_output(&self.replayer, "fs", "walk"), "fs::walk")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<(&str, serde_json::Value)>) -> CassetteReplayer {
        let interactions = interactions
            .into_iter()
            .enumerate()
            .map(|(seq, (method, output))| Interaction {
                seq: seq as u64,
                port: "fs".into(),
                method: method.into(),
                input: json!({}),
                output,
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        })
    }

    #[test]
    fn replays_reads_in_order() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![
            ("read_to_string", json!({"ok": "import './b';"})),
            ("read_to_string", json!({"ok": "export const b = 1;"})),
        ]));
        assert_eq!(fs.read_to_string(Path::new("/repo/a.ts")).unwrap(), "import './b';");
        assert_eq!(fs.read_to_string(Path::new("/repo/b.ts")).unwrap(), "export const b = 1;");
    }

    #[test]
    fn replays_read_error() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![(
            "read_to_string",
            json!({"err": "No such file or directory"}),
        )]));
        let err = fs.read_to_string(Path::new("/missing")).unwrap_err();
        assert!(err.to_string().contains("No such file"));
    }

    #[test]
    fn replays_exists_and_walk() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![
            ("exists", json!(false)),
            ("walk", json!({"ok": ["services/web/src/app.tsx"]})),
        ]));
        assert!(!fs.exists(Path::new("/repo/ripple.yaml")));
        assert_eq!(fs.walk(Path::new("/repo"), &[]).unwrap(), vec!["services/web/src/app.tsx"]);
    }
}
