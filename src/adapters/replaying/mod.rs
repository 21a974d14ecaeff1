//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod git;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use git::ReplayingGitRepo;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortResult;

/// Pulls the next output for `port::method` out of a shared replayer.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    replayer.lock().expect("replayer lock poisoned").next_output(port, method)
}

/// Decodes a recorded `{"ok": v}` / `{"err": msg}` output.
///
/// Outputs without either key are treated as a bare `ok` value, which keeps
/// hand-written cassettes short.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> PortResult<T> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("ok") => {
            map.remove("ok").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
