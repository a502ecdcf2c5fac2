use serde::{Deserialize, Serialize};

/// A monitored `{session, window}` pair, optionally tied to a task identity.
///
/// Targets are ephemeral: each discovery scan recreates them from the live
/// multiplexer state. Nothing about a target persists across polls except
/// what the transition tracker remembers under its key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Target {
    pub session: String,
    pub window: u32,
    /// Task identity associated with this target, when known.
    pub task: Option<String>,
}

impl Target {
    pub fn new(session: &str, window: u32) -> Self {
        Target {
            session: session.to_string(),
            window,
            task: None,
        }
    }

    /// The key used to address this target: `"session:window"`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.session, self.window)
    }

    /// Parse a `"session:window"` key back into a target.
    ///
    /// The window component must be a bare integer; everything before the
    /// last `:` is the session name (session names may themselves contain
    /// colons when users are creative).
    pub fn parse_key(key: &str) -> Result<Target, String> {
        let colon = key
            .rfind(':')
            .ok_or_else(|| format!("invalid target '{}': expected session:window", key))?;
        let session = &key[..colon];
        let window = key[colon + 1..]
            .parse::<u32>()
            .map_err(|_| format!("invalid window index in target '{}'", key))?;
        if session.is_empty() {
            return Err(format!("invalid target '{}': empty session name", key));
        }
        Ok(Target::new(session, window))
    }
}

/// A window as reported by the multiplexer's discovery listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowInfo {
    pub index: u32,
    pub name: String,
    pub pane_count: u32,
}
