//! Multiplexer backends.
//!
//! `Multiplexer` is the seam between the supervision engine and the
//! terminal multiplexer. `TmuxMultiplexer` shells out to tmux through a
//! `CommandRunner`; `MockMultiplexer` serves preset state for tests.

pub mod mock;
pub mod runner;
pub mod tmux;

pub use mock::MockMultiplexer;
pub use runner::{CommandRunner, MockRunner, ShellRunner};
pub use tmux::TmuxMultiplexer;

use crate::types::target::WindowInfo;

/// Backend operations the supervision engine needs.
///
/// Errors are infrastructure failures (the command could not run or the
/// server misbehaved). A vanished session or window is not an error:
/// `capture_pane` reports it as `Ok(None)` so callers can degrade that one
/// target instead of aborting a poll pass.
pub trait Multiplexer: Send {
    /// Names of all live sessions. An unreachable server yields an empty
    /// list, not an error.
    fn list_sessions(&self) -> Result<Vec<String>, String>;

    /// Windows of one session, in index order.
    fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, String>;

    /// Recent scrollback of a window's active pane, `lines` deep.
    /// `Ok(None)` means the target no longer exists.
    fn capture_pane(&self, session: &str, window: u32, lines: u32)
        -> Result<Option<String>, String>;

    /// Type `text` into a window's active pane and submit it.
    fn send_keys(&mut self, session: &str, window: u32, text: &str) -> Result<(), String>;
}
