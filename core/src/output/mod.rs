//! Output parsing — sanitizing raw pane captures and extracting decision
//! prompts.
//!
//! `sanitize` turns noisy terminal byte streams into clean display lines.
//! `prompt` detects the question/options menus agents print when blocked
//! on a human choice. Both are pure and total: messy input degrades to
//! plain lines, never to an error.

pub mod prompt;
pub mod sanitize;
