//! Modal dialogs for line-oriented terminal programs.
//!
//! Paints a centered frame over a dimmed copy of the caller's screen and
//! reads keys in raw mode until the dialog resolves.

pub mod config;
pub mod dialogs;
pub mod frame;
pub mod keys;
pub mod layout;
pub mod overlay;
pub mod reader;
pub mod runtime;
pub mod status;
pub mod terminal;
pub mod text;

pub use config::Config;
pub use dialogs::{Dialog, DialogStep, FrameContext, SelectEntry};
pub use keys::{Key, KeyEvent};
pub use reader::{KeyReadTimeout, KeyReader};
pub use runtime::{DialogRuntime, StdioRuntime, block_on_detached};
pub use status::StatusOverlay;
pub use terminal::{TermSize, TerminalOutput, install_panic_hook, restore_terminal};
