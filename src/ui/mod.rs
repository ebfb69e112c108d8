//! Terminal user interface.
//!
//! Contains the application state, the notes list, event handling,
//! terminal lifecycle management, and logging setup.
mod app;
mod event;
mod guard;
pub mod logging;
mod notes_panel;

pub use app::{App, AppMode, Status, Tab};
pub use event::{Event, EventHandler};
pub use guard::{TerminalGuard, Tui, init_panic_hook};
pub use notes_panel::NotesPanel;
