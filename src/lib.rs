//! Cipher Notes Library
//!
//! A small note keeper that obfuscates text with a fixed letter-substitution
//! cipher and saves timestamped results to a flat text file.
//!
//! The cipher is a toy. A single-alphabet substitution falls to frequency
//! analysis and offers no confidentiality.
//!
//! # Modules
//!
//! - `cipher`: the seeded substitution tables and the encrypt/decrypt
//!   transforms
//! - `store`: the flat note file and the note entry line format
//! - `prefs`: the persisted theme preference and its colors
//! - `paths`: where the note, preference and log files live
//! - `ui`: terminal user interface components and event handling
pub mod cipher;
pub mod paths;
pub mod prefs;
pub mod store;
pub mod ui;

pub use cipher::{CipherTable, Mode};
pub use paths::AppPaths;
pub use prefs::{Palette, PreferenceStore, ThemePreference};
pub use store::{NoteEntry, NoteStore};
pub use ui::logging;
pub use ui::{App, AppMode, Event, EventHandler, Tab, TerminalGuard, init_panic_hook};
