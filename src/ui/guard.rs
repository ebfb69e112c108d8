//! Provides a RAII guard for safe terminal lifecycle management.
//!
//! The guard owns the ratatui terminal. Creating it puts the terminal in raw
//! mode on the alternate screen; dropping it, on normal exit or during a
//! panic unwind, puts everything back.
use std::io::{Stdout, stdout};
use std::panic::{set_hook, take_hook};

use anyhow::{Context, Result};
use crossterm::ExecutableCommand;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use log::error;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Terminal type the application draws on.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// RAII wrapper for terminal state.
pub struct TerminalGuard
{
    /// The terminal being drawn on
    terminal: Tui,
}

impl TerminalGuard
{
    /// Sets up the terminal for the TUI.
    ///
    /// Enters raw mode, switches to the alternate screen buffer and creates
    /// the ratatui terminal on stdout.
    ///
    /// # Errors
    ///
    /// On failure to enter raw mode, switch screens or create the terminal.
    /// The terminal is restored before the error is returned.
    pub fn enter() -> Result<Self>
    {
        enable_raw_mode().context("Failed to enable raw mode")?;

        let terminal = stdout()
            .execute(EnterAlternateScreen)
            .map(|_| ())
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout())));

        match terminal
        {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) =>
            {
                restore_terminal();
                Err(err).context("Failed to set up terminal")
            }
        }
    }

    /// The terminal to draw on.
    pub const fn terminal(&mut self) -> &mut Tui
    {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard
{
    /// Restores the terminal state.
    fn drop(&mut self)
    {
        if let Err(err) = self.terminal.show_cursor()
        {
            error!("Failed to show cursor: {err}");
        }
        restore_terminal();
    }
}

/// Leaves raw mode and the alternate screen, logging failures.
fn restore_terminal()
{
    // Terminal will be borked when failure, at least inform the user
    if let Err(err) = disable_raw_mode()
    {
        error!("Failed to disable raw mode: {err}");
    }

    if let Err(err) = stdout().execute(LeaveAlternateScreen)
    {
        error!("Failed to leave alternate screen: {err}");
    }
}

/// Installs a panic hook that restores the terminal before reporting.
///
/// Without it the panic message would be printed into the alternate
/// screen in raw mode and lost.
pub fn init_panic_hook()
{
    let original_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        restore_terminal();

        error!("Application panicked: {panic_info}");

        original_hook(panic_info);
    }));
}
