use anyhow::Result;
use cipher_notes::ui::Tui;
use cipher_notes::{
    App, AppMode, AppPaths, CipherTable, Event, EventHandler, NoteStore, PreferenceStore, Tab,
    TerminalGuard, init_panic_hook, logging,
};
use clap::{Arg, ArgAction, Command, crate_name, crate_version, value_parser};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()>
{
    let default_paths = AppPaths::discover()?;

    let matches = Command::new(crate_name!())
        .version(crate_version!())
        .about("A terminal note keeper with a toy substitution cipher")
        // Inform about where things are kept
        .after_help(format!(
            "Notes are stored in {}\nThe theme preference is stored in {}\nThe log is written \
             to {}\n\nThe cipher is a fixed letter substitution and does not protect anything.",
            default_paths.notes_file().display(),
            default_paths.theme_file().display(),
            default_paths.log_file().display(),
        ))
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Keep notes and the theme preference in DIR")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("clear-log")
                .long("clear-log")
                .help("Remove the log file and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let paths = match matches.get_one::<PathBuf>("data-dir")
    {
        Some(dir) => default_paths.with_data_dir(dir),
        None => default_paths,
    };

    if matches.get_flag("clear-log")
    {
        logging::clear_log_file(&paths.log_file())?;
        println!("Removed {}", paths.log_file().display());
        return Ok(());
    }

    paths.ensure_dirs()?;
    logging::init_logging(&paths.log_file())?;
    info!("Notes file: {}", paths.notes_file().display());
    info!("Theme file: {}", paths.theme_file().display());

    init_panic_hook();

    // Built once, shared by reference for the whole session
    let cipher = CipherTable::new();
    let app = App::new(
        &cipher,
        NoteStore::new(paths.notes_file()),
        PreferenceStore::new(paths.theme_file()),
    );

    // Terminal is restored when the guard is dropped, after the event thread
    // has been joined
    let mut terminal_guard = TerminalGuard::enter()?;
    let event_handler = EventHandler::new(Duration::from_millis(250));

    run_app(terminal_guard.terminal(), app, &event_handler)
}

/// Run the main loop
///
/// # Arguments
///
/// * `terminal` - The terminal to draw to
/// * `app` - The app to run
/// * `event_handler` - The event handler to handle events
///
/// # Errors
///
/// Returns an error if the terminal fails to draw to the screen or the event
/// thread stops.
fn run_app(terminal: &mut Tui, mut app: App, event_handler: &EventHandler) -> Result<()>
{
    loop
    {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next()?
        {
            Event::Key(key) => handle_key(&mut app, key),
            // Redrawn at the top of the loop
            Event::Tick | Event::Resize(..) =>
            {}
        }

        if app.should_quit
        {
            info!("Quitting");
            break;
        }
    }

    Ok(())
}

/// Applies a key press to the application state.
fn handle_key(app: &mut App, key: KeyEvent)
{
    let ctrl = key
        .modifiers
        .contains(KeyModifiers::CONTROL);

    match (app.mode, app.tab, ctrl, key.code)
    {
        // Quit from anywhere
        (_, _, true, KeyCode::Char('q')) =>
        {
            app.should_quit = true;
        }

        // Delete confirmation swallows every other key
        (AppMode::ConfirmDelete, _, false, KeyCode::Char('y') | KeyCode::Enter) =>
        {
            app.confirm_delete();
        }
        (AppMode::ConfirmDelete, _, false, KeyCode::Char('n') | KeyCode::Esc) =>
        {
            app.cancel_delete();
        }
        (AppMode::ConfirmDelete, ..) =>
        {}

        // Help overlay
        (AppMode::Help, _, _, KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('?')) |
        (AppMode::Normal, _, _, KeyCode::F(1)) |
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('?')) =>
        {
            app.toggle_help();
        }
        (AppMode::Help, ..) =>
        {}

        // Shared by both tabs
        (AppMode::Normal, _, true, KeyCode::Char('t')) =>
        {
            app.toggle_theme();
        }
        (AppMode::Normal, _, _, KeyCode::Tab | KeyCode::BackTab) =>
        {
            app.next_tab();
        }

        // Main tab
        (AppMode::Normal, Tab::Main, true, KeyCode::Char('e')) =>
        {
            app.toggle_cipher_mode();
        }
        (AppMode::Normal, Tab::Main, true, KeyCode::Char('y')) =>
        {
            app.copy_result();
        }
        (AppMode::Normal, Tab::Main, true, KeyCode::Char('l')) =>
        {
            app.clear_all();
        }
        (AppMode::Normal, Tab::Main, true, KeyCode::Char('s')) =>
        {
            app.save_note();
        }
        (AppMode::Normal, Tab::Main, false, KeyCode::Char(ch)) =>
        {
            app.insert_char(ch);
        }
        (AppMode::Normal, Tab::Main, false, KeyCode::Enter) =>
        {
            app.insert_char('\n');
        }
        (AppMode::Normal, Tab::Main, _, KeyCode::Backspace) =>
        {
            app.remove_char();
        }

        // Notes tab
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('q') | KeyCode::Esc) =>
        {
            app.should_quit = true;
        }
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('j') | KeyCode::Down) =>
        {
            app.notes_panel.next();
        }
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('k') | KeyCode::Up) =>
        {
            app.notes_panel.previous();
        }
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('g') | KeyCode::Home) =>
        {
            app.notes_panel.first();
        }
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('G') | KeyCode::End) =>
        {
            app.notes_panel.last();
        }
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('d') | KeyCode::Delete) =>
        {
            app.request_delete();
        }
        (AppMode::Normal, Tab::Notes, false, KeyCode::Char('r')) =>
        {
            app.reload_notes();
        }

        _ =>
        {} // Ignore other key combinations
    }
}
