use statusview::cli::Args;
use statusview::config::UserConfig;
use statusview::domain::{MediaEntry, StatusScanner};
use statusview::navigation::{NavigationController, NavigationState, Notice};
use statusview::open_media;
use statusview::permission::{PermissionProbe, StoragePermission};
use statusview::tui::{handle_key_event, render, HomeInfo, KeyAction};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, time::Duration};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Load user configuration; the remembered storage root is the
    // fallback base when none is given.
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let base: Option<PathBuf> = args
        .storage
        .clone()
        .or_else(|| user_config.last_storage_root.clone());

    if let Err(e) = args.validate(base.as_ref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let roots = match &base {
        Some(b) => args.resolve_roots(b),
        // validate() guarantees overrides exist when there is no base.
        None => args.roots.clone(),
    };

    // Permission is probed against the storage base; with bare --root
    // overrides, against the first override root itself.
    let permission_base = args.permission_base(base.as_ref());

    let scanner = Arc::new(StatusScanner::new(roots).with_kind(args.kind_filter()));
    let permission = StoragePermission::new(permission_base.clone());
    let mut controller = NavigationController::new(scanner, Arc::new(permission.clone()))
        .map_err(|e| io::Error::other(e.to_string()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let storage_label = permission_base.display().to_string();
    let result = run_loop(&mut terminal, &mut controller, &permission, &storage_label);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Remember the storage root for the next run
    if result.is_ok() {
        if let Some(b) = base {
            user_config.last_storage_root = Some(b);
            if let Err(e) = user_config.save() {
                eprintln!("Warning: Failed to save user config: {}", e);
            }
        }
    }

    result
}

/// Presentation-side snapshot of the current screen, taken before
/// dispatching an action so the controller can be borrowed mutably.
enum Screen {
    Home,
    Grid {
        loading: bool,
        len: usize,
        entry: Option<MediaEntry>,
    },
    Detail {
        path: PathBuf,
    },
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut NavigationController,
    permission: &StoragePermission,
    storage_label: &str,
) -> io::Result<()> {
    // Grid highlight position; presentation state, not navigation state.
    let mut selected: usize = 0;
    let mut notice: Option<String> = None;

    loop {
        // Apply a finished background scan, if any.
        controller.poll();

        // Keep the highlight inside the (possibly replaced) result.
        if let NavigationState::Grid { result, .. } = controller.current_state() {
            if !result.is_empty() && selected >= result.len() {
                selected = result.len() - 1;
            }
        }

        for n in controller.take_notices() {
            notice = Some(match n {
                Notice::PermissionRequired => {
                    "Storage permission required: the storage root is not readable.".to_string()
                }
                Notice::DiscoveryFailed(reason) => format!("Scan failed: {}", reason),
            });
        }

        let home = HomeInfo {
            storage: storage_label.to_string(),
            permission_granted: permission.current(),
        };

        terminal.draw(|frame| {
            render(
                frame,
                controller.current_state(),
                &home,
                selected,
                notice.as_deref(),
            );
        })?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let action = handle_key_event(key);
                if action == KeyAction::Quit {
                    break;
                }

                // Notices are one-shot; any keypress dismisses the current
                // one before the action may queue a new one.
                notice = None;

                let screen = match controller.current_state() {
                    NavigationState::Home => Screen::Home,
                    NavigationState::Grid { loading, result } => Screen::Grid {
                        loading: *loading,
                        len: result.len(),
                        entry: result.get(selected).cloned(),
                    },
                    NavigationState::Detail { selected: entry, .. } => Screen::Detail {
                        path: entry.path.clone(),
                    },
                };

                match screen {
                    Screen::Home => {
                        if matches!(action, KeyAction::ViewGallery | KeyAction::Activate) {
                            if let Err(e) = controller.request_gallery() {
                                notice = Some(e.to_string());
                            }
                            selected = 0;
                        }
                    }
                    Screen::Grid {
                        loading,
                        len,
                        entry,
                    } => match action {
                        KeyAction::Up => selected = selected.saturating_sub(1),
                        KeyAction::Down => {
                            if len > 0 && selected + 1 < len {
                                selected += 1;
                            }
                        }
                        KeyAction::Activate => {
                            if !loading {
                                if let Some(entry) = entry {
                                    if let Err(e) = controller.select_entry(&entry) {
                                        notice = Some(e.to_string());
                                    }
                                }
                            }
                        }
                        KeyAction::Back => {
                            if let Err(e) = controller.back() {
                                notice = Some(e.to_string());
                            }
                            selected = 0;
                        }
                        _ => {}
                    },
                    Screen::Detail { path } => match action {
                        KeyAction::Open => {
                            if let Err(e) = open_media(&path) {
                                notice = Some(format!("Failed to open externally: {}", e));
                            }
                        }
                        KeyAction::Back => {
                            if let Err(e) = controller.close() {
                                notice = Some(e.to_string());
                            }
                        }
                        _ => {}
                    },
                }
            }
        }
    }

    Ok(())
}
