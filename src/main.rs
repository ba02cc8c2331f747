//! iptvtui - terminal client for an IPTV catalog backend
//!
//! Browse live channels, movies, and series, search across all three,
//! and play a selected stream in an external player.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! iptvtui
//!
//! # CLI mode (for automation)
//! iptvtui login -u user -p pass -s http://provider.example
//! iptvtui streams vod --category 5 --json
//! iptvtui search "news"
//! ```

mod api;
mod app;
mod cache;
mod cli;
mod commands;
mod config;
mod models;
mod player;
mod store;
mod ui;

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{ApiStatus, CatalogClient};
use crate::app::{App, Command, InputMode, Msg, Screen};
use crate::cli::{Cli, Command as CliCommand, ExitCode, Output};
use crate::config::Config;
use crate::models::{ConnectionStatus, ContentType, Credential};
use crate::player::{Player, PlayerEvent, PlayerType};
use crate::store::CredentialStore;
use crate::ui::Theme;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: logging goes to stderr, then execute and exit
        env_logger::init();
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui().await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let backend = cli.backend.as_deref();

    match cli.command {
        Some(CliCommand::Login(cmd)) => commands::login_cmd(cmd, backend, &output).await,
        Some(CliCommand::Logout) => commands::logout_cmd(&output),
        Some(CliCommand::Test) => commands::test_cmd(backend, &output).await,
        Some(CliCommand::Health) => commands::health_cmd(backend, &output).await,
        Some(CliCommand::Info) => commands::info_cmd(backend, &output).await,
        Some(CliCommand::Categories(cmd)) => commands::categories_cmd(cmd, backend, &output).await,
        Some(CliCommand::Streams(cmd)) => commands::streams_cmd(cmd, backend, &output).await,
        Some(CliCommand::Search(cmd)) => commands::search_cmd(cmd, backend, &output).await,
        Some(CliCommand::Epg(cmd)) => commands::epg_cmd(cmd, backend, &output).await,
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui() -> Result<()> {
    let config = Config::load();
    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, config).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Everything the command driver needs to run side effects
struct Driver {
    client: Arc<CatalogClient>,
    player_type: PlayerType,
    store: Option<CredentialStore>,
    credential: Option<Credential>,
    tx: UnboundedSender<Msg>,
}

/// Main event loop - handles input, updates state, runs commands, renders
async fn run_event_loop(terminal: &mut Tui, config: Config) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx): (UnboundedSender<Msg>, UnboundedReceiver<Msg>) = mpsc::unbounded_channel();
    let mut driver = Driver {
        client: Arc::new(CatalogClient::new(config.backend_url())),
        player_type: config
            .player
            .as_deref()
            .map(PlayerType::from_name)
            .unwrap_or_default(),
        store: CredentialStore::open_default(),
        credential: None,
        tx,
    };
    driver.credential = driver.store.as_ref().and_then(|s| s.load());

    let mut app = App::new();

    // Stored credential skips the setup form
    if let Some(credential) = driver.credential.clone() {
        let commands = app.start_session(&credential);
        run_commands(commands, &mut driver);
    }

    while app.running {
        terminal.draw(|frame| render_ui(frame, &mut app))?;

        // Poll for terminal events with a timeout so fetch completions and
        // the debounce timer keep advancing while the user is idle
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    let commands = app.handle_key(key, Instant::now());
                    run_commands(commands, &mut driver);
                }
            }
        }

        // Apply completed async work
        while let Ok(msg) = rx.try_recv() {
            let commands = app.apply(msg);
            run_commands(commands, &mut driver);
        }

        // Debounce timer
        let commands = app.tick(Instant::now());
        run_commands(commands, &mut driver);
    }

    Ok(())
}

/// Execute commands produced by a transition. Credential persistence is
/// handled inline; fetches are spawned and report back over the channel.
fn run_commands(commands: Vec<Command>, driver: &mut Driver) {
    for command in commands {
        run_command(command, driver);
    }
}

fn run_command(command: Command, driver: &mut Driver) {
    match command {
        Command::SaveCredential(credential) => {
            if let Some(store) = &driver.store {
                if let Err(e) = store.save(&credential) {
                    log::warn!("failed to persist credential: {}", e);
                }
            }
            driver.credential = Some(credential);
        }

        Command::ClearCredential => {
            if let Some(store) = &driver.store {
                store.clear();
            }
            driver.credential = None;
        }

        Command::Setup => {
            let client = Arc::clone(&driver.client);
            let credential = driver.credential.clone();
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let result = match credential {
                    Some(credential) => setup_and_test(&client, &credential).await,
                    None => Err("no credential available".to_string()),
                };
                let _ = tx.send(Msg::ConnectionChecked(result));
            });
        }

        Command::TestConnection => {
            let client = Arc::clone(&driver.client);
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let result = client.test_connection().await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::ConnectionChecked(result));
            });
        }

        Command::FetchPlaylistInfo => {
            let client = Arc::clone(&driver.client);
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let result = client.playlist_info().await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::PlaylistInfoLoaded(result));
            });
        }

        Command::FetchStreams {
            tab,
            category_id,
            token,
        } => {
            let client = Arc::clone(&driver.client);
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let result = client
                    .streams(tab, category_id.as_deref())
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(Msg::StreamsLoaded { tab, token, result });
            });
        }

        Command::FetchCategories { tab, token } => {
            let client = Arc::clone(&driver.client);
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let result = client.categories(tab).await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::CategoriesLoaded { tab, token, result });
            });
        }

        Command::Search { query, token } => {
            let client = Arc::clone(&driver.client);
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let result = client.search(&query).await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::SearchLoaded { token, result });
            });
        }

        Command::Play { item } => {
            let player_type = driver.player_type;
            let tx = driver.tx.clone();
            tokio::spawn(async move {
                let url = match item.stream_url.as_deref() {
                    Some(url) => url.to_string(),
                    None => return,
                };
                let player = Player::new(player_type);
                match player.play(&url) {
                    Ok(mut child) => {
                        let _ = tx.send(Msg::Player(PlayerEvent::Started));
                        let clean = child
                            .wait()
                            .await
                            .map(|status| status.success())
                            .unwrap_or(false);
                        let _ = tx.send(Msg::Player(PlayerEvent::Exited { clean }));
                    }
                    Err(e) => {
                        let _ = tx.send(Msg::Player(PlayerEvent::Failed(e.to_string())));
                    }
                }
            });
        }
    }
}

/// Session start: register the credential, then probe the connection.
/// A setup-level failure short-circuits; otherwise the test result wins.
async fn setup_and_test(
    client: &CatalogClient,
    credential: &Credential,
) -> Result<api::ConnectionCheck, String> {
    let check = client.setup(credential).await.map_err(|e| e.to_string())?;
    if check.status == ApiStatus::Failure {
        return Ok(check);
    }
    client.test_connection().await.map_err(|e| e.to_string())
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function - dispatches to screen-specific renderers
fn render_ui(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    match app.screen {
        Screen::Setup => render_setup(frame, area, app),
        Screen::Browse | Screen::Playing => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Header: tabs + search
                    Constraint::Length(1), // Category bar
                    Constraint::Min(1),    // Content
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_header(frame, chunks[0], app);
            render_category_bar(frame, chunks[1], app);
            if app.screen == Screen::Playing {
                render_playing(frame, chunks[2], app);
            } else {
                render_content(frame, chunks[2], app);
            }
            render_status_bar(frame, chunks[3], app);
        }
    }

    // Dismissible banner overlay (playback errors)
    if let Some(banner) = app.banner.clone() {
        render_banner(frame, area, &banner);
    }
}

// -----------------------------------------------------------------------------
// Setup Screen
// -----------------------------------------------------------------------------

/// Render the credential setup form, centered
fn render_setup(frame: &mut Frame, area: Rect, app: &App) {
    let form_width = 60.min(area.width.saturating_sub(4));
    let form_height = 14;
    let form_area = Rect {
        x: area.x + (area.width.saturating_sub(form_width)) / 2,
        y: area.y + (area.height.saturating_sub(form_height)) / 2,
        width: form_width,
        height: form_height.min(area.height),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" CONNECT PROVIDER ", Theme::title()));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (i, label) in app::SETUP_FIELDS.iter().enumerate() {
        let focused = app.setup.focus == i;
        let marker = if focused { "▸ " } else { "  " };
        // Password field is masked
        let value = if i == 2 {
            "•".repeat(app.setup.values[i].len())
        } else {
            app.setup.values[i].clone()
        };
        let shown = if focused {
            format!("{}│", value)
        } else {
            value
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Theme::accent()),
            Span::styled(format!("{:14}", label), Theme::dimmed()),
            Span::styled(
                shown,
                if focused {
                    Theme::input().fg(Theme::PRIMARY)
                } else {
                    Theme::input()
                },
            ),
        ]));
    }
    lines.push(Line::from(""));

    if let Some(error) = &app.setup.error {
        lines.push(Line::from(Span::styled(format!("  {}", error), Theme::error())));
    } else {
        lines.push(Line::from(Span::styled(
            "  Playlist name is optional",
            Theme::dimmed(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" TAB ", Theme::keybind()),
        Span::styled("Next field  ", Theme::dimmed()),
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled("Connect  ", Theme::dimmed()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Quit", Theme::dimmed()),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

// -----------------------------------------------------------------------------
// Browse Screen
// -----------------------------------------------------------------------------

/// Render the header: playlist name, tab bar, search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Playlist name + tabs
            Constraint::Length(30), // Tab bar
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let name = Paragraph::new(Line::from(Span::styled(
        app.playlist_name.clone(),
        ratatui::style::Style::default()
            .fg(Theme::PRIMARY)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(name, header_chunks[0]);

    // Tab bar
    let mut tab_spans: Vec<Span> = Vec::new();
    for (i, tab) in ContentType::ALL.iter().enumerate() {
        let style = if *tab == app.browse.active_tab {
            Theme::selected()
        } else {
            Theme::dimmed()
        };
        tab_spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label()), style));
    }
    let tabs = Paragraph::new(Line::from(tab_spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border()),
        );
    frame.render_widget(tabs, header_chunks[1]);

    // Search box
    let editing = app.input_mode == InputMode::Editing;
    let search_style = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_text = if editing {
        let query = &app.browse.search_query;
        let cursor = app.browse.search_cursor.min(query.len());
        let (before, after) = query.split_at(cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.browse.search_query.is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.browse.search_query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[2]);
}

/// Render the category bar: "All" plus the active tab's categories
fn render_category_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::new();

    let all_style = if app.browse.active_category.is_none() {
        Theme::selected()
    } else {
        Theme::dimmed()
    };
    spans.push(Span::styled(" All ", all_style));

    for category in app.displayed_categories() {
        let active = app.browse.active_category.as_deref() == Some(category.category_id.as_str());
        let style = if active { Theme::selected() } else { Theme::dimmed() };
        spans.push(Span::raw("│"));
        spans.push(Span::styled(format!(" {} ", category.category_name), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the content list for the active tab (or search results)
fn render_content(frame: &mut Frame, area: Rect, app: &mut App) {
    let title = if app.browse.searching() {
        format!(
            " RESULTS \"{}\" ({}) ",
            app.browse.search_query.trim(),
            app.displayed_items().len()
        )
    } else {
        format!(
            " {} ({}) ",
            app.browse.active_tab.label().to_uppercase(),
            app.displayed_items().len()
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.browse.loading {
        let loading = Paragraph::new("⟳ Loading...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if let Some(error) = &app.browse.error {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(error.clone(), Theme::error())),
            Line::from(""),
            Line::from(vec![
                Span::styled(" r ", Theme::keybind()),
                Span::styled("Retry", Theme::dimmed()),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(message, inner);
        return;
    }

    if app.displayed_items().is_empty() {
        let empty = Paragraph::new(if app.browse.searching() {
            "No results in this tab"
        } else {
            "No content"
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    // Keep the selection visible within the viewport
    let visible = inner.height as usize;
    app.browse.list.scroll_into_view(visible);
    let offset = app.browse.list.offset;
    let selected = app.browse.list.selected;

    let items: Vec<ListItem> = app
        .displayed_items()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, item)| {
            let is_selected = i == selected;
            let marker = if is_selected { "▸ " } else { "  " };

            let mut spans = vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    item.name.clone(),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
            ];
            if let Some(category) = &item.category_name {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format!("[{}]", category), Theme::dimmed()));
            }
            if !item.is_playable() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled("(series)", Theme::warning()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

/// Render the playing view
fn render_playing(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" ▶ NOW PLAYING ", Theme::success()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = app
        .current_stream
        .as_ref()
        .map(|item| item.name.clone())
        .unwrap_or_else(|| "…".to_string());

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Playing in external player",
            Theme::dimmed(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ESC ", Theme::keybind()),
            Span::styled("Back to browsing", Theme::dimmed()),
        ]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(content, inner);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let connection_style = match app.browse.connection {
        ConnectionStatus::Connected => Theme::success(),
        ConnectionStatus::Demo => Theme::warning(),
        ConnectionStatus::Connecting => Theme::warning(),
        ConnectionStatus::Error | ConnectionStatus::Disconnected => Theme::error(),
    };
    let connection = Span::styled(
        format!(" ● {} ", app.browse.connection.label()),
        connection_style,
    );

    let retry_hint = if app.browse.connection.can_retry() {
        Span::styled(" r:retry ", Theme::keybind())
    } else {
        Span::raw("")
    };

    let help = Span::styled(
        " q:quit  /:search  TAB:tabs  ←→:category  ↵:play  o:sign out ",
        Theme::dimmed(),
    );

    let status_line = Line::from(vec![connection, retry_hint, Span::raw(" │ "), help]);
    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render the dismissible banner overlay
fn render_banner(frame: &mut Frame, area: Rect, message: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let banner = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ PLAYBACK ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(banner, popup_area);
}
