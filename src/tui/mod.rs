// TUI module for rendering the terminal interface
pub mod input;

pub use input::{handle_key_event, KeyAction};

use crate::domain::{MediaEntry, MediaKind};
use crate::navigation::NavigationState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Static facts the home screen shows alongside the navigation state.
#[derive(Debug, Clone)]
pub struct HomeInfo {
    pub storage: String,
    pub permission_granted: bool,
}

/// Renders the screen for the current navigation state. Pure with respect
/// to the state machine: nothing here mutates the controller.
pub fn render(
    frame: &mut Frame,
    state: &NavigationState,
    home: &HomeInfo,
    selected: usize,
    notice: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);

    match state {
        NavigationState::Home => render_home(frame, chunks[1], home),
        NavigationState::Grid { loading, result } => {
            render_grid(frame, chunks[1], *loading, result, selected)
        }
        NavigationState::Detail { selected, .. } => render_detail(frame, chunks[1], selected),
    }

    render_footer(frame, chunks[2], state, notice);
}

fn render_header(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let title = match state {
        NavigationState::Home => " Status Viewer ",
        NavigationState::Grid { .. } => " Status Gallery ",
        NavigationState::Detail { .. } => " Media ",
    };

    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn render_home(frame: &mut Frame, area: Rect, home: &HomeInfo) {
    let permission_line = if home.permission_granted {
        Line::from(vec![
            Span::raw("Storage permission: "),
            Span::styled("GRANTED", Style::default().fg(Color::Green)),
        ])
    } else {
        Line::from(vec![
            Span::raw("Storage permission: "),
            Span::styled("DENIED", Style::default().fg(Color::Red)),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from("Browse the status media your messaging app has cached."),
        Line::from(""),
        permission_line,
        Line::from(vec![
            Span::raw("Storage root: "),
            Span::styled(home.storage.as_str(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from("Press v to view statuses."),
    ];

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(content, area);
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    loading: bool,
    result: &[MediaEntry],
    selected: usize,
) {
    if loading {
        let content = Paragraph::new("Scanning status directories...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    }

    if result.is_empty() {
        let content = Paragraph::new(
            "No status files found. Make sure you have viewed statuses in the messaging app.",
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = result.iter().map(grid_item).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} files ", result.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(selected.min(result.len().saturating_sub(1))));

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn grid_item(entry: &MediaEntry) -> ListItem<'_> {
    let kind_style = match entry.kind {
        MediaKind::Image => Style::default().fg(Color::Green),
        MediaKind::Video => Style::default().fg(Color::Magenta),
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("[{:5}] ", entry.kind.label()), kind_style),
        Span::raw(entry.name.clone()),
        Span::styled(
            format!("  {}", entry.modified_date.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn render_detail(frame: &mut Frame, area: Rect, selected: &MediaEntry) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            selected.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Kind:     {}", selected.kind.label())),
        Line::from(format!(
            "Modified: {}",
            selected.modified_date.format("%Y-%m-%d %H:%M:%S")
        )),
        Line::from(format!("Path:     {}", selected.path.display())),
        Line::from(""),
    ];

    lines.push(match selected.kind {
        MediaKind::Video => Line::from("Press o to play in your default video player."),
        MediaKind::Image => Line::from("Press o to open in your default image viewer."),
    });

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(content, area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &NavigationState, notice: Option<&str>) {
    let hints = match state {
        NavigationState::Home => "v view statuses · q quit",
        NavigationState::Grid { .. } => "↑/↓ move · Enter open · b back · q quit",
        NavigationState::Detail { .. } => "o open externally · b close · q quit",
    };

    let line = match notice {
        Some(msg) => Line::from(vec![
            Span::styled(msg.to_string(), Style::default().fg(Color::Red)),
            Span::styled(
                format!("   {}", hints),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    };

    let footer = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
