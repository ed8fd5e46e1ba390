// Terminal dashboard: the same controller as the web page, drawn with ratatui
// over a ScreenBuffer, talking to a running server through HttpApi.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use painel::dashboard::{Action, Dashboard, HttpApi, Screen, ScreenBuffer, TableView, View};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Redraw interval while loads are in flight
const TICK: Duration = Duration::from_millis(200);

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Dispatch(Action),
    Next,
    Previous,
    First,
    Last,
    Quit,
}

/// Key → command; `r` only works while the refresh control is shown
pub fn command_for(code: KeyCode, refresh_visible: bool) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(c @ '1'..='4') => {
            let index = (c as u8 - b'1') as usize;
            Some(Command::Dispatch(Action::Navigate(View::ALL[index])))
        }
        KeyCode::Char('r') if refresh_visible => Some(Command::Dispatch(Action::Refresh)),
        KeyCode::Char('l') => Some(Command::Dispatch(Action::LegacyTop10)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Next),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Previous),
        KeyCode::Home => Some(Command::First),
        KeyCode::End => Some(Command::Last),
        _ => None,
    }
}

pub struct App {
    dashboard: Arc<Dashboard<HttpApi, ScreenBuffer>>,
    runtime: Runtime,
    api_url: String,
    /// Highlighted menu entry (generation included)
    pub active: View,
    /// Last snapshot of the dashboard surface
    pub buffer: ScreenBuffer,
    pub state: TableState,
}

impl App {
    pub fn new(api_url: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;

        Ok(Self {
            dashboard: Arc::new(Dashboard::new(HttpApi::new(api_url), ScreenBuffer::default())),
            runtime,
            api_url: api_url.to_string(),
            active: View::default(),
            buffer: ScreenBuffer::default(),
            state: TableState::default(),
        })
    }

    /// Run the action in the background; the draw loop picks up the result
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Navigate(view) => self.active = view,
            Action::Initialize | Action::LegacyTop10 => self.active = View::Faturamento,
            Action::Refresh => self.active = self.dashboard.current_view(),
        }

        let dashboard = Arc::clone(&self.dashboard);
        self.runtime.spawn(async move {
            dashboard.dispatch(action).await;
        });
    }

    /// Copy the surface; a replaced container resets the row cursor
    pub fn sync(&mut self) {
        let buffer = self.dashboard.read_surface(|s| s.clone());
        if buffer.replacements != self.buffer.replacements {
            let has_rows = matches!(&buffer.screen, Screen::Table(t) if !t.rows.is_empty());
            self.state.select(if has_rows { Some(0) } else { None });
        }
        self.buffer = buffer;
    }

    fn row_count(&self) -> usize {
        match &self.buffer.screen {
            Screen::Table(table) => table.rows.len(),
            _ => 0,
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if self.row_count() > 0 {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let len = self.row_count();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }
}

pub fn run_ui(api_url: &str) -> Result<()> {
    let mut app = App::new(api_url)?;
    app.dispatch(Action::Initialize);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match command_for(key.code, app.buffer.refresh_visible) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Dispatch(action)) => app.dispatch(action),
                Some(Command::Next) => app.next(),
                Some(Command::Previous) => app.previous(),
                Some(Command::First) => app.first(),
                Some(Command::Last) => app.last(),
                None => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Min(0),    // Dashboard container
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.buffer.screen.clone() {
        Screen::Table(table) => render_table(f, chunks[1], &table, &mut app.state),
        screen => render_message(f, chunks[1], &screen),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, view) in View::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *view == app.active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, view.label()), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(app.api_url.clone(), Style::default().fg(Color::White)));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Painel de Comércios "),
    );

    f.render_widget(header, area);
}

/// Column widths: widest cell (header included) per column, plus padding
pub fn column_widths(table: &TableView) -> Vec<u16> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0);
            (widest + 2).min(40) as u16
        })
        .collect()
}

fn render_table(f: &mut Frame, area: Rect, table: &TableView, state: &mut TableState) {
    let header_cells = table.columns.iter().map(|h| {
        Cell::from(h.as_str()).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let widths = column_widths(table);
    let rows = table.rows.iter().map(|row| {
        let cells = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| Cell::from(truncate(cell, *width as usize)));
        Row::new(cells).height(1)
    });

    let widget = Table::new(rows, widths.iter().map(|w| Constraint::Length(*w)))
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", table.title)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(widget, area, state);
}

/// Everything that is not a table: loading, empty, generation result, error
fn render_message(f: &mut Frame, area: Rect, screen: &Screen) {
    let lines: Vec<Line> = match screen {
        Screen::Blank => vec![],
        Screen::Loading(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Cyan),
        ))],
        Screen::Empty => vec![Line::from(painel::dashboard::screen::EMPTY)],
        Screen::Generated(view) => vec![
            Line::from(Span::styled(
                painel::dashboard::screen::GENERATED_TITLE,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(view.mensagem.clone()),
            Line::from(format!("Registros Gerados: {}", view.registros_gerados)),
            Line::from(format!("Tempo de Processamento: {}", view.tempo_processamento)),
        ],
        Screen::Error(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        Screen::Table(_) => vec![],
    };

    let border = if screen.is_error() { Color::Red } else { Color::White };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Screen::Table(table) = &app.buffer.screen {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Linha: {}/{} ", selected, table.rows.len()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(table.caption.clone(), Style::default().fg(Color::Green)));
        status_spans.push(Span::raw(" | "));
    }

    status_spans.push(Span::styled("1-4", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Menu | "));
    if app.buffer.refresh_visible {
        status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Atualizar | "));
    }
    status_spans.push(Span::styled("l", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Top 10 legado | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Sair"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keys_navigate_menu() {
        assert_eq!(
            command_for(KeyCode::Char('1'), false),
            Some(Command::Dispatch(Action::Navigate(View::Faturamento)))
        );
        assert_eq!(
            command_for(KeyCode::Char('4'), false),
            Some(Command::Dispatch(Action::Navigate(View::GerarDados)))
        );
        assert_eq!(command_for(KeyCode::Char('5'), false), None);
    }

    #[test]
    fn test_refresh_key_follows_control_visibility() {
        assert_eq!(command_for(KeyCode::Char('r'), false), None);
        assert_eq!(
            command_for(KeyCode::Char('r'), true),
            Some(Command::Dispatch(Action::Refresh))
        );
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(command_for(KeyCode::Char('q'), true), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Esc, false), Some(Command::Quit));
        assert_eq!(
            command_for(KeyCode::Char('l'), false),
            Some(Command::Dispatch(Action::LegacyTop10))
        );
        assert_eq!(command_for(KeyCode::Down, false), Some(Command::Next));
        assert_eq!(command_for(KeyCode::Char('k'), false), Some(Command::Previous));
    }

    #[test]
    fn test_column_widths_fit_widest_cell() {
        let table = TableView {
            title: "Top 10 Cidades por Faturamento".into(),
            columns: vec!["Cidade".into(), "Faturamento Total (R$)".into()],
            rows: vec![
                vec!["Cidade 10".into(), "R$\u{a0}1,00".into()],
                vec!["São Paulo".into(), "R$\u{a0}2,00".into()],
            ],
            caption: String::new(),
        };
        assert_eq!(column_widths(&table), vec![11, 24]);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Saúde", 10), "Saúde");
        assert_eq!(truncate("Comércio Varejista", 8), "Comér...");
    }
}
