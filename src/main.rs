use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchup_terminal::anim::{row_entrance, RowEntrance, ScoreCounter};
use matchup_terminal::snapshot_feed::spawn_snapshot_provider;
use matchup_terminal::snapshot_fetch::{Snapshot, TeamResult};
use matchup_terminal::state::{
    apply_delta, format_generated_at, format_points, performer_card_lines, roster_row_cells,
    roster_total_label, AppState, Delta, Phase, ProviderCommand,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn request_reload(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Snapshot reload unavailable");
            return;
        };
        if tx.send(ProviderCommand::FetchSnapshot).is_err() {
            self.state.push_log("[WARN] Snapshot reload request failed");
        } else {
            self.state.begin_loading();
            self.state.push_log("[INFO] Snapshot reload requested");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_snapshot_provider(tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    app.state.begin_loading();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    // Short tick so the score counters stay smooth.
    let tick_rate = Duration::from_millis(33);
    let mut last_frame = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        let dt = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        app.state.tick(dt);

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.phase {
        Phase::Idle | Phase::Loading => render_loading(frame, chunks[1]),
        Phase::Errored => render_error_panel(frame, chunks[1], &app.state),
        Phase::Rendered => render_scoreboard(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let weekend = state
        .snapshot
        .as_ref()
        .map(|snap| snap.weekend.as_str())
        .filter(|label| !label.is_empty())
        .unwrap_or("Head-to-Head");
    let line1 = format!("  __  MATCHUP BOARD | {weekend}");
    let line2 = " |__|".to_string();
    let line3 = " /__\\".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    let keys = "r Reload | ? Help | q Quit";
    match state.phase {
        Phase::Rendered => {
            let updated = state
                .snapshot
                .as_ref()
                .map(|snap| format_generated_at(&snap.generated_at))
                .unwrap_or_else(|| "unknown".to_string());
            format!("Last updated: {updated} | {keys}")
        }
        Phase::Errored => match state.last_log() {
            Some(log) => format!("{log} | {keys}"),
            None => keys.to_string(),
        },
        Phase::Idle | Phase::Loading => format!("Loading... | {keys}"),
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new("Loading matchup data...")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(text, centered_rect(60, 20, area));
}

fn render_error_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![
        "DATA NOT AVAILABLE".to_string(),
        String::new(),
        "Run `python generate_website_data.py` to generate the data file.".to_string(),
    ];
    if let Some(detail) = &state.error_detail {
        lines.push(String::new());
        lines.push(format!("cause: {detail}"));
    }

    let panel = Paragraph::new(lines.join("\n"))
        .style(Style::default().fg(Color::LightRed))
        .alignment(Alignment::Center);
    frame.render_widget(panel, centered_rect(70, 40, area));
}

fn render_scoreboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(7),
        ])
        .split(area);

    render_score_strip(frame, sections[0], snapshot, state);
    render_winner_banner(frame, sections[1], state);
    render_rosters(frame, sections[2], snapshot, state.render_elapsed);
    render_performers(frame, sections[3], snapshot);
}

fn render_score_strip(frame: &mut Frame, area: Rect, snapshot: &Snapshot, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(40),
        ])
        .split(area);

    render_team_score(frame, cols[0], &snapshot.team1, &state.team1_counter);

    let vs = Paragraph::new("\nVS")
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(vs, cols[1]);

    render_team_score(frame, cols[2], &snapshot.team2, &state.team2_counter);
}

fn render_team_score(frame: &mut Frame, area: Rect, team: &TeamResult, counter: &ScoreCounter) {
    let text = format!(
        "{}\n{}",
        team.name,
        format_points(counter.value())
    );
    let score = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(score, area);
}

fn render_winner_banner(frame: &mut Frame, area: Rect, state: &AppState) {
    // Hidden until a snapshot has been compared.
    let Some(line) = &state.winner_line else {
        return;
    };
    let banner = Paragraph::new(line.as_str())
        .style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(banner, area);
}

fn render_rosters(frame: &mut Frame, area: Rect, snapshot: &Snapshot, elapsed: f64) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_roster(frame, halves[0], &snapshot.team1, elapsed);
    render_roster(frame, halves[1], &snapshot.team2, elapsed);
}

fn render_roster(frame: &mut Frame, area: Rect, team: &TeamResult, elapsed: f64) {
    let block = Block::default()
        .title(team.name.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 || inner.width == 0 {
        return;
    }

    let widths = roster_columns();
    render_roster_header(frame, row_rect(inner, 0), &widths);

    // Header above, totals line below; whatever fits in between is shown.
    let body_rows = (inner.height - 2) as usize;
    for (idx, player) in team.roster.iter().take(body_rows).enumerate() {
        let row_area = row_rect(inner, 1 + idx as u16);
        let (style, shift) = match row_entrance(elapsed, idx) {
            RowEntrance::Hidden => continue,
            RowEntrance::Entering(progress) => (
                Style::default().fg(Color::DarkGray),
                ((1.0 - progress) * 3.0) as usize,
            ),
            RowEntrance::Settled => (Style::default(), 0),
        };

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let cells = roster_row_cells(player);
        let indent = " ".repeat(shift);
        for (cell_area, cell) in cols.iter().zip(cells.iter()) {
            let text = format!("{indent}{cell}");
            frame.render_widget(Paragraph::new(text).style(style), *cell_area);
        }
    }

    let total = Paragraph::new(roster_total_label(team))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Right);
    frame.render_widget(total, row_rect(inner, inner.height - 1));
}

fn roster_columns() -> [Constraint; 5] {
    [
        Constraint::Length(5),
        Constraint::Min(14),
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(8),
    ]
}

fn render_roster_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    let labels = ["Pos", "Player", "Team", "Stats", "Pts"];
    for (cell_area, label) in cols.iter().zip(labels) {
        frame.render_widget(Paragraph::new(label).style(style), *cell_area);
    }
}

fn row_rect(inner: Rect, offset: u16) -> Rect {
    Rect {
        x: inner.x,
        y: inner.y + offset,
        width: inner.width,
        height: 1,
    }
}

fn render_performers(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .title("Top Performers")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if snapshot.top_performers.is_empty() {
        let empty = Paragraph::new("No performers in snapshot")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let count = snapshot.top_performers.len().min(inner.width as usize);
    let share = (100 / count as u16).max(1);
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Percentage(share)).collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (card_area, performer) in cols.iter().zip(snapshot.top_performers.iter()) {
        let lines = performer_card_lines(performer);
        let card = Paragraph::new(lines.join("\n"))
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        frame.render_widget(card, *card_area);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 50, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchup Board - Help",
        "",
        "  r            Reload snapshot",
        "  ?            Toggle help",
        "  Esc          Close help",
        "  q            Quit",
        "",
        "Set SNAPSHOT_URL to point at the generated",
        "championship_results.json, or SNAPSHOT_SOURCE=file",
        "with SNAPSHOT_PATH to read it from disk.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
