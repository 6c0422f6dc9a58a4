use figure_catalog::{BrowseSession, CatalogItem, PriceBlock, Totals, NO_RESULTS};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

pub struct App<'a> {
    pub session: BrowseSession<'a>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(session: BrowseSession<'a>) -> Self {
        let mut app = Self {
            session,
            state: TableState::default(),
            input_mode: InputMode::Browse,
            should_quit: false,
        };
        app.reset_selection();
        app
    }

    fn reset_selection(&mut self) {
        if self.session.filtered_len() > 0 {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn selected_item(&self) -> Option<&'a CatalogItem> {
        self.state.selected().and_then(|i| self.session.item_at(i))
    }

    // Every keystroke recomputes the whole view
    fn update_query(&mut self, query: String) {
        self.session.set_query(&query);
        self.reset_selection();
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = self.session.query().to_string();
        query.push(c);
        self.update_query(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = self.session.query().to_string();
        if query.pop().is_some() {
            self.update_query(query);
        }
    }

    pub fn clear_query(&mut self) {
        self.update_query(String::new());
    }

    pub fn open_preview(&mut self) {
        if let Some(row) = self.state.selected() {
            self.session.open_preview(row);
        }
    }

    pub fn next(&mut self) {
        let len = self.session.filtered_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.session.filtered_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.session.filtered_len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 20).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.session.filtered_len() == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(20));
        self.state.select(Some(i));
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        // Overlay swallows the next key, whatever it is
        if self.session.lightbox().is_open() {
            self.session.dismiss_preview();
            return;
        }

        match self.input_mode {
            InputMode::Search => match code {
                KeyCode::Esc | KeyCode::Enter => self.input_mode = InputMode::Browse,
                KeyCode::Backspace => self.pop_char(),
                KeyCode::Char(c) => self.push_char(c),
                KeyCode::Down => self.next(),
                KeyCode::Up => self.previous(),
                _ => {}
            },
            InputMode::Browse => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('/') => self.input_mode = InputMode::Search,
                KeyCode::Char('c') => self.clear_query(),
                KeyCode::Enter => self.open_preview(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::PageDown => self.page_down(),
                KeyCode::PageUp => self.page_up(),
                KeyCode::Home => {
                    if self.session.filtered_len() > 0 {
                        self.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    let len = self.session.filtered_len();
                    if len > 0 {
                        self.state.select(Some(len - 1));
                    }
                }
                _ => {}
            },
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Totals
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Results
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_totals(f, chunks[0], app);
    render_search(f, chunks[1], app);
    render_results(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);

    if let Some(image) = app.session.lightbox().image() {
        render_preview(f, image, app.selected_item());
    }
}

fn totals_line<'t>(label: &'t str, totals: Totals) -> Line<'t> {
    let (price, sale) = totals.formatted();
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(format!("${}", price), Style::default().fg(Color::White)),
        Span::raw("  sale "),
        Span::styled(format!("${}", sale), Style::default().fg(Color::Green)),
    ])
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        totals_line(" Collection: ", app.session.collection_totals()),
        totals_line(" Search:     ", app.session.search_totals()),
    ];

    let header = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Figure Collection "),
    );

    f.render_widget(header, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let border = if app.input_mode == InputMode::Search {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let mut spans = vec![Span::raw(" "), Span::raw(app.session.query())];
    if app.input_mode == InputMode::Search {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search "),
    );

    f.render_widget(search, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" Items ({}) ", app.session.filtered_len()));

    if app.session.filtered_len() == 0 {
        let empty = Paragraph::new(NO_RESULTS)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Name", "Series", "Character", "Price", "Discount"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.session.filtered().map(|item| {
        let cells = vec![
            Cell::from(truncate(&item.name, 38)),
            Cell::from(truncate(&item.series, 24)),
            Cell::from(truncate(&item.character, 20)),
            price_cell(&PriceBlock::for_item(item)),
            discount_cell(&PriceBlock::for_item(item)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(40),
            Constraint::Length(26),
            Constraint::Length(22),
            Constraint::Length(22),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn price_cell(block: &PriceBlock) -> Cell<'static> {
    match block {
        PriceBlock::Sale { list: Some(list), sale, .. } => Cell::from(Line::from(vec![
            Span::styled(
                figure_catalog::format_currency(*list),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
            ),
            Span::raw(" "),
            Span::styled(figure_catalog::format_currency(*sale), Style::default().fg(Color::Green)),
        ])),
        PriceBlock::Sale { .. } => Cell::from(block.current()).style(Style::default().fg(Color::Green)),
        PriceBlock::List(_) => Cell::from(block.current()),
        PriceBlock::Unpriced => Cell::from(block.current()).style(Style::default().fg(Color::DarkGray)),
    }
}

fn discount_cell(block: &PriceBlock) -> Cell<'static> {
    match block {
        PriceBlock::Sale {
            discount: Some(discount),
            ..
        } => Cell::from(format!("{}%", discount)).style(Style::default().fg(Color::Red)),
        _ => Cell::from(""),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.session.filtered_len();

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    match app.input_mode {
        InputMode::Search => {
            status_spans.push(Span::raw(" | "));
            status_spans.push(key("Enter/Esc"));
            status_spans.push(Span::raw(" Done | "));
            status_spans.push(key("Backspace"));
            status_spans.push(Span::raw(" Delete"));
        }
        InputMode::Browse => {
            status_spans.push(Span::raw(" | "));
            status_spans.push(key("/"));
            status_spans.push(Span::raw(" Search | "));
            status_spans.push(key("c"));
            status_spans.push(Span::raw(" Clear | "));
            status_spans.push(key("Enter"));
            status_spans.push(Span::raw(" Image | "));
            status_spans.push(key("↑/↓"));
            status_spans.push(Span::raw(" Nav | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_preview(f: &mut Frame, image: &str, item: Option<&CatalogItem>) {
    let area = centered_rect(70, 50, f.size());

    let mut content = vec![Line::from("")];
    if let Some(item) = item {
        content.push(Line::from(Span::styled(
            format!("  {}", item.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(""));
        if !item.link.is_empty() {
            content.push(Line::from(vec![
                Span::styled("  Link: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(item.link.clone()),
            ]));
        }
        content.push(Line::from(vec![
            Span::styled("  Price: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(PriceBlock::for_item(item).summary()),
        ]));
    }
    content.push(Line::from(vec![
        Span::styled("  Image: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(image.to_string(), Style::default().fg(Color::Green)),
    ]));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press any key to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let preview = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Image Preview "),
    );

    f.render_widget(Clear, area);
    f.render_widget(preview, area);
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

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
