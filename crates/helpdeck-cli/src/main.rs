use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use helpdeck_config::Config;
use helpdeck_engine::{
    Block, Clipboard, DirectorySource, DocumentSession, RenderNode, Section,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as UiBlock, Borders, List, ListItem, ListState, Paragraph},
};
use std::{cell::RefCell, env, io::stdout, path::PathBuf, process, rc::Rc};

/// In-process clipboard: keeps the last copied text so the status line
/// can report it. The engine only requires the `Clipboard` contract;
/// wiring a system clipboard in is a sink concern.
#[derive(Clone, Default)]
struct CopyBuffer(Rc<RefCell<Option<String>>>);

impl CopyBuffer {
    fn last_len(&self) -> Option<usize> {
        self.0.borrow().as_ref().map(|text| text.len())
    }
}

impl Clipboard for CopyBuffer {
    fn set_text(&mut self, text: &str) {
        *self.0.borrow_mut() = Some(text.to_string());
    }
}

enum InputMode {
    Browse,
    Search,
}

struct App {
    session: DocumentSession,
    list_state: ListState,
    input_mode: InputMode,
    copied: CopyBuffer,
}

impl App {
    fn new(docs_path: PathBuf) -> Self {
        let source = DirectorySource::new(docs_path);
        let copied = CopyBuffer::default();
        let session = DocumentSession::new(&source, Box::new(copied.clone()));

        let mut app = Self {
            session,
            list_state: ListState::default(),
            input_mode: InputMode::Browse,
            copied,
        };
        app.sync_list_state();
        app
    }

    fn sync_list_state(&mut self) {
        self.list_state.select(self.session.selected_filtered_index());
    }

    fn next_document(&mut self) {
        let count = self.session.filtered_len();
        if count == 0 {
            return;
        }
        let next = match self.session.selected_filtered_index() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.session.select(next);
        self.sync_list_state();
    }

    fn previous_document(&mut self) {
        let count = self.session.filtered_len();
        if count == 0 {
            return;
        }
        let previous = match self.session.selected_filtered_index() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.session.select(previous);
        self.sync_list_state();
    }

    fn push_query_char(&mut self, c: char) {
        let mut query = self.session.search_query().to_string();
        query.push(c);
        self.session.set_query(&query);
        self.sync_list_state();
    }

    fn pop_query_char(&mut self) {
        let mut query = self.session.search_query().to_string();
        query.pop();
        self.session.set_query(&query);
        self.sync_list_state();
    }

    /// Copies the nth code block of the rendered document (1-based,
    /// matching the numbers shown next to each block).
    fn copy_code_block(&mut self, number: usize) {
        let Some(rendered) = self.session.rendered() else {
            return;
        };
        let Some(code) = rendered.code_blocks().get(number - 1).map(|c| c.to_string()) else {
            return;
        };
        self.session.copy_code(&code);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let docs_path = resolve_docs_path(&args);

    // An unreadable docs folder is not fatal: the session surfaces it
    // as an empty document list with a status message.
    log::info!("opening docs folder: {}", docs_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(docs_path);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Docs folder from the command line, falling back to the config file.
/// Prints usage and exits when neither yields a path.
fn resolve_docs_path(args: &[String]) -> PathBuf {
    match args.len() {
        2 => PathBuf::from(&args[1]),
        1 => match Config::load() {
            Ok(Some(config)) => config.docs_path,
            Ok(None) => {
                eprintln!("Error: no docs folder given and no config file found");
                eprintln!("Usage: {} <docs-folder-path>", args[0]);
                eprintln!(
                    "Or create a config file at {}",
                    Config::config_path().display()
                );
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: failed to load config file: {e}");
                eprintln!("Usage: {} <docs-folder-path>", args[0]);
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [docs-folder-path]", args[0]);
            process::exit(1);
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.input_mode {
                InputMode::Browse => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('/') => app.input_mode = InputMode::Search,
                    KeyCode::Down | KeyCode::Char('j') => app.next_document(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_document(),
                    KeyCode::Char('e') => app.session.toggle_sections(),
                    KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                        app.copy_code_block(c as usize - '0' as usize);
                    }
                    _ => {}
                },
                InputMode::Search => match key.code {
                    KeyCode::Esc | KeyCode::Enter => app.input_mode = InputMode::Browse,
                    KeyCode::Backspace => app.pop_query_char(),
                    KeyCode::Char(c) => app.push_query_char(c),
                    _ => {}
                },
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    // Search bar
    let search_title = match app.input_mode {
        InputMode::Browse => "Search (press /)",
        InputMode::Search => "Search (Esc to close)",
    };
    let search = Paragraph::new(app.session.search_query().to_string())
        .block(UiBlock::default().borders(Borders::ALL).title(search_title));
    f.render_widget(search, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(chunks[1]);

    // Document list panel
    let items: Vec<ListItem> = app
        .session
        .filtered_documents()
        .map(|document| ListItem::new(vec![Line::from(vec![Span::raw(document.title().to_string())])]))
        .collect();

    let list = List::new(items)
        .block(UiBlock::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(list, panes[0], &mut app.list_state);

    // Content panel
    let content = Paragraph::new(content_lines(app))
        .block(UiBlock::default().borders(Borders::ALL).title("Content"))
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(content, panes[1]);

    // Status line
    let mut status = app.session.status_text().to_string();
    if let Some(len) = app.copied.last_len() {
        status.push_str(&format!(" | Copied code block ({len} bytes)"));
    }
    f.render_widget(Paragraph::new(Line::from(status)), chunks[2]);

    // Help line
    let help = match app.input_mode {
        InputMode::Browse => format!(
            "q: Quit | /: Search | ↑/k ↓/j: Select | e: {} | 1-9: Copy code block",
            app.session.expand_collapse_label()
        ),
        InputMode::Search => "Type to filter and highlight | Esc: Done".to_string(),
    };
    f.render_widget(Paragraph::new(Line::from(help)), chunks[3]);
}

fn content_lines(app: &App) -> Vec<Line<'static>> {
    let Some(rendered) = app.session.rendered() else {
        return vec![Line::from("Select a document from the list.")];
    };

    let mut lines = Vec::new();
    // Code blocks are numbered across the whole document so the 1-9
    // copy keys line up with what is on screen.
    let mut code_number = 0;

    for node in &rendered.nodes {
        match node {
            RenderNode::SingleBlock(block) => {
                push_block_lines(app, block, "", &mut code_number, &mut lines);
            }
            RenderNode::Section(section) => {
                lines.push(section_header(section));
                if section.expanded {
                    for block in &section.blocks {
                        push_block_lines(app, block, "  ", &mut code_number, &mut lines);
                    }
                }
            }
        }
    }

    lines
}

fn section_header(section: &Section) -> Line<'static> {
    let marker = if section.expanded { "▼" } else { "▶" };
    let style = if section.level == 2 {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD | Modifier::DIM)
    };
    Line::from(Span::styled(format!("{marker} {}", section.title), style))
}

fn push_block_lines(
    app: &App,
    block: &Block,
    indent: &str,
    code_number: &mut usize,
    lines: &mut Vec<Line<'static>>,
) {
    match block {
        Block::Blank => lines.push(Line::from("")),
        Block::Code { text } => {
            *code_number += 1;
            lines.push(Line::from(Span::styled(
                format!("{indent}``` [{code_number}: copy]"),
                Style::default().add_modifier(Modifier::DIM),
            )));
            for code_line in text.lines() {
                lines.push(Line::from(Span::styled(
                    format!("{indent}{code_line}"),
                    Style::default().fg(Color::Cyan),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("{indent}```"),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        _ => {
            let mut spans = vec![Span::raw(indent.to_string())];
            if let Block::Heading { level, .. } = block {
                spans.push(Span::styled(
                    format!("{} ", "#".repeat(*level as usize)),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
            let base_bold = matches!(block, Block::Heading { .. });
            if let Some(runs) = app.session.runs_for(block) {
                for run in runs {
                    let mut style = Style::default();
                    if run.bold || base_bold {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    if run.highlighted {
                        style = style.bg(Color::Yellow).fg(Color::Black);
                    }
                    spans.push(Span::styled(run.text, style));
                }
            }
            lines.push(Line::from(spans));
        }
    }
}
