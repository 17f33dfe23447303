//! pickdown: pick a node in an HTML document and capture it as Markdown.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use pickdown::app_state::{AppState, CommandOutcome, View};
use pickdown::convert::{Engine, Options};
use pickdown::document::Document;
use pickdown::export::Export;
use pickdown::navigator::{CaptureSession, Command, MarkedNode, Navigation, Selector};
use pickdown::{config, input, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pickdown")]
#[command(about = "Pick a node in an HTML document and capture it as Markdown", long_about = None)]
struct Args {
    /// HTML file to capture from
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// JSON file of live form state keyed by element id
    #[arg(long, value_name = "STATE")]
    state: Option<PathBuf>,

    /// Capture the element with this id without opening the TUI
    #[arg(long, value_name = "ELEMENT_ID")]
    id: Option<String>,

    /// Write the Markdown here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the capture as a JSON record (batch mode)
    #[arg(long)]
    json: bool,

    /// Log to this file while the TUI is running
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Marker for unordered list items
    #[arg(long, value_name = "MARKER")]
    bullet: Option<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(bullet) = args.bullet.clone() {
        cfg.bullet_marker = bullet;
    }

    init_logging(args.id.is_some(), args.log_file.as_deref())?;

    let doc = input::load_with_state(&args.path, args.state.as_deref())?;
    let engine = Engine::new(Options::from(&cfg));

    if let Some(element_id) = args.id.as_deref() {
        return run_batch(&args, &doc, &engine, element_id);
    }

    let app = AppState::new(args.path.clone(), &doc, &cfg);
    run_tui(app, &doc, &engine, args.output.as_deref())
}

fn init_logging(batch: bool, log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if batch {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn run_batch(args: &Args, doc: &Document, engine: &Engine, element_id: &str) -> io::Result<()> {
    let node = doc.find_by_id(element_id).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no element with id {element_id:?}"),
        )
    })?;

    let mut selector = Selector::new(MarkedNode::default());
    let capture = selector.begin(doc, node).commit(engine);
    let export = Export {
        source: args.path.display().to_string(),
        node: doc.breadcrumb(capture.node),
        markdown: capture.markdown,
    };

    match (&args.output, args.json) {
        (Some(path), _) => export.write_to(path),
        (None, true) => {
            println!("{}", export.to_json()?);
            Ok(())
        }
        (None, false) => {
            println!("{}", export.markdown);
            Ok(())
        }
    }
}

fn run_tui(
    mut app: AppState,
    doc: &Document,
    engine: &Engine,
    output: Option<&Path>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, doc, engine, &mut editor_handler);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else if let Some(path) = output {
        if let Some(export) = app.export(doc) {
            export.write_to(path)?;
        }
    } else if app.written_to.is_none() {
        if let Some(markdown) = app.editor_markdown() {
            println!("{markdown}");
        }
    }

    Ok(())
}

/// How a selection loop ended.
enum SessionEnd {
    Commit,
    Cancel,
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    doc: &Document,
    engine: &Engine,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    let mut selector = Selector::new(MarkedNode::default());
    loop {
        match app.current_view {
            View::Select => {
                let start = app.start_node(doc);
                let mut session = selector.begin(doc, start);
                match run_session(terminal, app, &mut session, engine)? {
                    SessionEnd::Commit => {
                        let capture = session.commit(engine);
                        app.enter_preview(capture);
                    }
                    SessionEnd::Cancel => {
                        session.cancel();
                        return Ok(());
                    }
                }
            }
            View::Preview | View::Command => {
                terminal.draw(|f| ui::draw_preview(f, app, doc))?;
                if let Event::Key(key) = event::read()? {
                    if handle_preview_key(app, doc, key, editor_handler) == CommandOutcome::Quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn run_session<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    session: &mut CaptureSession<'_, MarkedNode>,
    engine: &Engine,
) -> io::Result<SessionEnd> {
    loop {
        let preview = app.show_preview.then(|| session.preview(engine));
        terminal.draw(|f| {
            ui::draw_select(
                f,
                app,
                session.document(),
                session.highlighter(),
                preview.as_deref(),
            );
        })?;

        let command = match event::read()? {
            Event::Key(key) => key_command(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => Command::from_wheel(-1.0),
                MouseEventKind::ScrollDown => Command::from_wheel(1.0),
                _ => None,
            },
            _ => None,
        };

        app.message = None;
        match command {
            Some(Command::Navigate(nav)) => {
                session.navigate(nav);
            }
            Some(Command::Commit) => return Ok(SessionEnd::Commit),
            Some(Command::Cancel) => return Ok(SessionEnd::Cancel),
            None => {}
        }
    }
}

fn key_command(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Up => Some(Command::Navigate(Navigation::Parent)),
        KeyCode::Down => Some(Command::Navigate(Navigation::FirstChild)),
        KeyCode::Left => Some(Command::Navigate(Navigation::PreviousSibling)),
        KeyCode::Right => Some(Command::Navigate(Navigation::NextSibling)),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Cancel),
        KeyCode::Enter => Some(Command::Commit),
        KeyCode::Char(c) => Command::from_key(c.encode_utf8(&mut [0; 4])),
        _ => None,
    }
}

fn handle_preview_key(
    app: &mut AppState,
    doc: &Document,
    key: KeyEvent,
    editor_handler: &mut EditorEventHandler,
) -> CommandOutcome {
    match app.current_view {
        View::Command => match key.code {
            KeyCode::Char(c) => app.command_buffer.push(c),
            KeyCode::Backspace => {
                app.command_buffer.pop();
            }
            KeyCode::Enter => {
                let cmd = app.command_buffer.clone();
                app.command_buffer.clear();
                return app.run_command(doc, &cmd);
            }
            KeyCode::Esc => {
                app.current_view = View::Preview;
                app.command_buffer.clear();
            }
            _ => {}
        },
        View::Preview => {
            let normal_mode = app
                .editor_state
                .as_ref()
                .is_some_and(|s| s.mode == edtui::EditorMode::Normal);
            match key.code {
                KeyCode::Char(':') if normal_mode => {
                    app.current_view = View::Command;
                    app.command_buffer.clear();
                    app.message = None;
                }
                KeyCode::Esc if normal_mode => app.exit_preview(),
                _ => {
                    if let Some(ref mut editor_state) = app.editor_state {
                        editor_handler.on_key_event(key, editor_state);
                    }
                }
            }
        }
        View::Select => {}
    }
    CommandOutcome::Continue
}
