use std::fs::File;
use std::io;
use std::io::Stdout;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::error;
use tracing_subscriber::EnvFilter;

use gridlife::camera::Camera;
use gridlife::cell::Cell;
use gridlife::clock::ClockState;
use gridlife::config::Config;
use gridlife::render;
use gridlife::session::Session;

use events::AppEvent;
use events::CameraEvent;
use events::EngineEvent;
use events::Event;

mod events;

/// Rows kept below the grid for the status line
const STATUS_ROWS: u16 = 1;

/// How long to wait for input while no step is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Raw mode and the alternate screen, restored on drop
struct TermGuard {
    out: Stdout,
}

impl TermGuard {
    fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;

        Ok(Self { out })
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

struct App {
    session: Session,
    cam: Camera,
    config: Config,

    /// Terminal rows used by the camera
    rows: u16,

    /// Last thing worth telling the user
    message: String,
}

enum Flow {
    Continue,
    Exit,
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    // Anything written to the terminal would end up on top of the grid
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn camera_rows(rows: u16) -> u16 {
    rows.saturating_sub(STATUS_ROWS).max(1)
}

impl App {
    fn new(config: Config) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size().context("Failed to read the terminal size")?;
        let rows = camera_rows(rows);
        let cam = Camera::for_terminal(cols, rows);

        let settings = config.settings((cam.width(), cam.height()))?;
        let mut session = Session::new(settings).context("Failed to create the grid")?;

        if let Some(path) = &config.load {
            session
                .load_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }

        if let Some(preset) = config.preset {
            session
                .load_preset(preset)
                .with_context(|| format!("Failed to load preset {preset}"))?;
        }

        Ok(Self {
            session,
            cam,
            config,
            rows,
            message: String::new(),
        })
    }

    fn handle(&mut self, event: Event) -> Flow {
        let res = match event {
            Event::AppEvent(AppEvent::Exit) => return Flow::Exit,
            Event::AppEvent(event) => self.handle_app(event),
            Event::EngineEvent(event) => self.handle_engine(event),
        };

        if let Err(e) = res {
            error!("{e:#}");
            self.message = format!("{e:#}");
        }

        Flow::Continue
    }

    fn handle_app(&mut self, event: AppEvent) -> anyhow::Result<()> {
        match event {
            AppEvent::Exit => {}
            AppEvent::CameraEvent(CameraEvent::Move { dx, dy }) => self.session.pan(dx, dy),
            AppEvent::CameraEvent(CameraEvent::Resize { cols, rows }) => {
                self.rows = camera_rows(rows);
                self.cam = Camera::for_terminal(cols, self.rows);
                self.session
                    .set_visible_size(self.cam.width(), self.cam.height());
            }
            AppEvent::Save => {
                let path = &self.config.save_path;
                self.session.save_file(path)?;
                self.message = format!("Saved to {}", path.display());
            }
            AppEvent::Load => {
                let path = &self.config.save_path;
                self.session.load_file(path)?;
                self.message = format!("Loaded {}", path.display());
            }
            AppEvent::ToggleTheme => {
                let theme = self.session.theme().toggled();
                self.session.set_theme(theme);
            }
        }

        Ok(())
    }

    fn handle_engine(&mut self, event: EngineEvent) -> anyhow::Result<()> {
        let session = &mut self.session;

        match event {
            EngineEvent::TogglePause => {
                session.toggle_pause();
            }
            EngineEvent::Step => session.step(),
            EngineEvent::Clear => session.clear(),
            EngineEvent::Randomize => {
                let seed = session.randomize(None)?;
                self.message = format!("Seed {seed}");
            }
            EngineEvent::Reseed => {
                let seed = session.seed();
                session.randomize(seed)?;
            }
            EngineEvent::Faster => {
                let rate = session.clock().frame_rate().faster();
                session.set_frame_rate(rate);
            }
            EngineEvent::Slower => {
                let rate = session.clock().frame_rate().slower();
                session.set_frame_rate(rate);
            }
            EngineEvent::Resize(delta) => session.resize_by(delta)?,
            EngineEvent::Preset(preset) => {
                session.load_preset(preset)?;
                self.message = preset.to_string();
            }
            EngineEvent::Toggle { col, row } if row < self.rows => {
                let (px, py) = terminal_to_pixels(col, row);
                session.toggle_at(px, py, 1.0)?;
            }
            EngineEvent::Paint { col, row } if row < self.rows => {
                let (px, py) = terminal_to_pixels(col, row);
                session.paint_at(px, py, 1.0, Cell::Alive)?;
            }
            // Clicks on the status line
            EngineEvent::Toggle { .. } | EngineEvent::Paint { .. } => {}
        }

        Ok(())
    }

    fn status_line(&self) -> String {
        let session = &self.session;
        let grid = session.grid();
        let (x, y) = session.viewport().offset();

        let state = match session.clock().state() {
            ClockState::Running => "running",
            ClockState::Paused => "paused",
        };

        let seed = session
            .seed()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            " gen {} | pop {} | {} fps {} | {}x{} at ({}, {}) | seed {} | {}",
            session.generation(),
            session.population(),
            session.clock().frame_rate().get(),
            state,
            grid.width(),
            grid.height(),
            x,
            y,
            seed,
            self.message,
        )
    }

    fn draw(&mut self, out: &mut Stdout) -> io::Result<()> {
        let (cols, _) = terminal::size()?;
        let status: String = self.status_line().chars().take(cols as usize).collect();
        let (fg, bg) = self.session.theme().colors();

        render::draw(self.session.grid(), self.session.viewport(), &mut self.cam);

        queue!(
            out,
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(bg),
            terminal::Clear(terminal::ClearType::All),
        )?;

        for (i, line) in self.cam.render().lines().enumerate() {
            queue!(out, cursor::MoveTo(0, i as u16), style::Print(line))?;
        }

        queue!(
            out,
            cursor::MoveTo(0, self.rows),
            style::SetAttribute(style::Attribute::Reverse),
            style::Print(status),
            style::SetAttribute(style::Attribute::Reset),
        )?;

        out.flush()
    }
}

/// Each terminal character shows 2x4 cells. Returns the position of its top-left cell.
fn terminal_to_pixels(col: u16, row: u16) -> (f64, f64) {
    (col as f64 * 2.0, row as f64 * 4.0)
}

fn run(app: &mut App, out: &mut Stdout) -> anyhow::Result<()> {
    let mut dirty = true;

    loop {
        if app.session.tick(Instant::now()) {
            dirty = true;
        }

        if dirty {
            app.draw(out)?;
            dirty = false;
        }

        let timeout = app
            .session
            .clock()
            .deadline()
            .map(|t| t.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        if !event::poll(timeout)? {
            continue;
        }

        let Some(event) = events::convert_event(event::read()?) else {
            continue;
        };

        match app.handle(event) {
            Flow::Exit => break,
            Flow::Continue => dirty = true,
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_file.as_deref())?;

    let mut app = App::new(config)?;

    let mut term = TermGuard::new().context("Failed to set up the terminal")?;
    run(&mut app, &mut term.out)
}
