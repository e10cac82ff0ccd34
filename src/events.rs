use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;

use gridlife::presets::Preset;

/// Cells moved per pan key press
const PAN_STEP: isize = 8;

/// Cells added or removed per grid resize key press
const RESIZE_STEP: isize = 10;

pub enum Event {
    EngineEvent(EngineEvent),
    AppEvent(AppEvent),
}

pub enum EngineEvent {
    /// Pause or resume the clock
    TogglePause,

    /// Advance by a single generation
    Step,

    Clear,

    /// Randomize with a fresh seed
    Randomize,

    /// Randomize again with the current seed
    Reseed,

    Faster,
    Slower,

    /// Grow or shrink the grid
    Resize(isize),

    Preset(Preset),

    /// Flip the cell under a terminal position
    Toggle { col: u16, row: u16 },

    /// Bring the cell under a terminal position to life
    Paint { col: u16, row: u16 },
}

pub enum AppEvent {
    CameraEvent(CameraEvent),

    Save,
    Load,
    ToggleTheme,

    /// Exit the application
    Exit,
}

pub enum CameraEvent {
    Move { dx: isize, dy: isize },

    /// The terminal changed size
    Resize { cols: u16, rows: u16 },
}

/// Converts a crossterm event into an application event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            convert_key(key_event)
        }
        CrossTermEvent::Mouse(mouse_event) => convert_mouse(mouse_event),
        CrossTermEvent::Resize(cols, rows) => Some(Event::AppEvent(AppEvent::CameraEvent(
            CameraEvent::Resize { cols, rows },
        ))),
        _ => None,
    }
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    use AppEvent as A;
    use EngineEvent as E;

    let engine = |e| Some(Event::EngineEvent(e));
    let app = |e| Some(Event::AppEvent(e));
    let pan = |dx, dy| Some(Event::AppEvent(A::CameraEvent(CameraEvent::Move { dx, dy })));

    match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => app(A::Exit),
        KeyEvent { code, .. } => match code {
            KeyCode::Char('q') | KeyCode::Esc => app(A::Exit),

            KeyCode::Char(' ') => engine(E::TogglePause),
            KeyCode::Char('n') => engine(E::Step),
            KeyCode::Char('c') => engine(E::Clear),
            KeyCode::Char('r') => engine(E::Randomize),
            KeyCode::Char('R') => engine(E::Reseed),
            KeyCode::Char('+') | KeyCode::Char('=') => engine(E::Faster),
            KeyCode::Char('-') => engine(E::Slower),
            KeyCode::Char(']') => engine(E::Resize(RESIZE_STEP)),
            KeyCode::Char('[') => engine(E::Resize(-RESIZE_STEP)),
            KeyCode::Char(c @ '1'..='9') => {
                let i = c as usize - '1' as usize;
                Preset::ALL.get(i).map(|&p| Event::EngineEvent(E::Preset(p)))
            }

            // movements
            KeyCode::Char('h') | KeyCode::Left => pan(-PAN_STEP, 0),
            KeyCode::Char('j') | KeyCode::Down => pan(0, PAN_STEP),
            KeyCode::Char('k') | KeyCode::Up => pan(0, -PAN_STEP),
            KeyCode::Char('l') | KeyCode::Right => pan(PAN_STEP, 0),

            KeyCode::Char('s') => app(A::Save),
            KeyCode::Char('o') => app(A::Load),
            KeyCode::Char('t') => app(A::ToggleTheme),

            _ => None,
        },
    }
}

fn convert_mouse(mouse_event: MouseEvent) -> Option<Event> {
    let MouseEvent {
        kind, column, row, ..
    } = mouse_event;

    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Event::EngineEvent(EngineEvent::Toggle {
            col: column,
            row,
        })),
        MouseEventKind::Drag(MouseButton::Left) => Some(Event::EngineEvent(EngineEvent::Paint {
            col: column,
            row,
        })),
        _ => None,
    }
}
