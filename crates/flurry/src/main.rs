use std::{
    io::stdout,
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use flurry_config::{Config, ConfigSource};
use flurry_core::SceneEvent;
use flurry_scenes::SceneState;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};

mod cli;
mod logging;

use cli::Cli;

/// Without key release reporting, Space presses closer together than this
/// are auto-repeat from a held key.
const JUMP_REPEAT_WINDOW: Duration = Duration::from_millis(600);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let (config, source) = Config::load(cli.config.as_deref())?;
    let config = cli.apply(config);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if let Some(path) = logging::init(&config.log)? {
        log::info!("Logging to {}", path.display());
    }
    match source {
        ConfigSource::File(_) => log::info!("{source}"),
        ConfigSource::Missing(_) | ConfigSource::NoConfigDir => log::debug!("{source}"),
    }

    let state = SceneState::new(
        config.scene,
        config.tuning(),
        config.palette,
        config.speed,
        config.fps,
        config.seed,
    );

    if let Some(frames) = cli.frames {
        return run_headless(state, frames);
    }

    let terminal = ratatui::init();
    let key_release = matches!(supports_keyboard_enhancement(), Ok(true));
    let result = enable_input(key_release)
        .and_then(|()| App::new(state, config.fps, key_release).run(terminal));
    disable_input(key_release);
    ratatui::restore();
    result
}

/// Turn on mouse reporting, and key release reporting where supported.
fn enable_input(key_release: bool) -> color_eyre::Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    if key_release {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(())
}

fn disable_input(key_release: bool) {
    if key_release {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout(), DisableMouseCapture);
}

/// Step the scene against an off-screen raster sized like the terminal.
fn run_headless(mut state: SceneState, frames: u64) -> color_eyre::Result<()> {
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    state.resize(usize::from(width), usize::from(height) * 2);

    let started = Instant::now();
    for _ in 0..frames {
        state.step();
    }
    let elapsed = started.elapsed();
    let rate = frames as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    log::info!("Headless run: {frames} {} frames in {elapsed:.2?}", state.kind());
    println!(
        "{frames} frames of {} at {width}x{height} (seed {}) in {elapsed:.2?}, {rate:.1} fps",
        state.kind(),
        state.seed()
    );
    Ok(())
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// The animated scene.
    state: SceneState,
    /// Clock the animation runs against.
    started: Instant,
    /// Wall-clock time per drawn frame.
    frame_budget: Duration,
    /// Show the key help line.
    show_help: bool,
    /// Area of the last drawn frame, for mapping mouse cells.
    last_area: Rect,
    /// Whether the terminal reports key releases.
    key_release: bool,
    /// Jump key is down (or toggled on when releases are not reported).
    jump_held: bool,
    /// Time of the last Space press while charging.
    jump_pressed_at: Option<Instant>,
    /// Auto-repeat presses have been seen for the current charge.
    jump_repeating: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(state: SceneState, fps: u32, key_release: bool) -> Self {
        Self {
            running: false,
            state,
            started: Instant::now(),
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            show_help: true,
            last_area: Rect::default(),
            key_release,
            jump_held: false,
            jump_pressed_at: None,
            jump_repeating: false,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let frame_start = Instant::now();
            terminal.draw(|frame| self.render(frame))?;
            let remaining = self.frame_budget.saturating_sub(frame_start.elapsed());
            self.handle_crossterm_events(remaining)?;
            self.release_stale_jump(Instant::now());
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;

        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.state.render(frame, elapsed_ms);

        if !self.show_help {
            return;
        }

        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let help = Line::from(vec![
            "q".bold().white(),
            " quit  ".dark_gray(),
            "n".bold().white(),
            format!(" {}  ", self.state.kind()).dark_gray(),
            "s".bold().white(),
            format!(" {}  ", self.state.speed()).dark_gray(),
            "c".bold().white(),
            format!(" {}  ", self.state.palette()).dark_gray(),
            "r".bold().white(),
            " reseed  ".dark_gray(),
            "space".bold().white(),
            " jump  ".dark_gray(),
            "h".bold().white(),
            " hide".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// Waits up to `timeout` for the first event, then drains what is queued.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        let mut timeout = timeout;
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                _ => {}
            }
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char(' ') {
            self.on_jump_key(key.kind, Instant::now());
            return;
        }
        if key.kind != KeyEventKind::Press {
            return;
        }
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('n') | KeyCode::Tab) => {
                self.jump_held = false;
                self.state.next_scene();
            }
            (_, KeyCode::Char('s')) => self.state.set_speed(self.state.speed().next()),
            (_, KeyCode::Char('c')) => self.state.set_palette(self.state.palette().next()),
            (_, KeyCode::Char('r')) => {
                self.jump_held = false;
                self.state.reseed(None);
            }
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Space charges on press and jumps on release.
    ///
    /// Terminals that never report releases send repeated presses while the
    /// key is down. A press within [`JUMP_REPEAT_WINDOW`] of the previous one
    /// keeps charging; a later press is a second tap and jumps.
    fn on_jump_key(&mut self, kind: KeyEventKind, now: Instant) {
        match kind {
            KeyEventKind::Press if !self.jump_held => {
                self.jump_held = true;
                self.jump_repeating = false;
                self.jump_pressed_at = Some(now);
                self.state.handle_event(SceneEvent::JumpPressed);
            }
            KeyEventKind::Press if !self.key_release => {
                if self.within_repeat_window(now) {
                    self.jump_repeating = true;
                    self.jump_pressed_at = Some(now);
                } else {
                    self.release_jump();
                }
            }
            KeyEventKind::Release => {
                self.key_release = true;
                self.release_jump();
            }
            _ => {}
        }
    }

    fn within_repeat_window(&self, now: Instant) -> bool {
        self.jump_pressed_at
            .is_some_and(|at| now.saturating_duration_since(at) <= JUMP_REPEAT_WINDOW)
    }

    /// Auto-repeat that stops means the held key was let go.
    fn release_stale_jump(&mut self, now: Instant) {
        if self.jump_held
            && self.jump_repeating
            && !self.key_release
            && !self.within_repeat_window(now)
        {
            self.release_jump();
        }
    }

    fn release_jump(&mut self) {
        self.jump_held = false;
        self.jump_repeating = false;
        self.jump_pressed_at = None;
        self.state.handle_event(SceneEvent::JumpReleased);
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let area = self.last_area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let x = (f32::from(mouse.column.saturating_sub(area.x)) + 0.5) / f32::from(area.width);
        let y = (f32::from(mouse.row.saturating_sub(area.y)) + 0.5) / f32::from(area.height);
        let event = match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => SceneEvent::PointerMoved { x, y },
            MouseEventKind::Down(MouseButton::Left) => SceneEvent::PointerDown { x, y },
            MouseEventKind::Up(MouseButton::Left) => SceneEvent::PointerUp,
            _ => return,
        };
        self.state.handle_event(event);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
