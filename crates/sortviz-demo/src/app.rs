#![forbid(unsafe_code)]

//! Keyboard orchestration and the frame loop.
//!
//! `App` follows an update/view split: terminal events become [`Msg`]s,
//! [`App::update`] turns them into session calls, and [`App::view`] draws
//! the current snapshot. Worker threads are never touched from here except
//! through the session.

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use sortviz_algorithms::Algorithm;
use sortviz_core::{GeometryConfig, Viewport, VisualState};
use sortviz_runtime::{RunPhase, Session};
use web_time::Duration;

use crate::canvas::{self, Canvas};
use crate::error::Result;
use crate::terminal::TerminalGuard;

/// How long to wait for input before redrawing.
const FRAME: Duration = Duration::from_millis(33);
const SPEED_STEP: f64 = 0.05;
const SIZE_STEP: usize = 5;

/// Rows reserved for the header and footer lines.
const CHROME_ROWS: u16 = 2;

pub enum Msg {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    None,
    Quit,
}

pub struct App {
    session: Session,
    algorithm: Algorithm,
    geometry: GeometryConfig,
    width: u16,
    height: u16,
    notice: Option<String>,
}

impl App {
    pub fn new(session: Session, algorithm: Algorithm) -> Self {
        let geometry = session.config().geometry.clone();
        Self {
            session,
            algorithm,
            geometry,
            width: 0,
            height: 0,
            notice: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Key(key) => return self.on_key(key),
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                self.session.resize(chart_viewport(width, height));
            }
            Msg::Tick => {
                if let Some(outcome) = self.session.poll() {
                    self.notice = Some(format!("{}: {outcome}", self.algorithm));
                }
            }
        }
        Cmd::None
    }

    fn on_key(&mut self, key: KeyEvent) -> Cmd {
        if key.kind != KeyEventKind::Press {
            return Cmd::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Cmd::Quit;
            }
            KeyCode::Char('q') | KeyCode::Esc => return Cmd::Quit,
            KeyCode::Char(' ') => match self.session.toggle(self.algorithm) {
                Ok(phase) => {
                    tracing::debug!(%phase, "toggled");
                    self.notice = None;
                }
                Err(e) => self.notice = Some(e.to_string()),
            },
            KeyCode::Char('r') => {
                self.session.reset();
                self.notice = None;
            }
            KeyCode::Char('c') => {
                if let Some(outcome) = self.session.cancel() {
                    self.notice = Some(format!("{}: {outcome}", self.algorithm));
                }
            }
            // Algorithm and size are locked while a run is attached.
            KeyCode::Char('a' | 'A' | '[' | ']') if self.session.phase() != RunPhase::Idle => {}
            KeyCode::Char('a') => self.switch(self.algorithm.next()),
            KeyCode::Char('A') => self.switch(self.algorithm.prev()),
            KeyCode::Char('+' | '=') => {
                let speed = (self.session.speed() + SPEED_STEP).min(1.0);
                self.session.set_speed(speed);
            }
            KeyCode::Char('-' | '_') => {
                let speed = (self.session.speed() - SPEED_STEP).max(SPEED_STEP);
                self.session.set_speed(speed);
            }
            KeyCode::Char('[') => {
                let size = self.session.size().saturating_sub(SIZE_STEP).max(1);
                self.session.set_size(size);
                self.notice = None;
            }
            KeyCode::Char(']') => {
                let size = self.session.size() + SIZE_STEP;
                self.session.set_size(size);
                self.notice = None;
            }
            _ => {}
        }
        Cmd::None
    }

    fn switch(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
        self.session.reset();
        self.notice = None;
    }

    pub fn header(&self) -> String {
        let complexity = self.algorithm.complexity();
        format!(
            " {} | {} | n={} | speed {:.2} | best {} avg {} worst {}",
            self.algorithm,
            self.session.phase(),
            self.session.size(),
            self.session.speed(),
            complexity.best,
            complexity.average,
            complexity.worst,
        )
    }

    pub fn footer(&self) -> String {
        match &self.notice {
            Some(notice) => format!(" {notice}"),
            None => {
                let (action, setup) = match self.session.phase() {
                    RunPhase::Idle => ("play", "  a/A algorithm  [/] size"),
                    RunPhase::Running => ("pause", ""),
                    RunPhase::Paused => ("resume", ""),
                };
                format!(" space {action}  r reset  c cancel{setup}  +/- speed  q quit")
            }
        }
    }

    pub fn compose(&self) -> Canvas {
        canvas::compose(
            &self.session.snapshot(),
            &self.geometry,
            self.width,
            self.height.saturating_sub(CHROME_ROWS),
        )
    }

    pub fn view(&self, out: &mut impl Write) -> io::Result<()> {
        let width = usize::from(self.width);
        queue!(out, terminal::Clear(terminal::ClearType::All), ResetColor)?;
        queue!(out, cursor::MoveTo(0, 0), Print(fit(&self.header(), width)))?;

        let canvas = self.compose();
        for y in 0..canvas.height() {
            queue!(out, cursor::MoveTo(0, y + 1))?;
            let mut current = None;
            for cell in canvas.row(y) {
                match cell {
                    Some(paint) => {
                        if current != Some(paint.tone) {
                            queue!(out, SetForegroundColor(tone_color(paint.tone)))?;
                            current = Some(paint.tone);
                        }
                        queue!(out, Print(paint.glyph))?;
                    }
                    None => queue!(out, Print(' '))?,
                }
            }
        }

        queue!(
            out,
            ResetColor,
            cursor::MoveTo(0, self.height.saturating_sub(1)),
            Print(fit(&self.footer(), width))
        )?;
        out.flush()
    }
}

/// Drive `app` until the user quits.
pub fn run(mut app: App, terminal: &TerminalGuard) -> Result<()> {
    let (width, height) = terminal.size()?;
    app.update(Msg::Resize(width, height));
    let mut stdout = io::stdout();

    loop {
        app.update(Msg::Tick);
        app.view(&mut stdout)?;

        if !event::poll(FRAME)? {
            continue;
        }
        let msg = match event::read()? {
            Event::Key(key) => Msg::Key(key),
            Event::Resize(width, height) => Msg::Resize(width, height),
            _ => continue,
        };
        if app.update(msg) == Cmd::Quit {
            break;
        }
    }
    tracing::info!("quit");
    Ok(())
}

fn chart_viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(
        f64::from(width),
        f64::from(height.saturating_sub(CHROME_ROWS)),
    )
}

fn tone_color(tone: VisualState) -> Color {
    match tone {
        VisualState::Idle => Color::DarkCyan,
        VisualState::Comparing => Color::Red,
        VisualState::Special => Color::Magenta,
        VisualState::PartlySorted => Color::Yellow,
        VisualState::Sorted => Color::Green,
    }
}

/// Truncate or pad `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut line: String = text.chars().take(width).collect();
    let len = line.chars().count();
    line.extend(std::iter::repeat_n(' ', width - len));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortviz_runtime::{RunOutcome, SessionConfig, VirtualPacer};
    use std::time::Instant;

    fn app() -> App {
        let config = SessionConfig {
            size: 10,
            seed: Some(1),
            geometry: GeometryConfig::terminal(),
            ..SessionConfig::default()
        };
        let session = Session::new(config)
            .unwrap()
            .with_pacer(VirtualPacer::new());
        let mut app = App::new(session, Algorithm::Bubble);
        app.update(Msg::Resize(40, 24));
        app
    }

    fn press(app: &mut App, c: char) -> Cmd {
        app.update(Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, 'q'), Cmd::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.update(Msg::Key(ctrl_c)), Cmd::Quit);
        assert_eq!(press(&mut app, 'x'), Cmd::None);
    }

    #[test]
    fn algorithm_cycles_both_ways() {
        let mut app = app();
        press(&mut app, 'a');
        assert_eq!(app.algorithm(), Algorithm::Insertion);
        press(&mut app, 'A');
        press(&mut app, 'A');
        assert_eq!(app.algorithm(), Algorithm::Heap);
    }

    #[test]
    fn algorithm_and_size_are_locked_during_a_run() {
        let config = SessionConfig {
            size: 10,
            seed: Some(1),
            speed: 0.05,
            geometry: GeometryConfig::terminal(),
            ..SessionConfig::default()
        };
        let mut app = App::new(Session::new(config).unwrap(), Algorithm::Bubble);
        app.update(Msg::Resize(40, 24));

        press(&mut app, ' ');
        press(&mut app, ' ');
        assert_eq!(app.session().phase(), RunPhase::Paused);
        assert!(!app.footer().contains("a/A"));

        for key in ['a', 'A', '[', ']'] {
            press(&mut app, key);
        }
        assert_eq!(app.session().phase(), RunPhase::Paused);
        assert_eq!(app.algorithm(), Algorithm::Bubble);
        assert_eq!(app.session().size(), 10);

        press(&mut app, 'c');
        assert_eq!(app.session().phase(), RunPhase::Idle);
        press(&mut app, 'a');
        assert_eq!(app.algorithm(), Algorithm::Insertion);
    }

    #[test]
    fn speed_is_clamped() {
        let mut app = app();
        for _ in 0..30 {
            press(&mut app, '+');
        }
        assert_eq!(app.session().speed(), 1.0);
        for _ in 0..30 {
            press(&mut app, '-');
        }
        assert!((app.session().speed() - SPEED_STEP).abs() < 1e-9);
    }

    #[test]
    fn size_keys_regenerate_the_array() {
        let mut app = app();
        press(&mut app, ']');
        assert_eq!(app.session().size(), 15);
        assert_eq!(app.session().values().len(), 15);
        for _ in 0..10 {
            press(&mut app, '[');
        }
        assert_eq!(app.session().size(), 1);
    }

    #[test]
    fn space_runs_to_completion() {
        let mut app = app();
        press(&mut app, ' ');
        let deadline = Instant::now() + std::time::Duration::from_secs(10);
        while app.notice().is_none() && Instant::now() < deadline {
            app.update(Msg::Tick);
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(app.notice(), Some("Bubble Sort: completed"));
        assert_eq!(app.session().last_outcome(), Some(&RunOutcome::Completed));
        assert!(app.session().is_fully_sorted());
    }

    #[test]
    fn chart_leaves_room_for_chrome() {
        let app = app();
        let canvas = app.compose();
        assert_eq!(canvas.width(), 40);
        assert_eq!(canvas.height(), 22);
        assert!((0..22).any(|y| canvas.row_text(y).contains(canvas::BAR)));
    }

    #[test]
    fn header_and_footer_describe_state() {
        let app = app();
        let header = app.header();
        assert!(header.contains("Bubble Sort"));
        assert!(header.contains("idle"));
        assert!(header.contains("n=10"));
        assert!(app.footer().contains("space play"));
        assert!(app.footer().contains("a/A algorithm"));
    }

    #[test]
    fn view_writes_a_frame() {
        let app = app();
        let mut out = Vec::new();
        app.view(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Bubble Sort"));
        assert!(text.contains(canvas::BAR));
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
    }
}
