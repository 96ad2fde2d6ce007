//! Terminal front end: ticks the growth controller and paints each frame.

use crate::canvas::BrailleCanvas;
use crate::config::GrowConfig;
use crate::controller::{Advance, GrowthController};
use crate::error::Result;
use crate::help::show_help_modal;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::style::Color;
use log::debug;
use rand::prelude::*;
use std::time::{Duration, Instant};

const HELP: &str = "\
FRACTREE
─────────────────
q/Esc  Quit
Space  Pause
1-9,0  Speed
r      Regrow
?      Close help";

/// Rows kept free below the canvas for the status line
const STATUS_ROWS: u16 = 1;

/// Runtime state for interactive controls
pub struct GrowState {
    pub speed: f32,
    pub paused: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Regrow,
    Help,
}

impl GrowState {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            speed: initial_speed,
            paused: false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('r') => return KeyAction::Regrow,
            KeyCode::Char('?') => return KeyAction::Help,
            KeyCode::Char(' ') => self.paused = !self.paused,
            // 1 = fastest, 9 and 0 = slowest
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10) {
                    self.speed = match n {
                        1 => 0.005,
                        2 => 0.01,
                        3 => 0.02,
                        4 => 0.03,
                        5 => 0.05,
                        6 => 0.07,
                        7 => 0.1,
                        8 => 0.15,
                        _ => 0.2,
                    };
                }
            }
            _ => {}
        }
        KeyAction::None
    }
}

/// One tree growing on one canvas
pub struct Session {
    pub tree: GrowthController,
    pub canvas: BrailleCanvas,
    pub seed: u64,
    rng: StdRng,
    ticks: u32,
    ticks_per_level: u32,
    finished_at: Option<Instant>,
}

impl Session {
    /// Build a tree sized for a `cols` x `rows` cell area
    pub fn new(config: &GrowConfig, seed: u64, cols: u16, rows: u16) -> Result<Self> {
        let canvas = BrailleCanvas::new(cols, rows.saturating_sub(STATUS_ROWS).max(1));
        let (dot_w, dot_h) = canvas.dot_size();
        let spec = config.tree.resolve(dot_w, dot_h);
        let tree = GrowthController::new(&spec, config.colors)?;
        debug!("new tree, seed {}: {:?}", seed, spec);

        Ok(Self {
            tree,
            canvas,
            seed,
            rng: StdRng::seed_from_u64(seed),
            ticks: 0,
            ticks_per_level: config.ticks_per_level.max(1),
            finished_at: None,
        })
    }

    /// One tick of the clock; grows a level every `ticks_per_level` ticks
    pub fn tick(&mut self) -> Advance {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.ticks_per_level != 0 {
            return Advance::Idle;
        }
        self.step()
    }

    /// Advance growth right away, ignoring the tick cadence
    pub fn step(&mut self) -> Advance {
        let result = self.tree.advance(&mut self.rng);
        if self.tree.is_done() && self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
        }
        result
    }

    pub fn grow_to_completion(&mut self) {
        while !self.tree.is_done() {
            self.step();
        }
    }

    /// Seconds since growth finished
    pub fn idle_secs(&self) -> Option<f64> {
        self.finished_at.map(|t| t.elapsed().as_secs_f64())
    }

    /// Paint the tree and the status line into the back buffer
    pub fn draw(&mut self, term: &mut Terminal, paused: bool) {
        self.canvas.clear();
        self.tree.render(&mut self.canvas);

        term.clear();
        self.canvas.flush_to(term, 0);

        let (_, rows) = self.canvas.size();
        term.set_str(0, rows as i32, &self.status(paused), Some(Color::DarkGrey), false);
    }

    pub fn status(&self, paused: bool) -> String {
        let stats = self.tree.stats();
        let mut line = format!(
            "depth {}/{}  nodes {}  leaves {}  seed {}",
            self.tree.current_depth(),
            self.tree.terminal_depth(),
            stats.nodes,
            stats.leaves,
            self.seed
        );
        if paused {
            line.push_str("  [paused]");
        } else if self.tree.is_done() {
            line.push_str("  [done]");
        }
        line
    }
}

/// Run the fractal tree grower
pub fn run(config: GrowConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    });

    if config.print {
        run_print_mode(&config, seed)
    } else {
        run_interactive(&config, seed)
    }
}

/// Grow a whole tree off-screen and return the frame as ANSI text
pub fn render_to_string(config: &GrowConfig, seed: u64, cols: u16, rows: u16) -> Result<String> {
    let mut term = Terminal::detached(cols, rows);
    let mut session = Session::new(config, seed, cols, rows)?;
    session.grow_to_completion();
    session.draw(&mut term, false);
    Ok(term.to_ansi())
}

fn run_print_mode(config: &GrowConfig, initial_seed: u64) -> Result<()> {
    let mut seeder = StdRng::seed_from_u64(initial_seed);
    let mut seed = initial_seed;

    loop {
        let (cols, rows) = config.size.unwrap_or_else(Terminal::detect_size);
        let mut term = Terminal::detached(cols, rows);
        let mut session = Session::new(config, seed, cols, rows)?;
        session.grow_to_completion();
        session.draw(&mut term, false);
        term.print_to_stdout()?;

        if !config.infinite {
            break;
        }

        std::thread::sleep(wait_duration(config.time_wait));
        seed = seeder.gen();
    }

    Ok(())
}

/// Pause between trees; negative or NaN waits are no wait at all
fn wait_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

/// Without `--live` the tree shows up fully grown
fn fresh_session(config: &GrowConfig, seed: u64, cols: u16, rows: u16) -> Result<Session> {
    let mut session = Session::new(config, seed, cols, rows)?;
    if !config.live {
        session.grow_to_completion();
    }
    Ok(session)
}

fn run_interactive(config: &GrowConfig, initial_seed: u64) -> Result<()> {
    let mut seeder = StdRng::seed_from_u64(initial_seed);
    let mut term = Terminal::new(true)?;
    let mut state = GrowState::new(config.time_step);

    term.clear_screen()?;
    let (mut width, mut height) = term.size();
    let mut session = fresh_session(config, initial_seed, width, height)?;

    loop {
        // Check for terminal resize
        let (new_w, new_h) = crossterm::terminal::size().unwrap_or((width, height));
        if new_w != width || new_h != height {
            width = new_w;
            height = new_h;
            term.resize(width, height);
            term.clear_screen()?;
            session = fresh_session(config, session.seed, width, height)?;
        }

        if let Some((code, mods)) = term.check_key()? {
            match state.handle_key(code, mods) {
                KeyAction::Quit => break,
                KeyAction::Help => {
                    if show_help_modal(&mut term, HELP)? {
                        break;
                    }
                }
                KeyAction::Regrow => {
                    session = fresh_session(config, seeder.gen(), width, height)?;
                    term.clear_screen()?;
                }
                KeyAction::None => {}
            }
        }

        if !state.paused {
            session.tick();
        }

        if config.infinite && session.idle_secs().is_some_and(|s| s >= config.time_wait) {
            session = fresh_session(config, seeder.gen(), width, height)?;
        }

        session.draw(&mut term, state.paused);
        term.present()?;
        term.sleep(state.speed);
    }

    Ok(())
}
