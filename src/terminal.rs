use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Used when the size cannot be queried (pipes, CI)
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            let mut out = stdout();
            queue!(out, EnterAlternateScreen, Hide)?;
            out.flush()?;
        }

        Ok(Self::with_buffer(width, height, alternate_screen))
    }

    /// Off-screen buffer of a fixed size, never touches the tty
    pub fn detached(width: u16, height: u16) -> Self {
        Self::with_buffer(width, height, false)
    }

    fn with_buffer(width: u16, height: u16, alternate_screen: bool) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Current tty size, or [`FALLBACK_SIZE`]
    pub fn detect_size() -> (u16, u16) {
        size().ok().filter(|&(w, h)| w > 0 && h > 0).unwrap_or(FALLBACK_SIZE)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            row.fill(Cell::default());
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        let mut out = stdout();
        queue!(out, Clear(ClearType::All))?;
        out.flush()
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.buffer.get(y)?.get(x)
    }

    /// Write the whole back buffer to the screen
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }

                match cell.fg {
                    Some(color) => queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?,
                    None => queue!(out, Print(cell.ch))?,
                }

                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }

        out.flush()
    }

    /// Check for keypress (non-blocking), returns (code, modifiers)
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some((key_event.code, key_event.modifiers)));
            }
        }
        Ok(None)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
    }

    /// Buffer as text with ANSI colors, one line per row, trailing blanks trimmed
    pub fn to_ansi(&self) -> String {
        let mut text = String::new();
        for row in &self.buffer {
            let used = row.iter().rposition(|c| c.ch != ' ').map_or(0, |i| i + 1);
            for cell in &row[..used] {
                if cell.ch == ' ' {
                    text.push(' ');
                    continue;
                }
                if cell.bold {
                    text.push_str("\x1b[1m");
                }
                if let Some(code) = cell.fg.and_then(ansi_fg) {
                    text.push_str(&code);
                }
                text.push(cell.ch);
                text.push_str("\x1b[0m");
            }
            text.push('\n');
        }
        text
    }

    /// Print buffer to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout();
        out.write_all(self.to_ansi().as_bytes())?;
        out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let mut out = stdout();
            let _ = queue!(out, Show, LeaveAlternateScreen);
            let _ = out.flush();
            let _ = disable_raw_mode();
        }
    }
}

fn ansi_fg(color: Color) -> Option<String> {
    let code = match color {
        Color::Rgb { r, g, b } => return Some(format!("\x1b[38;2;{};{};{}m", r, g, b)),
        Color::AnsiValue(v) => return Some(format!("\x1b[38;5;{}m", v)),
        Color::DarkGrey => 90,
        Color::Grey => 37,
        Color::White => 97,
        Color::Green => 92,
        Color::DarkGreen => 32,
        Color::Yellow => 93,
        Color::DarkYellow => 33,
        _ => return None,
    };
    Some(format!("\x1b[{}m", code))
}

/// Helper to create RGB colors
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clips_outside_buffer() {
        let mut term = Terminal::detached(4, 2);
        term.set(-1, 0, 'x', None, false);
        term.set(4, 1, 'x', None, false);
        term.set(1, 1, 'y', None, false);
        assert_eq!(term.to_ansi(), "\n y\x1b[0m\n");
    }

    #[test]
    fn ansi_output_carries_rgb_and_bold() {
        let mut term = Terminal::detached(3, 1);
        term.set(0, 0, '⠁', Some(rgb(1, 2, 3)), true);
        assert_eq!(term.to_ansi(), "\x1b[1m\x1b[38;2;1;2;3m⠁\x1b[0m\n");
    }

    #[test]
    fn resize_replaces_buffer() {
        let mut term = Terminal::detached(3, 1);
        term.set_str(0, 0, "abc", None, false);
        term.resize(5, 2);
        assert_eq!(term.size(), (5, 2));
        assert!(term.get(0, 0).is_some_and(|c| c.ch == ' '));
        assert!(term.get(4, 1).is_some());
        assert!(term.get(5, 1).is_none());
    }
}
