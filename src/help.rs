use crate::terminal::Terminal;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, stdout, Write};

/// Show a modal help overlay without modifying the back buffer.
/// Returns true if the user requested quit (q/Esc) while the overlay is open.
pub fn show_help_modal(term: &mut Terminal, help_text: &str) -> io::Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    draw_overlay(width, height, help_text)?;

    loop {
        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('?') => break,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            }
        }
    }

    // Restore previous frame from back buffer.
    term.present()?;
    Ok(false)
}

/// Top-left corner and size of a box centered on the screen
fn overlay_rect(width: u16, height: u16, help_text: &str) -> (u16, u16, usize, usize) {
    let inner = help_text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = inner + 4;
    let box_height = help_text.lines().count() + 2;
    let x = (width as usize).saturating_sub(box_width) / 2;
    let y = (height as usize).saturating_sub(box_height) / 2;
    (x as u16, y as u16, box_width, box_height)
}

fn draw_overlay(width: u16, height: u16, help_text: &str) -> io::Result<()> {
    let (x, y, box_width, box_height) = overlay_rect(width, height, help_text);
    let inner = box_width - 4;
    let rule = "─".repeat(box_width - 2);
    let mut out = stdout();

    queue!(
        out,
        SetForegroundColor(Color::White),
        MoveTo(x, y),
        Print(format!("┌{}┐", rule))
    )?;

    for (i, line) in help_text.lines().enumerate() {
        let row = y + 1 + i as u16;
        let padding = inner.saturating_sub(line.chars().count());
        queue!(
            out,
            MoveTo(x, row),
            SetForegroundColor(Color::White),
            Print('│'),
            SetForegroundColor(Color::Grey),
            Print(format!(" {}{} ", line, " ".repeat(padding))),
            SetForegroundColor(Color::White),
            Print('│')
        )?;
    }

    queue!(
        out,
        MoveTo(x, y + box_height as u16 - 1),
        Print(format!("└{}┘", rule)),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;
    out.flush()
}
