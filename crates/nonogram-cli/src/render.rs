//! Terminal rendering for the play loop and the `show` command.

use crate::app::App;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use nonogram_core::{Cell, GridError, Legend, Solution, Task};
use std::fmt::Write as _;
use std::io::{self, Write};

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    queue!(stdout, Clear(ClearType::All))?;

    let session = app.session();
    let horizontal = session.horizontal_legend();
    let vertical = session.vertical_legend();
    // Row clues occupy "nn " per clue cell to the left of the board.
    let clue_margin = vertical.width * 3;
    let mut line: u16 = 0;

    queue!(
        stdout,
        MoveTo(0, line),
        SetAttribute(Attribute::Bold),
        Print(format!(
            "{} — puzzle #{} ({}x{})",
            session.task().name,
            session.task().id,
            session.width(),
            session.height()
        )),
        SetAttribute(Attribute::Reset)
    )?;
    line += 2;

    // Column clues above the board.
    for clue_row in 0..horizontal.height {
        let mut text = " ".repeat(clue_margin);
        for x in 0..horizontal.width {
            match horizontal.at(x, clue_row) {
                Some(n) => write_clue(&mut text, n),
                None => text.push_str("  "),
            }
        }
        queue!(
            stdout,
            MoveTo(0, line),
            SetForegroundColor(Color::DarkCyan),
            Print(text),
            ResetColor
        )?;
        line += 1;
    }

    // Board rows, each preceded by its row clues.
    for y in 0..session.height() {
        let mut clues = String::new();
        for x in 0..vertical.width {
            match vertical.at(x, y) {
                Some(n) => {
                    write_clue(&mut clues, n);
                    clues.push(' ');
                }
                None => clues.push_str("   "),
            }
        }
        queue!(
            stdout,
            MoveTo(0, line),
            SetForegroundColor(Color::DarkCyan),
            Print(clues),
            ResetColor
        )?;

        for x in 0..session.width() {
            let index = y * session.width() + x;
            let content = session.board().get(index).unwrap_or(Cell::Empty);
            if (x, y) == app.cursor() {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            match content {
                Cell::Empty => queue!(stdout, Print("· "))?,
                Cell::Filled => queue!(stdout, Print("██"))?,
                Cell::Marked => {
                    queue!(
                        stdout,
                        SetForegroundColor(Color::DarkRed),
                        Print("✕ "),
                        ResetColor
                    )?
                }
            }
            if (x, y) == app.cursor() {
                queue!(stdout, SetAttribute(Attribute::Reset))?;
            }
        }
        line += 1;
    }
    line += 1;

    queue!(
        stdout,
        MoveTo(0, line),
        Print(format!("[{}] hints: {}", app.elapsed_string(), app.hints_used()))
    )?;
    line += 1;

    if app.solved() {
        queue!(
            stdout,
            MoveTo(0, line),
            SetForegroundColor(Color::Green),
            Print("Solved!"),
            ResetColor
        )?;
        line += 1;
    }
    if let Some(message) = app.message() {
        queue!(stdout, MoveTo(0, line), Print(message))?;
        line += 1;
    }
    line += 1;

    queue!(
        stdout,
        MoveTo(0, line),
        SetForegroundColor(Color::DarkGrey),
        Print("arrows/hjkl move · space paint · x mark · ! hint · r restart · q quit"),
        ResetColor
    )?;

    stdout.flush()
}

fn write_clue(out: &mut String, n: u32) {
    let _ = write!(out, "{:>2}", n);
}

/// Plain-text clue listing for the `show` command.
pub fn format_clues(task: &Task) -> Result<String, GridError> {
    let solution = Solution::from_task(task)?;
    let horizontal = Legend::horizontal(&solution);
    let vertical = Legend::vertical(&solution);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} — puzzle #{} ({}x{})",
        task.name, task.id, task.width, task.height
    );

    let _ = writeln!(out, "columns:");
    for x in 0..horizontal.width {
        let runs: Vec<String> = (0..horizontal.height)
            .filter_map(|y| horizontal.at(x, y))
            .map(|n| n.to_string())
            .collect();
        let _ = writeln!(out, "  {:>3}: {}", x + 1, join_or_dash(&runs));
    }

    let _ = writeln!(out, "rows:");
    for y in 0..vertical.height {
        let runs: Vec<String> = (0..vertical.width)
            .filter_map(|x| vertical.at(x, y))
            .map(|n| n.to_string())
            .collect();
        let _ = writeln!(out, "  {:>3}: {}", y + 1, join_or_dash(&runs));
    }

    Ok(out)
}

fn join_or_dash(runs: &[String]) -> String {
    if runs.is_empty() {
        "-".to_string()
    } else {
        runs.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clues() {
        let task = Task {
            id: 7,
            name: "Diagonal".into(),
            task: vec![true, false, false, true],
            width: 2,
            height: 2,
            image_preview: String::new(),
            image_solved: String::new(),
        };
        let text = format_clues(&task).unwrap();
        assert!(text.contains("puzzle #7 (2x2)"));
        assert!(text.contains("columns:"));
        assert!(text.contains("  1: 1"));
        assert!(text.contains("rows:"));
    }

    #[test]
    fn test_format_clues_rejects_bad_task() {
        let task = Task {
            id: 1,
            name: String::new(),
            task: vec![true],
            width: 2,
            height: 2,
            image_preview: String::new(),
            image_solved: String::new(),
        };
        assert!(format_clues(&task).is_err());
    }
}
