use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Read one line from the terminal, echoing as the user types.
///
/// Returns `Ok(None)` when the user interrupts with Ctrl+C or Ctrl+D so the
/// caller can report a cancellation instead of the process dying mid-prompt.
/// Raw mode is always restored before returning.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    enable_raw_mode()?;
    let result = read_line_raw(&mut stdout);
    let _ = disable_raw_mode();
    println!();
    result
}

fn read_line_raw(stdout: &mut impl Write) -> io::Result<Option<String>> {
    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(buf)),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Char(c) => {
                buf.push(c);
                write!(stdout, "{c}")?;
                stdout.flush()?;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    // erase the echoed character
                    write!(stdout, "\u{8} \u{8}")?;
                    stdout.flush()?;
                }
            }
            _ => {}
        }
    }
}
