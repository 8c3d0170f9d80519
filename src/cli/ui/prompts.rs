use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};
use recruit_core::DismissTrigger;

use crate::cli::ui::test_mode::{self, TextTestInput};

/// What the user did at an assistant prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Submit(String),
    Back,
    /// Zero-based question index.
    Edit(usize),
    Restart,
    Generate,
    Dismiss(DismissTrigger),
}

/// Line editor pre-filled with `initial`. Enter submits, Esc dismisses.
pub fn text_input(label: &str, initial: &str) -> io::Result<PromptOutcome> {
    if let Some(scripted) = test_mode::next_text_input(label) {
        return Ok(from_script(scripted, initial));
    }

    let mut guard = RawModeGuard::activate()?;
    let mut stdout = io::stdout();
    let mut buffer = initial.to_string();
    redraw_input(&mut stdout, &buffer)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    guard.deactivate();
                    println!();
                    return Ok(PromptOutcome::Dismiss(DismissTrigger::CancelKey));
                }
                KeyCode::Char('u') | KeyCode::Char('U') => {
                    buffer.clear();
                    redraw_input(&mut stdout, &buffer)?;
                    continue;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => {
                guard.deactivate();
                println!();
                return Ok(PromptOutcome::Dismiss(DismissTrigger::CancelKey));
            }
            KeyCode::Enter => {
                guard.deactivate();
                println!();
                return Ok(interpret_buffer(&buffer));
            }
            KeyCode::Backspace => {
                buffer.pop();
                redraw_input(&mut stdout, &buffer)?;
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                redraw_input(&mut stdout, &buffer)?;
            }
            _ => {}
        }
    }
}

fn from_script(scripted: TextTestInput, initial: &str) -> PromptOutcome {
    match scripted {
        TextTestInput::Value(value) => interpret_buffer(&value),
        TextTestInput::Keep => PromptOutcome::Submit(initial.to_string()),
        TextTestInput::Back => PromptOutcome::Back,
        TextTestInput::Edit(number) => PromptOutcome::Edit(number.saturating_sub(1)),
        TextTestInput::Restart => PromptOutcome::Restart,
        TextTestInput::Generate => PromptOutcome::Generate,
        TextTestInput::Close => PromptOutcome::Dismiss(DismissTrigger::OverlayClick),
        TextTestInput::Escape => PromptOutcome::Dismiss(DismissTrigger::CancelKey),
    }
}

/// Colon commands steer the assistant; anything else is an answer.
pub(crate) fn interpret_buffer(buffer: &str) -> PromptOutcome {
    let trimmed = buffer.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(number) = lower
        .strip_prefix(":edit")
        .map(str::trim)
        .and_then(|rest| rest.parse::<usize>().ok())
        .filter(|number| *number > 0)
    {
        return PromptOutcome::Edit(number - 1);
    }
    match lower.as_str() {
        ":back" => PromptOutcome::Back,
        ":restart" => PromptOutcome::Restart,
        ":generate" => PromptOutcome::Generate,
        ":cancel" => PromptOutcome::Dismiss(DismissTrigger::CancelKey),
        ":close" => PromptOutcome::Dismiss(DismissTrigger::OverlayClick),
        ":clear" => PromptOutcome::Submit(String::new()),
        _ => PromptOutcome::Submit(buffer.to_string()),
    }
}

fn redraw_input(stdout: &mut Stdout, buffer: &str) -> io::Result<()> {
    stdout.execute(cursor::MoveToColumn(0))?;
    stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
    write!(stdout, "> {buffer}")?;
    stdout.flush()
}

struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}
