//! Scripted prompt answers for automated runs.
//!
//! `RECRUIT_TEST_TEXT_INPUTS` holds `|`-separated entries consumed one per
//! prompt. Besides literal text it understands `<BLANK>`, `<KEEP>`, `<BACK>`,
//! `<EDIT:n>` (n is the question number as displayed), `<RESTART>`,
//! `<GENERATE>`, `<CLOSE>` and `<ESC>`.

use once_cell::sync::Lazy;
use std::{
    collections::VecDeque,
    env,
    sync::{Mutex, MutexGuard, PoisonError},
};

pub const TEXT_INPUTS_ENV: &str = "RECRUIT_TEST_TEXT_INPUTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTestInput {
    Value(String),
    /// Submit whatever the prompt was pre-filled with.
    Keep,
    Back,
    Edit(usize),
    Restart,
    Generate,
    Close,
    Escape,
}

struct TextQueue {
    enabled: bool,
    inputs: VecDeque<TextTestInput>,
}

impl TextQueue {
    fn from_env() -> Self {
        match env::var(TEXT_INPUTS_ENV) {
            Ok(raw) => Self {
                enabled: true,
                inputs: parse_text_sequences(&raw),
            },
            Err(_) => Self {
                enabled: false,
                inputs: VecDeque::new(),
            },
        }
    }
}

static TEXT_INPUTS: Lazy<Mutex<TextQueue>> = Lazy::new(|| Mutex::new(TextQueue::from_env()));

fn queue() -> MutexGuard<'static, TextQueue> {
    TEXT_INPUTS.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn is_enabled() -> bool {
    queue().enabled
}

/// `None` when scripting is off. An exhausted script behaves like Escape.
pub fn next_text_input(label: &str) -> Option<TextTestInput> {
    let mut guard = queue();
    if !guard.enabled {
        return None;
    }
    Some(guard.inputs.pop_front().unwrap_or_else(|| {
        tracing::warn!(prompt = label, "scripted inputs exhausted");
        TextTestInput::Escape
    }))
}

pub fn install_text_inputs(inputs: Vec<TextTestInput>) {
    let mut guard = queue();
    guard.enabled = true;
    guard.inputs = inputs.into();
}

pub fn reset_text_inputs() {
    let mut guard = queue();
    guard.enabled = false;
    guard.inputs.clear();
}

/// Serializes tests that install scripted inputs into the shared queue.
#[cfg(test)]
pub(crate) fn exclusive() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_text_input(token: &str) -> TextTestInput {
    let upper = token.to_ascii_uppercase();
    if let Some(index) = upper
        .strip_prefix("<EDIT:")
        .and_then(|rest| rest.strip_suffix('>'))
        .and_then(|number| number.trim().parse::<usize>().ok())
    {
        return TextTestInput::Edit(index);
    }
    match upper.as_str() {
        "<ESC>" | "<CANCEL>" => TextTestInput::Escape,
        "<CLOSE>" => TextTestInput::Close,
        "<BACK>" => TextTestInput::Back,
        "<KEEP>" => TextTestInput::Keep,
        "<RESTART>" => TextTestInput::Restart,
        "<GENERATE>" => TextTestInput::Generate,
        "<BLANK>" | "<EMPTY>" => TextTestInput::Value(String::new()),
        _ => TextTestInput::Value(token.to_string()),
    }
}

fn parse_text_sequences(raw: &str) -> VecDeque<TextTestInput> {
    raw.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_text_input)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_and_literal_answers() {
        let parsed: Vec<_> =
            parse_text_sequences("移住促進 | <blank> |<EDIT:2>|<back>|<generate>||<esc>")
                .into_iter()
                .collect();
        assert_eq!(
            parsed,
            vec![
                TextTestInput::Value("移住促進".into()),
                TextTestInput::Value(String::new()),
                TextTestInput::Edit(2),
                TextTestInput::Back,
                TextTestInput::Generate,
                TextTestInput::Escape,
            ]
        );
    }

    #[test]
    fn malformed_edit_token_is_literal_text() {
        assert_eq!(
            parse_text_input("<EDIT:x>"),
            TextTestInput::Value("<EDIT:x>".into())
        );
    }
}
