//! Assistant wiring: question files, desk setup and the prompt loop.

use std::path::{Path, PathBuf};

use recruit_config::Config;
use recruit_core::{
    AssistantDesk, CoreError, FlowEvent, ModalView, Notifier, QuestionSource,
};
use recruit_domain::{FieldKey, QuestionSet};
use recruit_storage_json::FileQuestionSource;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::ui::prompts::{self, PromptOutcome};
use crate::cli::ui::views;

const BUNDLED_QUESTIONS: [(&str, &str); 2] = [
    ("mission.json", include_str!("../../questions/mission.json")),
    (
        "region-features.json",
        include_str!("../../questions/region-features.json"),
    ),
];

/// Reads a question file, falling back to the copy shipped with the binary
/// when the file does not exist.
pub struct QuestionFile {
    file: FileQuestionSource,
    bundled: Option<&'static str>,
}

impl QuestionFile {
    pub fn new(path: PathBuf) -> Self {
        let bundled = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| {
                BUNDLED_QUESTIONS
                    .iter()
                    .find(|(file, _)| *file == name)
                    .map(|(_, text)| *text)
            });
        Self {
            file: FileQuestionSource::new(path),
            bundled,
        }
    }
}

impl QuestionSource for QuestionFile {
    fn fetch(&self) -> Result<QuestionSet, CoreError> {
        match self.bundled {
            Some(text) if !self.file.path().exists() => {
                tracing::debug!(path = %self.file.path().display(), "using bundled questions");
                Ok(QuestionSet::from_json(text)?)
            }
            _ => self.file.fetch(),
        }
    }
}

/// Registers one assistant per configured binding. Bindings naming an
/// unknown field are skipped.
pub fn build_desk(config: &Config, home: &Path, notifier: &mut dyn Notifier) -> AssistantDesk {
    let questions_dir = config.resolve_questions_dir(home);
    let mut desk = AssistantDesk::new(config.storage_key_prefix.clone());
    for (field, file) in &config.assistants {
        let Some(target) = FieldKey::lookup(field) else {
            tracing::warn!(field = %field, "assistant bound to an unknown field");
            cli_io::print_warning(format!("Ignoring assistant for unknown field `{field}`."));
            continue;
        };
        let source = QuestionFile::new(questions_dir.join(file));
        desk.register(target, &source, notifier);
    }
    desk
}

/// Opens the assistant for `target` and drives it until it closes.
pub fn run(context: &mut ShellContext, target: FieldKey) -> CommandResult {
    let opened = {
        let (desk, mut flow) = context.assistant_parts();
        desk.open(target, &mut flow)
    };
    let view = match opened {
        Ok(view) => view,
        // Already reported to the user.
        Err(CoreError::QuestionsNotLoaded) => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    drive(context, view)
}

/// Runs the prompt loop from `view`. The modal is closed if the loop fails.
fn drive(context: &mut ShellContext, view: ModalView) -> CommandResult {
    let result = prompt_loop(context, view);
    if let Err(err) = &result {
        tracing::warn!(error = %err, "assistant closed after an error");
        context.desk.close();
    }
    result
}

fn prompt_loop(context: &mut ShellContext, mut view: ModalView) -> CommandResult {
    loop {
        views::print_modal(&view);
        let label = match &view {
            ModalView::Question(question) => question.progress_label.as_str(),
            ModalView::Complete(done) => done.heading,
        };
        let outcome = prompts::text_input(label, &current_input(&view))?;

        if !apply(context, &view, outcome)? {
            break;
        }
        match context.desk.render() {
            Some(next) => view = next,
            None => break,
        }
    }
    Ok(())
}

/// Returns whether the modal is still open.
fn apply(context: &mut ShellContext, view: &ModalView, outcome: PromptOutcome) -> Result<bool, CommandError> {
    let asking = matches!(view, ModalView::Question(_));
    let (desk, mut flow) = context.assistant_parts();

    match outcome {
        PromptOutcome::Dismiss(trigger) => {
            desk.dismiss(trigger);
            cli_io::print_hint("回答は保存されています。`assist` で再開できます。");
            Ok(false)
        }
        PromptOutcome::Submit(input) if asking => {
            desk.advance(&input, &mut flow)?;
            Ok(true)
        }
        PromptOutcome::Back if asking => {
            let input = current_input(view);
            if desk.retreat(&input, &mut flow)? == FlowEvent::NoOp {
                cli_io::print_hint("最初の質問です。");
            }
            Ok(true)
        }
        PromptOutcome::Edit(index) => {
            let input = asking.then(|| current_input(view));
            match desk.edit_at(index, input.as_deref(), &mut flow) {
                Err(CoreError::InvalidQuestionIndex { len, .. }) => {
                    cli_io::print_warning(format!("質問番号は 1〜{len} で指定してください。"));
                }
                other => {
                    other?;
                }
            }
            Ok(true)
        }
        PromptOutcome::Restart if !asking => {
            desk.restart_editing(&mut flow)?;
            Ok(true)
        }
        PromptOutcome::Generate if !asking => {
            let target = desk.active();
            let text = desk.generate(&mut flow)?;
            output::raw(&text);
            if let Some(target) = target {
                cli_io::print_hint(format!("「{}」に反映しました。", target.label()));
            }
            Ok(false)
        }
        _ => {
            let expected = if asking {
                "回答を入力して Enter、または :back / :edit n / Esc"
            } else {
                ":generate / :restart / :edit n / Esc"
            };
            cli_io::print_hint(expected);
            Ok(true)
        }
    }
}

/// Back and Edit keep the pre-filled answer; the typed command replaced the buffer.
fn current_input(view: &ModalView) -> String {
    match view {
        ModalView::Question(question) => question.input_value.clone(),
        ModalView::Complete(_) => String::new(),
    }
}
