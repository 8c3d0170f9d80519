//! Text renderings of the wizard and assistant views.
//!
//! Renderers return lines so they can be checked without a terminal.

use recruit_core::{
    CompletionView, FieldStore, MemoryFieldStore, ModalView, QuestionView, StepStatus,
    WizardView,
};
use recruit_domain::{StepSpec, STEPS};

use crate::cli::output;

const UNSET: &str = "-";

pub fn step_lines(view: &WizardView) -> Vec<String> {
    view.steps
        .iter()
        .map(|step| {
            let marker = match step.status {
                StepStatus::Completed => "[✓]",
                StepStatus::Active => "[>]",
                StepStatus::Pending => "[ ]",
            };
            format!("{marker} {}. {}", step.index + 1, step.title)
        })
        .collect()
}

/// One line per field of `step`: element id, label, required marker, value.
pub fn field_lines(step: &StepSpec, fields: &MemoryFieldStore) -> Vec<String> {
    step.fields()
        .map(|spec| {
            let marker = if fields.is_required(spec.key) { "*" } else { " " };
            let value = fields.value(spec.key);
            let shown = if value.trim().is_empty() {
                UNSET.to_string()
            } else {
                value.replace('\n', " / ")
            };
            let flag = if fields.is_invalid(spec.key) {
                "  ← 入力してください"
            } else {
                ""
            };
            format!("  {:<22}{marker} {}: {shown}{flag}", spec.element_id, spec.label)
        })
        .collect()
}

pub fn navigation_hint(view: &WizardView) -> String {
    let mut actions = Vec::new();
    if view.navigation.can_retreat {
        actions.push("`back` 戻る");
    }
    if view.navigation.show_advance {
        actions.push("`next` 次へ");
    }
    if view.navigation.show_finish {
        actions.push("`finish` 完了");
    }
    actions.join("  ")
}

pub fn print_wizard(view: &WizardView, fields: &MemoryFieldStore) {
    let step = STEPS[view.current];
    output::section(format!(
        "{} ({})",
        view.active_step().title,
        view.progress_label
    ));
    for line in step_lines(view) {
        output::raw(&line);
    }
    let lines = field_lines(&step, fields);
    if lines.is_empty() {
        output::hint("`preview` で内容を確認できます。");
    } else {
        output::separator();
        for line in lines {
            output::raw(&line);
        }
    }
    output::hint(navigation_hint(view));
}

pub fn question_lines(view: &QuestionView) -> Vec<String> {
    let mut lines = vec![format!("{} ({}%)", view.progress_label, view.progress_percent)];
    for item in &view.answered {
        lines.push(format!(
            "  {}. {} → {}  (:edit {})",
            item.index + 1,
            item.text,
            item.answer,
            item.index + 1
        ));
    }
    let required = if view.required { " *必須" } else { "" };
    lines.push(format!("Q{}. {}{required}", view.index + 1, view.text));
    lines.push(format!(
        "  {}",
        view.placeholder.as_deref().unwrap_or(view.input_hint)
    ));

    let mut actions = vec![format!("Enter {}", view.advance_label)];
    if view.back_enabled {
        actions.push(format!(":back {}", view.back_label));
    }
    actions.push("Esc 閉じる".to_string());
    lines.push(actions.join("  "));
    lines
}

pub fn completion_lines(view: &CompletionView) -> Vec<String> {
    vec![
        view.heading.to_string(),
        view.hint.to_string(),
        format!(
            ":restart {}  :generate {}  Esc 閉じる",
            view.restart_label, view.generate_label
        ),
    ]
}

pub fn print_modal(view: &ModalView) {
    let (title, lines) = match view {
        ModalView::Question(question) => (&question.title, question_lines(question)),
        ModalView::Complete(done) => (&done.title, completion_lines(done)),
    };
    output::section(title);
    for line in lines {
        output::raw(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_core::{render_completion, render_question, StepWizard};
    use recruit_domain::{AnswerMap, FieldKey, Question, QuestionSet};

    fn set() -> QuestionSet {
        QuestionSet::new(
            None,
            vec![
                Question::new("goal", "目標は？").required(),
                Question::new("first", "最初の一歩は？").with_placeholder("例: 空き家調査"),
            ],
        )
        .expect("valid set")
    }

    #[test]
    fn step_markers_follow_position() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        fields.set_value(FieldKey::Prefecture, "岐阜県");
        fields.set_value(FieldKey::Municipality, "高山市");
        let mut notifier = recruit_core::RecordingNotifier::new();
        let view = wizard.advance(&mut fields, &mut notifier).expect("advance");

        let lines = step_lines(&view);
        assert_eq!(lines[0], "[✓] 1. 地域情報");
        assert_eq!(lines[1], "[>] 2. 募集内容");
        assert_eq!(lines[6], "[ ] 7. プレビュー");
        assert_eq!(navigation_hint(&view), "`back` 戻る  `next` 次へ");
    }

    #[test]
    fn field_lines_mark_required_and_blank_fields() {
        let mut fields = MemoryFieldStore::new();
        fields.set_value(FieldKey::Municipality, "高山市");
        let lines = field_lines(&STEPS[0], &fields);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("*") && lines[0].ends_with(": -"));
        assert!(lines[1].ends_with("高山市"));
    }

    #[test]
    fn question_lines_list_answers_and_actions() {
        let mut answers = AnswerMap::new();
        answers.record("goal", "移住者を増やす");
        let view = render_question(&set(), &answers, 1).expect("view");
        let lines = question_lines(&view);

        assert_eq!(lines[0], "質問 2/2 (100%)");
        assert_eq!(lines[1], "  1. 目標は？ → 移住者を増やす  (:edit 1)");
        assert_eq!(lines[2], "Q2. 最初の一歩は？");
        assert_eq!(lines[3], "  例: 空き家調査");
        insta::assert_snapshot!(lines[4].as_str(), @"Enter 完了  :back ← 戻る  Esc 閉じる");
    }

    #[test]
    fn completion_lines_offer_restart_and_generate() {
        let lines = completion_lines(&render_completion(&set()));
        assert_eq!(lines[0], "全ての質問に回答しました");
        assert!(lines[2].contains(":generate 生成する"));
    }
}
