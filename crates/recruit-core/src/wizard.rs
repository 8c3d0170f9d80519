//! Step wizard: position over the fixed form sections, validate-on-advance,
//! and a fresh preview on every render.

use recruit_domain::{FieldKey, StepSpec, STEPS, TOTAL_STEPS};

use crate::{
    form::read_record,
    markdown::{generate_markdown, markdown_to_html},
    FieldStore, Notice, Notifier,
};

pub const REQUIRED_FIELDS_MESSAGE: &str = "必須項目をすべて入力してください。";
pub const COMPLETION_MESSAGE: &str =
    "募集文章の作成が完了しました！\nMarkdownをダウンロードするか、コピーしてご利用ください。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub index: usize,
    pub title: &'static str,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationView {
    pub can_retreat: bool,
    pub show_advance: bool,
    pub show_finish: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub markdown: String,
    pub html: String,
}

/// Everything a front end needs to draw the current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardView {
    pub current: usize,
    pub steps: Vec<StepView>,
    pub navigation: NavigationView,
    pub progress_label: String,
    pub preview: Preview,
}

impl WizardView {
    pub fn active_step(&self) -> &StepView {
        &self.steps[self.current]
    }
}

/// Required fields of a step that were blank when advancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub step: usize,
    pub invalid: Vec<FieldKey>,
}

impl ValidationFailure {
    pub fn first(&self) -> Option<FieldKey> {
        self.invalid.first().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StepWizard {
    current: usize,
}

impl StepWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        TOTAL_STEPS
    }

    pub fn current_step(&self) -> &'static StepSpec {
        &STEPS[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == TOTAL_STEPS
    }

    /// Moves forward when every required field of the active step is filled.
    /// On failure nothing moves; blank fields are flagged and the first one focused.
    pub fn advance<F: FieldStore + ?Sized>(
        &mut self,
        fields: &mut F,
        notifier: &mut dyn Notifier,
    ) -> Result<WizardView, ValidationFailure> {
        let invalid = self.validate_step(fields);
        if let Some(first) = invalid.first().copied() {
            fields.focus(first);
            notifier.notify(Notice::error(REQUIRED_FIELDS_MESSAGE));
            tracing::debug!(step = self.current, invalid = invalid.len(), "advance blocked");
            return Err(ValidationFailure {
                step: self.current,
                invalid,
            });
        }

        self.current = (self.current + 1).min(TOTAL_STEPS - 1);
        tracing::debug!(step = self.current, "advanced");
        Ok(self.render(fields))
    }

    pub fn retreat<F: FieldStore + ?Sized>(&mut self, fields: &F) -> WizardView {
        if self.current > 0 {
            self.current -= 1;
            tracing::debug!(step = self.current, "retreated");
        }
        self.render(fields)
    }

    /// Emits the completion notice. Only meaningful on the last step.
    pub fn finish(&self, notifier: &mut dyn Notifier) -> Option<Notice> {
        if !self.is_last() {
            return None;
        }
        let notice = Notice::success(COMPLETION_MESSAGE);
        notifier.notify(notice.clone());
        Some(notice)
    }

    pub fn render<F: FieldStore + ?Sized>(&self, fields: &F) -> WizardView {
        let steps = STEPS
            .iter()
            .map(|step| StepView {
                index: step.index,
                title: step.title,
                status: match step.index.cmp(&self.current) {
                    std::cmp::Ordering::Less => StepStatus::Completed,
                    std::cmp::Ordering::Equal => StepStatus::Active,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                },
            })
            .collect();

        let markdown = generate_markdown(&read_record(fields));
        let html = markdown_to_html(&markdown);

        WizardView {
            current: self.current,
            steps,
            navigation: NavigationView {
                can_retreat: self.current > 0,
                show_advance: !self.is_last(),
                show_finish: self.is_last(),
            },
            progress_label: format!("{}/{}", self.current + 1, TOTAL_STEPS),
            preview: Preview { markdown, html },
        }
    }

    /// Flags blank required fields and clears the flag on the rest.
    fn validate_step<F: FieldStore + ?Sized>(&self, fields: &mut F) -> Vec<FieldKey> {
        let mut invalid = Vec::new();
        for spec in self.current_step().fields() {
            if !fields.is_required(spec.key) {
                continue;
            }
            let blank = fields.value(spec.key).trim().is_empty();
            fields.set_invalid(spec.key, blank);
            if blank {
                invalid.push(spec.key);
            }
        }
        invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryFieldStore, RecordingNotifier};

    fn fill_required(fields: &mut MemoryFieldStore, step: usize) {
        for spec in STEPS[step].fields() {
            if spec.required {
                fields.set_value(spec.key, "入力済み");
            }
        }
    }

    #[test]
    fn blank_required_fields_block_advance() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();
        fields.set_value(FieldKey::Municipality, "高山市");

        let failure = wizard.advance(&mut fields, &mut notifier).unwrap_err();

        assert_eq!(wizard.current(), 0);
        assert_eq!(failure.invalid, vec![FieldKey::Prefecture]);
        assert!(fields.is_invalid(FieldKey::Prefecture));
        assert_eq!(fields.focused(), Some(FieldKey::Prefecture));
        assert_eq!(notifier.messages(), vec![REQUIRED_FIELDS_MESSAGE]);
    }

    #[test]
    fn whitespace_counts_as_blank_and_all_blanks_are_flagged() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();
        fields.set_value(FieldKey::Prefecture, "   ");

        let failure = wizard.advance(&mut fields, &mut notifier).unwrap_err();
        assert_eq!(
            failure.invalid,
            vec![FieldKey::Prefecture, FieldKey::Municipality]
        );
        assert_eq!(failure.first(), Some(FieldKey::Prefecture));
        assert_eq!(notifier.notices.len(), 1);
    }

    #[test]
    fn passing_validation_clears_flags_and_moves() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();
        let _ = wizard.advance(&mut fields, &mut notifier);

        fill_required(&mut fields, 0);
        let view = wizard.advance(&mut fields, &mut notifier).unwrap();

        assert_eq!(view.current, 1);
        assert_eq!(fields.invalid_fields().count(), 0);
        assert_eq!(view.steps[0].status, StepStatus::Completed);
        assert_eq!(view.active_step().title, "募集内容");
        assert_eq!(view.steps[2].status, StepStatus::Pending);
        assert_eq!(view.progress_label, "2/7");
    }

    #[test]
    fn optional_requirement_can_be_lifted() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();
        fields.set_required(FieldKey::Prefecture, false);
        fields.set_required(FieldKey::Municipality, false);
        assert!(wizard.advance(&mut fields, &mut notifier).is_ok());
    }

    #[test]
    fn navigation_reflects_position_and_finish_is_last_only() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();

        let first = wizard.render(&fields);
        assert!(!first.navigation.can_retreat);
        assert!(first.navigation.show_advance);
        assert!(!first.navigation.show_finish);
        assert!(wizard.finish(&mut notifier).is_none());
        assert!(notifier.notices.is_empty());

        for step in 0..TOTAL_STEPS - 1 {
            fill_required(&mut fields, step);
            wizard.advance(&mut fields, &mut notifier).unwrap();
        }
        let last = wizard.render(&fields);
        assert_eq!(last.current, TOTAL_STEPS - 1);
        assert!(!last.navigation.show_advance);
        assert!(last.navigation.show_finish);

        let again = wizard.advance(&mut fields, &mut notifier).unwrap();
        assert_eq!(again.current, TOTAL_STEPS - 1);

        let notice = wizard.finish(&mut notifier).unwrap();
        assert_eq!(notice.message, COMPLETION_MESSAGE);
        assert_eq!(wizard.current(), TOTAL_STEPS - 1);
    }

    #[test]
    fn retreat_skips_validation_and_stops_at_zero() {
        let mut wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();
        fill_required(&mut fields, 0);
        wizard.advance(&mut fields, &mut notifier).unwrap();

        assert_eq!(wizard.retreat(&fields).current, 0);
        assert_eq!(wizard.retreat(&fields).current, 0);
    }

    #[test]
    fn preview_is_regenerated_from_current_values() {
        let wizard = StepWizard::new();
        let mut fields = MemoryFieldStore::new();
        assert!(wizard
            .render(&fields)
            .preview
            .markdown
            .starts_with("# ○○市"));

        fields.set_value(FieldKey::Municipality, "高山市");
        let view = wizard.render(&fields);
        assert!(view.preview.markdown.starts_with("# 高山市"));
        assert!(view.preview.html.starts_with("<h1>高山市"));
    }
}
