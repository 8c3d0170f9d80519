//! Question-flow assistant: a linear Q&A inside a modal that fills one field.
//!
//! A [`QuestionFlow`] owns the session for one target field. Every answer is
//! persisted to the [`KeyValueStore`] as soon as it is recorded, so a flow can
//! be closed and reopened (or the process restarted) without losing progress.
//! The [`AssistantDesk`] owns all flows plus the single [`ModalHost`]; opening
//! one flow tears down whatever modal was mounted before.
//!
//! Rendering is the pure [`render_question`]; it returns a view model with
//! the post-render effects the front end should run once the view is drawn.

use std::collections::BTreeMap;

use recruit_domain::{AnswerMap, FieldKey, PersistedSession, QuestionSet};

use crate::{Clock, CoreError, FieldStore, KeyValueStore, Notice, Notifier, QuestionSource};

pub const DEFAULT_MODAL_TITLE: &str = "AI入力サポート";
pub const UNANSWERED_LABEL: &str = "未回答";
pub const INPUT_HINT: &str = "回答を入力...";
pub const BACK_LABEL: &str = "← 戻る";
pub const NEXT_LABEL: &str = "次へ →";
pub const DONE_LABEL: &str = "完了";
pub const EDIT_LABEL: &str = "編集";
pub const COMPLETE_HEADING: &str = "全ての質問に回答しました";
pub const COMPLETE_HINT: &str = "「生成する」ボタンをクリックして文章を作成します";
pub const RESTART_LABEL: &str = "最初から編集";
pub const GENERATE_LABEL: &str = "生成する";

pub const LOAD_FAILED_MESSAGE: &str = "質問データの読み込みに失敗しました";
pub const NOT_LOADED_MESSAGE: &str = "質問データが読み込まれていません";
pub const ANSWER_REQUIRED_MESSAGE: &str = "この質問への回答は必須です";
pub const GENERATED_MESSAGE: &str = "テキストが生成されました";
pub const PERSIST_FAILED_MESSAGE: &str = "回答を保存できませんでした";

const GENERATED_HEADER: &str = "【生成されたテキスト】\n\n";
const GENERATED_FOOTER: &str = "\n※実際のAI生成機能は次のフェーズで実装されます";

/// Work the front end runs after drawing a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRenderEffect {
    FocusAnswerInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredItem {
    pub index: usize,
    pub text: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub title: String,
    pub index: usize,
    pub total: usize,
    pub progress_label: String,
    pub progress_percent: u8,
    pub text: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub input_value: String,
    pub input_hint: &'static str,
    pub answered: Vec<AnsweredItem>,
    pub back_label: &'static str,
    pub back_enabled: bool,
    pub advance_label: &'static str,
    pub effects: Vec<PostRenderEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionView {
    pub title: String,
    pub heading: &'static str,
    pub hint: &'static str,
    pub restart_label: &'static str,
    pub generate_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    Question(QuestionView),
    Complete(CompletionView),
}

fn modal_title(set: &QuestionSet) -> String {
    set.title().unwrap_or(DEFAULT_MODAL_TITLE).to_string()
}

/// View of question `index` with its stored answer pre-filled.
pub fn render_question(
    set: &QuestionSet,
    answers: &AnswerMap,
    index: usize,
) -> Result<QuestionView, CoreError> {
    let total = set.len();
    let question = set
        .get(index)
        .ok_or(CoreError::InvalidQuestionIndex { index, len: total })?;

    let answered = set.questions()[..index]
        .iter()
        .enumerate()
        .map(|(i, q)| AnsweredItem {
            index: i,
            text: q.text.clone(),
            answer: answers
                .get(&q.id)
                .filter(|answer| !answer.is_empty())
                .unwrap_or(UNANSWERED_LABEL)
                .to_string(),
        })
        .collect();

    Ok(QuestionView {
        title: modal_title(set),
        index,
        total,
        progress_label: format!("質問 {}/{}", index + 1, total),
        progress_percent: ((index + 1) * 100 / total) as u8,
        text: question.text.clone(),
        required: question.required,
        placeholder: question.placeholder.clone(),
        input_value: answers.get(&question.id).unwrap_or_default().to_string(),
        input_hint: INPUT_HINT,
        answered,
        back_label: BACK_LABEL,
        back_enabled: index > 0,
        advance_label: if index == set.last_index() {
            DONE_LABEL
        } else {
            NEXT_LABEL
        },
        effects: vec![PostRenderEffect::FocusAnswerInput],
    })
}

pub fn render_completion(set: &QuestionSet) -> CompletionView {
    CompletionView {
        title: modal_title(set),
        heading: COMPLETE_HEADING,
        hint: COMPLETE_HINT,
        restart_label: RESTART_LABEL,
        generate_label: GENERATE_LABEL,
    }
}

/// Placeholder text built from every non-empty answer, in question order.
pub fn generate_text(set: &QuestionSet, answers: &AnswerMap) -> String {
    let mut text = String::from(GENERATED_HEADER);
    for question in set.questions() {
        if let Some(answer) = answers.get(&question.id).filter(|a| !a.is_empty()) {
            text.push_str(&format!("{}: {}\n", question.text, answer));
        }
    }
    text.push_str(GENERATED_FOOTER);
    text
}

/// Process-wide mount point; holds at most one modal.
///
/// Mounting attaches the cancel-key listener for the owner, unmounting
/// detaches it.
#[derive(Debug, Default)]
pub struct ModalHost {
    mounted: Option<FieldKey>,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the owner of the modal that was torn down, if any.
    pub fn mount(&mut self, owner: FieldKey) -> Option<FieldKey> {
        let previous = self.mounted.replace(owner);
        if let Some(previous) = previous {
            tracing::debug!(previous = %previous, owner = %owner, "replaced mounted modal");
        }
        previous
    }

    pub fn unmount(&mut self) -> Option<FieldKey> {
        self.mounted.take()
    }

    pub fn owner(&self) -> Option<FieldKey> {
        self.mounted
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn mounted_count(&self) -> usize {
        usize::from(self.mounted.is_some())
    }
}

/// Ways a user can dismiss a mounted modal without finishing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    CancelKey,
    OverlayClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Closed,
    Open(usize),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    Moved,
    Completed,
    Rejected,
    NoOp,
}

/// Surfaces a flow reads and writes while handling an action.
pub struct FlowContext<'a> {
    pub fields: &'a mut dyn FieldStore,
    pub storage: &'a mut dyn KeyValueStore,
    pub notifier: &'a mut dyn Notifier,
    pub clock: &'a dyn Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Closed,
    Asking,
    Complete,
}

#[derive(Debug)]
pub struct QuestionFlow {
    target: FieldKey,
    storage_key: String,
    questions: Option<QuestionSet>,
    answers: AnswerMap,
    current: usize,
    phase: Phase,
}

impl QuestionFlow {
    pub fn new(target: FieldKey, storage_key_prefix: &str) -> Self {
        Self {
            target,
            storage_key: format!("{storage_key_prefix}{}", target.element_id()),
            questions: None,
            answers: AnswerMap::new(),
            current: 0,
            phase: Phase::Closed,
        }
    }

    pub fn target(&self) -> FieldKey {
        self.target
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn is_ready(&self) -> bool {
        self.questions.is_some()
    }

    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn state(&self) -> FlowState {
        match self.phase {
            Phase::Closed => FlowState::Closed,
            Phase::Asking => FlowState::Open(self.current),
            Phase::Complete => FlowState::Complete,
        }
    }

    /// Fetches the question set once. Later calls are no-ops.
    pub fn load(&mut self, source: &dyn QuestionSource, notifier: &mut dyn Notifier) -> bool {
        if self.questions.is_some() {
            return true;
        }
        match source.fetch() {
            Ok(set) => {
                tracing::debug!(target_field = %self.target, questions = set.len(), "questions loaded");
                self.questions = Some(set);
                true
            }
            Err(err) => {
                tracing::warn!(target_field = %self.target, error = %err, "failed to load questions");
                notifier.notify(Notice::error(LOAD_FAILED_MESSAGE));
                false
            }
        }
    }

    /// Restores the saved session, mounts the modal and renders.
    pub fn open(
        &mut self,
        host: &mut ModalHost,
        ctx: &mut FlowContext<'_>,
    ) -> Result<ModalView, CoreError> {
        let Some(set) = self.questions.as_ref() else {
            ctx.notifier.notify(Notice::error(NOT_LOADED_MESSAGE));
            return Err(CoreError::QuestionsNotLoaded);
        };

        let (answers, index) = self.restore(&*ctx.storage, set.last_index());
        let view = render_question(set, &answers, index)?;
        self.answers = answers;
        self.current = index;
        host.mount(self.target);
        self.phase = Phase::Asking;
        tracing::debug!(target_field = %self.target, index, "assistant opened");
        Ok(ModalView::Question(view))
    }

    pub fn render(&self) -> Option<ModalView> {
        let set = self.questions.as_ref()?;
        match self.phase {
            Phase::Closed => None,
            Phase::Asking => render_question(set, &self.answers, self.current)
                .ok()
                .map(ModalView::Question),
            Phase::Complete => Some(ModalView::Complete(render_completion(set))),
        }
    }

    /// Records the trimmed input and moves on; line submit maps here too.
    pub fn advance(&mut self, input: &str, ctx: &mut FlowContext<'_>) -> Result<FlowEvent, CoreError> {
        self.ensure_phase(Phase::Asking)?;
        let set = self.questions.as_ref().ok_or(CoreError::QuestionsNotLoaded)?;
        let question = set.get(self.current).ok_or(CoreError::InvalidQuestionIndex {
            index: self.current,
            len: set.len(),
        })?;

        let answer = input.trim();
        if question.required && answer.is_empty() {
            ctx.notifier.notify(Notice::error(ANSWER_REQUIRED_MESSAGE));
            return Ok(FlowEvent::Rejected);
        }

        let id = question.id.clone();
        let last = set.last_index();
        self.answers.record(id, answer);
        // The saved index is the question just answered.
        self.persist(ctx);
        if self.current == last {
            self.phase = Phase::Complete;
            Ok(FlowEvent::Completed)
        } else {
            self.current += 1;
            Ok(FlowEvent::Moved)
        }
    }

    /// Keeps the current input without a required check and steps back.
    pub fn retreat(&mut self, input: &str, ctx: &mut FlowContext<'_>) -> Result<FlowEvent, CoreError> {
        self.ensure_phase(Phase::Asking)?;
        if self.current == 0 {
            return Ok(FlowEvent::NoOp);
        }
        self.store_input(input)?;
        self.persist(ctx);
        self.current -= 1;
        Ok(FlowEvent::Moved)
    }

    /// Jumps to question `index`. `input` is kept only while a question is shown.
    ///
    /// While asking, only questions up to the current one can be reached; from the
    /// completion view any question can.
    pub fn edit_at(
        &mut self,
        index: usize,
        input: Option<&str>,
        ctx: &mut FlowContext<'_>,
    ) -> Result<FlowEvent, CoreError> {
        if self.phase == Phase::Closed {
            return Err(CoreError::InvalidOperation("assistant is not open".into()));
        }
        let len = self
            .questions
            .as_ref()
            .ok_or(CoreError::QuestionsNotLoaded)?
            .len();
        if index >= len {
            return Err(CoreError::InvalidQuestionIndex { index, len });
        }

        if self.phase == Phase::Asking {
            if index > self.current {
                return Err(CoreError::InvalidQuestionIndex {
                    index,
                    len: self.current + 1,
                });
            }
            if let Some(input) = input {
                self.store_input(input)?;
                self.persist(ctx);
            }
        }
        self.current = index;
        self.phase = Phase::Asking;
        Ok(FlowEvent::Moved)
    }

    pub fn restart_editing(&mut self, ctx: &mut FlowContext<'_>) -> Result<FlowEvent, CoreError> {
        self.edit_at(0, None, ctx)
    }

    /// Writes the generated text into the target field and discards the session.
    pub fn generate(
        &mut self,
        host: &mut ModalHost,
        ctx: &mut FlowContext<'_>,
    ) -> Result<String, CoreError> {
        self.ensure_phase(Phase::Complete)?;
        let set = self.questions.as_ref().ok_or(CoreError::QuestionsNotLoaded)?;
        let text = generate_text(set, &self.answers);
        ctx.fields.set_value(self.target, &text);

        if let Err(err) = ctx.storage.remove(&self.storage_key) {
            tracing::warn!(key = %self.storage_key, error = %err, "failed to clear saved answers");
        }
        self.answers.clear();
        self.current = 0;
        self.close(host);
        ctx.notifier.notify(Notice::success(GENERATED_MESSAGE));
        tracing::info!(target_field = %self.target, "assistant text generated");
        Ok(text)
    }

    /// Unmounts this flow's modal. Safe to call when nothing is mounted.
    pub fn close(&mut self, host: &mut ModalHost) {
        if host.owner() == Some(self.target) {
            host.unmount();
        }
        self.phase = Phase::Closed;
    }

    /// Cancel key or overlay click. Returns whether anything was closed.
    pub fn dismiss(&mut self, trigger: DismissTrigger, host: &mut ModalHost) -> bool {
        if self.phase == Phase::Closed || host.owner() != Some(self.target) {
            return false;
        }
        tracing::debug!(target_field = %self.target, ?trigger, "assistant dismissed");
        self.close(host);
        true
    }

    /// Called when another flow took over the host.
    pub fn mark_detached(&mut self) {
        self.phase = Phase::Closed;
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), CoreError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidOperation(format!(
                "expected assistant to be {expected:?}, found {:?}",
                self.phase
            )))
        }
    }

    fn store_input(&mut self, input: &str) -> Result<(), CoreError> {
        let set = self.questions.as_ref().ok_or(CoreError::QuestionsNotLoaded)?;
        let question = set.get(self.current).ok_or(CoreError::InvalidQuestionIndex {
            index: self.current,
            len: set.len(),
        })?;
        self.answers.record(question.id.clone(), input.trim());
        Ok(())
    }

    fn restore(&self, storage: &dyn KeyValueStore, last_index: usize) -> (AnswerMap, usize) {
        let raw = match storage.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (AnswerMap::new(), 0),
            Err(err) => {
                tracing::warn!(key = %self.storage_key, error = %err, "saved answers unreadable");
                return (AnswerMap::new(), 0);
            }
        };
        match PersistedSession::from_json(&raw) {
            Ok(session) => (
                session.answers,
                session.current_question_index.min(last_index),
            ),
            Err(err) => {
                tracing::warn!(key = %self.storage_key, error = %err, "discarding malformed saved answers");
                (AnswerMap::new(), 0)
            }
        }
    }

    fn persist(&self, ctx: &mut FlowContext<'_>) {
        let session = PersistedSession::new(self.answers.clone(), self.current, ctx.clock.now());
        let result = session
            .to_json()
            .map_err(CoreError::from)
            .and_then(|json| ctx.storage.set(&self.storage_key, &json));
        match result {
            Ok(()) => tracing::debug!(key = %self.storage_key, index = self.current, "answers saved"),
            Err(err) => {
                tracing::warn!(key = %self.storage_key, error = %err, "failed to save answers");
                ctx.notifier.notify(Notice::error(PERSIST_FAILED_MESSAGE));
            }
        }
    }
}

/// Owns every assistant flow and the shared modal host.
#[derive(Debug)]
pub struct AssistantDesk {
    flows: BTreeMap<FieldKey, QuestionFlow>,
    host: ModalHost,
    storage_key_prefix: String,
}

impl AssistantDesk {
    pub fn new(storage_key_prefix: impl Into<String>) -> Self {
        Self {
            flows: BTreeMap::new(),
            host: ModalHost::new(),
            storage_key_prefix: storage_key_prefix.into(),
        }
    }

    /// Attaches an assistant to `target` and loads its questions.
    /// The flow is kept even when loading fails.
    pub fn register(
        &mut self,
        target: FieldKey,
        source: &dyn QuestionSource,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let prefix = self.storage_key_prefix.clone();
        self.flows
            .entry(target)
            .or_insert_with(|| QuestionFlow::new(target, &prefix))
            .load(source, notifier)
    }

    pub fn targets(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.flows.keys().copied()
    }

    pub fn flow(&self, target: FieldKey) -> Option<&QuestionFlow> {
        self.flows.get(&target)
    }

    pub fn host(&self) -> &ModalHost {
        &self.host
    }

    /// Target of the mounted modal.
    pub fn active(&self) -> Option<FieldKey> {
        self.host.owner()
    }

    pub fn open(
        &mut self,
        target: FieldKey,
        ctx: &mut FlowContext<'_>,
    ) -> Result<ModalView, CoreError> {
        let previous = self.host.owner();
        let flow = self.flows.get_mut(&target).ok_or_else(|| {
            CoreError::InvalidOperation(format!("no assistant attached to `{target}`"))
        })?;
        let view = flow.open(&mut self.host, ctx)?;

        if let Some(previous) = previous.filter(|owner| *owner != target) {
            if let Some(other) = self.flows.get_mut(&previous) {
                other.mark_detached();
            }
        }
        Ok(view)
    }

    pub fn render(&self) -> Option<ModalView> {
        self.active()
            .and_then(|owner| self.flows.get(&owner))
            .and_then(QuestionFlow::render)
    }

    pub fn advance(&mut self, input: &str, ctx: &mut FlowContext<'_>) -> Result<FlowEvent, CoreError> {
        self.active_flow()?.advance(input, ctx)
    }

    pub fn retreat(&mut self, input: &str, ctx: &mut FlowContext<'_>) -> Result<FlowEvent, CoreError> {
        self.active_flow()?.retreat(input, ctx)
    }

    pub fn edit_at(
        &mut self,
        index: usize,
        input: Option<&str>,
        ctx: &mut FlowContext<'_>,
    ) -> Result<FlowEvent, CoreError> {
        self.active_flow()?.edit_at(index, input, ctx)
    }

    pub fn restart_editing(&mut self, ctx: &mut FlowContext<'_>) -> Result<FlowEvent, CoreError> {
        self.active_flow()?.restart_editing(ctx)
    }

    pub fn generate(&mut self, ctx: &mut FlowContext<'_>) -> Result<String, CoreError> {
        let owner = self.active_owner()?;
        let flow = self
            .flows
            .get_mut(&owner)
            .ok_or_else(|| CoreError::InvalidOperation(format!("no assistant attached to `{owner}`")))?;
        flow.generate(&mut self.host, ctx)
    }

    pub fn close(&mut self) {
        if let Some(owner) = self.host.owner() {
            if let Some(flow) = self.flows.get_mut(&owner) {
                flow.close(&mut self.host);
                return;
            }
        }
        self.host.unmount();
    }

    pub fn dismiss(&mut self, trigger: DismissTrigger) -> bool {
        let Some(owner) = self.host.owner() else {
            return false;
        };
        match self.flows.get_mut(&owner) {
            Some(flow) => flow.dismiss(trigger, &mut self.host),
            None => false,
        }
    }

    fn active_owner(&self) -> Result<FieldKey, CoreError> {
        self.host
            .owner()
            .ok_or_else(|| CoreError::InvalidOperation("no assistant is open".into()))
    }

    fn active_flow(&mut self) -> Result<&mut QuestionFlow, CoreError> {
        let owner = self.active_owner()?;
        self.flows
            .get_mut(&owner)
            .ok_or_else(|| CoreError::InvalidOperation(format!("no assistant attached to `{owner}`")))
    }
}
