use recruit_core::{FlowState, KeyValueStore};

use super::parse_field;
use crate::cli::assistant;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::test_mode;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "assist",
        "Answer guided questions to draft a field",
        "assist [field]",
        cmd_assist,
    )]
}

fn cmd_assist(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        list_assistants(context);
        return Ok(());
    }

    let key = parse_field(args.first().copied(), "assist [field]")?;
    if context.desk.flow(key).is_none() {
        return Err(CommandError::InvalidArguments(format!(
            "no assistant for `{}`. Run `assist` to list them.",
            key.record_key()
        )));
    }
    if context.mode == CliMode::Script && !test_mode::is_enabled() {
        return Err(CommandError::InvalidArguments(
            "`assist` needs an interactive terminal".into(),
        ));
    }
    assistant::run(context, key)
}

fn list_assistants(context: &ShellContext) {
    output::section("Assistants");
    for target in context.desk.targets() {
        let Some(flow) = context.desk.flow(target) else {
            continue;
        };
        let status = if !flow.is_ready() {
            "questions unavailable".to_string()
        } else {
            let saved = matches!(context.sessions.get(flow.storage_key()), Ok(Some(_)));
            match (flow.state(), saved) {
                (FlowState::Open(index), _) => format!("open at question {}", index + 1),
                (FlowState::Complete, _) => "answers complete".to_string(),
                (FlowState::Closed, true) => "saved answers".to_string(),
                (FlowState::Closed, false) => "ready".to_string(),
            }
        };
        output::raw(&format!(
            "  {:<22}{}  ({status})",
            target.record_key(),
            target.label()
        ));
    }
}
