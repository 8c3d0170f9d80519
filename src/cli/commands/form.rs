//! Field editing and step navigation.

use recruit_core::{set_field, FieldStore};
use recruit_domain::{regions::PREFECTURES, FieldKey, STEPS, TOTAL_STEPS};

use super::parse_field;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::views;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show the current step and its fields",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "fields",
            "List field names and values",
            "fields [step number]",
            cmd_fields,
        ),
        CommandEntry::new(
            "set",
            "Set a field value ('\\n' in quotes starts a new line)",
            "set <field> <value...>",
            cmd_set,
        ),
        CommandEntry::new("clear", "Empty a field", "clear <field>", cmd_clear),
        CommandEntry::new(
            "next",
            "Validate this step and move forward",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", "Move to the previous step", "back", cmd_back),
        CommandEntry::new(
            "finish",
            "Complete the listing on the last step",
            "finish",
            cmd_finish,
        ),
        CommandEntry::new(
            "preview",
            "Print the listing as Markdown or HTML",
            "preview [markdown|html]",
            cmd_preview,
        ),
        CommandEntry::new(
            "prefectures",
            "List prefectures with their numbers",
            "prefectures",
            cmd_prefectures,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.wizard.render(&context.fields);
    views::print_wizard(&view, &context.fields);
    Ok(())
}

fn cmd_fields(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let steps: Vec<_> = match args.first() {
        Some(raw) => {
            let index = raw
                .parse::<usize>()
                .ok()
                .filter(|number| (1..=TOTAL_STEPS).contains(number))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "step must be a number from 1 to {TOTAL_STEPS}"
                    ))
                })?;
            vec![STEPS[index - 1]]
        }
        None => STEPS.to_vec(),
    };

    for step in steps.iter().filter(|step| step.fields().next().is_some()) {
        output::section(format!("{}. {}", step.index + 1, step.title));
        for line in views::field_lines(step, &context.fields) {
            output::raw(&line);
        }
    }
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "set <field> <value...>";
    let key = parse_field(args.first().copied(), usage)?;
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    let value = args[1..].join(" ").replace("\\n", "\n");
    assign(context, key, &value)
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = parse_field(args.first().copied(), "clear <field>")?;
    assign(context, key, "")
}

fn assign(context: &mut ShellContext, key: FieldKey, value: &str) -> CommandResult {
    let had_municipality = is_filled(&context.fields, FieldKey::Municipality);
    set_field(&mut context.fields, key, value)?;

    let stored = context.fields.value(key);
    if stored.is_empty() {
        io::print_success(format!("Cleared `{}` ({}).", key.record_key(), key.label()));
    } else {
        io::print_success(format!(
            "Set `{}` ({}) to {}.",
            key.record_key(),
            key.label(),
            stored.replace('\n', " / ")
        ));
    }
    if key == FieldKey::Prefecture
        && had_municipality
        && !is_filled(&context.fields, FieldKey::Municipality)
    {
        io::print_hint("市区町村 was cleared because the prefecture changed.");
    }
    if key.step() != context.wizard.current() {
        io::print_hint(format!(
            "`{}` belongs to step {} ({}).",
            key.record_key(),
            key.step() + 1,
            STEPS[key.step()].title
        ));
    }
    Ok(())
}

fn is_filled(fields: &impl FieldStore, key: FieldKey) -> bool {
    !fields.value(key).trim().is_empty()
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.wizard.advance(&mut context.fields, &mut context.notifier) {
        Ok(view) => views::print_wizard(&view, &context.fields),
        Err(failure) => {
            let missing: Vec<String> = failure
                .invalid
                .iter()
                .map(|key| format!("{} ({})", key.record_key(), key.label()))
                .collect();
            io::print_hint(format!("Missing: {}", missing.join(", ")));
            if let Some(first) = failure.first() {
                io::print_hint(format!("Try `set {} <value>`.", first.record_key()));
            }
        }
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.current() == 0 {
        io::print_hint("Already on the first step.");
    }
    let view = context.wizard.retreat(&context.fields);
    views::print_wizard(&view, &context.fields);
    Ok(())
}

fn cmd_finish(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.wizard.finish(&mut context.notifier) {
        Some(_) => {
            io::print_hint("Use `export-md` to save the listing or `copy-md` to copy it.");
            Ok(())
        }
        None => Err(CommandError::InvalidArguments(format!(
            "`finish` is only available on the last step ({}).",
            STEPS[TOTAL_STEPS - 1].title
        ))),
    }
}

fn cmd_preview(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let view = context.wizard.render(&context.fields);
    match args.first().map(|format| format.to_ascii_lowercase()).as_deref() {
        None | Some("markdown") | Some("md") => output::raw(&view.preview.markdown),
        Some("html") => output::raw(&view.preview.html),
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown preview format `{other}` (use markdown or html)"
            )));
        }
    }
    Ok(())
}

fn cmd_prefectures(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    for (row, names) in PREFECTURES.chunks(6).enumerate() {
        let line: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(offset, name)| format!("{:>2} {name}", row * 6 + offset + 1))
            .collect();
        output::raw(&line.join("  "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script, test_context};
    use recruit_core::FieldStore;
    use recruit_domain::FieldKey;
    use tempfile::tempdir;

    #[test]
    fn set_joins_words_and_expands_newlines() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());

        process_script(
            &mut context,
            &[r#"set regionFeatures '豊かな自然 と\n温泉'"#, "set region-name 飛騨"],
        );

        assert_eq!(context.fields.value(FieldKey::RegionFeatures), "豊かな自然 と\n温泉");
        assert_eq!(context.fields.value(FieldKey::RegionName), "飛騨");
    }

    #[test]
    fn prefecture_change_clears_municipality() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());

        process_script(
            &mut context,
            &[
                "set prefecture 岐阜県",
                "set municipality 高山市",
                "set prefecture 長野県",
            ],
        );

        assert_eq!(context.fields.value(FieldKey::Prefecture), "長野県");
        assert_eq!(context.fields.value(FieldKey::Municipality), "");
    }

    #[test]
    fn unknown_prefecture_leaves_fields_untouched() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());

        process_script(
            &mut context,
            &["set municipality 高山市", "set prefecture 99"],
        );

        assert_eq!(context.fields.value(FieldKey::Prefecture), "");
        assert_eq!(context.fields.value(FieldKey::Municipality), "高山市");
    }

    #[test]
    fn back_on_first_step_stays_put_and_finish_is_rejected_early() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());

        process_script(&mut context, &["back", "finish", "clear mission"]);

        assert_eq!(context.wizard.current(), 0);
        assert_eq!(context.fields.value(FieldKey::Mission), "");
    }
}
