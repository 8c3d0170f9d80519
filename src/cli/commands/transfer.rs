//! Draft save/load, Markdown export and clipboard copy.

use std::path::Path;

use recruit_core::{
    copy_markdown, export_markdown, load_draft, save_draft, Notice, Notifier,
    IMPORT_FAILED_MESSAGE,
};
use recruit_storage_json::read_import_file;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "save",
            "Save every field as a JSON draft",
            "save",
            cmd_save,
        ),
        CommandEntry::new(
            "load",
            "Load fields from a JSON draft",
            "load <file>",
            cmd_load,
        ),
        CommandEntry::new(
            "export-md",
            "Write the listing as a Markdown file",
            "export-md",
            cmd_export_markdown,
        ),
        CommandEntry::new(
            "copy-md",
            "Copy the listing Markdown to the clipboard",
            "copy-md",
            cmd_copy_markdown,
        ),
    ]
}

// Failures below are already reported through the notifier.

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let (fields, mut export) = context.export_parts();
    if let Ok(path) = save_draft(fields, &mut export) {
        io::print_hint(format!("Saved to {}", path.display()));
    }
    Ok(())
}

fn cmd_export_markdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let (fields, mut export) = context.export_parts();
    if let Ok(path) = export_markdown(fields, &mut export) {
        io::print_hint(format!("Saved to {}", path.display()));
    }
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: load <file>".into()));
    };
    let path = Path::new(raw);

    let text = match read_import_file(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "draft unreadable");
            context.notifier.notify(Notice::error(IMPORT_FAILED_MESSAGE));
            return Ok(());
        }
    };
    if load_draft(&mut context.fields, &text, &mut context.notifier).is_ok() {
        io::print_hint("Use `status` or `preview` to review the loaded listing.");
    }
    Ok(())
}

fn cmd_copy_markdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let _ = copy_markdown(
        &context.fields,
        context.clipboard.as_mut(),
        &mut context.notifier,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::cli::core::{process_script, test_context};
    use recruit_core::FieldStore;
    use recruit_domain::FieldKey;
    use tempfile::tempdir;

    fn exported(home: &std::path::Path, extension: &str) -> Vec<std::path::PathBuf> {
        let mut files: Vec<_> = fs::read_dir(home.join("exports"))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }

    #[test]
    fn save_then_load_restores_fields() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());
        process_script(
            &mut context,
            &["set prefecture 岐阜県", "set municipality 高山市", "save"],
        );

        let drafts = exported(home.path(), "json");
        assert_eq!(drafts.len(), 1);
        let name = drafts[0].file_name().and_then(|n| n.to_str()).expect("name");
        assert!(name.starts_with("chiikiokoshi_高山市_"));

        let mut fresh = test_context(home.path());
        let line = format!("load {}", drafts[0].display());
        process_script(&mut fresh, &[line.as_str()]);
        assert_eq!(fresh.fields.value(FieldKey::Prefecture), "岐阜県");
        assert_eq!(fresh.fields.value(FieldKey::Municipality), "高山市");
    }

    #[test]
    fn unreadable_or_invalid_drafts_change_nothing() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());
        let bad = home.path().join("bad.json");
        fs::write(&bad, "[1, 2]").expect("write");
        let bad_line = format!("load {}", bad.display());
        let missing_line = format!("load {}", home.path().join("missing.json").display());

        process_script(
            &mut context,
            &["set municipality 高山市", bad_line.as_str(), missing_line.as_str(), "load"],
        );

        assert_eq!(context.fields.value(FieldKey::Municipality), "高山市");
    }

    #[test]
    fn export_without_municipality_uses_the_draft_name() {
        let home = tempdir().expect("tempdir");
        let mut context = test_context(home.path());
        process_script(&mut context, &["export-md"]);

        let files = exported(home.path(), "md");
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().and_then(|n| n.to_str()).expect("name");
        assert!(name.starts_with("chiikiokoshi_draft_"));
        let text = fs::read_to_string(&files[0]).expect("read");
        assert_eq!(text.lines().next(), Some("# ○○市地域おこし協力隊 募集"));
    }
}
