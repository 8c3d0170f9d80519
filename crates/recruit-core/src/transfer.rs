//! Moving the form in and out: JSON drafts, Markdown export, clipboard copy.
//!
//! Every operation reports its outcome through the [`Notifier`]; the returned
//! `Result` is informational for callers that want to log.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use recruit_domain::{FieldKey, FormPatch};

use crate::{
    form::{apply_patch, read_record},
    markdown::generate_markdown,
    Clipboard, Clock, CoreError, FieldStore, FileExporter, Notice, Notifier,
};

pub const JSON_MIME: &str = "application/json";
pub const MARKDOWN_MIME: &str = "text/markdown;charset=utf-8";

pub const SAVED_MESSAGE: &str = "データをJSONファイルとして保存しました。";
pub const LOADED_MESSAGE: &str = "データを読み込みました。";
pub const IMPORT_FAILED_MESSAGE: &str =
    "ファイルの読み込みに失敗しました。正しいJSONファイルを選択してください。";
pub const EXPORTED_MESSAGE: &str = "Markdownファイルをダウンロードしました。";
pub const COPIED_MESSAGE: &str = "Markdownをクリップボードにコピーしました。";
pub const EXPORT_FAILED_MESSAGE: &str = "ファイルの保存に失敗しました。";
pub const COPY_FAILED_MESSAGE: &str = "クリップボードへのコピーに失敗しました。";

const DRAFT_NAME: &str = "draft";

/// `{prefix}_{municipality or draft}_{unix millis}.{extension}`
pub fn export_filename(
    prefix: &str,
    municipality: &str,
    at: DateTime<Utc>,
    extension: &str,
) -> String {
    let name = municipality.trim();
    let name = if name.is_empty() {
        DRAFT_NAME.to_string()
    } else {
        name.replace(['/', '\\'], "_")
    };
    format!("{prefix}_{name}_{}.{extension}", at.timestamp_millis())
}

/// Exporter target plus naming inputs shared by the export actions.
pub struct ExportContext<'a> {
    pub exporter: &'a mut dyn FileExporter,
    pub notifier: &'a mut dyn Notifier,
    pub clock: &'a dyn Clock,
    pub prefix: &'a str,
}

pub fn save_draft<F: FieldStore + ?Sized>(
    fields: &F,
    ctx: &mut ExportContext<'_>,
) -> Result<PathBuf, CoreError> {
    let record = read_record(fields);
    let json = record.to_json_pretty()?;
    let filename = export_filename(
        ctx.prefix,
        record.get(FieldKey::Municipality),
        ctx.clock.now(),
        "json",
    );
    deliver(ctx, &json, &filename, JSON_MIME, SAVED_MESSAGE)
}

pub fn export_markdown<F: FieldStore + ?Sized>(
    fields: &F,
    ctx: &mut ExportContext<'_>,
) -> Result<PathBuf, CoreError> {
    let record = read_record(fields);
    let markdown = generate_markdown(&record);
    let filename = export_filename(
        ctx.prefix,
        record.get(FieldKey::Municipality),
        ctx.clock.now(),
        "md",
    );
    deliver(ctx, &markdown, &filename, MARKDOWN_MIME, EXPORTED_MESSAGE)
}

fn deliver(
    ctx: &mut ExportContext<'_>,
    payload: &str,
    filename: &str,
    mime: &str,
    success: &str,
) -> Result<PathBuf, CoreError> {
    match ctx.exporter.export(payload, filename, mime) {
        Ok(path) => {
            tracing::info!(path = %path.display(), mime, "exported");
            ctx.notifier.notify(Notice::success(success));
            Ok(path)
        }
        Err(err) => {
            tracing::warn!(filename, error = %err, "export failed");
            ctx.notifier.notify(Notice::error(EXPORT_FAILED_MESSAGE));
            Err(err)
        }
    }
}

/// Applies a saved draft. Nothing is touched unless the whole text parses.
pub fn load_draft<F: FieldStore + ?Sized>(
    fields: &mut F,
    text: &str,
    notifier: &mut dyn Notifier,
) -> Result<usize, CoreError> {
    match FormPatch::from_json(text) {
        Ok(patch) => {
            apply_patch(fields, &patch);
            tracing::info!(fields = patch.len(), "draft loaded");
            notifier.notify(Notice::success(LOADED_MESSAGE));
            Ok(patch.len())
        }
        Err(err) => {
            tracing::warn!(error = %err, "draft rejected");
            notifier.notify(Notice::error(IMPORT_FAILED_MESSAGE));
            Err(err.into())
        }
    }
}

pub fn copy_markdown<F: FieldStore + ?Sized>(
    fields: &F,
    clipboard: &mut dyn Clipboard,
    notifier: &mut dyn Notifier,
) -> Result<(), CoreError> {
    let markdown = generate_markdown(&read_record(fields));
    match clipboard.write_text(&markdown) {
        Ok(()) => {
            notifier.notify(Notice::success(COPIED_MESSAGE));
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "clipboard copy failed");
            notifier.notify(Notice::error(COPY_FAILED_MESSAGE));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        FallbackClipboard, FixedClock, MemoryClipboard, MemoryExporter, MemoryFieldStore,
        RecordingNotifier,
    };
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock(Utc.timestamp_millis_opt(1_743_465_600_000).unwrap())
    }

    #[test]
    fn filenames_fall_back_to_draft_and_strip_separators() {
        let at = clock().0;
        assert_eq!(
            export_filename("chiikiokoshi", "", at, "json"),
            "chiikiokoshi_draft_1743465600000.json"
        );
        assert_eq!(
            export_filename("chiikiokoshi", "高山市/上宝", at, "md"),
            "chiikiokoshi_高山市_上宝_1743465600000.md"
        );
    }

    #[test]
    fn save_then_load_restores_fields() {
        let mut fields = MemoryFieldStore::new();
        fields.set_value(FieldKey::Prefecture, "岐阜県");
        fields.set_value(FieldKey::Municipality, "高山市");
        fields.set_value(FieldKey::Salary, "月額20万円");
        let mut exporter = MemoryExporter::default();
        let mut notifier = RecordingNotifier::new();
        let clock = clock();

        let path = save_draft(
            &fields,
            &mut ExportContext {
                exporter: &mut exporter,
                notifier: &mut notifier,
                clock: &clock,
                prefix: "chiikiokoshi",
            },
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("chiikiokoshi_高山市_1743465600000.json"));
        assert_eq!(exporter.files[0].mime, JSON_MIME);

        let mut restored = MemoryFieldStore::new();
        let applied = load_draft(&mut restored, &exporter.files[0].payload, &mut notifier).unwrap();
        assert_eq!(applied, FieldKey::ALL.len());
        assert_eq!(restored.value(FieldKey::Municipality), "高山市");
        assert_eq!(restored.value(FieldKey::Salary), "月額20万円");
        assert_eq!(notifier.messages(), vec![SAVED_MESSAGE, LOADED_MESSAGE]);
    }

    #[test]
    fn invalid_import_leaves_fields_alone() {
        let mut fields = MemoryFieldStore::new();
        fields.set_value(FieldKey::Mission, "既存");
        let mut notifier = RecordingNotifier::new();

        assert!(load_draft(&mut fields, "[\"not\", \"an object\"]", &mut notifier).is_err());
        assert!(load_draft(&mut fields, "{broken", &mut notifier).is_err());
        assert_eq!(fields.value(FieldKey::Mission), "既存");
        assert_eq!(
            notifier.messages(),
            vec![IMPORT_FAILED_MESSAGE, IMPORT_FAILED_MESSAGE]
        );
    }

    #[test]
    fn markdown_export_uses_markdown_mime() {
        let mut fields = MemoryFieldStore::new();
        fields.set_value(FieldKey::Municipality, "高山市");
        let mut exporter = MemoryExporter::default();
        let mut notifier = RecordingNotifier::new();
        let clock = clock();

        export_markdown(
            &fields,
            &mut ExportContext {
                exporter: &mut exporter,
                notifier: &mut notifier,
                clock: &clock,
                prefix: "chiikiokoshi",
            },
        )
        .unwrap();
        let file = &exporter.files[0];
        assert_eq!(file.mime, MARKDOWN_MIME);
        assert!(file.filename.ends_with(".md"));
        assert!(file.payload.starts_with("# 高山市地域おこし協力隊 募集"));
        assert_eq!(notifier.messages(), vec![EXPORTED_MESSAGE]);
    }

    #[test]
    fn copy_reports_success_through_fallback_and_failure_when_both_fail() {
        let fields = MemoryFieldStore::new();
        let mut notifier = RecordingNotifier::new();

        let mut clipboard =
            FallbackClipboard::new(MemoryClipboard::unavailable(), MemoryClipboard::default());
        copy_markdown(&fields, &mut clipboard, &mut notifier).unwrap();

        let mut dead =
            FallbackClipboard::new(MemoryClipboard::unavailable(), MemoryClipboard::unavailable());
        assert!(copy_markdown(&fields, &mut dead, &mut notifier).is_err());
        assert_eq!(
            notifier.messages(),
            vec![COPIED_MESSAGE, COPY_FAILED_MESSAGE]
        );
    }
}
