//! Reads and writes of the form as a whole.

use recruit_domain::{regions, FieldKey, FormPatch, FormRecord};

use crate::{CoreError, FieldStore};

/// Fresh snapshot of every field.
pub fn read_record<F: FieldStore + ?Sized>(fields: &F) -> FormRecord {
    let mut record = FormRecord::new();
    for key in FieldKey::ALL {
        record.set(key, fields.value(key));
    }
    record
}

/// Writes `value` verbatim. A prefecture change clears the municipality.
pub fn assign_field<F: FieldStore + ?Sized>(fields: &mut F, key: FieldKey, value: &str) {
    if key == FieldKey::Prefecture && fields.value(key) != value {
        fields.set_value(FieldKey::Municipality, "");
    }
    fields.set_value(key, value);
}

/// User-driven edit. Prefectures are resolved by name or 1-based number.
pub fn set_field<F: FieldStore + ?Sized>(
    fields: &mut F,
    key: FieldKey,
    raw: &str,
) -> Result<(), CoreError> {
    let value = if key == FieldKey::Prefecture && !raw.trim().is_empty() {
        regions::resolve_prefecture(raw).ok_or_else(|| {
            CoreError::InvalidOperation(format!("unknown prefecture `{}`", raw.trim()))
        })?
    } else {
        raw
    };
    assign_field(fields, key, value);
    tracing::debug!(field = %key, "field updated");
    Ok(())
}

/// Applies only the keys present in `patch`, prefecture before municipality.
pub fn apply_patch<F: FieldStore + ?Sized>(fields: &mut F, patch: &FormPatch) {
    // FieldKey ordering puts Prefecture ahead of Municipality.
    for (key, value) in patch.iter() {
        assign_field(fields, key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFieldStore;

    #[test]
    fn prefecture_change_resets_municipality() {
        let mut fields = MemoryFieldStore::new();
        set_field(&mut fields, FieldKey::Prefecture, "岐阜県").unwrap();
        set_field(&mut fields, FieldKey::Municipality, "高山市").unwrap();

        set_field(&mut fields, FieldKey::Prefecture, "岐阜県").unwrap();
        assert_eq!(fields.value(FieldKey::Municipality), "高山市");

        set_field(&mut fields, FieldKey::Prefecture, "1").unwrap();
        assert_eq!(fields.value(FieldKey::Prefecture), "北海道");
        assert_eq!(fields.value(FieldKey::Municipality), "");
    }

    #[test]
    fn unknown_prefecture_is_rejected_without_changes() {
        let mut fields = MemoryFieldStore::new();
        set_field(&mut fields, FieldKey::Municipality, "高山市").unwrap();
        assert!(set_field(&mut fields, FieldKey::Prefecture, "飛騨国").is_err());
        assert_eq!(fields.value(FieldKey::Municipality), "高山市");
    }

    #[test]
    fn patch_keeps_imported_municipality_after_prefecture() {
        let mut fields = MemoryFieldStore::new();
        set_field(&mut fields, FieldKey::Mission, "既存の内容").unwrap();
        let patch =
            FormPatch::from_json(r#"{"municipality":"高山市","prefecture":"岐阜県"}"#).unwrap();
        apply_patch(&mut fields, &patch);

        let record = read_record(&fields);
        assert_eq!(record.get(FieldKey::Prefecture), "岐阜県");
        assert_eq!(record.get(FieldKey::Municipality), "高山市");
        assert_eq!(record.get(FieldKey::Mission), "既存の内容");
    }
}
