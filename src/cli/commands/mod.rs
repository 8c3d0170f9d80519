pub mod assist;
pub mod form;
pub mod system;
pub mod transfer;

use recruit_domain::FieldKey;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = form::definitions()
        .into_iter()
        .chain(transfer::definitions())
        .chain(assist::definitions())
        .chain(system::definitions());
    for entry in entries {
        registry.register(entry);
    }
}

/// Resolves a record key or element id given on the command line.
pub(crate) fn parse_field(raw: Option<&str>, usage: &str) -> Result<FieldKey, CommandError> {
    let raw = raw.ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))?;
    FieldKey::lookup(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown field `{raw}`. Use `fields` to list field names."
        ))
    })
}
