//! Declared table of every recognized form field.
//!
//! A field has three names: the record key used in saved JSON files
//! (`regionFeatures`), the element id that identifies the input and suffixes
//! durable-storage keys (`region-features`), and the label shown to users.
//! [`FIELDS`] is the only place these are defined; no name is derived from
//! another.

use std::fmt;

/// Every field collected by the wizard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Prefecture,
    Municipality,
    RegionName,
    RegionFeatures,
    RegionChallenges,
    RecruitmentNumber,
    RecruitmentBackground,
    Mission,
    ActivitySupport,
    AgeRequirement,
    ResidenceRequirement,
    RequiredSkills,
    PreferredSkills,
    DesiredPersonality,
    EmploymentStatus,
    Salary,
    ContractPeriod,
    WorkingHours,
    Holidays,
    Insurance,
    Housing,
    Vehicle,
    OtherBenefits,
    ApplicationDeadline,
    ApplicationMethod,
    RequiredDocuments,
    SelectionProcess,
    AdditionalNotes,
    ContactDepartment,
    ContactPerson,
    ContactPhone,
    ContactEmail,
}

/// Input shape of a field. Only used as a presentation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultiLine,
    Number,
    Date,
    Email,
    Phone,
    Choice,
}

/// One row of the declared field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub record_key: &'static str,
    pub element_id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub step: usize,
    pub required: bool,
}

const fn row(
    key: FieldKey,
    record_key: &'static str,
    element_id: &'static str,
    label: &'static str,
    kind: FieldKind,
    step: usize,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        key,
        record_key,
        element_id,
        label,
        kind,
        step,
        required,
    }
}

/// Rows are ordered exactly like [`FieldKey`] variants.
#[rustfmt::skip]
pub static FIELDS: [FieldSpec; 32] = [
    row(FieldKey::Prefecture, "prefecture", "prefecture", "都道府県", FieldKind::Choice, 0, true),
    row(FieldKey::Municipality, "municipality", "municipality", "市区町村", FieldKind::Text, 0, true),
    row(FieldKey::RegionName, "regionName", "region-name", "地域名", FieldKind::Text, 0, false),
    row(FieldKey::RegionFeatures, "regionFeatures", "region-features", "地域の特徴", FieldKind::MultiLine, 0, false),
    row(FieldKey::RegionChallenges, "regionChallenges", "region-challenges", "地域の課題", FieldKind::MultiLine, 0, false),
    row(FieldKey::RecruitmentNumber, "recruitmentNumber", "recruitment-number", "募集人数", FieldKind::Number, 1, true),
    row(FieldKey::RecruitmentBackground, "recruitmentBackground", "recruitment-background", "募集背景", FieldKind::MultiLine, 1, false),
    row(FieldKey::Mission, "mission", "mission", "活動内容・ミッション", FieldKind::MultiLine, 1, true),
    row(FieldKey::ActivitySupport, "activitySupport", "activity-support", "活動サポート体制", FieldKind::MultiLine, 1, false),
    row(FieldKey::AgeRequirement, "ageRequirement", "age-requirement", "年齢", FieldKind::Text, 2, false),
    row(FieldKey::ResidenceRequirement, "residenceRequirement", "residence-requirement", "居住要件", FieldKind::MultiLine, 2, true),
    row(FieldKey::RequiredSkills, "requiredSkills", "required-skills", "必須スキル・経験", FieldKind::MultiLine, 2, false),
    row(FieldKey::PreferredSkills, "preferredSkills", "preferred-skills", "歓迎するスキル・経験", FieldKind::MultiLine, 2, false),
    row(FieldKey::DesiredPersonality, "desiredPersonality", "desired-personality", "求める人物像", FieldKind::MultiLine, 2, false),
    row(FieldKey::EmploymentStatus, "employmentStatus", "employment-status", "雇用形態", FieldKind::Text, 3, true),
    row(FieldKey::Salary, "salary", "salary", "報酬", FieldKind::Text, 3, true),
    row(FieldKey::ContractPeriod, "contractPeriod", "contract-period", "任期", FieldKind::Text, 3, true),
    row(FieldKey::WorkingHours, "workingHours", "working-hours", "勤務時間", FieldKind::Text, 3, false),
    row(FieldKey::Holidays, "holidays", "holidays", "休日", FieldKind::Text, 3, false),
    row(FieldKey::Insurance, "insurance", "insurance", "社会保険", FieldKind::Text, 3, false),
    row(FieldKey::Housing, "housing", "housing", "住居", FieldKind::MultiLine, 3, false),
    row(FieldKey::Vehicle, "vehicle", "vehicle", "車両", FieldKind::Text, 3, false),
    row(FieldKey::OtherBenefits, "otherBenefits", "other-benefits", "その他待遇", FieldKind::MultiLine, 3, false),
    row(FieldKey::ApplicationDeadline, "applicationDeadline", "application-deadline", "応募締切", FieldKind::Date, 4, true),
    row(FieldKey::ApplicationMethod, "applicationMethod", "application-method", "応募方法", FieldKind::MultiLine, 4, true),
    row(FieldKey::RequiredDocuments, "requiredDocuments", "required-documents", "必要書類", FieldKind::MultiLine, 4, false),
    row(FieldKey::SelectionProcess, "selectionProcess", "selection-process", "選考プロセス", FieldKind::MultiLine, 4, false),
    row(FieldKey::AdditionalNotes, "additionalNotes", "additional-notes", "注意事項", FieldKind::MultiLine, 4, false),
    row(FieldKey::ContactDepartment, "contactDepartment", "contact-department", "担当部署", FieldKind::Text, 5, true),
    row(FieldKey::ContactPerson, "contactPerson", "contact-person", "担当者", FieldKind::Text, 5, false),
    row(FieldKey::ContactPhone, "contactPhone", "contact-phone", "電話番号", FieldKind::Phone, 5, false),
    row(FieldKey::ContactEmail, "contactEmail", "contact-email", "メールアドレス", FieldKind::Email, 5, true),
];

impl FieldKey {
    pub const ALL: [FieldKey; 32] = [
        FieldKey::Prefecture,
        FieldKey::Municipality,
        FieldKey::RegionName,
        FieldKey::RegionFeatures,
        FieldKey::RegionChallenges,
        FieldKey::RecruitmentNumber,
        FieldKey::RecruitmentBackground,
        FieldKey::Mission,
        FieldKey::ActivitySupport,
        FieldKey::AgeRequirement,
        FieldKey::ResidenceRequirement,
        FieldKey::RequiredSkills,
        FieldKey::PreferredSkills,
        FieldKey::DesiredPersonality,
        FieldKey::EmploymentStatus,
        FieldKey::Salary,
        FieldKey::ContractPeriod,
        FieldKey::WorkingHours,
        FieldKey::Holidays,
        FieldKey::Insurance,
        FieldKey::Housing,
        FieldKey::Vehicle,
        FieldKey::OtherBenefits,
        FieldKey::ApplicationDeadline,
        FieldKey::ApplicationMethod,
        FieldKey::RequiredDocuments,
        FieldKey::SelectionProcess,
        FieldKey::AdditionalNotes,
        FieldKey::ContactDepartment,
        FieldKey::ContactPerson,
        FieldKey::ContactPhone,
        FieldKey::ContactEmail,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self as usize]
    }

    pub fn record_key(self) -> &'static str {
        self.spec().record_key
    }

    pub fn element_id(self) -> &'static str {
        self.spec().element_id
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    pub fn step(self) -> usize {
        self.spec().step
    }

    /// Whether the field starts out flagged as required.
    pub fn required_by_default(self) -> bool {
        self.spec().required
    }

    pub fn from_record_key(value: &str) -> Option<Self> {
        FIELDS
            .iter()
            .find(|spec| spec.record_key == value)
            .map(|spec| spec.key)
    }

    pub fn from_element_id(value: &str) -> Option<Self> {
        FIELDS
            .iter()
            .find(|spec| spec.element_id == value)
            .map(|spec| spec.key)
    }

    /// Accepts either a record key or an element id.
    pub fn lookup(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::from_record_key(trimmed).or_else(|| Self::from_element_id(trimmed))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_rows_follow_variant_order() {
        for (index, key) in FieldKey::ALL.iter().enumerate() {
            assert_eq!(FIELDS[index].key, *key, "row {index} out of order");
            assert_eq!(*key as usize, index);
        }
    }

    #[test]
    fn names_are_unique_in_both_namespaces() {
        let records: HashSet<_> = FIELDS.iter().map(|spec| spec.record_key).collect();
        let elements: HashSet<_> = FIELDS.iter().map(|spec| spec.element_id).collect();
        assert_eq!(records.len(), FIELDS.len());
        assert_eq!(elements.len(), FIELDS.len());
    }

    #[test]
    fn lookup_accepts_both_spellings() {
        assert_eq!(
            FieldKey::lookup("regionFeatures"),
            Some(FieldKey::RegionFeatures)
        );
        assert_eq!(
            FieldKey::lookup("region-features"),
            Some(FieldKey::RegionFeatures)
        );
        assert_eq!(FieldKey::lookup("region_features"), None);
        assert_eq!(FieldKey::ContactEmail.element_id(), "contact-email");
    }
}
