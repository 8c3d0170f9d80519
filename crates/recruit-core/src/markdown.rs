//! Listing preview: form record to Markdown, Markdown to minimal HTML.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use recruit_domain::{FieldKey, FormRecord};
use regex::Regex;

const PLACEHOLDER_MUNICIPALITY: &str = "○○市";

enum Entry {
    /// `**label:** value{suffix}`
    Inline {
        key: FieldKey,
        label: &'static str,
        suffix: &'static str,
    },
    /// `**label**` followed by the value as its own paragraph.
    Block { key: FieldKey, label: &'static str },
    /// `{prefix}value`
    Plain {
        key: FieldKey,
        prefix: &'static str,
    },
}

impl Entry {
    fn key(&self) -> FieldKey {
        match self {
            Entry::Inline { key, .. } | Entry::Block { key, .. } | Entry::Plain { key, .. } => *key,
        }
    }
}

struct Section {
    heading: &'static str,
    entries: &'static [Entry],
}

const fn inline(key: FieldKey, label: &'static str) -> Entry {
    Entry::Inline {
        key,
        label,
        suffix: "",
    }
}

const fn block(key: FieldKey, label: &'static str) -> Entry {
    Entry::Block { key, label }
}

const fn plain(key: FieldKey, prefix: &'static str) -> Entry {
    Entry::Plain { key, prefix }
}

static SECTIONS: [Section; 5] = [
    Section {
        heading: "募集内容",
        entries: &[
            Entry::Inline {
                key: FieldKey::RecruitmentNumber,
                label: "募集人数",
                suffix: "名",
            },
            block(FieldKey::RecruitmentBackground, "募集背景"),
            block(FieldKey::Mission, "活動内容・ミッション"),
            block(FieldKey::ActivitySupport, "活動サポート体制"),
        ],
    },
    Section {
        heading: "応募条件",
        entries: &[
            inline(FieldKey::AgeRequirement, "年齢"),
            block(FieldKey::ResidenceRequirement, "居住要件"),
            block(FieldKey::RequiredSkills, "必須スキル・経験"),
            block(FieldKey::PreferredSkills, "歓迎するスキル・経験"),
            block(FieldKey::DesiredPersonality, "求める人物像"),
        ],
    },
    Section {
        heading: "待遇・勤務条件",
        entries: &[
            inline(FieldKey::EmploymentStatus, "雇用形態"),
            inline(FieldKey::Salary, "報酬"),
            inline(FieldKey::ContractPeriod, "任期"),
            inline(FieldKey::WorkingHours, "勤務時間"),
            inline(FieldKey::Holidays, "休日"),
            inline(FieldKey::Insurance, "社会保険"),
            block(FieldKey::Housing, "住居"),
            inline(FieldKey::Vehicle, "車両"),
            block(FieldKey::OtherBenefits, "その他待遇"),
        ],
    },
    Section {
        heading: "応募について",
        entries: &[
            inline(FieldKey::ApplicationDeadline, "応募締切"),
            block(FieldKey::ApplicationMethod, "応募方法"),
            block(FieldKey::RequiredDocuments, "必要書類"),
            block(FieldKey::SelectionProcess, "選考プロセス"),
            block(FieldKey::AdditionalNotes, "注意事項"),
        ],
    },
    Section {
        heading: "問い合わせ先",
        entries: &[
            plain(FieldKey::ContactDepartment, ""),
            plain(FieldKey::ContactPerson, "担当: "),
            plain(FieldKey::ContactPhone, "電話: "),
            plain(FieldKey::ContactEmail, "メール: "),
        ],
    },
];

/// Renders the listing. Headings and lines whose fields are empty are omitted.
pub fn generate_markdown(record: &FormRecord) -> String {
    let municipality = record.get(FieldKey::Municipality);
    let title = if municipality.is_empty() {
        PLACEHOLDER_MUNICIPALITY
    } else {
        municipality
    };
    let mut out = format!("# {title}地域おこし協力隊 募集\n\n");

    push_region(&mut out, record);

    for section in &SECTIONS {
        if !section.entries.iter().any(|e| record.is_filled(e.key())) {
            continue;
        }
        out.push_str(&format!("## {}\n\n", section.heading));
        for entry in section.entries {
            let key = entry.key();
            if !record.is_filled(key) {
                continue;
            }
            let value = display_value(record, key);
            match entry {
                Entry::Inline { label, suffix, .. } => {
                    out.push_str(&format!("**{label}:** {value}{suffix}\n\n"))
                }
                Entry::Block { label, .. } => out.push_str(&format!("**{label}**\n\n{value}\n\n")),
                Entry::Plain { prefix, .. } => out.push_str(&format!("{prefix}{value}\n\n")),
            }
        }
    }
    out
}

fn push_region(out: &mut String, record: &FormRecord) {
    let backing = [
        FieldKey::RegionName,
        FieldKey::Prefecture,
        FieldKey::RegionFeatures,
        FieldKey::RegionChallenges,
    ];
    if !backing.iter().any(|key| record.is_filled(*key)) {
        return;
    }
    out.push_str("## 地域について\n\n");
    if record.is_filled(FieldKey::RegionName) {
        out.push_str(&format!("### {}\n\n", record.get(FieldKey::RegionName)));
    }
    if record.is_filled(FieldKey::Prefecture) {
        out.push_str(&format!(
            "**所在地:** {}{}\n\n",
            record.get(FieldKey::Prefecture),
            record.get(FieldKey::Municipality)
        ));
    }
    if record.is_filled(FieldKey::RegionFeatures) {
        out.push_str(&format!("{}\n\n", record.get(FieldKey::RegionFeatures)));
    }
    if record.is_filled(FieldKey::RegionChallenges) {
        out.push_str(&format!(
            "**地域の課題**\n\n{}\n\n",
            record.get(FieldKey::RegionChallenges)
        ));
    }
}

fn display_value(record: &FormRecord, key: FieldKey) -> Cow<'_, str> {
    let value = record.get(key);
    if key == FieldKey::ApplicationDeadline {
        format_deadline(value)
    } else {
        Cow::Borrowed(value)
    }
}

/// `2025-04-30` becomes `2025年4月30日`; anything else is kept as typed.
pub fn format_deadline(value: &str) -> Cow<'_, str> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => Cow::Owned(format!(
            "{}年{}月{}日",
            date.year(),
            date.month(),
            date.day()
        )),
        Err(_) => Cow::Borrowed(value),
    }
}

static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid h3 pattern"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("valid h2 pattern"));
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid h1 pattern"));
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));

/// Minimal line-oriented conversion. Output depends only on the input.
pub fn markdown_to_html(markdown: &str) -> String {
    let escaped = escape_html(markdown);
    let html = H3.replace_all(&escaped, "<h3>$1</h3>");
    let html = H2.replace_all(&html, "<h2>$1</h2>");
    let html = H1.replace_all(&html, "<h1>$1</h1>");
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");

    html.split("\n\n")
        .map(|block| {
            let trimmed = block.trim();
            if trimmed.is_empty() || trimmed.starts_with("<h") {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
