//! Field extraction from raw OCR text.
//!
//! Each field is resolved by an ordered table of [`Rule`]s. A rule either
//! captures a value or leaves its field untouched; no rule can fail. When two
//! rules supply the same field, an [`Role::Authoritative`] match replaces a
//! [`Role::Fallback`] match, and among rules of equal role the earlier one in
//! the table wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::record::{BeneficiaryRecord, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Fallback,
    Authoritative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    Verbatim,
    Trim,
    CollapseWhitespace,
}

impl Normalize {
    fn apply(self, raw: &str) -> String {
        match self {
            Normalize::Verbatim => raw.to_string(),
            Normalize::Trim => raw.trim().to_string(),
            Normalize::CollapseWhitespace => raw.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}

#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub field: Field,
    pub role: Role,
    pub normalize: Normalize,
    pattern: Regex,
}

impl Rule {
    fn new(
        name: &'static str,
        field: Field,
        role: Role,
        normalize: Normalize,
        pattern: &str,
    ) -> Self {
        Self {
            name,
            field,
            role,
            normalize,
            pattern: Regex::new(pattern).expect("valid regex"),
        }
    }

    /// First occurrence of the trigger governs. Captures that normalize to
    /// an empty string count as no match.
    pub fn capture(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let raw = caps.get(1)?.as_str();
        let value = self.normalize.apply(raw);
        if value.is_empty() { None } else { Some(value) }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use Field::*;
    use Normalize::*;
    use Role::*;
    vec![
        Rule::new(
            "paragraph.date",
            Date,
            Authoritative,
            Verbatim,
            r"as on\s*(\d{2}-\d{2}-\d{4})",
        ),
        Rule::new(
            "paragraph.time",
            Time,
            Authoritative,
            Verbatim,
            r"as on\s*\d{2}-\d{2}-\d{4}\s*(\d{2}:\d{2}:\d{2})",
        ),
        Rule::new(
            "paragraph.bsa_id",
            CertificateNumber,
            Authoritative,
            Verbatim,
            r"vide BSA ID\s*(\d+)",
        ),
        Rule::new(
            "paragraph.name",
            Name,
            Fallback,
            Trim,
            r"(?s)Certified that the Beneficiary\s+(.*?)\s+having Beneficiary ID",
        ),
        Rule::new(
            "label.aadhaar",
            Aadhaar,
            Authoritative,
            Verbatim,
            r"Aadhaar:\s*(\S+)",
        ),
        Rule::new(
            "label.beneficiary_id",
            BeneficiaryId,
            Authoritative,
            Verbatim,
            r"Beneficiary ID:\s*(\S+)",
        ),
        Rule::new("label.name", Name, Authoritative, Trim, r"Name:\s*(.*)"),
        Rule::new(
            "label.mobile",
            MobileNo,
            Authoritative,
            Verbatim,
            r"Mobile No:\s*(\S+)",
        ),
        Rule::new(
            "label.category",
            Category,
            Authoritative,
            Verbatim,
            r"Cat/Gen:\s*(\S+)",
        ),
        // A "Scheme Name:" label opening the next line ends the span as a whole.
        Rule::new(
            "label.scheme",
            Scheme,
            Authoritative,
            CollapseWhitespace,
            r"(?s)Scheme:\s*(.*?)\s*(?:\n[ \t]*Scheme[ \t]+)?Name:",
        ),
        Rule::new(
            "label.scheme_belongs_to",
            SchemeBelongsTo,
            Authoritative,
            Trim,
            r"(?i)Scheme Belongs to:\s*(.*)",
        ),
    ]
});

/// The extraction rule table, in evaluation order.
pub fn rules() -> &'static [Rule] {
    RULES.as_slice()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub value: String,
    pub rule: &'static str,
    pub role: Role,
}

/// Resolved matches per field, before defaults are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMatches {
    slots: [Option<FieldMatch>; 10],
}

impl FieldMatches {
    pub fn get(&self, field: Field) -> Option<&FieldMatch> {
        self.slots[slot(field)].as_ref()
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.get(field).map(|found| found.value.as_str())
    }

    pub fn into_record(self) -> BeneficiaryRecord {
        let mut slots = self.slots;
        BeneficiaryRecord::from_matches(|field| {
            slots[slot(field)].take().map(|found| found.value)
        })
    }

    fn offer(&mut self, rule: &Rule, value: String) {
        let entry = &mut self.slots[slot(rule.field)];
        let replace = match entry {
            None => true,
            Some(existing) => existing.role == Role::Fallback && rule.role == Role::Authoritative,
        };
        if replace {
            *entry = Some(FieldMatch {
                value,
                rule: rule.name,
                role: rule.role,
            });
        }
    }
}

fn slot(field: Field) -> usize {
    field as usize
}

/// Phase one: run every rule and resolve overlaps between rules.
pub fn extract_matches(text: &str) -> FieldMatches {
    let mut matches = FieldMatches::default();
    for rule in rules() {
        if let Some(value) = rule.capture(text) {
            matches.offer(rule, value);
        }
    }
    matches
}

/// Maps OCR text to a fully populated record. Never fails.
pub fn extract(text: &str) -> BeneficiaryRecord {
    extract_matches(text).into_record()
}
