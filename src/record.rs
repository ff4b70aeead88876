use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Marker shown for any field the OCR text did not supply.
pub const DEFAULT_VALUE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    BeneficiaryId,
    Date,
    Time,
    CertificateNumber,
    Scheme,
    Aadhaar,
    MobileNo,
    Category,
    SchemeBelongsTo,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Name,
        Field::BeneficiaryId,
        Field::Date,
        Field::Time,
        Field::CertificateNumber,
        Field::Scheme,
        Field::Aadhaar,
        Field::MobileNo,
        Field::Category,
        Field::SchemeBelongsTo,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::BeneficiaryId => "Beneficiary ID",
            Field::Date => "Date",
            Field::Time => "Time",
            Field::CertificateNumber => "Certificate Number",
            Field::Scheme => "Scheme",
            Field::Aadhaar => "Aadhaar",
            Field::MobileNo => "Mobile No",
            Field::Category => "Category",
            Field::SchemeBelongsTo => "Scheme Belongs To",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured result of extraction. Every field always holds a value;
/// unmatched fields hold [`DEFAULT_VALUE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeneficiaryRecord {
    values: [String; 10],
}

impl BeneficiaryRecord {
    /// Builds a record from per-field matches, substituting the default for
    /// every absent entry.
    pub fn from_matches<F>(mut lookup: F) -> Self
    where
        F: FnMut(Field) -> Option<String>,
    {
        let values = Field::ALL.map(|field| {
            lookup(field).unwrap_or_else(|| DEFAULT_VALUE.to_string())
        });
        Self { values }
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn is_default(&self, field: Field) -> bool {
        self.get(field) == DEFAULT_VALUE
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }

    pub fn matched_count(&self) -> usize {
        Field::ALL
            .iter()
            .filter(|field| !self.is_default(**field))
            .count()
    }
}

impl Default for BeneficiaryRecord {
    fn default() -> Self {
        Self::from_matches(|_| None)
    }
}

impl Serialize for BeneficiaryRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_holds_marker_everywhere() {
        let record = BeneficiaryRecord::default();
        assert_eq!(record.iter().count(), 10);
        for (field, value) in record.iter() {
            assert_eq!(value, DEFAULT_VALUE, "field {}", field);
            assert!(record.is_default(field));
        }
        assert_eq!(record.matched_count(), 0);
    }

    #[test]
    fn from_matches_keeps_field_order() {
        let record = BeneficiaryRecord::from_matches(|field| match field {
            Field::Date => Some("05-03-2024".to_string()),
            Field::Scheme => Some("Widow Pension".to_string()),
            _ => None,
        });
        assert_eq!(record.get(Field::Date), "05-03-2024");
        assert_eq!(record.get(Field::Scheme), "Widow Pension");
        assert_eq!(record.get(Field::Name), DEFAULT_VALUE);
        assert_eq!(record.matched_count(), 2);
        let fields: Vec<Field> = record.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let record = BeneficiaryRecord::from_matches(|field| match field {
            Field::Name => Some("Jane Smith".to_string()),
            _ => None,
        });
        let json = serde_json::to_string(&record).expect("serialize record");
        insta::assert_snapshot!(json, @r#"{"Name":"Jane Smith","Beneficiary ID":"N/A","Date":"N/A","Time":"N/A","Certificate Number":"N/A","Scheme":"N/A","Aadhaar":"N/A","Mobile No":"N/A","Category":"N/A","Scheme Belongs To":"N/A"}"#);
    }
}
