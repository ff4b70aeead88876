use life_certificate::{BeneficiaryRecord, DEFAULT_VALUE, Field, extract, extract_matches};

const SCREEN: &str = "\
Certified that the Beneficiary John Doe having Beneficiary ID - MH0001 has been
biometrically authenticated his/her presence and that he/she is alive
as on 05-03-2024 14:22:10 vide BSA ID 998877.
Aadhaar: XXXXXXXX1111
Beneficiary ID: MH0001
Scheme: Indira Gandhi National Old Age Pension Scheme
Name: Jane Smith
Mobile No: XXXXXX2222
Cat/Gen: OBC/M
Scheme Belongs to: Central Govt
";

fn assert_well_formed(record: &BeneficiaryRecord) {
    assert_eq!(record.iter().count(), Field::ALL.len());
    for (field, value) in record.iter() {
        assert!(!value.is_empty(), "{} is empty", field);
        assert_eq!(value.trim(), value, "{} is not trimmed", field);
    }
}

#[test]
fn every_field_is_a_match_or_the_default() {
    let inputs = [
        "",
        "   \n\t ",
        SCREEN,
        "Name:",
        "Aadhaar:\n\n",
        "as on 99-99-9999",
        "Certified that the Beneficiary having Beneficiary ID",
        "\u{0928}\u{093E}\u{092E}: \u{0938}\u{0940}\u{0924}\u{093E}",
    ];
    for input in inputs {
        assert_well_formed(&extract(input));
    }
    assert!(Field::ALL.iter().all(|field| extract("").is_default(*field)));
}

#[test]
fn extraction_is_pure() {
    assert_eq!(extract(SCREEN), extract(SCREEN));
    assert_eq!(extract(SCREEN), extract_matches(SCREEN).into_record());
}

#[test]
fn paragraph_timestamp_and_bsa_id() {
    let record = extract("... is alive as on 05-03-2024 14:22:10 vide BSA ID 998877 ...");
    assert_eq!(record.get(Field::Date), "05-03-2024");
    assert_eq!(record.get(Field::Time), "14:22:10");
    assert_eq!(record.get(Field::CertificateNumber), "998877");
}

#[test]
fn explicit_name_label_wins_over_paragraph() {
    let record = extract(SCREEN);
    assert_eq!(record.get(Field::Name), "Jane Smith");

    let paragraph_only = SCREEN.replace("Name: Jane Smith\n", "");
    let record = extract(&paragraph_only);
    assert_eq!(record.get(Field::Name), "John Doe");
}

#[test]
fn missing_aadhaar_affects_nothing_else() {
    let with = extract(SCREEN);
    let without = extract(&SCREEN.replace("Aadhaar: XXXXXXXX1111\n", ""));
    assert_eq!(without.get(Field::Aadhaar), DEFAULT_VALUE);
    for field in Field::ALL.into_iter().filter(|field| *field != Field::Aadhaar) {
        assert_eq!(with.get(field), without.get(field), "{} changed", field);
    }
}

#[test]
fn scheme_whitespace_is_collapsed() {
    let record = extract("Scheme:  Widow   Pension \n  Scheme Name:");
    assert_eq!(record.get(Field::Scheme), "Widow Pension");
}

#[test]
fn full_screen_snapshot() {
    insta::assert_json_snapshot!(extract(SCREEN), @r#"
    {
      "Name": "Jane Smith",
      "Beneficiary ID": "MH0001",
      "Date": "05-03-2024",
      "Time": "14:22:10",
      "Certificate Number": "998877",
      "Scheme": "Indira Gandhi National Old Age Pension Scheme",
      "Aadhaar": "XXXXXXXX1111",
      "Mobile No": "XXXXXX2222",
      "Category": "OBC/M",
      "Scheme Belongs To": "Central Govt"
    }
    "#);
}
