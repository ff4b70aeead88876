//! The certificate template as a flat list of content blocks.
//!
//! Nothing here knows about the PDF engine. All lengths are PostScript
//! points (1/72 inch).

use crate::photo::PhotoAsset;
use crate::record::{BeneficiaryRecord, Field};

pub const HEADER_TEXT: &str = "CENTRAL Govt - National Social Assistance Programme (NSAP)";
pub const TITLE_TEXT: &str = "LIFE CERTIFICATE";

pub const BODY_FONT_SIZE: f32 = 12.0;
pub const BODY_LEADING: f32 = 15.0;
pub const TITLE_FONT_SIZE: f32 = 22.0;
pub const TITLE_LEADING: f32 = 26.4;

pub const PHOTO_WIDTH: f32 = 1.5 * INCH;
pub const PHOTO_HEIGHT: f32 = 1.9 * INCH;
pub const LABEL_COLUMN_WIDTH: f32 = 2.5 * INCH;
pub const VALUE_COLUMN_WIDTH: f32 = 4.5 * INCH;

pub const INCH: f32 = 72.0;

pub const LABEL_FILL: Rgb = Rgb(0x4F, 0x81, 0xBD);
pub const WHITE_SMOKE: Rgb = Rgb(0xF5, 0xF5, 0xF5);
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// Details table rows, top to bottom.
pub const TABLE_ROWS: [(&str, Field); 7] = [
    ("Aadhaar Number (Masked)", Field::Aadhaar),
    ("Beneficiary ID", Field::BeneficiaryId),
    ("Scheme Name", Field::Scheme),
    ("Beneficiary Name", Field::Name),
    ("Mobile Number (Masked)", Field::MobileNo),
    ("Category / Gender", Field::Category),
    ("(Scheme Belongs To:)", Field::SchemeBelongsTo),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Justify,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub weight: Weight,
}

impl Run {
    pub fn regular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: Weight::Regular,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: Weight::Bold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub align: Align,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub weight: Weight,
    pub color: Rgb,
    pub background: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub column_widths: [f32; 2],
    pub rows: Vec<TableRow>,
    pub label_style: CellStyle,
    pub value_style: CellStyle,
    pub font_size: f32,
    pub leading: f32,
    pub padding: Padding,
    pub grid_width: f32,
    pub grid_color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    Paragraph { runs: Vec<Run>, style: TextStyle },
    Spacer { height: f32 },
    Image { photo: &'a PhotoAsset, width: f32, height: f32 },
    Table(Table),
}

impl Block<'_> {
    /// Run text concatenated; empty for non-paragraph blocks.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph { runs, .. } => runs.iter().map(|run| run.text.as_str()).collect(),
            _ => String::new(),
        }
    }
}

const BODY: TextStyle = TextStyle {
    font_size: BODY_FONT_SIZE,
    leading: BODY_LEADING,
    align: Align::Left,
};

/// Builds the fixed certificate template for `record`. The photo block and
/// its trailing spacer are the only parts that depend on `photo`.
pub fn certificate_blocks<'a>(
    record: &BeneficiaryRecord,
    photo: Option<&'a PhotoAsset>,
) -> Vec<Block<'a>> {
    let mut blocks = vec![
        Block::Paragraph {
            runs: vec![Run::regular(HEADER_TEXT)],
            style: BODY,
        },
        Block::Spacer { height: 0.1 * INCH },
        Block::Paragraph {
            runs: vec![Run::bold(TITLE_TEXT)],
            style: TextStyle {
                font_size: TITLE_FONT_SIZE,
                leading: TITLE_LEADING,
                align: Align::Center,
            },
        },
        Block::Spacer { height: 0.25 * INCH },
        Block::Paragraph {
            runs: certification_runs(record),
            style: TextStyle {
                align: Align::Justify,
                ..BODY
            },
        },
        Block::Spacer { height: 0.25 * INCH },
    ];

    if let Some(photo) = photo {
        blocks.push(Block::Image {
            photo,
            width: PHOTO_WIDTH,
            height: PHOTO_HEIGHT,
        });
        blocks.push(Block::Spacer { height: 0.25 * INCH });
    }

    blocks.push(Block::Table(details_table(record)));
    blocks
}

fn certification_runs(record: &BeneficiaryRecord) -> Vec<Run> {
    vec![
        Run::regular("Certified that the Beneficiary "),
        Run::bold(record.get(Field::Name)),
        Run::regular(" having Beneficiary ID - "),
        Run::bold(record.get(Field::BeneficiaryId)),
        Run::regular(
            " has been biometrically authenticated his/her presence and that he/she is alive as on - ",
        ),
        Run::bold(format!(
            "{} {}",
            record.get(Field::Date),
            record.get(Field::Time)
        )),
        Run::regular(" vide BSA ID - "),
        Run::bold(record.get(Field::CertificateNumber)),
        Run::regular("."),
    ]
}

fn details_table(record: &BeneficiaryRecord) -> Table {
    Table {
        column_widths: [LABEL_COLUMN_WIDTH, VALUE_COLUMN_WIDTH],
        rows: TABLE_ROWS
            .iter()
            .map(|(label, field)| TableRow {
                label: label.to_string(),
                value: record.get(*field).to_string(),
            })
            .collect(),
        label_style: CellStyle {
            weight: Weight::Bold,
            color: WHITE_SMOKE,
            background: Some(LABEL_FILL),
        },
        value_style: CellStyle {
            weight: Weight::Regular,
            color: BLACK,
            background: None,
        },
        font_size: BODY_FONT_SIZE,
        leading: BODY_LEADING,
        padding: Padding {
            top: 3.0,
            bottom: 12.0,
            left: 6.0,
            right: 6.0,
        },
        grid_width: 1.0,
        grid_color: BLACK,
    }
}
