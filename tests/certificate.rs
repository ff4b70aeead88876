use std::io::Cursor;

use life_certificate::render::{Block, certificate_blocks};
use life_certificate::{BeneficiaryRecord, DEFAULT_VALUE, PhotoAsset, extract, render};

const SCREEN: &str = "\
Certified that the Beneficiary RAM LAL having Beneficiary ID - RJ5550 has been
biometrically authenticated his/her presence and that he/she is alive
as on 11-12-2023 09:05:44 vide BSA ID 4242.
Aadhaar: XXXXXXXX9999
Beneficiary ID: RJ5550
Scheme: Indira Gandhi National Disability Pension Scheme
Name: RAM LAL
Mobile No: XXXXXX1234
Cat/Gen: SC/M
Scheme Belongs to: Central Govt
";

fn photo() -> PhotoAsset {
    let image = image::RgbImage::from_pixel(90, 114, image::Rgb([20, 40, 60]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    PhotoAsset::from_bytes(bytes).expect("photo")
}

fn pages(bytes: &[u8]) -> usize {
    printpdf::lopdf::Document::load_mem(bytes)
        .expect("parse pdf")
        .get_pages()
        .len()
}

fn without_spacing<'a>(blocks: Vec<Block<'a>>) -> Vec<Block<'a>> {
    blocks
        .into_iter()
        .filter(|block| !matches!(block, Block::Image { .. } | Block::Spacer { .. }))
        .collect()
}

#[test]
fn photo_changes_only_the_image_block() {
    let record = extract(SCREEN);
    let photo = photo();
    let with = certificate_blocks(&record, Some(&photo));
    let without = certificate_blocks(&record, None);

    let images = with
        .iter()
        .filter(|block| matches!(block, Block::Image { .. }))
        .count();
    assert_eq!(images, 1);
    assert_eq!(without_spacing(with), without_spacing(without));
}

#[test]
fn default_record_prints_the_marker() {
    let record = BeneficiaryRecord::default();
    let blocks = certificate_blocks(&record, None);
    let Some(Block::Table(table)) = blocks.last() else {
        panic!("certificate must end with the details table");
    };
    assert!(table.rows.iter().all(|row| row.value == DEFAULT_VALUE));

    let document = render(&record, None).expect("render defaults");
    assert_eq!(pages(document.as_bytes()), 1);
}

#[test]
fn renders_with_jpeg_photo() {
    let record = extract(SCREEN);
    let photo = photo();
    assert_eq!(photo.mime(), "image/jpeg");
    let document = render(&record, Some(&photo)).expect("render");
    let bytes = document.into_bytes();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(pages(&bytes), 1);
}
