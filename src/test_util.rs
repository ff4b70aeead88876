#[cfg(test)]
pub(crate) const SAMPLE_OCR_TEXT: &str = "\
CENTRAL Govt - National Social Assistance Programme (NSAP)
LIFE CERTIFICATE
Certified that the Beneficiary SITA DEVI having Beneficiary ID - UP1234567 has
been biometrically authenticated his/her presence and that he/she is alive
as on 05-03-2024 14:22:10 vide BSA ID 998877.

Aadhaar: XXXXXXXX4321
Beneficiary ID: UP1234567
Scheme: Indira Gandhi National Widow
Pension Scheme
Name: SITA DEVI
Mobile No: XXXXXX7890
Cat/Gen: GEN/F
Scheme Belongs to: Central Govt
";

/// OCR stand-in returning canned text and recording how often it ran.
#[cfg(test)]
pub(crate) struct CannedOcr {
    pub text: String,
    pub calls: std::cell::Cell<usize>,
}

#[cfg(test)]
impl CannedOcr {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: std::cell::Cell::new(0),
        }
    }
}

#[cfg(test)]
impl crate::ocr::OcrEngine for CannedOcr {
    fn recognize(&self, _image_bytes: &[u8]) -> anyhow::Result<String> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.text.clone())
    }
}

/// Encodes a solid-colour PNG of the given size.
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([180, 120, 90]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}
