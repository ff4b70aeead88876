//! Drives `printpdf` from a block list.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Pt, Rect,
};

use super::RenderError;
use super::layout::{Align, Block, BLACK, CellStyle, Rgb, Run, Table, TextStyle, Weight};
use super::metrics::{self, Line};
use crate::photo::PhotoAsset;

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageSetup {
    /// US Letter with 0.75in margins all round.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 54.0,
            margin_bottom: 54.0,
            margin_left: 54.0,
            margin_right: 54.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(printpdf::Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

struct Canvas<'d> {
    doc: &'d PdfDocumentReference,
    setup: PageSetup,
    layer: PdfLayerReference,
    pages: usize,
    /// Distance of the next free line from the page bottom.
    cursor: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Canvas<'_> {
    fn font(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    fn top(&self) -> f32 {
        self.setup.height - self.setup.margin_top
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            mm(self.setup.width),
            mm(self.setup.height),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = self.top();
    }

    /// Starts a new page unless `height` still fits. Content taller than a
    /// whole page is left to the caller to split.
    fn reserve(&mut self, height: f32) {
        let at_top = (self.cursor - self.top()).abs() < f32::EPSILON;
        if self.cursor - height < self.setup.margin_bottom && !at_top {
            self.new_page();
        }
    }

    fn text(&self, text: &str, font_size: f32, x: f32, baseline: f32, weight: Weight) {
        self.layer
            .use_text(text, font_size, mm(x), mm(baseline), self.font(weight));
    }

    /// Draws one line box whose top edge sits at `top`. `stretch` spreads
    /// the slack over the inter-word gaps.
    fn line(&self, line: &Line, style: &TextStyle, x: f32, width: f32, top: f32, stretch: bool) {
        let baseline = top - style.leading * 0.8;
        let space = metrics::space_width(style.font_size);
        let slack = (width - line.width).max(0.0);
        let gaps = line.words.len().saturating_sub(1);
        let (mut pen, gap) = match style.align {
            Align::Left => (x, space),
            Align::Center => (x + slack / 2.0, space),
            Align::Justify if stretch && gaps > 0 => (x, space + slack / gaps as f32),
            Align::Justify => (x, space),
        };
        for word in &line.words {
            for fragment in &word.fragments {
                self.text(&fragment.text, style.font_size, pen, baseline, fragment.weight);
                pen += fragment.width;
            }
            pen += gap;
        }
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.layer.set_fill_color(color(fill));
        self.layer.add_rect(
            Rect::new(mm(x), mm(y), mm(x + width), mm(y + height)).with_mode(PaintMode::Fill),
        );
    }

    fn stroke_rect(&self, x: f32, y: f32, width: f32, height: f32, stroke: Rgb, thickness: f32) {
        self.layer.set_outline_color(color(stroke));
        self.layer.set_outline_thickness(thickness);
        self.layer.add_rect(
            Rect::new(mm(x), mm(y), mm(x + width), mm(y + height)).with_mode(PaintMode::Stroke),
        );
    }

    fn paragraph(&mut self, runs: &[Run], style: &TextStyle) {
        let width = self.setup.content_width();
        let lines = metrics::wrap(runs, style.font_size, width);
        let last = lines.len().saturating_sub(1);
        for (idx, line) in lines.iter().enumerate() {
            self.reserve(style.leading);
            self.layer.set_fill_color(color(BLACK));
            let x = self.setup.margin_left;
            self.line(line, style, x, width, self.cursor, idx < last);
            self.cursor -= style.leading;
        }
    }

    fn image(&mut self, photo: &PhotoAsset, width: f32, height: f32) -> Result<(), RenderError> {
        let decoded = printpdf::image_crate::load_from_memory(photo.bytes())
            .map_err(|err| RenderError::Image(err.to_string()))?;
        // Alpha channels would need a soft mask; flatten to RGB.
        let rgb = printpdf::image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());
        let (px_w, px_h) = photo.dimensions();
        let (px_w, px_h) = (px_w.max(1) as f32, px_h.max(1) as f32);

        self.reserve(height);
        let bottom = self.cursor - height;
        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(self.setup.margin_left)),
                translate_y: Some(mm(bottom)),
                scale_x: Some(width / px_w),
                scale_y: Some(height / px_h),
                rotate: None,
                dpi: Some(72.0),
            },
        );
        self.cursor = bottom;
        Ok(())
    }

    fn table(&mut self, table: &Table) {
        let [label_w, value_w] = table.column_widths;
        let pad = table.padding;
        let x0 = self.setup.margin_left;
        let x1 = x0 + label_w;

        for row in &table.rows {
            let cells = [
                (&row.label, &table.label_style, x0, label_w),
                (&row.value, &table.value_style, x1, value_w),
            ];
            let wrapped: Vec<Vec<Line>> = cells
                .iter()
                .map(|(text, cell, _, width)| {
                    let runs = [Run {
                        text: text.to_string(),
                        weight: cell.weight,
                    }];
                    metrics::wrap(&runs, table.font_size, width - pad.left - pad.right)
                })
                .collect();
            let tallest = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
            self.reserve(tallest as f32 * table.leading + pad.top + pad.bottom);

            // A row taller than the page continues on the next one, with the
            // grid and label fill repeated around the remaining lines.
            let mut pending: Vec<&[Line]> = wrapped.iter().map(Vec::as_slice).collect();
            loop {
                let remaining = pending.iter().map(|lines| lines.len()).max().unwrap_or(0);
                let room = self.cursor - self.setup.margin_bottom - pad.top - pad.bottom;
                let fits = ((room / table.leading).floor().max(0.0) as usize).max(1);
                let take = remaining.min(fits);
                let chunk: Vec<&[Line]> = pending
                    .iter()
                    .map(|&lines| &lines[..take.min(lines.len())])
                    .collect();
                self.row_segment(table, &cells, &chunk, take.max(1));
                pending = pending
                    .into_iter()
                    .map(|lines| &lines[take.min(lines.len())..])
                    .collect();
                if pending.iter().all(|lines| lines.is_empty()) {
                    break;
                }
                self.new_page();
            }
        }
        self.layer.set_fill_color(color(BLACK));
    }

    /// Draws `line_count` line slots of one row at the cursor, each cell's
    /// lines centred vertically, and moves the cursor below the row.
    fn row_segment(
        &mut self,
        table: &Table,
        cells: &[(&String, &CellStyle, f32, f32); 2],
        chunk: &[&[Line]],
        line_count: usize,
    ) {
        let pad = table.padding;
        let style = TextStyle {
            font_size: table.font_size,
            leading: table.leading,
            align: Align::Left,
        };
        let content_h = line_count as f32 * table.leading;
        let row_h = content_h + pad.top + pad.bottom;
        let top = self.cursor;
        let bottom = top - row_h;

        for ((_, cell, x, width), lines) in cells.iter().zip(chunk) {
            self.cell(cell, *x, *width, bottom, row_h);
            let block_h = lines.len() as f32 * table.leading;
            let text_top = top - pad.top - (content_h - block_h) / 2.0;
            let inner = width - pad.left - pad.right;
            self.layer.set_fill_color(color(cell.color));
            for (idx, line) in lines.iter().enumerate() {
                let line_top = text_top - table.leading * idx as f32;
                self.line(line, &style, x + pad.left, inner, line_top, false);
            }
        }
        for (_, _, x, width) in cells {
            self.stroke_rect(*x, bottom, *width, row_h, table.grid_color, table.grid_width);
        }
        self.cursor = bottom;
    }

    fn cell(&self, cell: &CellStyle, x: f32, width: f32, bottom: f32, height: f32) {
        if let Some(background) = cell.background {
            self.fill_rect(x, bottom, width, height, background);
        }
    }
}

/// Lays the blocks out top to bottom, breaking pages as needed, and returns
/// the serialized document.
pub fn render_blocks(
    blocks: &[Block<'_>],
    title: &str,
    setup: &PageSetup,
) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) =
        PdfDocument::new(title, mm(setup.width), mm(setup.height), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| RenderError::Font {
            font: "Helvetica",
            message: err.to_string(),
        })?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| RenderError::Font {
            font: "Helvetica-Bold",
            message: err.to_string(),
        })?;

    let mut canvas = Canvas {
        doc: &doc,
        setup: *setup,
        layer: doc.get_page(page).get_layer(layer),
        pages: 1,
        cursor: setup.height - setup.margin_top,
        regular,
        bold,
    };

    for block in blocks {
        match block {
            Block::Paragraph { runs, style } => canvas.paragraph(runs, style),
            Block::Spacer { height } => canvas.cursor -= height,
            Block::Image {
                photo,
                width,
                height,
            } => canvas.image(photo, *width, *height)?,
            Block::Table(table) => canvas.table(table),
        }
    }
    drop(canvas);

    let mut buffer = Vec::new();
    {
        let mut writer = std::io::BufWriter::new(&mut buffer);
        doc.save(&mut writer)
            .map_err(|err| RenderError::Save(err.to_string()))?;
    }
    Ok(buffer)
}
