//! Text measurement and line breaking for the builtin Helvetica faces.

use super::layout::{Run, Weight};

// Advance widths from the Adobe core font metrics, in 1/1000 em, for the
// printable ASCII range ' '..='~'.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_ADVANCE: u16 = 556;

fn char_advance(ch: char, weight: Weight) -> u16 {
    let table = match weight {
        Weight::Regular => &HELVETICA,
        Weight::Bold => &HELVETICA_BOLD,
    };
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_ADVANCE
    }
}

/// Width of `text` in points.
pub fn text_width(text: &str, font_size: f32, weight: Weight) -> f32 {
    let units: u32 = text.chars().map(|ch| char_advance(ch, weight) as u32).sum();
    units as f32 * font_size / 1000.0
}

pub fn space_width(font_size: f32) -> f32 {
    text_width(" ", font_size, Weight::Regular)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub weight: Weight,
    pub width: f32,
}

/// A run of non-space characters, possibly mixing weights ("998877" + ".").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Word {
    pub fragments: Vec<Fragment>,
    pub width: f32,
}

impl Word {
    fn push(&mut self, ch: char, weight: Weight, font_size: f32) {
        let advance = char_advance(ch, weight) as f32 * font_size / 1000.0;
        match self.fragments.last_mut() {
            Some(last) if last.weight == weight => {
                last.text.push(ch);
                last.width += advance;
            }
            _ => self.fragments.push(Fragment {
                text: ch.to_string(),
                weight,
                width: advance,
            }),
        }
        self.width += advance;
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|frag| frag.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub words: Vec<Word>,
    /// Natural width with single spaces between words.
    pub width: f32,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(Word::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Splits styled runs into words; whitespace of any kind separates words.
pub fn words(runs: &[Run], font_size: f32) -> Vec<Word> {
    let mut out = Vec::new();
    let mut current = Word::default();
    for run in runs {
        for ch in run.text.chars() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            } else {
                current.push(ch, run.weight, font_size);
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Greedy line breaking. Words wider than `max_width` are broken between
/// characters so that OCR junk without spaces still fits its column.
pub fn wrap(runs: &[Run], font_size: f32, max_width: f32) -> Vec<Line> {
    let space = space_width(font_size);
    let mut lines = Vec::new();
    let mut line = Line::default();

    for word in words(runs, font_size) {
        for piece in split_oversized(word, font_size, max_width) {
            let needed = if line.words.is_empty() {
                piece.width
            } else {
                line.width + space + piece.width
            };
            if needed > max_width && !line.words.is_empty() {
                lines.push(std::mem::take(&mut line));
                line.width = piece.width;
            } else {
                line.width = needed;
            }
            line.words.push(piece);
        }
    }
    if !line.words.is_empty() {
        lines.push(line);
    }
    lines
}

fn split_oversized(word: Word, font_size: f32, max_width: f32) -> Vec<Word> {
    if word.width <= max_width {
        return vec![word];
    }
    let mut pieces = Vec::new();
    let mut current = Word::default();
    for fragment in word.fragments {
        for ch in fragment.text.chars() {
            let advance = char_advance(ch, fragment.weight) as f32 * font_size / 1000.0;
            if !current.is_empty() && current.width + advance > max_width {
                pieces.push(std::mem::take(&mut current));
            }
            current.push(ch, fragment.weight, font_size);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
