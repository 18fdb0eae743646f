use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

use super::metrics::text_width;

/// Builtin Type1 faces registered on every page, keyed by resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];

    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
        }
    }
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

/// Encode for WinAnsiEncoding: Latin-1 passes through, everything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Accumulates content-stream operators in PDF user space (origin bottom-left, points).
#[derive(Debug, Default)]
pub struct Canvas {
    ops: Vec<Operation>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource_name().into(), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Text whose right edge sits at `right`.
    pub fn text_right(&mut self, font: Font, size: f32, right: f32, y: f32, text: &str) {
        self.text(font, size, right - text_width(text, size), y, text);
    }

    /// Text centred on `center`.
    pub fn text_centered(&mut self, font: Font, size: f32, center: f32, y: f32, text: &str) {
        self.text(font, size, center - text_width(text, size) / 2.0, y, text);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, gray: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("g", vec![real(gray)]),
            Operation::new("re", vec![real(x), real(y), real(w), real(h)]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, gray: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(line_width)]),
            Operation::new("G", vec![real(gray)]),
            Operation::new("re", vec![real(x), real(y), real(w), real(h)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), line_width: f32, gray: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(line_width)]),
            Operation::new("G", vec![real(gray)]),
            Operation::new("m", vec![real(from.0), real(from.1)]),
            Operation::new("l", vec![real(to.0), real(to.1)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn into_content(self) -> Content {
        Content {
            operations: self.ops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(win_ansi("Jane"), b"Jane".to_vec());
        assert_eq!(win_ansi("Jos\u{e9}"), vec![b'J', b'o', b's', 0xE9]);
        assert_eq!(win_ansi("\u{20b9}5"), b"?5".to_vec());
    }

    #[test]
    fn text_emits_one_text_object() {
        let mut canvas = Canvas::new();
        canvas.text(Font::Bold, 12.0, 10.0, 20.0, "Total");
        let ops = canvas.into_content().operations;
        let names: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(names, vec!["BT", "Tf", "Td", "Tj", "ET"]);
        assert!(matches!(&ops[1].operands[0], Object::Name(n) if n == b"F2"));
    }
}
