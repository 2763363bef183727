//! Accumulates PDF content-stream operations for one page.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

use super::fonts::{encode_win_ansi, FontFace};
use crate::transfer::wrap::TextMeasure;

/// Non-stroking/stroking colour, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

impl Rgb {
    fn operands(&self) -> Vec<Object> {
        vec![Object::Real(self.0), Object::Real(self.1), Object::Real(self.2)]
    }
}

/// Text style: face, size and colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32) -> Self {
        Self {
            face,
            size,
            color: BLACK,
        }
    }

    pub const fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn width(&self, text: &str) -> f32 {
        self.face.width(text, self.size)
    }

    /// This style, scaled down if needed so `text` is at most `max_width` wide.
    pub fn fitted(mut self, text: &str, max_width: f32) -> Self {
        let width = self.width(text);
        if width > max_width && width > 0.0 {
            self.size *= max_width / width;
        }
        self
    }
}

#[derive(Debug, Default)]
pub struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas whose first operation restores the graphics state saved in
    /// front of existing page content.
    pub fn after_saved_state() -> Self {
        Self {
            operations: vec![Operation::new("Q", vec![])],
        }
    }

    /// Draw `text` with its baseline starting at (`x`, `y`).
    pub fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", style.color.operands()),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(style.face.resource_name().as_bytes().to_vec()),
                    Object::Real(style.size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Draw `text` so that it ends at `right_x`.
    pub fn text_right(&mut self, text: &str, right_x: f32, y: f32, style: TextStyle) {
        self.text(text, right_x - style.width(text), y, style);
    }

    /// Draw `text` centred on `center_x`.
    pub fn text_centered(&mut self, text: &str, center_x: f32, y: f32, style: TextStyle) {
        self.text(text, center_x - style.width(text) / 2.0, y, style);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Rgb) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", color.operands()),
            Operation::new("w", vec![Object::Real(thickness)]),
            Operation::new("m", vec![Object::Real(from.0), Object::Real(from.1)]),
            Operation::new("l", vec![Object::Real(to.0), Object::Real(to.1)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Fill the closed polygon through `points`.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new("rg", color.operands()));
        self.operations.push(Operation::new(
            "m",
            vec![Object::Real(first.0), Object::Real(first.1)],
        ));
        for point in rest {
            self.operations.push(Operation::new(
                "l",
                vec![Object::Real(point.0), Object::Real(point.1)],
            ));
        }
        self.operations.extend([
            Operation::new("h", vec![]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    #[cfg(test)]
    fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Serialize into content-stream bytes.
    pub fn encode(self) -> Result<Vec<u8>, lopdf::Error> {
        Content {
            operations: self.operations,
        }
        .encode()
    }
}
