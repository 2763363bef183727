//! The body of a transfer order letter, shared by both composers.
//!
//! Lines are drawn from the top down with an explicit [`Cursor`] value:
//! each drawing step takes the current cursor and returns the next one.

use super::canvas::{Canvas, TextStyle};
use super::fonts::FontFace;
use super::ComposeError;
use crate::transfer::wrap::wrap_text;
use crate::transfer::TransferOrderRequest;

pub const FONT_SIZE: f32 = 11.0;
pub const LINE_HEIGHT: f32 = 18.0;
/// Label column, from the block origin.
pub const LABEL_INDENT: f32 = 20.0;
/// Value column, from the block origin.
pub const VALUE_OFFSET: f32 = 140.0;

pub const SIGNATURE_LABEL: &str = "Cachet et Signature";

/// Baseline position of the next line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f32,
}

impl Cursor {
    pub const fn at(y: f32) -> Self {
        Self { y }
    }

    /// Move down by `lines` line heights.
    pub fn down(self, lines: f32) -> Self {
        self.down_by(lines * LINE_HEIGHT)
    }

    /// Move down by `points`.
    pub fn down_by(self, points: f32) -> Self {
        Self {
            y: self.y - points,
        }
    }
}

/// One entry of the letter body.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockLine {
    Heading(String),
    Text(String),
    /// Label in the label column, value (wrapped) in the value column.
    Field { label: &'static str, value: String },
    /// Vertical space, in line heights.
    Gap(f32),
}

/// Where and how the body is drawn on a given page.
#[derive(Debug, Clone, Copy)]
pub struct BlockStyle {
    pub origin_x: f32,
    /// Nothing may be drawn right of this x.
    pub right_limit: f32,
    /// Lowest baseline the body may use.
    pub floor_y: f32,
    pub value_face: FontFace,
}

/// A stack of lines flush against `right_x`, such as the date or the
/// signatory. Lines are wrapped so that none starts left of `left_x`.
#[derive(Debug, Clone, Copy)]
pub struct RightBlock {
    pub right_x: f32,
    pub left_x: f32,
    /// Baseline distance between two lines.
    pub step: f32,
    /// Lowest baseline the block may use.
    pub floor_y: f32,
}

impl RightBlock {
    /// Draw each entry of `texts` in turn, wrapping as needed, starting at
    /// `cursor`. Returns the cursor below the last line.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        texts: &[&str],
        style: TextStyle,
        cursor: Cursor,
    ) -> Result<Cursor, ComposeError> {
        let available = self.right_x - self.left_x;
        let mut cursor = cursor;
        for text in texts {
            for part in wrap_text(text, &style.face, style.size, available) {
                below_floor(cursor, self.floor_y)?;
                ensure_fits(&part, style, available)?;
                canvas.text_right(&part, self.right_x, cursor.y, style);
                cursor = cursor.down_by(self.step);
            }
        }
        Ok(cursor)
    }
}

/// The letter body for `request`, in reading order.
pub fn letter_body(request: &TransferOrderRequest) -> Vec<BlockLine> {
    use BlockLine::*;

    vec![
        Heading(format!("Objet : {}", request.transfer_type())),
        Gap(1.5),
        Text("Madame, Monsieur,".to_string()),
        Gap(1.0),
        Text(format!(
            "Par le débit de notre compte N° {}, ouvert à vos livres",
            request.payer.rib
        )),
        Text(format!(
            "d'{}, nous vous demandons",
            request.payer.bank_address
        )),
        Text("d'effectuer un virement en faveur de :".to_string()),
        Gap(1.0),
        Field {
            label: "Titulaire :",
            value: request.beneficiary.name.clone(),
        },
        Field {
            label: "RIB :",
            value: request.beneficiary.rib.to_string(),
        },
        Gap(1.0),
        Field {
            label: "Montant en chiffres :",
            value: request.amount_in_figures(),
        },
        Field {
            label: "Montant en lettres :",
            value: format!("{}.", request.amount_in_words()),
        },
        Gap(1.0),
        Field {
            label: "Motif :",
            value: request.purpose.clone(),
        },
    ]
}

/// "Fait à <city>, le dd/mm/yyyy".
pub fn date_line(request: &TransferOrderRequest, city: &str) -> String {
    format!("Fait à {}, le {}", city, request.issued_on_label())
}

/// Draw `lines` starting at `cursor`; returns the cursor below the body.
pub fn draw_body(
    canvas: &mut Canvas,
    lines: &[BlockLine],
    style: &BlockStyle,
    cursor: Cursor,
) -> Result<Cursor, ComposeError> {
    lines
        .iter()
        .try_fold(cursor, |cursor, line| draw_line(canvas, line, style, cursor))
}

fn draw_line(
    canvas: &mut Canvas,
    line: &BlockLine,
    style: &BlockStyle,
    cursor: Cursor,
) -> Result<Cursor, ComposeError> {
    let regular = TextStyle::new(FontFace::Regular, FONT_SIZE);

    match line {
        BlockLine::Gap(lines) => Ok(cursor.down(*lines)),
        BlockLine::Heading(text) => {
            ensure_above_floor(cursor, style)?;
            let heading = TextStyle::new(FontFace::Bold, FONT_SIZE + 1.0);
            ensure_fits(text, heading, style.right_limit - style.origin_x)?;
            canvas.text(text, style.origin_x, cursor.y, heading);
            Ok(cursor.down(1.0))
        }
        BlockLine::Text(text) => {
            let max_width = style.right_limit - style.origin_x;
            let wrapped = wrap_text(text, &regular.face, regular.size, max_width);
            wrapped.iter().try_fold(cursor, |cursor, part| {
                ensure_above_floor(cursor, style)?;
                ensure_fits(part, regular, max_width)?;
                canvas.text(part, style.origin_x, cursor.y, regular);
                Ok(cursor.down(1.0))
            })
        }
        BlockLine::Field { label, value } => {
            ensure_above_floor(cursor, style)?;
            canvas.text(label, style.origin_x + LABEL_INDENT, cursor.y, regular);

            let value_x = style.origin_x + VALUE_OFFSET;
            let value_style = TextStyle::new(style.value_face, FONT_SIZE);
            let value_width = style.right_limit - value_x;
            let wrapped = wrap_text(value, &value_style.face, value_style.size, value_width);

            // The first value line shares the label's baseline.
            let mut cursor = cursor;
            for (index, part) in wrapped.iter().enumerate() {
                if index > 0 {
                    cursor = cursor.down(1.0);
                    ensure_above_floor(cursor, style)?;
                }
                ensure_fits(part, value_style, value_width)?;
                canvas.text(part, value_x, cursor.y, value_style);
            }
            Ok(cursor.down(1.0))
        }
    }
}

fn ensure_above_floor(cursor: Cursor, style: &BlockStyle) -> Result<(), ComposeError> {
    below_floor(cursor, style.floor_y)
}

fn below_floor(cursor: Cursor, floor: f32) -> Result<(), ComposeError> {
    if cursor.y < floor {
        return Err(ComposeError::LayoutOverflow { y: cursor.y, floor });
    }
    Ok(())
}

/// A single word wider than the column is left on its own line by the
/// wrapper; it still may not cross the margins.
fn ensure_fits(text: &str, style: TextStyle, available: f32) -> Result<(), ComposeError> {
    let width = style.width(text);
    if width > available {
        return Err(ComposeError::LineTooWide { width, available });
    }
    Ok(())
}
