//! Overlay composer: writes the letter onto the payer's own letterhead.

use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::canvas::{Canvas, TextStyle, BLACK};
use super::fonts::FontFace;
use super::letter::{
    date_line, draw_body, letter_body, BlockStyle, Cursor, RightBlock, FONT_SIZE, LINE_HEIGHT,
    SIGNATURE_LABEL,
};
use super::{ComposeError, Composer, LetterSettings, CM_TO_POINTS};
use crate::transfer::export::export_filename;
use crate::transfer::{ComposedDocument, ComposerVariant, TransferOrderRequest};

const LEFT_MARGIN: f32 = 5.5 * CM_TO_POINTS;
const RIGHT_MARGIN: f32 = 1.0 * CM_TO_POINTS;
const DATE_FROM_TOP: f32 = 5.0 * CM_TO_POINTS;
const SIGNATURE_FROM_BOTTOM: f32 = 7.0 * CM_TO_POINTS;
const SIGNATURE_LINE_WIDTH: f32 = 200.0;
/// Gap between the date line and the first body line.
const BODY_OFFSET: f32 = 80.0;
/// Baseline distance inside the date and signatory blocks.
const CLOSING_STEP: f32 = 15.0;
const BOTTOM_MARGIN: f32 = 1.0 * CM_TO_POINTS;

/// Visible page area, from the MediaBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    fn right(&self) -> f32 {
        self.left + self.width
    }

    fn top(&self) -> f32 {
        self.bottom + self.height
    }
}

#[derive(Debug)]
pub struct OverlayComposer {
    letterhead: Vec<u8>,
    settings: LetterSettings,
}

impl OverlayComposer {
    pub fn new(letterhead: Vec<u8>, settings: LetterSettings) -> Self {
        Self {
            letterhead,
            settings,
        }
    }

    fn draw(&self, request: &TransferOrderRequest, page: PageBox) -> Result<Canvas, ComposeError> {
        let mut canvas = Canvas::after_saved_state();
        let regular = TextStyle::new(FontFace::Regular, FONT_SIZE);
        let left_x = page.left + LEFT_MARGIN;
        let right_x = page.right() - RIGHT_MARGIN;

        // Date, then the bank address below it, above the body.
        let date_y = page.top() - DATE_FROM_TOP;
        let body_y = date_y - BODY_OFFSET;
        let dated = RightBlock {
            right_x,
            left_x,
            step: CLOSING_STEP,
            floor_y: body_y + LINE_HEIGHT,
        };
        let date = date_line(request, &self.settings.city);
        dated.draw(
            &mut canvas,
            &[date.as_str(), request.payer.bank_address.as_str()],
            regular,
            Cursor::at(date_y),
        )?;

        let signature_y = page.bottom + SIGNATURE_FROM_BOTTOM;
        let style = BlockStyle {
            origin_x: left_x,
            right_limit: right_x,
            floor_y: signature_y + 10.0 + LINE_HEIGHT,
            value_face: FontFace::Regular,
        };
        draw_body(&mut canvas, &letter_body(request), &style, Cursor::at(body_y))?;

        canvas.text_right(SIGNATURE_LABEL, right_x, signature_y + 10.0, regular);
        canvas.line(
            (right_x - SIGNATURE_LINE_WIDTH, signature_y),
            (right_x, signature_y),
            1.0,
            BLACK,
        );
        let signed = RightBlock {
            floor_y: page.bottom + BOTTOM_MARGIN,
            ..dated
        };
        signed.draw(
            &mut canvas,
            &[request.payer.signatory_name.as_str()],
            TextStyle::new(FontFace::Bold, FONT_SIZE + 1.0),
            Cursor::at(signature_y - 15.0),
        )?;

        Ok(canvas)
    }
}

#[async_trait]
impl Composer for OverlayComposer {
    async fn compose(
        &self,
        request: &TransferOrderRequest,
    ) -> Result<ComposedDocument, ComposeError> {
        let mut doc = load_letterhead(&self.letterhead)?;
        tokio::task::yield_now().await;

        let page_id = keep_first_page(&mut doc)?;
        let page = media_box(&doc, page_id)?;
        log::debug!(
            "Letterhead page is {:.1} x {:.1} pt",
            page.width,
            page.height
        );
        register_fonts(&mut doc, page_id)?;
        tokio::task::yield_now().await;

        let canvas = self.draw(request, page)?;
        append_content(&mut doc, page_id, canvas)?;
        tokio::task::yield_now().await;

        doc.compress();
        let mut pdf = Vec::new();
        doc.save_to(&mut pdf)?;

        Ok(ComposedDocument {
            filename: export_filename(&request.beneficiary.name),
            pdf,
            variant: ComposerVariant::Overlay,
        })
    }
}

/// Parse letterhead bytes; any parse failure means the file is corrupt.
pub fn load_letterhead(bytes: &[u8]) -> Result<Document, ComposeError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(ComposeError::MalformedLetterhead(
            "no PDF header found".to_string(),
        ));
    }
    Document::load_mem(bytes).map_err(|e| ComposeError::MalformedLetterhead(e.to_string()))
}

/// Drop every page but the first; returns the first page's id.
fn keep_first_page(doc: &mut Document) -> Result<ObjectId, ComposeError> {
    let pages = doc.get_pages();
    let (&first_number, &page_id) = pages
        .iter()
        .next()
        .ok_or_else(|| ComposeError::MalformedLetterhead("document has no page".to_string()))?;

    let others: Vec<u32> = pages
        .keys()
        .copied()
        .filter(|number| *number != first_number)
        .collect();
    if !others.is_empty() {
        log::info!("Letterhead has {} extra page(s), keeping the first only", others.len());
        doc.delete_pages(&others);
    }
    Ok(page_id)
}

/// Page MediaBox, inherited through the page tree when not set on the page.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<PageBox, ComposeError> {
    let malformed = |reason: &str| ComposeError::MalformedLetterhead(reason.to_string());
    let mut current = Some(page_id);

    while let Some(node_id) = current {
        let node = doc
            .get_dictionary(node_id)
            .map_err(|_| malformed("broken page tree"))?;

        if let Ok(entry) = node.get(b"MediaBox") {
            let entry = match entry {
                Object::Reference(id) => doc.get_object(*id).map_err(|_| malformed("broken MediaBox"))?,
                other => other,
            };
            let values = entry
                .as_array()
                .map_err(|_| malformed("MediaBox is not an array"))?
                .iter()
                .map(Object::as_float)
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|_| malformed("MediaBox holds non-numbers"))?;
            let [x0, y0, x1, y1] = values[..] else {
                return Err(malformed("MediaBox needs four numbers"));
            };
            return Ok(PageBox {
                left: x0.min(x1),
                bottom: y0.min(y1),
                width: (x1 - x0).abs(),
                height: (y1 - y0).abs(),
            });
        }

        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Err(malformed("page has no MediaBox"))
}

/// Resources the page inherits from its ancestors, if any.
fn inherited_resources(doc: &Document, page_id: ObjectId) -> Option<Object> {
    let mut current = doc
        .get_dictionary(page_id)
        .ok()?
        .get(b"Parent")
        .and_then(Object::as_reference)
        .ok();

    while let Some(node_id) = current {
        let node = doc.get_dictionary(node_id).ok()?;
        if let Ok(resources) = node.get(b"Resources") {
            return Some(resources.clone());
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Add our fonts to the page's font resources.
fn register_fonts(doc: &mut Document, page_id: ObjectId) -> Result<(), ComposeError> {
    let font_ids: Vec<(FontFace, ObjectId)> = FontFace::ALL
        .iter()
        .map(|face| (*face, doc.add_object(face.dictionary())))
        .collect();

    // Pin inherited resources on the page before extending them.
    if !doc.get_dictionary(page_id)?.has(b"Resources") {
        if let Some(inherited) = inherited_resources(doc, page_id) {
            let inherited = match inherited {
                Object::Reference(id) => doc.get_object(id)?.clone(),
                other => other,
            };
            doc.get_dictionary_mut(page_id)?.set("Resources", inherited);
        }
    }

    let existing_fonts = doc
        .get_or_create_resources(page_id)?
        .as_dict()?
        .get(b"Font")
        .ok()
        .cloned();

    let fonts: &mut Dictionary = match existing_fonts {
        Some(Object::Reference(id)) => doc.get_object_mut(id)?.as_dict_mut()?,
        Some(Object::Dictionary(_)) => doc
            .get_or_create_resources(page_id)?
            .as_dict_mut()?
            .get_mut(b"Font")?
            .as_dict_mut()?,
        _ => {
            let resources = doc.get_or_create_resources(page_id)?.as_dict_mut()?;
            resources.set("Font", Dictionary::new());
            resources.get_mut(b"Font")?.as_dict_mut()?
        }
    };

    for (face, id) in font_ids {
        fonts.set(face.resource_name(), Object::Reference(id));
    }
    Ok(())
}

/// Wrap the existing page content in q/Q and append the overlay after it.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    canvas: Canvas,
) -> Result<(), ComposeError> {
    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), canvas.encode()?));

    let existing = doc.get_dictionary(page_id)?.get(b"Contents").ok().cloned();
    let mut contents = vec![Object::Reference(save_id)];
    match existing {
        Some(Object::Array(items)) => contents.extend(items),
        Some(Object::Reference(id)) => match doc.get_object(id)? {
            Object::Array(items) => contents.extend(items.iter().cloned()),
            _ => contents.push(Object::Reference(id)),
        },
        Some(Object::Stream(stream)) => contents.push(Object::Reference(doc.add_object(stream))),
        _ => {}
    }
    contents.push(Object::Reference(overlay_id));

    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}
