//! Template composer: a branded A4 page built from nothing, used when the
//! payer has no letterhead.

use async_trait::async_trait;
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::canvas::{Canvas, Rgb, TextStyle};
use super::fonts::FontFace;
use super::letter::{
    date_line, draw_body, letter_body, BlockStyle, Cursor, RightBlock, FONT_SIZE, LINE_HEIGHT,
    SIGNATURE_LABEL,
};
use super::{ComposeError, Composer, LetterSettings};
use crate::transfer::export::export_filename;
use crate::transfer::{ComposedDocument, ComposerVariant, TransferOrderRequest};
use chrono::Datelike;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 50.0;
pub const TITLE: &str = "ORDRE DE VIREMENT BANCAIRE";

const PRIMARY: Rgb = Rgb(0.05, 0.2, 0.45);
const SECONDARY: Rgb = Rgb(0.3, 0.3, 0.3);
const RULE: Rgb = Rgb(0.85, 0.85, 0.85);

const DATE_Y: f32 = 180.0;
/// Baseline distance inside the date and signatory blocks.
const CLOSING_STEP: f32 = 15.0;
const SIGNATURE_Y: f32 = 120.0;
const SIGNATURE_LINE_WIDTH: f32 = 220.0;
const FOOTER_Y: f32 = 70.0;

/// Lightning bolt outline on a 24 unit grid, y pointing down.
const BOLT: [(f32, f32); 6] = [
    (13.0, 10.0),
    (13.0, 3.0),
    (4.0, 14.0),
    (11.0, 14.0),
    (11.0, 21.0),
    (20.0, 10.0),
];
const BOLT_SCALE: f32 = 1.5;
const ORGANIZATION_X: f32 = 90.0;
const PAGE_LABEL: &str = "Page 1 sur 1";

#[derive(Debug)]
pub struct TemplateComposer {
    settings: LetterSettings,
}

impl TemplateComposer {
    pub fn new(settings: LetterSettings) -> Self {
        Self { settings }
    }

    fn draw_header(&self, canvas: &mut Canvas) -> f32 {
        let bolt_top = PAGE_HEIGHT - 55.0;
        let bolt: Vec<(f32, f32)> = BOLT
            .iter()
            .map(|(x, y)| (MARGIN + x * BOLT_SCALE, bolt_top - y * BOLT_SCALE))
            .collect();
        canvas.fill_polygon(&bolt, PRIMARY);

        let organization = &self.settings.organization;
        canvas.text(
            organization,
            ORGANIZATION_X,
            PAGE_HEIGHT - 50.0,
            TextStyle::new(FontFace::Bold, 20.0)
                .color(PRIMARY)
                .fitted(organization, PAGE_WIDTH - MARGIN - ORGANIZATION_X),
        );

        let divider_y = PAGE_HEIGHT - 90.0;
        canvas.line((MARGIN, divider_y), (PAGE_WIDTH - MARGIN, divider_y), 1.0, RULE);

        let title_y = PAGE_HEIGHT - 140.0;
        canvas.text_centered(
            TITLE,
            PAGE_WIDTH / 2.0,
            title_y,
            TextStyle::new(FontFace::Bold, 18.0).color(PRIMARY),
        );
        title_y
    }

    fn draw_closing(
        &self,
        canvas: &mut Canvas,
        request: &TransferOrderRequest,
    ) -> Result<(), ComposeError> {
        let right_x = PAGE_WIDTH - MARGIN;
        let small = TextStyle::new(FontFace::Regular, 10.0).color(SECONDARY);

        // Date and bank address, kept clear of the signature label.
        let dated = RightBlock {
            right_x,
            left_x: MARGIN,
            step: CLOSING_STEP,
            floor_y: SIGNATURE_Y + CLOSING_STEP,
        };
        let date = date_line(request, &self.settings.city);
        dated.draw(
            canvas,
            &[date.as_str(), request.payer.bank_address.as_str()],
            small,
            Cursor::at(DATE_Y),
        )?;

        canvas.text_right(
            SIGNATURE_LABEL,
            right_x,
            SIGNATURE_Y,
            TextStyle::new(FontFace::Regular, FONT_SIZE),
        );
        canvas.line(
            (right_x - SIGNATURE_LINE_WIDTH, SIGNATURE_Y - 10.0),
            (right_x, SIGNATURE_Y - 10.0),
            1.0,
            SECONDARY,
        );

        let signed = RightBlock {
            floor_y: FOOTER_Y + 10.0,
            ..dated
        };
        signed.draw(
            canvas,
            &[request.payer.signatory_name.as_str()],
            TextStyle::new(FontFace::Bold, FONT_SIZE + 1.0),
            Cursor::at(SIGNATURE_Y - 25.0),
        )?;
        Ok(())
    }

    fn draw_footer(&self, canvas: &mut Canvas, request: &TransferOrderRequest) {
        canvas.line((MARGIN, FOOTER_Y), (PAGE_WIDTH - MARGIN, FOOTER_Y), 0.5, RULE);

        let footer = TextStyle::new(FontFace::Regular, 9.0).color(SECONDARY);
        canvas.text_right(PAGE_LABEL, PAGE_WIDTH - MARGIN, 50.0, footer);

        let copyright = copyright_line(&self.settings.organization, request.issued_on.year());
        let room = PAGE_WIDTH - 2.0 * MARGIN - footer.width(PAGE_LABEL) - 10.0;
        canvas.text(&copyright, MARGIN, 50.0, footer.fitted(&copyright, room));
    }

    fn draw(&self, request: &TransferOrderRequest) -> Result<Canvas, ComposeError> {
        let mut canvas = Canvas::new();
        let title_y = self.draw_header(&mut canvas);

        let style = BlockStyle {
            origin_x: MARGIN,
            right_limit: PAGE_WIDTH - MARGIN,
            floor_y: DATE_Y + LINE_HEIGHT,
            value_face: FontFace::Bold,
        };
        draw_body(
            &mut canvas,
            &letter_body(request),
            &style,
            Cursor::at(title_y - 70.0),
        )?;

        self.draw_closing(&mut canvas, request)?;
        self.draw_footer(&mut canvas, request);
        Ok(canvas)
    }

    /// Single-page document around `content`.
    fn build_document(&self, content: Vec<u8>) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in FontFace::ALL {
            fonts.set(face.resource_name(), doc.add_object(face.dictionary()));
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => Object::Integer(1),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(TITLE.as_bytes().to_vec(), StringFormat::Literal),
            "Producer" => Object::String(
                self.settings.organization.as_bytes().to_vec(),
                StringFormat::Literal,
            ),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc
    }
}

#[async_trait]
impl Composer for TemplateComposer {
    async fn compose(
        &self,
        request: &TransferOrderRequest,
    ) -> Result<ComposedDocument, ComposeError> {
        let canvas = self.draw(request)?;
        tokio::task::yield_now().await;

        let mut doc = self.build_document(canvas.encode()?);
        doc.compress();
        tokio::task::yield_now().await;

        let mut pdf = Vec::new();
        doc.save_to(&mut pdf)?;

        Ok(ComposedDocument {
            filename: export_filename(&request.beneficiary.name),
            pdf,
            variant: ComposerVariant::Template,
        })
    }
}

/// "<ORG>. Tous droits réservés © <year>."
pub fn copyright_line(organization: &str, year: i32) -> String {
    format!("{}. Tous droits réservés © {}.", organization, year)
}
