//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use ordre_virement_server::directory::model::{BankAccount, Beneficiary, Letterhead, Rib};
use ordre_virement_server::directory::Directory;
use ordre_virement_server::transfer::composer::fonts::FontFace;
use ordre_virement_server::transfer::wrap::TextMeasure;
use ordre_virement_server::transfer::{Currency, TransferOrderRequest};
use rust_decimal::Decimal;

/// A letterhead PDF with `pages` pages. The MediaBox sits on the page tree
/// root so pages inherit it, like many office exports do.
pub fn letterhead_pdf(pages: usize, width: i64, height: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = (0..pages)
        .map(|n| {
            let content = format!("BT /F1 18 Tf 40 {} Td (ENTETE {}) Tj ET", height - 60, n + 1);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn a4_letterhead() -> Vec<u8> {
    letterhead_pdf(1, 595, 842)
}

pub fn payer(letterhead: Option<Vec<u8>>) -> BankAccount {
    BankAccount {
        id: "acc1".to_string(),
        company_name: "AKOR FOODS".to_string(),
        rib: Rib::parse("007787000215400030054744").unwrap(),
        bank_address: "Attijariwafa Bank, 22 Rue de la Paix, 75002 Paris".to_string(),
        signatory_name: "Le Gérant".to_string(),
        letterhead: letterhead.map(|pdf| Letterhead {
            name: "entete.pdf".to_string(),
            pdf,
        }),
    }
}

pub fn beneficiary() -> Beneficiary {
    Beneficiary {
        id: "6".to_string(),
        name: "Services Beta SARL".to_string(),
        rib: Rib::parse("164787000215400030054321").unwrap(),
    }
}

pub fn request(letterhead: Option<Vec<u8>>) -> TransferOrderRequest {
    TransferOrderRequest {
        payer: payer(letterhead),
        beneficiary: beneficiary(),
        amount: Decimal::new(123456, 2),
        currency: Currency::MAD,
        purpose: "Facture #2024-07-A45".to_string(),
        express: false,
        issued_on: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
    }
}

/// Concatenated, decompressed content of the first page.
pub fn first_page_text(pdf: &[u8]) -> String {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    String::from_utf8_lossy(&content).into_owned()
}

/// A piece of text the letter places on the page.
#[derive(Debug)]
pub struct PlacedText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Every text drawn on the first page with one of our own fonts, with its
/// start position and measured width. Text in the letterhead's own fonts is
/// skipped.
pub fn placed_text(pdf: &[u8]) -> Vec<PlacedText> {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    let mut font: Option<(FontFace, f32)> = None;
    let mut position = (0.0, 0.0);
    let mut placed = Vec::new();
    for op in content.operations {
        match op.operator.as_str() {
            "Tf" => {
                let name = op.operands[0].as_name().unwrap();
                font = FontFace::ALL
                    .into_iter()
                    .find(|face| face.resource_name().as_bytes() == name)
                    .map(|face| (face, op.operands[1].as_float().unwrap()));
            }
            "Td" => {
                position = (
                    op.operands[0].as_float().unwrap(),
                    op.operands[1].as_float().unwrap(),
                );
            }
            "Tj" => {
                if let Some((face, size)) = font {
                    // Our strings are WinAnsi; the characters we use map to Latin-1.
                    let text: String = op.operands[0]
                        .as_str()
                        .unwrap()
                        .iter()
                        .map(|byte| *byte as char)
                        .collect();
                    placed.push(PlacedText {
                        width: face.width(&text, size),
                        text,
                        x: position.0,
                        y: position.1,
                    });
                }
            }
            _ => {}
        }
    }
    placed
}

pub fn seeded_directory() -> Directory {
    Directory::seeded()
}
