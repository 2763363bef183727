mod common;

use lopdf::Document;
use ordre_virement_server::transfer::composer::template::{MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use ordre_virement_server::transfer::composer::{
    ComposeError, Composer, ComposerKind, LetterSettings, OverlayComposer, TemplateComposer,
};
use ordre_virement_server::transfer::{ComposerVariant, TransferOrderRequest};

#[tokio::test]
async fn test_overlay_on_letterhead_succeeds() {
    let composer = OverlayComposer::new(common::a4_letterhead(), LetterSettings::default());
    let document = composer.compose(&common::request(None)).await.unwrap();

    assert!(!document.pdf.is_empty());
    assert_eq!(document.variant, ComposerVariant::Overlay);

    let text = common::first_page_text(&document.pdf);
    // letterhead content survives, then the letter is drawn over it
    assert!(text.contains("ENTETE 1"));
    assert!(text.contains("Services Beta SARL"));
    assert!(text.contains("164787000215400030054321"));
    assert!(text.contains("Cachet et Signature"));
}

#[tokio::test]
async fn test_overlay_keeps_first_page_only() {
    let letterhead = common::letterhead_pdf(3, 595, 842);
    let composer = OverlayComposer::new(letterhead, LetterSettings::default());
    let document = composer.compose(&common::request(None)).await.unwrap();

    let output = Document::load_mem(&document.pdf).unwrap();
    assert_eq!(output.get_pages().len(), 1);
    let text = common::first_page_text(&document.pdf);
    assert!(text.contains("ENTETE 1"));
    assert!(!text.contains("ENTETE 2"));
}

#[tokio::test]
async fn test_overlay_rejects_empty_and_garbage_bytes() {
    for bytes in [Vec::new(), b"garbage bytes".to_vec(), b"%PDF-1.7 truncated".to_vec()] {
        let composer = OverlayComposer::new(bytes, LetterSettings::default());
        let error = composer.compose(&common::request(None)).await.unwrap_err();
        assert!(error.is_malformed_letterhead(), "unexpected error: {error}");
    }
}

#[tokio::test]
async fn test_overlay_letter_size_letterhead() {
    let letterhead = common::letterhead_pdf(1, 612, 792);
    let composer = OverlayComposer::new(letterhead, LetterSettings::default());
    assert!(composer.compose(&common::request(None)).await.is_ok());
}

#[tokio::test]
async fn test_template_contains_title_and_organization() {
    let settings = LetterSettings {
        city: "Rabat".to_string(),
        organization: "ATLAS HOLDING".to_string(),
    };
    let document = TemplateComposer::new(settings)
        .compose(&common::request(None))
        .await
        .unwrap();

    let text = common::first_page_text(&document.pdf);
    assert!(text.contains("ORDRE DE VIREMENT BANCAIRE"));
    assert!(text.contains("ATLAS HOLDING"));
    assert!(text.contains("Page 1 sur 1"));
    assert!(text.contains("Rabat, le 07/03/2025"));
}

#[tokio::test]
async fn test_express_order_heading() {
    let mut request = common::request(None);
    request.express = true;
    let document = TemplateComposer::new(LetterSettings::default())
        .compose(&request)
        .await
        .unwrap();
    assert!(common::first_page_text(&document.pdf).contains("Virement bancaire EXPRESS"));
}

#[tokio::test]
async fn test_kind_follows_letterhead_presence() {
    let settings = LetterSettings::default();

    let with_letterhead = common::request(Some(common::a4_letterhead()));
    let kind = ComposerKind::select(&with_letterhead, &settings);
    let document = kind.compose(&with_letterhead).await.unwrap();
    assert_eq!(document.variant, ComposerVariant::Overlay);

    let without = common::request(None);
    let document = ComposerKind::select(&without, &settings)
        .compose(&without)
        .await
        .unwrap();
    assert_eq!(document.variant, ComposerVariant::Template);
    assert_eq!(document.filename, "ordre_virement_Services_Beta_SARL.pdf");
}

#[tokio::test]
async fn test_content_block_overflow_is_reported() {
    let mut request = common::request(Some(common::a4_letterhead()));
    request.purpose = "prestation ".repeat(400);
    let kind = ComposerKind::select(&request, &LetterSettings::default());
    assert!(matches!(
        kind.compose(&request).await,
        Err(ComposeError::LayoutOverflow { .. })
    ));
}

const LONG_ADDRESS: &str = "Banque Centrale Populaire, Agence Entreprises Maarif, \
                            101 Boulevard Zerktouni, Immeuble Zénith, 20330 Casablanca";
const LONG_SIGNATORY: &str =
    "Mohammed Amine El Alaoui Benjelloun, Directeur Administratif et Financier";
const LONG_BENEFICIARY: &str =
    "Société Générale de Transports et de Logistique du Grand Casablanca SARL";

fn long_request(letterhead: Option<Vec<u8>>) -> TransferOrderRequest {
    let mut request = common::request(letterhead);
    request.payer.bank_address = LONG_ADDRESS.to_string();
    request.payer.signatory_name = LONG_SIGNATORY.to_string();
    request.beneficiary.name = LONG_BENEFICIARY.to_string();
    request
}

/// Every piece of letter text starts at or right of `left` and ends at or
/// left of `right`.
fn assert_between_margins(pdf: &[u8], left: f32, right: f32, height: f32) {
    let placed = common::placed_text(pdf);
    assert!(!placed.is_empty());
    for piece in placed {
        assert!(piece.x >= left - 0.05, "{piece:?} starts left of {left}");
        assert!(piece.x + piece.width <= right + 0.05, "{piece:?} ends right of {right}");
        assert!(piece.y > 0.0 && piece.y < height, "{piece:?} is off the page");
    }
}

#[tokio::test]
async fn test_template_text_stays_between_margins() {
    let long_settings = LetterSettings {
        city: "Casablanca".to_string(),
        organization: "SOCIETE MAROCAINE DE DISTRIBUTION ET DE LOGISTIQUE ALIMENTAIRE".to_string(),
    };
    let cases = [
        (LetterSettings::default(), common::request(None)),
        (long_settings, long_request(None)),
    ];

    for (settings, request) in cases {
        let document = TemplateComposer::new(settings).compose(&request).await.unwrap();
        assert_between_margins(&document.pdf, MARGIN, PAGE_WIDTH - MARGIN, PAGE_HEIGHT);

        let text = common::first_page_text(&document.pdf);
        assert!(text.contains("Page 1 sur 1"));
    }
}

#[tokio::test]
async fn test_overlay_text_stays_between_margins() {
    let cm = 28.3465;
    for (width, height) in [(595, 842), (612, 792)] {
        let letterhead = common::letterhead_pdf(1, width, height);
        let right = width as f32 - cm;
        for request in [
            common::request(Some(letterhead.clone())),
            long_request(Some(letterhead.clone())),
        ] {
            let composer = OverlayComposer::new(letterhead.clone(), LetterSettings::default());
            let document = composer.compose(&request).await.unwrap();
            assert_between_margins(&document.pdf, 5.5 * cm, right, height as f32);
        }
    }
}

#[tokio::test]
async fn test_long_bank_address_is_wrapped_not_clipped() {
    let request = long_request(None);
    let document = TemplateComposer::new(LetterSettings::default())
        .compose(&request)
        .await
        .unwrap();

    // The address no longer fits on one line, yet every word is printed.
    let placed = common::placed_text(&document.pdf);
    let address_lines: Vec<&str> = placed
        .iter()
        .filter(|piece| piece.y < 200.0 && piece.y > 130.0)
        .map(|piece| piece.text.as_str())
        .collect();
    assert!(address_lines.len() >= 3, "{address_lines:?}");
    for word in LONG_ADDRESS.split(' ') {
        assert!(
            address_lines.iter().any(|line| line.contains(word)),
            "{word} missing from {address_lines:?}"
        );
    }
}
