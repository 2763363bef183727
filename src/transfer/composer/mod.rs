//! Composers - draw a transfer order letter into PDF bytes.
//!
//! Two interchangeable strategies share one [`Composer`] capability:
//! - [`OverlayComposer`] writes onto the first page of the payer's letterhead
//! - [`TemplateComposer`] builds a branded A4 page from scratch
//!
//! [`ComposerKind::select`] picks one per request, based on whether the payer
//! has a letterhead.

pub mod canvas;
pub mod fonts;
pub mod letter;
pub mod overlay;
pub mod template;

pub use overlay::OverlayComposer;
pub use template::TemplateComposer;

use async_trait::async_trait;
use thiserror::Error;

use super::{ComposedDocument, ComposerVariant, TransferOrderRequest};

/// PDF points per centimetre.
pub const CM_TO_POINTS: f32 = 28.3465;

/// Errors that can occur while composing a document.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("letterhead file appears corrupt: {0}")]
    MalformedLetterhead(String),
    #[error("letter body reaches y={y:.1}, below the lowest usable line y={floor:.1}")]
    LayoutOverflow { y: f32, floor: f32 },
    #[error("unbreakable text {width:.1} pt wide does not fit in {available:.1} pt")]
    LineTooWide { width: f32, available: f32 },
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to serialize PDF: {0}")]
    Io(#[from] std::io::Error),
}

impl ComposeError {
    pub fn is_malformed_letterhead(&self) -> bool {
        matches!(self, Self::MalformedLetterhead(_))
    }
}

/// Fixed wording that does not come from the request.
#[derive(Debug, Clone)]
pub struct LetterSettings {
    /// City printed on the date line
    pub city: String,
    /// Organization printed in the template header and footer
    pub organization: String,
}

impl Default for LetterSettings {
    fn default() -> Self {
        Self {
            city: "Casablanca".to_string(),
            organization: "RASMAL GROUP".to_string(),
        }
    }
}

/// Capability shared by every composer.
#[async_trait]
pub trait Composer {
    /// Compose the letter for `request`.
    async fn compose(
        &self,
        request: &TransferOrderRequest,
    ) -> Result<ComposedDocument, ComposeError>;
}

/// The composer chosen for one request.
#[derive(Debug)]
pub enum ComposerKind {
    Overlay(OverlayComposer),
    Template(TemplateComposer),
}

impl ComposerKind {
    /// Overlay when the payer has a letterhead, template otherwise.
    pub fn select(request: &TransferOrderRequest, settings: &LetterSettings) -> Self {
        match &request.payer.letterhead {
            Some(letterhead) => {
                Self::Overlay(OverlayComposer::new(letterhead.pdf.clone(), settings.clone()))
            }
            None => Self::Template(TemplateComposer::new(settings.clone())),
        }
    }

    pub fn variant(&self) -> ComposerVariant {
        match self {
            Self::Overlay(_) => ComposerVariant::Overlay,
            Self::Template(_) => ComposerVariant::Template,
        }
    }
}

#[async_trait]
impl Composer for ComposerKind {
    async fn compose(
        &self,
        request: &TransferOrderRequest,
    ) -> Result<ComposedDocument, ComposeError> {
        match self {
            Self::Overlay(composer) => composer.compose(request).await,
            Self::Template(composer) => composer.compose(request).await,
        }
    }
}
