//! Transfer orders: from a raw form submission to a printable PDF letter.
//!
//! - `assembler` validates the submission into a [`TransferOrderRequest`]
//! - `composer` draws the letter, on a letterhead or on a generated template
//! - `numerals` spells the amount in French
//! - `wrap` keeps long values inside the page margins
//! - `export` names the file and hands the bytes over
//! - `service` runs the whole chain, one generation at a time

pub mod assembler;
pub mod composer;
pub mod export;
pub mod numerals;
pub mod routes;
pub mod service;
pub mod validation;
pub mod wrap;

pub use assembler::{assemble, RawTransferOrder, TransferOrderInput};
pub use composer::{ComposeError, Composer, ComposerKind};
pub use export::{export_filename, ExportError, ExportedFile};
pub use service::{TransferError, TransferOrderService};
pub use validation::ValidationError;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::directory::model::{BankAccount, Beneficiary};

/// Currencies a transfer order can be issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Currency {
    /// Moroccan dirham
    #[default]
    MAD,
}

impl Currency {
    pub const ALL: [Currency; 1] = [Currency::MAD];

    pub const fn code(&self) -> &'static str {
        match self {
            Self::MAD => "MAD",
        }
    }

    /// Noun for the major unit, singular.
    pub const fn main_unit(&self) -> &'static str {
        match self {
            Self::MAD => "dirham",
        }
    }

    /// Noun for the minor unit, singular.
    pub const fn sub_unit(&self) -> &'static str {
        match self {
            Self::MAD => "centime",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated transfer order, ready to be composed.
///
/// Only built by [`assemble`]; composers rely on its fields being valid.
#[derive(Debug, Clone)]
pub struct TransferOrderRequest {
    pub payer: BankAccount,
    pub beneficiary: Beneficiary,
    pub amount: Decimal,
    pub currency: Currency,
    pub purpose: String,
    pub express: bool,
    pub issued_on: NaiveDate,
}

impl TransferOrderRequest {
    /// Amount with two decimals and the currency code, e.g. `1500.00 MAD`.
    ///
    /// Rounded the same way as [`Self::amount_in_words`].
    pub fn amount_in_figures(&self) -> String {
        format!("{:.2} {}", numerals::round_to_cents(self.amount), self.currency)
    }

    pub fn amount_in_words(&self) -> String {
        numerals::amount_to_words(
            self.amount,
            self.currency.main_unit(),
            self.currency.sub_unit(),
        )
    }

    pub fn transfer_type(&self) -> &'static str {
        if self.express {
            "Virement bancaire EXPRESS"
        } else {
            "Virement bancaire"
        }
    }

    pub fn issued_on_label(&self) -> String {
        self.issued_on.format("%d/%m/%Y").to_string()
    }
}

/// Which composer produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposerVariant {
    Overlay,
    Template,
}

impl fmt::Display for ComposerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlay => f.write_str("overlay"),
            Self::Template => f.write_str("template"),
        }
    }
}

/// Bytes of a finished transfer order letter.
#[derive(Debug)]
pub struct ComposedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub variant: ComposerVariant,
}
