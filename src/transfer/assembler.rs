//! Turns a raw form submission into a [`TransferOrderRequest`].

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;

use super::numerals::round_to_cents;
use super::validation::{validate_required, ValidationError};
use super::{Currency, TransferOrderRequest};
use crate::directory::model::{BankAccount, Beneficiary};

/// Amounts at or above this bound are refused (1 000 000 milliards).
const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Transfer order form as submitted by the client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferOrderInput {
    #[serde(default)]
    pub payer_account_id: String,
    #[serde(default)]
    pub beneficiary_id: String,
    /// Decimal amount as typed, "." or "," as separator
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub express: bool,
    /// Issue date, defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Form fields after the payer and beneficiary ids were looked up.
#[derive(Debug, Clone, Default)]
pub struct RawTransferOrder {
    pub payer: Option<BankAccount>,
    pub beneficiary: Option<Beneficiary>,
    pub amount: String,
    pub currency: Currency,
    pub purpose: String,
    pub express: bool,
    pub issued_on: Option<NaiveDate>,
}

/// Validate `raw`, stopping at the first failed check.
///
/// Checks run in order: payer selected, beneficiary selected, amount strictly
/// positive, purpose non-empty.
pub fn assemble(raw: RawTransferOrder) -> Result<TransferOrderRequest, ValidationError> {
    let payer = raw
        .payer
        .ok_or_else(|| ValidationError::not_selected("payerAccountId", "compte donneur d'ordre"))?;
    let beneficiary = raw
        .beneficiary
        .ok_or_else(|| ValidationError::not_selected("beneficiaryId", "fournisseur"))?;
    let amount = parse_amount(&raw.amount)?;
    validate_required(&raw.purpose, "purpose", "Le motif")?;

    Ok(TransferOrderRequest {
        payer,
        beneficiary,
        amount,
        currency: raw.currency,
        purpose: raw.purpose.trim().to_string(),
        express: raw.express,
        issued_on: raw.issued_on.unwrap_or_else(|| Local::now().date_naive()),
    })
}

/// Parse a strictly positive amount, accepting a decimal comma.
///
/// The result is rounded to whole cents; an amount that rounds to zero is
/// refused.
pub fn parse_amount(value: &str) -> Result<Decimal, ValidationError> {
    let normalized = value.trim().replace(',', ".");
    let invalid = || ValidationError::invalid_amount("amount", value);

    let amount = Decimal::from_str(&normalized)
        .map(round_to_cents)
        .map_err(|_| invalid())?;
    if amount <= Decimal::ZERO || amount >= Decimal::from(MAX_AMOUNT) {
        return Err(invalid());
    }
    Ok(amount)
}
