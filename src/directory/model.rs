use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::transfer::validation::{validate_rib, ValidationError};

/// A validated 24-digit bank account identifier.
///
/// Every path that produces a `Rib`, deserialization included, goes through
/// [`Rib::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rib(String);

impl Rib {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_rib(&value, "rib")?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Rib {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Rib> for String {
    fn from(rib: Rib) -> Self {
        rib.0
    }
}

impl fmt::Display for Rib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Letterhead stationery attached to a payer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letterhead {
    pub name: String,
    pub pdf: Vec<u8>,
}

/// A payer account ("donneur d'ordre").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub id: String,
    pub company_name: String,
    pub rib: Rib,
    pub bank_address: String,
    pub signatory_name: String,
    pub letterhead: Option<Letterhead>,
}

/// A transfer beneficiary (supplier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Beneficiary {
    pub id: String,
    pub name: String,
    #[schema(value_type = String, example = "164787000215400030054321")]
    pub rib: Rib,
}

/// Public view of a payer account; letterhead bytes are never sent back.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub company_name: String,
    pub rib: String,
    pub bank_address: String,
    pub signatory_name: String,
    pub letterhead: Option<String>,
}

impl From<&BankAccount> for AccountSummary {
    fn from(account: &BankAccount) -> Self {
        Self {
            id: account.id.clone(),
            company_name: account.company_name.clone(),
            rib: account.rib.to_string(),
            bank_address: account.bank_address.clone(),
            signatory_name: account.signatory_name.clone(),
            letterhead: account.letterhead.as_ref().map(|l| l.name.clone()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub company_name: String,
    #[schema(example = "007787000215400030054744")]
    pub rib: String,
    pub bank_address: String,
    pub signatory_name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub company_name: Option<String>,
    pub rib: Option<String>,
    pub bank_address: Option<String>,
    pub signatory_name: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UploadLetterheadRequest {
    /// Display name of the uploaded file
    pub name: String,
    /// Base64 PDF content, with or without a `data:` URL prefix
    pub data: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub rib: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SupplierQuery {
    pub search: Option<String>,
}
