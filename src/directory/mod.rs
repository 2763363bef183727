//! Payer accounts and beneficiaries.
//!
//! An in-memory directory standing in for the account and supplier
//! management screens. It only hands out records whose RIB already passed
//! validation; records do not survive a restart.

pub mod model;
pub mod routes;
mod seed;


use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::transfer::validation::{validate_required, ValidationError};
use model::{
    BankAccount, Beneficiary, CreateAccountRequest, Letterhead, Rib, UpdateAccountRequest,
};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("account '{0}' not found")]
    AccountNotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("letterhead is not valid base64: {0}")]
    LetterheadEncoding(#[from] base64::DecodeError),
    #[error("letterhead is not a PDF document")]
    LetterheadNotPdf,
}

/// Thread-safe store of accounts and suppliers.
pub struct Directory {
    accounts: RwLock<Vec<BankAccount>>,
    suppliers: RwLock<Vec<Beneficiary>>,
}

impl Directory {
    pub fn new(accounts: Vec<BankAccount>, suppliers: Vec<Beneficiary>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
            suppliers: RwLock::new(suppliers),
        }
    }

    /// Directory pre-filled with the stock accounts and suppliers.
    pub fn seeded() -> Self {
        Self::new(seed::default_accounts(), seed::default_suppliers())
    }

    /// All accounts, ordered by company name.
    pub fn accounts(&self) -> Vec<BankAccount> {
        let mut accounts = self.accounts.read().clone();
        accounts.sort_by(|a, b| a.company_name.cmp(&b.company_name));
        accounts
    }

    pub fn account(&self, id: &str) -> Option<BankAccount> {
        self.accounts.read().iter().find(|a| a.id == id).cloned()
    }

    /// New account without letterhead; every field is required.
    pub fn add_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<BankAccount, DirectoryError> {
        validate_required(&request.company_name, "companyName", "Le nom de la société")?;
        let rib = Rib::parse(request.rib.trim())?;
        validate_required(&request.bank_address, "bankAddress", "L'adresse de la banque")?;
        validate_required(&request.signatory_name, "signatoryName", "Le nom du signataire")?;

        let account = BankAccount {
            id: Uuid::new_v4().to_string(),
            company_name: request.company_name.trim().to_string(),
            rib,
            bank_address: request.bank_address.trim().to_string(),
            signatory_name: request.signatory_name.trim().to_string(),
            letterhead: None,
        };
        self.accounts.write().push(account.clone());
        log::info!("Account '{}' added as {}", account.company_name, account.id);
        Ok(account)
    }

    /// Remove an account along with its letterhead.
    pub fn remove_account(&self, id: &str) -> Result<BankAccount, DirectoryError> {
        let mut accounts = self.accounts.write();
        let index = accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| DirectoryError::AccountNotFound(id.to_string()))?;
        let removed = accounts.remove(index);
        log::info!("Account '{}' removed", removed.company_name);
        Ok(removed)
    }

    pub fn update_account(
        &self,
        id: &str,
        update: UpdateAccountRequest,
    ) -> Result<BankAccount, DirectoryError> {
        // Validate everything before touching the record.
        let rib = update.rib.map(Rib::parse).transpose()?;
        if let Some(name) = &update.company_name {
            validate_required(name, "companyName", "Le nom de la société")?;
        }

        let mut accounts = self.accounts.write();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DirectoryError::AccountNotFound(id.to_string()))?;

        if let Some(company_name) = update.company_name {
            account.company_name = company_name;
        }
        if let Some(rib) = rib {
            account.rib = rib;
        }
        if let Some(bank_address) = update.bank_address {
            account.bank_address = bank_address;
        }
        if let Some(signatory_name) = update.signatory_name {
            account.signatory_name = signatory_name;
        }

        Ok(account.clone())
    }

    /// Attach letterhead stationery given as base64 (optionally a data URL).
    pub fn set_letterhead(
        &self,
        id: &str,
        name: &str,
        encoded: &str,
    ) -> Result<BankAccount, DirectoryError> {
        let pdf = decode_letterhead(encoded)?;
        let name = sanitize_filename::sanitize(name.trim());
        let name = if name.is_empty() {
            "papier-en-tete.pdf".to_string()
        } else {
            name
        };

        let mut accounts = self.accounts.write();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DirectoryError::AccountNotFound(id.to_string()))?;
        log::info!(
            "Letterhead '{}' ({} bytes) attached to account {}",
            name,
            pdf.len(),
            account.id
        );
        account.letterhead = Some(Letterhead { name, pdf });
        Ok(account.clone())
    }

    pub fn clear_letterhead(&self, id: &str) -> Result<BankAccount, DirectoryError> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DirectoryError::AccountNotFound(id.to_string()))?;
        account.letterhead = None;
        Ok(account.clone())
    }

    /// Suppliers whose name contains `search`, case-insensitively.
    pub fn suppliers(&self, search: Option<&str>) -> Vec<Beneficiary> {
        let suppliers = self.suppliers.read();
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                suppliers
                    .iter()
                    .filter(|s| s.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            None => suppliers.clone(),
        }
    }

    pub fn supplier(&self, id: &str) -> Option<Beneficiary> {
        self.suppliers.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn add_supplier(&self, name: &str, rib: &str) -> Result<Beneficiary, DirectoryError> {
        validate_required(name, "name", "Le nom du fournisseur")?;
        let rib = Rib::parse(rib.trim())?;

        let supplier = Beneficiary {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            rib,
        };
        self.suppliers.write().push(supplier.clone());
        log::info!("Supplier '{}' added", supplier.name);
        Ok(supplier)
    }
}

/// Decode an uploaded letterhead and check the PDF signature.
pub fn decode_letterhead(encoded: &str) -> Result<Vec<u8>, DirectoryError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    let bytes = BASE64.decode(payload.trim())?;
    if !bytes.starts_with(b"%PDF") {
        return Err(DirectoryError::LetterheadNotPdf);
    }
    Ok(bytes)
}
