//! Stock accounts and suppliers loaded at startup.

use super::model::{BankAccount, Beneficiary, Rib};

const DEFAULT_BANK_ADDRESS: &str = "Attijariwafa Bank, 22 Rue de la Paix, 75002 Paris";
const DEFAULT_SIGNATORY: &str = "Le Gérant";

const ACCOUNTS: [(&str, &str, &str); 6] = [
    ("acc1", "AKOR FOODS", "007787000215400030054744"),
    ("acc2", "MGM FOOD", "007787000215400030054755"),
    ("acc3", "DREAM DONUTS & COFFEE", "007787000215400030054766"),
    ("acc4", "RASMAL GESTION", "007787000215400030054777"),
    ("acc5", "SHOPAL", "007787000215400030054788"),
    ("acc6", "CHICCORNER", "007787000215400030054799"),
];

const SUPPLIERS: [(&str, &str, &str); 3] = [
    ("5", "Fournisseur Alpha", "164787000215400030051234"),
    ("6", "Services Beta SARL", "164787000215400030054321"),
    ("7", "Logistique Gamma", "164787000215400030055678"),
];

pub fn default_accounts() -> Vec<BankAccount> {
    ACCOUNTS
        .iter()
        .filter_map(|(id, company_name, rib)| {
            let rib = Rib::parse(*rib).ok()?;
            Some(BankAccount {
                id: id.to_string(),
                company_name: company_name.to_string(),
                rib,
                bank_address: DEFAULT_BANK_ADDRESS.to_string(),
                signatory_name: DEFAULT_SIGNATORY.to_string(),
                letterhead: None,
            })
        })
        .collect()
}

pub fn default_suppliers() -> Vec<Beneficiary> {
    SUPPLIERS
        .iter()
        .filter_map(|(id, name, rib)| {
            Some(Beneficiary {
                id: id.to_string(),
                name: name.to_string(),
                rib: Rib::parse(*rib).ok()?,
            })
        })
        .collect()
}
