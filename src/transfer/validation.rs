//! Input validation for transfer orders and bank identifiers.
//!
//! Errors carry a French, user-facing message plus an optional hint, and are
//! reported one at a time: the first failed check wins.

use std::fmt;

/// Number of digits in a Moroccan RIB.
pub const RIB_LENGTH: usize = 24;

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message in French
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for empty required field
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} est obligatoire", label)).with_suggestion(format!(
            "Veuillez renseigner {}",
            label.to_lowercase()
        ))
    }

    /// Create error for a selection that was not made
    pub fn not_selected(field: &str, label: &str) -> Self {
        Self::new(field, format!("Aucun {} sélectionné", label))
            .with_suggestion(format!("Choisissez un {} dans la liste", label))
    }

    /// Create error for invalid RIB format
    pub fn invalid_rib(field: &str) -> Self {
        Self::new(field, "Le RIB doit contenir exactement 24 chiffres")
            .with_suggestion("Exemple : 007787000215400030054744")
    }

    /// Create error for an amount that is missing, unparseable or not positive
    pub fn invalid_amount(field: &str, value: &str) -> Self {
        Self::new(
            field,
            format!("Le montant '{}' n'est pas un nombre strictement positif", value),
        )
        .with_suggestion("Saisissez un montant supérieur à zéro, par exemple 1500.00")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field, label));
    }
    Ok(())
}

/// Validate RIB format (24 ASCII digits, nothing else)
pub fn validate_rib(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.len() != RIB_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid_rib(field));
    }
    Ok(())
}
