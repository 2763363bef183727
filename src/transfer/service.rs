//! Runs one transfer order generation from form input to exported file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::assembler::{assemble, RawTransferOrder, TransferOrderInput};
use super::composer::{ComposeError, Composer, ComposerKind, LetterSettings};
use super::export::{ExportError, ExportedFile};
use super::validation::ValidationError;
use crate::directory::Directory;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a transfer order is already being generated")]
    Busy,
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Holds the busy flag for the duration of one generation.
#[derive(Debug)]
pub struct GenerationGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Generates transfer orders, at most one at a time.
pub struct TransferOrderService {
    directory: Arc<Directory>,
    settings: LetterSettings,
    export_dir: Option<PathBuf>,
    busy: AtomicBool,
}

impl TransferOrderService {
    pub fn new(
        directory: Arc<Directory>,
        settings: LetterSettings,
        export_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            directory,
            settings,
            export_dir,
            busy: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the busy flag, or fail with [`TransferError::Busy`] when a
    /// generation is already running. The flag is released when the guard
    /// is dropped.
    pub fn try_begin(&self) -> Result<GenerationGuard<'_>, TransferError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TransferError::Busy)?;
        Ok(GenerationGuard { busy: &self.busy })
    }

    /// Resolve the form's ids against the directory. Unknown ids count as
    /// nothing selected.
    pub fn resolve(&self, input: TransferOrderInput) -> RawTransferOrder {
        RawTransferOrder {
            payer: self.directory.account(input.payer_account_id.trim()),
            beneficiary: self.directory.supplier(input.beneficiary_id.trim()),
            amount: input.amount,
            purpose: input.purpose,
            express: input.express,
            issued_on: input.date,
            ..Default::default()
        }
    }

    pub async fn generate(&self, input: TransferOrderInput) -> Result<ExportedFile, TransferError> {
        let _guard = self.try_begin()?;

        let request = assemble(self.resolve(input)).map_err(|e| {
            log::warn!("Transfer order rejected: {}", e);
            e
        })?;

        let composer = ComposerKind::select(&request, &self.settings);
        let variant = composer.variant();
        let document = composer.compose(&request).await.map_err(|e| {
            log::error!("Failed to compose transfer order ({}): {}", variant, e);
            e
        })?;

        log::info!(
            "Transfer order composed with {} for '{}' ({} bytes)",
            document.variant,
            request.beneficiary.name,
            document.pdf.len()
        );

        let file = ExportedFile::from(document);
        if let Some(dir) = &self.export_dir {
            file.spool_to(dir).await.map_err(|e| {
                log::error!("Failed to spool {}: {}", file.filename, e);
                e
            })?;
        }
        Ok(file)
    }
}
