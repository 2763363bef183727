//! Hands a finished letter over: as an HTTP attachment and, optionally,
//! as a file in a spool directory.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::HttpResponse;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::ComposedDocument;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write spooled document: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to move spooled document into place: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("spool task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// `ordre_virement_<name>.pdf`, with each whitespace run in `name` replaced
/// by a single underscore.
pub fn export_filename(beneficiary_name: &str) -> String {
    format!(
        "ordre_virement_{}.pdf",
        WHITESPACE_RUN.replace_all(beneficiary_name, "_")
    )
}

/// A document ready to be downloaded.
#[derive(Debug)]
pub struct ExportedFile {
    pub filename: String,
    pub pdf: Vec<u8>,
}

impl From<ComposedDocument> for ExportedFile {
    fn from(document: ComposedDocument) -> Self {
        Self {
            filename: document.filename,
            pdf: document.pdf,
        }
    }
}

impl ExportedFile {
    /// `200 application/pdf` with the file as an attachment.
    pub fn into_response(self) -> HttpResponse {
        let disposition = ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(self.filename)],
        };
        HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(disposition)
            .body(self.pdf)
    }

    /// Write a copy into `dir`. The bytes go to a temporary file in the same
    /// directory first, so a reader never sees a partial document; the
    /// temporary file is removed if anything fails.
    ///
    /// The on-disk name is the attachment name made safe for the file
    /// system, so a beneficiary name can never point outside `dir`.
    pub async fn spool_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let dir = dir.to_path_buf();
        let target = dir.join(sanitize_filename::sanitize(&self.filename));
        let pdf = self.pdf.clone();

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
            std::fs::create_dir_all(&dir)?;
            let mut file = NamedTempFile::new_in(&dir)?;
            file.write_all(&pdf)?;
            file.as_file().sync_all()?;
            file.persist(&target)?;
            Ok(target)
        })
        .await??;

        log::info!("Transfer order spooled to {}", path.display());
        Ok(path)
    }
}
