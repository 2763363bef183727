use std::sync::Arc;

use crate::config::AppConfig;
use crate::directory::Directory;
use crate::transfer::composer::LetterSettings;
use crate::transfer::TransferOrderService;

/// Shared application state handed to every handler.
pub struct AppState {
    pub directory: Arc<Directory>,
    pub transfers: TransferOrderService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let directory = Arc::new(Directory::seeded());
        let transfers = TransferOrderService::new(
            directory.clone(),
            config.letter_settings(),
            config.export_dir.clone(),
        );
        Self {
            directory,
            transfers,
        }
    }

    /// State around a given directory, with default wording and no spooling.
    pub fn with_directory(directory: Directory) -> Self {
        let directory = Arc::new(directory);
        Self {
            transfers: TransferOrderService::new(
                directory.clone(),
                LetterSettings::default(),
                None,
            ),
            directory,
        }
    }
}
