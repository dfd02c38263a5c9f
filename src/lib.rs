pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::csrf::{csrf_from_cookie_str, fetch_csrf_token};
pub use adapters::http::HttpSubmitter;
pub use config::toml_config::AssistConfig;
pub use core::extractor::{extract, FilenameFieldExtractor, TokenPolicy};
pub use core::page::{display_filename, DropOutcome, UploadPage, View};
pub use domain::model::{
    CsrfToken, DroppedFile, ExtractedFields, FieldError, FieldErrors, FilenameMatch,
    SubmitOutcome, UploadForm,
};
pub use utils::error::{AssistError, Result};
