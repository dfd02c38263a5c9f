pub mod extractor;
pub mod page;

pub use crate::domain::model::{ExtractedFields, FilenameMatch, SubmitOutcome, UploadForm};
pub use crate::domain::ports::{ConfigProvider, FormSubmitter};
pub use crate::utils::error::Result;
