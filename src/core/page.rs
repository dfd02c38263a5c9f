use crate::core::extractor::FilenameFieldExtractor;
use crate::domain::model::{CsrfToken, DroppedFile, FilenameMatch, SubmitOutcome, UploadForm};
use crate::domain::ports::FormSubmitter;
use crate::utils::error::Result;
use std::collections::BTreeMap;

pub const MULTIPLE_FILES_MESSAGE: &str = "Please upload only one file at a time.";
pub const FIELDS_FILLED_MESSAGE: &str =
    "Fields have been filled based on the filename, please check that they are all correct.";

const FILENAME_DISPLAY_LIMIT: usize = 20;
const FILENAME_DISPLAY_EDGE: usize = 10;

/// Which panel of the page is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Dropbox,
    Fields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was dropped.
    Ignored,
    /// More than one file; the form was left alone.
    Rejected,
    Accepted(FilenameMatch),
}

/// Shortens long names to their first and last ten characters.
pub fn display_filename(filename: &str) -> String {
    let len = filename.chars().count();
    if len <= FILENAME_DISPLAY_LIMIT {
        return filename.to_string();
    }
    let head: String = filename.chars().take(FILENAME_DISPLAY_EDGE).collect();
    let tail: String = filename.chars().skip(len - FILENAME_DISPLAY_EDGE).collect();
    format!("{}...{}", head, tail)
}

/// Headless model of the upload page: drop zone, form, and message slots.
#[derive(Debug, Default)]
pub struct UploadPage {
    extractor: FilenameFieldExtractor,
    form: UploadForm,
    view: View,
    message: String,
    filename_message: String,
    field_messages: BTreeMap<String, String>,
}

impl UploadPage {
    pub fn new(extractor: FilenameFieldExtractor) -> Self {
        Self {
            extractor,
            ..Default::default()
        }
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    /// Direct access for manual edits before submitting.
    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn filename_message(&self) -> &str {
        &self.filename_message
    }

    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.field_messages.get(field).map(String::as_str)
    }

    pub fn handle_drop(&mut self, mut files: Vec<DroppedFile>) -> DropOutcome {
        if files.len() > 1 {
            tracing::warn!("Rejected drop of {} files", files.len());
            self.message = MULTIPLE_FILES_MESSAGE.to_string();
            return DropOutcome::Rejected;
        }
        let Some(file) = files.pop() else {
            return DropOutcome::Ignored;
        };

        self.filename_message = display_filename(&file.name);
        self.show(View::Fields);

        let parsed = self.extractor.classify(&file.name);
        tracing::info!(
            "Parsed '{}' ({})",
            file.name,
            if parsed.is_strict() { "strict" } else { "fallback" }
        );
        self.form.userfile = Some(file);
        self.form.apply(parsed.fields());

        if self.form.has_any_value() {
            self.message = FIELDS_FILLED_MESSAGE.to_string();
        }
        DropOutcome::Accepted(parsed)
    }

    /// Submits the form. Field errors are written into their message slots and
    /// the form is kept; success resets the page and shows the server's text.
    pub async fn submit<S: FormSubmitter + ?Sized>(
        &mut self,
        submitter: &S,
        csrf: Option<&CsrfToken>,
    ) -> Result<SubmitOutcome> {
        self.clear_messages();

        let outcome = submitter.submit(&self.form, csrf).await?;
        match &outcome {
            SubmitOutcome::Rejected(errors) => {
                for (field, text) in errors.concatenated() {
                    tracing::debug!("Field '{}' rejected: {}", field, text);
                    self.field_messages.insert(field.to_string(), text);
                }
            }
            SubmitOutcome::Success(text) => {
                self.reset();
                self.message.clone_from(text);
            }
        }
        Ok(outcome)
    }

    /// "Go back": empty the form and return to the drop zone.
    pub fn reset(&mut self) {
        self.form.reset();
        self.clear_messages();
        self.filename_message.clear();
        self.show(View::Dropbox);
    }

    fn show(&mut self, view: View) {
        self.message.clear();
        self.view = view;
    }

    fn clear_messages(&mut self) {
        self.message.clear();
        self.field_messages.clear();
    }
}
