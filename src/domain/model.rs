use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Fields recovered from a filename. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_of_entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccd_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_time: Option<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.port_of_entry.is_none()
            && self.ccd_num.is_none()
            && self.trans_num.is_none()
            && self.eta_date.is_none()
            && self.eta_time.is_none()
    }
}

/// Which parsing strategy produced the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", content = "fields", rename_all = "lowercase")]
pub enum FilenameMatch {
    Strict(ExtractedFields),
    Fallback(ExtractedFields),
}

impl FilenameMatch {
    pub fn fields(&self) -> &ExtractedFields {
        match self {
            FilenameMatch::Strict(fields) | FilenameMatch::Fallback(fields) => fields,
        }
    }

    pub fn into_fields(self) -> ExtractedFields {
        match self {
            FilenameMatch::Strict(fields) | FilenameMatch::Fallback(fields) => fields,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, FilenameMatch::Strict(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file handed to the drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub source: FileSource,
}

impl DroppedFile {
    /// Uses the final path component as the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes),
        }
    }
}

/// Input identifiers, in the order the page lays them out.
pub const TEXT_FIELDS: [&str; 5] = [
    "trans_num",
    "ccd_num",
    "port_of_entry",
    "eta_date",
    "eta_time",
];

pub const FILE_FIELD: &str = "userfile";

/// The upload form. Empty strings are unset inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub trans_num: String,
    pub ccd_num: String,
    pub port_of_entry: String,
    pub eta_date: String,
    pub eta_time: String,
    pub userfile: Option<DroppedFile>,
}

impl UploadForm {
    /// Writes every extracted field into its input. Fields that were not
    /// extracted keep whatever the input already holds.
    pub fn apply(&mut self, fields: &ExtractedFields) {
        let targets = [
            (&fields.trans_num, &mut self.trans_num),
            (&fields.ccd_num, &mut self.ccd_num),
            (&fields.port_of_entry, &mut self.port_of_entry),
            (&fields.eta_date, &mut self.eta_date),
            (&fields.eta_time, &mut self.eta_time),
        ];
        for (value, input) in targets {
            if let Some(value) = value {
                input.clone_from(value);
            }
        }
    }

    pub fn has_any_value(&self) -> bool {
        self.text_fields().iter().any(|(_, value)| !value.is_empty())
    }

    /// `(field name, value)` pairs for the text inputs, in page order.
    pub fn text_fields(&self) -> [(&'static str, &str); 5] {
        [
            (TEXT_FIELDS[0], self.trans_num.as_str()),
            (TEXT_FIELDS[1], self.ccd_num.as_str()),
            (TEXT_FIELDS[2], self.port_of_entry.as_str()),
            (TEXT_FIELDS[3], self.eta_date.as_str()),
            (TEXT_FIELDS[4], self.eta_time.as_str()),
        ]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Server-side validation errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, Vec<FieldError>>);

impl FieldErrors {
    /// All messages for each field, concatenated in the order the server sent them.
    pub fn concatenated(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.0.iter().map(|(field, errors)| {
            let joined = errors.iter().fold(String::new(), |mut acc, e| {
                acc.push_str(&e.message);
                acc
            });
            (field.as_str(), joined)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success(String),
    Rejected(FieldErrors),
}

/// Decoded value of the CSRF cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
