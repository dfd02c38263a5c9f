use crate::domain::model::{ExtractedFields, FilenameMatch};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Port, CCD, transaction, an unused 6-digit group, YYYYMMDD, HHMM, then anything.
static STRICT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([0-9]{5})_([0-9]{3})_([a-zA-Z0-9]{5,})_([0-9]{14})_([0-9]{6})_([0-9]{8})_([0-9]{4})",
    )
    .expect("strict filename pattern is valid")
});

// The same separator (or none) must appear between year/month and month/day.
// Separator alternatives come first so they win over the bare form at the same
// position.
const DATE_PATTERN: &str = r"20[0-9]{2}(?:-[0-1][0-9]-[0-3][0-9]|\.[0-1][0-9]\.[0-3][0-9]|_[0-1][0-9]_[0-3][0-9]|[0-1][0-9][0-3][0-9])";

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"));

static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}[-._]?[0-2][0-9]{{3}}", DATE_PATTERN))
        .expect("date-time pattern is valid")
});

/// Which of several qualifying numeric tokens is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TokenPolicy {
    /// Every qualifying token overwrites the previous one.
    #[default]
    LastWins,
    /// The first qualifying token sticks.
    FirstWins,
}

/// Recovers form fields from an uploaded file's name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameFieldExtractor {
    token_policy: TokenPolicy,
}

impl FilenameFieldExtractor {
    pub fn new(token_policy: TokenPolicy) -> Self {
        Self { token_policy }
    }

    pub fn token_policy(&self) -> TokenPolicy {
        self.token_policy
    }

    pub fn extract(&self, filename: &str) -> ExtractedFields {
        self.classify(filename).into_fields()
    }

    /// Tries the strict underscore-delimited layout, then the best-effort
    /// date/time and numeric-token passes.
    pub fn classify(&self, filename: &str) -> FilenameMatch {
        if let Some(fields) = parse_strict(filename) {
            tracing::debug!("Filename '{}' matches the strict layout", filename);
            return FilenameMatch::Strict(fields);
        }

        let mut fields = ExtractedFields::default();
        let (eta_date, eta_time) = date_time_from_filename(filename);
        fields.eta_date = eta_date;
        fields.eta_time = eta_time;
        self.numbers_from_filename(filename, &mut fields);

        tracing::debug!("Filename '{}' parsed by fallback: {:?}", filename, fields);
        FilenameMatch::Fallback(fields)
    }

    fn numbers_from_filename(&self, filename: &str, fields: &mut ExtractedFields) {
        let tokens = filename.split(|c: char| matches!(c, '-' | '_' | '.') || c.is_whitespace());

        for token in tokens.filter(|t| parses_as_integer(t)) {
            // Length in UTF-16 code units, the unit browsers report for names.
            let slot = match token.encode_utf16().count() {
                14 => &mut fields.trans_num,
                3 => &mut fields.port_of_entry,
                _ => continue,
            };

            if slot.is_some() && self.token_policy == TokenPolicy::FirstWins {
                tracing::debug!("Ignoring later numeric token '{}'", token);
                continue;
            }
            if let Some(previous) = slot.as_deref() {
                tracing::debug!("Numeric token '{}' replaces '{}'", token, previous);
            }
            *slot = Some(token.to_string());
        }
    }
}

/// Extracts with the default policy.
pub fn extract(filename: &str) -> ExtractedFields {
    FilenameFieldExtractor::default().extract(filename)
}

// Positions are read from the match's capture groups, not from splitting the
// whole filename, so a prefix like `scan_` does not shift the segments.
fn parse_strict(filename: &str) -> Option<ExtractedFields> {
    let caps = STRICT_RE.captures(filename)?;
    let date = &caps[6];
    let time = &caps[7];

    Some(ExtractedFields {
        port_of_entry: Some(caps[2].to_string()),
        ccd_num: Some(caps[3].to_string()),
        trans_num: Some(caps[4].to_string()),
        eta_date: Some(format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..])),
        eta_time: Some(format!("{}:{}", &time[..2], &time[2..])),
    })
}

fn date_time_from_filename(filename: &str) -> (Option<String>, Option<String>) {
    let eta_date = DATE_RE.find(filename).map(|m| {
        let digits = strip_separators(m.as_str());
        format!("{}-{}-{}", &digits[..4], &digits[4..6], &digits[6..])
    });

    let eta_time = DATE_TIME_RE.find(filename).map(|m| {
        let digits = strip_separators(m.as_str());
        let hhmm = &digits[digits.len() - 4..];
        format!("{}:{}", &hhmm[..2], &hhmm[2..])
    });

    (eta_date, eta_time)
}

// Matches are ASCII by construction, so byte slicing above is safe.
fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '-' | '.' | '_')).collect()
}

/// Integer-prefix parse: an optional sign followed by at least one digit.
/// Trailing non-digits are tolerated, so `12a` counts as numeric.
fn parses_as_integer(token: &str) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    unsigned.starts_with(|c: char| c.is_ascii_digit())
}
