use crate::config::toml_config::AssistConfig;
use crate::config::{CliConfig, SubmitArgs};
use crate::domain::model::UploadForm;
use crate::utils::error::Result;
use crate::utils::validation::{validate_optional_date, validate_optional_time, Validate};

/// Settings file first, then command-line flags on top.
pub fn resolve_config(cli: &CliConfig) -> Result<AssistConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading settings from {}", path.display());
            AssistConfig::from_file(path)?
        }
        None => AssistConfig::default(),
    };

    if let Some(policy) = cli.token_policy {
        config.extract.token_policy = policy;
    }

    if let crate::config::Command::Submit(args) = &cli.command {
        if let Some(endpoint) = &args.endpoint {
            config.submit.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = args.timeout {
            config.submit.timeout_seconds = Some(timeout);
        }
    }

    config.validate()?;
    Ok(config)
}

impl SubmitArgs {
    /// Values given on the command line win over what the filename produced.
    pub fn apply_overrides(&self, form: &mut UploadForm) -> Result<()> {
        let overrides = [
            (&self.trans_num, &mut form.trans_num),
            (&self.ccd_num, &mut form.ccd_num),
            (&self.port_of_entry, &mut form.port_of_entry),
            (&self.eta_date, &mut form.eta_date),
            (&self.eta_time, &mut form.eta_time),
        ];
        for (value, input) in overrides {
            if let Some(value) = value {
                input.clone_from(value);
            }
        }

        validate_optional_date("eta_date", &form.eta_date)?;
        validate_optional_time("eta_time", &form.eta_time)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Command;
    use crate::core::extractor::TokenPolicy;
    use clap::Parser;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "upload-assist",
            "--token-policy",
            "first-wins",
            "submit",
            "doc.pdf",
            "--endpoint",
            "http://localhost:8000/upload/",
            "--timeout",
            "15",
        ]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.extract.token_policy, TokenPolicy::FirstWins);
        assert_eq!(config.require_endpoint().unwrap(), "http://localhost:8000/upload/");
        assert_eq!(config.submit.timeout_seconds, Some(15));
    }

    #[test]
    fn test_bad_endpoint_fails_validation() {
        let cli = CliConfig::parse_from([
            "upload-assist",
            "submit",
            "doc.pdf",
            "--endpoint",
            "not a url",
        ]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_overrides_replace_extracted_values() {
        let cli = CliConfig::parse_from([
            "upload-assist",
            "submit",
            "doc.pdf",
            "--ccd-num",
            "CCD99999",
            "--eta-time",
            "08:45",
        ]);
        let Command::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        let mut form = UploadForm {
            ccd_num: "FROMNAME1".to_string(),
            eta_date: "2023-06-15".to_string(),
            ..Default::default()
        };

        args.apply_overrides(&mut form).unwrap();

        assert_eq!(form.ccd_num, "CCD99999");
        assert_eq!(form.eta_date, "2023-06-15");
        assert_eq!(form.eta_time, "08:45");
    }

    #[test]
    fn test_overrides_reject_malformed_date() {
        let cli = CliConfig::parse_from([
            "upload-assist",
            "submit",
            "doc.pdf",
            "--eta-date",
            "15/06/2023",
        ]);
        let Command::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert!(args.apply_overrides(&mut UploadForm::default()).is_err());
    }
}
