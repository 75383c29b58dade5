use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use codebrain_core::{CodeBrainConfig, HttpApiClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything a command needs: the effective configuration and how to print.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: CodeBrainConfig,
    pub format: OutputFormat,
}

impl CliContext {
    pub fn new(config: CodeBrainConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn client(&self) -> Result<HttpApiClient> {
        Ok(HttpApiClient::new(&self.config.api)?)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn format_date(&self, at: &DateTime<Utc>) -> String {
        at.format(&self.config.display.datetime_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_client_uses_config() {
        let mut config = CodeBrainConfig::default();
        config.api.base_url = "http://codebrain.internal:9000/".to_string();
        let ctx = CliContext::new(config, OutputFormat::Text);

        let client = ctx.client().unwrap();
        assert_eq!(client.base_url(), "http://codebrain.internal:9000/api/v1");
        assert!(!ctx.is_json());
    }

    #[test]
    fn test_format_date() {
        let ctx = CliContext::new(CodeBrainConfig::default(), OutputFormat::Json);
        let at = DateTime::parse_from_rfc3339("2024-05-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(ctx.format_date(&at), "2024-05-01");
    }
}
