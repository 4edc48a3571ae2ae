use anyhow::{Context, Result};

const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_MAIL_FROM: &str = "onboarding@resend.dev";
const DEFAULT_COMPANY_NAME: &str = "Sunshine Beauty & Spa";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_public_base_url: String,
    pub s3_public_acl: bool,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub max_resume_bytes: usize,
    pub company_name: String,
    /// `None` disables outbound mail for the lifetime of the process.
    pub mail: Option<MailConfig>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub resend_api_key: String,
    pub from: String,
    pub recruiting_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;
        let s3_bucket = require_env("S3_BUCKET")?;
        let s3_public_base_url = optional_env("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket));

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            s3_public_base_url: s3_public_base_url.trim_end_matches('/').to_string(),
            s3_public_acl: parse_bool(optional_env("S3_PUBLIC_ACL").as_deref(), true)
                .context("S3_PUBLIC_ACL must be true or false")?,
            s3_endpoint,
            s3_bucket,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            max_resume_bytes: optional_env("MAX_RESUME_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_RESUME_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_RESUME_BYTES),
            company_name: optional_env("COMPANY_NAME")
                .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            mail: mail_from_env()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Mail is enabled only when `RESEND_API_KEY` is set; a recruiting address
/// is then mandatory.
fn mail_from_env() -> Result<Option<MailConfig>> {
    let Some(resend_api_key) = optional_env("RESEND_API_KEY") else {
        return Ok(None);
    };
    Ok(Some(MailConfig {
        resend_api_key,
        from: optional_env("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        recruiting_address: require_env("RECRUITING_EMAIL")
            .context("RECRUITING_EMAIL is required when RESEND_API_KEY is set")?,
    }))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank variables are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("invalid boolean '{other}'"),
        },
    }
}
