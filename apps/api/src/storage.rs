//! Durable résumé storage.
//!
//! `ResumeStore` is the narrow seam the pipeline talks to; `S3ResumeStore`
//! backs it with any S3-compatible bucket (MinIO locally, AWS in production).

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },
}

/// Writes an object and returns the public URL it can be fetched from.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<String, StorageError>;
}

pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
    public_acl: bool,
}

impl S3ResumeStore {
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "intake-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        // MinIO and most self-hosted stores only serve path-style URLs.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.s3_bucket.clone(),
            public_base_url: config.s3_public_base_url.clone(),
            public_acl: config.s3_public_acl,
        }
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type);
        if self.public_acl {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request.send().await.map_err(|e| StorageError::Upload {
            key: key.to_string(),
            message: aws_sdk_s3::error::DisplayErrorContext(&e).to_string(),
        })?;

        info!("Uploaded résumé to s3://{}/{}", self.bucket, key);
        Ok(public_url(&self.public_base_url, key))
    }
}

/// Object key for an uploaded résumé: `cv/<unix-millis>-<8 hex>-<file name>`.
///
/// The timestamp keeps keys roughly ordered, the random segment keeps two
/// uploads of the same file in the same millisecond apart.
pub fn resume_key(now: DateTime<Utc>, file_name: &str) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "cv/{}-{}-{}",
        now.timestamp_millis(),
        &nonce[..8],
        sanitize_file_name(file_name)
    )
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `-`.
pub fn sanitize_file_name(file_name: &str) -> String {
    // Browsers on Windows may send the full client path.
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "cv".to_string()
    } else {
        cleaned
    }
}

/// Content type to store when the browser did not send a usable one.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

pub fn extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
