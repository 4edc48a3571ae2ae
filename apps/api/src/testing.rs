//! In-memory collaborators and fixtures shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::Config;
use crate::mailer::{MailError, Mailer, MessageId, Notifier};
use crate::models::application::{
    ApplicationSubmission, NewCandidature, Position, ResumeFile,
};
use crate::repository::CandidatureRepository;
use crate::storage::{ResumeStore, StorageError};
use crate::submission::pipeline::SubmissionPipeline;

pub const PUBLIC_BASE: &str = "https://cdn.test/candidatures";
pub const RECRUITING: &str = "rh@example.com";

pub fn config() -> Config {
    Config {
        database_url: "postgres://localhost/intake_test".to_string(),
        s3_bucket: "candidatures".to_string(),
        s3_endpoint: "https://cdn.test".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_public_base_url: PUBLIC_BASE.to_string(),
        s3_public_acl: true,
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        max_resume_bytes: 5 * 1024 * 1024,
        company_name: "Sunshine Beauty & Spa".to_string(),
        mail: None,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn pdf_bytes(len: usize) -> Bytes {
    let mut data = b"%PDF-1.7\n".to_vec();
    data.resize(len.max(data.len()), b'0');
    Bytes::from(data)
}

pub fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        last_name: "Diop".to_string(),
        first_name: "Awa".to_string(),
        email: "awa@example.com".to_string(),
        phone: "771234567".to_string(),
        position: Position::Hairdresser,
        city: "Dakar".to_string(),
        district: String::new(),
        cover_message: String::new(),
        resume: ResumeFile {
            file_name: "cv-awa.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: pdf_bytes(2 * 1024 * 1024),
        },
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<StoredObject>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::Upload {
                key: key.to_string(),
                message: "bucket unreachable".to_string(),
            });
        }
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        });
        Ok(format!("{PUBLIC_BASE}/{key}"))
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<Vec<(Uuid, NewCandidature)>>,
    fail: bool,
}

impl MemoryRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<NewCandidature> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|(_, row)| row.clone())
            .collect()
    }
}

#[async_trait]
impl CandidatureRepository for MemoryRepository {
    async fn insert(&self, candidature: &NewCandidature) -> Result<Uuid, sqlx::Error> {
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push((id, candidature.clone()));
        Ok(id)
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every attempt; when `fail` is set each attempt is counted and
/// then rejected.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<MessageId, MailError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailError::Api {
                status: 503,
                message: "provider down".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(format!("msg-{n}"))
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub repository: Arc<MemoryRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub pipeline: Arc<SubmissionPipeline>,
}

pub fn harness(
    store: MemoryStore,
    repository: MemoryRepository,
    mailer: RecordingMailer,
) -> Harness {
    let store = Arc::new(store);
    let repository = Arc::new(repository);
    let mailer = Arc::new(mailer);
    let pipeline = Arc::new(SubmissionPipeline::new(
        store.clone(),
        repository.clone(),
        Notifier::new(mailer.clone(), RECRUITING.to_string()),
        "Sunshine Beauty & Spa".to_string(),
    ));
    Harness {
        store,
        repository,
        mailer,
        pipeline,
    }
}

pub fn healthy_harness() -> Harness {
    harness(
        MemoryStore::default(),
        MemoryRepository::default(),
        RecordingMailer::default(),
    )
}
