//! Contact inquiries: local ledger plus the optional mail-relay uplink.
//!
//! Every accepted inquiry is appended to a local JSON ledger first; the relay
//! call is best-effort on top of that, so an unreachable backend never loses
//! the inquiry itself.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{LedgerError, RelayError, ValidationError};

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// File name of the inquiry ledger inside the storage directory.
pub const INQUIRY_LEDGER_FILENAME: &str = "axiom_inquiry_ledger.json";

const MAX_MESSAGE_LEN: usize = 5_000;

/// A validated, sanitized contact inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub id: String,
    pub company: String,
    pub email: String,
    pub message: String,
    /// Submission time, epoch milliseconds.
    pub timestamp: i64,
}

impl ContactInquiry {
    /// Validates and sanitizes a raw submission, minting a `REQ-XXXXXX` id.
    pub fn new(company: &str, email: &str, message: &str) -> Result<Self, ValidationError> {
        let company = sanitize(company);
        let email = email.trim().to_string();
        let message = sanitize(message);

        if company.is_empty() {
            return Err(ValidationError::MissingCompany);
        }
        if !is_plausible_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ValidationError::MessageTooLong {
                limit: MAX_MESSAGE_LEN,
            });
        }

        Ok(Self {
            id: generate_inquiry_id(),
            company,
            email,
            message,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }
}

/// Mints a `REQ-XXXXXX` identifier.
fn generate_inquiry_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("REQ-{}", &raw[..6])
}

/// Drops angle-bracketed tag content and collapses surrounding whitespace.
/// Inquiries end up in emails and the ledger file; markup is never meaningful.
pub(crate) fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Append-only inquiry record with JSON persistence.
#[derive(Debug)]
pub struct InquiryLedger {
    inquiries: RwLock<Vec<ContactInquiry>>,
    ledger_path: Option<PathBuf>,
}

impl InquiryLedger {
    pub fn in_memory() -> Self {
        Self {
            inquiries: RwLock::new(Vec::new()),
            ledger_path: None,
        }
    }

    /// Opens (or initializes) the ledger rooted at `storage_dir`.
    pub fn open(storage_dir: &Path) -> Result<Self, LedgerError> {
        fs::create_dir_all(storage_dir).map_err(|e| LedgerError::Io {
            path: storage_dir.to_path_buf(),
            source: e,
        })?;

        let path = storage_dir.join(INQUIRY_LEDGER_FILENAME);
        let inquiries: Vec<ContactInquiry> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| LedgerError::Corrupt {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(LedgerError::Io {
                    path: path.clone(),
                    source: e,
                });
            }
        };

        Ok(Self {
            inquiries: RwLock::new(inquiries),
            ledger_path: Some(path),
        })
    }

    pub fn append(&self, inquiry: ContactInquiry) -> Result<(), LedgerError> {
        let mut inquiries = self.inquiries.write();
        inquiries.push(inquiry);
        self.persist(&inquiries)
    }

    /// All recorded inquiries, oldest first.
    pub fn list(&self) -> Vec<ContactInquiry> {
        self.inquiries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inquiries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inquiries.read().is_empty()
    }

    fn persist(&self, inquiries: &[ContactInquiry]) -> Result<(), LedgerError> {
        let Some(path) = &self.ledger_path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(inquiries)?;
        fs::write(path, bytes).map_err(|e| LedgerError::Io {
            path: path.clone(),
            source: e,
        })
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    company: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct RelayErrorBody {
    error: String,
}

/// HTTP uplink to the mail-relay backend (`POST {base}/api/contact`).
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Forwards an inquiry to the relay. A non-2xx response surfaces the
    /// backend's own `error` text verbatim.
    #[instrument(skip_all, fields(inquiry_id = %inquiry.id))]
    pub async fn forward(&self, inquiry: &ContactInquiry) -> Result<(), RelayError> {
        let url = format!("{}/api/contact", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .json(&RelayRequest {
                company: &inquiry.company,
                email: &inquiry.email,
                message: &inquiry.message,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("inquiry relayed");
            return Ok(());
        }

        let message = match response.json::<RelayErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("relay returned status {status}"),
        };

        Err(RelayError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
