//! Local user directory and session.
//!
//! Single-tenant auth for the audit console: accounts live in a JSON file
//! next to the trial history, the active session is a single file whose
//! presence means signed in, and passwords are stored as salted blake3
//! digests. There are no tokens and no multi-session bookkeeping.

pub mod error;


pub use error::AuthError;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

/// File name of the user directory inside the storage directory.
pub const USERS_DB_FILENAME: &str = "axiom_users_db.json";

/// File name of the session record; presence means signed in.
pub const SESSION_FILENAME: &str = "axiom_session.json";

const MIN_PASSWORD_LEN: usize = 6;

/// The externally visible slice of an account. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
}

/// On-disk account record. The password is a salted blake3 digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    id: String,
    name: String,
    email: String,
    company: String,
    salt: String,
    password_hash: String,
    /// Registration time, epoch milliseconds.
    created_at: i64,
}

impl UserRecord {
    fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
        }
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Registered accounts, keyed by lowercased email, with JSON persistence.
pub struct UserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
    db_path: Option<PathBuf>,
}

impl UserDirectory {
    /// Creates a directory with no disk persistence.
    pub fn in_memory() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            db_path: None,
        }
    }

    /// Opens (or initializes) the user directory rooted at `storage_dir`.
    pub fn open(storage_dir: &Path) -> Result<Self, AuthError> {
        fs::create_dir_all(storage_dir).map_err(|e| AuthError::Io {
            path: storage_dir.to_path_buf(),
            source: e,
        })?;

        let path = storage_dir.join(USERS_DB_FILENAME);
        let records: Vec<UserRecord> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| AuthError::Corrupt {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AuthError::Io {
                    path: path.clone(),
                    source: e,
                });
            }
        };

        Ok(Self {
            users: RwLock::new(
                records
                    .into_iter()
                    .map(|r| (r.email.to_lowercase(), r))
                    .collect(),
            ),
            db_path: Some(path),
        })
    }

    /// Registers a new account. Emails are unique case-insensitively.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        company: &str,
    ) -> Result<PublicUser, AuthError> {
        let name = name.trim();
        let email = email.trim();
        let company = company.trim();

        if name.is_empty() {
            return Err(AuthError::InvalidName);
        }
        if company.is_empty() {
            return Err(AuthError::InvalidCompany);
        }
        if !is_plausible_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                minimum: MIN_PASSWORD_LEN,
            });
        }

        let key = email.to_lowercase();
        let mut users = self.users.write();
        if users.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            id: format!("USR-{}", &salt[..6].to_uppercase()),
            name: name.to_string(),
            email: email.to_string(),
            company: company.to_string(),
            password_hash: hash_password(&salt, password),
            salt,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        let public = record.public();

        users.insert(key, record);
        self.persist(&users)?;
        info!(user_id = %public.id, "account registered");

        Ok(public)
    }

    /// Verifies credentials and returns the account's public view.
    pub fn login(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let key = email.trim().to_lowercase();
        let users = self.users.read();

        let record = users.get(&key).ok_or(AuthError::UnknownEmail)?;
        if hash_password(&record.salt, password) != record.password_hash {
            return Err(AuthError::WrongPassword);
        }

        Ok(record.public())
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn persist(&self, users: &HashMap<String, UserRecord>) -> Result<(), AuthError> {
        let Some(path) = &self.db_path else {
            return Ok(());
        };

        let mut records: Vec<&UserRecord> = users.values().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let bytes = serde_json::to_vec_pretty(&records)?;
        fs::write(path, bytes).map_err(|e| AuthError::Io {
            path: path.clone(),
            source: e,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// The active session. Signed in iff the session record exists; when a
/// session path is configured, the record also lives on disk and survives
/// restarts.
#[derive(Default)]
pub struct SessionStore {
    current: RwLock<Option<PublicUser>>,
    session_path: Option<PathBuf>,
}

impl SessionStore {
    /// Creates a session with no disk persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the session record rooted at `storage_dir`, restoring a signed-in
    /// user if one was left behind. A corrupt record means signed out.
    pub fn open(storage_dir: &Path) -> Result<Self, AuthError> {
        fs::create_dir_all(storage_dir).map_err(|e| AuthError::Io {
            path: storage_dir.to_path_buf(),
            source: e,
        })?;

        let path = storage_dir.join(SESSION_FILENAME);
        let current = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(_) => None,
        };

        Ok(Self {
            current: RwLock::new(current),
            session_path: Some(path),
        })
    }

    pub fn sign_in(&self, user: PublicUser) -> Result<(), AuthError> {
        let mut current = self.current.write();
        if let Some(path) = &self.session_path {
            let bytes = serde_json::to_vec_pretty(&user)?;
            fs::write(path, bytes).map_err(|e| AuthError::Io {
                path: path.clone(),
                source: e,
            })?;
        }
        *current = Some(user);
        Ok(())
    }

    /// Clears the session. Returns whether anyone was signed in.
    pub fn sign_out(&self) -> Result<bool, AuthError> {
        let mut current = self.current.write();
        if let Some(path) = &self.session_path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AuthError::Io {
                        path: path.clone(),
                        source: e,
                    });
                }
            }
        }
        Ok(current.take().is_some())
    }

    pub fn current_user(&self) -> Option<PublicUser> {
        self.current.read().clone()
    }
}
