use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Process-wide keyed values that outlive a single page of the UI:
/// the active customer/service identity plus display preferences.
/// Absence of an identity key is a valid "unset" state.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionData {
    customer_id: Option<String>,
    service_id: Option<String>,
    language: String,
    theme: String,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            customer_id: None,
            service_id: None,
            language: "en".into(),
            theme: "light".into(),
        }
    }
}

pub struct SessionStore {
    path: PathBuf,
    data: RwLock<SessionData>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session data from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            SessionData::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn customer_id(&self) -> Option<String> {
        self.data.read().unwrap().customer_id.clone()
    }

    pub fn service_id(&self) -> Option<String> {
        self.data.read().unwrap().service_id.clone()
    }

    pub fn set_customer_id(&self, id: Option<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.customer_id = id;
        self.persist(&guard)
    }

    pub fn set_service_id(&self, id: Option<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.service_id = id;
        self.persist(&guard)
    }

    /// Drops the customer/service identity, keeping display preferences.
    pub fn clear_identity(&self) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.customer_id = None;
        guard.service_id = None;
        self.persist(&guard)
    }

    pub fn language(&self) -> String {
        self.data.read().unwrap().language.clone()
    }

    pub fn set_language(&self, language: String) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.language = language;
        self.persist(&guard)
    }

    pub fn theme(&self) -> String {
        self.data.read().unwrap().theme.clone()
    }

    pub fn set_theme(&self, theme: String) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.theme = theme;
        self.persist(&guard)
    }

    fn persist(&self, data: &SessionData) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write session data to {}", self.path.display()))
    }
}
