//! Direct (in-process) persistence.
//!
//! [`FileStore`] keeps documents, settings and users-permissions records as
//! JSON files in one directory and implements every store trait from
//! [`crate::contract`]. [`DirectPublisher`] adapts any [`DocumentStore`] to the
//! [`Publisher`] interface used by the import driver.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

use crate::contract::{
    DocumentStore, Permission, PermissionStore, PublishedDocument, Publisher, Role,
    SettingsScope, SettingsStore, StoredDocument,
};
use crate::document::Document;
use crate::error::{PublishError, StoreError};

const DOCUMENTS_FILE: &str = "documents.json";
const SETTINGS_FILE: &str = "settings.json";
const PERMISSIONS_FILE: &str = "permissions.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DocumentsFile {
    next_id: i64,
    collections: BTreeMap<String, Vec<StoredDocument>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingEntry {
    scope: SettingsScope,
    key: String,
    value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    entries: Vec<SettingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PermissionsFile {
    next_permission_id: i64,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
}

impl Default for PermissionsFile {
    /// A fresh deployment has the two built-in roles and no permissions.
    fn default() -> Self {
        Self {
            next_permission_id: 1,
            roles: vec![
                Role {
                    id: 1,
                    name: "Authenticated".to_string(),
                    role_type: "authenticated".to_string(),
                },
                Role {
                    id: 2,
                    name: "Public".to_string(),
                    role_type: "public".to_string(),
                },
            ],
            permissions: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct State {
    documents: DocumentsFile,
    settings: SettingsFile,
    permissions: PermissionsFile,
}

/// JSON-file backed store rooted at a directory. Every mutation is flushed,
/// and only applied in memory once the flush succeeded.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    state: Mutex<State>,
}

impl FileStore {
    /// Opens the store at `dir`, creating the directory and empty files as needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        let state = State {
            documents: load_or_default(&dir.join(DOCUMENTS_FILE))?,
            settings: load_or_default(&dir.join(SETTINGS_FILE))?,
            permissions: load_or_default(&dir.join(PERMISSIONS_FILE))?,
        };
        info!(
            store_dir = %dir.display(),
            collections = state.documents.collections.len(),
            settings = state.settings.entries.len(),
            permissions = state.permissions.permissions.len(),
            "Opened file store"
        );
        Ok(Self {
            dir,
            state: Mutex::new(state),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }

    fn flush<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let json = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to flush store file");
            io_error(&path, e)
        })?;
        debug!(path = %path.display(), "Flushed store file");
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&raw).map_err(|e| {
        error!(error = %e, path = %path.display(), "Store file is not valid JSON");
        StoreError::Corrupt {
            path: path.display().to_string(),
            source: e,
        }
    })
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn create_document(
        &self,
        uid: &str,
        data: Map<String, Value>,
    ) -> Result<StoredDocument, StoreError> {
        let mut state = self.lock()?;
        let mut documents = state.documents.clone();
        documents.next_id += 1;
        let stored = StoredDocument {
            id: documents.next_id,
            document_id: uuid::Uuid::new_v4().simple().to_string(),
            data,
        };
        documents
            .collections
            .entry(uid.to_string())
            .or_default()
            .push(stored.clone());
        self.flush(DOCUMENTS_FILE, &documents)?;
        state.documents = documents;
        Ok(stored)
    }

    async fn count_documents(&self, uid: &str) -> Result<usize, StoreError> {
        let state = self.lock()?;
        Ok(state.documents.collections.get(uid).map_or(0, Vec::len))
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn get_setting(
        &self,
        scope: &SettingsScope,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .settings
            .entries
            .iter()
            .find(|e| &e.scope == scope && e.key == key)
            .map(|e| e.value.clone()))
    }

    async fn set_setting(
        &self,
        scope: &SettingsScope,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut settings = state.settings.clone();
        match settings
            .entries
            .iter_mut()
            .find(|e| &e.scope == scope && e.key == key)
        {
            Some(entry) => entry.value = value,
            None => settings.entries.push(SettingEntry {
                scope: scope.clone(),
                key: key.to_string(),
                value,
            }),
        }
        self.flush(SETTINGS_FILE, &settings)?;
        state.settings = settings;
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for FileStore {
    async fn find_role_by_type(&self, role_type: &str) -> Result<Option<Role>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .permissions
            .roles
            .iter()
            .find(|r| r.role_type == role_type)
            .cloned())
    }

    async fn list_permissions(&self, role_id: i64) -> Result<Vec<Permission>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .permissions
            .permissions
            .iter()
            .filter(|p| p.role == role_id)
            .cloned()
            .collect())
    }

    async fn create_permission(
        &self,
        role_id: i64,
        action: &str,
    ) -> Result<Permission, StoreError> {
        let mut state = self.lock()?;
        if !state.permissions.roles.iter().any(|r| r.id == role_id) {
            return Err(StoreError::RoleNotFound(role_id.to_string()));
        }
        let mut permissions = state.permissions.clone();
        let permission = Permission {
            id: permissions.next_permission_id,
            action: action.to_string(),
            role: role_id,
        };
        permissions.next_permission_id += 1;
        permissions.permissions.push(permission.clone());
        self.flush(PERMISSIONS_FILE, &permissions)?;
        state.permissions = permissions;
        Ok(permission)
    }
}

/// Persists documents straight into a [`DocumentStore`].
pub struct DirectPublisher<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> DirectPublisher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> Publisher for DirectPublisher<'_, S> {
    async fn publish(&self, document: &Document) -> Result<PublishedDocument, PublishError> {
        let uid = document.kind.uid();
        debug!(uid = %uid, label = %document.label, "Creating document in store");
        let stored = self
            .store
            .create_document(&uid, document.fields.clone())
            .await?;
        Ok(PublishedDocument {
            id: Some(stored.id),
            document_id: Some(stored.document_id),
        })
    }
}
