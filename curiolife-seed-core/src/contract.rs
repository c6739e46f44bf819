//! # contract: persistence interfaces for seeding
//!
//! This module defines the traits the import driver talks to, so the same
//! derivation and driver code can persist through any transport:
//!
//! - [`Publisher`]: "persist one derived document". Implemented by the direct
//!   store adapter ([`crate::store::DirectPublisher`]) and by the REST client
//!   in the CLI crate.
//! - [`DocumentStore`], [`SettingsStore`], [`PermissionStore`]: the capabilities
//!   a CMS host exposes to an in-process importer (document creation by
//!   content-type uid, a scoped key/value settings store, role and permission
//!   records).
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`, so tests can script failures for
//!   individual records or stores.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::{PublishError, StoreError};

/// What a persistence backend reports back for a created document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedDocument {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
}

/// Persists one derived document.
///
/// Implementors must not retry; the driver treats every error as a
/// per-record failure and moves on to the next record.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, document: &Document) -> Result<PublishedDocument, PublishError>;
}

/// A document as stored by a [`DocumentStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: i64,
    pub document_id: String,
    pub data: Map<String, Value>,
}

/// Document-creation capability, namespaced by content-type uid
/// (`api::devotional.devotional`).
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(
        &self,
        uid: &str,
        data: Map<String, Value>,
    ) -> Result<StoredDocument, StoreError>;

    async fn count_documents(&self, uid: &str) -> Result<usize, StoreError>;
}

/// Scope of a settings entry: environment, type and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingsScope {
    pub environment: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl SettingsScope {
    pub fn new(environment: &str, kind: &str, name: &str) -> Self {
        Self {
            environment: environment.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

/// Key/value settings store scoped by [`SettingsScope`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(
        &self,
        scope: &SettingsScope,
        key: &str,
    ) -> Result<Option<Value>, StoreError>;

    async fn set_setting(
        &self,
        scope: &SettingsScope,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    /// `public`, `authenticated`, ...
    #[serde(rename = "type")]
    pub role_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    /// Full action string, e.g. `api::prayer.prayer.find`.
    pub action: String,
    pub role: i64,
}

/// Role and permission records of the users-permissions layer.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_role_by_type(&self, role_type: &str) -> Result<Option<Role>, StoreError>;

    async fn list_permissions(&self, role_id: i64) -> Result<Vec<Permission>, StoreError>;

    async fn create_permission(&self, role_id: i64, action: &str)
        -> Result<Permission, StoreError>;
}
