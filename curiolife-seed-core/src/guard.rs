//! One-shot run guard for the direct importer.
//!
//! The flag lives in the settings store under
//! `(environment, "type", "curiolife-setup")` / `initHasRun`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::contract::{SettingsScope, SettingsStore};
use crate::error::StoreError;

pub const SETUP_STORE_TYPE: &str = "type";
pub const SETUP_STORE_NAME: &str = "curiolife-setup";
pub const INIT_HAS_RUN_KEY: &str = "initHasRun";

/// When the "already ran" flag is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPolicy {
    /// Flag is set before any work. A crash mid-import leaves the store
    /// marked as seeded and the import is never retried.
    MarkBeforeImport,
    /// Flag is set only once the import ran to completion. A fatal error
    /// leaves the flag unset so the next run retries.
    #[default]
    MarkAfterImport,
}

pub struct RunGuard<'a, S: ?Sized> {
    store: &'a S,
    scope: SettingsScope,
    policy: GuardPolicy,
}

impl<'a, S: SettingsStore + ?Sized> RunGuard<'a, S> {
    pub fn new(store: &'a S, environment: &str, policy: GuardPolicy) -> Self {
        Self {
            store,
            scope: SettingsScope::new(environment, SETUP_STORE_TYPE, SETUP_STORE_NAME),
            policy,
        }
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    pub async fn has_run(&self) -> Result<bool, StoreError> {
        let value = self.store.get_setting(&self.scope, INIT_HAS_RUN_KEY).await?;
        Ok(matches!(value, Some(Value::Bool(true))))
    }

    /// Returns `true` when the import should proceed. Under
    /// [`GuardPolicy::MarkBeforeImport`] the flag is written here.
    pub async fn begin(&self) -> Result<bool, StoreError> {
        if self.has_run().await? {
            warn!(environment = %self.scope.environment, "[SEED] Run guard already set");
            return Ok(false);
        }
        if self.policy == GuardPolicy::MarkBeforeImport {
            self.mark().await?;
        }
        Ok(true)
    }

    /// Records a completed import. Under [`GuardPolicy::MarkAfterImport`]
    /// the flag is written here.
    pub async fn complete(&self) -> Result<(), StoreError> {
        if self.policy == GuardPolicy::MarkAfterImport {
            self.mark().await?;
        }
        Ok(())
    }

    async fn mark(&self) -> Result<(), StoreError> {
        self.store
            .set_setting(&self.scope, INIT_HAS_RUN_KEY, Value::Bool(true))
            .await?;
        info!(environment = %self.scope.environment, policy = ?self.policy, "[SEED] Run guard set");
        Ok(())
    }
}
