// ## 📂 File: `src/providers/static_provider.rs`

use std::sync::Arc;

use crate::providers::types::{EncryptedDataKey, MasterKey, MasterKeyProvider, ProviderError};

/// Ordered, fixed set of master keys. The first key is primary.
#[derive(Clone, Default)]
pub struct StaticMasterKeyProvider {
    keys: Vec<Arc<dyn MasterKey>>,
}

impl StaticMasterKeyProvider {
    pub fn new(keys: Vec<Arc<dyn MasterKey>>) -> Self {
        Self { keys }
    }

    pub fn single(key: Arc<dyn MasterKey>) -> Self {
        Self { keys: vec![key] }
    }

    pub fn with_key(mut self, key: Arc<dyn MasterKey>) -> Self {
        self.keys.push(key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl MasterKeyProvider for StaticMasterKeyProvider {
    fn master_keys_for_encryption(&self) -> Result<Vec<Arc<dyn MasterKey>>, ProviderError> {
        if self.keys.is_empty() {
            return Err(ProviderError::NoMasterKeys);
        }
        Ok(self.keys.clone())
    }

    fn resolve(&self, edk: &EncryptedDataKey) -> Option<Arc<dyn MasterKey>> {
        self.keys.iter().find(|k| k.owns_data_key(edk)).cloned()
    }
}
