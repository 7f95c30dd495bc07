// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The hydration engine.
//!
//! [`Hydrator::hydrate`] walks a value's field table depth-first in
//! declaration order. Aggregate fields are descended into; every other field
//! gets exactly one store lookup at its derived key, and the value found is
//! coerced into the field. Lookups are issued one at a time.
//!
//! A pre-populated `Vec<u8>` field is skipped without a lookup.

use crate::builder::HydratorBuilder;
use crate::coerce::{self, Coercion, CoercionPolicy};
use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::error::HydrateError;
use crate::field::{Field, Hydrate, Slot};
use crate::key_path::{FieldDescriptor, KeyPathResolver};
use crate::store::KeyValueStore;
use futures_util::future::{BoxFuture, FutureExt};
use log::{debug, warn};
use std::sync::Arc;

/// Hydrates values from one store.
///
/// Folder and separator may be changed between passes; a pass always uses
/// the settings current when it resolves each key.
pub struct Hydrator {
    store: Arc<dyn KeyValueStore>,
    resolver: KeyPathResolver,
    diagnostics: Arc<dyn Diagnostics>,
    policy: CoercionPolicy,
}

impl Hydrator {
    /// Hydrator with no folder, the default separator, no diagnostics and
    /// lenient coercion.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::from_parts(
            store,
            KeyPathResolver::new(),
            Arc::new(NoopDiagnostics),
            CoercionPolicy::default(),
        )
    }

    pub fn builder(store: Arc<dyn KeyValueStore>) -> HydratorBuilder {
        HydratorBuilder::new(store)
    }

    pub(crate) fn from_parts(
        store: Arc<dyn KeyValueStore>,
        resolver: KeyPathResolver,
        diagnostics: Arc<dyn Diagnostics>,
        policy: CoercionPolicy,
    ) -> Self {
        Self {
            store,
            resolver,
            diagnostics,
            policy,
        }
    }

    pub fn folder(&self) -> &str {
        self.resolver.folder()
    }

    pub fn set_folder(&mut self, folder: impl Into<String>) {
        self.resolver.set_folder(folder);
    }

    pub fn separator(&self) -> &str {
        self.resolver.separator()
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.resolver.set_separator(separator);
    }

    pub fn policy(&self) -> CoercionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CoercionPolicy) {
        self.policy = policy;
    }

    pub fn resolver(&self) -> &KeyPathResolver {
        &self.resolver
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Populate `target` from the store.
    ///
    /// Fields whose key is missing keep their value. A store failure stops
    /// the pass immediately; fields already written keep their new values.
    pub async fn hydrate<T: Hydrate>(&self, target: &mut T) -> Result<(), HydrateError> {
        let type_name = std::any::type_name::<T>();
        self.diagnostics.hydrating(type_name);
        debug!("Hydrating {type_name} from folder '{}'", self.folder());

        self.hydrate_fields(target.fields(), None).await
    }

    fn hydrate_fields<'a>(
        &'a self,
        fields: Vec<Field<'a>>,
        parent: Option<&'a FieldDescriptor<'a>>,
    ) -> BoxFuture<'a, Result<(), HydrateError>> {
        async move {
            for field in fields {
                let (name, key, slot) = field.into_parts();
                let descriptor = match parent {
                    Some(parent) => parent.child(name, key),
                    None => FieldDescriptor::root(name, key),
                };

                match slot {
                    Slot::Nested(inner) => {
                        self.hydrate_fields(inner.fields(), Some(&descriptor))
                            .await?;
                    }
                    Slot::Bytes(bytes) if !bytes.is_empty() => {
                        debug!(
                            "Keeping pre-set bytes for '{}'",
                            self.resolver.resolve(&descriptor)
                        );
                    }
                    slot => self.hydrate_leaf(&descriptor, slot).await?,
                }
            }
            Ok(())
        }
        .boxed()
    }

    async fn hydrate_leaf(
        &self,
        descriptor: &FieldDescriptor<'_>,
        slot: Slot<'_>,
    ) -> Result<(), HydrateError> {
        let key = self.resolver.resolve(descriptor);
        let raw = self.fetch(&key).await?;
        let kind = slot.kind();

        match coerce::apply(slot, raw.as_deref()) {
            Coercion::Assigned | Coercion::Unchanged => Ok(()),
            Coercion::Rejected { reason, .. } => match self.policy {
                CoercionPolicy::Lenient => {
                    warn!("Ignoring value at '{key}': not a valid {kind} ({reason})");
                    Ok(())
                }
                CoercionPolicy::Strict => Err(HydrateError::Coercion {
                    key,
                    kind,
                    value: raw.unwrap_or_default(),
                    reason,
                }),
            },
        }
    }

    async fn fetch(&self, key: &str) -> Result<Option<String>, HydrateError> {
        let value = self
            .store
            .get(key)
            .await
            .map_err(|source| HydrateError::Store {
                key: key.to_string(),
                source,
            })?;

        match &value {
            Some(value) => self.diagnostics.recovered(key, value),
            None => debug!("Key '{key}' not found"),
        }

        Ok(value)
    }
}

impl std::fmt::Debug for Hydrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hydrator")
            .field("folder", &self.folder())
            .field("separator", &self.separator())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrate_fields;
    use crate::store::{MemoryStore, StoreError};
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct Leaf {
        value: String,
    }

    #[derive(Default)]
    struct Middle {
        leaf: Leaf,
        count: u32,
    }

    #[derive(Default)]
    struct Root {
        first: String,
        middle: Middle,
        last: bool,
    }

    hydrate_fields!(Leaf { value value });
    hydrate_fields!(Middle { nested leaf, value count });
    hydrate_fields!(Root { value first, nested middle => "mid", value last });

    #[tokio::test]
    async fn test_traversal_is_depth_first_in_declaration_order() {
        let store = MemoryStore::new().recording();
        let hydrator = Hydrator::new(Arc::new(store.clone()));

        hydrator.hydrate(&mut Root::default()).await.unwrap();

        assert_eq!(
            store.lookups().await,
            vec!["first", "mid.leaf.value", "mid.count", "last"]
        );
    }

    #[tokio::test]
    async fn test_folder_and_separator_changes_apply_to_next_pass() {
        let store = MemoryStore::new().recording();
        let mut hydrator = Hydrator::new(Arc::new(store.clone()));
        hydrator.set_folder("svc");
        hydrator.set_separator("/");

        hydrator.hydrate(&mut Root::default()).await.unwrap();

        assert_eq!(
            store.lookups().await,
            vec!["svc/first", "svc/mid/leaf/value", "svc/mid/count", "svc/last"]
        );
    }

    #[tokio::test]
    async fn test_store_failure_aborts_remaining_fields() {
        let store = MemoryStore::from_entries([("first", "a"), ("last", "true")]).recording();
        store.fail_on("mid.count", "boom").await;
        let hydrator = Hydrator::new(Arc::new(store.clone()));

        let mut root = Root::default();
        let err = hydrator.hydrate(&mut root).await.unwrap_err();

        assert_eq!(err.key(), "mid.count");
        assert_matches!(
            err,
            HydrateError::Store {
                source: StoreError::Unavailable(_),
                ..
            }
        );
        assert_eq!(root.first, "a");
        assert!(!root.last);
        assert!(!store.lookups().await.contains(&"last".to_string()));
    }

    #[tokio::test]
    async fn test_strict_policy_reports_bad_values() {
        let store = MemoryStore::from_entries([("mid.count", "many")]);
        let mut hydrator = Hydrator::new(Arc::new(store));
        hydrator.set_policy(CoercionPolicy::Strict);

        let mut root = Root::default();
        let err = hydrator.hydrate(&mut root).await.unwrap_err();

        assert_matches!(
            err,
            HydrateError::Coercion { ref key, ref value, .. } if key == "mid.count" && value == "many"
        );
        assert_eq!(root.middle.count, 0);
    }

    #[tokio::test]
    async fn test_lenient_policy_skips_bad_values() {
        let store = MemoryStore::from_entries([("mid.count", "many"), ("last", "true")]);
        let hydrator = Hydrator::new(Arc::new(store));

        let mut root = Root::default();
        root.middle.count = 3;
        hydrator.hydrate(&mut root).await.unwrap();

        assert_eq!(root.middle.count, 3);
        assert!(root.last);
    }

    #[tokio::test]
    async fn test_preset_bytes_are_not_looked_up() {
        #[derive(Default)]
        struct Blob {
            data: Vec<u8>,
        }
        hydrate_fields!(Blob { value data });

        let store = MemoryStore::from_entries([("data", "from-store")]).recording();
        let hydrator = Hydrator::new(Arc::new(store.clone()));

        let mut blob = Blob {
            data: b"seed".to_vec(),
        };
        hydrator.hydrate(&mut blob).await.unwrap();

        assert_eq!(blob.data, b"seed".to_vec());
        assert!(store.lookups().await.is_empty());
    }
}
