//! In-process store with API-server-like bookkeeping.
//!
//! Assigns uids and resourceVersions, allocates node ports for `NodePort`
//! Services, rejects duplicate creates and stale patches, and records every
//! call so tests can assert on what was written.

use super::{ObjectKey, ObjectStore, StoredObject};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Get,
    Create,
    Patch,
}

/// A recorded store call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub kind: String,
    pub key: ObjectKey,
}

/// What a scheduled fault does to the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    Unavailable,
    AlreadyExists,
    Conflict,
    /// The call never completes.
    Hang,
}

type Slot = (String, ObjectKey);

struct State {
    objects: BTreeMap<Slot, Value>,
    calls: Vec<Call>,
    faults: Vec<(Operation, String, Fault)>,
    next_uid: u64,
    next_version: u64,
    next_node_port: i64,
}

#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_node_port_base(30000)
    }

    /// First node port handed out to a `NodePort` Service.
    pub fn with_node_port_base(base: i64) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                objects: BTreeMap::new(),
                calls: Vec::new(),
                faults: Vec::new(),
                next_uid: 1,
                next_version: 1,
                next_node_port: base,
            })),
        }
    }

    /// Stores `object` as if created by someone else. Not recorded as a call.
    pub fn insert<K: StoredObject>(&self, object: &K) -> Result<K> {
        let key = ObjectKey::from_object(object)?;
        let mut value = serde_json::to_value(object)?;
        let mut state = self.state.lock();
        state.stamp_new(&mut value);
        state.objects.insert((K::kind(&()).into_owned(), key), value.clone());
        Ok(serde_json::from_value(value)?)
    }

    /// Removes an object, as a cascading delete would.
    pub fn remove<K: StoredObject>(&self, key: &ObjectKey) -> bool {
        let slot = (K::kind(&()).into_owned(), key.clone());
        self.state.lock().objects.remove(&slot).is_some()
    }

    /// Reads an object without recording a call.
    pub fn peek<K: StoredObject>(&self, key: &ObjectKey) -> Option<K> {
        let slot = (K::kind(&()).into_owned(), key.clone());
        let state = self.state.lock();
        state
            .objects
            .get(&slot)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Makes the next `operation` on `kind` fail with `fault`.
    pub fn fail_next(&self, operation: Operation, kind: &str, fault: Fault) {
        self.state
            .lock()
            .faults
            .push((operation, kind.to_string(), fault));
    }

    /// Recorded calls of one operation, in order.
    pub fn calls_of(&self, operation: Operation) -> Vec<Call> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    /// Create and patch calls, which are the only ones that write.
    pub fn writes(&self) -> Vec<Call> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation != Operation::Get)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records the call, then applies a scheduled fault if one matches.
    async fn begin(&self, operation: Operation, kind: &str, key: &ObjectKey) -> Result<()> {
        let fault = {
            let mut state = self.state.lock();
            state.calls.push(Call {
                operation,
                kind: kind.to_string(),
                key: key.clone(),
            });
            state
                .faults
                .iter()
                .position(|(op, k, _)| *op == operation && k == kind)
                .map(|pos| state.faults.remove(pos).2)
        };

        match fault {
            None => Ok(()),
            Some(Fault::Hang) => std::future::pending().await,
            Some(Fault::Unavailable) => Err(Error::Unavailable(format!("injected fault on {key}"))),
            Some(Fault::AlreadyExists) => Err(Error::AlreadyExists(key.to_string())),
            Some(Fault::Conflict) => Err(Error::Conflict(key.to_string())),
        }
    }
}

impl State {
    fn bump_version(&mut self, value: &mut Value) {
        let version = self.next_version.to_string();
        self.next_version += 1;
        if let Some(meta) = value.get_mut("metadata").and_then(Value::as_object_mut) {
            meta.insert("resourceVersion".to_string(), Value::String(version));
        }
    }

    fn stamp_new(&mut self, value: &mut Value) {
        if let Some(meta) = value.get_mut("metadata").and_then(Value::as_object_mut) {
            if !meta.contains_key("uid") {
                meta.insert("uid".to_string(), Value::String(format!("uid-{}", self.next_uid)));
                self.next_uid += 1;
            }
        }
        self.bump_version(value);
    }

    /// Fills `nodePort` on every port of a `NodePort` Service that lacks one.
    fn allocate_node_ports(&mut self, value: &mut Value) {
        let Some(spec) = value.get_mut("spec") else {
            return;
        };
        if spec.get("type").and_then(Value::as_str) != Some("NodePort") {
            return;
        }
        let Some(ports) = spec.get_mut("ports").and_then(Value::as_array_mut) else {
            return;
        };
        for port in ports.iter_mut().filter_map(Value::as_object_mut) {
            if !port.contains_key("nodePort") {
                port.insert("nodePort".to_string(), Value::from(self.next_node_port));
                self.next_node_port += 1;
            }
        }
    }
}

impl ObjectStore for MemoryStore {
    async fn get<K: StoredObject>(&self, key: &ObjectKey) -> Result<Option<K>> {
        let kind = K::kind(&()).into_owned();
        self.begin(Operation::Get, &kind, key).await?;
        let state = self.state.lock();
        match state.objects.get(&(kind, key.clone())) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn create<K: StoredObject>(&self, object: &K) -> Result<K> {
        let kind = K::kind(&()).into_owned();
        let key = ObjectKey::from_object(object)?;
        let mut value = serde_json::to_value(object)?;

        self.begin(Operation::Create, &kind, &key).await?;
        let mut state = self.state.lock();
        let slot = (kind, key.clone());
        if state.objects.contains_key(&slot) {
            return Err(Error::AlreadyExists(key.to_string()));
        }
        if slot.0 == "Service" {
            state.allocate_node_ports(&mut value);
        }
        state.stamp_new(&mut value);
        state.objects.insert(slot, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    async fn patch<K: StoredObject>(&self, key: &ObjectKey, patch: &Value) -> Result<K> {
        let kind = K::kind(&()).into_owned();
        self.begin(Operation::Patch, &kind, key).await?;
        let mut state = self.state.lock();
        let slot = (kind, key.clone());
        let mut value = state
            .objects
            .get(&slot)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_string()))?;

        let expected = patch
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str);
        let current = value
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str);
        if expected.is_some() && expected != current {
            return Err(Error::Conflict(key.to_string()));
        }

        json_patch::merge(&mut value, patch);
        state.bump_version(&mut value);
        state.objects.insert(slot, value.clone());
        Ok(serde_json::from_value(value)?)
    }
}
