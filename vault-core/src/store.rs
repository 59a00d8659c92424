use crate::model::{Incident, NewIncident};
use std::cell::RefCell;
use std::collections::BTreeMap;
use thiserror::Error;

/// Primary key holding the serialized incident list.
pub const INCIDENTS_KEY: &str = "incidents";
/// Quarantine key holding the last unparsable payload.
pub const BACKUP_KEY: &str = "incidents_backup";
/// Opaque reporter identifier, written once at first run.
pub const USER_ID_KEY: &str = "userId";

/// String-keyed persistence seam. The UI backs this with localStorage;
/// tests use [`MemoryKv`].
pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// Source of fresh opaque identifiers and the current ISO-8601 instant.
pub trait Stamp {
    fn new_id(&self) -> String;
    fn now_iso(&self) -> String;
}

impl<K: KeyValue + ?Sized> KeyValue for &K {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        (**self).remove(key)
    }
}

impl<S: Stamp + ?Sized> Stamp for &S {
    fn new_id(&self) -> String {
        (**self).new_id()
    }

    fn now_iso(&self) -> String {
        (**self).now_iso()
    }
}

/// Non-fatal persistence warnings. The display text is the user-facing copy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreWarning {
    #[error("Could not load previous incidents. Starting fresh.")]
    CorruptReset,
    #[error("Failed to save new incident due to storage limitations.")]
    SaveFailed,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOutcome {
    pub incidents: Vec<Incident>,
    pub warning: Option<StoreWarning>,
}

#[derive(Clone, Debug)]
pub struct IncidentStore<K, S> {
    kv: K,
    stamp: S,
}

impl<K: KeyValue, S: Stamp> IncidentStore<K, S> {
    pub fn new(kv: K, stamp: S) -> Self {
        Self { kv, stamp }
    }

    /// Read the persisted list. Missing key yields an empty list; an
    /// unparsable payload is moved to the quarantine key, the primary key is
    /// deleted and the caller gets a warning to surface. Never fails.
    pub fn load(&self) -> LoadOutcome {
        let raw = match self.kv.get(INCIDENTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) | Err(_) => return LoadOutcome::default(),
        };

        match serde_json::from_str::<Vec<Incident>>(&raw) {
            Ok(incidents) => LoadOutcome {
                incidents,
                warning: None,
            },
            Err(_) => {
                let _ = self.kv.set(BACKUP_KEY, &raw);
                let _ = self.kv.remove(INCIDENTS_KEY);
                LoadOutcome {
                    incidents: Vec::new(),
                    warning: Some(StoreWarning::CorruptReset),
                }
            }
        }
    }

    /// Write the full list back to the primary key. A failed write is
    /// reported as a warning and not retried; the in-memory list is the
    /// caller's and stays as it is.
    pub fn save(&self, incidents: &[Incident]) -> Result<(), StoreWarning> {
        let payload = serde_json::to_string(incidents).map_err(|_| StoreWarning::SaveFailed)?;
        self.kv
            .set(INCIDENTS_KEY, &payload)
            .map_err(|_| StoreWarning::SaveFailed)
    }

    /// Complete a capture payload with a fresh unique id and the current
    /// timestamp, prepend it and persist. Returns the completed record plus
    /// any save warning.
    pub fn append(
        &self,
        incidents: &mut Vec<Incident>,
        new: NewIncident,
    ) -> (Incident, Option<StoreWarning>) {
        let mut id = self.stamp.new_id();
        while incidents.iter().any(|incident| incident.id == id) {
            id = self.stamp.new_id();
        }

        let incident = Incident {
            id,
            title: new.title,
            date: self.stamp.now_iso(),
            preview: new.preview,
            attachments: new.attachments,
        };
        incidents.insert(0, incident.clone());
        let warning = self.save(incidents).err();
        (incident, warning)
    }

    /// Persist one opaque reporter id at first run. Consumed by nothing
    /// inside the app.
    pub fn ensure_user_id(&self) -> Result<String, String> {
        if let Some(existing) = self.kv.get(USER_ID_KEY)? {
            return Ok(existing);
        }

        let id = self.stamp.new_id();
        self.kv.set(USER_ID_KEY, &id)?;
        Ok(id)
    }
}

/// In-memory `KeyValue` for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryKv {
    data: RefCell<BTreeMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}
