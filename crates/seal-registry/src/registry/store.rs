use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{Registration, RegistrationId, RegistrationStatus, SearchFilter};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait RegistrationRepository: Send + Sync {
    /// Store a new record under a freshly assigned identifier. Any identifier already on
    /// `record` is replaced.
    fn append(&self, record: Registration) -> Result<Registration, RepositoryError>;
    fn fetch(&self, id: &RegistrationId) -> Result<Option<Registration>, RepositoryError>;
    fn search(&self, filter: &SearchFilter) -> Result<Vec<Registration>, RepositoryError>;
    fn set_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, RepositoryError>;
    /// Move a record to `to` only when its current status is one of `allowed_from`. The check
    /// and the write happen under a single exclusive lock. `None` when no record matches.
    fn transition(
        &self,
        id: &RegistrationId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> Result<Option<Transition>, RepositoryError>;
    fn all(&self) -> Result<Vec<Registration>, RepositoryError>;
}

/// Result of a guarded status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied {
        record: Registration,
        from: RegistrationStatus,
    },
    /// The record was left untouched in this status.
    Refused(RegistrationStatus),
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug)]
struct StoreState {
    records: Vec<Registration>,
    next_sequence: u64,
}

/// Process-local record list; nothing survives a restart.
#[derive(Debug, Clone)]
pub struct InMemoryRegistrationStore {
    state: Arc<RwLock<StoreState>>,
}

impl Default for InMemoryRegistrationStore {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl InMemoryRegistrationStore {
    /// Start from existing records, keeping their identifiers. New identifiers continue
    /// after the highest `internal-N` sequence present.
    pub fn with_records(records: Vec<Registration>) -> Self {
        let next_sequence = records
            .iter()
            .filter_map(|record| record.id.sequence())
            .max()
            .map_or(1, |highest| highest + 1);

        Self {
            state: Arc::new(RwLock::new(StoreState {
                records,
                next_sequence,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|state| state.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Unavailable("registration store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Unavailable("registration store lock poisoned".into()))
    }
}

impl RegistrationRepository for InMemoryRegistrationStore {
    fn append(&self, mut record: Registration) -> Result<Registration, RepositoryError> {
        let mut state = self.write()?;
        record.id = RegistrationId::from_sequence(state.next_sequence);
        state.next_sequence += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &RegistrationId) -> Result<Option<Registration>, RepositoryError> {
        let state = self.read()?;
        Ok(state.records.iter().find(|record| &record.id == id).cloned())
    }

    fn search(&self, filter: &SearchFilter) -> Result<Vec<Registration>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn set_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, RepositoryError> {
        let mut state = self.write()?;
        Ok(state
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .map(|record| {
                record.status = status;
                record.clone()
            }))
    }

    fn transition(
        &self,
        id: &RegistrationId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> Result<Option<Transition>, RepositoryError> {
        let mut state = self.write()?;
        let Some(record) = state.records.iter_mut().find(|record| &record.id == id) else {
            return Ok(None);
        };

        let from = record.status;
        if !allowed_from.contains(&from) {
            return Ok(Some(Transition::Refused(from)));
        }
        record.status = to;
        Ok(Some(Transition::Applied {
            record: record.clone(),
            from,
        }))
    }

    fn all(&self) -> Result<Vec<Registration>, RepositoryError> {
        Ok(self.read()?.records.clone())
    }
}
