//! Authoritative in-memory registry of participants and their check-in flag.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::{dao::table::Cell, error::ServiceError};

/// One imported participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    /// Full name.
    pub name: Cell,
    /// Department.
    pub unit: Cell,
    /// Team.
    pub team: Cell,
    /// Phone number as found in the roster.
    pub phone: Cell,
    /// Only ever moves from `false` to `true`.
    pub checked_in: bool,
}

impl ParticipantRecord {
    /// A participant that has not checked in yet.
    pub fn new(name: Cell, unit: Cell, team: Cell, phone: Cell) -> Self {
        Self {
            name,
            unit,
            team,
            phone,
            checked_in: false,
        }
    }
}

/// Listing projection of a participant, without the check-in flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantSummary {
    /// Normalized identifier.
    pub id: String,
    /// Full name.
    pub name: Cell,
    /// Department.
    pub unit: Cell,
    /// Team.
    pub team: Cell,
    /// Phone number as found in the roster.
    pub phone: Cell,
}

/// Check-in status selected by [`RecordStore::list_where`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFilter {
    /// Participants not checked in yet.
    Unchecked,
    /// Participants already checked in.
    Checked,
}

impl RosterFilter {
    fn accepts(self, record: &ParticipantRecord) -> bool {
        match self {
            RosterFilter::Unchecked => !record.checked_in,
            RosterFilter::Checked => record.checked_in,
        }
    }
}

/// Result of a successful [`RecordStore::check_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The flag flipped; the attendance file must be flushed.
    CheckedIn,
    /// The participant was already present; nothing changed.
    AlreadyCheckedIn,
}

/// Ordered copy of the roster taken for serialization.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    /// Header row captured at import time.
    pub header: Vec<Cell>,
    /// Participants in import order.
    pub records: Vec<(String, ParticipantRecord)>,
}

#[derive(Debug, Default)]
struct Roster {
    header: Vec<Cell>,
    records: IndexMap<String, ParticipantRecord>,
}

/// Participants keyed by normalized identifier, kept in import order.
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: RwLock<Roster>,
}

/// Canonical form of a participant identifier: trimmed and uppercased.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl RecordStore {
    /// Empty registry; filled by [`RecordStore::seed`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole registry with freshly imported records.
    ///
    /// Identifiers are normalized; records whose identifier normalizes to an
    /// empty string are skipped. Returns the number of distinct records kept.
    pub fn seed(
        &self,
        header: Vec<Cell>,
        records: impl IntoIterator<Item = (String, ParticipantRecord)>,
    ) -> usize {
        let mut map = IndexMap::new();
        for (raw_id, record) in records {
            let id = normalize_id(&raw_id);
            if !id.is_empty() {
                map.insert(id, record);
            }
        }

        let mut roster = self.write();
        roster.header = header;
        roster.records = map;
        roster.records.len()
    }

    /// Look up a participant by (unnormalized) identifier.
    pub fn get(&self, raw_id: &str) -> Result<ParticipantRecord, ServiceError> {
        let id = normalize_id(raw_id);
        self.read()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("participant `{id}` not found")))
    }

    /// Mark a participant as present.
    ///
    /// Checking in twice is not an error; the second call reports
    /// [`CheckInOutcome::AlreadyCheckedIn`] and changes nothing.
    pub fn check_in(&self, raw_id: &str) -> Result<CheckInOutcome, ServiceError> {
        let id = normalize_id(raw_id);
        if id.is_empty() {
            return Err(ServiceError::InvalidId("participant id is empty".into()));
        }

        let mut roster = self.write();
        let record = roster
            .records
            .get_mut(&id)
            .ok_or_else(|| ServiceError::InvalidId(format!("unknown participant id `{id}`")))?;

        if record.checked_in {
            return Ok(CheckInOutcome::AlreadyCheckedIn);
        }
        record.checked_in = true;
        Ok(CheckInOutcome::CheckedIn)
    }

    /// Summaries of the participants matching `filter`, in import order.
    pub fn list_where(&self, filter: RosterFilter) -> Vec<ParticipantSummary> {
        self.read()
            .records
            .iter()
            .filter(|(_, record)| filter.accepts(record))
            .map(|(id, record)| ParticipantSummary {
                id: id.clone(),
                name: record.name.clone(),
                unit: record.unit.clone(),
                team: record.team.clone(),
                phone: record.phone.clone(),
            })
            .collect()
    }

    /// Ordered copy of the header and every record.
    pub fn snapshot(&self) -> RosterSnapshot {
        let roster = self.read();
        RosterSnapshot {
            header: roster.header.clone(),
            records: roster
                .records
                .iter()
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect(),
        }
    }

    // Critical sections never panic, so a poisoned lock still holds consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Roster> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Roster> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
