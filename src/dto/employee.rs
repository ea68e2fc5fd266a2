//! DTO definitions for participant lookups, listings and check-in.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::table::Cell,
    state::roster::{ParticipantRecord, ParticipantSummary},
};

/// Full participant record, including the check-in flag.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    /// Full name.
    #[schema(value_type = Value)]
    pub name: Cell,
    /// Department.
    #[schema(value_type = Value)]
    pub unit: Cell,
    /// Team.
    #[schema(value_type = Value)]
    pub team: Cell,
    /// Phone number as found in the roster.
    #[schema(value_type = Value)]
    pub phone: Cell,
    /// Whether the participant already checked in.
    pub checked_in: bool,
}

impl From<ParticipantRecord> for EmployeeDetail {
    fn from(record: ParticipantRecord) -> Self {
        Self {
            name: record.name,
            unit: record.unit,
            team: record.team,
            phone: record.phone,
            checked_in: record.checked_in,
        }
    }
}

/// Body of `GET /employees/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    /// `true` on every successful response.
    pub success: bool,
    /// The participant.
    pub data: EmployeeDetail,
}

/// Listing entry; the check-in flag is implied by the listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeSummary {
    /// Normalized participant identifier.
    pub id: String,
    /// Full name.
    #[schema(value_type = Value)]
    pub name: Cell,
    /// Department.
    #[schema(value_type = Value)]
    pub unit: Cell,
    /// Team.
    #[schema(value_type = Value)]
    pub team: Cell,
    /// Phone number as found in the roster.
    #[schema(value_type = Value)]
    pub phone: Cell,
}

impl From<ParticipantSummary> for EmployeeSummary {
    fn from(summary: ParticipantSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            unit: summary.unit,
            team: summary.team,
            phone: summary.phone,
        }
    }
}

/// Body of the checked and unchecked listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeListResponse {
    /// `true` on every successful response.
    pub success: bool,
    /// Number of entries in `data`.
    pub count: usize,
    /// Matching participants in import order.
    pub data: Vec<EmployeeSummary>,
}

impl From<Vec<ParticipantSummary>> for EmployeeListResponse {
    fn from(summaries: Vec<ParticipantSummary>) -> Self {
        Self {
            success: true,
            count: summaries.len(),
            data: summaries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of `GET /checkin/{id}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    /// `true` on every successful response.
    pub success: bool,
    /// Present (and `true`) only when the participant had already checked in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_checked: Option<bool>,
    /// Human-readable outcome.
    pub message: String,
}
