//! Application-level configuration loading: file locations, sheet layout and flush cadence.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use time::UtcOffset;
use tracing::{info, warn};

use crate::state::gate::GatePolicy;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CHECKIN_BACK_CONFIG_PATH";
/// Period of the background attendance flush.
const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 8;
/// Submission times are rendered in Indochina time unless configured otherwise.
const DEFAULT_UTC_OFFSET_MINUTES: i16 = 7 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Directory holding the roster, attendance and score workbooks.
    pub data_dir: PathBuf,
    /// Roster workbook layout.
    pub roster: RosterConfig,
    /// Attendance workbook settings.
    pub attendance: AttendanceConfig,
    /// Score workbook settings.
    pub scores: ScoresConfig,
    /// Offset applied to score submission timestamps.
    pub utc_offset_minutes: i16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Layout of the workbook participants are imported from at startup.
pub struct RosterConfig {
    /// File name, relative to the data directory.
    pub file: PathBuf,
    /// Sheet read from or written to.
    pub sheet: String,
    /// Zero-based row holding the real column labels; rows above it are titles.
    pub header_row: usize,
    /// Header labels of the imported columns.
    pub columns: RosterColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Column labels recognised in the roster header.
pub struct RosterColumns {
    /// Participant identifier column; required.
    pub id: String,
    /// Full name column.
    pub name: String,
    /// Department column.
    pub unit: String,
    /// Team column.
    pub team: String,
    /// Phone number column.
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Attendance workbook settings.
pub struct AttendanceConfig {
    /// File name, relative to the data directory.
    pub file: PathBuf,
    /// Sheet read from or written to.
    pub sheet: String,
    /// Seconds between background flushes; 0 selects the default.
    pub flush_interval_secs: u64,
    /// Whether a flush that finds another one in flight is dropped or coalesced.
    pub gate_policy: GatePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Score workbook settings.
pub struct ScoresConfig {
    /// File name, relative to the data directory.
    pub file: PathBuf,
    /// Sheet read from or written to.
    pub sheet: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if config.attendance.flush_interval_secs == 0 {
            warn!("attendance flush interval of 0s is not allowed; using default");
        }
        if UtcOffset::from_whole_seconds(i32::from(config.utc_offset_minutes) * 60).is_err() {
            warn!(
                minutes = config.utc_offset_minutes,
                "utc offset out of range; timestamps will use UTC"
            );
        }
        config
    }

    /// Full path of the roster workbook.
    pub fn roster_path(&self) -> PathBuf {
        self.data_dir.join(&self.roster.file)
    }

    /// Full path of the attendance workbook.
    pub fn attendance_path(&self) -> PathBuf {
        self.data_dir.join(&self.attendance.file)
    }

    /// Full path of the score workbook.
    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join(&self.scores.file)
    }

    /// Offset used to render submission timestamps.
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_whole_seconds(i32::from(self.utc_offset_minutes) * 60)
            .unwrap_or(UtcOffset::UTC)
    }

    /// Period of the background attendance flush; never zero.
    pub fn flush_interval(&self) -> Duration {
        match self.attendance.flush_interval_secs {
            0 => Duration::from_secs(DEFAULT_FLUSH_INTERVAL_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            roster: RosterConfig::default(),
            attendance: AttendanceConfig::default(),
            scores: ScoresConfig::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("employees.xlsx"),
            sheet: "Sheet1".into(),
            header_row: 2,
            columns: RosterColumns::default(),
        }
    }
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            id: "Mã NV".into(),
            name: "Họ và tên".into(),
            unit: "Phòng ban".into(),
            team: "ĐỘI".into(),
            phone: "Điện thoại".into(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("employees_checkin.xlsx"),
            sheet: "Sheet1".into(),
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            gate_policy: GatePolicy::Drop,
        }
    }
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("team_scores.xlsx"),
            sheet: "Scores".into(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "data_dir": "/srv/event",
                "attendance": { "gate_policy": "coalesce" },
                "roster": { "columns": { "id": "Employee ID" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.attendance_path(), PathBuf::from("/srv/event/employees_checkin.xlsx"));
        assert_eq!(config.attendance.gate_policy, GatePolicy::Coalesce);
        assert_eq!(config.flush_interval(), Duration::from_secs(8));
        assert_eq!(config.roster.columns.id, "Employee ID");
        assert_eq!(config.roster.columns.team, "ĐỘI");
        assert_eq!(config.roster.header_row, 2);
        assert_eq!(config.scores.sheet, "Scores");
    }

    #[test]
    fn degenerate_values_fall_back() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "attendance": { "flush_interval_secs": 0 }, "utc_offset_minutes": 30000 }"#,
        )
        .unwrap();

        assert_eq!(config.flush_interval(), Duration::from_secs(8));
        assert_eq!(config.utc_offset(), UtcOffset::UTC);
        assert_eq!(
            AppConfig::default().utc_offset(),
            UtcOffset::from_hms(7, 0, 0).unwrap()
        );
    }
}
