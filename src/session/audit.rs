use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::{AUDIT_CSV_HEADER, AUDIT_LOG_CAPACITY};
use crate::utils::GateError;

/// HIPAA audit event vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HipaaEventType {
    ClientViewed,
    ClientCreated,
    ClientUpdated,
    ClientDeleted,
    AnalysisViewed,
    AnalysisCreated,
    AnalysisDeleted,
    UserLogin,
    UserLogout,
    DataExported,
    PasswordChanged,
    #[serde(rename = "UNAUTHORIZED_ACCESS_ATTEMPT")]
    UnauthorizedAccess,
    SessionTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: u64,
    pub user_id: String,
    pub event_type: HipaaEventType,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub device_info: String,
}

/// In-process audit log keeping the most recent `capacity` events
pub struct AuditTrail {
    events: Mutex<VecDeque<AuditEvent>>,
    next_id: AtomicU64,
    capacity: usize,
    device_info: String,
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::with_capacity(AUDIT_LOG_CAPACITY)
    }
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(0),
            capacity: capacity.max(1),
            device_info: format!(
                "{} - {} {}",
                std::env::consts::ARCH,
                std::env::consts::OS,
                env!("CARGO_PKG_NAME")
            ),
        }
    }

    pub fn record(&self, event_type: HipaaEventType, user_id: &str) -> AuditEvent {
        self.record_resource(event_type, user_id, None, None)
    }

    pub fn record_resource(
        &self,
        event_type: HipaaEventType,
        user_id: &str,
        resource_type: Option<&str>,
        resource_id: Option<&str>,
    ) -> AuditEvent {
        let event = AuditEvent {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: user_id.to_string(),
            event_type,
            resource_type: resource_type.map(str::to_string),
            resource_id: resource_id.map(str::to_string),
            timestamp: Utc::now(),
            device_info: self.device_info.clone(),
        };
        tracing::info!(event = ?event.event_type, user = %event.user_id, "audit");

        let mut events = self.events.lock();
        events.push_back(event.clone());
        while events.len() > self.capacity {
            events.pop_front();
        }
        event
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn events_of(&self, event_type: HipaaEventType) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn export_json(&self) -> Result<String, GateError> {
        Ok(serde_json::to_string_pretty(&*self.events.lock())?)
    }

    /// One header row, then one row per retained event, oldest first
    pub fn export_csv(&self) -> Result<String, GateError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(AUDIT_CSV_HEADER)?;
        for event in self.events.lock().iter() {
            writer.serialize((
                event.timestamp,
                &event.user_id,
                event.event_type,
                &event.resource_type,
                &event.resource_id,
                &event.device_info,
            ))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| GateError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| GateError::ExportError(e.to_string()))
    }
}
