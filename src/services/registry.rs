//! In-process registry of live investigations
//!
//! Each investigation sits behind its own mutex, so tool status reports for
//! one investigation are applied one at a time while different
//! investigations proceed independently. The map lock is never held while an
//! investigation is locked by a reader of the map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{Investigation, InvestigationStatus};
use crate::schemas::{
    InvestigationStatusResponse, ProgressSummary, ToolStatusUpdate, ToolStatusUpdateResponse,
};
use crate::services::polling::AdaptivePollingCalculator;
use crate::services::progress_update::ProgressUpdateService;

/// Shared investigation handle
pub type SharedInvestigation = Arc<Mutex<Investigation>>;

#[derive(Clone)]
pub struct InvestigationRegistry {
    investigations: Arc<RwLock<HashMap<Uuid, SharedInvestigation>>>,
    polling: AdaptivePollingCalculator,
    progress: ProgressUpdateService,
}

impl InvestigationRegistry {
    pub fn new(polling: AdaptivePollingCalculator, progress: ProgressUpdateService) -> Self {
        Self {
            investigations: Arc::new(RwLock::new(HashMap::new())),
            polling,
            progress,
        }
    }

    /// Start tracking a fresh `IN_PROGRESS` investigation
    pub fn start(&self) -> Uuid {
        self.track(Investigation::new())
    }

    /// Track an existing investigation, replacing any entry with the same id.
    ///
    /// Terminal investigations are already archived and are refused.
    pub fn insert(&self, investigation: Investigation) -> Result<Uuid> {
        if investigation.is_terminal() {
            return Err(AppError::AlreadyFinished {
                id: investigation.id,
                status: investigation.status,
            });
        }
        Ok(self.track(investigation))
    }

    fn track(&self, investigation: Investigation) -> Uuid {
        let id = investigation.id;
        self.investigations
            .write()
            .insert(id, Arc::new(Mutex::new(investigation)));
        tracing::info!(investigation_id = %id, "Tracking investigation");
        id
    }

    fn get(&self, id: Uuid) -> Result<SharedInvestigation> {
        self.investigations
            .read()
            .get(&id)
            .cloned()
            .ok_or(AppError::InvestigationNotFound(id))
    }

    /// Lock a live investigation; archived ones count as missing.
    fn with_live<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Investigation) -> Result<T>,
    ) -> Result<T> {
        let shared = self.get(id)?;
        let mut investigation = shared.lock();
        if investigation.is_terminal() {
            return Err(AppError::InvestigationNotFound(id));
        }
        f(&mut *investigation)
    }

    /// Register a pipeline phase. Returns `false` if it already existed.
    pub fn start_phase(&self, id: Uuid, phase_name: &str) -> Result<bool> {
        self.with_live(id, |investigation| {
            let created = investigation.progress.start_phase(phase_name);
            if created {
                investigation.touch();
                tracing::debug!(investigation_id = %id, phase = phase_name, "Phase started");
            }
            Ok(created)
        })
    }

    pub fn report_tool_status(
        &self,
        id: Uuid,
        phase_name: &str,
        tool_name: &str,
        tool_status: &str,
    ) -> Result<ProgressSummary> {
        self.with_live(id, |investigation| {
            self.progress
                .update_phase_progress(investigation, phase_name, tool_name, tool_status)
        })
    }

    /// Validate and apply a tool status report request body
    pub fn apply_update(
        &self,
        id: Uuid,
        update: &ToolStatusUpdate,
    ) -> Result<ToolStatusUpdateResponse> {
        update.validate()?;
        self.with_live(id, |investigation| {
            self.progress.apply_update(
                investigation,
                &update.phase_name,
                &update.tool_name,
                &update.status,
            )
        })
    }

    /// Current status, progress and polling advice for a live investigation
    pub fn status(&self, id: Uuid) -> Result<InvestigationStatusResponse> {
        let shared = self.get(id)?;
        let investigation = shared.lock();
        let progress = self.progress.recalculate(&investigation)?;

        Ok(InvestigationStatusResponse {
            investigation_id: investigation.id,
            status: investigation.status,
            is_terminal: investigation.is_terminal(),
            poll_after_seconds: self.polling.interval_for(investigation.status),
            progress,
        })
    }

    /// Copy of the investigation as it currently stands
    pub fn snapshot(&self, id: Uuid) -> Result<Investigation> {
        Ok(self.get(id)?.lock().clone())
    }

    /// Move an investigation to a terminal status and stop tracking it.
    ///
    /// Returns the archived record for the caller to persist. An entry that
    /// is already terminal is dropped from the registry either way.
    pub fn finish(&self, id: Uuid, status: InvestigationStatus) -> Result<Investigation> {
        let shared = self.get(id)?;
        let mut investigation = shared.lock();

        if investigation.is_terminal() {
            self.investigations.write().remove(&id);
            tracing::info!(
                investigation_id = %id,
                status = %investigation.status,
                "Evicted finished investigation"
            );
            if investigation.status == status {
                return Ok(investigation.clone());
            }
            return Err(AppError::InvalidTransition {
                from: investigation.status,
                to: status,
            });
        }

        if !status.is_terminal() {
            return Err(AppError::InvalidTransition {
                from: investigation.status,
                to: status,
            });
        }
        investigation.transition_to(status)?;

        self.investigations.write().remove(&id);
        tracing::info!(investigation_id = %id, %status, "Investigation finished");

        Ok(investigation.clone())
    }

    pub fn len(&self) -> usize {
        self.investigations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.investigations.read().is_empty()
    }
}
