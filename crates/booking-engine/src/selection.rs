//! Booking selection flow: service -> date -> time -> confirmation.
//!
//! Every upstream change re-derives the downstream views. Choosing a service
//! rebuilds the horizon calendar and clears date and time; choosing a date
//! re-enumerates slots and clears time. Rejected selections are recoverable:
//! the flow keeps a consistent state and the caller re-prompts, optionally
//! after [`BookingFlow::refresh`].
//!
//! The flow never prevents two customers from taking the same slot. The
//! commit collaborator resolves that race (e.g. a unique constraint on
//! service, date and time) and the flow reports its rejection.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classifier::DateStatus;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{BookingError, Result};
use crate::horizon::{build_calendar, CalendarMap};
use crate::profile::{ServiceId, ServiceProfile};
use crate::slots::{enumerate_slots, SlotGrid, TimeSlot};
use crate::source::ProfileSource;
use crate::time::TimeOfDay;

/// The tuple handed to the commit collaborator on confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    /// Appointment length in minutes.
    pub duration: u32,
}

/// Acknowledgement of a durable booking write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub booking_id: String,
}

/// Outbound seam: performs the durable, race-safe booking write.
#[async_trait]
pub trait BookingCommitter: Send + Sync {
    /// Persist `request`. Rejections (slot taken, payment refused, ...) come
    /// back as errors and leave the flow ready to retry.
    async fn commit(&self, request: &BookingRequest) -> Result<CommitReceipt>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// No service chosen yet, or the last profile fetch failed.
    Idle,
    ServiceSelected,
    DateSelected,
    TimeSelected,
    /// A commit is in flight.
    Confirmed,
}

/// The customer's current choices. `time` is only set while `date` is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSelection {
    pub service_id: Option<ServiceId>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeOfDay>,
}

pub struct BookingFlow {
    source: Arc<dyn ProfileSource>,
    committer: Arc<dyn BookingCommitter>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    state: FlowState,
    selection: BookingSelection,
    service: Option<ServiceProfile>,
    calendar: CalendarMap,
    slots: Vec<TimeSlot>,
}

impl BookingFlow {
    pub fn new(
        source: Arc<dyn ProfileSource>,
        committer: Arc<dyn BookingCommitter>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        BookingFlow {
            source,
            committer,
            clock,
            config,
            state: FlowState::Idle,
            selection: BookingSelection::default(),
            service: None,
            calendar: CalendarMap::new(),
            slots: Vec::new(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    /// Horizon calendar for the selected service; empty before one is chosen.
    pub fn calendar(&self) -> &CalendarMap {
        &self.calendar
    }

    /// Slots for the selected date; empty before one is chosen.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn service(&self) -> Option<&ServiceProfile> {
        self.service.as_ref()
    }

    /// Grid for the selected service's default duration.
    pub fn grid(&self) -> Option<SlotGrid> {
        self.service
            .as_ref()
            .map(|s| self.config.grid_for(s.default_duration))
    }

    /// Choose a service, clearing date and time and rebuilding the calendar.
    ///
    /// # Errors
    /// [`BookingError::ProfileUnavailable`] when the profile cannot be
    /// fetched. The flow returns to [`FlowState::Idle`]; nothing is computed
    /// without a profile.
    pub async fn select_service(&mut self, service_id: &ServiceId) -> Result<&CalendarMap> {
        self.clear_date();
        self.selection.service_id = Some(service_id.clone());

        let profile = match self.source.fetch(service_id).await {
            Ok(profile) => profile,
            Err(err) => {
                self.reset();
                return Err(as_profile_unavailable(service_id, err));
            }
        };

        self.install_service(profile);
        self.state = FlowState::ServiceSelected;
        tracing::debug!(%service_id, days = self.calendar.len(), "service selected");
        Ok(&self.calendar)
    }

    /// Choose a date. Only dates the current calendar marks available are
    /// accepted; the slot list is re-enumerated on success. A calendar built
    /// on an earlier day is rebuilt from the held profile first.
    ///
    /// # Errors
    /// [`BookingError::InvalidSelection`] when no service is selected or the
    /// date is not available. Date and time are left unset.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<&[TimeSlot]> {
        self.roll_calendar_forward();
        let Some(service) = self.service.as_ref() else {
            return Err(BookingError::InvalidSelection(
                "select a service before choosing a date".to_string(),
            ));
        };

        let status = self.calendar.get(&date).copied();
        if status != Some(DateStatus::Available) {
            self.clear_date();
            self.state = FlowState::ServiceSelected;
            let shown = status.map_or("outside the booking horizon", |s| s.as_str());
            tracing::debug!(%date, status = shown, "date rejected");
            return Err(BookingError::InvalidSelection(format!(
                "{} is not available ({})",
                date, shown
            )));
        }

        let grid = self.config.grid_for(service.default_duration);
        self.slots = enumerate_slots(date, &service.availability, grid, self.clock.today());
        self.selection.date = Some(date);
        self.selection.time = None;
        self.state = FlowState::DateSelected;
        tracing::debug!(%date, slots = self.slots.len(), "date selected");
        Ok(&self.slots)
    }

    /// Choose a start time from the most recent slot list.
    ///
    /// # Errors
    /// [`BookingError::InvalidSelection`] when no date is selected or `time`
    /// is not the start of a listed slot. The previous choice is kept, unless
    /// the selected date itself stopped being available since the calendar
    /// was built; then date and time are cleared.
    pub fn select_time(&mut self, time: TimeOfDay) -> Result<()> {
        let Some(date) = self.selection.date else {
            return Err(BookingError::InvalidSelection(
                "select a date before choosing a time".to_string(),
            ));
        };

        self.roll_calendar_forward();
        if self.calendar.get(&date) != Some(&DateStatus::Available) {
            tracing::debug!(%date, "selected date no longer available");
            self.clear_date();
            self.state = FlowState::ServiceSelected;
            return Err(BookingError::InvalidSelection(format!(
                "{} is no longer available",
                date
            )));
        }

        if !self.slots.iter().any(|slot| slot.start == time) {
            tracing::debug!(%date, %time, "time rejected");
            return Err(BookingError::InvalidSelection(format!(
                "{} on {} is not an open slot",
                time, date
            )));
        }

        self.selection.time = Some(time);
        self.state = FlowState::TimeSelected;
        tracing::debug!(%date, %time, "time selected");
        Ok(())
    }

    /// Hand the complete selection to the commit collaborator.
    ///
    /// On success the flow resets to [`FlowState::ServiceSelected`] with a
    /// freshly fetched calendar, ready for the next booking. On failure it
    /// stays in [`FlowState::TimeSelected`] so the customer can retry
    /// without choosing again.
    pub async fn confirm(&mut self) -> Result<CommitReceipt> {
        let request = self.pending_request().ok_or_else(|| {
            BookingError::InvalidSelection(
                "choose a service, date and time before confirming".to_string(),
            )
        })?;

        self.state = FlowState::Confirmed;
        match self.committer.commit(&request).await {
            Ok(receipt) => {
                tracing::info!(
                    service_id = %request.service_id,
                    date = %request.date,
                    time = %request.time,
                    booking_id = %receipt.booking_id,
                    "booking committed"
                );
                self.clear_date();
                self.state = FlowState::ServiceSelected;
                if let Err(err) = self.reload_service().await {
                    tracing::warn!(error = %err, "calendar refresh after booking failed");
                }
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "booking commit rejected");
                self.state = FlowState::TimeSelected;
                Err(match err {
                    BookingError::CommitRejected(_) => err,
                    other => BookingError::CommitRejected(other.to_string()),
                })
            }
        }
    }

    /// Re-fetch the service profile, bypassing caches, and re-derive the
    /// calendar and slots. Selections that are no longer valid are cleared.
    pub async fn refresh(&mut self) -> Result<()> {
        if self.service.is_none() {
            return Ok(());
        }
        self.reload_service().await?;

        let Some(date) = self.selection.date else {
            return Ok(());
        };
        if self.calendar.get(&date) != Some(&DateStatus::Available) {
            tracing::debug!(%date, "selected date no longer available");
            self.clear_date();
            self.state = FlowState::ServiceSelected;
            return Ok(());
        }

        if let (Some(service), Some(grid)) = (self.service.as_ref(), self.grid()) {
            self.slots = enumerate_slots(date, &service.availability, grid, self.clock.today());
        }
        if let Some(time) = self.selection.time {
            if !self.slots.iter().any(|slot| slot.start == time) {
                tracing::debug!(%date, %time, "selected time no longer open");
                self.selection.time = None;
                self.state = FlowState::DateSelected;
            }
        }
        Ok(())
    }

    /// The request `confirm` would send, when all three choices are set.
    pub fn pending_request(&self) -> Option<BookingRequest> {
        let service = self.service.as_ref()?;
        Some(BookingRequest {
            service_id: self.selection.service_id.clone()?,
            date: self.selection.date?,
            time: self.selection.time?,
            duration: service.default_duration,
        })
    }

    async fn reload_service(&mut self) -> Result<()> {
        let Some(service_id) = self.selection.service_id.clone() else {
            return Ok(());
        };
        match self.source.refresh(&service_id).await {
            Ok(profile) => {
                self.install_service(profile);
                Ok(())
            }
            Err(err) => {
                self.reset();
                Err(as_profile_unavailable(&service_id, err))
            }
        }
    }

    fn install_service(&mut self, profile: ServiceProfile) {
        let grid = self.config.grid_for(profile.default_duration);
        self.calendar = build_calendar(
            &profile.availability,
            grid,
            self.clock.today(),
            self.config.horizon_days,
        );
        self.service = Some(profile);
    }

    /// Rebuild the calendar from the held profile once the clock has moved
    /// past the day it starts on.
    fn roll_calendar_forward(&mut self) {
        let today = self.clock.today();
        if self.calendar.keys().next() == Some(&today) {
            return;
        }
        let Some(service) = self.service.as_ref() else {
            return;
        };
        let grid = self.config.grid_for(service.default_duration);
        self.calendar = build_calendar(&service.availability, grid, today, self.config.horizon_days);
        tracing::debug!(%today, "calendar rolled forward");
    }

    fn clear_date(&mut self) {
        self.selection.date = None;
        self.selection.time = None;
        self.slots.clear();
    }

    fn reset(&mut self) {
        self.selection = BookingSelection::default();
        self.service = None;
        self.calendar.clear();
        self.slots.clear();
        self.state = FlowState::Idle;
    }
}

fn as_profile_unavailable(service_id: &ServiceId, err: BookingError) -> BookingError {
    match err {
        BookingError::ProfileUnavailable { .. } => err,
        other => BookingError::ProfileUnavailable {
            service_id: service_id.to_string(),
            reason: other.to_string(),
        },
    }
}
