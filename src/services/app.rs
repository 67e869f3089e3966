//! Application host
//!
//! Owns the application state and the active screen, builds each component
//! with callbacks that post [`AppEvent`]s, and applies those events one at a
//! time in [`EmergencyApp::dispatch`].

use std::fmt;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::models::AppState;
use crate::observability::AppMetrics;
use crate::services::dashboard::{Dashboard, DashboardCallbacks};
use crate::services::editor::{HospitalsEditor, ListEditor, MedicationsEditor, ProfileEditor};
use crate::services::events::{AppEvent, EditorKind, EventReceiver, EventSink, SosMode};
use crate::services::scheduler::Scheduler;
use crate::services::triage::{EmergencyDispatcher, PlaceholderDispatcher};
use crate::services::wizard::EmergencyWizard;

/// Active screen
pub enum Screen {
    Dashboard,
    ProfileEditor(ProfileEditor),
    HospitalsEditor(HospitalsEditor),
    MedicationsEditor(MedicationsEditor),
    Emergency(EmergencyWizard),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::ProfileEditor(_) => "ProfileEditor",
            Screen::HospitalsEditor(_) => "HospitalsEditor",
            Screen::MedicationsEditor(_) => "MedicationsEditor",
            Screen::Emergency(_) => "Emergency",
        }
    }

    /// Editor shown, if any
    pub fn editor_kind(&self) -> Option<EditorKind> {
        match self {
            Screen::ProfileEditor(_) => Some(EditorKind::Profile),
            Screen::HospitalsEditor(_) => Some(EditorKind::Hospitals),
            Screen::MedicationsEditor(_) => Some(EditorKind::Medications),
            _ => None,
        }
    }

    pub fn is_dashboard(&self) -> bool {
        matches!(self, Screen::Dashboard)
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The enclosing application
pub struct EmergencyApp {
    state: AppState,
    screen: Screen,
    config: AppConfig,
    sink: EventSink,
    scheduler: Scheduler,
    dashboard_callbacks: DashboardCallbacks,
    dispatcher: Arc<dyn EmergencyDispatcher>,
    metrics: AppMetrics,
}

impl EmergencyApp {
    /// Create the app on the dashboard; the receiver must be drained by the host
    pub fn new(config: AppConfig, state: AppState) -> (Self, EventReceiver) {
        let (sink, events) = EventSink::channel();
        let scheduler = Scheduler::new(sink.clone());
        let dashboard_callbacks = dashboard_callbacks(&sink);

        let app = Self {
            state,
            screen: Screen::Dashboard,
            config,
            sink,
            scheduler,
            dashboard_callbacks,
            dispatcher: Arc::new(PlaceholderDispatcher),
            metrics: AppMetrics::default(),
        };
        (app, events)
    }

    /// Use a real dispatcher for "Call Emergency Services"
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn EmergencyDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    /// Dashboard over the current state; only while the dashboard is shown
    pub fn dashboard(&self) -> Result<Dashboard<'_>> {
        if !self.screen.is_dashboard() {
            return Err(AppError::invalid_transition(self.screen.name(), "dashboard"));
        }
        Ok(Dashboard::new(
            &self.state.profile,
            &self.state.hospitals,
            &self.state.medications,
            self.config.dashboard.hospital_preview_limit,
            &self.dashboard_callbacks,
        ))
    }

    pub fn profile_editor(&mut self) -> Result<&mut ProfileEditor> {
        match &mut self.screen {
            Screen::ProfileEditor(editor) => Ok(editor),
            other => Err(AppError::invalid_transition(other.name(), "edit profile")),
        }
    }

    pub fn hospitals_editor(&mut self) -> Result<&mut HospitalsEditor> {
        match &mut self.screen {
            Screen::HospitalsEditor(editor) => Ok(editor),
            other => Err(AppError::invalid_transition(other.name(), "edit hospitals")),
        }
    }

    pub fn medications_editor(&mut self) -> Result<&mut MedicationsEditor> {
        match &mut self.screen {
            Screen::MedicationsEditor(editor) => Ok(editor),
            other => Err(AppError::invalid_transition(other.name(), "edit medications")),
        }
    }

    pub fn wizard(&mut self) -> Result<&mut EmergencyWizard> {
        match &mut self.screen {
            Screen::Emergency(wizard) => Ok(wizard),
            other => Err(AppError::invalid_transition(other.name(), "emergency")),
        }
    }

    /// Apply one event
    pub fn dispatch(&mut self, event: AppEvent) -> Result<()> {
        tracing::debug!("Dispatching {:?} on {}", event, self.screen.name());

        match event {
            AppEvent::SosTriggered(mode) => self.start_emergency(mode),
            AppEvent::EditRequested(kind) => self.open_editor(kind),
            AppEvent::ProfileSaved(profile) => {
                if self.finish_edit(EditorKind::Profile, true) {
                    self.state.profile = profile;
                }
            }
            AppEvent::HospitalsSaved(hospitals) => {
                if self.finish_edit(EditorKind::Hospitals, true) {
                    self.state.hospitals = hospitals;
                }
            }
            AppEvent::MedicationsSaved(medications) => {
                if self.finish_edit(EditorKind::Medications, true) {
                    self.state.medications = medications;
                }
            }
            AppEvent::EditCancelled(kind) => {
                self.finish_edit(kind, false);
            }
            AppEvent::TimerElapsed(id) => match &mut self.screen {
                Screen::Emergency(wizard) => {
                    wizard.on_timer(id)?;
                }
                other => tracing::debug!("Timer {} elapsed on {}, ignoring", id, other.name()),
            },
            AppEvent::EmergencyCompleted => {
                if matches!(self.screen, Screen::Emergency(_)) {
                    self.metrics.record_wizard_completed();
                    self.show_dashboard();
                } else {
                    tracing::warn!("Emergency completion outside the wizard, ignoring");
                }
            }
        }
        Ok(())
    }

    /// Apply every queued event without waiting
    pub fn drain(&mut self, events: &mut EventReceiver) -> Result<usize> {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.dispatch(event)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn start_emergency(&mut self, mode: SosMode) {
        if !self.screen.is_dashboard() {
            tracing::warn!("SOS requested on {}, ignoring", self.screen.name());
            return;
        }

        self.metrics.record_sos(mode);
        let sink = self.sink.clone();
        let wizard = EmergencyWizard::start(
            self.state.clone(),
            mode,
            self.config.wizard.clone(),
            self.scheduler.clone(),
            Box::new(move || sink.emit(AppEvent::EmergencyCompleted)),
        )
        .with_dispatcher(self.dispatcher.clone());

        self.screen = Screen::Emergency(wizard);
    }

    fn open_editor(&mut self, kind: EditorKind) {
        if !self.screen.is_dashboard() {
            tracing::warn!("Edit {} requested on {}, ignoring", kind, self.screen.name());
            return;
        }

        let on_cancel = {
            let sink = self.sink.clone();
            Box::new(move || sink.emit(AppEvent::EditCancelled(kind)))
        };
        let sink = self.sink.clone();

        self.screen = match kind {
            EditorKind::Profile => Screen::ProfileEditor(ProfileEditor::new(
                self.state.profile.clone(),
                Box::new(move |profile| sink.emit(AppEvent::ProfileSaved(profile))),
                on_cancel,
            )),
            EditorKind::Hospitals => Screen::HospitalsEditor(ListEditor::new(
                "hospitals",
                self.state.hospitals.clone(),
                Box::new(move |hospitals| sink.emit(AppEvent::HospitalsSaved(hospitals))),
                on_cancel,
            )),
            EditorKind::Medications => Screen::MedicationsEditor(ListEditor::new(
                "medications",
                self.state.medications.clone(),
                Box::new(move |medications| sink.emit(AppEvent::MedicationsSaved(medications))),
                on_cancel,
            )),
        };
        tracing::info!("Opened {} editor", kind);
    }

    /// Leave the editor of `kind`; false when that editor is not shown
    fn finish_edit(&mut self, kind: EditorKind, saved: bool) -> bool {
        if self.screen.editor_kind() != Some(kind) {
            tracing::warn!("{} editor result arrived on {}, ignoring", kind, self.screen.name());
            return false;
        }

        if saved {
            self.metrics.record_save(kind);
        } else {
            self.metrics.record_cancel();
        }
        self.show_dashboard();
        true
    }

    fn show_dashboard(&mut self) {
        tracing::info!("{} -> Dashboard", self.screen.name());
        self.screen = Screen::Dashboard;
    }
}

fn dashboard_callbacks(sink: &EventSink) -> DashboardCallbacks {
    let sos = sink.clone();
    let profile = sink.clone();
    let hospitals = sink.clone();
    let medications = sink.clone();

    DashboardCallbacks {
        on_trigger_sos: Box::new(move |silent| sos.emit(AppEvent::SosTriggered(SosMode::from_silent(silent)))),
        on_edit_profile: Box::new(move || profile.emit(AppEvent::EditRequested(EditorKind::Profile))),
        on_edit_hospitals: Box::new(move || hospitals.emit(AppEvent::EditRequested(EditorKind::Hospitals))),
        on_edit_medications: Box::new(move || {
            medications.emit(AppEvent::EditRequested(EditorKind::Medications))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactField, HospitalField, MedicationField, ProfileField};
    use crate::services::editor::Editor;
    use crate::services::wizard::WizardStep;

    fn app() -> (EmergencyApp, EventReceiver) {
        EmergencyApp::new(AppConfig::development(), AppState::sample())
    }

    #[tokio::test]
    async fn test_starts_on_dashboard() {
        let (app, _events) = app();
        assert!(app.screen().is_dashboard());
        assert_eq!(app.dashboard().unwrap().view().hospitals.more, Some(1));
    }

    #[tokio::test]
    async fn test_hospitals_save_replaces_state() {
        let (mut app, mut events) = app();
        app.dashboard().unwrap().edit_hospitals();
        app.drain(&mut events).unwrap();

        let editor = app.hospitals_editor().unwrap();
        editor.remove_item(0).unwrap();
        editor.add_item().unwrap();
        editor.update_field(3, HospitalField::Name, "Lakeside").unwrap();
        editor.update_field(3, HospitalField::Address, "9 Shore Rd").unwrap();
        editor.submit().unwrap();
        app.drain(&mut events).unwrap();

        assert!(app.screen().is_dashboard());
        let names: Vec<_> = app.state().hospitals.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            ["St. Mary Medical Center", "Riverside Clinic", "Northside Urgent Care", "Lakeside"]
        );
        assert_eq!(app.state().nearest_hospital(), Some("St. Mary Medical Center"));
    }

    #[tokio::test]
    async fn test_cancel_leaves_state_untouched() {
        let (mut app, mut events) = app();
        let before = app.state().clone();

        app.dashboard().unwrap().edit_profile();
        app.drain(&mut events).unwrap();
        let editor = app.profile_editor().unwrap();
        editor.set_field(ProfileField::Name, "Someone Else").unwrap();
        editor.remove_contact(0).unwrap();
        editor.cancel().unwrap();
        app.drain(&mut events).unwrap();

        assert!(app.screen().is_dashboard());
        assert_eq!(app.state(), &before);
    }

    #[tokio::test]
    async fn test_profile_and_medication_saves() {
        let (mut app, mut events) = app();

        app.dashboard().unwrap().edit_profile();
        app.drain(&mut events).unwrap();
        let editor = app.profile_editor().unwrap();
        editor.update_contact(1, ContactField::Phone, "+1 555 0200").unwrap();
        editor.submit().unwrap();
        app.drain(&mut events).unwrap();
        assert_eq!(app.state().profile.emergency_contacts[1].phone, "+1 555 0200");

        app.dashboard().unwrap().edit_medications();
        app.drain(&mut events).unwrap();
        let editor = app.medications_editor().unwrap();
        editor.update_field(0, MedicationField::Dosage, "24 units").unwrap();
        editor.submit().unwrap();
        app.drain(&mut events).unwrap();
        assert_eq!(app.state().medications[0].dosage, "24 units");

        let metrics = app.metrics().gather();
        assert!(metrics.contains("records_saved_total{editor=\"profile\"} 1"));
        assert!(metrics.contains("records_saved_total{editor=\"medications\"} 1"));
    }

    #[tokio::test]
    async fn test_dashboard_unavailable_while_editing() {
        let (mut app, mut events) = app();
        app.dashboard().unwrap().edit_hospitals();
        app.drain(&mut events).unwrap();

        assert!(matches!(app.dashboard(), Err(AppError::InvalidTransition { .. })));
        assert!(app.wizard().is_err());

        // a stray SOS request while editing does not leave the editor
        app.dispatch(AppEvent::SosTriggered(SosMode::Loud)).unwrap();
        assert_eq!(app.screen().editor_kind(), Some(EditorKind::Hospitals));
    }

    #[tokio::test]
    async fn test_mismatched_save_is_ignored() {
        let (mut app, mut events) = app();
        app.dashboard().unwrap().edit_medications();
        app.drain(&mut events).unwrap();

        app.dispatch(AppEvent::HospitalsSaved(Vec::new())).unwrap();
        assert_eq!(app.state().hospitals.len(), 4);
        assert_eq!(app.screen().editor_kind(), Some(EditorKind::Medications));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sos_opens_wizard_with_mode() {
        let (mut app, mut events) = app();
        app.dashboard().unwrap().trigger_sos(false);
        app.drain(&mut events).unwrap();

        let wizard = app.wizard().unwrap();
        assert_eq!(wizard.mode(), SosMode::Loud);
        assert_eq!(wizard.step(), WizardStep::Activated);
        assert!(app.metrics().gather().contains("sos_triggered_total{mode=\"loud\"} 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_after_leaving_wizard_is_ignored() {
        let (mut app, mut events) = app();
        app.dashboard().unwrap().trigger_sos(true);
        app.drain(&mut events).unwrap();

        let id = match events.recv().await {
            Some(AppEvent::TimerElapsed(id)) => id,
            other => panic!("expected timer, got {other:?}"),
        };
        app.dispatch(AppEvent::TimerElapsed(id)).unwrap();
        app.wizard().unwrap().skip().unwrap();
        app.wizard().unwrap().complete().unwrap();
        app.drain(&mut events).unwrap();
        assert!(app.screen().is_dashboard());

        app.dispatch(AppEvent::TimerElapsed(id)).unwrap();
        assert!(app.screen().is_dashboard());
    }
}
