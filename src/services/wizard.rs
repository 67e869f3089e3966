//! Emergency Wizard
//!
//! Fixed four-step flow shown after an SOS trigger:
//!
//! ```text
//!  Activated ──[activation delay]──▶ Describe ──[submit + analysis delay]──▶ Analysis
//!                                       │                                      │
//!                                     [skip]                          [call / continue]
//!                                       ▼                                      ▼
//!                                    Summary ◀─────────────────────────────────┘
//!                                       │
//!                                    [done] ──▶ on_complete()
//! ```
//!
//! The two delays are single-shot timers owned by the wizard. A timer that
//! is superseded, or whose wizard is dropped, is aborted and never
//! produces a transition.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::WizardConfig;
use crate::error::{AppError, Result, ValidationError};
use crate::models::AppState;
use crate::services::events::SosMode;
use crate::services::scheduler::{ScheduledTimer, Scheduler, TimerId};
use crate::services::triage::{
    Assessment, DispatchRequest, EmergencyDispatcher, FixedAnalyzer, PlaceholderDispatcher,
    SymptomAnalyzer,
};

/// Completion callback, invoked once when leaving the summary
pub type CompleteCallback = Box<dyn FnOnce() + Send>;

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    Activated,
    Describe,
    Analysis,
    Summary,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Activated => "Activated",
            WizardStep::Describe => "Describe",
            WizardStep::Analysis => "Analysis",
            WizardStep::Summary => "Summary",
        };
        f.write_str(name)
    }
}

/// Emergency contact row on the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLine {
    pub name: String,
    pub phone: String,
}

/// Medication row on the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationDose {
    pub name: String,
    pub dosage: String,
}

/// Responder reference sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencySummary {
    pub name: String,
    pub address: String,
    pub medical_info: String,
    pub contacts: Vec<ContactLine>,
    pub medications: Vec<MedicationDose>,
}

/// What the host renders for the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step")]
pub enum WizardScreen {
    Activated {
        title: String,
        message: String,
    },
    Describe {
        symptoms: String,
        can_submit: bool,
        processing: bool,
        submit_label: String,
    },
    Analysis {
        severity: String,
        summary: String,
        department: String,
        nearest_hospital: String,
    },
    Summary(EmergencySummary),
}

/// The wizard itself
pub struct EmergencyWizard {
    state: AppState,
    mode: SosMode,
    step: WizardStep,
    symptoms: String,
    assessment: Option<Assessment>,
    acknowledgment: Option<String>,
    pending: Option<ScheduledTimer>,
    config: WizardConfig,
    scheduler: Scheduler,
    analyzer: Arc<dyn SymptomAnalyzer>,
    dispatcher: Arc<dyn EmergencyDispatcher>,
    on_complete: Option<CompleteCallback>,
}

impl EmergencyWizard {
    /// Start at `Activated` and schedule the activation delay
    ///
    /// `state` is a snapshot; the wizard never writes it back.
    pub fn start(
        state: AppState,
        mode: SosMode,
        config: WizardConfig,
        scheduler: Scheduler,
        on_complete: CompleteCallback,
    ) -> Self {
        let analyzer: Arc<dyn SymptomAnalyzer> = Arc::new(FixedAnalyzer::from_config(&config));
        let pending = scheduler.schedule(Duration::from_millis(config.activation_delay_ms));

        tracing::info!("Emergency wizard activated ({} mode)", mode);

        Self {
            state,
            mode,
            step: WizardStep::Activated,
            symptoms: String::new(),
            assessment: None,
            acknowledgment: None,
            pending: Some(pending),
            config,
            scheduler,
            analyzer,
            dispatcher: Arc::new(PlaceholderDispatcher),
            on_complete: Some(on_complete),
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn SymptomAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn EmergencyDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn mode(&self) -> SosMode {
        self.mode
    }

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    /// Analysis delay running
    pub fn is_processing(&self) -> bool {
        self.step == WizardStep::Describe && self.pending.is_some()
    }

    /// Acknowledgment from the last dispatch, if the user called
    pub fn acknowledgment(&self) -> Option<&str> {
        self.acknowledgment.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.on_complete.is_none()
    }

    /// Nearest hospital name or the configured fallback
    pub fn nearest_hospital(&self) -> &str {
        self.state
            .nearest_hospital()
            .unwrap_or(self.config.no_hospital_fallback.as_str())
    }

    /// Handle a fired timer; returns whether it caused a transition
    pub fn on_timer(&mut self, id: TimerId) -> Result<bool> {
        match &self.pending {
            Some(timer) if timer.id() == id => {}
            _ => {
                tracing::debug!("Ignoring stale {} in step {}", id, self.step);
                return Ok(false);
            }
        }
        self.pending = None;

        match self.step {
            WizardStep::Activated => self.transition(WizardStep::Describe),
            WizardStep::Describe => {
                self.assessment = Some(self.analyzer.assess(&self.symptoms));
                self.transition(WizardStep::Analysis);
            }
            step => {
                return Err(AppError::Internal(format!("timer {} pending in step {}", id, step)));
            }
        }
        Ok(true)
    }

    /// Edit the symptom text
    pub fn set_symptoms(&mut self, text: impl Into<String>) -> Result<()> {
        self.expect_step(WizardStep::Describe, "describe")?;
        if self.is_processing() {
            return Err(AppError::invalid_transition("Describe (analyzing)", "describe"));
        }
        self.symptoms = text.into();
        Ok(())
    }

    /// Whether submit is enabled
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Describe && !self.is_processing() && !self.symptoms.trim().is_empty()
    }

    /// Start the simulated analysis
    pub fn submit_symptoms(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Describe, "submit")?;
        if self.is_processing() {
            return Err(AppError::invalid_transition("Describe (analyzing)", "submit"));
        }
        if self.symptoms.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "symptoms".to_string(),
            }
            .into());
        }

        tracing::info!("Analyzing symptoms");
        self.pending = Some(
            self.scheduler
                .schedule(Duration::from_millis(self.config.analysis_delay_ms)),
        );
        Ok(())
    }

    /// Jump from Describe to Summary, discarding the text
    pub fn skip(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Describe, "skip")?;
        self.pending = None;
        self.symptoms.clear();
        self.transition(WizardStep::Summary);
        Ok(())
    }

    /// "Call Emergency Services": dispatch, then Summary
    pub fn call_emergency_services(&mut self) -> Result<String> {
        self.expect_step(WizardStep::Analysis, "call")?;

        let request = DispatchRequest {
            mode: self.mode,
            name: self.state.profile.name.clone(),
            address: self.state.profile.address.clone(),
            medical_info: self.state.profile.medical_info.clone(),
            nearest_hospital: self.state.nearest_hospital().map(str::to_string),
            assessment: self.assessment.clone(),
            requested_at: Utc::now(),
        };
        let acknowledgment = self.dispatcher.notify(&request)?;
        tracing::info!("Dispatch acknowledged: {}", acknowledgment);

        self.acknowledgment = Some(acknowledgment.clone());
        self.transition(WizardStep::Summary);
        Ok(acknowledgment)
    }

    /// "Continue": Analysis to Summary without dispatch
    pub fn continue_to_summary(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Analysis, "continue")?;
        self.transition(WizardStep::Summary);
        Ok(())
    }

    /// "Return to Dashboard": fires the completion callback exactly once
    pub fn complete(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Summary, "complete")?;
        let on_complete = self.on_complete.take().ok_or(AppError::AlreadyCompleted)?;

        self.symptoms.clear();
        self.assessment = None;
        tracing::info!("Emergency wizard completed");
        on_complete();
        Ok(())
    }

    /// Build the view for the current step
    pub fn screen(&self) -> WizardScreen {
        match self.step {
            WizardStep::Activated => {
                let (title, message) = match self.mode {
                    SosMode::Silent => (
                        "Silent Emergency Activated",
                        "Emergency contacts will be notified discreetly...",
                    ),
                    SosMode::Loud => (
                        "Emergency SOS Activated",
                        "Emergency services are being contacted...",
                    ),
                };
                WizardScreen::Activated {
                    title: title.to_string(),
                    message: message.to_string(),
                }
            }
            WizardStep::Describe => {
                let processing = self.is_processing();
                WizardScreen::Describe {
                    symptoms: self.symptoms.clone(),
                    can_submit: self.can_submit(),
                    processing,
                    submit_label: if processing { "Analyzing..." } else { "Submit" }.to_string(),
                }
            }
            WizardStep::Analysis => {
                let assessment = self
                    .assessment
                    .clone()
                    .unwrap_or_else(|| self.analyzer.assess(&self.symptoms));
                WizardScreen::Analysis {
                    severity: assessment.severity,
                    summary: assessment.summary,
                    department: assessment.department,
                    nearest_hospital: self.nearest_hospital().to_string(),
                }
            }
            WizardStep::Summary => {
                let profile = &self.state.profile;
                WizardScreen::Summary(EmergencySummary {
                    name: profile.name.clone(),
                    address: profile.address.clone(),
                    medical_info: profile.medical_info.clone(),
                    contacts: profile
                        .emergency_contacts
                        .iter()
                        .map(|c| ContactLine {
                            name: c.name.clone(),
                            phone: c.phone.clone(),
                        })
                        .collect(),
                    medications: self
                        .state
                        .medications
                        .iter()
                        .map(|m| MedicationDose {
                            name: m.name.clone(),
                            dosage: m.dosage.clone(),
                        })
                        .collect(),
                })
            }
        }
    }

    fn expect_step(&self, step: WizardStep, action: &str) -> Result<()> {
        if self.step != step {
            tracing::warn!("Rejected '{}' in step {}", action, self.step);
            return Err(AppError::invalid_transition(self.step, action));
        }
        Ok(())
    }

    fn transition(&mut self, to: WizardStep) {
        tracing::info!("Emergency wizard: {} -> {}", self.step, to);
        self.step = to;
    }
}

impl fmt::Debug for EmergencyWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmergencyWizard")
            .field("mode", &self.mode)
            .field("step", &self.step)
            .field("processing", &self.is_processing())
            .field("completed", &self.is_completed())
            .finish()
    }
}

impl fmt::Display for WizardScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardScreen::Activated { title, message } => {
                writeln!(f, "🚨 {}", title)?;
                writeln!(f, "{}", message)
            }
            WizardScreen::Describe {
                symptoms,
                can_submit,
                submit_label,
                ..
            } => {
                writeln!(f, "Describe Your Emergency")?;
                if symptoms.is_empty() {
                    writeln!(f, "  (Please describe your symptoms or emergency situation...)")?;
                } else {
                    writeln!(f, "  {}", symptoms)?;
                }
                let submit = if *can_submit {
                    format!("[ {} ]", submit_label)
                } else {
                    format!("( {} )", submit_label)
                };
                writeln!(f, "{}   [ Skip ]", submit)
            }
            WizardScreen::Analysis {
                severity,
                summary,
                department,
                nearest_hospital,
            } => {
                writeln!(f, "Emergency Analysis")?;
                writeln!(f, "Severity Assessment: {}", severity)?;
                writeln!(f, "{}", summary)?;
                writeln!(f, "Recommended Department: {}", department)?;
                writeln!(f, "Nearest Hospital: {}", nearest_hospital)?;
                writeln!(f, "[ Call Emergency Services ]   [ Continue ]")
            }
            WizardScreen::Summary(summary) => {
                writeln!(f, "Emergency Information")?;
                writeln!(f, "Personal Information")?;
                writeln!(f, "  Name: {}", summary.name)?;
                writeln!(f, "  Address: {}", summary.address)?;
                writeln!(f, "  Medical Info: {}", summary.medical_info)?;
                writeln!(f, "Emergency Contacts")?;
                for contact in &summary.contacts {
                    writeln!(f, "  {}  {}", contact.name, contact.phone)?;
                }
                writeln!(f, "Current Medications")?;
                for medication in &summary.medications {
                    writeln!(f, "  {} ({})", medication.name, medication.dosage)?;
                }
                writeln!(f, "[ Return to Dashboard ]")
            }
        }
    }
}
