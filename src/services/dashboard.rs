//! Dashboard
//!
//! Read-only summary of the profile, preferred hospitals and medications,
//! plus the four entry points (loud SOS, silent SOS, and one per editor).
//! Triggering an action never touches the data; it only calls back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Hospital, Medication, UserProfile};
use crate::services::events::{EditorKind, SosMode};

/// Dashboard action callbacks
pub struct DashboardCallbacks {
    pub on_trigger_sos: Box<dyn Fn(bool) + Send>,
    pub on_edit_profile: Box<dyn Fn() + Send>,
    pub on_edit_hospitals: Box<dyn Fn() + Send>,
    pub on_edit_medications: Box<dyn Fn() + Send>,
}

impl fmt::Debug for DashboardCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DashboardCallbacks")
    }
}

/// Profile card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub name: String,
    pub address: String,
    pub medical_info: String,
    pub emergency_contact_count: usize,
}

/// Hospitals card, truncated to the preview limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalsCard {
    pub shown: Vec<String>,
    /// Number of hospitals not shown, if any
    pub more: Option<usize>,
}

/// One medication row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationLine {
    pub name: String,
    /// "<dosage> - <schedule>"
    pub detail: String,
}

/// Rendered dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub profile: ProfileCard,
    pub hospitals: HospitalsCard,
    pub medications: Vec<MedicationLine>,
}

/// Dashboard over borrowed application data
pub struct Dashboard<'a> {
    profile: &'a UserProfile,
    hospitals: &'a [Hospital],
    medications: &'a [Medication],
    preview_limit: usize,
    callbacks: &'a DashboardCallbacks,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        profile: &'a UserProfile,
        hospitals: &'a [Hospital],
        medications: &'a [Medication],
        preview_limit: usize,
        callbacks: &'a DashboardCallbacks,
    ) -> Self {
        Self {
            profile,
            hospitals,
            medications,
            preview_limit,
            callbacks,
        }
    }

    /// Build the summary view
    pub fn view(&self) -> DashboardView {
        let shown = self
            .hospitals
            .iter()
            .take(self.preview_limit)
            .map(|h| h.name.clone())
            .collect();
        let hidden = self.hospitals.len().saturating_sub(self.preview_limit);

        DashboardView {
            profile: ProfileCard {
                name: self.profile.name.clone(),
                address: self.profile.address.clone(),
                medical_info: self.profile.medical_info.clone(),
                emergency_contact_count: self.profile.emergency_contacts.len(),
            },
            hospitals: HospitalsCard {
                shown,
                more: (hidden > 0).then_some(hidden),
            },
            medications: self
                .medications
                .iter()
                .map(|m| MedicationLine {
                    name: m.name.clone(),
                    detail: format!("{} - {}", m.dosage, m.schedule),
                })
                .collect(),
        }
    }

    /// "EMERGENCY SOS" / "SILENT SOS" buttons
    pub fn trigger_sos(&self, silent: bool) {
        tracing::info!("Dashboard: SOS triggered ({})", SosMode::from_silent(silent));
        (self.callbacks.on_trigger_sos)(silent);
    }

    /// Edit buttons on each card
    pub fn edit(&self, kind: EditorKind) {
        tracing::debug!("Dashboard: edit {} requested", kind);
        match kind {
            EditorKind::Profile => (self.callbacks.on_edit_profile)(),
            EditorKind::Hospitals => (self.callbacks.on_edit_hospitals)(),
            EditorKind::Medications => (self.callbacks.on_edit_medications)(),
        }
    }

    pub fn edit_profile(&self) {
        self.edit(EditorKind::Profile);
    }

    pub fn edit_hospitals(&self) {
        self.edit(EditorKind::Hospitals);
    }

    pub fn edit_medications(&self) {
        self.edit(EditorKind::Medications);
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ EMERGENCY SOS ]   [ SILENT SOS ]")?;
        writeln!(f)?;
        writeln!(f, "Profile")?;
        writeln!(f, "  Name: {}", self.profile.name)?;
        writeln!(f, "  Address: {}", self.profile.address)?;
        writeln!(f, "  Medical Info: {}", self.profile.medical_info)?;
        writeln!(f, "  Emergency Contacts: {}", self.profile.emergency_contact_count)?;
        writeln!(f)?;
        writeln!(f, "Hospitals")?;
        for name in &self.hospitals.shown {
            writeln!(f, "  • {}", name)?;
        }
        if let Some(more) = self.hospitals.more {
            writeln!(f, "  + {} more...", more)?;
        }
        writeln!(f)?;
        writeln!(f, "Medications")?;
        for line in &self.medications {
            writeln!(f, "  {} ({})", line.name, line.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppState, EmergencyContact};
    use std::sync::{Arc, Mutex};

    fn recording_callbacks() -> (DashboardCallbacks, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sos = log.clone();
        let profile = log.clone();
        let hospitals = log.clone();
        let medications = log.clone();
        let callbacks = DashboardCallbacks {
            on_trigger_sos: Box::new(move |silent| sos.lock().unwrap().push(format!("sos:{}", silent))),
            on_edit_profile: Box::new(move || profile.lock().unwrap().push("profile".into())),
            on_edit_hospitals: Box::new(move || hospitals.lock().unwrap().push("hospitals".into())),
            on_edit_medications: Box::new(move || medications.lock().unwrap().push("medications".into())),
        };
        (callbacks, log)
    }

    #[test]
    fn test_view_truncates_hospitals() {
        let state = AppState::sample();
        let (callbacks, _) = recording_callbacks();
        let dashboard = Dashboard::new(&state.profile, &state.hospitals, &state.medications, 3, &callbacks);

        let view = dashboard.view();
        assert_eq!(view.hospitals.shown.len(), 3);
        assert_eq!(view.hospitals.shown[0], "Springfield General Hospital");
        assert_eq!(view.hospitals.more, Some(1));
        assert!(view.to_string().contains("+ 1 more..."));
    }

    #[test]
    fn test_view_without_overflow() {
        let state = AppState::sample();
        let (callbacks, _) = recording_callbacks();
        let dashboard = Dashboard::new(&state.profile, &state.hospitals[..3], &state.medications, 3, &callbacks);

        let view = dashboard.view();
        assert_eq!(view.hospitals.more, None);
        assert!(!view.to_string().contains("more..."));
    }

    #[test]
    fn test_profile_card_counts_contacts() {
        let profile = UserProfile::new("Jane", "1 Main St", "None")
            .with_contact(EmergencyContact::new("A", "1", None))
            .with_contact(EmergencyContact::new("B", "2", None));
        let medications = vec![Medication::new("Metformin", "500mg", "Twice daily")];
        let (callbacks, _) = recording_callbacks();
        let dashboard = Dashboard::new(&profile, &[], &medications, 3, &callbacks);

        let view = dashboard.view();
        assert_eq!(view.profile.emergency_contact_count, 2);
        assert!(view.hospitals.shown.is_empty());
        assert_eq!(view.medications[0].detail, "500mg - Twice daily");
    }

    #[test]
    fn test_actions_only_call_back() {
        let state = AppState::sample();
        let before = state.clone();
        let (callbacks, log) = recording_callbacks();
        let dashboard = Dashboard::new(&state.profile, &state.hospitals, &state.medications, 3, &callbacks);

        dashboard.trigger_sos(false);
        dashboard.trigger_sos(true);
        dashboard.edit_profile();
        dashboard.edit_hospitals();
        dashboard.edit_medications();

        assert_eq!(
            log.lock().unwrap().as_slice(),
            &["sos:false", "sos:true", "profile", "hospitals", "medications"]
        );
        assert_eq!(state, before);
    }
}
