//! Symptom assessment and emergency dispatch seams
//!
//! Both collaborators are placeholders today: the assessment is a fixed
//! label taken from configuration and dispatch only produces the
//! acknowledgment shown to the user. Real integrations implement the traits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::WizardConfig;
use crate::error::Result;
use crate::services::events::SosMode;

/// Result of analysing the described symptoms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Severity label, e.g. "Moderate"
    pub severity: String,
    /// Explanation shown under the label
    pub summary: String,
    /// Recommended department
    pub department: String,
}

/// Turns a symptom description into an assessment
pub trait SymptomAnalyzer: Send + Sync {
    fn assess(&self, symptoms: &str) -> Assessment;
}

/// Analyzer that always returns the configured assessment
#[derive(Debug, Clone)]
pub struct FixedAnalyzer {
    severity: String,
    department: String,
}

impl FixedAnalyzer {
    pub fn new(severity: &str, department: &str) -> Self {
        Self {
            severity: severity.to_string(),
            department: department.to_string(),
        }
    }

    pub fn from_config(config: &WizardConfig) -> Self {
        Self::new(&config.severity, &config.department)
    }
}

impl SymptomAnalyzer for FixedAnalyzer {
    fn assess(&self, symptoms: &str) -> Assessment {
        tracing::debug!("Assessing {} chars of symptom text", symptoms.chars().count());
        Assessment {
            severity: self.severity.clone(),
            summary: format!(
                "Based on your symptoms, this appears to be a {} emergency requiring immediate medical attention.",
                self.severity.to_lowercase()
            ),
            department: self.department.clone(),
        }
    }
}

/// What a dispatcher is told when the user asks for emergency services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub mode: SosMode,
    pub name: String,
    pub address: String,
    pub medical_info: String,
    /// First preferred hospital, if any
    pub nearest_hospital: Option<String>,
    pub assessment: Option<Assessment>,
    pub requested_at: DateTime<Utc>,
}

/// Contacts emergency services; returns the acknowledgment shown to the user
#[cfg_attr(test, mockall::automock)]
pub trait EmergencyDispatcher: Send + Sync {
    fn notify(&self, request: &DispatchRequest) -> Result<String>;
}

/// Dispatcher that contacts nobody
#[derive(Debug, Clone, Default)]
pub struct PlaceholderDispatcher;

pub const DISPATCH_ACKNOWLEDGMENT: &str = "Emergency services have been notified!";

impl EmergencyDispatcher for PlaceholderDispatcher {
    fn notify(&self, request: &DispatchRequest) -> Result<String> {
        tracing::warn!(
            mode = %request.mode,
            nearest_hospital = ?request.nearest_hospital,
            "No emergency dispatcher configured; acknowledging without contacting anyone"
        );
        Ok(DISPATCH_ACKNOWLEDGMENT.to_string())
    }
}
