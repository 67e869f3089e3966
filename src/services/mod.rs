//! 服务模块

pub mod app;
pub mod dashboard;
pub mod editor;
pub mod events;
pub mod scheduler;
pub mod triage;
pub mod wizard;

pub use app::{EmergencyApp, Screen};
pub use dashboard::{Dashboard, DashboardCallbacks, DashboardView};
pub use editor::{Editor, HospitalsEditor, ListDraft, ListEditor, MedicationsEditor, ProfileEditor};
pub use events::{AppEvent, EditorKind, EventReceiver, EventSink, SosMode};
pub use scheduler::{ScheduledTimer, Scheduler, TimerId};
pub use triage::{
    Assessment, DispatchRequest, EmergencyDispatcher, FixedAnalyzer, PlaceholderDispatcher,
    SymptomAnalyzer,
};
pub use wizard::{EmergencySummary, EmergencyWizard, WizardScreen, WizardStep};
