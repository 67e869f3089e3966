//! 数据模型模块

pub mod hospital;
pub mod medication;
pub mod profile;
pub mod record;
pub mod state;

pub use hospital::{Hospital, HospitalField};
pub use medication::{Medication, MedicationField};
pub use profile::{ContactField, EmergencyContact, ProfileField, UserProfile};
pub use record::{Record, new_record_id};
pub use state::AppState;
