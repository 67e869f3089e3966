//! 药品数据模型

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{Record, new_record_id};

/// 当前用药
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// 药品唯一标识
    pub id: String,

    /// 药名
    pub name: String,

    /// 剂量，例如 "10mg"
    pub dosage: String,

    /// 服用频次，例如 "Twice daily"
    pub schedule: String,
}

/// 药品字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MedicationField {
    Name,
    Dosage,
    Schedule,
}

impl fmt::Display for MedicationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MedicationField::Name => "name",
            MedicationField::Dosage => "dosage",
            MedicationField::Schedule => "schedule",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MedicationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(MedicationField::Name),
            "dosage" => Ok(MedicationField::Dosage),
            "schedule" => Ok(MedicationField::Schedule),
            other => Err(format!("unknown medication field: {}", other)),
        }
    }
}

impl Medication {
    pub fn new(name: &str, dosage: &str, schedule: &str) -> Self {
        Self {
            id: new_record_id(),
            name: name.to_string(),
            dosage: dosage.to_string(),
            schedule: schedule.to_string(),
        }
    }
}

impl Record for Medication {
    type Field = MedicationField;

    fn blank() -> Self {
        Self::new("", "", "")
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: MedicationField) -> &str {
        match field {
            MedicationField::Name => &self.name,
            MedicationField::Dosage => &self.dosage,
            MedicationField::Schedule => &self.schedule,
        }
    }

    fn set_field(&mut self, field: MedicationField, value: String) {
        match field {
            MedicationField::Name => self.name = value,
            MedicationField::Dosage => self.dosage = value,
            MedicationField::Schedule => self.schedule = value,
        }
    }

    fn required_fields() -> &'static [MedicationField] {
        &[
            MedicationField::Name,
            MedicationField::Dosage,
            MedicationField::Schedule,
        ]
    }
}
