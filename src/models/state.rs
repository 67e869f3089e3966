//! 应用状态快照
//!
//! 资料、医院、药品三者的应用级副本。本层不负责持久化。

use serde::{Deserialize, Serialize};

use super::hospital::Hospital;
use super::medication::Medication;
use super::profile::{EmergencyContact, UserProfile};

/// 应用持有的全部记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// 用户资料
    pub profile: UserProfile,

    /// 首选医院（第一家为最近医院）
    pub hospitals: Vec<Hospital>,

    /// 当前用药
    pub medications: Vec<Medication>,
}

impl AppState {
    pub fn new(profile: UserProfile, hospitals: Vec<Hospital>, medications: Vec<Medication>) -> Self {
        Self {
            profile,
            hospitals,
            medications,
        }
    }

    /// 演示数据
    pub fn sample() -> Self {
        let profile = UserProfile::new(
            "Alex Morgan",
            "42 Harbor Street, Springfield",
            "Type 1 diabetes. Allergic to penicillin.",
        )
        .with_contact(EmergencyContact::new(
            "Sam Morgan",
            "+1 555 0100",
            Some("sam.morgan@example.com"),
        ))
        .with_contact(EmergencyContact::new("Dr. Lee", "+1 555 0199", None));

        let hospitals = vec![
            Hospital::new("Springfield General Hospital", "100 Main Street"),
            Hospital::new("St. Mary Medical Center", "8 Elm Avenue"),
            Hospital::new("Riverside Clinic", "55 River Road"),
            Hospital::new("Northside Urgent Care", "301 North Boulevard"),
        ];

        let medications = vec![
            Medication::new("Insulin glargine", "20 units", "Once daily at bedtime"),
            Medication::new("Metformin", "500mg", "Twice daily"),
        ];

        Self::new(profile, hospitals, medications)
    }

    /// 最近医院名称（列表第一家；名称为空时视为未配置）
    pub fn nearest_hospital(&self) -> Option<&str> {
        self.hospitals
            .first()
            .map(|h| h.name.as_str())
            .filter(|name| !name.is_empty())
    }
}
