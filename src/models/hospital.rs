//! 首选医院数据模型

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{Record, new_record_id};

/// 首选医院，列表中第一家视为“最近医院”
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    /// 医院唯一标识
    pub id: String,

    /// 名称
    pub name: String,

    /// 地址
    pub address: String,
}

/// 医院字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HospitalField {
    Name,
    Address,
}

impl fmt::Display for HospitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HospitalField::Name => f.write_str("name"),
            HospitalField::Address => f.write_str("address"),
        }
    }
}

impl std::str::FromStr for HospitalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(HospitalField::Name),
            "address" => Ok(HospitalField::Address),
            other => Err(format!("unknown hospital field: {}", other)),
        }
    }
}

impl Hospital {
    pub fn new(name: &str, address: &str) -> Self {
        Self {
            id: new_record_id(),
            name: name.to_string(),
            address: address.to_string(),
        }
    }
}

impl Record for Hospital {
    type Field = HospitalField;

    fn blank() -> Self {
        Self::new("", "")
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: HospitalField) -> &str {
        match field {
            HospitalField::Name => &self.name,
            HospitalField::Address => &self.address,
        }
    }

    fn set_field(&mut self, field: HospitalField, value: String) {
        match field {
            HospitalField::Name => self.name = value,
            HospitalField::Address => self.address = value,
        }
    }

    fn required_fields() -> &'static [HospitalField] {
        &[HospitalField::Name, HospitalField::Address]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_hospital() {
        let hospital = Hospital::blank();
        assert!(!hospital.id.is_empty());
        assert!(hospital.name.is_empty());
        assert!(hospital.validate("hospitals[0]").is_err());
    }

    #[test]
    fn test_set_field_keeps_other_fields() {
        let mut hospital = Hospital::new("General", "12 Oak Ave");
        let id = hospital.id.clone();
        hospital.set_field(HospitalField::Name, "St. Mary".to_string());

        assert_eq!(hospital.id, id);
        assert_eq!(hospital.name, "St. Mary");
        assert_eq!(hospital.address, "12 Oak Ave");
        assert!(hospital.validate("").is_ok());
    }
}
