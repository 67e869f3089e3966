//! 用户资料数据模型
//!
//! 存储用户的基本信息、病史说明和紧急联系人

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{Record, new_record_id, require, validate_email};
use crate::error::ValidationResult;

/// 用户资料
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 姓名
    pub name: String,

    /// 住址
    pub address: String,

    /// 过敏、病史、长期用药等自由文本
    pub medical_info: String,

    /// 紧急联系人（有序）
    pub emergency_contacts: Vec<EmergencyContact>,
}

/// 紧急联系人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// 联系人唯一标识
    pub id: String,

    /// 姓名
    pub name: String,

    /// 电话
    pub phone: String,

    /// 邮箱（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// 资料标量字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Name,
    Address,
    MedicalInfo,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileField::Name => "name",
            ProfileField::Address => "address",
            ProfileField::MedicalInfo => "medicalInfo",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(ProfileField::Name),
            "address" => Ok(ProfileField::Address),
            "medicalinfo" | "medical_info" | "medical" => Ok(ProfileField::MedicalInfo),
            other => Err(format!("unknown profile field: {}", other)),
        }
    }
}

/// 联系人字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    Name,
    Phone,
    Email,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ContactField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(ContactField::Name),
            "phone" => Ok(ContactField::Phone),
            "email" => Ok(ContactField::Email),
            other => Err(format!("unknown contact field: {}", other)),
        }
    }
}

impl UserProfile {
    /// 创建资料
    pub fn new(name: &str, address: &str, medical_info: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            medical_info: medical_info.to_string(),
            emergency_contacts: Vec::new(),
        }
    }

    /// 添加联系人（构造示例数据用）
    pub fn with_contact(mut self, contact: EmergencyContact) -> Self {
        self.emergency_contacts.push(contact);
        self
    }

    /// 读取标量字段
    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Address => &self.address,
            ProfileField::MedicalInfo => &self.medical_info,
        }
    }

    /// 覆盖标量字段
    pub fn set_field(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::Address => self.address = value,
            ProfileField::MedicalInfo => self.medical_info = value,
        }
    }

    /// 校验资料及全部联系人，返回第一个不合法的字段
    pub fn validate(&self) -> ValidationResult<()> {
        require("", ProfileField::Name, &self.name)?;
        require("", ProfileField::Address, &self.address)?;
        for (index, contact) in self.emergency_contacts.iter().enumerate() {
            contact.validate(&format!("emergencyContacts[{}]", index))?;
        }
        Ok(())
    }
}

impl EmergencyContact {
    /// 创建联系人
    pub fn new(name: &str, phone: &str, email: Option<&str>) -> Self {
        Self {
            id: new_record_id(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.map(str::to_string),
        }
    }
}

impl Record for EmergencyContact {
    type Field = ContactField;

    fn blank() -> Self {
        Self {
            id: new_record_id(),
            name: String::new(),
            phone: String::new(),
            email: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => self.email.as_deref().unwrap_or(""),
        }
    }

    fn set_field(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Phone => self.phone = value,
            ContactField::Email => self.email = (!value.is_empty()).then_some(value),
        }
    }

    fn required_fields() -> &'static [ContactField] {
        &[ContactField::Name, ContactField::Phone]
    }

    fn validate(&self, path: &str) -> ValidationResult<()> {
        require(path, ContactField::Name, &self.name)?;
        require(path, ContactField::Phone, &self.phone)?;
        validate_email(path, ContactField::Email, self.field(ContactField::Email))
    }
}
