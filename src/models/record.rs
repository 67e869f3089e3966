//! 可编辑记录抽象
//!
//! 联系人、医院、药品三种列表条目共享同一套生命周期：
//! 新增时生成唯一 ID 与空字段，按字段覆盖，按下标删除。

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ValidationError, ValidationResult};

/// 与浏览器 `type="email"` 相同的规则（WHATWG valid e-mail address）
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

/// 生成记录唯一标识
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 列表编辑器可管理的记录
pub trait Record: Clone + fmt::Debug + PartialEq + Send + 'static {
    /// 可单独覆盖的文本字段
    type Field: Copy + fmt::Debug + fmt::Display + PartialEq + Send + 'static;

    /// 带新 ID、所有文本字段为空的记录
    fn blank() -> Self;

    /// 记录唯一标识
    fn id(&self) -> &str;

    /// 读取字段值；缺省的可选字段视为空串
    fn field(&self, field: Self::Field) -> &str;

    /// 覆盖单个字段，其余字段保持不变
    fn set_field(&mut self, field: Self::Field, value: String);

    /// 提交时不能为空的字段
    fn required_fields() -> &'static [Self::Field];

    /// 按 `required` 语义校验，`path` 为错误信息中的字段前缀
    fn validate(&self, path: &str) -> ValidationResult<()> {
        for &field in Self::required_fields() {
            require(path, field, self.field(field))?;
        }
        Ok(())
    }
}

/// 必填字段校验：与 HTML `required` 一致，只拒绝空串
pub fn require(path: &str, field: impl fmt::Display, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::MissingField {
            field: field_path(path, field),
        });
    }
    Ok(())
}

/// 可选邮箱字段校验：为空时跳过
pub fn validate_email(path: &str, field: impl fmt::Display, value: &str) -> ValidationResult<()> {
    if value.is_empty() || EMAIL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            field: field_path(path, field),
            value: value.to_string(),
        })
    }
}

fn field_path(path: &str, field: impl fmt::Display) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}
