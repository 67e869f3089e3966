//! 应用事件
//!
//! 组件回调和定时器都只向事件队列投递事件，由宿主在单线程里依次应用。

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::{Hospital, Medication, UserProfile};
use crate::services::scheduler::TimerId;

/// SOS 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SosMode {
    /// 普通求救：联系急救服务
    Loud,
    /// 静默求救：悄悄通知紧急联系人
    Silent,
}

impl SosMode {
    pub fn from_silent(silent: bool) -> Self {
        if silent { SosMode::Silent } else { SosMode::Loud }
    }

    pub fn is_silent(self) -> bool {
        self == SosMode::Silent
    }
}

impl fmt::Display for SosMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SosMode::Loud => f.write_str("loud"),
            SosMode::Silent => f.write_str("silent"),
        }
    }
}

/// 编辑器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Profile,
    Hospitals,
    Medications,
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditorKind::Profile => "profile",
            EditorKind::Hospitals => "hospitals",
            EditorKind::Medications => "medications",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for EditorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "profile" => Ok(EditorKind::Profile),
            "hospitals" | "hospital" => Ok(EditorKind::Hospitals),
            "medications" | "medication" | "meds" => Ok(EditorKind::Medications),
            other => Err(format!("unknown editor: {}", other)),
        }
    }
}

/// 应用事件
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// 仪表盘请求进入紧急向导
    SosTriggered(SosMode),
    /// 仪表盘请求打开编辑器
    EditRequested(EditorKind),
    /// 资料编辑器提交
    ProfileSaved(UserProfile),
    /// 医院编辑器提交
    HospitalsSaved(Vec<Hospital>),
    /// 药品编辑器提交
    MedicationsSaved(Vec<Medication>),
    /// 编辑器取消
    EditCancelled(EditorKind),
    /// 单次定时器到期
    TimerElapsed(TimerId),
    /// 向导在总结页返回仪表盘
    EmergencyCompleted,
}

/// 事件接收端
pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

/// 事件投递端，可自由克隆进回调闭包
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventSink {
    /// 创建事件通道
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 投递事件；接收端已关闭时丢弃
    pub fn emit(&self, event: AppEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Event receiver closed, dropping {:?}", e.0);
        }
    }

    /// 接收端是否已关闭
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
