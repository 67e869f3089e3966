//! 可观测性模块
//!
//! 提供结构化日志初始化和简单的应用指标。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{AppError, Result};
use crate::services::events::{EditorKind, SosMode};

// ===== Simple Metrics =====

/// 简单应用指标
#[derive(Clone, Default, Debug)]
pub struct AppMetrics {
    pub sos_loud_total: Arc<AtomicU64>,
    pub sos_silent_total: Arc<AtomicU64>,
    pub wizards_completed_total: Arc<AtomicU64>,
    pub profile_saves_total: Arc<AtomicU64>,
    pub hospital_saves_total: Arc<AtomicU64>,
    pub medication_saves_total: Arc<AtomicU64>,
    pub edits_cancelled_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 SOS 触发
    pub fn record_sos(&self, mode: SosMode) {
        let counter = match mode {
            SosMode::Loud => &self.sos_loud_total,
            SosMode::Silent => &self.sos_silent_total,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录向导完成
    pub fn record_wizard_completed(&self) {
        self.wizards_completed_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录保存
    pub fn record_save(&self, kind: EditorKind) {
        let counter = match kind {
            EditorKind::Profile => &self.profile_saves_total,
            EditorKind::Hospitals => &self.hospital_saves_total,
            EditorKind::Medications => &self.medication_saves_total,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录取消编辑
    pub fn record_cancel(&self) {
        self.edits_cancelled_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP sos_triggered_total SOS triggers by mode
# TYPE sos_triggered_total counter
sos_triggered_total{{mode="loud"}} {}
sos_triggered_total{{mode="silent"}} {}
# HELP wizards_completed_total Emergency wizards returned to the dashboard
# TYPE wizards_completed_total counter
wizards_completed_total {}
# HELP records_saved_total Editor saves by record type
# TYPE records_saved_total counter
records_saved_total{{editor="profile"}} {}
records_saved_total{{editor="hospitals"}} {}
records_saved_total{{editor="medications"}} {}
# HELP edits_cancelled_total Editor sessions discarded
# TYPE edits_cancelled_total counter
edits_cancelled_total {}
"#,
            self.sos_loud_total.load(Ordering::SeqCst),
            self.sos_silent_total.load(Ordering::SeqCst),
            self.wizards_completed_total.load(Ordering::SeqCst),
            self.profile_saves_total.load(Ordering::SeqCst),
            self.hospital_saves_total.load(Ordering::SeqCst),
            self.medication_saves_total.load(Ordering::SeqCst),
            self.edits_cancelled_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Structured Logging =====

/// 初始化结构化日志
///
/// `RUST_LOG` 优先于配置中的日志级别。
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let result = if config.structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| AppError::Internal(format!("Failed to set tracing subscriber: {}", e)))
}
