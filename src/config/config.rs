use serde::{Deserialize, Serialize};

/// 紧急向导配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// 激活提示停留时间（毫秒），之后自动进入症状描述
    pub activation_delay_ms: u64,
    /// 模拟症状分析耗时（毫秒）
    pub analysis_delay_ms: u64,
    /// 未配置医院时显示的占位文字
    pub no_hospital_fallback: String,
    /// 固定的严重程度标签
    pub severity: String,
    /// 推荐科室
    pub department: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: 3000,
            analysis_delay_ms: 2000,
            no_hospital_fallback: "No hospitals configured".into(),
            severity: "Moderate".into(),
            department: "Emergency Room".into(),
        }
    }
}

/// 仪表盘配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// 医院卡片最多显示的条目数
    pub hospital_preview_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            hospital_preview_limit: 3,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式（JSON）
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 紧急向导配置
    pub wizard: WizardConfig,
    /// 仪表盘配置
    pub dashboard: DashboardConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            wizard: WizardConfig::default(),
            dashboard: DashboardConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
            },
            app_name: "lifeline".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config
    }
}
