use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LIFELINE_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 内置默认值
    /// 2. ./lifeline.toml
    /// 3. 环境变量 `LIFELINE_*`，嵌套字段以 `__` 分隔
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.wizard.no_hospital_fallback.is_empty() {
            return Err(ConfigValidationError::EmptyHospitalFallback);
        }

        if config.dashboard.hospital_preview_limit == 0 {
            return Err(ConfigValidationError::InvalidPreviewLimit);
        }

        if config.wizard.severity.is_empty() || config.wizard.department.is_empty() {
            return Err(ConfigValidationError::EmptyAssessment);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("未配置医院时的占位文字不能为空")]
    EmptyHospitalFallback,

    #[error("医院预览条目数无效，必须大于 0")]
    InvalidPreviewLimit,

    #[error("严重程度标签和推荐科室不能为空")]
    EmptyAssessment,
}

impl From<ConfigValidationError> for crate::error::AppError {
    fn from(e: ConfigValidationError) -> Self {
        crate::error::AppError::Config(e.to_string())
    }
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("lifeline.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load()?;
            assert_eq!(config.wizard.activation_delay_ms, 3000);
            assert_eq!(config.wizard.analysis_delay_ms, 2000);
            assert_eq!(config.wizard.no_hospital_fallback, "No hospitals configured");
            assert_eq!(config.dashboard.hospital_preview_limit, 3);
            assert!(!config_exists());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "lifeline.toml",
                r#"
                    environment = "staging"

                    [wizard]
                    activation_delay_ms = 1500
                    severity = "Severe"

                    [dashboard]
                    hospital_preview_limit = 5
                "#,
            )?;
            jail.set_env("LIFELINE_WIZARD__ACTIVATION_DELAY_MS", "250");

            let config = ConfigLoader::load()?;
            assert_eq!(config.environment, "staging");
            assert_eq!(config.wizard.activation_delay_ms, 250);
            assert_eq!(config.wizard.severity, "Severe");
            assert_eq!(config.wizard.analysis_delay_ms, 2000);
            assert_eq!(config.dashboard.hospital_preview_limit, 5);
            Ok(())
        });
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::development();
        assert!(ConfigLoader::validate(&config).is_ok());

        config.dashboard.hospital_preview_limit = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPreviewLimit)
        ));

        let mut config = AppConfig::production();
        config.wizard.no_hospital_fallback.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::EmptyHospitalFallback)
        ));
    }
}
