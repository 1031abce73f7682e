//! 客户端配置
//!
//! 默认值可以在构建时通过环境变量覆盖（Trunk / wasm-pack 构建时注入），
//! 也可以从运行时下发的 JSON 配置文件反序列化。

use crate::error::ConfigError;
use sensorwatch_shared::DEFAULT_TOKEN_STORAGE_KEY;
use sensorwatch_shared::protocol::SensorNameRoute;
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` 指令，如 "info" 或 "sensorwatch_frontend=debug"
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_storage_key: String,
    pub sensor_name_route: SensorNameRoute,
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            sensor_name_route: SensorNameRoute::default(),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// 读取构建时环境变量，缺省时使用默认值
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = option_env!("SENSORWATCH_API_URL") {
            config.api_base_url = url.to_string();
        }
        if let Some(key) = option_env!("SENSORWATCH_TOKEN_KEY") {
            config.token_storage_key = key.to_string();
        }
        if let Some(route) = option_env!("SENSORWATCH_SENSOR_NAME_ROUTE") {
            config.sensor_name_route = parse_sensor_name_route(route)?;
        }
        if let Some(level) = option_env!("SENSORWATCH_LOG_LEVEL") {
            config.log.level = level.to_string();
        }

        config.validate()
    }

    /// 从 JSON 文本加载（缺失字段取默认值）
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// 校验并规范化（去掉 base URL 末尾的 `/`）
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(url));
        }
        if self.token_storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.api_base_url = url;
        Ok(self)
    }
}

fn parse_sensor_name_route(value: &str) -> Result<SensorNameRoute, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "sensors" => Ok(SensorNameRoute::Sensors),
        "esp" => Ok(SensorNameRoute::Esp),
        other => Err(ConfigError::UnknownSensorNameRoute(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default().validate().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.token_storage_key, "token");
        assert_eq!(config.sensor_name_route, SensorNameRoute::Sensors);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::default()
            .with_base_url("https://api.example.com/v1/")
            .validate()
            .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
    }

    #[test]
    fn rejects_bad_urls_and_keys() {
        assert_eq!(
            ClientConfig::default().with_base_url("  ").validate(),
            Err(ConfigError::EmptyBaseUrl)
        );
        assert!(matches!(
            ClientConfig::default().with_base_url("ftp://x").validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));

        let mut config = ClientConfig::default();
        config.token_storage_key = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyStorageKey));
    }

    #[test]
    fn json_fills_missing_fields() {
        let config =
            ClientConfig::from_json(r#"{ "apiBaseUrl": "https://iot.example.com/", "sensorNameRoute": "esp" }"#)
                .unwrap();
        assert_eq!(config.api_base_url, "https://iot.example.com");
        assert_eq!(config.sensor_name_route, SensorNameRoute::Esp);
        assert_eq!(config.token_storage_key, "token");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn route_names() {
        assert_eq!(parse_sensor_name_route("ESP"), Ok(SensorNameRoute::Esp));
        assert!(parse_sensor_name_route("other").is_err());
    }
}
