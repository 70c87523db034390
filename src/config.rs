//! 过滤器配置管理，存储所有可配置项
//! 支持宿主配置分类（category）JSON 格式解析

use serde_json::{Map, Value};

use crate::error::{OmfHintError, OmfResult};

/// 默认过滤器名称
pub const FILTER_NAME: &str = "omfhint";

/// 默认 hints 配置
pub const DEFAULT_HINTS: &str = r#"{"asset":{"number":"float64"}}"#;

/// 过滤器配置
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    // 过滤器实例名称（写入资产追踪记录）
    pub name: String,
    // 是否启用过滤
    pub enabled: bool,
    // hints 原始 JSON 文本，None 表示未配置该项
    pub hints: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            name: FILTER_NAME.to_string(),
            enabled: false,
            hints: Some(DEFAULT_HINTS.to_string()),
        }
    }
}

impl FilterConfig {
    /// 解析宿主配置分类 JSON
    ///
    /// 每个配置项是一个对象，`value` 优先于 `default`；
    /// 缺少 `hints` 项时 `hints` 为 None，缺少 `enable` 项时保持默认（禁用）。
    pub fn from_category(name: &str, category_json: &str) -> OmfResult<Self> {
        let update = CategoryUpdate::parse(category_json)?;
        Ok(Self {
            name: name.to_string(),
            enabled: update.enabled.unwrap_or(false),
            hints: update.hints,
        })
    }
}

/// 配置分类解析结果：仅包含分类中实际出现的配置项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub enabled: Option<bool>,
    pub hints: Option<String>,
}

impl CategoryUpdate {
    /// 解析配置分类 JSON
    pub fn parse(category_json: &str) -> OmfResult<Self> {
        let category: Value = serde_json::from_str(category_json)?;
        let Value::Object(items) = category else {
            return Err(OmfHintError::ConfigError(
                "configuration category must be a JSON object".to_string(),
            ));
        };

        let enabled = match item_value(&items, "enable") {
            Some(value) => Some(parse_bool(value)?),
            None => None,
        };
        let hints = match item_value(&items, "hints") {
            Some(Value::String(s)) => Some(s.clone()),
            // 内联 JSON 值，序列化回紧凑文本
            Some(other) => Some(serde_json::to_string(other)?),
            None => None,
        };

        Ok(Self { enabled, hints })
    }
}

/// 取配置项的生效值（value 优先，其次 default）
fn item_value<'a>(items: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let item = items.get(key)?;
    match item {
        Value::Object(fields) => fields.get("value").or_else(|| fields.get("default")),
        _ => None,
    }
}

fn parse_bool(value: &Value) -> OmfResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(OmfHintError::ConfigError(format!(
                "invalid boolean value for enable: {}",
                other
            ))),
        },
        other => Err(OmfHintError::ConfigError(format!(
            "invalid boolean value for enable: {}",
            other
        ))),
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> FilterConfig {
        FilterConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: FilterConfig,
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FilterConfig::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn hints(mut self, hints: impl Into<String>) -> Self {
        self.config.hints = Some(hints.into());
        self
    }

    pub fn no_hints(mut self) -> Self {
        self.config.hints = None;
        self
    }

    pub fn build(self) -> FilterConfig {
        self.config
    }
}
