//! 插件信息：名称、版本与默认配置分类

use serde::Serialize;

use crate::config::FILTER_NAME;

/// 默认配置分类（宿主配置格式）
pub const DEFAULT_CONFIG: &str = r#"{
    "plugin": {
        "description": "OMF Hint filter plugin, add OMF hints to one or more assets",
        "type": "string",
        "default": "omfhint",
        "readonly": "true"
    },
    "enable": {
        "description": "A switch that can be used to enable or disable execution of the filter.",
        "type": "boolean",
        "displayName": "Enabled",
        "default": "false",
        "order": "2"
    },
    "hints": {
        "description": "OMF hints to add to readings.",
        "type": "JSON",
        "order": "1",
        "displayName": "OMF Hint",
        "default": "{\"asset\":{\"number\":\"float64\"}}"
    }
}"#;

/// 插件接口版本
pub const INTERFACE_VERSION: &str = "1.0.0";

/// 插件信息
#[derive(Debug, Clone, Serialize)]
pub struct PluginInformation {
    pub name: &'static str,
    pub version: &'static str,
    pub flags: u32,
    #[serde(rename = "type")]
    pub plugin_type: &'static str,
    pub interface_version: &'static str,
    pub config: serde_json::Value,
}

/// 获取插件信息
pub fn plugin_info() -> PluginInformation {
    PluginInformation {
        name: FILTER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        flags: 0,
        plugin_type: "filter",
        interface_version: INTERFACE_VERSION,
        // DEFAULT_CONFIG 为编译期常量，解析失败时退化为 null
        config: serde_json::from_str(DEFAULT_CONFIG).unwrap_or_default(),
    }
}
