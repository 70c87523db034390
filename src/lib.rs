//! omfhint - OMF Hint 过滤器：按资产规则为传感器读数附加 OMFHint 数据点

// 导出全局错误类型
pub use self::error::{OmfHintError, OmfResult};

// 导出配置模块
pub use self::config::{
    CategoryUpdate, ConfigManager, CustomConfigBuilder, FilterConfig, DEFAULT_HINTS, FILTER_NAME,
};

// 导出规则模块核心接口
pub use self::rule::{HintRule, Placeholder, RulePattern, RuleTable, ASSET_PLACEHOLDER};

// 导出编译模块核心接口
pub use self::compiler::{classify, escape_hint, extract_placeholders, CompiledPattern, KeyKind, RuleCompiler};

// 导出读数模块核心接口
pub use self::reading::{
    AssetTracker, AssetTrackingTuple, Datapoint, DatapointLookup, DatapointValue,
    InMemoryAssetTracker, LoggingAssetTracker, NoopAssetTracker, Reading, OMF_HINT_DATAPOINT,
};

// 导出工具模块核心接口
pub use self::utils::{format_datapoint_value, PlaceholderSubstitutor};

// 导出过滤模块核心接口
pub use self::filter::{OmfHintFilter, RuleResolver, FILTER_EVENT};

// 导出插件信息
pub use self::plugin::{plugin_info, PluginInformation, DEFAULT_CONFIG};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod reading;
pub mod utils;
pub mod filter;
pub mod plugin;
