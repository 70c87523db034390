//! 规则模块：编译后的 hint 规则数据模型
pub mod model;

// 导出核心接口
pub use self::model::{HintRule, Placeholder, RulePattern, RuleTable, ASSET_PLACEHOLDER};
