//! 过滤模块：规则解析与读数注入流程
pub mod resolver;
pub mod filter;

// 导出核心接口
pub use self::resolver::RuleResolver;
pub use self::filter::{OmfHintFilter, FILTER_EVENT};
