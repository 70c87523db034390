//! 工具模块：占位符替换、数据点取值格式化
pub mod substitution;
pub mod value_format;

#[cfg(test)]
pub(crate) mod log_capture;

// 导出核心接口
pub use self::substitution::PlaceholderSubstitutor;
pub use self::value_format::{format_datapoint_value, format_float};
