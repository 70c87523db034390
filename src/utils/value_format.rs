//! 数据点取值格式化
//! 将字符串/整数/浮点数据点转换为替换占位符用的文本

use crate::reading::DatapointValue;

/// 数据点取值转文本
///
/// - 字符串：原样返回
/// - 整数：十进制，无前导零
/// - 浮点：定点小数，保留 6 位
/// - 其他类型：None（无法用于替换）
pub fn format_datapoint_value(value: &DatapointValue) -> Option<String> {
    match value {
        DatapointValue::String(s) => Some(s.clone()),
        DatapointValue::Integer(i) => Some(i.to_string()),
        DatapointValue::Float(f) => Some(format_float(*f)),
        DatapointValue::Other(_) => None,
    }
}

/// 浮点数定点格式（6 位小数）
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    format!("{:.6}", value)
}
