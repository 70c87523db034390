//! 占位符替换工具模块
//! 使用读数的数据点取值替换 hint 文本中的 `$name$` 占位符
//! `$ASSET$` 使用资产名替换；找不到或类型不支持的数据点保留占位符原文

use tracing::{debug, warn};

use super::value_format::format_datapoint_value;
use crate::reading::DatapointLookup;
use crate::rule::Placeholder;

/// 占位符替换工具类
pub struct PlaceholderSubstitutor;

impl PlaceholderSubstitutor {
    /// 替换 hint 文本中的占位符
    ///
    /// # 参数
    /// - `hint_text`: 规则的 hint 文本
    /// - `placeholders`: 该文本对应的占位符列表（偏移升序）
    /// - `asset_name`: 读数的资产名，用于 `$ASSET$`
    /// - `lookup`: 读数数据点查询
    ///
    /// 按偏移从右到左替换：替换会改变其后文本的长度，
    /// 先处理右侧可保证尚未处理的占位符偏移始终有效。
    pub fn substitute<L>(
        hint_text: &str,
        placeholders: &[Placeholder],
        asset_name: &str,
        lookup: &L,
    ) -> String
    where
        L: DatapointLookup + ?Sized,
    {
        debug_assert!(placeholders.windows(2).all(|w| w[0].offset < w[1].offset));

        let mut result = hint_text.to_string();
        for placeholder in placeholders.iter().rev() {
            let span = placeholder.offset..placeholder.offset + placeholder.span_len();

            // 占位符必须与本文本对应位置一致
            if result.get(span.clone()).map(|s| Self::is_span_of(s, &placeholder.name)) != Some(true) {
                warn!(
                    "Placeholder ${}$ does not match the hint text at offset {}, skipped",
                    placeholder.name, placeholder.offset
                );
                continue;
            }

            if placeholder.is_asset() {
                result.replace_range(span, asset_name);
                continue;
            }

            match lookup.datapoint(&placeholder.name) {
                None => {
                    debug!(
                        "Datapoint '{}' not found in reading for asset '{}', placeholder left unchanged",
                        placeholder.name, asset_name
                    );
                }
                Some(value) => match format_datapoint_value(value) {
                    Some(text) => result.replace_range(span, &text),
                    None => {
                        warn!(
                            "The datapoint '{}' of asset '{}' has an unsupported type ({}) and cannot be used to replace a placeholder",
                            placeholder.name,
                            asset_name,
                            value.type_name()
                        );
                    }
                },
            }
        }

        result
    }

    #[inline]
    fn is_span_of(span: &str, name: &str) -> bool {
        span.len() == name.len() + 2
            && span.starts_with('$')
            && span.ends_with('$')
            && &span[1..span.len() - 1] == name
    }
}
