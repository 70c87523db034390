//! 规则解析器：按资产名在规则表中查找 hint 规则

use crate::rule::{HintRule, RuleTable};

/// 规则解析器
pub struct RuleResolver;

impl RuleResolver {
    /// 查找资产名对应的规则
    ///
    /// 1. 精确匹配优先，命中即返回；
    /// 2. 否则按配置顺序返回第一个全串匹配的正则规则；
    /// 3. 都不匹配返回 None。
    pub fn resolve<'a>(table: &'a RuleTable, asset_name: &str) -> Option<&'a HintRule> {
        if let Some(rule) = table.literal_index.get(asset_name) {
            return Some(rule);
        }
        table
            .pattern_rules
            .iter()
            .find(|rule| rule.pattern.is_match(asset_name))
    }
}
