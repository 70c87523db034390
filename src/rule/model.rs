//! 规则数据模型定义
//! 仅存储编译后的规则数据，匹配逻辑见 filter::resolver

use std::collections::HashMap;

use crate::compiler::CompiledPattern;

/// 保留占位符：使用读数的资产名替换
pub const ASSET_PLACEHOLDER: &str = "ASSET";

/// 资产匹配方式
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// 精确匹配（资产名完全相等）
    Literal(String),
    /// 正则全串匹配
    Pattern(CompiledPattern),
}

impl RulePattern {
    /// 配置中的原始 key
    pub fn source(&self) -> &str {
        match self {
            RulePattern::Literal(name) => name,
            RulePattern::Pattern(compiled) => compiled.original(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, RulePattern::Literal(_))
    }

    /// 判断资产名是否匹配
    pub fn is_match(&self, asset_name: &str) -> bool {
        match self {
            RulePattern::Literal(name) => name == asset_name,
            RulePattern::Pattern(compiled) => compiled.is_full_match(asset_name),
        }
    }
}

/// 占位符：`$name$`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// 起始 `$` 在 hint 文本中的字节偏移
    pub offset: usize,
}

impl Placeholder {
    pub fn new(name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// 占位符在文本中的完整长度（两个分隔符 + 名称）
    #[inline]
    pub fn span_len(&self) -> usize {
        self.name.len() + 2
    }

    #[inline]
    pub fn is_asset(&self) -> bool {
        self.name == ASSET_PLACEHOLDER
    }
}

/// 编译后的单条 hint 规则
#[derive(Debug, Clone)]
pub struct HintRule {
    pub pattern: RulePattern,
    /// 已转义的 hint JSON 文本
    pub hint_text: String,
    /// 按偏移升序排列，仅对本规则的 hint_text 有效
    pub placeholders: Vec<Placeholder>,
}

impl HintRule {
    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }
}

/// 规则表：精确匹配索引 + 按配置顺序排列的正则规则
///
/// 每次（重新）配置时整体重建，构建完成后只读。
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    pub literal_index: HashMap<String, HintRule>,
    pub pattern_rules: Vec<HintRule>,
}

impl RuleTable {
    /// 空规则表：不匹配任何资产
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.literal_index.is_empty() && self.pattern_rules.is_empty()
    }

    /// 规则总数
    pub fn len(&self) -> usize {
        self.literal_index.len() + self.pattern_rules.len()
    }

    pub fn literal_count(&self) -> usize {
        self.literal_index.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_rules.len()
    }

    /// 所有规则中的占位符总数
    pub fn placeholder_count(&self) -> usize {
        self.literal_index
            .values()
            .chain(self.pattern_rules.iter())
            .map(|rule| rule.placeholders.len())
            .sum()
    }
}
