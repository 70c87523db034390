//! 规则编译器核心
//! 将 hints 配置（资产 key -> hint JSON）编译为规则表

use std::borrow::Cow;
use std::fmt;
use std::time::Instant;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::error::Category;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::pattern::{classify, CompiledPattern, KeyKind};
use crate::error::{OmfHintError, OmfResult};
use crate::rule::{HintRule, Placeholder, RulePattern, RuleTable};

/// 日志中 hint 文本的最大预览长度
const HINT_PREVIEW_LEN: usize = 80;

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 从 hints JSON 文本编译规则表
    ///
    /// 仅整体 JSON 解析失败（或顶层不是对象）时返回错误；单条正则非法不会报错。
    pub fn compile_str(hints_json: &str) -> OmfResult<RuleTable> {
        let members: HintMembers = serde_json::from_str(hints_json).map_err(|e| match e.classify() {
            // 语法正确但顶层不是对象
            Category::Data => OmfHintError::InvalidHints(e.to_string()),
            _ => OmfHintError::hints_parse(hints_json, &e),
        })?;

        Ok(Self::compile_members(
            members.0.iter().map(|(key, value)| (key.as_str(), value)),
        ))
    }

    /// 编译 hints 对象（按成员声明顺序）
    pub fn compile(hints: &Map<String, Value>) -> RuleTable {
        Self::compile_members(hints.iter().map(|(key, value)| (key.as_str(), value)))
    }

    /// 按给定顺序编译 (资产 key, hint 值) 成员，重复 key 各自处理
    pub fn compile_members<'a, I>(members: I) -> RuleTable
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let start = Instant::now();
        let mut table = RuleTable::empty();
        let mut stats = CompileStats::default();

        for (asset_key, hint_value) in members {
            // 1. 序列化为紧凑 JSON 并转义双引号
            let hint_text = escape_hint(&compact_json(hint_value));
            // 2. 提取本规则的占位符
            let placeholders = extract_placeholders(&hint_text);
            stats.placeholder_count += placeholders.len();

            // 3. 按 key 类型分别登记
            match classify(asset_key) {
                KeyKind::Literal => {
                    Self::insert_literal(&mut table, asset_key, hint_text, placeholders);
                    stats.literal_count += 1;
                }
                KeyKind::Pattern => match CompiledPattern::compile(asset_key) {
                    Ok(compiled) => {
                        debug!(
                            "Pattern rule: key={} regex={} hint={}",
                            asset_key,
                            compiled.describe(),
                            hint_preview(&hint_text)
                        );
                        table.pattern_rules.push(HintRule {
                            pattern: RulePattern::Pattern(compiled),
                            hint_text,
                            placeholders,
                        });
                        stats.pattern_count += 1;
                    }
                    Err(e) => {
                        // 正则非法：降级为精确匹配规则，不丢弃
                        warn!(
                            "Invalid regular expression for asset '{}', treating it as a literal asset name: {}",
                            asset_key, e
                        );
                        Self::insert_literal(&mut table, asset_key, hint_text, placeholders);
                        stats.fallback_count += 1;
                    }
                },
            }
        }

        debug!(
            "OMF hints compiled in {:?}: {} literal, {} pattern, {} literal fallback, {} placeholders",
            start.elapsed(),
            stats.literal_count,
            stats.pattern_count,
            stats.fallback_count,
            stats.placeholder_count
        );

        table
    }

    /// 同名 key 后写覆盖
    fn insert_literal(
        table: &mut RuleTable,
        asset_key: &str,
        hint_text: String,
        placeholders: Vec<Placeholder>,
    ) {
        debug!(
            "Literal rule: asset={} hint={}",
            asset_key,
            hint_preview(&hint_text)
        );
        table.literal_index.insert(
            asset_key.to_string(),
            HintRule {
                pattern: RulePattern::Literal(asset_key.to_string()),
                hint_text,
                placeholders,
            },
        );
    }
}

/// 紧凑序列化 JSON 值（无多余空白）
fn compact_json(value: &Value) -> String {
    // Value 的 Display 实现即紧凑格式，不会失败
    value.to_string()
}

/// 将每个 `"` 替换为 `\"`，使 hint 可嵌入单个字符串值
pub fn escape_hint(hint: &str) -> String {
    hint.replace('"', "\\\"")
}

/// 扫描 `$name$` 形式的占位符
///
/// 从左到右成对查找 `$`：两个 `$` 之间至少有一个字符时记录占位符，
/// 相邻的 `$$` 视为空占位符跳过；末尾落单的 `$` 保留为普通文本。
pub fn extract_placeholders(hint_text: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    // 少于两个 `$` 不可能构成占位符
    if hint_text.bytes().filter(|&b| b == b'$').take(2).count() < 2 {
        return placeholders;
    }

    let mut pos = 0;
    while let Some(start) = find_dollar(hint_text, pos) {
        let Some(end) = find_dollar(hint_text, start + 1) else {
            break;
        };
        if end - start > 1 {
            placeholders.push(Placeholder::new(&hint_text[start + 1..end], start));
        }
        pos = end + 1;
    }

    placeholders
}

#[inline]
fn find_dollar(s: &str, from: usize) -> Option<usize> {
    s.get(from..)?.find('$').map(|i| i + from)
}

/// 日志中截断较长的 hint 文本（hint 已是紧凑 JSON，无需折叠空白）
fn hint_preview(hint_text: &str) -> Cow<'_, str> {
    match hint_text.char_indices().nth(HINT_PREVIEW_LEN) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &hint_text[..cut])),
        None => Cow::Borrowed(hint_text),
    }
}

/// hints 顶层对象的成员列表
///
/// 按文档顺序保留所有成员，包括重复的 key（`Map` 会合并重复 key）。
struct HintMembers(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for HintMembers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = HintMembers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object mapping asset names to hints")
            }

            fn visit_map<A>(self, mut access: A) -> Result<HintMembers, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut members = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    members.push((key, value));
                }
                Ok(HintMembers(members))
            }
        }

        deserializer.deserialize_map(MembersVisitor)
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    literal_count: usize,
    pattern_count: usize,
    fallback_count: usize,
    placeholder_count: usize,
}
