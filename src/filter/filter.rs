//! OMF Hint 过滤器核心：持有当前规则表，逐条为读数附加 OMFHint 数据点
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, error, info};

use super::resolver::RuleResolver;
use crate::compiler::RuleCompiler;
use crate::config::{CategoryUpdate, FilterConfig};
use crate::error::OmfResult;
use crate::reading::{AssetTracker, Datapoint, DatapointValue, Reading, OMF_HINT_DATAPOINT};
use crate::rule::{HintRule, RuleTable};
use crate::utils::PlaceholderSubstitutor;

/// 资产追踪事件名
pub const FILTER_EVENT: &str = "Filter";

/// OMF Hint 过滤器
///
/// 规则表以 `Arc` 快照形式持有：重新配置时先完整构建新表，再整体替换引用，
/// 正在处理的批次始终看到完整的旧表或新表。
pub struct OmfHintFilter {
    name: String,
    enabled: AtomicBool,
    rules: RwLock<Arc<RuleTable>>,
    tracker: Arc<dyn AssetTracker>,
}

impl OmfHintFilter {
    /// 创建过滤器并编译初始 hints
    pub fn new(config: &FilterConfig, tracker: Arc<dyn AssetTracker>) -> Self {
        let table = match config.hints.as_deref() {
            Some(hints) => Self::build_table(hints),
            None => RuleTable::empty(),
        };

        Self {
            name: config.name.clone(),
            enabled: AtomicBool::new(config.enabled),
            rules: RwLock::new(Arc::new(table)),
            tracker,
        }
    }

    /// 由宿主配置分类 JSON 创建过滤器
    pub fn from_category(
        name: &str,
        category_json: &str,
        tracker: Arc<dyn AssetTracker>,
    ) -> OmfResult<Self> {
        let config = FilterConfig::from_category(name, category_json)?;
        Ok(Self::new(&config, tracker))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// 当前规则表快照
    pub fn rules(&self) -> Arc<RuleTable> {
        let guard = self.rules.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// 重新配置
    ///
    /// 配置分类本身解析失败时返回错误且不做任何修改；
    /// 缺少 hints 项时保留现有规则表；hints 解析失败时安装空规则表。
    pub fn reconfigure(&self, category_json: &str) -> OmfResult<()> {
        let update = CategoryUpdate::parse(category_json)?;

        if let Some(enabled) = update.enabled {
            self.set_enabled(enabled);
        }
        if let Some(hints) = update.hints.as_deref() {
            self.replace_rules(Self::build_table(hints));
        }

        info!(
            "Filter '{}' reconfigured: enabled={}, rules={}",
            self.name,
            self.is_enabled(),
            self.rules().len()
        );
        Ok(())
    }

    /// 使用新的 hints 文本替换规则表
    pub fn set_hints(&self, hints_json: &str) {
        self.replace_rules(Self::build_table(hints_json));
    }

    /// 处理一批读数，保持输入顺序，输出数量与输入一致
    ///
    /// 过滤器禁用时整批原样返回，不访问规则表。
    pub fn ingest(&self, readings: Vec<Reading>) -> Vec<Reading> {
        if !self.is_enabled() {
            return readings;
        }

        let table = self.rules();
        let mut out = Vec::with_capacity(readings.len());
        let mut annotated = 0usize;

        for mut reading in readings {
            if let Some(rule) = RuleResolver::resolve(&table, reading.asset_name()) {
                let hint = Self::render_hint(rule, &reading);
                reading.add_datapoint(Datapoint::new(
                    OMF_HINT_DATAPOINT,
                    DatapointValue::String(hint),
                ));
                self.tracker
                    .add_asset_tracking_tuple(&self.name, reading.asset_name(), FILTER_EVENT);
                annotated += 1;
            }
            out.push(reading);
        }

        debug!("Filter '{}' annotated {} of {} readings", self.name, annotated, out.len());
        out
    }

    /// 计算最终 hint 文本：无占位符时直接使用规则文本
    fn render_hint(rule: &HintRule, reading: &Reading) -> String {
        if rule.has_placeholders() {
            PlaceholderSubstitutor::substitute(
                &rule.hint_text,
                &rule.placeholders,
                reading.asset_name(),
                reading,
            )
        } else {
            rule.hint_text.clone()
        }
    }

    /// 编译 hints；失败时记录错误并返回空规则表
    fn build_table(hints_json: &str) -> RuleTable {
        match RuleCompiler::compile_str(hints_json) {
            Ok(table) => table,
            Err(e) => {
                error!("{}", e);
                RuleTable::empty()
            }
        }
    }

    fn replace_rules(&self, table: RuleTable) {
        let table = Arc::new(table);
        let mut guard = self.rules.write().unwrap_or_else(|e| e.into_inner());
        *guard = table;
    }
}

impl std::fmt::Debug for OmfHintFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmfHintFilter")
            .field("name", &self.name)
            .field("enabled", &self.is_enabled())
            .field("rules", &self.rules().len())
            .finish()
    }
}
