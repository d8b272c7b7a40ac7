//! # Affection 模块
//!
//! 角色好感度表。每次写入都会夹到 `[min, max]`，未记录的角色读出默认值。
//! 增减（[`AffectionTable::change`]）则从 0 开始累加，不使用默认值。
//!
//! 写入后按注册顺序同步通知观察者，参数为角色名和夹取后的值。
//! 表本身不加锁：解释器独占写权限，宿主层通过 `&` 借用读取。
//! 若需跨线程共享，由持有方把解释器整体放进 `Mutex`，观察者因此要求 `Send`。

use std::collections::HashMap;
use std::fmt;

use crate::config::AffectionConfig;

/// 好感度变化观察者
pub type AffectionObserver = Box<dyn FnMut(&str, i32) + Send>;

/// 好感度表
pub struct AffectionTable {
    values: HashMap<String, i32>,
    config: AffectionConfig,
    observers: Vec<AffectionObserver>,
}

impl AffectionTable {
    /// 使用默认范围（0..=100，默认值 50）创建
    pub fn new() -> Self {
        Self::with_config(AffectionConfig::default())
    }

    /// 使用指定范围创建
    pub fn with_config(config: AffectionConfig) -> Self {
        Self {
            values: HashMap::new(),
            config,
            observers: Vec::new(),
        }
    }

    /// 当前配置
    pub fn config(&self) -> &AffectionConfig {
        &self.config
    }

    /// 读取好感度，未记录时返回默认值
    pub fn get(&self, character: &str) -> i32 {
        self.values
            .get(character)
            .copied()
            .unwrap_or(self.config.default_value)
    }

    /// 直接设置好感度（夹取后写入），返回写入值
    pub fn set(&mut self, character: &str, value: i32) -> i32 {
        let value = self.clamp(value);
        self.values.insert(character.to_string(), value);
        self.notify(character, value);
        value
    }

    /// 在已记录的值（未记录时为 0）上加上 `delta`，返回写入值
    pub fn change(&mut self, character: &str, delta: i32) -> i32 {
        let current = self.values.get(character).copied().unwrap_or(0);
        self.set(character, current.saturating_add(delta))
    }

    /// 注册观察者
    pub fn add_observer(&mut self, observer: impl FnMut(&str, i32) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// 是否已记录某角色
    pub fn contains(&self, character: &str) -> bool {
        self.values.contains_key(character)
    }

    /// 已记录的全部角色（按名称排序，便于稳定输出）
    pub fn entries(&self) -> Vec<(&str, i32)> {
        let mut entries: Vec<(&str, i32)> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// 清空数值，保留观察者和配置
    pub fn clear(&mut self) {
        self.values.clear();
    }

    fn clamp(&self, value: i32) -> i32 {
        // min > max 的配置由宿主层校验，这里不 panic
        value.max(self.config.min).min(self.config.max)
    }

    fn notify(&mut self, character: &str, value: i32) {
        for observer in &mut self.observers {
            observer(character, value);
        }
    }
}

impl Default for AffectionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AffectionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffectionTable")
            .field("values", &self.values)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}
