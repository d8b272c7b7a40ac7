//! # Config 模块
//!
//! 解释器自身的可调参数。宿主层把它嵌入到应用配置中，通过 JSON 加载。

use serde::{Deserialize, Serialize};

/// 条件分支跳过时的扫描方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchScan {
    /// 感知嵌套：跳过分支时整体跳过内部的 `@if … @endif`
    #[default]
    Nested,
    /// 兼容模式：只按标记文本逐行查找，不计算嵌套深度
    Linear,
}

/// 好感度配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectionConfig {
    /// 下限
    #[serde(default = "default_affection_min")]
    pub min: i32,

    /// 上限
    #[serde(default = "default_affection_max")]
    pub max: i32,

    /// 未记录角色的默认值（不受上下限约束）
    #[serde(default = "default_affection_value")]
    pub default_value: i32,
}

/// 解释器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// 好感度范围与默认值
    #[serde(default)]
    pub affection: AffectionConfig,

    /// 条件分支扫描方式
    #[serde(default)]
    pub branch_scan: BranchScan,

    /// 选择后连续执行的最大步数
    ///
    /// 选择支跳转后会在同一帧内连续执行，直到再次挂起。
    /// 脚本中若存在不经过对话的跳转环，超过此步数即中止本帧。
    #[serde(default = "default_max_chain_steps")]
    pub max_chain_steps: usize,
}

fn default_affection_min() -> i32 {
    0
}

fn default_affection_max() -> i32 {
    100
}

fn default_affection_value() -> i32 {
    50
}

fn default_max_chain_steps() -> usize {
    10_000
}

impl Default for AffectionConfig {
    fn default() -> Self {
        Self {
            min: default_affection_min(),
            max: default_affection_max(),
            default_value: default_affection_value(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            affection: AffectionConfig::default(),
            branch_scan: BranchScan::default(),
            max_chain_steps: default_max_chain_steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.affection.min, 0);
        assert_eq!(config.affection.max, 100);
        assert_eq!(config.affection.default_value, 50);
        assert_eq!(config.branch_scan, BranchScan::Nested);
        assert_eq!(config.max_chain_steps, 10_000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"branch_scan": "linear", "affection": {"max": 10}}"#).unwrap();
        assert_eq!(config.branch_scan, BranchScan::Linear);
        assert_eq!(config.affection.max, 10);
        assert_eq!(config.affection.min, 0);
        assert_eq!(config.max_chain_steps, 10_000);
    }
}
