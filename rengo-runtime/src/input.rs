//! # Input 模块
//!
//! 定义驱动端向解释器传递的输入事件。
//!
//! ## 设计说明
//!
//! - 解释器不直接处理鼠标/键盘事件，只处理语义化的输入
//! - `ChoiceSelected` 只登记选择结果，跳转在下一次 `execute_step` 中生效

use serde::{Deserialize, Serialize};

/// 驱动端向解释器传递的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeInput {
    /// 用户点击（解除 `WaitingForInput`，或先补全正在逐字显示的文本）
    Click,

    /// 鼠标悬停在某个选项上（仅影响显示）
    ChoiceHovered { index: usize },

    /// 用户选择了某个选项（`index` 从 0 开始）
    ChoiceSelected { index: usize },
}

impl RuntimeInput {
    /// 创建点击输入
    pub fn click() -> Self {
        Self::Click
    }

    /// 创建选择输入
    pub fn choice(index: usize) -> Self {
        Self::ChoiceSelected { index }
    }

    /// 创建悬停输入
    pub fn hover(index: usize) -> Self {
        Self::ChoiceHovered { index }
    }
}

/// 输入处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// 解除了等待，下一次 `execute_step` 会继续执行
    Resumed,
    /// 文本尚未显示完，本次点击只补全文本
    RevealCompleted,
    /// 选择已登记，下一次 `execute_step` 执行跳转
    SelectionRecorded,
    /// 悬停索引已更新
    Hovered,
    /// 当前状态下该输入没有意义
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_creation() {
        assert_eq!(RuntimeInput::click(), RuntimeInput::Click);
        assert_eq!(
            RuntimeInput::choice(2),
            RuntimeInput::ChoiceSelected { index: 2 }
        );
        assert_eq!(RuntimeInput::hover(0), RuntimeInput::ChoiceHovered { index: 0 });
    }

    #[test]
    fn test_input_serialization() {
        let input = RuntimeInput::ChoiceSelected { index: 1 };
        let json = serde_json::to_string(&input).unwrap();
        let deserialized: RuntimeInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, deserialized);
    }
}
