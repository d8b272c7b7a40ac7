//! # Choice 模块
//!
//! 选择支注册表：保存当前候选项、显示开关、悬停项和待处理的选择结果。
//!
//! 解释器写入候选项，宿主层读取并绘制菜单，输入层通过 [`ChoiceRegistry::select`]
//! 登记选择。解释器在下一次 `execute_step` 中通过 [`ChoiceRegistry::poll_selection`]
//! 取走选择结果并执行跳转。

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// 选择项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// 选项显示文本
    pub text: String,
    /// 跳转目标标签
    pub target_label: String,
}

impl Choice {
    pub fn new(text: impl Into<String>, target_label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_label: target_label.into(),
        }
    }
}

/// 选择支注册表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceRegistry {
    choices: Vec<Choice>,
    active: bool,
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl ChoiceRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 整体替换候选项
    ///
    /// 非空时自动激活显示；空集合等价于"没有待处理的选择"。
    pub fn set_choices(&mut self, choices: Vec<Choice>) {
        self.active = !choices.is_empty();
        self.choices = choices;
        self.hovered = None;
        self.selected = None;
    }

    /// 清空候选项并关闭显示
    pub fn clear(&mut self) {
        self.set_choices(Vec::new());
    }

    /// 打开显示（没有候选项时保持关闭）
    pub fn activate(&mut self) {
        self.active = !self.choices.is_empty();
    }

    /// 关闭显示，候选项保留
    pub fn deactivate(&mut self) {
        self.active = false;
        self.hovered = None;
    }

    /// 是否正在显示
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 当前候选项
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// 是否没有候选项
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// 当前悬停的选项
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// 更新悬停项
    pub fn hover(&mut self, index: usize) -> Result<(), RuntimeError> {
        self.check_index(index)?;
        self.hovered = Some(index);
        Ok(())
    }

    /// 取消悬停
    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    /// 登记一次选择
    pub fn select(&mut self, index: usize) -> Result<(), RuntimeError> {
        self.check_index(index)?;
        self.hovered = Some(index);
        self.selected = Some(index);
        Ok(())
    }

    /// 是否已有待处理的选择
    pub fn has_selection(&self) -> bool {
        self.active && self.selected.is_some()
    }

    /// 取走选择结果，返回目标标签
    ///
    /// 取走后注册表关闭显示；候选项由解释器负责清除。
    pub fn poll_selection(&mut self) -> Option<String> {
        if !self.active {
            return None;
        }
        let index = self.selected.take()?;
        let label = self.choices.get(index)?.target_label.clone();
        self.deactivate();
        Some(label)
    }

    fn check_index(&self, index: usize) -> Result<(), RuntimeError> {
        if index >= self.choices.len() {
            return Err(RuntimeError::InvalidChoiceIndex {
                index,
                max: self.choices.len(),
            });
        }
        Ok(())
    }
}
