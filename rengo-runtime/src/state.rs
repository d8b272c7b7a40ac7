//! # State 模块
//!
//! 定义解释器的执行位置和挂起模型。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 非法组合（同时等待点击与选择）在类型层面不可表示
//! - 不允许隐式全局状态

use serde::{Deserialize, Serialize};

/// 挂起状态
///
/// # 状态转换
///
/// ```text
/// Running          -> 继续执行（仅在一次 execute_step 内部短暂存在）
/// WaitingForInput  -> 已显示对话文本，等待点击
/// WaitingForChoice -> 已显示选择支，等待选择
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SuspendState {
    /// 运行中
    #[default]
    Running,

    /// 等待点击
    WaitingForInput,

    /// 等待选择
    WaitingForChoice,
}

impl SuspendState {
    /// 是否处于挂起状态
    pub fn is_suspended(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// 执行游标
///
/// 记录当前行、待执行的跳转以及条件分支栈。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionCursor {
    /// 下一条要执行的行索引（从 0 开始）
    pub current_line: usize,
    /// `@jump` 设置的待跳转标签，下一步生效
    pub pending_jump: Option<String>,
    /// 条件分支栈，每个未闭合的 `@if` 一项，值为"本组是否已有分支命中"
    pub conditional_stack: Vec<bool>,
}

impl ExecutionCursor {
    /// 创建位于脚本开头的游标
    pub fn new() -> Self {
        Self::default()
    }

    /// 前进到下一行
    pub fn advance(&mut self) {
        self.current_line += 1;
    }

    /// 跳转到指定行
    pub fn jump_to(&mut self, line: usize) {
        self.current_line = line;
    }

    /// 重置为初始状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 压入新的条件分支
    pub fn push_branch(&mut self, taken: bool) {
        self.conditional_stack.push(taken);
    }

    /// 弹出最内层条件分支，栈空时为 no-op
    pub fn pop_branch(&mut self) -> Option<bool> {
        self.conditional_stack.pop()
    }

    /// 最内层分支的状态
    pub fn top_branch(&self) -> Option<bool> {
        self.conditional_stack.last().copied()
    }

    /// 覆盖最内层分支的状态，栈空时返回 false
    pub fn set_top_branch(&mut self, taken: bool) -> bool {
        match self.conditional_stack.last_mut() {
            Some(top) => {
                *top = taken;
                true
            }
            None => false,
        }
    }

    /// 当前未闭合的条件块层数
    pub fn depth(&self) -> usize {
        self.conditional_stack.len()
    }
}
