//! # Engine 模块
//!
//! 脚本解释器：持有脚本、光标、挂起状态、好感度表和选择支注册表。
//!
//! ## 执行模型
//!
//! ```text
//! execute_step(display) -> bool
//! ```
//!
//! 驱动端每帧调用一次，按以下优先级处理：
//!
//! 1. 有待处理的选择：关闭选择支，跳到目标标签，并同步执行到下一个挂起点
//! 2. 处于等待状态：直接返回
//! 3. 有待跳转标签：执行跳转，不消耗行
//! 4. 脚本结束：返回 `false`
//! 5. 消耗一行（指令 / 标签 / 对话）
//! 6. 指令设置了非空选择集合：显示选择支并挂起
//!
//! 显示端每次调用时显式传入，解释器不持有显示端。

use std::path::Path;

use tracing::{debug, error, warn};

use crate::affection::AffectionTable;
use crate::choice::{Choice, ChoiceRegistry};
use crate::config::RuntimeConfig;
use crate::display::{DisplayCommand, DisplaySink};
use crate::error::{LoadError, RuntimeError};
use crate::input::{InputOutcome, RuntimeInput};
use crate::runtime::executor::Executor;
use crate::script::{ParsedCommand, ScriptLine, ScriptProgram, parse_command};
use crate::state::{ExecutionCursor, SuspendState};

/// 脚本解释器
///
/// # 使用示例
///
/// ```ignore
/// let mut interpreter = Interpreter::new(RuntimeConfig::default());
/// interpreter.load_script("resource/script/first.rgo")?;
///
/// loop {
///     // 采集输入
///     interpreter.handle_input(RuntimeInput::Click, &mut display)?;
///     if !interpreter.execute_step(&mut display) {
///         break;
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Interpreter {
    program: ScriptProgram,
    cursor: ExecutionCursor,
    suspend: SuspendState,
    current_text: Option<String>,
    affection: AffectionTable,
    choices: ChoiceRegistry,
    executor: Executor,
    config: RuntimeConfig,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl Interpreter {
    /// 创建空解释器（没有加载脚本）
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            program: ScriptProgram::default(),
            cursor: ExecutionCursor::new(),
            suspend: SuspendState::Running,
            current_text: None,
            affection: AffectionTable::with_config(config.affection),
            choices: ChoiceRegistry::new(),
            executor: Executor::new(config.branch_scan),
            config,
        }
    }

    /// 从文件加载脚本，替换当前脚本
    pub fn load_script(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let program = ScriptProgram::load(path)?;
        self.load_program(program);
        Ok(())
    }

    /// 替换当前脚本，重置光标、挂起状态和选择支
    ///
    /// 好感度表保留。
    pub fn load_program(&mut self, program: ScriptProgram) {
        self.program = program;
        self.cursor.reset();
        self.suspend = SuspendState::Running;
        self.current_text = None;
        self.choices.clear();
    }

    /// 推进一步
    ///
    /// 返回 `false` 表示脚本已经执行完毕。
    pub fn execute_step(&mut self, display: &mut dyn DisplaySink) -> bool {
        match self.suspend {
            SuspendState::WaitingForChoice => {
                if let Some(label) = self.choices.poll_selection() {
                    self.close_choices(display);
                    self.jump_to_label(&label);
                    self.run_chain(display);
                }
                true
            }
            SuspendState::WaitingForInput => true,
            SuspendState::Running => self.step_line(display),
        }
    }

    /// 处理驱动端输入
    pub fn handle_input(
        &mut self,
        input: RuntimeInput,
        display: &mut dyn DisplaySink,
    ) -> Result<InputOutcome, RuntimeError> {
        match (self.suspend, input) {
            (SuspendState::WaitingForInput, RuntimeInput::Click) => {
                if display.is_text_ready() {
                    self.suspend = SuspendState::Running;
                    Ok(InputOutcome::Resumed)
                } else {
                    display.complete_text();
                    Ok(InputOutcome::RevealCompleted)
                }
            }

            (SuspendState::WaitingForChoice, RuntimeInput::ChoiceHovered { index }) => {
                self.choices.hover(index)?;
                Ok(InputOutcome::Hovered)
            }

            (SuspendState::WaitingForChoice, RuntimeInput::ChoiceSelected { index }) => {
                self.choices.select(index)?;
                debug!(index, "选择已登记");
                Ok(InputOutcome::SelectionRecorded)
            }

            (state, RuntimeInput::ChoiceSelected { .. }) => Err(RuntimeError::StateMismatch {
                expected: format!("{:?}", SuspendState::WaitingForChoice),
                actual: format!("{state:?}"),
            }),

            _ => Ok(InputOutcome::Ignored),
        }
    }

    /// 选择之后同步执行，直到再次挂起或脚本结束
    fn run_chain(&mut self, display: &mut dyn DisplaySink) {
        let mut steps = 0usize;
        while !self.suspend.is_suspended() {
            if steps >= self.config.max_chain_steps {
                error!(
                    steps,
                    line = self.cursor.current_line,
                    "选择后的连续执行超出上限，脚本可能存在死循环"
                );
                return;
            }
            if !self.step_line(display) {
                return;
            }
            steps += 1;
        }
    }

    /// 执行第 3 至 6 步
    fn step_line(&mut self, display: &mut dyn DisplaySink) -> bool {
        if let Some(label) = self.cursor.pending_jump.take() {
            self.jump_to_label(&label);
            return true;
        }

        let index = self.cursor.current_line;
        let Some(line) = self.program.line(index) else {
            return false;
        };
        let line = line.to_string();
        self.cursor.advance();

        match ScriptLine::classify(&line) {
            ScriptLine::Command(body) => {
                if let Some(choices) = self.run_command(index, body, display) {
                    self.present_choices(choices, display);
                }
            }
            ScriptLine::Label(_) => {}
            ScriptLine::Dialogue(text) => {
                self.current_text = Some(text.to_string());
                self.send(
                    index,
                    &DisplayCommand::ShowText {
                        content: text.to_string(),
                    },
                    display,
                );
                self.suspend = SuspendState::WaitingForInput;
            }
        }
        true
    }

    /// 解析并执行一条指令，返回指令设置的选择集合
    fn run_command(
        &mut self,
        index: usize,
        body: &str,
        display: &mut dyn DisplaySink,
    ) -> Option<Vec<Choice>> {
        let ParsedCommand { command, errors } = parse_command(body);
        let line = self.line_number(index);
        for err in &errors {
            warn!(line, error = %err, "指令格式错误");
        }
        debug!(line, command = command.name(), "执行指令");

        let result = self.executor.execute(
            &command,
            &mut self.cursor,
            &mut self.affection,
            &self.program,
        );

        for cmd in &result.commands {
            self.send(index, cmd, display);
        }
        if let Some(skip_to) = result.skip_to {
            self.cursor.jump_to(skip_to);
        }
        if let Some(label) = result.jump_to {
            self.cursor.pending_jump = Some(label);
        }
        result.choices
    }

    fn present_choices(&mut self, choices: Vec<Choice>, display: &mut dyn DisplaySink) {
        if choices.is_empty() {
            return;
        }
        let index = self.cursor.current_line.saturating_sub(1);
        self.send(
            index,
            &DisplayCommand::PresentChoices {
                choices: choices.clone(),
            },
            display,
        );
        self.choices.set_choices(choices);
        self.suspend = SuspendState::WaitingForChoice;
    }

    fn close_choices(&mut self, display: &mut dyn DisplaySink) {
        self.choices.clear();
        if let Err(err) = display.execute(&DisplayCommand::HideChoices) {
            warn!(error = %err, "关闭选择支失败");
        }
        self.suspend = SuspendState::Running;
    }

    /// 跳到标签的下一行；找不到时记录日志，光标不变
    fn jump_to_label(&mut self, label: &str) {
        match self.program.find_label(label) {
            Some(index) => {
                debug!(label, line = self.line_number(index), "跳转");
                self.cursor.jump_to(index + 1);
            }
            None => {
                let err = RuntimeError::LabelNotFound {
                    label: label.trim().to_string(),
                };
                warn!(error = %err, line = self.cursor.current_line, "跳转失败");
            }
        }
    }

    fn send(&self, index: usize, command: &DisplayCommand, display: &mut dyn DisplaySink) {
        if let Err(err) = display.execute(command) {
            warn!(line = self.line_number(index), error = %err, "显示指令执行失败");
        }
    }

    fn line_number(&self, index: usize) -> usize {
        self.program.source_line(index).unwrap_or(index + 1)
    }

    // =========================================================================
    // 查询接口
    // =========================================================================

    /// 当前脚本
    pub fn program(&self) -> &ScriptProgram {
        &self.program
    }

    /// 执行光标
    pub fn cursor(&self) -> &ExecutionCursor {
        &self.cursor
    }

    /// 挂起状态
    pub fn suspend(&self) -> SuspendState {
        self.suspend
    }

    /// 最近一次显示的对话文本
    pub fn current_text(&self) -> Option<&str> {
        self.current_text.as_deref()
    }

    /// 好感度表
    pub fn affection(&self) -> &AffectionTable {
        &self.affection
    }

    /// 好感度表（可写，用于注册观察者或调试）
    pub fn affection_mut(&mut self) -> &mut AffectionTable {
        &mut self.affection
    }

    /// 选择支注册表
    pub fn choices(&self) -> &ChoiceRegistry {
        &self.choices
    }

    /// 运行配置
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// 脚本是否已执行完毕
    pub fn is_finished(&self) -> bool {
        !self.suspend.is_suspended()
            && self.cursor.pending_jump.is_none()
            && self.cursor.current_line >= self.program.len()
    }
}
