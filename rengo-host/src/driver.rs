//! # Driver 模块
//!
//! 帧循环：每帧推进显示端、根据输入策略生成输入、调用一次解释器。
//!
//! 无渲染宿主没有真实的鼠标和键盘，输入由 [`AutoInput`] 模拟：
//! 文本显示完后点击；出现选择支时把"鼠标"移到预设选项的按钮上，悬停后选中。

use rengo_runtime::{Interpreter, LoadError, RuntimeError, RuntimeInput, SuspendState};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::display::HeadlessDisplay;

/// 自动输入策略
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoInput {
    /// 依次使用的选项索引，用完后总是选第一个
    pub choices: Vec<usize>,
    /// 为 true 时不等逐字显示完，点击立即补全文本
    pub skip_reveal: bool,
    next_choice: usize,
}

impl AutoInput {
    pub fn new(choices: Vec<usize>) -> Self {
        Self {
            choices,
            ..Self::default()
        }
    }

    /// 设置是否跳过逐字显示
    pub fn with_skip_reveal(mut self, skip_reveal: bool) -> Self {
        self.skip_reveal = skip_reveal;
        self
    }

    /// 下一次要选的选项
    fn take_choice(&mut self) -> usize {
        let index = self.choices.get(self.next_choice).copied().unwrap_or(0);
        self.next_choice += 1;
        index
    }
}

/// 一次运行的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 运行的帧数
    pub frames: u64,
    /// 按顺序显示过的对话
    pub transcript: Vec<String>,
    /// 按顺序选中的选项文本
    pub selections: Vec<String>,
    /// 脚本是否执行完毕
    pub finished: bool,
}

/// 驱动端
#[derive(Debug)]
pub struct Driver {
    pub interpreter: Interpreter,
    pub display: HeadlessDisplay,
    input: AutoInput,
}

impl Driver {
    /// 按配置创建驱动端并加载入口脚本
    pub fn new(config: &AppConfig, input: AutoInput) -> Result<Self, LoadError> {
        let mut interpreter = Interpreter::new(config.runtime.clone());
        let script_path = config.start_script_full_path();
        interpreter.load_script(&script_path)?;
        info!(
            path = %script_path.display(),
            lines = interpreter.program().len(),
            "入口脚本已加载"
        );

        Ok(Self {
            interpreter,
            display: HeadlessDisplay::new(config),
            input,
        })
    }

    /// 运行直到脚本结束或达到帧数上限
    pub fn run(&mut self, max_frames: u64) -> Result<RunSummary, RuntimeError> {
        let mut summary = RunSummary::default();

        while summary.frames < max_frames {
            summary.frames += 1;
            if !self.frame(&mut summary)? {
                summary.finished = true;
                info!(frames = summary.frames, "脚本执行完毕");
                return Ok(summary);
            }
        }

        warn!(max_frames, "达到帧数上限，脚本未执行完毕");
        Ok(summary)
    }

    /// 执行一帧，返回脚本是否仍在运行
    pub fn frame(&mut self, summary: &mut RunSummary) -> Result<bool, RuntimeError> {
        self.display.update();
        self.apply_input(summary)?;

        let before = self.interpreter.suspend();
        let running = self.interpreter.execute_step(&mut self.display);
        let after = self.interpreter.suspend();

        let entered_wait =
            before != SuspendState::WaitingForInput && after == SuspendState::WaitingForInput;
        if let Some(text) = self.interpreter.current_text().filter(|_| entered_wait) {
            summary.transcript.push(text.to_string());
        }
        Ok(running)
    }

    fn apply_input(&mut self, summary: &mut RunSummary) -> Result<(), RuntimeError> {
        match self.interpreter.suspend() {
            SuspendState::WaitingForInput => {
                if self.input.skip_reveal || self.display.render_state.text.is_ready() {
                    let outcome = self
                        .interpreter
                        .handle_input(RuntimeInput::click(), &mut self.display)?;
                    debug!(?outcome, "点击");
                }
            }
            SuspendState::WaitingForChoice if !self.interpreter.choices().has_selection() => {
                let index = self.input.take_choice();
                let index = self.pointer_target(index).unwrap_or(index);
                self.interpreter
                    .handle_input(RuntimeInput::hover(index), &mut self.display)?;
                self.interpreter
                    .handle_input(RuntimeInput::choice(index), &mut self.display)?;

                if let Some(choice) = self.interpreter.choices().choices().get(index) {
                    info!(index, text = %choice.text, "选择");
                    summary.selections.push(choice.text.clone());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// 把"鼠标"移到按钮中心，用命中测试得到实际点中的选项
    fn pointer_target(&self, index: usize) -> Option<usize> {
        let menu = self.display.render_state.choice_menu.as_ref()?;
        let rect = menu.rects.get(index)?;
        menu.hit_test(rect.x + rect.width / 2, rect.y + rect.height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_input_choice_sequence() {
        let mut input = AutoInput::new(vec![2, 1]);
        assert_eq!(input.take_choice(), 2);
        assert_eq!(input.take_choice(), 1);
        assert_eq!(input.take_choice(), 0);
    }
}
