//! # Executor 模块
//!
//! 将类型化的 [`ScriptCommand`] 转换为显示指令和光标变化。
//!
//! ## 职责
//!
//! - 维护条件栈并计算跳过目标
//! - 修改好感度
//! - 产生对应的 [`DisplayCommand`]
//!
//! 执行器不接触显示端，显示指令由解释器统一下发。

use tracing::{debug, warn};

use crate::affection::AffectionTable;
use crate::choice::Choice;
use crate::config::BranchScan;
use crate::display::DisplayCommand;
use crate::runtime::branch::{skip_to_endif, skip_to_next_branch};
use crate::script::{Condition, ScriptCommand, ScriptProgram};
use crate::state::ExecutionCursor;

/// 执行结果
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    /// 产生的显示指令
    pub commands: Vec<DisplayCommand>,
    /// 新的选择集合（`@choice` 产生，可能为空）
    pub choices: Option<Vec<Choice>>,
    /// 待跳转标签（下一步生效）
    pub jump_to: Option<String>,
    /// 条件跳过后光标应停留的行
    pub skip_to: Option<usize>,
}

impl ExecuteResult {
    fn empty() -> Self {
        Self::default()
    }

    fn with_command(command: DisplayCommand) -> Self {
        Self {
            commands: vec![command],
            ..Self::default()
        }
    }

    fn with_skip(skip_to: usize) -> Self {
        Self {
            skip_to: Some(skip_to),
            ..Self::default()
        }
    }
}

/// 指令执行器
#[derive(Debug, Clone, Default)]
pub struct Executor {
    branch_scan: BranchScan,
}

impl Executor {
    /// 创建执行器
    pub fn new(branch_scan: BranchScan) -> Self {
        Self { branch_scan }
    }

    /// 执行单条指令
    ///
    /// 调用前光标已经越过该指令所在行。
    pub fn execute(
        &self,
        command: &ScriptCommand,
        cursor: &mut ExecutionCursor,
        affection: &mut AffectionTable,
        program: &ScriptProgram,
    ) -> ExecuteResult {
        match command {
            ScriptCommand::Background {
                layer,
                path,
                transition,
            } => ExecuteResult::with_command(DisplayCommand::SetImage {
                layer: *layer,
                path: path.clone(),
                transition: transition.clone(),
            }),

            ScriptCommand::Character {
                layer,
                position,
                path,
            } => ExecuteResult::with_command(DisplayCommand::SetCharacter {
                layer: *layer,
                position: position.clone(),
                path: path.clone(),
            }),

            ScriptCommand::Clear { layer } => {
                ExecuteResult::with_command(DisplayCommand::ClearLayer { layer: *layer })
            }

            ScriptCommand::Choice { options } => {
                debug!(count = options.len(), "设置选择支");
                ExecuteResult {
                    choices: Some(options.clone()),
                    ..ExecuteResult::default()
                }
            }

            ScriptCommand::Affection { character, delta } => {
                let value = affection.change(character, *delta);
                debug!(character = %character, delta, value, "好感度变化");
                ExecuteResult::empty()
            }

            ScriptCommand::If { condition } => {
                let taken = self.evaluate(condition, affection);
                cursor.push_branch(taken);
                if taken {
                    ExecuteResult::empty()
                } else {
                    ExecuteResult::with_skip(self.next_branch(program, cursor))
                }
            }

            ScriptCommand::ElseIf { condition } => {
                if cursor.top_branch() == Some(false) {
                    let taken = self.evaluate(condition, affection);
                    cursor.set_top_branch(taken);
                    if taken {
                        ExecuteResult::empty()
                    } else {
                        ExecuteResult::with_skip(self.next_branch(program, cursor))
                    }
                } else {
                    ExecuteResult::with_skip(self.endif(program, cursor))
                }
            }

            ScriptCommand::Else => {
                if cursor.top_branch() == Some(false) {
                    cursor.set_top_branch(true);
                    ExecuteResult::empty()
                } else {
                    ExecuteResult::with_skip(self.endif(program, cursor))
                }
            }

            ScriptCommand::EndIf => {
                cursor.pop_branch();
                ExecuteResult::empty()
            }

            ScriptCommand::Jump { label } => ExecuteResult {
                jump_to: Some(label.clone()),
                ..ExecuteResult::default()
            },

            ScriptCommand::Unknown { name } => {
                warn!(command = %name, "未知指令，已忽略");
                ExecuteResult::empty()
            }

            ScriptCommand::Invalid { name } => {
                debug!(command = %name, "指令无效，已跳过");
                ExecuteResult::empty()
            }
        }
    }

    fn evaluate(&self, condition: &Condition, affection: &AffectionTable) -> bool {
        let result = condition.evaluate(affection);
        debug!(?condition, result, "条件求值");
        result
    }

    fn next_branch(&self, program: &ScriptProgram, cursor: &ExecutionCursor) -> usize {
        skip_to_next_branch(program, cursor.current_line, self.branch_scan)
    }

    fn endif(&self, program: &ScriptProgram, cursor: &ExecutionCursor) -> usize {
        skip_to_endif(program, cursor.current_line, self.branch_scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Transition;
    use crate::script::CompareOp;

    fn cond(value: i32) -> Condition {
        Condition::Affection {
            character: "Yuki".to_string(),
            op: CompareOp::Ge,
            value,
        }
    }

    fn cursor_at(line: usize) -> ExecutionCursor {
        let mut cursor = ExecutionCursor::new();
        cursor.jump_to(line);
        cursor
    }

    #[test]
    fn test_bg_produces_set_image() {
        let executor = Executor::default();
        let program = ScriptProgram::default();
        let mut cursor = ExecutionCursor::new();
        let mut affection = AffectionTable::new();

        let result = executor.execute(
            &ScriptCommand::Background {
                layer: 0,
                path: "room.png".to_string(),
                transition: Some(Transition::simple("fade")),
            },
            &mut cursor,
            &mut affection,
            &program,
        );
        assert_eq!(
            result.commands,
            vec![DisplayCommand::SetImage {
                layer: 0,
                path: "room.png".to_string(),
                transition: Some(Transition::simple("fade")),
            }]
        );
        assert!(result.skip_to.is_none());
    }

    #[test]
    fn test_affection_changes_table() {
        let executor = Executor::default();
        let program = ScriptProgram::default();
        let mut cursor = ExecutionCursor::new();
        let mut affection = AffectionTable::new();

        executor.execute(
            &ScriptCommand::Affection {
                character: "Yuki".to_string(),
                delta: 60,
            },
            &mut cursor,
            &mut affection,
            &program,
        );
        assert_eq!(affection.get("Yuki"), 60);
    }

    #[test]
    fn test_if_false_skips_to_else() {
        let program = ScriptProgram::parse("@if affection Yuki >= 80\nA\n@else\nB\n@endif\n");
        let executor = Executor::default();
        let mut cursor = cursor_at(1);
        let mut affection = AffectionTable::new();

        let result = executor.execute(
            &ScriptCommand::If { condition: cond(80) },
            &mut cursor,
            &mut affection,
            &program,
        );
        assert_eq!(result.skip_to, Some(2));
        assert_eq!(cursor.conditional_stack, vec![false]);

        // else 在栈顶为假时执行分支
        let mut cursor = cursor_at(3);
        cursor.push_branch(false);
        let result = executor.execute(&ScriptCommand::Else, &mut cursor, &mut affection, &program);
        assert_eq!(result.skip_to, None);
        assert_eq!(cursor.top_branch(), Some(true));
    }

    #[test]
    fn test_elseif_after_taken_branch_skips_to_endif() {
        let program = ScriptProgram::parse(
            "@if affection Yuki >= 0\nA\n@elseif affection Yuki >= 0\nB\n@endif\n",
        );
        let executor = Executor::default();
        let mut affection = AffectionTable::new();
        let mut cursor = cursor_at(3);
        cursor.push_branch(true);

        let result = executor.execute(
            &ScriptCommand::ElseIf { condition: cond(0) },
            &mut cursor,
            &mut affection,
            &program,
        );
        assert_eq!(result.skip_to, Some(4));
        assert_eq!(cursor.top_branch(), Some(true));
    }

    #[test]
    fn test_else_without_if_skips_to_endif() {
        let program = ScriptProgram::parse("@else\nA\n@endif\nB\n");
        let executor = Executor::default();
        let mut affection = AffectionTable::new();
        let mut cursor = cursor_at(1);

        let result = executor.execute(&ScriptCommand::Else, &mut cursor, &mut affection, &program);
        assert_eq!(result.skip_to, Some(2));
        // endif 在空栈上是空操作
        executor.execute(&ScriptCommand::EndIf, &mut cursor, &mut affection, &program);
        assert_eq!(cursor.depth(), 0);
    }

    #[test]
    fn test_jump_and_choice_results() {
        let executor = Executor::default();
        let program = ScriptProgram::default();
        let mut cursor = ExecutionCursor::new();
        let mut affection = AffectionTable::new();

        let result = executor.execute(
            &ScriptCommand::Jump {
                label: "end".to_string(),
            },
            &mut cursor,
            &mut affection,
            &program,
        );
        assert_eq!(result.jump_to.as_deref(), Some("end"));

        let result = executor.execute(
            &ScriptCommand::Choice {
                options: vec![Choice::new("A", "a")],
            },
            &mut cursor,
            &mut affection,
            &program,
        );
        assert_eq!(result.choices, Some(vec![Choice::new("A", "a")]));
    }
}
