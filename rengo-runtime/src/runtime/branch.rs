//! # Branch 模块
//!
//! 条件分支的跳过扫描。
//!
//! 两个扫描函数都从 `from` 开始向后查找，返回目标标记所在的行索引，
//! 光标停在标记上，由下一步执行该标记。找不到时返回脚本末尾。

use crate::config::BranchScan;
use crate::script::{ScriptLine, ScriptProgram};

/// 分支标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    If,
    ElseIf,
    Else,
    EndIf,
}

fn marker_at(program: &ScriptProgram, index: usize) -> Option<Marker> {
    let line = program.line(index)?;
    match ScriptLine::classify(line).command_name()? {
        "if" => Some(Marker::If),
        "elseif" => Some(Marker::ElseIf),
        "else" => Some(Marker::Else),
        "endif" => Some(Marker::EndIf),
        _ => None,
    }
}

/// 跳到下一个 `elseif` / `else` / `endif`
pub fn skip_to_next_branch(program: &ScriptProgram, from: usize, mode: BranchScan) -> usize {
    scan(program, from, mode, |marker| {
        matches!(marker, Marker::ElseIf | Marker::Else | Marker::EndIf)
    })
}

/// 跳到当前条件块的 `endif`
pub fn skip_to_endif(program: &ScriptProgram, from: usize, mode: BranchScan) -> usize {
    scan(program, from, mode, |marker| marker == Marker::EndIf)
}

fn scan(
    program: &ScriptProgram,
    from: usize,
    mode: BranchScan,
    is_target: impl Fn(Marker) -> bool,
) -> usize {
    let mut depth = 0usize;
    for index in from..program.len() {
        let Some(marker) = marker_at(program, index) else {
            continue;
        };
        match mode {
            BranchScan::Linear => {
                if is_target(marker) {
                    return index;
                }
            }
            BranchScan::Nested => match marker {
                Marker::If => depth += 1,
                Marker::EndIf if depth > 0 => depth -= 1,
                _ if depth == 0 && is_target(marker) => return index,
                _ => {}
            },
        }
    }
    program.len()
}
