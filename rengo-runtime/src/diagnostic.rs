//! # 诊断模块
//!
//! 提供脚本静态检查和诊断 API，不依赖 IO 或解释器。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用 parser，不重复解析逻辑
//! - 诊断结果从不阻止脚本加载

use std::collections::HashMap;
use std::fmt;

use crate::script::{ScriptCommand, ScriptLine, ScriptProgram, parse_command};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 脚本 ID / 文件路径
    pub script_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选，如原始行内容）
    pub detail: Option<String>,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            script_id: script_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建错误诊断
    pub fn error(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, script_id, message)
    }

    /// 创建警告诊断
    pub fn warn(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, script_id, message)
    }

    /// 创建信息诊断
    pub fn info(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, script_id, message)
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.script_id)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {detail}")?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 素材类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// 背景图片
    Background,
    /// 角色立绘
    Character,
    /// 过渡遮罩
    Mask,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "背景"),
            Self::Character => write!(f, "立绘"),
            Self::Mask => write!(f, "遮罩"),
        }
    }
}

/// 素材引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub kind: AssetKind,
    /// 脚本中的原始路径
    pub path: String,
    /// 源文件行号
    pub line: usize,
}

/// 跳转目标（包含行号）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTarget {
    pub label: String,
    pub line: usize,
}

//=============================================================================
// 脚本分析 API
//=============================================================================

/// 分析脚本，返回诊断结果
///
/// 执行以下检查：
/// - 未定义的跳转目标（jump/choice 目标标签不存在）
/// - 重复定义的标签（只有第一个可达）
/// - 未知指令和指令格式错误
/// - 条件块不配对（多余的 endif、块外的 else/elseif、未闭合的 if）
pub fn analyze_program(script_id: &str, program: &ScriptProgram) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let mut first_definition: HashMap<&str, usize> = HashMap::new();
    let mut open_ifs: Vec<usize> = Vec::new();

    for (index, raw) in program.lines().iter().enumerate() {
        let line = line_of(program, index);
        match ScriptLine::classify(raw) {
            ScriptLine::Label(name) => {
                if let Some(first) = first_definition.get(name) {
                    result.push(
                        Diagnostic::warn(
                            script_id,
                            format!("重复的标签: {name}（首次定义于第 {first} 行）"),
                        )
                        .with_line(line),
                    );
                } else {
                    first_definition.insert(name, line);
                }
            }
            ScriptLine::Command(body) => {
                let parsed = parse_command(body);
                check_command(script_id, program, &parsed.command, line, &mut open_ifs, &mut result);
                for err in parsed.errors {
                    result.push(
                        Diagnostic::warn(script_id, err.to_string())
                            .with_line(line)
                            .with_detail(raw.clone()),
                    );
                }
            }
            ScriptLine::Dialogue(_) => {}
        }
    }

    for line in open_ifs {
        result.push(Diagnostic::error(script_id, "@if 缺少对应的 @endif").with_line(line));
    }

    result
}

fn check_command(
    script_id: &str,
    program: &ScriptProgram,
    command: &ScriptCommand,
    line: usize,
    open_ifs: &mut Vec<usize>,
    result: &mut DiagnosticResult,
) {
    for label in command.jump_targets() {
        if program.find_label(label).is_none() {
            result.push(
                Diagnostic::error(script_id, format!("未定义的跳转目标: {label}"))
                    .with_line(line)
                    .with_detail(format!("jump 或 choice 引用了不存在的标签 '{label}'")),
            );
        }
    }

    match command {
        ScriptCommand::If { .. } => open_ifs.push(line),
        ScriptCommand::EndIf => {
            if open_ifs.pop().is_none() {
                result.push(
                    Diagnostic::error(script_id, "多余的 @endif：没有对应的 @if").with_line(line),
                );
            }
        }
        ScriptCommand::Else | ScriptCommand::ElseIf { .. } if open_ifs.is_empty() => {
            result.push(
                Diagnostic::error(script_id, format!("@{} 不在任何 @if 块中", command.name()))
                    .with_line(line),
            );
        }
        ScriptCommand::Unknown { name } => {
            result.push(Diagnostic::warn(script_id, format!("未知指令: {name}")).with_line(line));
        }
        _ => {}
    }
}

fn line_of(program: &ScriptProgram, index: usize) -> usize {
    program.source_line(index).unwrap_or(index + 1)
}

/// 脚本中定义的全部标签（按出现顺序，含重复）
pub fn defined_labels(program: &ScriptProgram) -> Vec<&str> {
    program
        .lines()
        .iter()
        .filter_map(|line| ScriptLine::classify(line).as_label())
        .collect()
}

/// 脚本中引用的全部跳转目标
pub fn jump_targets(program: &ScriptProgram) -> Vec<JumpTarget> {
    commands(program)
        .flat_map(|(line, command)| {
            command
                .jump_targets()
                .into_iter()
                .map(|label| JumpTarget {
                    label: label.to_string(),
                    line,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// 提取脚本中的所有素材引用
pub fn asset_references(program: &ScriptProgram) -> Vec<AssetReference> {
    let mut refs = Vec::new();
    for (line, command) in commands(program) {
        match command {
            ScriptCommand::Background {
                path, transition, ..
            } => {
                refs.push(AssetReference {
                    kind: AssetKind::Background,
                    path,
                    line,
                });
                // 第一个位置参数是遮罩图，"-" 表示不使用
                if let Some(mask) = transition
                    .as_ref()
                    .and_then(|t| t.get_positional(0))
                    .filter(|mask| *mask != "-")
                {
                    refs.push(AssetReference {
                        kind: AssetKind::Mask,
                        path: mask.to_string(),
                        line,
                    });
                }
            }
            ScriptCommand::Character { path, .. } => refs.push(AssetReference {
                kind: AssetKind::Character,
                path,
                line,
            }),
            _ => {}
        }
    }
    refs
}

/// 逐行解析出的指令（行号，指令）
fn commands(program: &ScriptProgram) -> impl Iterator<Item = (usize, ScriptCommand)> + '_ {
    program
        .lines()
        .iter()
        .enumerate()
        .filter_map(move |(index, raw)| match ScriptLine::classify(raw) {
            ScriptLine::Command(body) => Some((line_of(program, index), parse_command(body).command)),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: &DiagnosticResult) -> String {
        result
            .diagnostics
            .iter()
            .map(|d| format!("{} {}: {}", d.level, d.line.unwrap_or(0), d.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_clean_script_has_no_diagnostics() {
        let program = ScriptProgram::parse(
            "@if affection Yuki >= 1\nA\n@else\nB\n@endif\n@choice 去 -> go\n:go\n",
        );
        let result = analyze_program("clean", &program);
        assert!(result.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_analyze_program_report() {
        let program = ScriptProgram::parse(
            ":start\n@jump nowhere\n:start\n@shake 3\n@bg x a.png\n@endif\n@if affection Yuki >= 1\n",
        );
        let result = analyze_program("demo", &program);

        assert_eq!(result.error_count(), 3);
        assert_eq!(result.warn_count(), 3);
        insta::assert_snapshot!(render(&result), @r"
        ERROR 2: 未定义的跳转目标: nowhere
        WARN 3: 重复的标签: start（首次定义于第 1 行）
        WARN 4: 未知指令: shake
        WARN 5: 指令 'bg' 的图层索引无效: 'x'
        ERROR 6: 多余的 @endif：没有对应的 @if
        ERROR 7: @if 缺少对应的 @endif
        ");
    }

    #[test]
    fn test_else_outside_if() {
        let program = ScriptProgram::parse("@else\n@elseif affection A > 1\n");
        let result = analyze_program("demo", &program);
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.diagnostics[0].message, "@else 不在任何 @if 块中");
        assert_eq!(result.diagnostics[1].message, "@elseif 不在任何 @if 块中");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("first.rgo", "未定义的跳转目标: end")
            .with_line(12)
            .with_detail("@jump end");
        assert_eq!(
            diag.to_string(),
            "[ERROR] first.rgo:12: 未定义的跳转目标: end\n  | @jump end"
        );
    }

    #[test]
    fn test_line_numbers_follow_source() {
        let program = ScriptProgram::parse("-- 注释\n\n@jump lost\n");
        let result = analyze_program("demo", &program);
        assert_eq!(result.diagnostics[0].line, Some(3));
    }

    #[test]
    fn test_labels_and_targets() {
        let program = ScriptProgram::parse(":a\n@jump b\n@choice x -> a y -> c\n:b\n:a\n");
        assert_eq!(defined_labels(&program), vec!["a", "b", "a"]);
        let labels: Vec<_> = jump_targets(&program)
            .into_iter()
            .map(|t| (t.label, t.line))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 3),
                ("c".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_asset_references() {
        let program = ScriptProgram::parse(
            "@bg 0 bg/a.png rule/m.png transition\n@bg 1 bg/b.png - fade\n@chara 2 left c/y.png\n",
        );
        let refs = asset_references(&program);
        let kinds: Vec<_> = refs.iter().map(|r| (r.kind, r.path.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (AssetKind::Background, "bg/a.png"),
                (AssetKind::Mask, "rule/m.png"),
                (AssetKind::Background, "bg/b.png"),
                (AssetKind::Character, "c/y.png"),
            ]
        );
    }

    #[test]
    fn test_merge_and_filter() {
        let mut a = DiagnosticResult::new();
        a.push(Diagnostic::info("a", "信息"));
        let mut b = DiagnosticResult::new();
        b.push(Diagnostic::warn("b", "警告"));
        a.merge(b);
        assert_eq!(a.filter_by_level(DiagnosticLevel::Warn).len(), 1);
        assert!(!a.has_errors());
    }
}
