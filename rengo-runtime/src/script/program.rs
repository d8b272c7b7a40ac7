//! # Program 模块
//!
//! 脚本源：加载后不可变的行序列。
//!
//! 加载时去掉空行和 `--` 注释行，并裁剪每行首尾空白，不做任何语法检查。
//! 同时记录每一行在源文件中的行号，并建立标签索引（同名标签以第一个为准）。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::LoadError;

/// 注释标记
pub const COMMENT_MARKER: &str = "--";
/// 指令标记
pub const COMMAND_MARKER: char = '@';
/// 标签标记
pub const LABEL_MARKER: char = ':';

/// 单行的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLine<'a> {
    /// 指令，内容为去掉 `@` 后的部分
    Command(&'a str),
    /// 标签，内容为裁剪后的标签名
    Label(&'a str),
    /// 对话文本
    Dialogue(&'a str),
}

impl<'a> ScriptLine<'a> {
    /// 对一行（已裁剪）进行分类
    pub fn classify(line: &'a str) -> Self {
        if let Some(body) = line.strip_prefix(COMMAND_MARKER) {
            Self::Command(body)
        } else if let Some(name) = line.strip_prefix(LABEL_MARKER) {
            Self::Label(name.trim())
        } else {
            Self::Dialogue(line)
        }
    }

    /// 如果是标签，返回标签名
    pub fn as_label(&self) -> Option<&'a str> {
        match self {
            Self::Label(name) => Some(name),
            _ => None,
        }
    }

    /// 如果是指令，返回指令名（第一个空白分隔的词）
    pub fn command_name(&self) -> Option<&'a str> {
        match self {
            Self::Command(body) => body.split_whitespace().next(),
            _ => None,
        }
    }
}

/// 加载后的脚本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptProgram {
    lines: Vec<String>,
    /// 每一行对应的源文件行号（从 1 开始）
    source_lines: Vec<usize>,
    /// 标签名到行索引的映射
    label_index: HashMap<String, usize>,
}

impl ScriptProgram {
    /// 从文本构建脚本
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut source_lines = Vec::new();

        for (line_idx, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                continue;
            }
            lines.push(trimmed.to_string());
            source_lines.push(line_idx + 1);
        }

        let mut program = Self {
            lines,
            source_lines,
            label_index: HashMap::new(),
        };
        program.build_label_index();
        program
    }

    /// 从文件加载脚本
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = Self::parse(&text);
        info!(path = %path.display(), lines = program.len(), "脚本加载完成");
        Ok(program)
    }

    /// 构建标签索引
    fn build_label_index(&mut self) {
        self.label_index.clear();
        for (index, line) in self.lines.iter().enumerate() {
            if let Some(name) = ScriptLine::classify(line).as_label() {
                self.label_index.entry(name.to_string()).or_insert(index);
            }
        }
    }

    /// 根据标签名查找标签所在行
    pub fn find_label(&self, name: &str) -> Option<usize> {
        self.label_index.get(name.trim()).copied()
    }

    /// 获取指定行
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// 全部行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 指定行在源文件中的行号
    pub fn source_line(&self, index: usize) -> Option<usize> {
        self.source_lines.get(index).copied()
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
