//! # Parser 模块
//!
//! 指令解析：把去掉 `@` 的指令行转换为 [`ScriptCommand`]。
//!
//! ## 设计原则
//!
//! - 按空白切分，不支持引号与转义
//! - 容错解析：格式错误就地截断恢复，错误随结果返回，由调用方记录
//! - 解析与执行解耦，每种指令可以单独测试

#[cfg(test)]
mod tests;

use crate::choice::Choice;
use crate::display::Transition;
use crate::error::ScriptSyntaxError;
use crate::script::command::{CompareOp, Condition, ScriptCommand};

/// 选择支中的箭头
pub const CHOICE_ARROW: &str = "->";

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// 解析出的指令（格式错误时可能为截断后的版本或 `Invalid`）
    pub command: ScriptCommand,
    /// 解析过程中恢复的错误
    pub errors: Vec<ScriptSyntaxError>,
}

impl ParsedCommand {
    fn ok(command: ScriptCommand) -> Self {
        Self {
            command,
            errors: Vec::new(),
        }
    }

    fn invalid(name: &str, error: ScriptSyntaxError) -> Self {
        Self {
            command: ScriptCommand::Invalid {
                name: name.to_string(),
            },
            errors: vec![error],
        }
    }
}

/// 解析一条指令（参数为去掉 `@` 后的内容）
pub fn parse_command(body: &str) -> ParsedCommand {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let Some((&name, args)) = tokens.split_first() else {
        return ParsedCommand::invalid("", ScriptSyntaxError::EmptyCommand);
    };

    match name {
        "bg" => parse_background(args),
        "chara" => parse_character(args),
        "choice" => parse_choice(args),
        "affection" => parse_affection(args),
        "if" | "elseif" => {
            let (condition, errors) = parse_condition(args);
            let command = if name == "if" {
                ScriptCommand::If { condition }
            } else {
                ScriptCommand::ElseIf { condition }
            };
            ParsedCommand { command, errors }
        }
        "else" => ParsedCommand::ok(ScriptCommand::Else),
        "endif" => ParsedCommand::ok(ScriptCommand::EndIf),
        "jump" => match args.first() {
            Some(label) => ParsedCommand::ok(ScriptCommand::Jump {
                label: label.to_string(),
            }),
            None => ParsedCommand::invalid(name, missing(name, "label")),
        },
        "clear" => match parse_layer(name, args.first()) {
            Ok(layer) => ParsedCommand::ok(ScriptCommand::Clear { layer }),
            Err(e) => ParsedCommand::invalid(name, e),
        },
        other => ParsedCommand::ok(ScriptCommand::Unknown {
            name: other.to_string(),
        }),
    }
}

/// `@bg <layer> <path> [<reserved> <transition> ...]`
fn parse_background(args: &[&str]) -> ParsedCommand {
    let layer = match parse_layer("bg", args.first()) {
        Ok(layer) => layer,
        Err(e) => return ParsedCommand::invalid("bg", e),
    };
    let Some(path) = args.get(1) else {
        return ParsedCommand::invalid("bg", missing("bg", "image"));
    };

    let mut errors = Vec::new();
    let transition = match args.get(2..) {
        Some([reserved, name, extra @ ..]) => {
            let mut transition_args = vec![reserved.to_string()];
            transition_args.extend(extra.iter().map(|s| s.to_string()));
            Some(Transition::with_args(*name, transition_args))
        }
        Some([_reserved]) => {
            errors.push(missing("bg", "transition"));
            None
        }
        _ => None,
    };

    ParsedCommand {
        command: ScriptCommand::Background {
            layer,
            path: path.to_string(),
            transition,
        },
        errors,
    }
}

/// `@chara <layer> <position> <path>`
fn parse_character(args: &[&str]) -> ParsedCommand {
    let layer = match parse_layer("chara", args.first()) {
        Ok(layer) => layer,
        Err(e) => return ParsedCommand::invalid("chara", e),
    };
    match (args.get(1), args.get(2)) {
        (Some(position), Some(path)) => ParsedCommand::ok(ScriptCommand::Character {
            layer,
            position: position.to_string(),
            path: path.to_string(),
        }),
        (None, _) => ParsedCommand::invalid("chara", missing("chara", "position")),
        (Some(_), None) => ParsedCommand::invalid("chara", missing("chara", "image")),
    }
}

/// `@choice <text> -> <label> ...`
///
/// 遇到不完整或缺少箭头的三元组时停止，保留已解析的部分。
fn parse_choice(args: &[&str]) -> ParsedCommand {
    let mut options = Vec::new();
    let mut errors = Vec::new();

    for (group, chunk) in args.chunks(3).enumerate() {
        match chunk {
            [text, arrow, label] if *arrow == CHOICE_ARROW => {
                options.push(Choice::new(*text, *label));
            }
            [_, arrow, _] => {
                errors.push(ScriptSyntaxError::MalformedChoice {
                    group: group + 1,
                    message: format!("缺少 '{CHOICE_ARROW}'，实际为 '{arrow}'"),
                });
                break;
            }
            _ => {
                errors.push(ScriptSyntaxError::MalformedChoice {
                    group: group + 1,
                    message: format!("不完整的选项: {}", chunk.join(" ")),
                });
                break;
            }
        }
    }

    ParsedCommand {
        command: ScriptCommand::Choice { options },
        errors,
    }
}

/// `@affection <character> <delta>`
fn parse_affection(args: &[&str]) -> ParsedCommand {
    let Some(character) = args.first() else {
        return ParsedCommand::invalid("affection", missing("affection", "character"));
    };
    let Some(raw_delta) = args.get(1) else {
        return ParsedCommand::invalid("affection", missing("affection", "delta"));
    };

    let mut errors = Vec::new();
    let delta = parse_int_or_zero("delta", raw_delta, &mut errors);

    ParsedCommand {
        command: ScriptCommand::Affection {
            character: character.to_string(),
            delta,
        },
        errors,
    }
}

/// 解析条件：`affection <character> <op> <int>`
///
/// 无法解析时返回 [`Condition::Invalid`]（恒为假），错误随结果返回。
pub fn parse_condition(args: &[&str]) -> (Condition, Vec<ScriptSyntaxError>) {
    let text = args.join(" ");
    let mut errors = Vec::new();

    let [subject, character, op, raw_value, ..] = args else {
        errors.push(ScriptSyntaxError::IncompleteCondition {
            condition: text.clone(),
        });
        return (Condition::Invalid { text }, errors);
    };

    if *subject != "affection" {
        errors.push(ScriptSyntaxError::UnknownConditionSubject {
            subject: subject.to_string(),
        });
        return (Condition::Invalid { text }, errors);
    }

    let op = op.parse::<CompareOp>().unwrap_or_else(|never| match never {});
    if let CompareOp::Unknown(operator) = &op {
        errors.push(ScriptSyntaxError::UnknownOperator {
            operator: operator.clone(),
        });
    }
    let value = parse_int_or_zero("value", raw_value, &mut errors);

    (
        Condition::Affection {
            character: character.to_string(),
            op,
            value,
        },
        errors,
    )
}

/// 解析图层索引
fn parse_layer(command: &str, raw: Option<&&str>) -> Result<usize, ScriptSyntaxError> {
    let raw = raw.ok_or_else(|| missing(command, "layer"))?;
    raw.parse::<usize>()
        .map_err(|_| ScriptSyntaxError::InvalidLayer {
            command: command.to_string(),
            value: raw.to_string(),
        })
}

/// 解析整数，失败时记录错误并返回 0
fn parse_int_or_zero(param: &str, raw: &str, errors: &mut Vec<ScriptSyntaxError>) -> i32 {
    raw.parse::<i32>().unwrap_or_else(|_| {
        errors.push(ScriptSyntaxError::InvalidInteger {
            param: param.to_string(),
            value: raw.to_string(),
        });
        0
    })
}

fn missing(command: &str, param: &str) -> ScriptSyntaxError {
    ScriptSyntaxError::MissingArgument {
        command: command.to_string(),
        param: param.to_string(),
    }
}
