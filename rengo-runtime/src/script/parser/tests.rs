//! # Parser 测试

use super::*;

// -------------------------------------------------------------------------
// 图层类指令
// -------------------------------------------------------------------------

#[test]
fn test_parse_bg_without_transition() {
    let parsed = parse_command("bg 0 bg/room.png");
    assert!(parsed.errors.is_empty());
    assert_eq!(
        parsed.command,
        ScriptCommand::Background {
            layer: 0,
            path: "bg/room.png".to_string(),
            transition: None,
        }
    );
}

#[test]
fn test_parse_bg_with_transition() {
    let parsed = parse_command("bg 1 bg/night.png rule/mask.png transition");
    assert!(parsed.errors.is_empty());
    let ScriptCommand::Background { transition, .. } = parsed.command else {
        panic!("应解析为 Background");
    };
    let transition = transition.unwrap();
    assert_eq!(transition.name, "transition");
    assert_eq!(transition.get_positional(0), Some("rule/mask.png"));
}

#[test]
fn test_parse_bg_extra_transition_args() {
    let parsed = parse_command("bg 0 a.png - fade 0.5");
    let ScriptCommand::Background { transition, .. } = parsed.command else {
        panic!("应解析为 Background");
    };
    assert_eq!(
        transition,
        Some(Transition::with_args(
            "fade",
            vec!["-".to_string(), "0.5".to_string()]
        ))
    );
}

#[test]
fn test_parse_bg_mask_without_transition_name() {
    // 只有遮罩没有效果名：仍然设置图片，但记录缺参
    let parsed = parse_command("bg 0 a.png mask.png");
    assert!(matches!(
        parsed.command,
        ScriptCommand::Background {
            transition: None,
            ..
        }
    ));
    assert_eq!(parsed.errors, vec![missing("bg", "transition")]);
}

#[test]
fn test_parse_bg_invalid_layer() {
    let parsed = parse_command("bg top a.png");
    assert_eq!(
        parsed.command,
        ScriptCommand::Invalid {
            name: "bg".to_string()
        }
    );
    assert_eq!(
        parsed.errors,
        vec![ScriptSyntaxError::InvalidLayer {
            command: "bg".to_string(),
            value: "top".to_string(),
        }]
    );

    // 负数同样无效
    let parsed = parse_command("bg -1 a.png");
    assert!(matches!(parsed.command, ScriptCommand::Invalid { .. }));
}

#[test]
fn test_parse_bg_missing_path() {
    let parsed = parse_command("bg 0");
    assert!(matches!(parsed.command, ScriptCommand::Invalid { .. }));
    assert_eq!(parsed.errors, vec![missing("bg", "image")]);
}

#[test]
fn test_parse_chara() {
    let parsed = parse_command("chara 2 left chara/yuki.png");
    assert!(parsed.errors.is_empty());
    assert_eq!(
        parsed.command,
        ScriptCommand::Character {
            layer: 2,
            position: "left".to_string(),
            path: "chara/yuki.png".to_string(),
        }
    );

    let parsed = parse_command("chara 2 left");
    assert!(matches!(parsed.command, ScriptCommand::Invalid { .. }));
    assert_eq!(parsed.errors, vec![missing("chara", "image")]);
}

#[test]
fn test_parse_clear() {
    assert_eq!(
        parse_command("clear 3").command,
        ScriptCommand::Clear { layer: 3 }
    );
    let parsed = parse_command("clear");
    assert!(matches!(parsed.command, ScriptCommand::Invalid { .. }));
    assert_eq!(parsed.errors, vec![missing("clear", "layer")]);
}

// -------------------------------------------------------------------------
// 选择支
// -------------------------------------------------------------------------

#[test]
fn test_parse_choice_two_options() {
    let parsed = parse_command("choice 去公园 -> park 回家 -> home");
    assert!(parsed.errors.is_empty());
    assert_eq!(
        parsed.command,
        ScriptCommand::Choice {
            options: vec![Choice::new("去公园", "park"), Choice::new("回家", "home")],
        }
    );
}

#[test]
fn test_parse_choice_truncates_at_missing_arrow() {
    let parsed = parse_command("choice A -> a B => b C -> c");
    let ScriptCommand::Choice { options } = parsed.command else {
        panic!("应解析为 Choice");
    };
    assert_eq!(options, vec![Choice::new("A", "a")]);
    assert!(matches!(
        parsed.errors.as_slice(),
        [ScriptSyntaxError::MalformedChoice { group: 2, .. }]
    ));
}

#[test]
fn test_parse_choice_truncates_at_incomplete_group() {
    let parsed = parse_command("choice A -> a B ->");
    let ScriptCommand::Choice { options } = parsed.command else {
        panic!("应解析为 Choice");
    };
    assert_eq!(options.len(), 1);
    assert_eq!(parsed.errors.len(), 1);
}

#[test]
fn test_parse_choice_empty() {
    let parsed = parse_command("choice");
    assert_eq!(parsed.command, ScriptCommand::Choice { options: vec![] });
    assert!(parsed.errors.is_empty());
}

// -------------------------------------------------------------------------
// 好感度与条件
// -------------------------------------------------------------------------

#[test]
fn test_parse_affection() {
    assert_eq!(
        parse_command("affection Yuki -5").command,
        ScriptCommand::Affection {
            character: "Yuki".to_string(),
            delta: -5,
        }
    );
}

#[test]
fn test_parse_affection_bad_delta_reads_zero() {
    let parsed = parse_command("affection Yuki lots");
    assert_eq!(
        parsed.command,
        ScriptCommand::Affection {
            character: "Yuki".to_string(),
            delta: 0,
        }
    );
    assert_eq!(
        parsed.errors,
        vec![ScriptSyntaxError::InvalidInteger {
            param: "delta".to_string(),
            value: "lots".to_string(),
        }]
    );
}

#[test]
fn test_parse_affection_missing_delta() {
    let parsed = parse_command("affection Yuki");
    assert!(matches!(parsed.command, ScriptCommand::Invalid { .. }));
}

#[test]
fn test_parse_if_condition() {
    let parsed = parse_command("if affection Yuki >= 10");
    assert!(parsed.errors.is_empty());
    assert_eq!(
        parsed.command,
        ScriptCommand::If {
            condition: Condition::Affection {
                character: "Yuki".to_string(),
                op: CompareOp::Ge,
                value: 10,
            }
        }
    );
}

#[test]
fn test_parse_elseif_condition_uses_own_arguments() {
    let parsed = parse_command("elseif affection Mio != 3");
    assert_eq!(
        parsed.command,
        ScriptCommand::ElseIf {
            condition: Condition::Affection {
                character: "Mio".to_string(),
                op: CompareOp::Ne,
                value: 3,
            }
        }
    );
}

#[test]
fn test_parse_condition_incomplete() {
    let parsed = parse_command("if affection Yuki >=");
    assert!(matches!(
        parsed.command,
        ScriptCommand::If {
            condition: Condition::Invalid { .. }
        }
    ));
    assert!(matches!(
        parsed.errors.as_slice(),
        [ScriptSyntaxError::IncompleteCondition { .. }]
    ));
}

#[test]
fn test_parse_condition_unknown_subject() {
    let (condition, errors) = parse_condition(&["flag", "met", "==", "1"]);
    assert_eq!(
        condition,
        Condition::Invalid {
            text: "flag met == 1".to_string()
        }
    );
    assert_eq!(
        errors,
        vec![ScriptSyntaxError::UnknownConditionSubject {
            subject: "flag".to_string()
        }]
    );
}

#[test]
fn test_parse_condition_unknown_operator_and_bad_value() {
    let (condition, errors) = parse_condition(&["affection", "Yuki", "=>", "x"]);
    assert_eq!(
        condition,
        Condition::Affection {
            character: "Yuki".to_string(),
            op: CompareOp::Unknown("=>".to_string()),
            value: 0,
        }
    );
    assert_eq!(errors.len(), 2);
}

// -------------------------------------------------------------------------
// 其他
// -------------------------------------------------------------------------

#[test]
fn test_parse_markers_and_jump() {
    assert_eq!(parse_command("else").command, ScriptCommand::Else);
    assert_eq!(parse_command("endif").command, ScriptCommand::EndIf);
    assert_eq!(
        parse_command("jump  ending ").command,
        ScriptCommand::Jump {
            label: "ending".to_string()
        }
    );
    assert!(matches!(
        parse_command("jump").command,
        ScriptCommand::Invalid { .. }
    ));
}

#[test]
fn test_parse_unknown_and_empty() {
    assert_eq!(
        parse_command("shake 3").command,
        ScriptCommand::Unknown {
            name: "shake".to_string()
        }
    );
    // 指令名大小写敏感
    assert!(matches!(
        parse_command("BG 0 a.png").command,
        ScriptCommand::Unknown { .. }
    ));

    let parsed = parse_command("   ");
    assert_eq!(parsed.errors, vec![ScriptSyntaxError::EmptyCommand]);
}
