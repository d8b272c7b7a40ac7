//! 无渲染宿主端到端测试
//!
//! 在临时目录中准备脚本与素材，用 [`Driver`] 跑完整个脚本。

use std::fs;
use std::path::Path;

use rengo_host::{AppConfig, AutoInput, Driver};
use rengo_runtime::{LoadError, RuntimeError};
use tempfile::TempDir;

const STORY: &str = "\
:start
早上好。
Yuki: 要不要一起出去走走？
@choice 去公园 -> park 待在家里 -> home

:park
@affection Yuki 10
Yuki: 樱花开了。
@jump ending

:home
@affection Yuki -5
Yuki: 那我自己去啦。
@jump ending

:ending
@if affection Yuki >= 10
Yuki: 下次再一起来吧。
@else
（Yuki 没有回头。）
@endif
";

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup(script: &str, assets: &[&str]) -> (TempDir, AppConfig) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "resource/script/first.rgo", script.as_bytes());
    for asset in assets {
        write(dir.path(), asset, b"");
    }
    let config = AppConfig {
        assets_root: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    config.validate().unwrap();
    (dir, config)
}

#[test]
fn test_first_choice_path() {
    let (_dir, config) = setup(STORY, &[]);
    let mut driver = Driver::new(&config, AutoInput::new(vec![0])).unwrap();

    let summary = driver.run(10_000).unwrap();
    assert!(summary.finished);
    assert_eq!(summary.selections, vec!["去公园"]);
    assert_eq!(
        summary.transcript,
        vec![
            "早上好。",
            "Yuki: 要不要一起出去走走？",
            "Yuki: 樱花开了。",
            "Yuki: 下次再一起来吧。",
        ]
    );
    assert_eq!(driver.interpreter.affection().get("Yuki"), 10);
    assert!(driver.display.render_state.choice_menu.is_none());
}

#[test]
fn test_second_choice_path() {
    let (_dir, config) = setup(STORY, &[]);
    let mut driver = Driver::new(&config, AutoInput::new(vec![1])).unwrap();

    let summary = driver.run(10_000).unwrap();
    assert!(summary.finished);
    assert_eq!(summary.selections, vec!["待在家里"]);
    assert_eq!(
        summary.transcript.last().map(String::as_str),
        Some("（Yuki 没有回头。）")
    );
    assert_eq!(driver.interpreter.affection().get("Yuki"), 0);
}

#[test]
fn test_skip_reveal_uses_fewer_frames() {
    let (_dir, config) = setup(STORY, &[]);

    let mut slow = Driver::new(&config, AutoInput::new(vec![0])).unwrap();
    let slow = slow.run(10_000).unwrap();

    let mut fast =
        Driver::new(&config, AutoInput::new(vec![0]).with_skip_reveal(true)).unwrap();
    let fast = fast.run(10_000).unwrap();

    assert_eq!(slow.transcript, fast.transcript);
    assert!(fast.frames < slow.frames);
}

#[test]
fn test_background_and_mask_transition() {
    let script = "\
@bg 0 bg/room.png
@chara 1 left chara/yuki.png
第一句。
@bg 0 bg/park.png rule/mask.png transition
第二句。
";
    let (_dir, mut config) = setup(
        script,
        &["bg/room.png", "bg/park.png", "rule/mask.png", "chara/yuki.png"],
    );
    config.effects.transition_speed = 0.5;
    let mut driver = Driver::new(&config, AutoInput::default()).unwrap();

    let summary = driver.run(10_000).unwrap();
    assert!(summary.finished);

    let state = &driver.display.render_state;
    assert_eq!(state.layer(0).unwrap().image.as_deref(), Some("bg/park.png"));
    assert_eq!(
        state.layer(1).unwrap().character.as_ref().map(|c| c.path.as_str()),
        Some("chara/yuki.png")
    );
    // 过渡在第二句显示期间完成
    assert!(!driver.display.effects.has_active_effects());
    assert!(state.layer(0).unwrap().overlay.is_none());
}

#[test]
fn test_missing_asset_does_not_stop_script() {
    let script = "@bg 0 bg/none.png\n@chara 9 left chara/yuki.png\n还在继续。\n";
    let (_dir, config) = setup(script, &["chara/yuki.png"]);
    let mut driver = Driver::new(&config, AutoInput::default()).unwrap();

    let summary = driver.run(10_000).unwrap();
    assert!(summary.finished);
    assert_eq!(summary.transcript, vec!["还在继续。"]);
    assert!(driver.display.render_state.layers().iter().all(|l| !l.is_visible()));
}

#[test]
fn test_frame_limit() {
    let (_dir, config) = setup(":loop\n@jump loop\n", &[]);
    let mut driver = Driver::new(&config, AutoInput::default()).unwrap();

    let summary = driver.run(100).unwrap();
    assert!(!summary.finished);
    assert_eq!(summary.frames, 100);
}

#[test]
fn test_invalid_scripted_choice() {
    let (_dir, config) = setup(STORY, &[]);
    let mut driver = Driver::new(&config, AutoInput::new(vec![5])).unwrap();

    let result = driver.run(10_000);
    assert_eq!(
        result,
        Err(RuntimeError::InvalidChoiceIndex { index: 5, max: 2 })
    );
}

#[test]
fn test_missing_start_script() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        assets_root: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let result = Driver::new(&config, AutoInput::default());
    assert!(matches!(result, Err(LoadError::Io { .. })));
}
