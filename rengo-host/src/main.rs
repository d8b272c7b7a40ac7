//! # rengo
//!
//! 无渲染运行 RenGO 脚本：加载配置与入口脚本，以自动输入驱动到结束，输出对话记录。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p rengo-host
//! cargo run -p rengo-host -- --script resource/script/first.rgo --choices 1,0
//! cargo run -p rengo-host -- --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use rengo_host::{AppConfig, AutoInput, Driver, check_script_file, log_diagnostics};

#[derive(Parser)]
#[command(name = "rengo")]
#[command(about = "RenGO 视觉小说脚本解释器（无渲染）")]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 资源根目录（覆盖配置）
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// 入口脚本（相对于资源根目录，覆盖配置）
    #[arg(short, long)]
    script: Option<String>,

    /// 依次选择的选项索引，例如 `1,0`
    #[arg(long, value_delimiter = ',')]
    choices: Vec<usize>,

    /// 最大帧数
    #[arg(long, default_value_t = 100_000)]
    max_frames: u64,

    /// 点击时立即补全文本，不等逐字显示
    #[arg(long)]
    skip_reveal: bool,

    /// 日志级别（覆盖配置）
    #[arg(long)]
    log_level: Option<String>,

    /// 只检查脚本，不运行
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "启动失败");
            eprintln!("rengo error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 日志尚未初始化，加载结果在初始化之后再报告
    let loaded = AppConfig::try_load(&cli.config);
    let mut config = loaded.as_ref().ok().cloned().unwrap_or_default();
    if let Some(root) = cli.assets_root {
        config.assets_root = root;
    }
    if let Some(script) = cli.script {
        config.start_script_path = script;
    }
    if let Some(level) = cli.log_level {
        config.debug.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_target(false)
        .init();

    match &loaded {
        Ok(_) => info!(path = %cli.config.display(), "配置文件加载成功"),
        Err(e) => warn!(error = %e, "配置文件不可用，使用默认配置"),
    }

    config.validate().context("配置无效")?;

    if cli.check || config.debug.script_check {
        info!("运行脚本检查...");
        let result = check_script_file(&config.start_script_full_path(), &config.assets_root)?;
        let errors = log_diagnostics(&result);
        if cli.check {
            return Ok(if errors > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            });
        }
    }

    let input = AutoInput::new(cli.choices).with_skip_reveal(cli.skip_reveal);
    let mut driver = Driver::new(&config, input)?;
    let summary = driver.run(cli.max_frames)?;

    for line in &summary.transcript {
        println!("{line}");
    }
    info!(
        frames = summary.frames,
        lines = summary.transcript.len(),
        selections = ?summary.selections,
        finished = summary.finished,
        "运行结束"
    );

    Ok(if summary.finished {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
