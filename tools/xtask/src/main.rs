//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `script-check`: 检查脚本文件（条件块配对、标签、素材引用）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rengo_host::check_script_file;
use rengo_runtime::DiagnosticResult;
use walkdir::WalkDir;
use xshell::{Shell, cmd};

/// 脚本文件扩展名
const SCRIPT_EXTENSION: &str = "rgo";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "RenGO 开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,

    /// 检查脚本文件
    ///
    /// 不带路径时检查 resource/script/ 下所有 .rgo 文件。
    ScriptCheck {
        /// 脚本文件或目录
        path: Option<PathBuf>,

        /// 资源根目录，素材路径相对于它解析
        #[arg(long, default_value = ".")]
        assets_root: PathBuf,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::ScriptCheck { path, assets_root } => script_check(path.as_deref(), &assets_root),
    }
}

fn check_all() -> anyhow::Result<()> {
    let sh = Shell::new()?;

    eprintln!("\n==> cargo fmt --all -- --check");
    cmd!(sh, "cargo fmt --all -- --check").run()?;

    eprintln!("\n==> cargo clippy --workspace --all-targets");
    cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

    eprintln!("\n==> cargo test --workspace");
    cmd!(sh, "cargo test --workspace").run()?;

    Ok(())
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 默认脚本目录（相对于 workspace root）
const DEFAULT_SCRIPTS_DIR: &str = "resource/script";

/// 执行脚本检查
fn script_check(path: Option<&Path>, assets_root: &Path) -> anyhow::Result<()> {
    let files = match path {
        Some(path) if path.is_file() => vec![path.to_path_buf()],
        Some(path) if path.is_dir() => collect_script_files(path),
        Some(path) => anyhow::bail!("路径不存在: {}", path.display()),
        None => {
            let dir = Path::new(DEFAULT_SCRIPTS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认脚本目录不存在: {DEFAULT_SCRIPTS_DIR}\n请在 workspace 根目录运行，或指定脚本路径"
                );
            }
            collect_script_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（.{SCRIPT_EXTENSION}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut diagnostics = DiagnosticResult::new();
    let mut load_errors = 0usize;
    for file in &files {
        match check_script_file(file, assets_root) {
            Ok(result) => diagnostics.merge(result),
            Err(e) => {
                eprintln!("[ERROR] {e}");
                load_errors += 1;
            }
        }
    }

    print_check_result(files.len(), load_errors, &diagnostics);

    if load_errors > 0 || diagnostics.has_errors() {
        anyhow::bail!("脚本检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有脚本文件
fn collect_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION))
        .collect();
    files.sort();
    files
}

/// 输出检查结果
fn print_check_result(scripts: usize, load_errors: usize, diagnostics: &DiagnosticResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {scripts} 个脚本");
    eprintln!();

    for diag in &diagnostics.diagnostics {
        eprintln!("{diag}");
    }

    let error_count = load_errors + diagnostics.error_count();
    let warn_count = diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {error_count} 个错误, {warn_count} 个警告");
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {warn_count} 个警告");
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
