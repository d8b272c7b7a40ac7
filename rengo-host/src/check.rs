//! # Check 模块
//!
//! 脚本检查（Dev Mode 自动诊断）。
//!
//! 在静态分析之外，再检查脚本引用的素材是否存在于资源目录中。

use std::path::Path;

use rengo_runtime::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, LoadError, ScriptProgram, analyze_program,
    asset_references,
};
use tracing::{error, info, warn};

/// 检查单个脚本文件
///
/// 脚本读取失败时返回错误；其余问题都以诊断形式返回。
pub fn check_script_file(
    script_path: &Path,
    assets_root: &Path,
) -> Result<DiagnosticResult, LoadError> {
    let program = ScriptProgram::load(script_path)?;
    let script_id = script_path.display().to_string();
    Ok(check_program(&script_id, &program, assets_root))
}

/// 检查已加载的脚本
pub fn check_program(
    script_id: &str,
    program: &ScriptProgram,
    assets_root: &Path,
) -> DiagnosticResult {
    let mut result = analyze_program(script_id, program);

    for reference in asset_references(program) {
        if assets_root.join(&reference.path).is_file() {
            continue;
        }
        result.push(
            Diagnostic::warn(
                script_id,
                format!("{}素材不存在: {}", reference.kind, reference.path),
            )
            .with_line(reference.line),
        );
    }

    result
}

/// 把诊断结果写入日志，返回错误数量
pub fn log_diagnostics(result: &DiagnosticResult) -> usize {
    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => {
                error!(script_id = %d.script_id, line = ?d.line, message = %d.message, "诊断错误")
            }
            DiagnosticLevel::Warn => {
                warn!(script_id = %d.script_id, line = ?d.line, message = %d.message, "诊断警告")
            }
            DiagnosticLevel::Info => {
                info!(script_id = %d.script_id, line = ?d.line, message = %d.message, "诊断信息")
            }
        }
    }

    let errors = result.error_count();
    let warnings = result.warn_count();
    if errors > 0 || warnings > 0 {
        warn!(errors, warnings, "脚本检查完成");
    } else {
        info!("脚本检查通过");
    }
    errors
}
