//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `kp/`, `batch/`, `utils/`
//! - 子模块: solve, sweep

pub mod solve;
pub mod sweep;

use crate::cli::Commands;
use crate::error::{KpError, Result};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Solve(args) => solve::execute(args),
        Commands::Sweep(args) => sweep::execute(args),
    }
}

/// 带隙阈值必须为有限非负数
pub(crate) fn validate_gap_threshold(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(KpError::invalid_parameter(
            "gap threshold",
            value,
            "must be a finite number >= 0",
        ));
    }
    Ok(())
}
