//! # solve 子命令 CLI 定义
//!
//! 单组 (μ, Ef) 的能带计算。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/solve.rs`

use super::UnitArgs;
use crate::kp::DEFAULT_GAP_THRESHOLD;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 导出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    /// Full spectrum CSV (k, energy, allowed, filled)
    Csv,
    /// Criterion curve CSV (ka, f, allowed, zone)
    Criterion,
    /// XY text file with commented header
    Xy,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Criterion => write!(f, "criterion"),
            ExportFormat::Xy => write!(f, "xy"),
        }
    }
}

/// solve 子命令参数
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Barrier strength μ (recommended 0-20)
    #[arg(short, long, default_value_t = 3.0, env = "KPBAND_BARRIER")]
    pub barrier: f64,

    /// Fermi level Ef (recommended 0-45)
    #[arg(short = 'e', long, default_value_t = 15.0, env = "KPBAND_FERMI")]
    pub fermi: f64,

    #[command(flatten)]
    pub units: UnitArgs,

    /// Gap width separating semiconductors from insulators
    #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD)]
    pub gap_threshold: f64,

    /// Export the computed data to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Maximum number of bands listed in the summary table
    #[arg(long, default_value_t = 10)]
    pub bands: usize,
}
