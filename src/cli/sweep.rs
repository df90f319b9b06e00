//! # sweep 子命令 CLI 定义
//!
//! 对势垒强度 μ 做并行扫描。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sweep.rs`

use super::UnitArgs;
use crate::kp::DEFAULT_GAP_THRESHOLD;
use clap::Args;
use std::path::PathBuf;

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Barrier strength range as start:end:step (e.g., "0:20:0.5")
    #[arg(short, long, default_value = "0:20:0.5")]
    pub range: String,

    /// Fermi level Ef used for every point of the sweep
    #[arg(short = 'e', long, default_value_t = 15.0, env = "KPBAND_FERMI")]
    pub fermi: f64,

    #[command(flatten)]
    pub units: UnitArgs,

    /// Gap width separating semiconductors from insulators
    #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD)]
    pub gap_threshold: f64,

    /// Output CSV file
    #[arg(short, long, default_value = "kp_sweep.csv")]
    pub output: PathBuf,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite an existing output file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
