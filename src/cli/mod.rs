//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `solve`: 单组 (μ, Ef) 的能带计算与导出
//! - `sweep`: 对势垒强度 μ 并行扫描
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: solve, sweep

pub mod solve;
pub mod sweep;

use crate::kp::UnitSystem;
use clap::{Args, Parser, Subcommand};

/// 势垒强度 μ 的推荐范围（超出时仅警告）
pub const BARRIER_GUIDANCE: (f64, f64) = (0.0, 20.0);

/// 费米能级 Ef 的推荐范围（超出时仅警告）
pub const FERMI_GUIDANCE: (f64, f64) = (0.0, 45.0);

/// kpband - Kronig-Penney 能带结构工具
#[derive(Parser)]
#[command(name = "kpband")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Kronig-Penney band structure: allowed zones, extended-zone dispersion and Fermi filling",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Solve the band structure for one barrier strength and Fermi level
    Solve(solve::SolveArgs),

    /// Sweep the barrier strength and tabulate bands, gaps and conduction type
    Sweep(sweep::SweepArgs),
}

/// 单位制参数（两个子命令共用）
#[derive(Args, Debug, Clone)]
pub struct UnitArgs {
    /// Lattice constant a
    #[arg(long, default_value_t = 1.0)]
    pub lattice_constant: f64,

    /// Reduced Planck constant ħ
    #[arg(long, default_value_t = 1.0)]
    pub hbar: f64,

    /// Electron mass m
    #[arg(long, default_value_t = 1.0)]
    pub electron_mass: f64,
}

impl UnitArgs {
    pub fn to_units(&self) -> UnitSystem {
        UnitSystem {
            lattice_constant: self.lattice_constant,
            hbar: self.hbar,
            electron_mass: self.electron_mass,
        }
    }
}

/// 是否落在推荐范围内
pub fn within_guidance(value: f64, range: (f64, f64)) -> bool {
    value >= range.0 && value <= range.1
}
