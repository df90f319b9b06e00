//! # Kronig-Penney 计算模块
//!
//! 一维周期势 Kronig-Penney 模型的能带计算。
//!
//! ## 子模块
//! - `grid`: Ka 采样网格
//! - `criterion`: 判据函数与扩展区映射
//! - `solver`: 能带求解与费米填充
//! - `analysis`: 能带/带隙提取与导电类型判定
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/solve.rs`, `commands/sweep.rs` 使用

pub mod analysis;
pub mod criterion;
pub mod export;
pub mod grid;
pub mod solver;

pub use analysis::{summarize, Conduction, SpectrumSummary, DEFAULT_GAP_THRESHOLD};
pub use solver::{BandSolver, BandStructure, UnitSystem};
