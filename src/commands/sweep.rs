//! # sweep 子命令实现
//!
//! 对势垒强度 μ 做等间距扫描，每个 μ 独立求解一次。
//!
//! ## 功能
//! - 并行计算（rayon）
//! - 每个 μ 汇总为一行：允许比例、能带数、第一带隙宽度、占据数、导电类型
//! - 导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/sweep.rs` 定义的 SweepArgs
//! - 使用 `batch/` 模块进行并行处理
//! - 使用 `kp/` 模块进行计算

use crate::batch::{BatchResult, BatchRunner, ProcessResult};
use crate::cli::sweep::SweepArgs;
use crate::cli::{within_guidance, FERMI_GUIDANCE};
use crate::commands::validate_gap_threshold;
use crate::error::{KpError, Result};
use crate::kp::solver::validate_input;
use crate::kp::{summarize, BandSolver};
use crate::utils::output;

use serde::Serialize;
use std::path::Path;

/// 扫描点上限
const MAX_SWEEP_POINTS: usize = 100_000;

/// 扫描结果的一行
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub barrier: f64,
    pub allowed_fraction: f64,
    pub band_count: usize,
    pub first_gap_width: Option<f64>,
    pub filled_count: usize,
    pub conduction: String,
}

/// 执行 sweep 命令
pub fn execute(args: SweepArgs) -> Result<()> {
    output::print_header("Kronig-Penney Barrier Sweep");

    if args.output.exists() && !args.overwrite {
        output::print_warning(&format!(
            "Output exists, skipping: {} (use --overwrite)",
            args.output.display()
        ));
        return Ok(());
    }

    validate_gap_threshold(args.gap_threshold)?;
    validate_input("fermi level", args.fermi)?;
    let barriers = parse_sweep_range(&args.range)?;
    let solver = BandSolver::new(args.units.to_units())?;

    if args.fermi.is_finite() && !within_guidance(args.fermi, FERMI_GUIDANCE) {
        output::print_warning(&format!(
            "Fermi level {} is outside the recommended range {}-{}",
            args.fermi, FERMI_GUIDANCE.0, FERMI_GUIDANCE.1
        ));
    }

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Sweeping {} barrier values at Ef = {} ({} jobs)",
        barriers.len(),
        args.fermi,
        runner.jobs()
    ));

    let result = runner.run(barriers, |&mu| {
        match sweep_point(&solver, mu, args.fermi, args.gap_threshold) {
            Ok(row) => ProcessResult::Success(row),
            Err(e) => ProcessResult::Failed(format!("μ = {}", mu), e.to_string()),
        }
    })?;

    check_outcome(&result)?;
    write_rows(&result.outputs, &args.output)?;

    // 打印统计
    output::print_separator();
    output::print_success(&format!(
        "Sweep complete: {} of {} points succeeded, {} failed",
        result.success(),
        result.total(),
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed points:");
        for (label, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", label, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    output::print_success(&format!("Sweep saved to '{}'", args.output.display()));

    Ok(())
}

/// 单个 μ 的计算与汇总
pub fn sweep_point(
    solver: &BandSolver,
    barrier: f64,
    fermi_level: f64,
    gap_threshold: f64,
) -> Result<SweepRow> {
    let structure = solver.solve(barrier, fermi_level)?;
    let summary = summarize(&structure, gap_threshold);

    Ok(SweepRow {
        barrier,
        allowed_fraction: summary.allowed_fraction,
        band_count: summary.bands.len(),
        first_gap_width: summary.first_gap_width(),
        filled_count: summary.filled_count,
        conduction: summary.conduction.to_string(),
    })
}

/// 全部点失败时不写文件
fn check_outcome(result: &BatchResult<SweepRow>) -> Result<()> {
    if result.outputs.is_empty() && result.failed > 0 {
        let reason = result
            .failures
            .first()
            .map(|(_, err)| err.as_str())
            .unwrap_or("unknown error");
        return Err(KpError::Other(format!(
            "all {} sweep points failed: {}",
            result.failed, reason
        )));
    }
    Ok(())
}

/// 写入扫描结果 CSV
fn write_rows(rows: &[SweepRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(|e| KpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 解析 "start:end:step" 扫描范围
pub fn parse_sweep_range(range: &str) -> Result<Vec<f64>> {
    let parts: Vec<&str> = range.split(':').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(KpError::InvalidRange(format!(
            "{} (expected start:end:step)",
            range
        )));
    }

    let parse = |s: &str| -> Result<f64> {
        s.parse::<f64>()
            .map_err(|_| KpError::InvalidRange(range.to_string()))
    };
    let start = parse(parts[0])?;
    let end = parse(parts[1])?;
    let step = parse(parts[2])?;

    if !start.is_finite() || start < 0.0 {
        return Err(KpError::invalid_parameter(
            "sweep start",
            start,
            "must be a finite number >= 0",
        ));
    }
    if !end.is_finite() || end < start {
        return Err(KpError::invalid_parameter(
            "sweep end",
            end,
            "must be finite and >= start",
        ));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(KpError::invalid_parameter(
            "sweep step",
            step,
            "must be a finite positive number",
        ));
    }

    // 容忍浮点误差，使 end 恰好落在网格上时被包含；先在 f64 上判断再转换
    let count = ((end - start) / step + 1e-9).floor() + 1.0;
    if !count.is_finite() || count > MAX_SWEEP_POINTS as f64 {
        return Err(KpError::InvalidRange(format!(
            "{} ({} points exceeds the limit of {})",
            range, count, MAX_SWEEP_POINTS
        )));
    }
    let count = count as usize;

    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
