//! # solve 子命令实现
//!
//! 计算单组 (μ, Ef) 的 Kronig-Penney 能带结构。
//!
//! ## 功能
//! - 终端打印能带/带隙表格与导电类型
//! - 可选导出数据文件 (CSV/XY)
//!
//! ## 依赖关系
//! - 使用 `cli/solve.rs` 定义的 SolveArgs
//! - 使用 `kp/` 模块进行计算与导出
//! - 使用 `utils/output.rs`

use crate::cli::solve::{ExportFormat, SolveArgs};
use crate::cli::{within_guidance, BARRIER_GUIDANCE, FERMI_GUIDANCE};
use crate::commands::validate_gap_threshold;
use crate::error::Result;
use crate::kp::analysis::{Band, Gap};
use crate::kp::{
    self, summarize, BandSolver, BandStructure, Conduction, SpectrumSummary, UnitSystem,
};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 能带表格行
#[derive(Tabled)]
struct BandRow {
    #[tabled(rename = "Band")]
    index: usize,
    #[tabled(rename = "Ka range")]
    ka_range: String,
    #[tabled(rename = "E range")]
    energy_range: String,
    #[tabled(rename = "k range")]
    k_range: String,
    #[tabled(rename = "Width")]
    width: String,
    #[tabled(rename = "Filling")]
    filling: String,
}

impl From<&Band> for BandRow {
    fn from(b: &Band) -> Self {
        BandRow {
            index: b.index,
            ka_range: format!("{:.4} .. {:.4}", b.ka_start, b.ka_end),
            energy_range: format!("{:.3} .. {:.3}", b.energy_min, b.energy_max),
            k_range: format!("{:.4} .. {:.4}", b.k_min, b.k_max),
            width: format!("{:.3}", b.width()),
            filling: b.filling().to_string(),
        }
    }
}

/// 带隙表格行
#[derive(Tabled)]
struct GapRow {
    #[tabled(rename = "Gap")]
    between: String,
    #[tabled(rename = "E range")]
    energy_range: String,
    #[tabled(rename = "Width")]
    width: String,
    #[tabled(rename = "Contains Ef")]
    contains_fermi: String,
}

impl GapRow {
    fn new(gap: &Gap, fermi_level: f64) -> Self {
        GapRow {
            between: format!("{} / {}", gap.below, gap.below + 1),
            energy_range: format!("{:.3} .. {:.3}", gap.energy_min, gap.energy_max),
            width: format!("{:.3}", gap.width),
            contains_fermi: (if gap.contains(fermi_level) { "yes" } else { "" }).to_string(),
        }
    }
}

/// 执行 solve 命令
pub fn execute(args: SolveArgs) -> Result<()> {
    output::print_header("Kronig-Penney Band Structure");

    validate_gap_threshold(args.gap_threshold)?;
    warn_outside_guidance(args.barrier, args.fermi);

    let structure = solve_with_units(args.units.to_units(), args.barrier, args.fermi)?;
    let summary = summarize(&structure, args.gap_threshold);

    print_parameters(&structure);
    print_summary(&structure, &summary, args.bands);

    if let Some(ref path) = args.output {
        let format = args
            .format
            .unwrap_or_else(|| guess_format_from_extension(path));
        export(&structure, path, format)?;
        output::print_success(&format!(
            "{} data saved to '{}'",
            format,
            path.display()
        ));
    }

    Ok(())
}

/// 默认单位走 `kp::solver::solve`，其余构造带单位的求解器
fn solve_with_units(units: UnitSystem, barrier: f64, fermi: f64) -> Result<BandStructure> {
    if units == UnitSystem::default() {
        kp::solver::solve(barrier, fermi)
    } else {
        BandSolver::new(units)?.solve(barrier, fermi)
    }
}

/// 超出推荐范围时给出警告（仍然计算）
fn warn_outside_guidance(barrier: f64, fermi: f64) {
    if barrier.is_finite() && !within_guidance(barrier, BARRIER_GUIDANCE) {
        output::print_warning(&format!(
            "Barrier strength {} is outside the recommended range {}-{}",
            barrier, BARRIER_GUIDANCE.0, BARRIER_GUIDANCE.1
        ));
    }
    if fermi.is_finite() && !within_guidance(fermi, FERMI_GUIDANCE) {
        output::print_warning(&format!(
            "Fermi level {} is outside the recommended range {}-{}",
            fermi, FERMI_GUIDANCE.0, FERMI_GUIDANCE.1
        ));
    }
}

fn print_parameters(structure: &BandStructure) {
    output::print_param("Barrier strength μ", &format!("{}", structure.barrier));
    output::print_param("Fermi level Ef", &format!("{}", structure.fermi_level));
    output::print_param(
        "Units (a, ħ, m)",
        &format!(
            "{}, {}, {}",
            structure.units.lattice_constant, structure.units.hbar, structure.units.electron_mass
        ),
    );
    output::print_param("Grid points", &structure.ka().len().to_string());
    println!();
}

fn print_summary(structure: &BandStructure, summary: &SpectrumSummary, max_bands: usize) {
    output::print_info(&format!(
        "Allowed fraction: {:.1}% of sampled Ka",
        summary.allowed_fraction * 100.0
    ));
    output::print_info(&format!(
        "Filled states: {} of {}",
        summary.filled_count,
        structure.full_spectrum().len()
    ));

    if summary.bands.is_empty() {
        output::print_warning("No allowed states in the sampled range");
        return;
    }

    let band_rows: Vec<BandRow> = summary
        .bands
        .iter()
        .take(max_bands)
        .map(BandRow::from)
        .collect();
    output::print_header(&format!("Allowed Bands ({})", summary.bands.len()));
    println!("{}", Table::new(&band_rows));

    if !summary.gaps.is_empty() {
        let gap_rows: Vec<GapRow> = summary
            .gaps
            .iter()
            .map(|g| GapRow::new(g, structure.fermi_level))
            .collect();
        output::print_header(&format!("Band Gaps ({})", summary.gaps.len()));
        println!("{}", Table::new(&gap_rows));
    }

    output::print_separator();
    let verdict = match summary.conduction {
        Conduction::Metal => "Metal: the Fermi level cuts through a partially filled band".to_string(),
        Conduction::Semiconductor { gap } => {
            format!("Semiconductor: filled bands below a gap of {:.3}", gap)
        }
        Conduction::Insulator { gap } => {
            format!("Insulator: filled bands below a gap of {:.3}", gap)
        }
        Conduction::Unfilled => "Unfilled: the Fermi level lies below the first band".to_string(),
        Conduction::Saturated => "Saturated: every sampled band is filled".to_string(),
    };
    output::print_success(&verdict);
}

/// 按格式导出
fn export(structure: &BandStructure, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Csv => kp::export::spectrum_to_csv(structure, path),
        ExportFormat::Criterion => kp::export::criterion_to_csv(structure, path),
        ExportFormat::Xy => kp::export::spectrum_to_xy(structure, path),
    }
}

/// 从文件扩展名推断导出格式
fn guess_format_from_extension(path: &Path) -> ExportFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("xy") | Some("dat") | Some("txt") => ExportFormat::Xy,
        _ => ExportFormat::Csv,
    }
}
