//! # 能带数据导出
//!
//! 导出能带结构到 CSV 和 XY 格式，供外部绘图工具使用。
//!
//! ## 支持格式
//! - 谱 CSV: k, energy, allowed, filled（完整谱，禁带 k 为空）
//! - 判据 CSV: ka, f, allowed, zone（半谱）
//! - XY: 带注释头的制表符分隔文本（禁带 k 写作 NaN）
//!
//! ## 依赖关系
//! - 被 `commands/solve.rs` 调用
//! - 使用 `kp/solver.rs` 的 BandStructure 结构
//! - 使用 `csv` + `serde` 写入 CSV 文件

use crate::error::{KpError, Result};
use crate::kp::criterion::zone_index;
use crate::kp::solver::BandStructure;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 谱 CSV 的一行
#[derive(Debug, Serialize)]
struct SpectrumRow {
    k: Option<f64>,
    energy: f64,
    allowed: bool,
    filled: bool,
}

/// 判据 CSV 的一行
#[derive(Debug, Serialize)]
struct CriterionRow {
    ka: f64,
    f: f64,
    allowed: bool,
    zone: u32,
}

/// 导出完整谱为 CSV
pub fn spectrum_to_csv(structure: &BandStructure, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for (point, &filled) in structure.full_spectrum().iter().zip(structure.filled()) {
        wtr.serialize(SpectrumRow {
            k: point.wavevector(),
            energy: point.energy(),
            allowed: point.is_allowed(),
            filled,
        })?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;

    Ok(())
}

/// 导出判据曲线为 CSV
pub fn criterion_to_csv(structure: &BandStructure, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    // allowed 为完整谱，后 N 个即正 k 半谱
    let seq = structure.sequences();
    let half_allowed = &seq.allowed[seq.allowed.len() - seq.ka.len()..];
    for ((&ka, &f), &allowed) in seq.ka.iter().zip(&seq.criterion).zip(half_allowed) {
        wtr.serialize(CriterionRow {
            ka,
            f,
            allowed,
            zone: zone_index(ka),
        })?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;

    Ok(())
}

/// 导出完整谱为 XY 格式
pub fn spectrum_to_xy(structure: &BandStructure, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut out = BufWriter::new(file);

    write_xy(structure, &mut out).map_err(|e| write_error(output_path, e))?;
    out.flush().map_err(|e| write_error(output_path, e))?;

    Ok(())
}

fn write_xy<W: Write>(structure: &BandStructure, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "# Kronig-Penney spectrum")?;
    writeln!(
        out,
        "# Barrier strength: {:.6}, Fermi level: {:.6}",
        structure.barrier, structure.fermi_level
    )?;
    writeln!(
        out,
        "# Units: a = {}, hbar = {}, m = {}",
        structure.units.lattice_constant, structure.units.hbar, structure.units.electron_mass
    )?;
    writeln!(out, "# Columns: k, E, allowed (0/1), filled (0/1)")?;
    writeln!(out, "#")?;

    let seq = structure.sequences();
    for i in 0..seq.wavevectors.len() {
        writeln!(
            out,
            "{:.6}\t{:.6}\t{}\t{}",
            seq.wavevectors[i],
            seq.energies[i],
            u8::from(seq.allowed[i]),
            u8::from(seq.filled[i])
        )?;
    }

    Ok(())
}

fn write_error(path: &Path, source: std::io::Error) -> KpError {
    KpError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}
