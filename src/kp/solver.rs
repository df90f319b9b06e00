//! # Kronig-Penney 能带求解器
//!
//! 由势垒强度 μ 与费米能级 Ef 计算完整的一维能带结构。
//!
//! ## 算法概述
//! 1. 生成 Ka 采样网格（排除 0）
//! 2. 计算判据 f(Ka) = cos(Ka) + μ·sin(Ka)/Ka
//! 3. |f| ≤ 1 为允许带，否则为禁带
//! 4. 能量 E = ħ²·Ka²/(m·a²)
//! 5. 按布里渊区编号映射到扩展区波矢 k
//! 6. 镜像到负 k（时间反演对称 E(k) = E(−k)）
//! 7. E ≤ Ef 的允许态标记为已占据
//!
//! ## 依赖关系
//! - 被 `commands/solve.rs`, `commands/sweep.rs` 调用
//! - 使用 `kp/grid.rs`, `kp/criterion.rs`

use crate::error::{KpError, Result};
use crate::kp::criterion;
use crate::kp::grid::SampleGrid;

/// 单位制
///
/// 默认归一化单位 ħ = m = a = 1，此时 E = Ka²。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSystem {
    /// 晶格常数 a
    pub lattice_constant: f64,
    /// 约化普朗克常数 ħ
    pub hbar: f64,
    /// 电子质量 m
    pub electron_mass: f64,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            lattice_constant: 1.0,
            hbar: 1.0,
            electron_mass: 1.0,
        }
    }
}

impl UnitSystem {
    /// 检查所有常数为有限正数
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("lattice_constant", self.lattice_constant),
            ("hbar", self.hbar),
            ("electron_mass", self.electron_mass),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(KpError::invalid_parameter(
                    name,
                    value,
                    "must be a finite positive number",
                ));
            }
        }
        Ok(())
    }

    /// 能量标度 ħ²/(m·a²)
    pub fn energy_scale(&self) -> f64 {
        self.hbar * self.hbar / (self.electron_mass * self.lattice_constant * self.lattice_constant)
    }
}

/// 单个谱点的分类结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectrumPoint {
    /// 允许带：存在实数波矢
    Allowed { k: f64, energy: f64 },
    /// 禁带：无实数波矢
    Forbidden { energy: f64 },
}

impl SpectrumPoint {
    pub fn energy(&self) -> f64 {
        match *self {
            SpectrumPoint::Allowed { energy, .. } | SpectrumPoint::Forbidden { energy } => energy,
        }
    }

    pub fn wavevector(&self) -> Option<f64> {
        match *self {
            SpectrumPoint::Allowed { k, .. } => Some(k),
            SpectrumPoint::Forbidden { .. } => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, SpectrumPoint::Allowed { .. })
    }

    /// 时间反演后的对应点 (k → −k)
    fn mirrored(&self) -> Self {
        match *self {
            SpectrumPoint::Allowed { k, energy } => SpectrumPoint::Allowed { k: -k, energy },
            forbidden => forbidden,
        }
    }

    /// 是否在 Ef 以下被占据
    fn is_filled(&self, fermi_level: f64) -> bool {
        match *self {
            SpectrumPoint::Allowed { energy, .. } => energy <= fermi_level,
            SpectrumPoint::Forbidden { .. } => false,
        }
    }
}

/// 输出边界上的六个数值序列
///
/// `wavevectors` 中禁带位置为 NaN，供绘图端直接使用。
#[derive(Debug, Clone)]
pub struct KpSequences {
    pub ka: Vec<f64>,
    pub criterion: Vec<f64>,
    pub wavevectors: Vec<f64>,
    pub energies: Vec<f64>,
    pub allowed: Vec<bool>,
    pub filled: Vec<bool>,
}

/// 完整能带结构
#[derive(Debug, Clone)]
pub struct BandStructure {
    /// 势垒强度 μ
    pub barrier: f64,
    /// 费米能级 Ef
    pub fermi_level: f64,
    /// 使用的单位制
    pub units: UnitSystem,
    ka: Vec<f64>,
    criterion: Vec<f64>,
    /// 正 k 半谱，与 `ka` 一一对应
    half: Vec<SpectrumPoint>,
    /// 负 k 镜像 + 正 k 半谱
    full: Vec<SpectrumPoint>,
    filled: Vec<bool>,
}

impl BandStructure {
    /// Ka 采样值（长度 N）
    pub fn ka(&self) -> &[f64] {
        &self.ka
    }

    /// 正 k 半谱（长度 N）
    pub fn half_spectrum(&self) -> &[SpectrumPoint] {
        &self.half
    }

    /// 完整谱（长度 2N）
    pub fn full_spectrum(&self) -> &[SpectrumPoint] {
        &self.full
    }

    /// 占据掩码（长度 2N）
    pub fn filled(&self) -> &[bool] {
        &self.filled
    }

    /// 扩展区波矢，禁带为 NaN（长度 2N）
    pub fn wavevectors(&self) -> Vec<f64> {
        self.full
            .iter()
            .map(|p| p.wavevector().unwrap_or(f64::NAN))
            .collect()
    }

    /// 能量（长度 2N）
    pub fn energies(&self) -> Vec<f64> {
        self.full.iter().map(SpectrumPoint::energy).collect()
    }

    /// 允许带掩码（长度 2N）
    pub fn allowed(&self) -> Vec<bool> {
        self.full.iter().map(SpectrumPoint::is_allowed).collect()
    }

    /// 半谱中允许点所占比例
    pub fn allowed_fraction(&self) -> f64 {
        if self.half.is_empty() {
            return 0.0;
        }
        let count = self.half.iter().filter(|p| p.is_allowed()).count();
        count as f64 / self.half.len() as f64
    }

    /// 已占据态数目（完整谱）
    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|&&f| f).count()
    }

    /// 导出六个序列
    pub fn sequences(&self) -> KpSequences {
        KpSequences {
            ka: self.ka.clone(),
            criterion: self.criterion.clone(),
            wavevectors: self.wavevectors(),
            energies: self.energies(),
            allowed: self.allowed(),
            filled: self.filled.clone(),
        }
    }
}

/// Kronig-Penney 求解器
///
/// 无内部可变状态，可在多个线程间共享。
#[derive(Debug, Clone, Default)]
pub struct BandSolver {
    units: UnitSystem,
    grid: SampleGrid,
}

impl BandSolver {
    /// 使用指定单位制和默认网格
    pub fn new(units: UnitSystem) -> Result<Self> {
        units.validate()?;
        Ok(Self {
            units,
            grid: SampleGrid::default(),
        })
    }

    /// 计算能带结构
    pub fn solve(&self, barrier: f64, fermi_level: f64) -> Result<BandStructure> {
        validate_input("barrier strength", barrier)?;
        validate_input("fermi level", fermi_level)?;

        let ka: Vec<f64> = self.grid.values().to_vec();
        let f_values: Vec<f64> = ka
            .iter()
            .map(|&x| criterion::criterion(x, barrier))
            .collect();

        let scale = self.units.energy_scale();
        let a = self.units.lattice_constant;

        let half: Vec<SpectrumPoint> = ka
            .iter()
            .zip(&f_values)
            .map(|(&x, &f)| {
                let energy = scale * x * x;
                match criterion::extended_wavevector(x, f) {
                    Some(ka_ext) => SpectrumPoint::Allowed {
                        k: ka_ext / a,
                        energy,
                    },
                    None => SpectrumPoint::Forbidden { energy },
                }
            })
            .collect();

        let full: Vec<SpectrumPoint> = half
            .iter()
            .rev()
            .map(SpectrumPoint::mirrored)
            .chain(half.iter().copied())
            .collect();

        let filled: Vec<bool> = full.iter().map(|p| p.is_filled(fermi_level)).collect();

        Ok(BandStructure {
            barrier,
            fermi_level,
            units: self.units,
            ka,
            criterion: f_values,
            half,
            full,
            filled,
        })
    }
}

/// 使用默认单位制 (ħ = m = a = 1) 计算，此时 E = Ka²
///
/// `solve` 命令在未指定单位时走这里；自定义单位请用 [`BandSolver::new`]。
pub fn solve(barrier: f64, fermi_level: f64) -> Result<BandStructure> {
    BandSolver::default().solve(barrier, fermi_level)
}

/// 物理输入必须为有限非负数
pub(crate) fn validate_input(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(KpError::invalid_parameter(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(KpError::invalid_parameter(name, value, "must be >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kp::grid::GRID_POINTS;
    use std::f64::consts::PI;

    #[test]
    fn test_sequence_lengths() {
        let bs = solve(3.0, 15.0).unwrap();
        let seq = bs.sequences();
        assert_eq!(seq.ka.len(), GRID_POINTS);
        assert_eq!(seq.criterion.len(), GRID_POINTS);
        assert_eq!(seq.wavevectors.len(), 2 * GRID_POINTS);
        assert_eq!(seq.energies.len(), 2 * GRID_POINTS);
        assert_eq!(seq.allowed.len(), 2 * GRID_POINTS);
        assert_eq!(seq.filled.len(), 2 * GRID_POINTS);
    }

    #[test]
    fn test_energy_is_ka_squared_and_monotonic() {
        let bs = solve(3.0, 15.0).unwrap();
        for (ka, p) in bs.ka().iter().zip(bs.half_spectrum()) {
            assert_eq!(p.energy(), ka * ka);
        }
        for w in bs.half_spectrum().windows(2) {
            assert!(w[1].energy() >= w[0].energy());
        }
    }

    #[test]
    fn test_free_electron_all_allowed() {
        let bs = solve(0.0, 15.0).unwrap();
        assert!(bs.allowed().iter().all(|&a| a));
        assert_eq!(bs.allowed_fraction(), 1.0);
    }

    #[test]
    fn test_allowed_count_decreases_with_barrier() {
        let free = solve(0.0, 15.0).unwrap().allowed_fraction();
        let medium = solve(3.0, 15.0).unwrap().allowed_fraction();
        let strong = solve(20.0, 15.0).unwrap().allowed_fraction();
        assert!(free > medium, "{} vs {}", free, medium);
        assert!(medium > strong, "{} vs {}", medium, strong);
    }

    #[test]
    fn test_first_gap_opens_at_zone_boundary() {
        let bs = solve(3.0, 15.0).unwrap();
        let half = bs.half_spectrum();

        // 第一个“允许 → 禁止”跃迁
        let idx = half
            .windows(2)
            .position(|w| w[0].is_allowed() && !w[1].is_allowed())
            .expect("a gap must follow the first band");
        let ka_gap = bs.ka()[idx + 1];
        let step = bs.ka()[1] - bs.ka()[0];

        assert!(ka_gap >= PI - step, "gap starts at Ka = {}", ka_gap);
        assert!(ka_gap <= PI + 2.0 * step, "gap starts at Ka = {}", ka_gap);
    }

    #[test]
    fn test_band_bottom_is_filled() {
        let bs = solve(3.0, 15.0).unwrap();
        let min_k = bs
            .full_spectrum()
            .iter()
            .zip(bs.filled())
            .filter(|(_, &f)| f)
            .filter_map(|(p, _)| p.wavevector())
            .map(f64::abs)
            .fold(f64::INFINITY, f64::min);
        assert!(min_k < 0.25, "closest filled |k| = {}", min_k);
    }

    #[test]
    fn test_occupation_grows_with_fermi_level() {
        let levels = [0.0, 5.0, 15.0, 30.0, 45.0, 100.0];
        let masks: Vec<Vec<bool>> = levels
            .iter()
            .map(|&ef| solve(3.0, ef).unwrap().filled().to_vec())
            .collect();

        for pair in masks.windows(2) {
            for (lo, hi) in pair[0].iter().zip(&pair[1]) {
                assert!(!lo || *hi, "filled set must only grow with Ef");
            }
        }
    }

    #[test]
    fn test_filled_implies_allowed_and_below_fermi() {
        let bs = solve(3.0, 15.0).unwrap();
        let seq = bs.sequences();
        for i in 0..seq.filled.len() {
            if seq.filled[i] {
                assert!(seq.allowed[i]);
                assert!(!seq.wavevectors[i].is_nan());
                assert!(seq.energies[i] <= 15.0);
            }
        }
    }

    #[test]
    fn test_time_reversal_symmetry() {
        let bs = solve(3.0, 15.0).unwrap();
        let full = bs.full_spectrum();
        let len = full.len();
        for j in 0..len {
            let mirror = &full[len - 1 - j];
            assert_eq!(full[j].energy(), mirror.energy());
            assert_eq!(full[j].is_allowed(), mirror.is_allowed());
            assert_eq!(full[j].wavevector(), mirror.wavevector().map(|k| -k));
        }
    }

    #[test]
    fn test_wavevector_increases_within_zone() {
        let bs = solve(3.0, 15.0).unwrap();
        let half = bs.half_spectrum();
        for (i, w) in half.windows(2).enumerate() {
            let (ka0, ka1) = (bs.ka()[i], bs.ka()[i + 1]);
            if criterion::zone_index(ka0) != criterion::zone_index(ka1) {
                continue;
            }
            if let (Some(k0), Some(k1)) = (w[0].wavevector(), w[1].wavevector()) {
                assert!(k1 >= k0, "k must not decrease inside a zone at Ka = {}", ka1);
            }
        }
    }

    #[test]
    fn test_forbidden_points_have_nan_wavevector() {
        let bs = solve(3.0, 15.0).unwrap();
        for (k, allowed) in bs.wavevectors().iter().zip(bs.allowed()) {
            assert_eq!(k.is_nan(), !allowed);
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let a = solve(7.5, 22.0).unwrap().sequences();
        let b = solve(7.5, 22.0).unwrap().sequences();

        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.ka), bits(&b.ka));
        assert_eq!(bits(&a.criterion), bits(&b.criterion));
        assert_eq!(bits(&a.wavevectors), bits(&b.wavevectors));
        assert_eq!(bits(&a.energies), bits(&b.energies));
        assert_eq!(a.allowed, b.allowed);
        assert_eq!(a.filled, b.filled);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            solve(-1.0, 15.0),
            Err(KpError::InvalidParameter { .. })
        ));
        assert!(matches!(
            solve(3.0, -0.5),
            Err(KpError::InvalidParameter { .. })
        ));
        assert!(solve(f64::NAN, 15.0).is_err());
        assert!(solve(3.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_out_of_guidance_range_is_accepted() {
        assert!(solve(50.0, 100.0).is_ok());
    }

    #[test]
    fn test_unit_system_scaling() {
        let units = UnitSystem {
            lattice_constant: 2.0,
            hbar: 1.0,
            electron_mass: 0.5,
        };
        let solver = BandSolver::new(units).unwrap();
        let scaled = solver.solve(3.0, 15.0).unwrap();
        let unit = solve(3.0, 15.0).unwrap();

        // ħ²/(m·a²) = 1/(0.5·4) = 0.5
        for (s, u) in scaled.half_spectrum().iter().zip(unit.half_spectrum()) {
            assert!((s.energy() - 0.5 * u.energy()).abs() < 1e-12);
            assert_eq!(s.is_allowed(), u.is_allowed());
            if let (Some(ks), Some(ku)) = (s.wavevector(), u.wavevector()) {
                assert!((ks - ku / 2.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_unit_system_rejects_non_positive() {
        let units = UnitSystem {
            lattice_constant: 0.0,
            ..UnitSystem::default()
        };
        assert!(BandSolver::new(units).is_err());

        let units = UnitSystem {
            hbar: f64::NAN,
            ..UnitSystem::default()
        };
        assert!(BandSolver::new(units).is_err());
    }

    #[test]
    fn test_default_solve_matches_default_solver() {
        let free = solve(3.0, 15.0).unwrap();
        let explicit = BandSolver::new(UnitSystem::default())
            .unwrap()
            .solve(3.0, 15.0)
            .unwrap();
        assert_eq!(free.units, UnitSystem::default());
        assert_eq!(free.half_spectrum(), explicit.half_spectrum());
        assert_eq!(free.filled(), explicit.filled());
    }
}
