//! # 能带与带隙分析
//!
//! 从求解结果中提取各条允许带、带隙，以及费米能级下的填充情况，
//! 据此区分金属、半导体与绝缘体。
//!
//! ## 判定规则
//! - 任一能带部分填充 → 金属
//! - Ef 落在带隙内且带隙宽度 ≤ 阈值 → 半导体
//! - Ef 落在带隙内且带隙宽度 > 阈值 → 绝缘体
//!
//! ## 依赖关系
//! - 被 `commands/solve.rs`, `commands/sweep.rs` 调用
//! - 使用 `kp/solver.rs` 的 BandStructure

use crate::kp::solver::{BandStructure, SpectrumPoint};

use std::fmt;

/// 半导体/绝缘体的默认带隙阈值（能量单位）
pub const DEFAULT_GAP_THRESHOLD: f64 = 4.0;

/// 能带填充状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillingState {
    Empty,
    Partial { fraction: f64 },
    Full,
}

impl fmt::Display for FillingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillingState::Empty => write!(f, "empty"),
            FillingState::Partial { fraction } => write!(f, "partial ({:.0}%)", fraction * 100.0),
            FillingState::Full => write!(f, "full"),
        }
    }
}

/// 一条允许带（半谱中连续的允许点）
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// 能带编号，从 1 开始
    pub index: usize,
    pub ka_start: f64,
    pub ka_end: f64,
    pub energy_min: f64,
    pub energy_max: f64,
    pub k_min: f64,
    pub k_max: f64,
    /// 采样点数
    pub points: usize,
    /// E ≤ Ef 的采样点数
    pub filled_points: usize,
}

impl Band {
    pub fn filling(&self) -> FillingState {
        if self.filled_points == 0 {
            FillingState::Empty
        } else if self.filled_points >= self.points {
            FillingState::Full
        } else {
            FillingState::Partial {
                fraction: self.filled_points as f64 / self.points as f64,
            }
        }
    }

    /// 带宽
    pub fn width(&self) -> f64 {
        self.energy_max - self.energy_min
    }
}

/// 相邻两条能带之间的禁带
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    /// 下方能带编号；带隙位于 `below` 与 `below + 1` 之间
    pub below: usize,
    pub energy_min: f64,
    pub energy_max: f64,
    pub width: f64,
}

impl Gap {
    pub fn contains(&self, energy: f64) -> bool {
        energy > self.energy_min && energy < self.energy_max
    }
}

/// 整体导电类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conduction {
    /// 存在部分填充的能带
    Metal,
    /// Ef 位于窄带隙中
    Semiconductor { gap: f64 },
    /// Ef 位于宽带隙中
    Insulator { gap: f64 },
    /// Ef 低于第一条能带底
    Unfilled,
    /// 采样范围内所有能带均已填满
    Saturated,
}

impl fmt::Display for Conduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conduction::Metal => write!(f, "metal"),
            Conduction::Semiconductor { .. } => write!(f, "semiconductor"),
            Conduction::Insulator { .. } => write!(f, "insulator"),
            Conduction::Unfilled => write!(f, "unfilled"),
            Conduction::Saturated => write!(f, "saturated"),
        }
    }
}

/// 能带结构概要
#[derive(Debug, Clone)]
pub struct SpectrumSummary {
    pub allowed_fraction: f64,
    pub filled_count: usize,
    pub bands: Vec<Band>,
    pub gaps: Vec<Gap>,
    pub conduction: Conduction,
}

impl SpectrumSummary {
    /// 第一条带隙宽度
    pub fn first_gap_width(&self) -> Option<f64> {
        self.gaps.first().map(|g| g.width)
    }
}

/// 生成能带结构概要
pub fn summarize(structure: &BandStructure, gap_threshold: f64) -> SpectrumSummary {
    let bands = find_bands(structure);
    let gaps = find_gaps(&bands);
    let conduction = classify(&bands, &gaps, gap_threshold);

    SpectrumSummary {
        allowed_fraction: structure.allowed_fraction(),
        filled_count: structure.filled_count(),
        bands,
        gaps,
        conduction,
    }
}

/// 在半谱中寻找连续的允许段
pub fn find_bands(structure: &BandStructure) -> Vec<Band> {
    let mut bands: Vec<Band> = Vec::new();
    let mut current: Option<Band> = None;
    let ef = structure.fermi_level;

    for (&ka, point) in structure.ka().iter().zip(structure.half_spectrum()) {
        match *point {
            SpectrumPoint::Allowed { k, energy } => {
                let filled = usize::from(energy <= ef);
                match current.as_mut() {
                    Some(band) => {
                        band.ka_end = ka;
                        band.energy_min = band.energy_min.min(energy);
                        band.energy_max = band.energy_max.max(energy);
                        band.k_min = band.k_min.min(k);
                        band.k_max = band.k_max.max(k);
                        band.points += 1;
                        band.filled_points += filled;
                    }
                    None => {
                        current = Some(Band {
                            index: bands.len() + 1,
                            ka_start: ka,
                            ka_end: ka,
                            energy_min: energy,
                            energy_max: energy,
                            k_min: k,
                            k_max: k,
                            points: 1,
                            filled_points: filled,
                        });
                    }
                }
            }
            SpectrumPoint::Forbidden { .. } => {
                if let Some(band) = current.take() {
                    bands.push(band);
                }
            }
        }
    }

    if let Some(band) = current {
        bands.push(band);
    }

    bands
}

/// 相邻能带之间的带隙
pub fn find_gaps(bands: &[Band]) -> Vec<Gap> {
    bands
        .windows(2)
        .map(|pair| Gap {
            below: pair[0].index,
            energy_min: pair[0].energy_max,
            energy_max: pair[1].energy_min,
            width: pair[1].energy_min - pair[0].energy_max,
        })
        .collect()
}

/// 判定导电类型
pub fn classify(bands: &[Band], gaps: &[Gap], gap_threshold: f64) -> Conduction {
    if bands.iter().all(|b| b.filling() == FillingState::Empty) {
        return Conduction::Unfilled;
    }

    if bands
        .iter()
        .any(|b| matches!(b.filling(), FillingState::Partial { .. }))
    {
        return Conduction::Metal;
    }

    // 此时每条能带要么全满要么全空，且全满的能带位于下方
    let highest_full = bands
        .iter()
        .filter(|b| b.filling() == FillingState::Full)
        .map(|b| b.index)
        .max()
        .unwrap_or(0);

    match gaps.iter().find(|g| g.below == highest_full) {
        Some(gap) if gap.width <= gap_threshold => Conduction::Semiconductor { gap: gap.width },
        Some(gap) => Conduction::Insulator { gap: gap.width },
        None => Conduction::Saturated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kp::solver::solve;
    use std::f64::consts::PI;

    #[test]
    fn test_free_electron_single_band() {
        let bs = solve(0.0, 15.0).unwrap();
        let summary = summarize(&bs, DEFAULT_GAP_THRESHOLD);
        assert_eq!(summary.bands.len(), 1);
        assert!(summary.gaps.is_empty());
        assert_eq!(summary.conduction, Conduction::Metal);
        assert_eq!(summary.first_gap_width(), None);
    }

    #[test]
    fn test_three_bands_at_moderate_barrier() {
        let bs = solve(3.0, 15.0).unwrap();
        let summary = summarize(&bs, DEFAULT_GAP_THRESHOLD);
        assert_eq!(summary.bands.len(), 3);
        assert_eq!(summary.gaps.len(), 2);

        // 第一条能带在 Ka = π 处结束
        let first = &summary.bands[0];
        assert!((first.ka_end - PI).abs() < 0.01, "ka_end = {}", first.ka_end);
        assert_eq!(first.index, 1);
        assert!(first.k_min < 0.25);
        assert!(first.k_max <= PI + 1e-12);

        for gap in &summary.gaps {
            assert!(gap.width > 0.0);
        }
    }

    #[test]
    fn test_bands_ordered_by_energy() {
        let bs = solve(5.0, 15.0).unwrap();
        let bands = find_bands(&bs);
        for pair in bands.windows(2) {
            assert!(pair[0].energy_max < pair[1].energy_min);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn test_classification_by_fermi_level() {
        let classify_at = |mu: f64, ef: f64| {
            let bs = solve(mu, ef).unwrap();
            summarize(&bs, DEFAULT_GAP_THRESHOLD).conduction
        };

        assert_eq!(classify_at(3.0, 1.0), Conduction::Unfilled);
        assert_eq!(classify_at(3.0, 5.0), Conduction::Metal);
        assert!(matches!(
            classify_at(3.0, 15.0),
            Conduction::Insulator { .. }
        ));
        assert!(matches!(
            classify_at(0.5, 11.0),
            Conduction::Semiconductor { .. }
        ));
        assert_eq!(classify_at(3.0, 1000.0), Conduction::Saturated);
    }

    #[test]
    fn test_gap_threshold_controls_label() {
        let bs = solve(3.0, 15.0).unwrap();
        let wide = summarize(&bs, 100.0).conduction;
        assert!(matches!(wide, Conduction::Semiconductor { .. }));
    }

    #[test]
    fn test_band_filling_state() {
        let bs = solve(3.0, 5.0).unwrap();
        let bands = find_bands(&bs);
        assert!(matches!(bands[0].filling(), FillingState::Partial { .. }));
        assert_eq!(bands[1].filling(), FillingState::Empty);
    }

    #[test]
    fn test_gaps_widen_with_barrier() {
        let weak = summarize(&solve(1.0, 15.0).unwrap(), DEFAULT_GAP_THRESHOLD);
        let strong = summarize(&solve(10.0, 15.0).unwrap(), DEFAULT_GAP_THRESHOLD);
        let w = weak.first_gap_width().unwrap();
        let s = strong.first_gap_width().unwrap();
        assert!(s > w, "first gap {} should exceed {}", s, w);
    }
}
