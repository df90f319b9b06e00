//! # Ka 采样网格
//!
//! 在 (0, 3π] 上均匀采样势阱内波矢 Ka。
//!
//! ## 约定
//! - 起点为 `KA_START`，严格大于 0，保证 sin(Ka)/Ka 不会除零
//! - 终点精确为 3π
//! - 点数固定为 `GRID_POINTS`
//!
//! ## 依赖关系
//! - 被 `kp/solver.rs` 使用

use std::f64::consts::PI;

/// 默认采样点数
pub const GRID_POINTS: usize = 2500;

/// 采样起点（排除 Ka = 0）
pub const KA_START: f64 = 0.001;

/// 采样终点：三个布里渊区
pub const KA_END: f64 = 3.0 * PI;

/// Ka 采样网格，生成后不可变
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    values: Vec<f64>,
}

impl SampleGrid {
    /// 在 [start, end] 上生成 `points` 个等间距点，最后一点精确落在 `end`
    ///
    /// `start` 必须为正，`points` 至少为 2；不满足时退回默认网格。
    pub fn linspace(start: f64, end: f64, points: usize) -> Self {
        if !(start > 0.0) || !(end > start) || points < 2 {
            return Self::default();
        }

        let step = (end - start) / (points - 1) as f64;
        let mut values: Vec<f64> = (0..points).map(|i| start + i as f64 * step).collect();
        values[points - 1] = end;

        Self { values }
    }

    /// 网格点
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self::linspace(KA_START, KA_END, GRID_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_bounds() {
        let grid = SampleGrid::default();
        assert_eq!(grid.values().len(), GRID_POINTS);
        assert_eq!(grid.values()[0], KA_START);
        assert_eq!(*grid.values().last().unwrap(), KA_END);
    }

    #[test]
    fn test_grid_excludes_zero_and_increases() {
        let grid = SampleGrid::default();
        assert!(grid.values().iter().all(|&ka| ka > 0.0));
        for w in grid.values().windows(2) {
            assert!(w[1] > w[0], "grid must be strictly increasing");
        }
    }

    #[test]
    fn test_invalid_request_falls_back() {
        assert_eq!(SampleGrid::linspace(0.0, 1.0, 10), SampleGrid::default());
        assert_eq!(SampleGrid::linspace(1.0, 0.5, 10), SampleGrid::default());
        assert_eq!(SampleGrid::linspace(0.1, 1.0, 1), SampleGrid::default());
    }

    #[test]
    fn test_custom_grid_step() {
        let grid = SampleGrid::linspace(0.5, 1.5, 11);
        assert_eq!(grid.values().len(), 11);
        assert!((grid.values()[1] - grid.values()[0] - 0.1).abs() < 1e-12);
    }
}
