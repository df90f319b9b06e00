//! # Kronig-Penney 判据
//!
//! 单点计算：判据函数、允许带判定、布里渊区编号、扩展区波矢。
//!
//! ## 公式
//! f(Ka) = cos(Ka) + μ·sin(Ka)/Ka
//!
//! 仅当 |f| ≤ 1 时存在实数 Bloch 波矢：cos(k·a) = f。
//!
//! ## 依赖关系
//! - 被 `kp/solver.rs` 调用
//! - 纯函数，无外部依赖

use std::f64::consts::PI;

/// 判据函数 f(Ka)
///
/// Ka = 0 处取解析极限 1 + μ。
pub fn criterion(ka: f64, mu: f64) -> f64 {
    if ka == 0.0 {
        return 1.0 + mu;
    }
    ka.cos() + mu * ka.sin() / ka
}

/// 是否位于允许带
pub fn is_allowed(f: f64) -> bool {
    f.abs() <= 1.0
}

/// 布里渊区编号 n = ceil(Ka/π)，至少为 1
///
/// 恰好落在 nπ 上的点属于以 nπ 结尾的第 n 区。
pub fn zone_index(ka: f64) -> u32 {
    ((ka / PI).ceil() as u32).max(1)
}

/// 扩展区方案下的约化波矢 k·a
///
/// 禁带返回 `None`。奇数区 k·a 从 (n−1)π 向上增长，偶数区从 nπ 向下折回，
/// 使 k 在每个区内随 Ka 连续。
pub fn extended_wavevector(ka: f64, f: f64) -> Option<f64> {
    if !is_allowed(f) {
        return None;
    }

    // 切点处的浮点溢出
    let inner_k = f.clamp(-1.0, 1.0).acos();
    let n = zone_index(ka);

    let ka_ext = if n % 2 == 1 {
        (n - 1) as f64 * PI + inner_k
    } else {
        n as f64 * PI - inner_k
    };

    Some(ka_ext)
}
