//! # kpband - Kronig-Penney 能带结构工具
//!
//! 计算一维周期势在 Kronig-Penney 近似下的本征谱：允许带/禁带判定、
//! 扩展区色散关系，以及给定费米能级下的占据态。
//!
//! ## 子命令
//! - `solve` - 单组 (μ, Ef) 的能带计算与导出
//! - `sweep` - 势垒强度 μ 的并行扫描
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── kp/        (能带计算、分析、导出)
//!   │     └── batch/     (并行批量执行)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod kp;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error_chain(&e);
        std::process::exit(1);
    }
}
