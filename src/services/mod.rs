//! 服务层模块
//!
//! - config: 菜单配置文件与运行参数

pub mod config;

pub use config::{load_menu, parse_menu, MenuConfig, MenuSettings, ThemeSettings};
