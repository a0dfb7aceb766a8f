//! termenu - 终端交互式菜单引擎
//!
//! 模块结构：
//! - core: 核心类型（KeyEvent, InputEvent, 错误类型）
//! - models: 数据模型（Menu, Page, Entry, NavigationState）
//! - input: 键盘输入采集（ByteSource, EscapeDecoder, 键队列, 采集线程）
//! - kernel: 导航状态机与动作注册表
//! - services: 服务层（菜单配置加载）
//! - tui: 终端集成（raw 模式守卫, ratatui 渲染, 尺寸监测）
//! - app: 应用层（MenuSession 前台循环）

pub mod core;
pub mod input;
pub mod kernel;
pub mod models;
pub mod services;

#[cfg(feature = "tui")]
pub mod app;
#[cfg(feature = "tui")]
pub mod tui;

pub use crate::core::{ActionError, InputEvent, KeyEvent, MenuError, Result};
pub use crate::kernel::{ActionOutcome, ActionRegistry, NavigationEngine};
pub use crate::models::{Entry, Menu, NavigationState, Page};

#[cfg(feature = "tui")]
pub use crate::app::{ExitReason, MenuSession, SessionReport};
