//! 应用层：把终端、输入线程、导航引擎和渲染器串成一个前台循环。

pub mod session;

pub use session::{ExitReason, MenuSession, SessionHooks, SessionReport};
