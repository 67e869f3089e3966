//! Lifeline - 紧急求助前端
//!
//! 个人资料、首选医院和用药记录的编辑器，加上仪表盘和
//! 四步紧急求助向导。界面以无头视图模型的形式存在，
//! 用户操作即方法调用，状态变化通过事件队列回到宿主。

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
