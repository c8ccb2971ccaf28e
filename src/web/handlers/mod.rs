//! Web 路由处理器

pub mod datetime;
pub mod social;
pub mod system;

pub use datetime::*;
pub use social::{steam_playtime, tiktok_latest_video, youtube_latest_video};
pub use system::*;
