pub mod config;
pub mod notice;

pub use config::handle_config;
pub use notice::{handle_notice, NoticeArgs};
