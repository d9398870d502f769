pub mod ask;
pub mod bot;
pub mod config;
pub mod error;
pub mod github;
pub mod notify;
pub mod openrouter;
pub mod reply;
pub mod types;
pub mod url_list;

pub use bot::run;
