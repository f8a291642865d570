pub mod cache;
pub mod config;
pub mod downloader;
pub mod error;
pub mod grade;
pub mod session;
pub mod settings;
pub mod site;
pub mod tester;
pub mod types;
