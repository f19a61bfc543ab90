pub mod checks;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod html;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod reporting;
pub mod resolve;
pub mod serve;
pub mod tools;
pub mod types;
