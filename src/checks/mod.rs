// src/checks/mod.rs
//! The five verification checks.
//!
//! Each check is a plain function that converts every failure it meets into
//! a typed result, so the pipeline only ever sees statuses.

pub mod assets;
pub mod build;
pub mod lighthouse;
pub mod screenshots;
pub mod vision;

pub use assets::check_assets;
pub use build::check_build;
pub use lighthouse::check_lighthouse;
pub use screenshots::check_screenshots;
pub use vision::check_vision;
