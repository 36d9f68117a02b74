//! Application Layer - refresh cycle and dashboard wiring

pub mod refresh_loop;
pub mod view;
pub mod app;

pub use refresh_loop::{CycleReport, DisplaySnapshot, RefreshConfig, RefreshError, RefreshLoop};
pub use view::{InputAction, ViewCommand, ViewState};
pub use app::{compose_frame, AppError, Dashboard};
