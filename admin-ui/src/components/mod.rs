//! UI Components
//!
//! Leptos components for the admin layout.

pub mod chart;
pub mod sidebar;

pub use sidebar::Sidebar;
