//! Layout helpers for the dashboard screen.

pub mod layout;

pub use layout::{app_layout, centered_rect, AppLayout};
