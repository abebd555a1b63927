//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Frame layout, navigation menu, overlays and the login screen
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `views`: Per-route content (student and admin pages)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
