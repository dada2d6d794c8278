//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`dashboard`]: Content region, the rendered [`DisplayDocument`](crate::render::DisplayDocument)
//! - [`common`]: Shared components (status region header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Content (dashboard::render)          │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod common;
pub mod dashboard;
pub mod theme;

pub use theme::Theme;
