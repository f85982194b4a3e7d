//! Gallery selection and navigation.
//!
//! ```text
//!   keys / wheel / swipe / menu
//!          │ NavInput
//!          ▼
//!   Navigator::handle ──▶ GallerySelection::request ──▶ pending transition
//!          │                                                  │ tick(now)
//!          └─▶ Chrome (visibility, menu)                      ▼
//!                                              SelectionChange ─▶ subscribers
//! ```
//!
//! Nothing in here touches a clock: every operation takes the current
//! `Instant`, so the window loop and the tests drive time explicitly.

mod cooldown;
mod navigator;
mod state;

pub use cooldown::Cooldown;
pub use navigator::{Chrome, NavAction, NavInput, NavKey, Navigator};
pub use state::{GallerySelection, SelectionChange, SelectionError};
