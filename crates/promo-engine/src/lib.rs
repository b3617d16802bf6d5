//! # promo-engine
//!
//! Core logic for the ClutchTrades promo site: event countdowns driven by
//! human-authored date text, and the blog feed pipeline behind the listing
//! page.
//!
//! The computational pieces are pure — the caller supplies the "now"
//! anchor — and the only stateful piece is the per-countdown timer thread
//! in [`scheduler`], which owns its lifecycle explicitly.
//!
//! ## Modules
//!
//! - [`parser`] — human-authored date text → absolute local date-time
//! - [`display`] — `(now, target)` → the `"HH : MM : SS"` countdown display
//! - [`scheduler`] — per-countdown 1-second tick loop with stop/dispose
//! - [`posts`] — blog feed loading, sorting, and listing queries
//! - [`error`] — error types

pub mod display;
pub mod error;
pub mod parser;
pub mod posts;
pub mod scheduler;

pub use display::{display_state, DisplayState, INVALID_DATE_MESSAGE};
pub use error::PromoError;
pub use parser::parse_event_date;
pub use posts::{featured, filter, format_date, load_posts, unique_categories, Post};
pub use scheduler::{CountdownHandle, Scheduler, TICK_PERIOD};
