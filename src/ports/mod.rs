//! Ports Layer - Trait definitions for external collaborators
//!
//! Following hexagonal architecture, these traits abstract:
//! - The remote token listing API
//! - The terminal backend that paints finished frames

pub mod token_feed;
pub mod display;
pub mod mocks;

pub use token_feed::{FeedError, TokenFeedPort, TokenQuery};
pub use display::{DisplayError, DisplayPort};
pub use mocks::{MockTokenFeed, RecordingDisplay};
