//! four.meme Adapter
//!
//! Implementation of the TokenFeedPort for the four.meme listing API.

mod client;
mod types;

pub use client::{FourMemeClient, FourMemeConfig, DEFAULT_API_URL};
pub use types::{decode_envelope, query_pairs, ApiEnvelope};
