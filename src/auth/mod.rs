//! Authentication types for the AWeber API client.
//!
//! # Overview
//!
//! - [`OAuthSession`]: the tokens gathered during the OAuth 1.0a handshake
//! - [`TokenPair`]: a token with its secret
//! - [`oauth`]: request signing, authorization codes and token responses

pub mod oauth;
pub mod session;

pub use session::{OAuthSession, TokenPair};
