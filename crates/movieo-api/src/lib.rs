//! API client library for movieo.
//!
//! Provides the media catalog (TMDB) client and its wire types.

/// Media catalog API client.
pub mod tmdb;
