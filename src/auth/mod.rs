//! Authentication for the Riot API.
//!
//! Riot authenticates every call with a single API key sent in the
//! `X-Riot-Token` header. This module keeps that key out of logs and debug
//! output.

mod credentials;

pub use credentials::{ApiKey, CredentialsProvider, EnvCredentials, StaticCredentials};
