//! DNSPod API client and a dynamic DNS updater built on it.
//!
//! [`dns::DnsPodClient`] is the async client; [`dns::blocking::DnsPodClient`]
//! offers the same operations for synchronous callers.

pub mod config;
pub mod ddns;
pub mod dns;
pub mod ip;
pub mod secrets;
