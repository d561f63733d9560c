//! Container registry access for Sinker
//!
//! Lists repository tags over the registry v2 HTTP API. The client
//! implements sinker-core's [`sinker_core::TagLister`], which is all the
//! update check needs from a registry.

mod bridge;
pub mod client;

pub use client::{RegistryClient, DOCKER_HUB_HOST};
