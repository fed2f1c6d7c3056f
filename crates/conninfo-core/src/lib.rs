//! Core parsing logic for the Conninfo service
//!
//! Two independent, pure components: [`ResolvedAddress`] derives the
//! best-guess originating client IP from proxy headers and the transport
//! peer address, and [`BrowserClassification`] classifies a raw
//! User-Agent string into a browser family/version and an OS family.
//!
//! Both are total functions of their string inputs: malformed or
//! adversarial input degrades to sentinel output (`Unknown`, or the input
//! echoed back), never to an error. Neither component touches I/O or
//! shared state, so calls are safe to run concurrently without
//! coordination.

pub mod client_addr;
pub mod user_agent;

// Re-export commonly used types
pub use client_addr::{AddressSource, ResolvedAddress};
pub use user_agent::{BrowserClassification, BrowserFamily, OsFamily};
