//! URL handling
//!
//! Link scrubbing (the canonical form stored in the index), relative
//! resolution and host extraction.

mod domain;
mod normalize;

pub use domain::{host_of, host_of_url};
pub use normalize::{has_banned_suffix, resolve_link, scrub_link};
