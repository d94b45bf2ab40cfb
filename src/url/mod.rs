//! URL handling module for Email-Scraper
//!
//! Domain resolution never fails: a URL that cannot be parsed resolves to
//! itself. Target parsing is strict and feeds the fetcher's `MalformedUrl`
//! failures.

mod domain;

pub use domain::{parse_target, resolve_domain};
