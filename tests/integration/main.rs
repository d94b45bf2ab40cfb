//! Integration test harness
//!
//! Every module here drives the public API against wiremock servers.

mod scrape_tests;
