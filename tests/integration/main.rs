//! Integration tests for the archiver
//!
//! These tests use wiremock to stand in for the JSON API and the attachment
//! host, and exercise the HTTP fetcher and full archive sessions end-to-end.

mod api_tests;
mod archive_tests;
mod common;
