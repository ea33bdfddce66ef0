//! Shared fixtures for the integration tests

use chan_archiver::api::{build_http_client, Endpoints, HttpFetcher};
use chan_archiver::config::{Config, UserAgentConfig};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

pub const USER_AGENT: &str = "TestArchiver/1.0 (+https://example.com/about)";

/// Creates a configuration pointing both hosts at the mock server
///
/// The JSON API is served from `/` and attachments from `/media/`.
pub fn create_test_config(server: &MockServer, output_dir: &str) -> Config {
    let mut config = Config::default();
    config.api.api_base = format!("{}/", server.uri());
    config.api.media_base = format!("{}/media/", server.uri());
    config.user_agent = UserAgentConfig {
        client_name: "TestArchiver".to_string(),
        client_version: "1.0".to_string(),
        contact_url: "https://example.com/about".to_string(),
    };
    config.archive.output_dir = output_dir.to_string();
    config.archive.poll_interval = 1;
    config.archive.request_timeout = 5;
    config
}

pub fn create_fetcher(server: &MockServer) -> HttpFetcher {
    let config = create_test_config(server, "unused");
    let client = build_http_client(&config.user_agent, Duration::from_secs(5))
        .expect("Failed to build client");
    let endpoints = Endpoints::from_config(&config.api).expect("Failed to build endpoints");
    HttpFetcher::new(client, endpoints)
}

/// Thread JSON with `len` posts numbered from 500; posts 500 and 503 carry images
pub fn thread_json(len: u64, closed: bool) -> Value {
    let posts: Vec<Value> = (0..len)
        .map(|i| {
            let no = 500 + i;
            let mut post = json!({
                "no": no,
                "resto": if i == 0 { 0 } else { 500 },
                "time": 1_700_000_000 + i,
                "now": "11/14/23(Tue)22:13:20",
                "name": "Anonymous",
                "com": format!("post {}<br>&gt;quoted", no),
            });
            if i % 3 == 0 {
                post["tim"] = json!(1_700_000_000_000u64 + no);
                post["ext"] = json!(".png");
                post["filename"] = json!(format!("image{}", no));
                post["fsize"] = json!(10);
                post["md5"] = json!("AAAA==");
                post["w"] = json!(1);
                post["h"] = json!(1);
            }
            if i == 0 && closed {
                post["closed"] = json!(1);
            }
            post
        })
        .collect();
    json!({ "posts": posts })
}

pub fn attachment_path(board: &str, no: u64) -> String {
    format!("/media/{}/{}.png", board, 1_700_000_000_000u64 + no)
}
