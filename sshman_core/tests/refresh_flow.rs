use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use log::LevelFilter;
use sshman_core::remote::{NotionClient, RemoteConfig, RemoteError};
use sshman_core::store::ConfigStore;
use tempfile::TempDir;

const RESPONSE_BODY: &str = r#"{
  "results": [
    {
      "properties": {
        "Project": { "title": [ { "text": { "content": "zeta" } } ] },
        "SSH": { "rich_text": [ { "text": { "content": "ssh user@zeta" } } ] },
        "Type": { "select": { "name": "Server" } },
        "password": { "rich_text": [ { "text": { "content": "hunter2" } } ] }
      }
    },
    {
      "properties": {
        "Project": { "title": [ { "text": { "content": "alpha" } } ] },
        "SSH": { "rich_text": [ { "text": { "content": "ssh user@alpha" } } ] },
        "Type": { "select": { "name": "VM" } },
        "password": { "rich_text": [] }
      }
    }
  ]
}"#;

fn init_test_logging() {
    //   Logs will appear only when you run with `-- --nocapture`
    //   or when the test fails.
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Serve exactly one canned HTTP response on a random local port and return
/// the base URL to reach it.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the request (headers + the small query body) before
            // answering, so the client never sees a reset mid-write.
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while let Ok(n) = stream.read(&mut buf) {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let body_len = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + body_len {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}", addr)
}

fn client_for(base_url: String) -> anyhow::Result<NotionClient> {
    Ok(NotionClient::new(RemoteConfig {
        database_id: "db-test".into(),
        token: "token-test".into(),
        base_url,
    })?)
}

#[test]
fn refresh_populates_store_and_file_identically() -> anyhow::Result<()> {
    init_test_logging();
    let client = client_for(serve_once("200 OK", RESPONSE_BODY))?;

    let set = client.fetch_and_transform()?;
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("zeta@server").unwrap().ssh_command, "ssh user@zeta");
    assert_eq!(set.get("alpha@vm").unwrap().password, "");

    // response order (the API's sort order) becomes table order
    let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["zeta@server", "alpha@vm"]);

    let dir = TempDir::new()?;
    let store = ConfigStore::with_path(dir.path().join("ssh_config.json"));
    store.persist(&set)?;

    // the file must mirror the in-memory set exactly after a refresh
    let reloaded = store.load()?;
    assert_eq!(reloaded, set);
    Ok(())
}

#[test]
fn http_500_leaves_config_file_untouched() -> anyhow::Result<()> {
    init_test_logging();
    let dir = TempDir::new()?;
    let path = dir.path().join("ssh_config.json");
    let existing = r#"{ "old@server": { "type": "server", "project": "old", "ssh_command": "ssh old", "password": "" } }"#;
    std::fs::write(&path, existing)?;

    let client = client_for(serve_once("500 Internal Server Error", ""))?;
    let err = client.fetch_and_transform().expect_err("500 must be an error");
    assert!(matches!(err, RemoteError::Status(code) if code.as_u16() == 500));

    // no partial update: the fetch failed before anything was persisted
    let after = std::fs::read(&path)?;
    assert_eq!(after, existing.as_bytes());
    Ok(())
}

#[test]
fn connection_refused_is_a_recoverable_error() -> anyhow::Result<()> {
    init_test_logging();
    // bind then drop to get a port nothing is listening on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?
    };

    let client = client_for(format!("http://{}", addr))?;
    let err = client.fetch_and_transform().expect_err("must fail to connect");
    assert!(matches!(err, RemoteError::Http(_)));
    Ok(())
}

#[test]
fn non_json_body_is_a_decode_error() -> anyhow::Result<()> {
    init_test_logging();
    let client = client_for(serve_once("200 OK", "this is not json"))?;
    let err = client.fetch_and_transform().expect_err("body must not decode");
    assert!(matches!(err, RemoteError::Decode(_)));
    Ok(())
}
