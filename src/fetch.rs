//! Content fetching
//!
//! Plain GET of the page to scrape. The body is returned whatever the status;
//! there is no timeout and no retry.

use tracing::{info, warn};

use crate::error::Result;

fn transport(url: &str) -> &'static str {
    if url.starts_with("https") {
        "https"
    } else {
        "http"
    }
}

/// Fetch `url` and return the full body as text
pub async fn fetch(url: &str) -> Result<String> {
    info!(url, transport = transport(url), "fetching");

    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!(url, %status, "non-success status, using body as returned");
    }

    let body = response.text().await?;
    info!(url, bytes = body.len(), "fetched");
    Ok(body)
}

/// Fetch `url` using ureq (simple blocking HTTP)
pub fn fetch_blocking(url: &str) -> Result<String> {
    info!(url, transport = transport(url), "fetching (blocking)");

    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build(),
    );

    let response = agent.get(url).call()?;
    let status = response.status();
    if !status.is_success() {
        warn!(url, %status, "non-success status, using body as returned");
    }

    let body = response.into_body().read_to_string()?;
    info!(url, bytes = body.len(), "fetched");
    Ok(body)
}

/// One-shot HTTP server for fetch tests
#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single response on a local port and return its URL
    pub fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        format!("http://{address}/page")
    }

    /// URL of a local port nothing listens on
    pub fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{address}/page")
    }
}
