use reqwest::blocking::Client;

use crate::error::{DeliveryError, Result};

const BODY_PREVIEW_CHARS: usize = 200;

/// Target write endpoint: base URL plus database name.
#[derive(Debug, Clone)]
pub struct WriteEndpoint {
    base_url: String,
    database: String,
}

impl WriteEndpoint {
    /// Create an endpoint. A trailing `/` on the base URL is trimmed.
    pub fn new(base_url: &str, database: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            database: database.to_string(),
        }
    }

    /// The `/write` URL with the database query parameter.
    pub fn write_url(&self) -> String {
        format!("{}/write?db={}", self.base_url, self.database)
    }

    /// The `/ping` URL used for health checks.
    pub fn ping_url(&self) -> String {
        format!("{}/ping", self.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

/// Accepts one pre-serialized wire-format line for transmission.
///
/// The trait is the seam between the relay loop and the network; tests
/// substitute scripted implementations.
pub trait Deliver {
    /// Perform a single blocking delivery of `line`.
    fn deliver(&mut self, line: &str) -> Result<()>;
}

/// Blocking HTTP writer for an InfluxDB-compatible `/write` endpoint.
pub struct InfluxWriter {
    http: Client,
    endpoint: WriteEndpoint,
}

impl InfluxWriter {
    /// Create a writer for the given endpoint.
    pub fn new(endpoint: WriteEndpoint) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &WriteEndpoint {
        &self.endpoint
    }

    /// Check the server is reachable via its `/ping` endpoint.
    pub fn ping(&self) -> Result<()> {
        let resp = self.http.get(self.endpoint.ping_url()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: body_preview(resp.text().unwrap_or_default()),
            });
        }
        Ok(())
    }
}

impl Deliver for InfluxWriter {
    fn deliver(&mut self, line: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.endpoint.write_url())
            .body(line.to_string())
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: body_preview(resp.text().unwrap_or_default()),
            });
        }

        tracing::debug!(bytes = line.len(), "line delivered");
        Ok(())
    }
}

fn body_preview(body: String) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;
    use std::time::Duration;

    use super::*;

    #[test]
    fn write_url_includes_database() {
        let endpoint = WriteEndpoint::new("http://influx.host", "weather");
        assert_eq!(endpoint.write_url(), "http://influx.host/write?db=weather");
        assert_eq!(endpoint.ping_url(), "http://influx.host/ping");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let endpoint = WriteEndpoint::new("http://influx.host/", "weather");
        assert_eq!(endpoint.base_url(), "http://influx.host");
        assert_eq!(endpoint.write_url(), "http://influx.host/write?db=weather");
    }

    #[test]
    fn body_preview_truncates() {
        let long = "x".repeat(500);
        assert_eq!(body_preview(long).len(), BODY_PREVIEW_CHARS);
    }

    #[test]
    fn delivers_line_as_post_body() {
        let (url, server) = one_shot_server("HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n");
        let mut writer = InfluxWriter::new(WriteEndpoint::new(&url, "environment"));

        writer
            .deliver("environment,location=room1 temperature=21.5 1\n")
            .expect("delivery should succeed");

        let request = server.join().expect("server thread should finish");
        assert!(request.starts_with("POST /write?db=environment HTTP/1.1\r\n"));
        assert!(request.ends_with("environment,location=room1 temperature=21.5 1\n"));
    }

    #[test]
    fn non_success_status_is_rejected() {
        let (url, server) = one_shot_server(
            "HTTP/1.1 400 Bad Request\r\ncontent-length: 12\r\n\r\nparse failed",
        );
        let mut writer = InfluxWriter::new(WriteEndpoint::new(&url, "environment"));

        let err = writer.deliver("bogus line\n").unwrap_err();
        let _ = server.join();

        assert!(
            matches!(err, DeliveryError::Rejected { status: 400, ref body } if body == "parse failed")
        );
    }

    #[test]
    fn unreachable_server_is_transport_error() {
        // Bind then drop so the port is very likely closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut writer =
            InfluxWriter::new(WriteEndpoint::new(&format!("http://127.0.0.1:{port}"), "db"));

        let err = writer.deliver("x y 1\n").unwrap_err();
        assert!(matches!(err, DeliveryError::Http(_)));
    }

    #[test]
    fn ping_hits_ping_endpoint() {
        let (url, server) = one_shot_server("HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n");
        let writer = InfluxWriter::new(WriteEndpoint::new(&url, "environment"));

        writer.ping().expect("ping should succeed");

        let request = server.join().expect("server thread should finish");
        assert!(request.starts_with("GET /ping HTTP/1.1\r\n"));
    }

    /// Serve exactly one HTTP exchange on a background thread and hand the
    /// raw request text back through the join handle.
    fn one_shot_server(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("local addr should resolve");

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept should succeed");
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .expect("read timeout should apply");

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).expect("read should succeed");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            stream
                .write_all(response.as_bytes())
                .expect("response write should succeed");
            let _ = stream.flush();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    /// True once the headers and any content-length body have arrived.
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let body_len = text
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + body_len
    }
}
