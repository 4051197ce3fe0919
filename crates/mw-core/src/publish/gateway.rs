//! HTTP metric gateway.
//!
//! Points are posted one at a time as JSON to a configured endpoint.
//! Any non-2xx response or transport failure surfaces as a
//! [`PublishError`] and stops the run's publish stage.

use std::time::Duration;

use super::{MetricPoint, MetricSink, PublishError};

/// Sink that posts each point to an HTTP endpoint.
pub struct HttpGateway {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }
}

impl MetricSink for HttpGateway {
    fn put(&self, point: &MetricPoint) -> Result<(), PublishError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(point)
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => PublishError::Status { status },
                ureq::Error::Transport(t) => PublishError::Transport(t.to_string()),
            })?;
        tracing::debug!(
            target: "publish.gateway",
            name = %point.name,
            status = response.status(),
            "Published metric point"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::{Scalar, Unit};
    use chrono::{TimeZone, Utc};
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn sample_point() -> MetricPoint {
        MetricPoint {
            namespace: "modelwatch/test".to_string(),
            name: "mae.value".to_string(),
            dimensions: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2023, 2, 23, 16, 45, 0).unwrap(),
            value: Scalar::Float(2.5),
            unit: Unit::None,
        }
    }

    /// Accept one connection, read one full request, answer with
    /// `status`, and return the request text.
    fn one_shot_server(listener: TcpListener, status: &'static str) -> std::thread::JoinHandle<String> {
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if n == 0 || request_complete(&buf) {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\n\r\n");
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        })
    }

    /// True once the header block and `content-length` bytes of body
    /// have both arrived.
    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }

    #[test]
    fn posts_point_as_json() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/metrics", listener.local_addr().unwrap());
        let server = one_shot_server(listener, "200 OK");

        let gateway = HttpGateway::new(endpoint, Duration::from_secs(5));
        gateway.put(&sample_point()).unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /metrics"));
        assert!(request.contains("mae.value"));
        assert!(request.contains("2.5"));
    }

    #[test]
    fn non_2xx_response_is_a_status_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/metrics", listener.local_addr().unwrap());
        let server = one_shot_server(listener, "500 Internal Server Error");

        let gateway = HttpGateway::new(endpoint, Duration::from_secs(5));
        let err = gateway.put(&sample_point()).unwrap_err();
        match err {
            PublishError::Status { status } => assert_eq!(status, 500),
            other => panic!("expected status error, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        // Bind then drop so the port is very likely closed.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/metrics", listener.local_addr().unwrap());
        drop(listener);

        let gateway = HttpGateway::new(endpoint, Duration::from_millis(500));
        let err = gateway.put(&sample_point()).unwrap_err();
        assert!(matches!(err, PublishError::Transport(_)), "got {err:?}");
    }
}
