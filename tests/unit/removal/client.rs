use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use super::*;

/// Serve exactly one canned HTTP response and hand back the raw request.
async fn one_shot_server(
    status_line: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut req = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            req.extend_from_slice(&chunk[..n]);
            if request_complete(&req) {
                break;
            }
        }
        let head = format!(
            "{status_line}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        sock.write_all(head.as_bytes()).await.unwrap();
        sock.write_all(&body).await.unwrap();
        sock.shutdown().await.unwrap();
        req
    });
    (format!("http://{addr}/v1.0/removebg"), handle)
}

fn request_complete(req: &[u8]) -> bool {
    let Some(head_end) = req.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&req[..head_end]).to_ascii_lowercase();
    let body_len = req.len() - head_end - 4;
    match head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
    {
        Some(len) => body_len >= len,
        None => req.ends_with(b"--\r\n"),
    }
}

fn settings(endpoint: String, api_key: Option<&str>) -> RemovalSettings {
    RemovalSettings {
        api_key: api_key.map(str::to_string),
        endpoint,
        request_timeout_secs: 5,
        connect_timeout_secs: 5,
    }
}

#[tokio::test]
async fn success_returns_body_and_sends_credential_and_form() {
    let (url, server) = one_shot_server("HTTP/1.1 200 OK", "image/png", b"PNGDATA".to_vec()).await;
    let client = RemoveBgClient::new(&settings(url, Some("secret-key"))).unwrap();

    let out = client.remove_background(b"JPEGDATA".to_vec()).await.unwrap();
    assert_eq!(out, b"PNGDATA");

    let req = String::from_utf8_lossy(&server.await.unwrap()).to_string();
    assert!(req.starts_with("POST /v1.0/removebg"));
    assert!(req.to_ascii_lowercase().contains("x-api-key: secret-key"));
    assert!(req.contains("name=\"image_file\""));
    assert!(req.contains("name=\"size\""));
    assert!(req.contains("auto"));
    assert!(req.contains("JPEGDATA"));
}

#[tokio::test]
async fn error_payload_title_is_surfaced() {
    let body = br#"{"errors":[{"title":"File too large"}]}"#.to_vec();
    let (url, _server) =
        one_shot_server("HTTP/1.1 400 Bad Request", "application/json", body).await;
    let client = RemoveBgClient::new(&settings(url, Some("k"))).unwrap();

    let err = client.remove_background(b"x".to_vec()).await.unwrap_err();
    assert!(matches!(err, FrameError::Api { status: 400, .. }));
    assert_eq!(err.to_string(), "File too large");
}

#[tokio::test]
async fn malformed_error_payload_uses_fallback() {
    let (url, _server) = one_shot_server(
        "HTTP/1.1 500 Internal Server Error",
        "text/html",
        b"<html>oops</html>".to_vec(),
    )
    .await;
    let client = RemoveBgClient::new(&settings(url, Some("k"))).unwrap();

    let err = client.remove_background(b"x".to_vec()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to remove background");
}

#[tokio::test]
async fn missing_or_blank_credential_fails_before_any_request() {
    for key in [None, Some("   ")] {
        let client =
            RemoveBgClient::new(&settings("http://127.0.0.1:9/unused".to_string(), key)).unwrap();
        assert!(!client.has_credential());
        let err = client.remove_background(b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, FrameError::MissingCredential));
    }
}
