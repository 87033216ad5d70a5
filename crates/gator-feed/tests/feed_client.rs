//! Integration tests for `FeedClient` using wiremock HTTP mocks.

use std::time::{Duration, Instant};

use gator_feed::{FeedClient, FeedError, ParseError, DEFAULT_USER_AGENT};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot.dev Blog</title>
    <link>https://blog.boot.dev/</link>
    <description>Latest posts</description>
    <item>
      <title>Tom &amp;amp; Jerry</title>
      <link>https://blog.boot.dev/tom-and-jerry/</link>
      <pubDate>Mon, 02 Jan 2006 15:04:05 -0700</pubDate>
      <description>A classic</description>
    </item>
  </channel>
</rss>"#;

fn test_client() -> FeedClient {
    FeedClient::new(5, DEFAULT_USER_AGENT).expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_feed_sends_user_agent_and_parses_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.xml"))
        .and(header("user-agent", "gator"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(FEED_XML),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/index.xml", server.uri());
    let feed = test_client()
        .fetch_feed(&url)
        .await
        .expect("should fetch feed");

    assert_eq!(feed.channel.title, "Boot.dev Blog");
    assert_eq!(feed.channel.items.len(), 1);
    assert_eq!(feed.channel.items[0].title, "Tom & Jerry");
    assert_eq!(
        feed.channel.items[0].link,
        "https://blog.boot.dev/tom-and-jerry/"
    );
}

#[tokio::test]
async fn fetch_feed_uses_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "gator-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED_XML))
        .expect(1)
        .mount(&server)
        .await;

    let client = FeedClient::new(5, "gator-test/1.0").unwrap();
    client
        .fetch_feed(&format!("{}/feed", server.uri()))
        .await
        .expect("should fetch feed");
}

#[tokio::test]
async fn not_found_status_is_a_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing.xml", server.uri());
    let err = test_client().fetch_feed(&url).await.unwrap_err();

    match err {
        FeedError::Fetch { url: failed, source } => {
            assert_eq!(failed, url);
            assert_eq!(source.status().map(|s| s.as_u16()), Some(404));
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_xml_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<rss><channel><title>x</channel></rss>"),
        )
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_feed(&format!("{}/bad.xml", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            FeedError::Parse {
                source: ParseError::Xml(_),
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn empty_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_feed(&format!("{}/empty.xml", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Parse { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() {
    // Port 9 (discard) is not expected to be listening on loopback.
    let err = test_client()
        .fetch_feed("http://127.0.0.1:9/feed.xml")
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Fetch { .. }), "got {err:?}");
}

#[tokio::test]
async fn latin1_body_is_a_parse_error() {
    let server = MockServer::start().await;

    let body: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
        <rss version=\"2.0\"><channel><title>Caf\xE9</title></channel></rss>";
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml; charset=ISO-8859-1")
                .set_body_bytes(body),
        )
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_feed(&format!("{}/latin1.xml", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            FeedError::Parse {
                source: ParseError::InvalidUtf8(_),
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn slow_server_hits_the_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FEED_XML)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = FeedClient::new(1, DEFAULT_USER_AGENT).unwrap();
    let started = Instant::now();
    let err = client
        .fetch_feed(&format!("{}/slow.xml", server.uri()))
        .await
        .unwrap_err();

    match &err {
        FeedError::Fetch { source, .. } => assert!(source.is_timeout(), "got {err:?}"),
        other => panic!("expected Fetch error, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn truncated_body_is_a_read_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promises 1000 bytes, sends a few, then hangs up.
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0_u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: application/rss+xml\r\n\
                  Content-Length: 1000\r\n\r\n\
                  <rss><channel>",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let url = format!("http://{addr}/cut.xml");
    let err = test_client().fetch_feed(&url).await.unwrap_err();
    server.await.unwrap();

    match err {
        FeedError::Read { url: failed, .. } => assert_eq!(failed, url),
        other => panic!("expected Read error, got {other:?}"),
    }
}
