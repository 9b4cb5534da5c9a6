use rstest::rstest;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use super::*;

#[rstest]
#[case("http://localhost:5483/dataset/", DataSource::Http("http://localhost:5483/dataset".to_owned()))]
#[case(" https://opex.example.com ", DataSource::Http("https://opex.example.com".to_owned()))]
#[case("file:///var/lib/opex", DataSource::Directory(PathBuf::from("/var/lib/opex")))]
#[case("static/data", DataSource::Directory(PathBuf::from("static/data")))]
fn data_source_new_test(#[case] location: &str, #[case] expected: DataSource) {
    assert_eq!(expected, DataSource::new(location));
}

#[test]
fn location_of_test() {
    let source = DataSource::new("http://localhost:5483/dataset");
    assert_eq!(
        "http://localhost:5483/dataset/cpu_usage_period_1209600.json",
        source.location_of(DataFile::CpuDaily)
    );
}

#[test]
fn status_error_display_test() {
    let error = TransportError::Status {
        status: 404,
        text: "Not Found".to_owned(),
    };
    assert_eq!("error 404 (Not Found)", error.to_string());
}

fn directory_client(dir: &Path) -> UsageClient {
    UsageClient::new(DataSource::Directory(dir.to_path_buf()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetch_nodes_from_directory_test() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("nodes.json"),
        r#"{ "n1": { "id": "n1-uid", "name": "n1", "cpuUsage": 1, "cpuCapacity": 4, "podsRunning": [] } }"#,
    )
    .await
    .unwrap();

    let nodes = directory_client(dir.path()).fetch_nodes().await.unwrap();

    assert_eq!(1, nodes.len());
    assert_eq!(Some(4.0), nodes["n1"].cpu_capacity);
}

#[tokio::test]
async fn fetch_series_from_directory_test() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("cpu_usage_trends.json"),
        r#"[ { "stack": "kube-system", "usage": 12.5, "dateUTC": "2019-05-01T10:00:00Z" } ]"#,
    )
    .await
    .unwrap();

    let series = directory_client(dir.path())
        .fetch::<serde_json::Value>(DataFile::CpuTrends)
        .await
        .unwrap();

    assert_eq!(12.5, series[0]["usage"]);
}

#[tokio::test]
async fn fetch_missing_file_test() {
    let dir = tempfile::tempdir().unwrap();

    let result = directory_client(dir.path()).fetch_nodes().await;

    assert!(matches!(result, Err(TransportError::Io(_))));
}

#[tokio::test]
async fn fetch_invalid_json_test() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("nodes.json"), "<html>502 Bad Gateway</html>")
        .await
        .unwrap();

    let result = directory_client(dir.path()).fetch_nodes().await;

    assert!(matches!(result, Err(TransportError::Parse(_))));
}

const NODES_JSON: &str = r#"{ "n1": { "id": "n1-uid", "name": "n1", "cpuUsage": 3, "cpuCapacity": 8 } }"#;

/// Answers `requests` HTTP requests: `nodes.json` with [`NODES_JSON`] and anything else with 404.\
/// Returns the base URL and a task that resolves to the received requests.
async fn serve_dataset(requests: usize) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/dataset/", listener.local_addr().unwrap());

    let task = tokio::spawn(async move {
        let mut received = Vec::with_capacity(requests);
        for _ in 0..requests {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = if request.starts_with("GET /dataset/nodes.json ") {
                format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    NODES_JSON.len(),
                    NODES_JSON
                )
            } else {
                "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_owned()
            };

            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            received.push(request);
        }

        received
    });

    (base_url, task)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
        let read = stream.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }

        buffer.extend_from_slice(&chunk[..read]);
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

#[tokio::test]
async fn fetch_nodes_over_http_test() {
    let (base_url, server) = serve_dataset(1).await;
    let client = UsageClient::new(DataSource::new(&base_url), Duration::from_secs(5)).unwrap();

    let nodes = client.fetch_nodes().await.unwrap();

    assert_eq!(Some(3.0), nodes["n1"].cpu_usage);
    assert_eq!(Some(8.0), nodes["n1"].cpu_capacity);
    assert!(nodes["n1"].pods_running.is_empty());

    let requests = server.await.unwrap();
    assert!(requests[0].to_ascii_lowercase().contains("cache-control: no-cache"));
}

#[tokio::test]
async fn fetch_http_error_status_test() {
    let (base_url, server) = serve_dataset(1).await;
    let client = UsageClient::new(DataSource::new(&base_url), Duration::from_secs(5)).unwrap();

    let error = client.fetch::<serde_json::Value>(DataFile::CpuTrends).await.unwrap_err();

    assert!(matches!(error, TransportError::Status { status: 404, .. }));
    assert_eq!("error 404 (Not Found)", error.to_string());
    assert!(server.await.unwrap()[0].starts_with("GET /dataset/cpu_usage_trends.json "));
}
