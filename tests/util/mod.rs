use async_trait::async_trait;
use fuzzy_object_search::config::SearchConfig;
use fuzzy_object_search::search::object_store::JsonObjectStore;
use fuzzy_object_search::search::transport::SearchTransport;
use fuzzy_object_search::search::{DomainObject, SearchError, SearchService};
use parking_lot::Mutex;
use reqwest::Url;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn set(key: &str, val: impl AsRef<str>) -> Self {
        let prev = std::env::var(key).ok();
        unsafe { std::env::set_var(key, val.as_ref()) };
        Self {
            key: key.to_string(),
            prev,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => unsafe { std::env::set_var(&self.key, v) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

/// Backend response body with the given `(id, score)` hits.
#[allow(dead_code)]
pub fn hits_body(total: u64, hits: &[(&str, f64)]) -> Value {
    let hits: Vec<Value> = hits
        .iter()
        .map(|(id, score)| json!({ "_index": "objects", "_id": id, "_score": score, "_source": {} }))
        .collect();
    json!({ "took": 1, "timed_out": false, "hits": { "total": total, "max_score": 1.0, "hits": hits } })
}

#[allow(dead_code)]
struct Reply {
    delay: Duration,
    body: Value,
}

/// Transport that answers by the `q` parameter, optionally after a delay.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    urls: Mutex<Vec<Url>>,
}

#[allow(dead_code)]
impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, query: &str, body: Value) -> Self {
        self.replies.insert(
            query.to_string(),
            Reply {
                delay: Duration::ZERO,
                body,
            },
        );
        self
    }

    pub fn delayed_reply(mut self, query: &str, delay: Duration, body: Value) -> Self {
        self.replies
            .insert(query.to_string(), Reply { delay, body });
        self
    }

    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.urls.lock().len()
    }
}

#[async_trait]
impl SearchTransport for FakeTransport {
    async fn get(&self, url: Url) -> Result<Vec<u8>, SearchError> {
        self.urls.lock().push(url.clone());
        let query = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        let Some(reply) = self.replies.get(&query) else {
            return Err(SearchError::Status {
                status: 404,
                url: url.to_string(),
            });
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Ok(serde_json::to_vec(&reply.body)?)
    }
}

/// Object snapshot with numbered telemetry points and a couple of folders.
#[allow(dead_code)]
pub fn sample_store() -> JsonObjectStore {
    let mut objects: Vec<DomainObject> = (1..=5)
        .map(|i| {
            DomainObject::new(
                i.to_string(),
                json!({ "name": format!("Sensor {i}"), "type": if i % 2 == 0 { "folder" } else { "telemetry.point" } }),
            )
        })
        .collect();
    objects.push(DomainObject::without_model("unloadable"));
    JsonObjectStore::new(objects)
}

#[allow(dead_code)]
pub fn service_with(transport: Arc<FakeTransport>) -> SearchService {
    let config = SearchConfig {
        root: "http://search.test:9200".to_string(),
        ..SearchConfig::default()
    };
    SearchService::new(&config, transport, Arc::new(sample_store()))
}

/// One-shot HTTP server on localhost. The handle yields the raw request head.
#[allow(dead_code)]
pub async fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&head).to_string()
    });

    (format!("http://{addr}"), handle)
}
