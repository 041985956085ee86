#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;

use kaia_investors::args::Arguments;
use tempfile::TempDir;
use tiny_http::{Header, Request, Response, Server as TinyServer};
use tokio::net::TcpListener;

pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(path: &'static str, status: u16, body: impl Into<String>) -> Route {
        Route {
            path,
            status,
            body: body.into(),
        }
    }
}

/// Throwaway HTTP server answering canned bodies per path and remembering
/// the requests it received.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(routes: Vec<Route>) -> StubServer {
        let server = TinyServer::http("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", server.server_addr().to_ip().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        thread::spawn(move || {
            for request in server.incoming_requests() {
                seen.lock().unwrap().push(describe(&request));

                let (status, body) = routes
                    .iter()
                    .find(|route| route.path == request.url())
                    .map(|route| (route.status, route.body.to_owned()))
                    .unwrap_or((404, r#"{"message":"Not found"}"#.to_owned()));

                let json_header =
                    Header::from_str("Content-Type: application/json; charset=UTF-8").unwrap();
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(json_header);

                let _ = request.respond(response);
            }
        });

        StubServer { base_url, requests }
    }

    /// Request line and headers, lowercased
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn describe(request: &Request) -> String {
    let mut head = format!("{} {}", request.method(), request.url());
    for header in request.headers() {
        head.push_str(&format!("\n{}: {}", header.field, header.value));
    }
    head.to_lowercase()
}

/// Address nothing listens on
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn get_tmp_state() -> (TempDir, PathBuf) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let mut path = tmp_dir.path().to_owned();
    path.push(".kaia.json");
    (tmp_dir, path)
}

pub fn arguments(base_url: &str, state_file: PathBuf) -> Arguments {
    Arguments {
        base_url: Some(base_url.to_owned()),
        state_file: Some(state_file),
        timeout: Some(2_000),
        ..Default::default()
    }
}

pub const INVESTORS: &str = r#"[
  {"id": 1, "user_id": 10, "name": "Ana Machava", "phone": "840000001", "nuit": "400000001", "born_date": "1990-04-12"},
  {"id": "2", "user_id": "20", "name": "Bia Cossa", "phone": 840000002, "nuit": "400000002"}
]"#;
