use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// One canned HTTP response for the fake commits endpoint.
pub struct Scripted {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Scripted {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            status: 403,
            body: r#"{"message":"API rate limit exceeded"}"#.to_string(),
            headers: vec![("x-ratelimit-remaining".to_string(), "0".to_string())],
        }
    }
}

type ScriptMap = HashMap<(String, u32), VecDeque<Scripted>>;

/// Minimal scripted stand-in for the GitHub commits endpoint. Responses are
/// keyed by (path query param, page) and consumed in order; anything
/// unscripted gets an empty page so pagination terminates.
pub struct TestServer {
    url: String,
    addr: std::net::SocketAddr,
    scripts: Arc<Mutex<ScriptMap>>,
    hits: Arc<Mutex<Vec<(String, u32)>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let scripts: Arc<Mutex<ScriptMap>> = Arc::new(Mutex::new(HashMap::new()));
        let hits: Arc<Mutex<Vec<(String, u32)>>> = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_scripts = Arc::clone(&scripts);
        let thread_hits = Arc::clone(&hits);
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            for stream in listener.incoming() {
                if thread_stop.load(Ordering::SeqCst) {
                    break;
                }
                if let Ok(stream) = stream {
                    handle_connection(stream, &thread_scripts, &thread_hits);
                }
            }
        });

        Self {
            url: format!("http://{addr}"),
            addr,
            scripts,
            hits,
            stop,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Queue a response for the given file path and page number.
    pub fn script(&self, file: &str, page: u32, response: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry((file.to_string(), page))
            .or_default()
            .push_back(response);
    }

    /// Every (file, page) request seen so far, in arrival order.
    pub fn hits(&self) -> Vec<(String, u32)> {
        self.hits.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // wake the accept loop so it observes the stop flag
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_connection(
    mut stream: TcpStream,
    scripts: &Mutex<ScriptMap>,
    hits: &Mutex<Vec<(String, u32)>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&buf);
    let Some((file, page)) = parse_target(&request) else {
        return;
    };
    hits.lock().unwrap().push((file.clone(), page));

    let scripted = scripts
        .lock()
        .unwrap()
        .get_mut(&(file, page))
        .and_then(|queue| queue.pop_front());
    match scripted {
        Some(response) => write_response(&mut stream, &response),
        None => write_response(&mut stream, &Scripted::ok("[]")),
    }
}

fn parse_target(request: &str) -> Option<(String, u32)> {
    let line = request.lines().next()?;
    let target = line.split_whitespace().nth(1)?;
    let query = target.split_once('?').map(|(_, q)| q)?;

    let mut file = None;
    let mut page = None;
    for pair in query.split('&') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        match name {
            "path" => file = Some(percent_decode(value)),
            "page" => page = value.parse().ok(),
            _ => {}
        }
    }
    Some((file?, page?))
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn write_response(stream: &mut TcpStream, response: &Scripted) {
    let reason = match response.status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let mut message = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        reason,
        response.body.len()
    );
    for (name, value) in &response.headers {
        message.push_str(&format!("{name}: {value}\r\n"));
    }
    message.push_str("\r\n");
    message.push_str(&response.body);
    let _ = stream.write_all(message.as_bytes());
    let _ = stream.flush();
}

/// JSON for one commit entry the way the commits endpoint renders it.
pub fn commit_json(login: Option<&str>, name: Option<&str>, date: Option<&str>) -> String {
    let author = match login {
        Some(login) => format!(r#"{{"login":"{login}"}}"#),
        None => "null".to_string(),
    };
    let name = match name {
        Some(name) => format!(r#""{name}""#),
        None => "null".to_string(),
    };
    let date = match date {
        Some(date) => format!(r#""{date}""#),
        None => "null".to_string(),
    };
    format!(r#"{{"author":{author},"commit":{{"author":{{"name":{name},"date":{date}}}}}}}"#)
}

/// A full page body from commit entries.
pub fn page_json(commits: &[String]) -> String {
    format!("[{}]", commits.join(","))
}
