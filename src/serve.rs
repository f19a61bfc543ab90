// src/serve.rs
//! Scoped static file server exposing the site to external tools.
//!
//! The listener binds an ephemeral port on the loopback interface before the
//! accept thread starts, so the URL is valid as soon as `start` returns.
//! Dropping the handle stops the accept loop and joins it.

use crate::error::{ForgeError, ForgeResult};
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle for a running local server.
#[derive(Debug)]
pub struct LocalServer {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
}

impl LocalServer {
    /// Serves `root` on `127.0.0.1:<ephemeral>`, then waits `settle`.
    ///
    /// # Errors
    /// Returns error if no port can be bound.
    pub fn start(root: &Path, settle: Duration) -> ForgeResult<Self> {
        let server_err = |e: std::io::Error| ForgeError::execution("local server", e.to_string());
        let listener = TcpListener::bind("127.0.0.1:0").map_err(server_err)?;
        let addr = listener.local_addr().map_err(server_err)?;
        listener.set_nonblocking(true).map_err(server_err)?;

        let stop = Arc::new(AtomicBool::new(false));
        let root = root.to_path_buf();
        let flag = Arc::clone(&stop);
        let accept_thread = thread::spawn(move || accept_loop(&listener, &root, &flag));

        tracing::debug!(%addr, "local server started");
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        Ok(Self {
            addr,
            stop,
            accept_thread: Some(accept_thread),
        })
    }

    /// Base URL, with trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for LocalServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.accept_thread.take() {
            let _ = handle.join();
        }
        tracing::debug!(addr = %self.addr, "local server stopped");
    }
}

fn accept_loop(listener: &TcpListener, root: &Path, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _)) => {
                let root = root.to_path_buf();
                thread::spawn(move || {
                    if let Err(e) = handle_connection(stream, &root) {
                        tracing::debug!(error = %e, "local server connection failed");
                    }
                });
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                tracing::warn!(error = %e, "local server accept failed");
                break;
            }
        }
    }
}

fn handle_connection(stream: TcpStream, root: &Path) -> std::io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(IO_TIMEOUT))?;
    stream.set_write_timeout(Some(IO_TIMEOUT))?;

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    // Drain headers; the body of a GET/HEAD is ignored.
    let mut header = String::new();
    while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
        header.clear();
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or("/");

    let response = match method {
        "GET" | "HEAD" => route(root, target),
        _ => Response::status(405, "Method Not Allowed"),
    };
    response.write_to(stream, method == "HEAD")
}

struct Response {
    code: u16,
    reason: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Response {
    fn status(code: u16, reason: &'static str) -> Self {
        Self {
            code,
            reason,
            content_type: "text/plain; charset=utf-8",
            body: reason.as_bytes().to_vec(),
        }
    }

    fn write_to(self, mut stream: TcpStream, head_only: bool) -> std::io::Result<()> {
        write!(
            stream,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.code,
            self.reason,
            self.content_type,
            self.body.len()
        )?;
        if !head_only {
            stream.write_all(&self.body)?;
        }
        stream.flush()
    }
}

fn route(root: &Path, target: &str) -> Response {
    let Some(path) = map_target(root, target) else {
        return Response::status(400, "Bad Request");
    };
    let path = if path.is_dir() {
        path.join("index.html")
    } else {
        path
    };
    match fs::read(&path) {
        Ok(body) => Response {
            code: 200,
            reason: "OK",
            content_type: content_type(&path),
            body,
        },
        Err(_) => Response::status(404, "Not Found"),
    }
}

/// Maps a request target onto a path under `root`; `None` if it escapes.
fn map_target(root: &Path, target: &str) -> Option<PathBuf> {
    let path_part = target.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode(path_part)?;
    let mut out = root.to_path_buf();
    for component in Path::new(&decoded).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json" | "webmanifest") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn get(server: &LocalServer, target: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", server.port())).unwrap();
        write!(stream, "GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn serves_index_for_directories() {
        let d = tempfile::tempdir().unwrap();
        fs::write(d.path().join("index.html"), "<h1>home</h1>").unwrap();
        let server = LocalServer::start(d.path(), Duration::ZERO).unwrap();

        let response = get(&server, "/");
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("text/html"));
        assert!(response.ends_with("<h1>home</h1>"));
    }

    #[test]
    fn missing_files_are_404() {
        let d = tempfile::tempdir().unwrap();
        let server = LocalServer::start(d.path(), Duration::ZERO).unwrap();
        assert!(get(&server, "/nope.css").starts_with("HTTP/1.1 404"));
    }

    #[test]
    fn traversal_is_rejected() {
        let root = Path::new("/srv/site");
        assert_eq!(map_target(root, "/../etc/passwd"), None);
        assert_eq!(map_target(root, "/%2e%2e/etc/passwd"), None);
        assert_eq!(
            map_target(root, "/images/a%20b.png?v=2"),
            Some(PathBuf::from("/srv/site/images/a b.png"))
        );
    }

    #[test]
    fn url_uses_bound_port() {
        let d = tempfile::tempdir().unwrap();
        let server = LocalServer::start(d.path(), Duration::ZERO).unwrap();
        assert_eq!(server.url(), format!("http://127.0.0.1:{}/", server.port()));
        assert!(server.port() > 0);
    }
}
