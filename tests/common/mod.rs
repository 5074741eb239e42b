#![allow(dead_code)]

pub mod temp_files {
    use std::path::Path;

    /// Fresh data directory removed when the guard drops.
    pub fn temp_data_dir() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix("amock_test_")
            .tempdir()
            .unwrap()
    }

    pub fn write(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    pub fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}

pub mod test_server {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x40000);
        });
    }
}

pub mod fake_model {
    use amock::error::{MockError, Result};
    use amock::generator::{prompts, Archetype};
    use amock::llm::{ChatModel, ChatRequest};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Deterministic stand-in for the chat backend.
    ///
    /// Entity-name and enhancement requests are recognized by their system
    /// prompt; endpoint requests by the `operation:` line of theirs.
    pub struct ScriptedModel {
        pub entity_reply: String,
        /// `None` makes enhancement fail
        pub enhance_reply: Option<String>,
        /// Archetypes that get an unusable reply
        pub broken: Vec<Archetype>,
        pub calls: AtomicUsize,
        pub endpoint_users: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(entity_reply: &str) -> Self {
            Self {
                entity_reply: entity_reply.to_string(),
                enhance_reply: Some("A user entity with name, email and age fields".to_string()),
                broken: Vec::new(),
                calls: AtomicUsize::new(0),
                endpoint_users: Mutex::new(Vec::new()),
            }
        }

        pub fn without_enhancement(mut self) -> Self {
            self.enhance_reply = None;
            self
        }

        pub fn breaking(mut self, archetype: Archetype) -> Self {
            self.broken.push(archetype);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChatModel for ScriptedModel {
        fn complete(&self, request: &ChatRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let system = request.system_content().unwrap_or_default();

            if system == prompts::entity_name_system() {
                return Ok(self.entity_reply.clone());
            }
            if system == prompts::enhance_system() {
                return self
                    .enhance_reply
                    .clone()
                    .ok_or_else(|| MockError::generation("enhancement backend down"));
            }

            let archetype = Archetype::ALL
                .into_iter()
                .find(|a| system.contains(&format!("- operation: {}\n", a.label())))
                .ok_or_else(|| MockError::generation("unrecognized prompt"))?;
            if let Ok(mut users) = self.endpoint_users.lock() {
                users.push(request.user_content().unwrap_or_default().to_string());
            }
            if self.broken.contains(&archetype) {
                return Ok("this is not json".to_string());
            }
            let entity = system
                .split("the entity segment is \"")
                .nth(1)
                .and_then(|rest| rest.split('"').next())
                .unwrap_or("item")
                .to_string();
            Ok(valid_reply(archetype, &entity))
        }
    }

    /// A reply that passes validation for `archetype` on `entity`.
    pub fn valid_reply(archetype: Archetype, entity: &str) -> String {
        let path = archetype.expected_path(entity);
        let method = archetype.method().as_str();
        let data = match archetype {
            Archetype::ListQuery => {
                let mut data = serde_json::Map::new();
                data.insert(
                    format!("{entity}_list"),
                    json!([
                        { "id": 1, "name": "alice" },
                        { "id": 2, "name": "bob" },
                        { "id": 3, "name": "carol" }
                    ]),
                );
                data.insert("total".to_string(), json!(3));
                serde_json::Value::Object(data)
            }
            Archetype::Delete => serde_json::Value::Null,
            _ => json!({ "id": 1, "name": "alice" }),
        };
        let mut reply = json!({
            "path": path,
            "method": method,
            "description": format!("{} {entity}", archetype.label()),
            "responseBody": { "code": 0, "data": data, "msg": "success" }
        });
        if archetype.method().has_request_body() {
            reply["requestBody"] = json!({ "name": "alice" });
        }
        reply.to_string()
    }
}

pub mod http {
    use serde_json::Value;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Send one raw request and read the response through its body.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(2000)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&tmp[..n]);
                    if is_complete(&buf) {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn is_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    /// Build a request with an optional JSON body.
    pub fn request(method: &str, path: &str, body: Option<&Value>) -> String {
        match body {
            Some(body) => {
                let body = body.to_string();
                format!(
                    "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                    body.len()
                )
            }
            None => format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        }
    }

    pub fn parse_response(resp: &str) -> (u16, Value) {
        let mut parts = resp.splitn(2, "\r\n\r\n");
        let headers = parts.next().unwrap_or("");
        let body = parts.next().unwrap_or("");
        let mut status = 0;
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            }
        }
        let json: Value = serde_json::from_str(body).unwrap_or_default();
        (status, json)
    }
}
