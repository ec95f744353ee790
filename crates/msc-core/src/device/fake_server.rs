//! In-process stand-in for the host ADB server
//!
//! Speaks the smart-socket framing (`%04x` request, `OKAY` plus a `%04x`
//! body) for the host and device services the adapters use, and records
//! every request in arrival order. Endpoints passed to `host:connect:` show
//! up in the device list until `host:disconnect:` removes them.

use std::{
    io::{Read, Write},
    net::{SocketAddr, SocketAddrV4, TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use parking_lot::Mutex;

#[derive(Debug)]
struct State {
    devices: Vec<(String, String)>,
    shell: Vec<(String, Vec<u8>)>,
    attach_on_connect: bool,
    log: Vec<String>,
}

/// Scripted ADB server, configured before [`FakeAdbServer::start`]
pub(crate) struct FakeAdbServer {
    state: State,
}

impl FakeAdbServer {
    pub fn new() -> Self {
        Self {
            state: State {
                devices: Vec::new(),
                shell: Vec::new(),
                attach_on_connect: true,
                log: Vec::new(),
            },
        }
    }

    /// Lists `serial` in `state` (`device`, `offline`, `unauthorized`, ...)
    pub fn device(mut self, serial: &str, state: &str) -> Self {
        self.state.devices.push((serial.to_string(), state.to_string()));
        self
    }

    /// Answers shell commands starting with `prefix` with `output`
    ///
    /// Unmatched commands print nothing.
    pub fn shell_reply(mut self, prefix: &str, output: impl Into<Vec<u8>>) -> Self {
        self.state.shell.push((prefix.to_string(), output.into()));
        self
    }

    /// Accepts `host:connect:` without listing the endpoint afterwards
    pub fn without_attach_on_connect(mut self) -> Self {
        self.state.attach_on_connect = false;
        self
    }

    pub fn start(self) -> FakeAdbHandle {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake adb server");
        let addr = match listener.local_addr().expect("fake adb server address") {
            SocketAddr::V4(addr) => addr,
            SocketAddr::V6(addr) => panic!("unexpected IPv6 listener {}", addr),
        };

        let state = Arc::new(Mutex::new(self.state));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || serve_connection(stream, &state));
            }
        });

        FakeAdbHandle { addr, state }
    }
}

/// Running fake server
pub(crate) struct FakeAdbHandle {
    addr: SocketAddrV4,
    state: Arc<Mutex<State>>,
}

impl FakeAdbHandle {
    pub fn addr(&self) -> SocketAddrV4 {
        self.addr
    }

    /// Requests without the transport and feature handshake that precedes
    /// every device service; shell requests read `shell:<command>`
    pub fn commands(&self) -> Vec<String> {
        self.state
            .lock()
            .log
            .iter()
            .filter(|request| {
                !request.starts_with("host:transport:") && request.as_str() != "host:features"
            })
            .map(|request| match shell_command(request) {
                Some(command) => format!("shell:{}", command),
                None => request.clone(),
            })
            .collect()
    }
}

/// Command text of a `shell[,args],raw:<command>` request
fn shell_command(request: &str) -> Option<&str> {
    if !request.starts_with("shell") {
        return None;
    }
    request.split_once("raw:").map(|(_, command)| command)
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut len = [0u8; 4];
    stream.read_exact(&mut len).ok()?;
    let len = usize::from_str_radix(std::str::from_utf8(&len).ok()?, 16).ok()?;

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).ok()?;
    String::from_utf8(body).ok()
}

fn okay_with_body(body: &[u8]) -> Vec<u8> {
    let mut reply = format!("OKAY{:04x}", body.len()).into_bytes();
    reply.extend_from_slice(body);
    reply
}

fn serve_connection(mut stream: TcpStream, state: &Mutex<State>) {
    while let Some(request) = read_request(&mut stream) {
        let (reply, last) = {
            let mut state = state.lock();
            state.log.push(request.clone());
            respond(&mut state, &request)
        };
        if stream.write_all(&reply).is_err() || last {
            break;
        }
    }
}

/// Reply bytes, and whether the service ends the connection
fn respond(state: &mut State, request: &str) -> (Vec<u8>, bool) {
    if request == "host:devices" {
        let body: String = state
            .devices
            .iter()
            .map(|(serial, device_state)| format!("{}\t{}\n", serial, device_state))
            .collect();
        return (okay_with_body(body.as_bytes()), true);
    }

    if let Some(endpoint) = request.strip_prefix("host:connect:") {
        if state.attach_on_connect && !state.devices.iter().any(|(s, _)| s == endpoint) {
            state.devices.push((endpoint.to_string(), "device".to_string()));
        }
        let body = format!("connected to {}", endpoint);
        return (okay_with_body(body.as_bytes()), true);
    }

    if let Some(endpoint) = request.strip_prefix("host:disconnect:") {
        state.devices.retain(|(serial, _)| serial != endpoint);
        let body = format!("disconnected {}", endpoint);
        return (okay_with_body(body.as_bytes()), true);
    }

    if request == "host:features" {
        // Raw shell only, so output is not framed
        return (okay_with_body(b"cmd"), false);
    }

    if let Some(command) = shell_command(request) {
        let mut reply = b"OKAY".to_vec();
        if let Some((_, output)) = state
            .shell
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
        {
            reply.extend_from_slice(output);
        }
        return (reply, true);
    }

    // host:transport:*, host:forward:*, host:killforward-all
    (b"OKAY".to_vec(), false)
}
