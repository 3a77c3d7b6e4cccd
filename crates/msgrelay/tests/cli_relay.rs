#![cfg(all(target_os = "linux", feature = "cli"))]

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use msgrelay_codec::{decode_binary, Message, User};
use msgrelay_relay::{send_payload, RelayConfig, RelayServer};
use msgrelay_transport::{ListenAddress, LocalSocket};

const HAPPY: &str = r#"{"id":1,"content":"hi","sender":{"id":7,"name":"alice"}}"#;

fn unique(tag: &str) -> String {
    format!(
        "msgrelay-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    )
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(unique(tag));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Retry the first send until the relay is listening.
fn send_when_ready(addr: &ListenAddress, payload: &[u8], timeout: Duration) -> io::Result<()> {
    let start = Instant::now();
    loop {
        match send_payload(addr, payload) {
            Ok(()) => return Ok(()),
            Err(err) => {
                if start.elapsed() >= timeout {
                    return Err(io::Error::other(format!("connect timeout: {err}")));
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

fn output_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("output dir should be readable")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().starts_with("socket-"))
                .unwrap_or(false)
        })
        .collect()
}

fn spawn_serve(name: &str, dir: &Path, count: usize) -> std::process::Child {
    Command::new(env!("CARGO_BIN_EXE_msgrelay"))
        .args(["--log-level", "info", "serve", "--listen-to", name, "--count"])
        .arg(count.to_string())
        .arg("--output-dir")
        .arg(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("serve command should start")
}

fn wait_with_timeout(mut child: std::process::Child, timeout: Duration) -> Output {
    let start = Instant::now();
    loop {
        if child.try_wait().expect("child status").is_some() {
            return child.wait_with_output().expect("child output");
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            panic!("serve did not exit within {timeout:?}");
        }
        thread::sleep(Duration::from_millis(25));
    }
}

#[test]
fn serve_echoes_good_messages_logs_bad_ones_and_keeps_the_last() {
    let dir = unique_temp_dir("serve");
    let name = unique("serve");
    let addr = ListenAddress::from_name(&name).unwrap();
    let child = spawn_serve(&name, &dir, 3);

    let long = format!(
        r#"{{"id":9,"content":"{}","sender":{{"id":2,"name":"bob"}}}}"#,
        "x".repeat(4096)
    );
    send_when_ready(&addr, long.as_bytes(), Duration::from_secs(3)).expect("relay should accept");
    send_payload(&addr, br#"{"id":1,"content":"hi""#).expect("truncated payload should send");
    send_payload(&addr, HAPPY.as_bytes()).expect("happy payload should send");

    let output = wait_with_timeout(child, Duration::from_secs(5));
    assert!(output.status.success(), "serve should exit cleanly");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec![long.as_str(), HAPPY]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("connection abandoned").count(), 1);
    assert!(stderr.contains("stage=decode"), "stderr: {stderr}");

    let files = output_files(&dir);
    assert_eq!(files.len(), 1, "exactly one output file is reused");
    let written = std::fs::read(&files[0]).unwrap();
    assert_eq!(
        decode_binary(&written).unwrap(),
        Message::new(1, "hi", User::new(7, "alice"))
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn serve_exits_nonzero_when_name_is_taken() {
    let dir = unique_temp_dir("taken");
    let name = unique("taken");
    let _holder = LocalSocket::bind(&ListenAddress::from_name(&name).unwrap())
        .expect("first bind should succeed");

    let output = Command::new(env!("CARGO_BIN_EXE_msgrelay"))
        .args(["serve", "--listen-to", name.as_str(), "--output-dir"])
        .arg(&dir)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .expect("serve command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bind failed"), "stderr: {stderr}");
    assert!(output_files(&dir).is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_command_delivers_to_relay() {
    let dir = unique_temp_dir("send");
    let addr = ListenAddress::Abstract(unique("send"));
    let mut server = RelayServer::bind(
        &addr,
        RelayConfig {
            output_dir: dir.clone(),
            ..RelayConfig::default()
        },
    )
    .expect("relay should bind");

    let relay = thread::spawn(move || server.serve_one().map(|delivery| delivery.message));

    let status = Command::new(env!("CARGO_BIN_EXE_msgrelay"))
        .args(["--log-level", "error", "send", "--listen-to"])
        .arg(addr.to_string())
        .args(["--json", HAPPY])
        .status()
        .expect("send command should run");
    assert!(status.success());

    let message = relay.join().unwrap().expect("relay should succeed");
    assert_eq!(message, Message::new(1, "hi", User::new(7, "alice")));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inspect_prints_persisted_message_as_json() {
    let dir = unique_temp_dir("inspect");
    let addr = ListenAddress::Abstract(unique("inspect"));
    let mut server = RelayServer::bind(
        &addr,
        RelayConfig {
            output_dir: dir.clone(),
            ..RelayConfig::default()
        },
    )
    .expect("relay should bind");

    let client = thread::spawn(move || send_payload(&addr, HAPPY.as_bytes()));
    let delivery = server.serve_one().expect("relay should succeed");
    client.join().unwrap().expect("send should succeed");

    let output = Command::new(env!("CARGO_BIN_EXE_msgrelay"))
        .args(["inspect", "--format", "json"])
        .arg(&delivery.output)
        .output()
        .expect("inspect command should run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("inspect output should be json");
    assert_eq!(json["encoded_size"], delivery.encoded_len);
    assert_eq!(json["message"]["id"], 1);
    assert_eq!(json["message"]["content"], "hi");
    assert_eq!(json["message"]["sender"]["id"], 7);
    assert_eq!(json["message"]["sender"]["name"], "alice");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inspect_rejects_non_protobuf_file() {
    let dir = unique_temp_dir("inspect-bad");
    let path = dir.join("socket-bogus");
    std::fs::write(&path, [0x12, 0x7f, 0x00]).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_msgrelay"))
        .arg("inspect")
        .arg(&path)
        .output()
        .expect("inspect command should run");
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}
