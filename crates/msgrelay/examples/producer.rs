//! Minimal producer: sends a few messages to a running relay.
//!
//! Start the relay:
//!   cargo run -p msgrelay -- serve --listen-to sock1
//!
//! Then in another terminal:
//!   cargo run -p msgrelay --example producer -- sock1

use msgrelay::codec::{encode_text, Message, User};
use msgrelay::relay::send_payload;
use msgrelay::transport::ListenAddress;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let name = std::env::args().nth(1).unwrap_or_else(|| "sock1".to_string());
    let addr = ListenAddress::from_name(&name)?;
    let sender = User::new(7, "alice");

    for (id, content) in ["hello", "a somewhat longer message body", "bye"]
        .into_iter()
        .enumerate()
    {
        let message = Message::new(id as i64 + 1, content, sender.clone());
        send_payload(&addr, &encode_text(&message)?)?;
        eprintln!("Sent message {} to {addr}", message.id);
    }

    Ok(())
}
