use std::fs;
use std::io::Read;

use msgrelay_relay::send_payload;
use msgrelay_transport::ListenAddress;

use crate::cmd::SendArgs;
use crate::exit::{io_error, transport_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let addr = ListenAddress::from_name(&args.listen_to)
        .map_err(|err| transport_error("invalid listen address", err))?;
    let payload = resolve_payload(&args)?;
    send_payload(&addr, &payload).map_err(|err| transport_error("send failed", err))?;
    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(json) = &args.json {
        serde_json::from_str::<serde_json::Value>(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        return Ok(json.as_bytes().to_vec());
    }
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SendArgs {
        SendArgs {
            listen_to: "sock1".into(),
            json: None,
            data: None,
            file: None,
        }
    }

    #[test]
    fn json_payload_must_parse() {
        let bad = SendArgs {
            json: Some("{\"id\":".into()),
            ..args()
        };
        assert_eq!(resolve_payload(&bad).unwrap_err().code, USAGE);

        let good = SendArgs {
            json: Some("{\"id\":1}".into()),
            ..args()
        };
        assert_eq!(resolve_payload(&good).unwrap(), b"{\"id\":1}");
    }

    #[test]
    fn data_payload_is_sent_verbatim() {
        let raw = SendArgs {
            data: Some("{not json".into()),
            ..args()
        };
        assert_eq!(resolve_payload(&raw).unwrap(), b"{not json");
    }

    #[test]
    fn missing_file_is_reported() {
        let missing = SendArgs {
            file: Some("/nonexistent/msgrelay/payload.json".into()),
            ..args()
        };
        assert!(resolve_payload(&missing)
            .unwrap_err()
            .message
            .starts_with("failed reading /nonexistent/msgrelay/payload.json"));
    }
}
