use std::time::Duration;

use msgrelay_relay::{RelayConfig, RelayServer};
use msgrelay_transport::ListenAddress;
use tracing::error;

use crate::cmd::ServeArgs;
use crate::exit::{transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_payload;

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let addr = ListenAddress::from_name(&args.listen_to)
        .map_err(|err| transport_error("invalid listen address", err))?;
    let read_timeout = parse_read_timeout(args.read_timeout.as_deref())?;

    let config = RelayConfig {
        output_dir: args.output_dir,
        output_prefix: args.prefix,
        max_payload_size: args.max_payload,
        read_timeout,
        sync_on_write: args.sync,
    };

    let mut server = RelayServer::bind(&addr, config).map_err(|err| {
        error!(%addr, error = %err, "cannot listen");
        transport_error("bind failed", err)
    })?;

    let quiet = args.quiet;
    server.run(args.count, |delivery| {
        if !quiet {
            print_payload(&delivery.text);
        }
    });

    Ok(SUCCESS)
}

/// Interpret `--read-timeout`. Absent means a stalled producer is waited on
/// forever; a zero timeout is refused since sockets reject it.
fn parse_read_timeout(arg: Option<&str>) -> CliResult<Option<Duration>> {
    let Some(raw) = arg else {
        return Ok(None);
    };
    let raw = raw.trim();
    let invalid = || {
        CliError::new(
            USAGE,
            format!("--read-timeout {raw:?} is not a duration like 500ms, 5s or 2m"),
        )
    };

    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    let timeout = match unit {
        "ms" => Duration::from_millis(amount),
        "" | "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.saturating_mul(60)),
        _ => return Err(invalid()),
    };
    if timeout.is_zero() {
        return Err(CliError::new(
            USAGE,
            "--read-timeout must be greater than zero; omit it to wait indefinitely",
        ));
    }
    Ok(Some(timeout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_timeout_absent_waits_forever() {
        assert_eq!(parse_read_timeout(None).unwrap(), None);
    }

    #[test]
    fn read_timeout_accepts_each_unit() {
        assert_eq!(
            parse_read_timeout(Some("250ms")).unwrap(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(parse_read_timeout(Some("5s")).unwrap(), Some(Duration::from_secs(5)));
        assert_eq!(parse_read_timeout(Some(" 7 ")).unwrap(), Some(Duration::from_secs(7)));
        assert_eq!(parse_read_timeout(Some("2m")).unwrap(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn read_timeout_refuses_zero_and_malformed_values() {
        let zero = parse_read_timeout(Some("0ms")).unwrap_err();
        assert_eq!(zero.code, USAGE);
        assert!(zero.message.contains("greater than zero"), "{}", zero.message);

        for raw in ["", "soon", "5h", "-1s", "1.5s", "ms"] {
            let err = parse_read_timeout(Some(raw)).unwrap_err();
            assert_eq!(err.code, USAGE, "{raw:?}");
            assert!(err.message.starts_with("--read-timeout"), "{}", err.message);
        }
    }
}
