use std::fs;

use msgrelay_codec::decode_binary;

use crate::cmd::InspectArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = fs::read(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;
    let message = decode_binary(&bytes).map_err(|err| codec_error("decode failed", err))?;
    print_message(&message, &args.path, bytes.len(), format);
    Ok(SUCCESS)
}
