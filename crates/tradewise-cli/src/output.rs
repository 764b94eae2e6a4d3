use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_result(&mut handle, result, format, pretty)?;
    handle.flush()?;
    Ok(())
}

fn write_result<W: Write>(
    writer: &mut W,
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => writeln!(writer, "{}", result.text.trim_end())?,
        OutputFormat::Json if pretty => {
            serde_json::to_writer_pretty(&mut *writer, &result.data)?;
            writeln!(writer)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, &result.data)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
