use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use espkit::workflows::esp::EspResponse;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a single-molecule response as JSON or CSV.
///
/// CSV columns are `x,y,z,esp` for combined responses and
/// `point,monopole,dipole,quadrupole` for broken-up ones.
pub fn write_response(response: &EspResponse, format: OutputFormat, writer: impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(response, writer),
        OutputFormat::Csv => write_csv(response, writer),
    }
}

pub fn write_response_to_path(response: &EspResponse, format: OutputFormat, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_response(response, format, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_json(response: &EspResponse, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, response)
        .map_err(|e| CliError::Other(e.into()))?;
    writeln!(writer)?;
    Ok(())
}

fn write_csv(response: &EspResponse, writer: impl Write) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let to_other = |e: csv::Error| CliError::Other(e.into());

    match response {
        EspResponse::Combined { values, grid } => {
            csv.write_record(["x", "y", "z", "esp"]).map_err(to_other)?;
            for (point, value) in grid.iter().zip(values) {
                csv.serialize((point[0], point[1], point[2], value))
                    .map_err(to_other)?;
            }
        }
        EspResponse::BrokenUp {
            monopole,
            dipole,
            quadrupole,
        } => {
            csv.write_record(["point", "monopole", "dipole", "quadrupole"])
                .map_err(to_other)?;
            for (i, ((m, d), q)) in monopole.iter().zip(dipole).zip(quadrupole).enumerate() {
                csv.serialize((i, m, d, q)).map_err(to_other)?;
            }
        }
        EspResponse::BatchFile { .. } => {
            return Err(CliError::Argument(
                "batch results are already written as JSON and cannot be rendered as CSV"
                    .to_string(),
            ));
        }
    }
    csv.flush()?;
    Ok(())
}
