//! Input mode selection and batch aggregation.

use std::path::Path;

use crate::csv_parser::read_csv_rows;
use crate::error::{Result, SluiceError};
use crate::json_parser::parse_json_rows;
use crate::output::RowIssue;
use crate::row::{parse_row, CsvRow, HoursField, RowSource};
use crate::types::{InputMode, Output, RawInputSpec};

/// Positional tokens required in single-output mode.
pub const SINGLE_OUTPUT_ARGS: usize = 3;

/// Result of attempting every row of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFold {
    pub outputs: Vec<Output>,
    pub issues: Vec<RowIssue>,
}

impl RowFold {
    /// All rows or nothing: any issue rejects the whole batch.
    pub fn into_result(self) -> Result<Vec<Output>> {
        if self.issues.is_empty() {
            Ok(self.outputs)
        } else {
            Err(SluiceError::RowValidationFailure {
                issues: self.issues,
            })
        }
    }
}

/// Parse every row, collecting outputs and issues without stopping early.
pub fn fold_rows<I>(rows: I) -> RowFold
where
    I: IntoIterator<Item = std::result::Result<CsvRow, RowIssue>>,
{
    rows.into_iter()
        .enumerate()
        .fold(RowFold::default(), |mut acc, (index, row)| {
            match row.and_then(|row| parse_row(&row).map_err(|err| err.at(index))) {
                Ok(output) => acc.outputs.push(output),
                Err(issue) => acc.issues.push(issue),
            }
            acc
        })
}

/// Pick the active input mode. JSON and CSV together is an error.
pub fn select_mode(spec: &RawInputSpec) -> Result<InputMode> {
    match (&spec.json, &spec.csv) {
        (Some(_), Some(_)) => Err(SluiceError::ConflictingInputModes),
        (Some(_), None) => Ok(InputMode::Json),
        (None, Some(_)) => Ok(InputMode::Csv),
        (None, None) => Ok(InputMode::Single),
    }
}

/// Resolve a raw input description into a validated output list. An empty
/// batch resolves to no outputs.
pub fn resolve_outputs(spec: &RawInputSpec) -> Result<Vec<Output>> {
    let mode = select_mode(spec)?;
    tracing::debug!(mode = mode.as_str(), "resolving outputs");

    let outputs = match (mode, &spec.json, &spec.csv) {
        (InputMode::Json, Some(json), _) => outputs_from_json(json)?,
        (InputMode::Csv, _, Some(path)) => outputs_from_csv_file(path)?,
        _ => vec![output_from_args(&spec.args)?],
    };

    tracing::debug!(count = outputs.len(), "outputs resolved");
    Ok(outputs)
}

/// JSON batches stop at the first invalid row.
pub fn outputs_from_json(input: &str) -> Result<Vec<Output>> {
    let rows = parse_json_rows(input)?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            parse_row(row).map_err(|err| SluiceError::RowValidationFailure {
                issues: vec![err.at(index)],
            })
        })
        .collect()
}

/// Read a CSV batch fully, then validate every row.
pub fn outputs_from_csv_file(path: &Path) -> Result<Vec<Output>> {
    let bytes = std::fs::read(path).map_err(|source| SluiceError::BatchFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read csv batch");
    outputs_from_csv(&bytes)
}

/// CSV batches attempt every row and report every failure together.
pub fn outputs_from_csv(input: &[u8]) -> Result<Vec<Output>> {
    let fold = fold_rows(read_csv_rows(input));
    if !fold.issues.is_empty() {
        tracing::debug!(
            rejected = fold.issues.len(),
            accepted = fold.outputs.len(),
            "csv batch rejected"
        );
    }
    fold.into_result()
}

/// Single-output mode: `[address] [coins] [hours]`, failing fast.
pub fn output_from_args(args: &[String]) -> Result<Output> {
    if args.len() < SINGLE_OUTPUT_ARGS {
        return Err(SluiceError::InsufficientArguments {
            expected: SINGLE_OUTPUT_ARGS,
            actual: args.len(),
        });
    }
    if args.len() > SINGLE_OUTPUT_ARGS {
        tracing::debug!(
            ignored = args.len() - SINGLE_OUTPUT_ARGS,
            "ignoring extra positional arguments"
        );
    }

    let source = RowSource {
        address: &args[0],
        coins: &args[1],
        hours: HoursField::Text(&args[2]),
    };
    Ok(parse_row(source)?)
}
