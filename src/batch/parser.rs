//! Batch file parsing
//!
//! Reads a CSV or JSON batch file into an ordered sequence of
//! [`BatchOperation`]s. Malformed rows never abort the parse: a row whose
//! fields fail coercion (bad decimal, unknown operation type, missing
//! required field) becomes an `Invalid` operation already in `FAILED`
//! state, carrying the source position, and the rest of the file still
//! parses. Only an unreadable file or a malformed JSON document fails the
//! whole call.
//!
//! CSV columns (order-independent, matched by header name):
//! `operation_type, account, amount, to_account, memo, nickname,
//! overdraft_limit`. Rows whose `operation_type` is blank or starts with
//! `#` are comments and are skipped entirely.
//!
//! JSON shape: `{"operations": [{"operation_type": "...", "parameters":
//! {...}}]}`. JSON entries have no file line, so `line_number` carries the
//! array index instead.

use crate::types::{BatchError, BatchOperation, OperationKind};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Raw CSV row, before coercion into a typed operation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    operation_type: String,
    account: Option<String>,
    amount: Option<String>,
    to_account: Option<String>,
    memo: Option<String>,
    nickname: Option<String>,
    overdraft_limit: Option<String>,
}

/// Raw JSON operation entry
#[derive(Debug, Deserialize)]
struct JsonEntry {
    operation_type: String,
    #[serde(default)]
    parameters: JsonParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonParams {
    account: Option<String>,
    amount: Option<Value>,
    to_account: Option<String>,
    memo: Option<String>,
    nickname: Option<String>,
    overdraft_limit: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonDocument {
    operations: Vec<Value>,
}

/// Parse a batch file, dispatching on its extension
///
/// `.json` files are parsed as JSON documents; everything else is read as
/// CSV.
///
/// # Errors
///
/// Returns [`BatchError`] only for whole-file failures: a missing or
/// unreadable file, an invalid CSV header, or a JSON document that is not
/// well-formed. Individual bad rows surface as failed operations in the
/// returned sequence.
pub fn parse_file(path: &Path) -> Result<Vec<BatchOperation>, BatchError> {
    let file = File::open(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            BatchError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            BatchError::from(error)
        }
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(file)
    } else {
        parse_csv(file)
    }
}

/// Parse CSV content from any reader
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<BatchOperation>, BatchError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|error| BatchError::InvalidHeader {
            message: error.to_string(),
        })?
        .clone();

    let mut operations = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                let line = error.position().map(|position| position.line());
                operations.push(BatchOperation::parse_failed("", line, error.to_string()));
                continue;
            }
        };
        let line = record.position().map(|position| position.line());

        let row: CsvRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(error) => {
                operations.push(BatchOperation::parse_failed("", line, error.to_string()));
                continue;
            }
        };

        let raw_type = row.operation_type.trim();
        if raw_type.is_empty() || raw_type.starts_with('#') {
            continue;
        }

        operations.push(build_operation(
            raw_type,
            row.account.as_deref(),
            row.amount.as_deref(),
            row.to_account.as_deref(),
            row.memo.as_deref(),
            row.nickname.as_deref(),
            row.overdraft_limit.as_deref(),
            line,
        ));
    }

    Ok(operations)
}

/// Parse a JSON batch document from any reader
pub fn parse_json<R: Read>(mut input: R) -> Result<Vec<BatchOperation>, BatchError> {
    let mut content = String::new();
    input.read_to_string(&mut content)?;

    let document: JsonDocument =
        serde_json::from_str(&content).map_err(|error| BatchError::MalformedJson {
            message: error.to_string(),
        })?;

    let mut operations = Vec::with_capacity(document.operations.len());
    for (index, raw_entry) in document.operations.into_iter().enumerate() {
        let position = Some(index as u64);

        let entry: JsonEntry = match serde_json::from_value(raw_entry) {
            Ok(entry) => entry,
            Err(error) => {
                operations.push(BatchOperation::parse_failed(
                    "",
                    position,
                    format!("Invalid operation entry: {}", error),
                ));
                continue;
            }
        };

        let amount = entry.parameters.amount.as_ref().map(json_scalar_to_string);
        let overdraft = entry
            .parameters
            .overdraft_limit
            .as_ref()
            .map(json_scalar_to_string);

        operations.push(build_operation(
            entry.operation_type.trim(),
            entry.parameters.account.as_deref(),
            amount.as_deref(),
            entry.parameters.to_account.as_deref(),
            entry.parameters.memo.as_deref(),
            entry.parameters.nickname.as_deref(),
            overdraft.as_deref(),
            position,
        ));
    }

    Ok(operations)
}

/// Render a JSON number or string as the text the decimal parser expects
fn json_scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce raw row fields into a typed operation
///
/// Any coercion failure yields an already-failed `Invalid` operation; the
/// caller keeps parsing.
#[allow(clippy::too_many_arguments)]
fn build_operation(
    raw_type: &str,
    account: Option<&str>,
    amount: Option<&str>,
    to_account: Option<&str>,
    memo: Option<&str>,
    nickname: Option<&str>,
    overdraft_limit: Option<&str>,
    position: Option<u64>,
) -> BatchOperation {
    match coerce_kind(
        raw_type,
        account,
        amount,
        to_account,
        memo,
        nickname,
        overdraft_limit,
    ) {
        Ok(kind) => BatchOperation::pending(kind, position),
        Err(message) => BatchOperation::parse_failed(raw_type, position, message),
    }
}

#[allow(clippy::too_many_arguments)]
fn coerce_kind(
    raw_type: &str,
    account: Option<&str>,
    amount: Option<&str>,
    to_account: Option<&str>,
    memo: Option<&str>,
    nickname: Option<&str>,
    overdraft_limit: Option<&str>,
) -> Result<OperationKind, String> {
    let kind = match raw_type.to_lowercase().as_str() {
        "deposit" => OperationKind::Deposit {
            account: required(account, "account")?,
            amount: required_decimal(amount, "amount")?,
        },
        "withdraw" => OperationKind::Withdraw {
            account: required(account, "account")?,
            amount: required_decimal(amount, "amount")?,
        },
        "transfer" => OperationKind::Transfer {
            account: required(account, "account")?,
            to_account: required(to_account, "to_account")?,
            amount: required_decimal(amount, "amount")?,
            memo: optional(memo),
        },
        "create_account" => OperationKind::CreateAccount {
            account_type: required(account, "account")?,
            amount: optional_decimal(amount, "amount")?,
            nickname: optional(nickname),
            overdraft_limit: optional_decimal(overdraft_limit, "overdraft_limit")?,
        },
        "update_nickname" => OperationKind::UpdateNickname {
            account: required(account, "account")?,
            nickname: required(nickname, "nickname")?,
        },
        other => return Err(format!("Unknown operation type '{}'", other)),
    };
    Ok(kind)
}

fn required(value: Option<&str>, field: &str) -> Result<String, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("Missing required field '{}'", field)),
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_decimal(value: Option<&str>, field: &str) -> Result<Decimal, String> {
    let raw = required(value, field)?;
    Decimal::from_str(&raw).map_err(|_| format!("Invalid {} '{}'", field, raw))
}

fn optional_decimal(value: Option<&str>, field: &str) -> Result<Option<Decimal>, String> {
    match optional(value) {
        Some(raw) => Decimal::from_str(&raw)
            .map(Some)
            .map_err(|_| format!("Invalid {} '{}'", field, raw)),
        None => Ok(None),
    }
}
