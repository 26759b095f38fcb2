//! Validate command - run a JSON payload through the validator.
//!
//! ```bash
//! echo '{"email": "a@b.com", "role": "admin"}' | usermgmt validate
//! usermgmt validate --kind update patch.json
//! ```

use std::io::Read;
use std::path::Path;

use common::{AppError, AppResult};
use domain::{validate_create, validate_update, CreateUser, RandomNickname, UpdateUser};

use crate::args::{PayloadKind, ValidateArgs};

/// Execute the validate command
pub async fn execute(args: ValidateArgs) -> AppResult<()> {
    let raw = read_input(args.file.as_deref())?;
    println!("{}", validate_payload(args.kind, &raw)?);
    Ok(())
}

/// Validate `raw` JSON and return the normalized result, pretty-printed.
pub fn validate_payload(kind: PayloadKind, raw: &str) -> AppResult<String> {
    let output = match kind {
        PayloadKind::Create => {
            let input: CreateUser = parse(raw)?;
            let record = validate_create(&input, &RandomNickname)?;
            serde_json::to_value(record)
        }
        PayloadKind::Update => {
            let input: UpdateUser = parse(raw)?;
            let changes = validate_update(&input)?;
            serde_json::to_value(changes)
        }
    };

    output
        .and_then(|value| serde_json::to_string_pretty(&value))
        .map_err(|e| AppError::internal(format!("Failed to encode result: {}", e)))
}

fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(|e| AppError::bad_request(format!("Malformed JSON: {}", e)))
}

fn read_input(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| AppError::bad_request(format!("Cannot read {}: {}", path.display(), e))),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::internal(format!("Cannot read stdin: {}", e)))?;
            Ok(buf)
        }
    }
}
