//! Print the OpenAPI document as JSON.

use std::io::{self, Write};
use std::process::ExitCode;

use arrienda_backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(err) => {
            eprintln!("failed to serialise OpenAPI document: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = writeln!(io::stdout().lock(), "{json}") {
        eprintln!("failed to write OpenAPI document: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
