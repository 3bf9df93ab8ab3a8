// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `campusfix export`, `campusfix import`, and `campusfix reset`.
//!
//! Export writes the whole canonical document; import accepts any schema
//! the normalizer understands, so an export from the old web tool restores
//! cleanly. Reset is the administrative escape hatch and refuses to run
//! without explicit confirmation.

use std::path::Path;

use campusfix_core::CampusfixError;
use campusfix_store::OrderStore;

/// Write the full order document as pretty JSON to `output`, or stdout
/// when no path is given.
pub async fn run_export(
    store: &OrderStore,
    output: Option<&Path>,
) -> Result<(), CampusfixError> {
    let doc = store.export().await?;
    let json = serde_json::to_string_pretty(&doc).map_err(storage_err)?;

    match output {
        Some(path) => {
            std::fs::write(path, &json).map_err(storage_err)?;
            eprintln!(
                "Exported {} orders to {}",
                doc.orders.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Replace the order document with the contents of `input`. Returns the
/// number of imported orders.
pub async fn run_import(store: &OrderStore, input: &Path) -> Result<usize, CampusfixError> {
    if !input.exists() {
        return Err(CampusfixError::Storage {
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("import file not found: {}", input.display()),
            )),
        });
    }
    let raw = std::fs::read_to_string(input).map_err(storage_err)?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(storage_err)?;
    let count = store.import(value).await?;
    eprintln!("Imported {count} orders from {}", input.display());
    Ok(count)
}

/// Delete every order and reset the counter. Requires `--yes`.
pub async fn run_reset(store: &OrderStore, yes: bool) -> Result<(), CampusfixError> {
    if !yes {
        return Err(CampusfixError::Config(
            "reset deletes all order data; re-run with --yes to confirm".to_string(),
        ));
    }
    store.wipe().await?;
    eprintln!("All order data deleted.");
    Ok(())
}

fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> CampusfixError {
    CampusfixError::Storage {
        source: Box::new(e),
    }
}
