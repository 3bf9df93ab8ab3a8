// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin session handling.
//!
//! Admin access is a flag file beside the order document. Its absence means
//! "no admin access", never an error; commands that mutate lifecycle state
//! or touch the whole dataset check for it before running.

use std::path::{Path, PathBuf};

use chrono::Utc;

use campusfix_core::CampusfixError;

/// File name of the admin session flag inside the data directory.
pub const SESSION_FILE: &str = "admin.session";

fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

/// Start an admin session by writing the flag file.
pub fn login(data_dir: &Path) -> Result<(), CampusfixError> {
    std::fs::create_dir_all(data_dir).map_err(storage_err)?;
    std::fs::write(
        session_path(data_dir),
        format!("{}\n", Utc::now().to_rfc3339()),
    )
    .map_err(storage_err)?;
    Ok(())
}

/// End the admin session. Returns whether a session existed.
pub fn logout(data_dir: &Path) -> Result<bool, CampusfixError> {
    let path = session_path(data_dir);
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path).map_err(storage_err)?;
    Ok(true)
}

/// Whether an admin session flag is present.
pub fn is_authenticated(data_dir: &Path) -> bool {
    session_path(data_dir).exists()
}

/// Guard for admin-only commands.
pub fn require(data_dir: &Path) -> Result<(), CampusfixError> {
    if is_authenticated(data_dir) {
        Ok(())
    } else {
        Err(CampusfixError::Config(
            "admin access required; run `campusfix admin login` first".to_string(),
        ))
    }
}

fn storage_err(e: std::io::Error) -> CampusfixError {
    CampusfixError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn login_then_logout_round_trips() {
        let dir = tempdir().unwrap();
        assert!(!is_authenticated(dir.path()));
        assert!(require(dir.path()).is_err());

        login(dir.path()).unwrap();
        assert!(is_authenticated(dir.path()));
        assert!(require(dir.path()).is_ok());

        assert!(logout(dir.path()).unwrap());
        assert!(!is_authenticated(dir.path()));
    }

    #[test]
    fn logout_without_session_is_a_noop() {
        let dir = tempdir().unwrap();
        assert!(!logout(dir.path()).unwrap());
    }

    #[test]
    fn login_creates_the_data_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested/data");
        login(&nested).unwrap();
        assert!(is_authenticated(&nested));
    }
}
