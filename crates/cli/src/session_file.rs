//! Saved-session persistence between CLI invocations.

use std::path::Path;

use tracing::debug;

use shopfront_session::Session;

use crate::error::CliError;

/// Load the saved session, or start a fresh one if none exists.
///
/// # Errors
///
/// Returns `CliError::CorruptSession` if the file exists but cannot be decoded.
pub async fn load(path: &Path) -> Result<Session, CliError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No saved session, starting anonymous");
            return Ok(Session::new());
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&contents).map_err(|source| CliError::CorruptSession {
        path: path.to_path_buf(),
        source,
    })
}

/// Save the session, replacing the file atomically.
///
/// # Errors
///
/// Returns an error if the data directory cannot be written.
pub async fn save(path: &Path, session: &Session) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec_pretty(session).map_err(CliError::Encode)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), session_id = %session.id(), "Session saved");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_starts_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let session = load(&dir.path().join("session.json")).await.unwrap();
        assert!(!session.is_authenticated());
        assert!(session.active_cart().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_session_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let session = Session::new();

        save(&path, &session).await.unwrap();
        let loaded = load(&path).await.unwrap();

        assert_eq!(loaded, session);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&path).await.unwrap_err();
        assert!(matches!(err, CliError::CorruptSession { .. }));
    }
}
