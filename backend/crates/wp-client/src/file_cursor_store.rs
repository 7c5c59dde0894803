use crate::{ClientError, ClientResult, CursorStore};

use wp_core::{Cursor, TenantId};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// On-disk form of the high-water mark
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CursorRecord {
    tenant_id: TenantId,
    last_seen: Cursor,
}

/// Cursor store backed by a small JSON file, so a restarted client resumes
/// where it left off.
///
/// A file written for a different tenant is ignored.
#[derive(Debug, Clone)]
pub struct FileCursorStore {
    path: PathBuf,
    tenant_id: TenantId,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>, tenant_id: TenantId) -> Self {
        Self {
            path: path.into(),
            tenant_id,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn load(&self) -> ClientResult<Option<Cursor>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::io(&self.path, e)),
        };

        let record: CursorRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable cursor file {}: {}",
                    self.path.display(),
                    e
                );
                return Ok(None);
            }
        };

        if record.tenant_id != self.tenant_id {
            log::warn!(
                "Cursor file {} belongs to tenant {}, ignoring",
                self.path.display(),
                record.tenant_id
            );
            return Ok(None);
        }

        Ok(Some(record.last_seen))
    }

    async fn save(&self, cursor: Cursor) -> ClientResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::io(parent, e))?;
        }

        let record = CursorRecord {
            tenant_id: self.tenant_id.clone(),
            last_seen: cursor,
        };
        let body = serde_json::to_string(&record)?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| ClientError::io(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| ClientError::io(&self.path, e))?;

        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::io(&self.path, e)),
        }
    }
}
