use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

pub const URL_PREFIX: &str = "/static";

const FILE_PREFIX: &str = "stock_graph_";
const FILE_SUFFIX: &str = ".png";

/// A chart image written for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub path: PathBuf,
    pub url: String,
}

/// Writes chart images into the static directory under request-unique names.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    retention: usize,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, retention: usize) -> Self {
        Self {
            dir: dir.into(),
            retention,
        }
    }

    pub async fn save(&self, png: &[u8]) -> Result<Artifact> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let file_name = format!("{}{}{}", FILE_PREFIX, Uuid::new_v4().simple(), FILE_SUFFIX);
        let path = self.dir.join(&file_name);

        fs::write(&path, png)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), bytes = png.len(), "chart written");

        if let Err(e) = self.prune(&file_name).await {
            warn!(error = ?e, "pruning old charts failed");
        }

        Ok(Artifact {
            url: format!("{}/{}", URL_PREFIX, file_name),
            file_name,
            path,
        })
    }

    /// Removes the oldest charts beyond the retention limit, never `keep`.
    async fn prune(&self, keep: &str) -> Result<usize> {
        if self.retention == 0 {
            return Ok(0);
        }

        let mut charts: Vec<(SystemTime, PathBuf)> = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name == keep || !is_chart(name) {
                continue;
            }

            let path = entry.path();
            // another request pruned it first
            let Some(modified) = modified_time(&path).await? else { continue };
            charts.push((modified, path));
        }

        // `keep` takes one of the retained slots
        if charts.len() < self.retention {
            return Ok(0);
        }

        charts.sort_by(|a, b| b.0.cmp(&a.0));

        let mut removed = 0;
        for (_, path) in charts.into_iter().skip(self.retention - 1) {
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                // another request pruned it first
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!(removed, "pruned old charts");
        Ok(removed)
    }
}

/// Last modification time, `None` once the file is gone.
async fn modified_time(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta.modified()?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_chart(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}
