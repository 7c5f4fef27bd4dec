//! [`FileStore`], the flat-file implementation of [`StudentStore`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use tokio::{io::AsyncWriteExt as _, sync::RwLock};

use roster_core::{
  store::StudentStore,
  student::{NewStudent, Statistics, Student, StudentId, StudentPatch},
};

use crate::{
  Error, Result,
  encode::{decode_table, encode_table},
  table::Table,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster student store backed by a single JSON Lines file.
///
/// Cloning is cheap; the table and its lock are reference-counted.
#[derive(Clone)]
pub struct FileStore {
  inner: Arc<Inner>,
}

struct Inner {
  path:  PathBuf,
  /// Writers hold the guard across the flush so a mutation and its snapshot
  /// are one critical section.
  table: RwLock<Table>,
}

impl FileStore {
  /// Open the store at `path`, creating an empty file (and its parent
  /// directories) if none exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    let table = match tokio::fs::read_to_string(&path).await {
      Ok(text) => {
        let rows = decode_table(&path, &text)?;
        Table::from_rows(rows).map_err(|id| Error::DuplicateId {
          path: path.clone(),
          id,
        })?
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        tracing::info!(path = %path.display(), "creating new student table");
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
          tokio::fs::create_dir_all(dir).await?;
        }
        let table = Table::default();
        write_snapshot(&path, &table).await?;
        table
      }
      Err(e) => return Err(e.into()),
    };

    tracing::info!(
      path = %path.display(),
      records = table.len(),
      "student table loaded"
    );

    Ok(Self {
      inner: Arc::new(Inner {
        path,
        table: RwLock::new(table),
      }),
    })
  }

  /// Path of the backing file.
  pub fn path(&self) -> &Path { &self.inner.path }

  async fn flush(&self, table: &Table) -> Result<()> {
    write_snapshot(&self.inner.path, table).await.inspect_err(|e| {
      tracing::error!(
        path = %self.inner.path.display(),
        error = %e,
        "flush failed; in-memory table is ahead of disk"
      );
    })
  }
}

/// Replace the file at `path` with a full snapshot of `table`.
///
/// The snapshot goes to a sibling temp file which is synced and then renamed
/// over `path`, so readers of the file only ever see a complete table.
async fn write_snapshot(path: &Path, table: &Table) -> Result<()> {
  let bytes = encode_table(table.rows())?;
  let tmp = temp_path(path);

  if let Err(e) = replace_with(&tmp, path, &bytes).await {
    // Best effort; the original error is the one worth reporting.
    let _ = tokio::fs::remove_file(&tmp).await;
    return Err(e.into());
  }
  tracing::debug!(path = %path.display(), records = table.len(), "snapshot written");
  Ok(())
}

async fn replace_with(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
  let mut file = tokio::fs::File::create(tmp).await?;
  file.write_all(bytes).await?;
  file.sync_all().await?;
  drop(file);
  tokio::fs::rename(tmp, path).await
}

fn temp_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}

// ─── StudentStore impl ───────────────────────────────────────────────────────

impl StudentStore for FileStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Student>> {
    Ok(self.inner.table.read().await.page(skip, limit))
  }

  async fn get(&self, id: StudentId) -> Result<Option<Student>> {
    Ok(self.inner.table.read().await.get(id).cloned())
  }

  async fn get_by_code(&self, code: &str) -> Result<Option<Student>> {
    Ok(self.inner.table.read().await.get_by_code(code).cloned())
  }

  async fn search(&self, keyword: Option<&str>) -> Result<Vec<Student>> {
    Ok(self.inner.table.read().await.search(keyword))
  }

  async fn statistics(&self) -> Result<Statistics> {
    Ok(self.inner.table.read().await.statistics())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, input: NewStudent) -> Result<Student> {
    let mut table = self.inner.table.write().await;
    let student = table.insert(input)?;
    self.flush(&table).await?;

    tracing::info!(id = student.id, code = %student.code, "student created");
    Ok(student)
  }

  async fn update(&self, id: StudentId, patch: StudentPatch) -> Result<Option<Student>> {
    let mut table = self.inner.table.write().await;
    let Some(student) = table.update(id, patch)? else {
      return Ok(None);
    };
    self.flush(&table).await?;

    tracing::info!(id, "student updated");
    Ok(Some(student))
  }

  async fn delete(&self, id: StudentId) -> Result<bool> {
    let mut table = self.inner.table.write().await;
    if !table.remove(id) {
      return Ok(false);
    }
    self.flush(&table).await?;

    tracing::info!(id, "student deleted");
    Ok(true)
  }
}
