//! Employee Repository
//!
//! Local fallback store for employee lists, keyed by company. The pipeline
//! only sees the `EmployeeRepository` trait; the backing store is chosen by
//! the caller:
//!
//! - `InMemoryRepository` for tests and one-shot runs
//! - `JsonFileRepository` for a per-company JSON file under a data directory

use crate::employee::EmployeeRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Errors from the local employee store
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for a company's employee list
pub trait EmployeeRepository: Send + Sync {
    /// All stored employees for a company (empty if none)
    fn list(&self, company_id: &str) -> RepositoryResult<Vec<EmployeeRecord>>;

    /// Replace the stored list for a company
    fn save(&self, company_id: &str, employees: &[EmployeeRecord]) -> RepositoryResult<()>;

    /// Append employees to the stored list
    fn append(&self, company_id: &str, employees: &[EmployeeRecord]) -> RepositoryResult<()> {
        let mut list = self.list(company_id)?;
        list.extend_from_slice(employees);
        self.save(company_id, &list)
    }
}

/// Process-local repository
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    companies: RwLock<HashMap<String, Vec<EmployeeRecord>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmployeeRepository for InMemoryRepository {
    fn list(&self, company_id: &str) -> RepositoryResult<Vec<EmployeeRecord>> {
        let companies = self
            .companies
            .read()
            .map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(companies.get(company_id).cloned().unwrap_or_default())
    }

    fn save(&self, company_id: &str, employees: &[EmployeeRecord]) -> RepositoryResult<()> {
        let mut companies = self
            .companies
            .write()
            .map_err(|e| RepositoryError::Lock(e.to_string()))?;
        companies.insert(company_id.to_string(), employees.to_vec());
        Ok(())
    }
}

/// One JSON file per company: `<dir>/employees_<company>.json`
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository rooted at `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, company_id: &str) -> PathBuf {
        let safe: String = company_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("employees_{}.json", safe))
    }
}

impl EmployeeRepository for JsonFileRepository {
    fn list(&self, company_id: &str) -> RepositoryResult<Vec<EmployeeRecord>> {
        let path = self.file_for(company_id);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, company_id: &str, employees: &[EmployeeRecord]) -> RepositoryResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_for(company_id);

        // Write then rename so a crash never leaves a truncated file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(employees)?)?;
        std::fs::rename(&tmp, &path)?;

        tracing::debug!(path = %path.display(), count = employees.len(), "Saved employee list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.list("acme").unwrap().is_empty());

        repo.save("acme", &[EmployeeRecord::new("A", "B", "a@b.co")]).unwrap();
        repo.append("acme", &[EmployeeRecord::new("C", "D", "c@d.co")]).unwrap();

        let list = repo.list("acme").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].email, "c@d.co");
        assert!(repo.list("other").unwrap().is_empty());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("store"));

        assert!(repo.list("acme/1").unwrap().is_empty());

        let employees = vec![EmployeeRecord::new("A", "B", "a@b.co").department("HR")];
        repo.save("acme/1", &employees).unwrap();

        assert!(dir.path().join("store").join("employees_acme_1.json").exists());
        assert_eq!(repo.list("acme/1").unwrap(), employees);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("employees_acme.json"), "not json").unwrap();

        let repo = JsonFileRepository::new(dir.path());
        assert!(matches!(
            repo.list("acme"),
            Err(RepositoryError::Serialization(_))
        ));
    }
}
