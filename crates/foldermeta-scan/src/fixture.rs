//! Scoped temporary marker trees for tests.
//!
//! A [`TempRepo`] owns a temporary directory that is removed when it is
//! dropped, on every exit path of the test using it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use foldermeta_core::Marker;

/// A temporary directory tree populated with marker files.
#[derive(Debug)]
pub struct TempRepo {
    dir: TempDir,
}

impl TempRepo {
    /// Create an empty temporary tree.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Create the sample tree: `test-repo` with a `backend` platform holding
    /// the `api-service` project.
    pub fn sample() -> io::Result<Self> {
        let repo = Self::new()?;
        repo.write_file(
            "",
            ".folder.repo",
            "type: repo\nname: test-repo\ndescription: Test repository",
        )?;
        repo.write_file(
            "backend",
            ".folder.platform",
            "type: platform\nname: backend\ndescription: Backend platform",
        )?;
        repo.write_file(
            "backend/api-service",
            ".folder.project",
            "type: project\n\
             name: api-service\n\
             language: python\n\
             version: 1.0.0\n\
             owner: backend-team\n\
             team: platform\n\
             lifecycle: production\n\
             tags: [api, microservice]\n",
        )?;
        Ok(repo)
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a directory (and its parents) relative to the root.
    pub fn mkdir(&self, rel: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = self.dir.path().join(rel);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write `marker` into the directory `rel`, named after its type.
    /// Returns the directory.
    pub fn add_marker(&self, rel: impl AsRef<Path>, marker: &Marker) -> io::Result<PathBuf> {
        let body = marker
            .render()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let dir = self.mkdir(rel)?;
        fs::write(dir.join(marker.node_type().marker_file_name()), body)?;
        Ok(dir)
    }

    /// Write an arbitrary file into the directory `rel`. Returns the file
    /// path.
    pub fn write_file(
        &self,
        rel: impl AsRef<Path>,
        file_name: &str,
        body: &str,
    ) -> io::Result<PathBuf> {
        let file = self.mkdir(rel)?.join(file_name);
        fs::write(&file, body)?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_layout() {
        let repo = TempRepo::sample().unwrap();
        let root = repo.path();

        assert!(root.join(".folder.repo").is_file());
        assert!(root.join("backend/.folder.platform").is_file());
        assert!(root.join("backend/api-service/.folder.project").is_file());
    }

    #[test]
    fn test_cleanup_on_drop() {
        let path = {
            let repo = TempRepo::sample().unwrap();
            repo.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_add_marker_names_file_by_type() {
        let repo = TempRepo::new().unwrap();
        let dir = repo.add_marker("web", &Marker::platform("web")).unwrap();

        let body = fs::read_to_string(dir.join(".folder.platform")).unwrap();
        assert_eq!(body, "type: platform\nname: web\n");
    }
}
