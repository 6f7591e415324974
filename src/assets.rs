use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const ROM_SCHEME: &str = "rom:/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset uri '{0}' does not start with rom:/")]
    UnknownScheme(String),
    #[error("asset uri '{0}' has no path")]
    EmptyPath(String),
    #[error("asset uri '{0}' escapes the asset store")]
    Escapes(String),
}

/// Read-only packaged assets addressed as `rom:/<path>`
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a `rom:/` uri to a file below the store root
    pub fn resolve(&self, uri: &str) -> Result<PathBuf, AssetError> {
        let relative = uri
            .strip_prefix(ROM_SCHEME)
            .ok_or_else(|| AssetError::UnknownScheme(uri.to_string()))?;
        if relative.is_empty() {
            return Err(AssetError::EmptyPath(uri.to_string()));
        }

        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AssetError::Escapes(uri.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_below_root() {
        let store = AssetStore::new("assets");
        assert_eq!(
            store.resolve("rom:/f40.obj").unwrap(),
            Path::new("assets").join("f40.obj")
        );
        assert_eq!(
            store.resolve("rom:/cars/m1.obj").unwrap(),
            Path::new("assets").join("cars").join("m1.obj")
        );
    }

    #[test]
    fn rejects_other_schemes() {
        let store = AssetStore::new("assets");
        assert_eq!(
            store.resolve("f40.obj"),
            Err(AssetError::UnknownScheme("f40.obj".into()))
        );
        assert!(store.resolve("file:/f40.obj").is_err());
    }

    #[test]
    fn rejects_empty_and_escaping_paths() {
        let store = AssetStore::new("assets");
        assert_eq!(
            store.resolve("rom:/"),
            Err(AssetError::EmptyPath("rom:/".into()))
        );
        assert_eq!(
            store.resolve("rom:/../secret"),
            Err(AssetError::Escapes("rom:/../secret".into()))
        );
        assert!(store.resolve("rom://etc/passwd").is_err());
    }
}
