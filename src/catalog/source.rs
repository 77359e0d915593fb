use std::path::{Path, PathBuf};

/// Where a track's audio bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A URL; left to the media backend to accept or reject.
    Remote(String),
    File(PathBuf),
}

/// Resolves catalog `source` strings into concrete locators.
///
/// Root-relative locators (`/music/a.wav`) join `media_root` when one is
/// configured, other relative locators join the catalog's `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    pub media_root: Option<PathBuf>,
    pub base_dir: Option<PathBuf>,
}

impl SourceResolver {
    pub fn resolve(&self, locator: &str) -> Locator {
        let locator = locator.trim();
        if locator.contains("://") {
            return Locator::Remote(locator.to_string());
        }

        let path = Path::new(locator);
        if let Some(rest) = locator.strip_prefix('/') {
            if let Some(root) = &self.media_root {
                return Locator::File(root.join(rest));
            }
            return Locator::File(path.to_path_buf());
        }

        match &self.base_dir {
            Some(dir) => Locator::File(dir.join(path)),
            None => Locator::File(path.to_path_buf()),
        }
    }
}

/// Public link to a track's own screen.
pub fn share_url(base: &str, id: &str) -> String {
    format!("{}/music/{}", base.trim_end_matches('/'), id)
}
