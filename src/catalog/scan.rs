use std::path::Path;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::CatalogSettings;
use crate::session::format_time;

use super::model::{Catalog, CatalogError, Track};

const COVER_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];
const UNKNOWN_ARTIST: &str = "Unknown artist";

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Path relative to the scanned root, with `/` separators. Used as both the
/// track id and its source locator.
fn relative_locator(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn find_cover(root: &Path, path: &Path) -> Option<String> {
    let dir = path.parent()?;
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|cover| relative_locator(root, &cover))
}

/// Build a catalog from the audio files under `dir`.
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist = UNKNOWN_ARTIST.to_string();
        let mut display_duration: Option<String> = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                let secs = tagged.properties().duration().as_secs_f64();
                if secs > 0.0 {
                    display_duration = Some(format_time(secs));
                }

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                        title = v.trim().to_string();
                    }
                    if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                        artist = v.trim().to_string();
                    }
                }
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "no readable tags");
            }
        }

        let locator = relative_locator(dir, path);
        tracks.push(Track {
            id: locator.clone(),
            title,
            artist,
            source: locator,
            cover: find_cover(dir, path),
            display_duration,
        });
    }

    tracks.sort_by_key(|t| format!("{} - {}", t.artist, t.title).to_lowercase());
    Catalog::new(tracks)
}
