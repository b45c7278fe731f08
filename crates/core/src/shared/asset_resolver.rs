use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetResolveError {
    #[error("configured asset not found: {0}")]
    Missing(PathBuf),
    #[error("asset {0} not found locally and downloads are disabled")]
    NotFound(String),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write asset to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where to look for a named asset (fonts today) before downloading it.
pub struct AssetLookup<'a> {
    pub name: &'a str,
    pub url: &'a str,
    /// Used as-is when set; never falls through to the other locations.
    pub explicit_path: Option<&'a Path>,
    pub search_dirs: &'a [PathBuf],
    pub allow_download: bool,
}

/// Resolve an asset file, checking local locations before downloading.
///
/// Resolution order:
/// 1. Explicit path (error if it does not exist)
/// 2. User cache directory
/// 3. Search directories (system font folders, bundled assets)
/// 4. Download from URL into the cache, when `allow_download` is set
pub fn resolve(
    lookup: &AssetLookup<'_>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, AssetResolveError> {
    if let Some(path) = lookup.explicit_path {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(AssetResolveError::Missing(path.to_path_buf()))
        };
    }

    let cache_dir = asset_cache_dir()?;
    if let Some(found) = find_local(lookup.name, &cache_dir, lookup.search_dirs) {
        return Ok(found);
    }
    if !lookup.allow_download {
        return Err(AssetResolveError::NotFound(lookup.name.to_string()));
    }

    fs::create_dir_all(&cache_dir).map_err(AssetResolveError::CacheDir)?;
    let cached_path = cache_dir.join(lookup.name);
    download(lookup.url, &cached_path, progress)?;
    Ok(cached_path)
}

fn find_local(name: &str, cache_dir: &Path, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    std::iter::once(cache_dir)
        .chain(search_dirs.iter().map(PathBuf::as_path))
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Platform-specific asset cache directory.
///
/// - macOS: `~/Library/Application Support/Shorts Video/assets/`
/// - Linux: `$XDG_CACHE_HOME/Shorts Video/assets/` or `~/.cache/Shorts Video/assets/`
/// - Windows: `%LOCALAPPDATA%/Shorts Video/assets/`
pub fn asset_cache_dir() -> Result<PathBuf, AssetResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Shorts Video").join("assets"))
            .ok_or(AssetResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Shorts Video").join("assets"))
            .ok_or(AssetResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), AssetResolveError> {
    let download_error = |e: reqwest::Error| AssetResolveError::Download {
        url: url.to_string(),
        source: e,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_error)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_error)?;

    // Write next to the destination first so a failed download never
    // leaves a truncated asset behind.
    let temp_path = dest.with_extension("part");
    let write_error = |path: &Path, e: std::io::Error| AssetResolveError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(|e| write_error(&temp_path, e))?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(256 * 1024) {
        file.write_all(chunk)
            .map_err(|e| write_error(&temp_path, e))?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(|e| write_error(&temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| write_error(dest, e))?;
    Ok(())
}
