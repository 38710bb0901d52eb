//! Location file handling.
//!
//! A location file is JSON, either a bare list of locations or an object
//! with a `locations` list:
//!
//! ```json
//! {
//!   "locations": [
//!     {
//!       "name": "museum",
//!       "baseUrl": "https://tiles.example.com/tours/museum",
//!       "panoramas": ["pano_01", "pano_02"],
//!       "version": 7
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location file errors.
#[derive(Debug, Error)]
pub enum LocationError {
    /// Failed to read the location file
    #[error("Failed to read location file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON or has the wrong shape
    #[error("Invalid location file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A location has neither `baseUrl` nor `baseurl`
    #[error("Location #{index} ('{name}') has no baseUrl")]
    MissingBaseUrl { index: usize, name: String },
}

/// One tile server location and the panoramas to fetch from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Name used for the output directory
    pub name: String,
    /// Base URL of the tile server, always ending in `/`
    pub base_url: String,
    /// Panorama ids to assemble, in order
    pub panoramas: Vec<String>,
    /// Cache-busting version token (may be empty)
    pub version: String,
}

impl Location {
    /// Creates a location, normalizing the base URL.
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        panoramas: Vec<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: ensure_slash(base_url),
            panoramas,
            version: version.into(),
        }
    }

    /// Query suffix appended to every tile URL of this location.
    pub fn version_suffix(&self) -> String {
        version_suffix(&self.version)
    }
}

/// Appends a trailing slash to `url` when it has none.
pub fn ensure_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Renders a version token as a URL query suffix.
///
/// Empty tokens yield no suffix; tokens that already start with `?` are used
/// verbatim; anything else becomes `?v={version}`.
pub fn version_suffix(version: &str) -> String {
    if version.is_empty() {
        String::new()
    } else if version.starts_with('?') {
        version.to_string()
    } else {
        format!("?v={}", version)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocationDocument {
    List(Vec<RawLocation>),
    Wrapped {
        #[serde(default)]
        locations: Vec<RawLocation>,
    },
}

#[derive(Deserialize)]
struct RawLocation {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    #[serde(rename = "baseurl")]
    base_url_lower: Option<String>,
    name: Option<String>,
    panoramas: Option<Vec<String>>,
    version: Option<Value>,
}

/// Parses the contents of a location file.
pub fn parse_locations(json: &str) -> Result<Vec<Location>, LocationError> {
    let raw = match serde_json::from_str::<LocationDocument>(json)? {
        LocationDocument::List(list) => list,
        LocationDocument::Wrapped { locations } => locations,
    };

    raw.into_iter()
        .enumerate()
        .map(|(index, loc)| {
            let name = loc
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("loc{}", index));

            let base_url = loc
                .base_url
                .filter(|u| !u.is_empty())
                .or(loc.base_url_lower.filter(|u| !u.is_empty()))
                .ok_or_else(|| LocationError::MissingBaseUrl {
                    index,
                    name: name.clone(),
                })?;

            Ok(Location::new(
                name,
                &base_url,
                loc.panoramas.unwrap_or_default(),
                version_token(loc.version.as_ref()),
            ))
        })
        .collect()
}

/// Loads and parses a location file.
pub fn load_locations(path: &Path) -> Result<Vec<Location>, LocationError> {
    let json = std::fs::read_to_string(path).map_err(|source| LocationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_locations(&json)
}

/// Falsy JSON values (null, "", 0, false) mean "no version".
fn version_token(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
