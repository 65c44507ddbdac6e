use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::PairError;

// @module: Word pair loading and the JSON pair cache

/// A single flashcard: the text shown on the front and the text on the back.
///
/// Serialized as a two-element array `[front, back]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Pair {
    pub front: String,
    pub back: String,
}

impl Pair {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

impl From<(String, String)> for Pair {
    fn from((front, back): (String, String)) -> Self {
        Self { front, back }
    }
}

impl From<Pair> for (String, String) {
    fn from(pair: Pair) -> Self {
        (pair.front, pair.back)
    }
}

/// Ordered, immutable list of pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairList {
    pairs: Vec<Pair>,
}

impl PairList {
    /// Zip two lists positionally, trimming every entry.
    ///
    /// The result is as long as the shorter list; extra entries in the longer
    /// list are dropped.
    pub fn zip_trimmed<F, B>(fronts: F, backs: B) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let pairs = fronts
            .into_iter()
            .zip(backs)
            .map(|(front, back)| Pair::new(front.as_ref().trim(), back.as_ref().trim()))
            .collect();
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }

    /// Render as a JSON array of `[front, back]` arrays with four-space indentation.
    /// Non-ASCII text is written literally.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl From<Vec<Pair>> for PairList {
    fn from(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }
}

impl<'a> IntoIterator for &'a PairList {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Shape of the input document. A missing key reads as an empty list.
#[derive(Debug, Deserialize)]
struct CardSource {
    #[serde(rename = "Front", default)]
    front: Vec<String>,
    #[serde(rename = "Back", default)]
    back: Vec<String>,
}

/// Parse YAML text with top-level `Front` and `Back` string lists into pairs.
///
/// Returns the parser's message on failure; callers attach the path.
pub fn parse_pairs(yaml: &str) -> Result<PairList, String> {
    if yaml.trim().is_empty() {
        return Err("document is empty".to_string());
    }

    let source: CardSource = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    if source.front.len() != source.back.len() {
        debug!(
            "Front has {} entries and Back has {}; keeping the first {}",
            source.front.len(),
            source.back.len(),
            source.front.len().min(source.back.len())
        );
    }

    Ok(PairList::zip_trimmed(source.front, source.back))
}

/// Load pairs from the YAML input file and overwrite the cache file with them.
pub fn load_pairs<P1: AsRef<Path>, P2: AsRef<Path>>(
    input_path: P1,
    cache_path: P2,
) -> Result<PairList, PairError> {
    let input_path = input_path.as_ref();

    let content = fs::read_to_string(input_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PairError::InputNotFound(input_path.to_path_buf()),
        _ => PairError::InputRead {
            path: input_path.to_path_buf(),
            source: e,
        },
    })?;

    let pairs = parse_pairs(&content).map_err(|message| PairError::InputMalformed {
        path: input_path.to_path_buf(),
        message,
    })?;

    write_cache(&pairs, cache_path)?;
    Ok(pairs)
}

/// Write the pair list to the cache file, replacing whatever was there.
pub fn write_cache<P: AsRef<Path>>(pairs: &PairList, cache_path: P) -> Result<(), PairError> {
    let cache_path = cache_path.as_ref();
    let cache_error = |message: String| PairError::CacheWrite {
        path: cache_path.to_path_buf(),
        message,
    };

    let json = pairs.to_pretty_json().map_err(|e| cache_error(e.to_string()))?;

    if let Some(parent) = cache_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| cache_error(e.to_string()))?;
        }
    }

    fs::write(cache_path, json).map_err(|e| cache_error(e.to_string()))?;
    info!("💾 Cached {} pairs to {}", pairs.len(), cache_path.display());
    Ok(())
}

/// Read a previously written cache file.
pub fn read_cache<P: AsRef<Path>>(cache_path: P) -> Result<PairList, PairError> {
    let cache_path = cache_path.as_ref();
    let cache_error = |message: String| PairError::CacheRead {
        path: cache_path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(cache_path).map_err(|e| cache_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| cache_error(e.to_string()))
}
