//! Pattern index persistence
//!
//! Building the index from a large dictionary is slow, so it is cached to
//! disk as JSON. Writes go to a temp file and are renamed into place;
//! readers never see a partial file. Concurrent writers must be serialized
//! by the caller.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::pattern::PatternIndex;
use crate::Result;

const FORMAT_VERSION: u32 = 2;

/// Serializable cache contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    /// Version for migration support
    pub version: u32,

    /// Word list the index was built from, if any
    pub source: Option<SourceStamp>,

    pub index: PatternIndex,
}

/// Identity of a word list at the time an index was built from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStamp {
    pub path: String,
    pub len: u64,
    /// Modification time, nanoseconds since the Unix epoch
    pub modified_nanos: u64,
}

impl SourceStamp {
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let modified_nanos = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
        Ok(Self {
            path: path.display().to_string(),
            len: metadata.len(),
            modified_nanos,
        })
    }
}

pub struct PatternIndexStore {
    path: PathBuf,
}

impl PatternIndexStore {
    /// Store at `<cache dir>/sleuth/pattern_index.json`
    pub fn default_location() -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sleuth");

        std::fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            path: cache_dir.join("pattern_index.json"),
        })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Cached file, or `None` when nothing has been saved yet
    pub fn read(&self) -> Result<Option<IndexFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn load(&self) -> Result<Option<PatternIndex>> {
        Ok(self.read()?.map(|file| file.index))
    }

    /// Write the index, stamping it with the current state of `source`
    pub fn save(&self, index: &PatternIndex, source: Option<&Path>) -> Result<()> {
        let file = IndexFile {
            version: FORMAT_VERSION,
            source: source.map(SourceStamp::of).transpose()?,
            index: index.clone(),
        };
        let content = serde_json::to_string(&file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Cached index for `wordlist`, rebuilt when the cache is missing, was
    /// built from another list, or the list changed size or mtime since.
    ///
    /// A cache whose word list no longer exists is served as is.
    pub fn load_or_build(&self, wordlist: &Path, uncountable_marker: char) -> Result<PatternIndex> {
        let cached = self
            .read()?
            .filter(|file| file.version == FORMAT_VERSION)
            .and_then(|file| file.source.map(|stamp| (stamp, file.index)));

        if let Some((stamp, index)) = cached {
            if stamp.path == wordlist.display().to_string() {
                if !wordlist.exists() {
                    warn!(path = %wordlist.display(), "word list missing, serving cached pattern index");
                    return Ok(index);
                }
                if SourceStamp::of(wordlist)? == stamp {
                    info!(path = %self.path.display(), words = index.word_count(), "pattern index loaded");
                    return Ok(index);
                }
                info!(path = %wordlist.display(), "word list changed since the index was built");
            }
        }

        let index = load_wordlist(wordlist, uncountable_marker)?;
        self.save(&index, Some(wordlist))?;
        info!(path = %self.path.display(), words = index.word_count(), "pattern index rebuilt");
        Ok(index)
    }

    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Build an index from a word list with one word per line
pub fn load_wordlist(path: &Path, uncountable_marker: char) -> Result<PatternIndex> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    Ok(PatternIndex::from_words(lines, uncountable_marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::UNCOUNTABLE_MARKER;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = PatternIndexStore::at_path(dir.path().join("index.json"));
        assert!(store.load().unwrap().is_none());

        let index = PatternIndex::from_words(["that", "high", "noon", "it's"], UNCOUNTABLE_MARKER);
        store.save(&index, None).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(index));
    }

    #[test]
    fn test_load_or_build_uses_cache() {
        let dir = tempdir().unwrap();
        let wordlist = dir.path().join("words.txt");
        std::fs::write(&wordlist, "that\nhigh\nrice%\n\nnoon\n").unwrap();
        let store = PatternIndexStore::at_path(dir.path().join("cache").join("index.json"));

        let built = store.load_or_build(&wordlist, UNCOUNTABLE_MARKER).unwrap();
        assert_eq!(built.word_count(), 3);
        assert!(store.exists());

        // without its word list the cached index is still served
        std::fs::remove_file(&wordlist).unwrap();
        let cached = store.load_or_build(&wordlist, UNCOUNTABLE_MARKER).unwrap();
        assert_eq!(cached, built);
    }

    #[test]
    fn test_edited_wordlist_rebuilds() {
        let dir = tempdir().unwrap();
        let wordlist = dir.path().join("words.txt");
        std::fs::write(&wordlist, "that\n").unwrap();
        let store = PatternIndexStore::at_path(dir.path().join("index.json"));

        let first = store.load_or_build(&wordlist, UNCOUNTABLE_MARKER).unwrap();
        assert_eq!(first.words_for("ABCA"), &["that".to_string()]);

        std::fs::write(&wordlist, "that\nhigh\n").unwrap();
        let second = store.load_or_build(&wordlist, UNCOUNTABLE_MARKER).unwrap();
        let mut abca = second.words_for("ABCA").to_vec();
        abca.sort();
        assert_eq!(abca, vec!["high", "that"]);

        let stamp = store.read().unwrap().unwrap().source.unwrap();
        assert_eq!(stamp, SourceStamp::of(&wordlist).unwrap());
        assert_eq!(stamp.len, 10);
    }

    #[test]
    fn test_other_source_rebuilds() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        std::fs::write(&first, "that\n").unwrap();
        std::fs::write(&second, "noon\nsees\n").unwrap();
        let store = PatternIndexStore::at_path(dir.path().join("index.json"));

        store.load_or_build(&first, UNCOUNTABLE_MARKER).unwrap();
        let rebuilt = store.load_or_build(&second, UNCOUNTABLE_MARKER).unwrap();
        assert_eq!(rebuilt.words_for("ABBA").len(), 2);
        assert!(rebuilt.words_for("ABCA").is_empty());
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let store = PatternIndexStore::at_path(dir.path().join("index.json"));
        store.save(&PatternIndex::new(), None).unwrap();
        store.delete().unwrap();
        assert!(!store.exists());
    }
}
