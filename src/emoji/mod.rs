//! Emoji catalog
//!
//! Maps literal emoji character sequences to image assets and tokenizes text
//! into emoji and plain-text chunks. Asset filenames encode Unicode code
//! points as hex (hyphen/space separated, optional "U+" prefix), e.g.
//! `U+2764 U+FE0F U+200D U+1F525.png` for a ZWJ sequence.
//!
//! Matching is greedy longest-first so multi-codepoint sequences win over
//! their prefixes. Decoded glyph images are memoized per catalog instance.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;
use log::{debug, info, warn};

use crate::error::{Error, Result};

/// One piece of tokenized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Plain text between emoji
    Text(String),
    /// An exact catalog key
    Emoji(String),
}

impl Chunk {
    pub fn is_emoji(&self) -> bool {
        matches!(self, Chunk::Emoji(_))
    }

    pub fn content(&self) -> &str {
        match self {
            Chunk::Text(s) | Chunk::Emoji(s) => s,
        }
    }
}

/// Emoji sequence -> asset table with a greedy tokenizer.
#[derive(Debug)]
pub struct EmojiCatalog {
    /// Literal emoji string -> asset path
    table: HashMap<String, PathBuf>,
    /// Keys sorted by descending character count, so ZWJ/variation
    /// sequences match before any of their prefixes
    keys_longest_first: Vec<String>,
    /// Decoded glyph cache, filled on first use
    cache: RefCell<HashMap<String, Rc<RgbaImage>>>,
}

impl EmojiCatalog {
    /// Scan a directory of PNG assets.
    ///
    /// Fails if the directory is unreadable; individual filenames that do not
    /// decode as code-point sequences are skipped.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| Error::CatalogLoad {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut table = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match decode_stem(stem) {
                Some(key) => {
                    table.insert(key, path);
                }
                None => debug!("skipping emoji asset with malformed name: {:?}", path),
            }
        }

        info!("emoji catalog loaded: {} sequences from {:?}", table.len(), dir);
        Ok(Self::from_table(table))
    }

    /// Catalog with no entries; tokenize yields plain text only.
    pub fn empty() -> Self {
        Self::from_table(HashMap::new())
    }

    fn from_table(table: HashMap<String, PathBuf>) -> Self {
        let mut keys: Vec<String> = table.keys().cloned().collect();
        keys.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        Self {
            table,
            keys_longest_first: keys,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Whether the candidate is an exact catalog key
    pub fn contains(&self, candidate: &str) -> bool {
        self.table.contains_key(candidate)
    }

    /// Asset path for an exact catalog key
    pub fn lookup(&self, candidate: &str) -> Option<&Path> {
        self.table.get(candidate).map(|p| p.as_path())
    }

    /// Split text into emoji and plain-text chunks, longest sequences first.
    /// Empty pieces are never produced.
    pub fn tokenize(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut rest = text;

        'scan: while !rest.is_empty() {
            for key in &self.keys_longest_first {
                if rest.starts_with(key.as_str()) {
                    if !current.is_empty() {
                        chunks.push(Chunk::Text(std::mem::take(&mut current)));
                    }
                    chunks.push(Chunk::Emoji(key.clone()));
                    rest = &rest[key.len()..];
                    continue 'scan;
                }
            }
            let c = rest.chars().next().unwrap();
            current.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if !current.is_empty() {
            chunks.push(Chunk::Text(current));
        }
        chunks
    }

    /// Number of catalog sequences embedded in the text
    pub fn emoji_count(&self, text: &str) -> usize {
        self.tokenize(text).iter().filter(|c| c.is_emoji()).count()
    }

    /// Decode the glyph image for a catalog key, memoized.
    pub fn image(&self, key: &str) -> Option<Rc<RgbaImage>> {
        if let Some(img) = self.cache.borrow().get(key) {
            return Some(Rc::clone(img));
        }
        let path = self.table.get(key)?;
        let img = match image::open(path) {
            Ok(img) => Rc::new(img.to_rgba8()),
            Err(e) => {
                warn!("failed to decode emoji asset {:?}: {}", path, e);
                return None;
            }
        };
        self.cache
            .borrow_mut()
            .insert(key.to_string(), Rc::clone(&img));
        Some(img)
    }
}

/// Decode an asset file stem into the literal emoji string it names.
/// Accepts hex code points separated by hyphens or spaces, each with an
/// optional "U+" prefix.
fn decode_stem(stem: &str) -> Option<String> {
    let mut out = String::new();
    for part in stem.split(|c: char| c == '-' || c == ' ') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let hex = part.strip_prefix("U+").unwrap_or(part);
        let cp = u32::from_str_radix(hex, 16).ok()?;
        out.push(char::from_u32(cp)?);
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
