use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;

// @module: Subtitle parsing and serialization

// @const: Boundary of one or more blank (whitespace-only) lines
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

// @struct: Single subtitle block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    // @field: Sequence line, kept verbatim
    pub index: String,

    // @field: Time range line, kept verbatim
    pub timestamp: String,

    // @field: Caption lines in display order
    pub lines: Vec<String>,
}

impl SubtitleBlock {
    /// Creates a new subtitle block
    pub fn new(index: impl Into<String>, timestamp: impl Into<String>, lines: Vec<String>) -> Self {
        SubtitleBlock {
            index: index.into(),
            timestamp: timestamp.into(),
            lines,
        }
    }

    // @returns: Caption text with lines joined by '\n'
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    // @replaces: Caption lines with the non-blank lines of `text`
    // A blank line inside a block would read back as a block boundary
    pub fn set_text(&mut self, text: &str) {
        self.lines = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
    }

    /// True when the block carries no caption text to translate
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // @parses: One blank-line-delimited segment, None if degenerate
    fn from_segment(segment: &str) -> Option<Self> {
        let mut lines = segment.lines();
        let index = lines.next()?.trim();
        let timestamp = lines.next()?.trim();
        let text_lines = lines
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
            .collect();

        Some(SubtitleBlock::new(index, timestamp, text_lines))
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.timestamp)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Collection of subtitle blocks with the file they came from
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Blocks in file order
    pub blocks: Vec<SubtitleBlock>,
}

impl SubtitleCollection {
    /// Create a new, empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            blocks: Vec::new(),
        }
    }

    /// Read and parse a subtitle file.
    ///
    /// Fails with `SubtitleError::Decode` when the file cannot be read
    /// or is not valid UTF-8.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let decode_error = |reason: String| SubtitleError::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| decode_error(e.to_string()))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| decode_error(format!("invalid UTF-8: {}", e)))?;

        let blocks = Self::parse_srt_string(&content);
        debug!("Parsed {} subtitle blocks from {}", blocks.len(), path.display());

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            blocks,
        })
    }

    /// Parse subtitle content into blocks.
    ///
    /// Segments are separated by one or more blank lines. A segment with
    /// fewer than two lines has no room for an index and a timestamp and
    /// is dropped without error.
    pub fn parse_srt_string(content: &str) -> Vec<SubtitleBlock> {
        let content = content.trim();
        if content.is_empty() {
            return Vec::new();
        }

        BLOCK_SEPARATOR
            .split(content)
            .filter_map(|segment| {
                let block = SubtitleBlock::from_segment(segment);
                if block.is_none() {
                    debug!("Dropping degenerate subtitle segment: {:?}", segment);
                }
                block
            })
            .collect()
    }

    /// Serialize all blocks, one blank line between blocks and none after the last
    pub fn to_srt_string(&self) -> String {
        Self::format_blocks(&self.blocks)
    }

    /// Serialize a slice of blocks
    pub fn format_blocks(blocks: &[SubtitleBlock]) -> String {
        blocks
            .iter()
            .map(|block| block.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write subtitles to an SRT file.
    ///
    /// The whole document is rendered in memory and then written atomically,
    /// so an existing file at `path` survives a failed write.
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let content = self.to_srt_string();

        FileManager::write_atomic(path, &content).map_err(|e| SubtitleError::Encode {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when no block survived parsing
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
