use std::fs;
use std::io;
use std::path::PathBuf;


/// Refuse to load scripts past 1 MiB; anything bigger is almost certainly a
/// mistake, and the scanner wants the whole buffer in memory.
pub const MAX_SOURCE_LEN: u64 = 1 << 20;

#[derive(Debug, Clone)]
pub enum SourceType {
    String(String),
    File(PathBuf),
}

/// A named source of source code.
#[derive(Debug, Clone)]
pub struct ModuleSource {
    name: String,
    source: SourceType,
}

impl ModuleSource {
    pub fn new<S: ToString>(name: S, source: SourceType) -> Self {
        ModuleSource {
            name: name.to_string(),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loads the source text.
    pub fn source_text(&self) -> io::Result<String> {
        match &self.source {
            SourceType::String(string) => Ok(string.clone()),
            SourceType::File(path) => Self::read_source_file(path),
        }
    }

    fn read_source_file(path: &PathBuf) -> io::Result<String> {
        let meta = fs::metadata(path)?;
        if meta.len() > MAX_SOURCE_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "source file exceeds the maximum size",
            ));
        }

        fs::read_to_string(path)
    }
}
