use std::fs;
use std::path::{Path, PathBuf};

use super::codec::parse;
use super::error::LoadError;
use super::types::TwoLineElement;

/// An element set together with the name it was published under.
#[derive(Debug, Clone)]
pub struct NamedTle {
    pub name: String,
    pub tle: TwoLineElement,
    pub source: String,
}

pub struct TleLoader {
    paths: Vec<PathBuf>,
    satellites: Vec<NamedTle>,
}

impl TleLoader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            satellites: Vec::new(),
        }
    }

    /// Load every configured file, or every `.tle`/`.txt` file of a configured
    /// directory. Unparseable files are logged and skipped.
    pub fn load_all(&mut self) -> Result<(), LoadError> {
        self.satellites.clear();

        for path in self.paths.clone() {
            if !path.exists() {
                return Err(LoadError::NotFound(path.display().to_string()));
            }
            let files = if path.is_dir() {
                let mut files = Vec::new();
                for entry in fs::read_dir(&path)? {
                    let file = entry?.path();
                    if file.is_file() && has_tle_extension(&file) {
                        files.push(file);
                    }
                }
                files.sort();
                files
            } else {
                vec![path]
            };

            for file in files {
                match parse_tle_file(&file) {
                    Ok(entries) => self.satellites.extend(entries),
                    Err(e) => {
                        log::warn!("Failed to parse TLE file {}: {}", file.display(), e);
                    }
                }
            }
        }

        log::info!("Loaded {} element sets", self.satellites.len());
        Ok(())
    }

    pub fn satellites(&self) -> &[NamedTle] {
        &self.satellites
    }

    pub fn into_satellites(self) -> Vec<NamedTle> {
        self.satellites
    }
}

fn has_tle_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "tle" || ext == "txt")
        .unwrap_or(false)
}

/// Parse a single TLE file (may contain multiple satellites).
fn parse_tle_file(path: &Path) -> Result<Vec<NamedTle>, LoadError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    parse_multi_tle(&content)
        .into_iter()
        .map(|(name, line1, line2)| {
            let tle = parse(&line1, &line2).map_err(|source| LoadError::InvalidTle {
                file: filename.clone(),
                source,
            })?;
            Ok(NamedTle {
                name: name.unwrap_or_else(|| format!("NORAD {}", tle.catalog_number)),
                tle,
                source: filename.clone(),
            })
        })
        .collect()
}

/// Split text into `(name, line1, line2)` entries. Both the bare 2-line and
/// the named 3-line layouts are accepted; anything else is skipped.
///
/// Any line that is not itself a line 1 or line 2 and directly precedes a
/// complete pair is read as that pair's name.
pub fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && !is_element_line(lines[i])
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            let name = lines[i].trim_start_matches("0 ").to_string();
            result.push((Some(name), lines[i + 1].to_string(), lines[i + 2].to_string()));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

fn is_element_line(line: &str) -> bool {
    line.starts_with("1 ") || line.starts_with("2 ")
}
