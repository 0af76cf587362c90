//! Finding and decoding data files.
//!
//! A data file is looked up by base name as `{base}.ron`, `{base}.toml` or
//! `{base}.json`; at most one of them may exist.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use tracing::debug;
use turing_core::level::{LevelDef, LevelError, LevelSet};

pub const LEVELS_FILE: &str = "levels";

/// TOML has no top-level arrays, so level files keep theirs under this key.
const TOML_LEVELS_KEY: &str = "levels";

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no {base}.ron, {base}.toml or {base}.json in {dir}")]
    Missing { base: String, dir: PathBuf },

    #[error("both {first} and {second} exist")]
    Conflict { first: PathBuf, second: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("invalid level data in {file}: {source}")]
    InvalidLevels { file: PathBuf, source: LevelError },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// A located data file and the format its extension names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub path: PathBuf,
    pub format: Format,
}

impl DataFile {
    /// The single `{base}.*` file in `dir`, if there is one.
    pub fn find(dir: &Path, base: &str) -> Result<Option<Self>, DataLoadError> {
        let mut found: Option<Self> = None;
        for format in Format::ALL {
            let path = dir.join(format!("{base}.{}", format.extension()));
            if !path.exists() {
                continue;
            }
            if let Some(first) = found {
                return Err(DataLoadError::Conflict {
                    first: first.path,
                    second: path,
                });
            }
            found = Some(Self { path, format });
        }
        Ok(found)
    }

    pub fn require(dir: &Path, base: &str) -> Result<Self, DataLoadError> {
        Self::find(dir, base)?.ok_or_else(|| DataLoadError::Missing {
            base: base.to_string(),
            dir: dir.to_path_buf(),
        })
    }

    pub fn read<T: DeserializeOwned>(&self) -> Result<T, DataLoadError> {
        let content = std::fs::read_to_string(&self.path)?;
        match self.format {
            Format::Ron => ron::from_str(&content).map_err(|e| self.parse_error(e)),
            Format::Toml => toml::from_str(&content).map_err(|e| self.parse_error(e)),
            Format::Json => serde_json::from_str(&content).map_err(|e| self.parse_error(e)),
        }
    }

    /// Read a list, taken from `toml_key` of the root table in TOML files.
    pub fn read_list<T: DeserializeOwned>(&self, toml_key: &str) -> Result<Vec<T>, DataLoadError> {
        if self.format != Format::Toml {
            return self.read();
        }
        let mut table: toml::Table = self.read()?;
        let list = table
            .remove(toml_key)
            .ok_or_else(|| self.parse_error(format!("no `{toml_key}` array")))?;
        list.try_into().map_err(|e: toml::de::Error| self.parse_error(e))
    }

    fn parse_error(&self, detail: impl ToString) -> DataLoadError {
        DataLoadError::Parse {
            file: self.path.clone(),
            detail: detail.to_string(),
        }
    }
}

/// Load the level list from `dir`. There is no fallback level set, so a
/// missing file or an unplayable level is an error.
pub fn load_levels(dir: &Path) -> Result<LevelSet, DataLoadError> {
    let file = DataFile::require(dir, LEVELS_FILE)?;
    let levels: Vec<LevelDef> = file.read_list(TOML_LEVELS_KEY)?;
    let count = levels.len();
    let set = LevelSet::new(levels).map_err(|source| DataLoadError::InvalidLevels {
        file: file.path.clone(),
        source,
    })?;
    debug!(file = %file.path.display(), levels = count, "levels loaded");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use turing_core::operator::OperatorKind;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "turing_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    fn bundled_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    #[test]
    fn find_picks_the_format_from_the_extension() {
        let dir = make_test_dir("find");
        assert_eq!(DataFile::find(&dir, "levels").unwrap(), None);
        fs::write(dir.join("levels.toml"), "levels = []").unwrap();
        let file = DataFile::find(&dir, "levels").unwrap().unwrap();
        assert_eq!(file.format, Format::Toml);
        assert_eq!(file.path, dir.join("levels.toml"));
        cleanup(&dir);
    }

    #[test]
    fn two_formats_of_one_file_conflict() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("levels.ron"), "[]").unwrap();
        fs::write(dir.join("levels.json"), "[]").unwrap();
        assert!(matches!(
            DataFile::find(&dir, "levels"),
            Err(DataLoadError::Conflict { .. })
        ));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Levels
    // -----------------------------------------------------------------------

    #[test]
    fn bundled_levels_load() {
        let set = load_levels(&bundled_dir()).unwrap();
        assert_eq!(set.first().level_number, 1);
        assert!(set.len() >= 5);
        // Every bundled level must pass validation, which LevelSet::new enforces.
        assert!(set.iter().all(|l| l.validate().is_ok()));
    }

    #[test]
    fn levels_from_ron() {
        let dir = make_test_dir("ron_levels");
        fs::write(
            dir.join("levels.ron"),
            r#"[
                (
                    levelNumber: 1,
                    startScore: 13,
                    minScore: Some(0),
                    maxScore: None,
                    minSteps: 1,
                    goldSteps: 2,
                    silverSteps: 3,
                    bronzeSteps: 4,
                    buttons: [(name: "Primer", initialValue: 3)],
                ),
            ]"#,
        )
        .unwrap();
        let set = load_levels(&dir).unwrap();
        let level = set.require(1).unwrap();
        assert_eq!(level.min_score, Some(0));
        assert_eq!(level.max_score, None);
        assert_eq!(level.buttons[0].name, OperatorKind::Primer);
        cleanup(&dir);
    }

    #[test]
    fn levels_from_toml() {
        let dir = make_test_dir("toml_levels");
        fs::write(
            dir.join("levels.toml"),
            r#"
[[levels]]
levelNumber = 1
startScore = 42
minScore = 0
maxScore = 100
minSteps = 1
goldSteps = 2
silverSteps = 3
bronzeSteps = 4
buttons = [{ name = "Split", initialValue = 2, totalClickLimit = 3 }]

[[levels]]
levelNumber = 2
startScore = 9
minSteps = 1
goldSteps = 2
silverSteps = 3
bronzeSteps = 4
buttons = [{ name = "Digit", initialValue = 9 }]
"#,
        )
        .unwrap();
        let set = load_levels(&dir).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.require(1).unwrap().buttons[0].total_click_limit, Some(3));
        assert_eq!(set.require(2).unwrap().min_score, None);
        cleanup(&dir);
    }

    #[test]
    fn toml_without_levels_key_is_a_parse_error() {
        let dir = make_test_dir("toml_no_key");
        fs::write(dir.join("levels.toml"), "title = \"nothing\"\n").unwrap();
        assert!(matches!(load_levels(&dir), Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }

    #[test]
    fn missing_levels_are_fatal() {
        let dir = make_test_dir("no_levels");
        assert!(matches!(
            load_levels(&dir),
            Err(DataLoadError::Missing { ref base, .. }) if base == "levels"
        ));
        cleanup(&dir);
    }

    #[test]
    fn unplayable_levels_are_rejected() {
        let dir = make_test_dir("bad_levels");
        fs::write(
            dir.join("levels.json"),
            r#"[{
                "levelNumber": 1, "startScore": 500, "minScore": 0, "maxScore": 100,
                "minSteps": 1, "goldSteps": 2, "silverSteps": 3, "bronzeSteps": 4,
                "buttons": [{ "name": "Boost", "initialValue": 1 }]
            }]"#,
        )
        .unwrap();
        assert!(matches!(
            load_levels(&dir),
            Err(DataLoadError::InvalidLevels {
                source: LevelError::StartOutOfBounds { level: 1, score: 500 },
                ..
            })
        ));

        fs::write(dir.join("levels.json"), "[]").unwrap();
        assert!(matches!(
            load_levels(&dir),
            Err(DataLoadError::InvalidLevels { source: LevelError::Empty, .. })
        ));

        let numbered = |n: u32| {
            format!(
                r#"{{ "levelNumber": {n}, "startScore": 5, "minSteps": 1, "goldSteps": 2,
                    "silverSteps": 3, "bronzeSteps": 4,
                    "buttons": [{{ "name": "Boost", "initialValue": 1 }}] }}"#
            )
        };
        fs::write(dir.join("levels.json"), format!("[{}, {}]", numbered(1), numbered(3))).unwrap();
        assert!(matches!(
            load_levels(&dir),
            Err(DataLoadError::InvalidLevels {
                source: LevelError::OutOfSequence { position: 1, expected: 2, found: 3 },
                ..
            })
        ));
        cleanup(&dir);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = make_test_dir("bad_json");
        fs::write(dir.join("levels.json"), "[{ not json").unwrap();
        assert!(matches!(load_levels(&dir), Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }
}
