//! Reference data management.
//!
//! Loads and validates the read-only data the engine matches against:
//! per-language wordlists, the common-password set, and the keyboard-pattern
//! table. Loaded once at startup and never mutated afterwards, so an
//! `Analyzer` can be shared freely across concurrent requests.
//!
//! Startup validation is strict: running with an empty wordlist or common set
//! would silently report zero matches and inflate scores, so every loader
//! refuses empty inputs instead.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in keyboard-adjacency sequences, used when no override is supplied.
/// All lowercase; the detector scans a lowercased input.
pub const DEFAULT_KEYBOARD_PATTERNS: &[&str] = &[
    "qwerty", "qwertz", "azerty", "asdf", "asdfgh", "zxcv", "zxcvbn", "yxcvbn",
    "poiuyt", "lkjhgf", "mnbvcx", "1qaz2wsx", "qazwsx",
];

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Wordlists directory not found: {0}")]
    WordlistsDirNotFound(PathBuf),
    #[error("No .txt wordlists found in directory: {0}")]
    NoWordlists(PathBuf),
    #[error("Reference file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read reference file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Reference file is empty: {0}")]
    EmptyFile(PathBuf),
    #[error("Wordlist for language '{0}' is empty")]
    EmptyLanguage(String),
    #[error("No languages configured")]
    NoLanguages,
    #[error("Common-password set is empty")]
    EmptyCommonSet,
    #[error("Keyboard-pattern table is empty")]
    EmptyKeyboardTable,
}

/// One language's reference word set. Words are stored lowercased.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    words: HashSet<String>,
}

impl Language {
    pub fn new(code: impl Into<String>, words: HashSet<String>) -> Self {
        Self {
            code: code.into(),
            words,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn words(&self) -> &HashSet<String> {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// The immutable reference data an `Analyzer` is built from.
///
/// Languages are held in priority order: `english` first (when present),
/// then declaration order. Dictionary-match ties are broken by this order.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    languages: Vec<Language>,
    common_passwords: HashSet<String>,
    keyboard_patterns: Vec<String>,
}

impl ReferenceData {
    /// Builds reference data from already-loaded sets.
    ///
    /// Wordlist words are lowercased here; the common set keeps its case
    /// because the common-password check is case-sensitive on the raw input.
    /// Pass an empty `keyboard_patterns` slice to use the built-in table.
    pub fn from_parts(
        languages: Vec<Language>,
        common_passwords: HashSet<String>,
        keyboard_patterns: Vec<String>,
    ) -> Result<Self, ReferenceError> {
        if languages.is_empty() {
            return Err(ReferenceError::NoLanguages);
        }
        for lang in &languages {
            if lang.words.is_empty() {
                return Err(ReferenceError::EmptyLanguage(lang.code.clone()));
            }
        }
        if common_passwords.is_empty() {
            return Err(ReferenceError::EmptyCommonSet);
        }

        let keyboard_patterns = if keyboard_patterns.is_empty() {
            DEFAULT_KEYBOARD_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            let lowered: Vec<String> = keyboard_patterns
                .into_iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
            if lowered.is_empty() {
                return Err(ReferenceError::EmptyKeyboardTable);
            }
            lowered
        };

        let mut languages: Vec<Language> = languages
            .into_iter()
            .map(|l| Language {
                code: l.code,
                words: l.words.into_iter().map(|w| w.to_lowercase()).collect(),
            })
            .collect();

        // English-first priority; remaining languages keep declaration order.
        if let Some(idx) = languages.iter().position(|l| l.code == "english") {
            let english = languages.remove(idx);
            languages.insert(0, english);
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            languages = languages.len(),
            common = common_passwords.len(),
            "reference data initialized"
        );

        Ok(Self {
            languages,
            common_passwords,
            keyboard_patterns,
        })
    }

    /// Loads reference data from the default locations.
    ///
    /// # Environment Variables
    ///
    /// - `PWD_WORDLISTS_DIR`: directory of per-language `.txt` wordlists
    ///   (default: `./assets/wordlists`)
    /// - `PWD_COMMON_PASSWORDS_PATH`: common-password file
    ///   (default: `./assets/common_passwords.txt`)
    ///
    /// # Errors
    ///
    /// Returns an error if either location is missing, unreadable, or empty.
    /// Reference-data failures are fatal by design.
    pub fn load() -> Result<Self, ReferenceError> {
        Self::load_from(wordlists_dir(), common_passwords_path())
    }

    /// Loads reference data from explicit locations.
    ///
    /// Each `<lang>.txt` file under `wordlists_dir` becomes one language,
    /// named after the file stem. One word per line, UTF-8.
    pub fn load_from<P: AsRef<Path>, Q: AsRef<Path>>(
        wordlists_dir: P,
        common_path: Q,
    ) -> Result<Self, ReferenceError> {
        let dir = wordlists_dir.as_ref();
        if !dir.is_dir() {
            #[cfg(feature = "tracing")]
            tracing::error!("reference load FAILED: wordlists dir missing {:?}", dir);
            return Err(ReferenceError::WordlistsDirNotFound(dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        if paths.is_empty() {
            return Err(ReferenceError::NoWordlists(dir.to_path_buf()));
        }
        // Directory iteration order is platform-dependent; sort for
        // reproducible language priority.
        paths.sort();

        let mut languages = Vec::with_capacity(paths.len());
        for path in paths {
            let code = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let words = read_word_set(&path, true)?;
            if words.is_empty() {
                return Err(ReferenceError::EmptyLanguage(code));
            }
            languages.push(Language::new(code, words));
        }

        let common_path = common_path.as_ref();
        if !common_path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("reference load FAILED: common set missing {:?}", common_path);
            return Err(ReferenceError::FileNotFound(common_path.to_path_buf()));
        }
        let common_passwords = read_word_set(common_path, false)?;
        if common_passwords.is_empty() {
            return Err(ReferenceError::EmptyFile(common_path.to_path_buf()));
        }

        Self::from_parts(languages, common_passwords, Vec::new())
    }

    /// Languages in priority order (English first when present).
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn keyboard_patterns(&self) -> &[String] {
        &self.keyboard_patterns
    }

    /// Case-sensitive membership test against the common-password set.
    pub fn is_common(&self, password: &str) -> bool {
        self.common_passwords.contains(password)
    }

    /// True when `word` (already lowercased) is a common password or appears
    /// in any language's wordlist. Used by the common-base pattern scan.
    pub fn is_known_base(&self, word: &str) -> bool {
        self.common_passwords.contains(word)
            || self.languages.iter().any(|l| l.contains(word))
    }
}

fn wordlists_dir() -> PathBuf {
    std::env::var("PWD_WORDLISTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/wordlists"))
}

fn common_passwords_path() -> PathBuf {
    std::env::var("PWD_COMMON_PASSWORDS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/common_passwords.txt"))
}

fn read_word_set(path: &Path, lowercase: bool) -> Result<HashSet<String>, ReferenceError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| {
            if lowercase {
                l.to_lowercase()
            } else {
                l.to_string()
            }
        })
        .collect())
}

#[cfg(test)]
pub(crate) fn test_reference() -> ReferenceData {
    let english: HashSet<String> = [
        "password", "admin", "welcome", "hello", "qwerty", "secret", "letmein",
        "monkey", "dragon", "master", "login", "sunshine", "princess",
        "football", "superman", "batman",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let swahili: HashSet<String> = [
        "habari", "safari", "mambo", "jambo", "rafiki", "hakuna", "matata",
        "asante", "karibu", "chakula",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let spanish: HashSet<String> = [
        "hola", "adios", "gracias", "amigo", "casa", "agua", "familia",
        "trabajo", "escuela", "noches",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let common: HashSet<String> = [
        "123456", "password", "12345678", "qwerty", "abc123", "password1",
        "12345", "123456789", "letmein", "welcome", "monkey", "dragon",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    ReferenceData::from_parts(
        vec![
            Language::new("swahili", swahili),
            Language::new("english", english),
            Language::new("spanish", spanish),
        ],
        common,
        Vec::new(),
    )
    .expect("test reference data is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::set_var(key, value) };
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::remove_var(key) };
    }

    fn write_file(dir: &Path, name: &str, lines: &[&str]) {
        let mut f = std::fs::File::create(dir.join(name)).expect("create file");
        for line in lines {
            writeln!(f, "{}", line).expect("write line");
        }
    }

    fn setup_assets() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let wl = tmp.path().join("wordlists");
        std::fs::create_dir(&wl).expect("mkdir wordlists");
        write_file(&wl, "english.txt", &["password", "Welcome", "dragon"]);
        write_file(&wl, "spanish.txt", &["hola", "amigo"]);
        let common = tmp.path().join("common_passwords.txt");
        write_file(tmp.path(), "common_passwords.txt", &["123456", "Password1"]);
        (tmp, common)
    }

    #[test]
    fn test_load_from_success() {
        let (tmp, common) = setup_assets();
        let data = ReferenceData::load_from(tmp.path().join("wordlists"), common)
            .expect("load succeeds");

        assert_eq!(data.languages().len(), 2);
        // English pulled to the front regardless of file order.
        assert_eq!(data.languages()[0].code(), "english");
        assert_eq!(data.languages()[1].code(), "spanish");
        // Wordlist entries lowercased on load.
        assert!(data.languages()[0].contains("welcome"));
        // Common set keeps case: the membership test is case-sensitive.
        assert!(data.is_common("Password1"));
        assert!(!data.is_common("password1"));
        assert!(!data.keyboard_patterns().is_empty());
    }

    #[test]
    fn test_load_from_missing_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let result = ReferenceData::load_from(
            tmp.path().join("nope"),
            tmp.path().join("common.txt"),
        );
        assert!(matches!(result, Err(ReferenceError::WordlistsDirNotFound(_))));
    }

    #[test]
    fn test_load_from_no_wordlists() {
        let tmp = TempDir::new().expect("tempdir");
        let wl = tmp.path().join("wordlists");
        std::fs::create_dir(&wl).expect("mkdir");
        let result = ReferenceData::load_from(&wl, tmp.path().join("common.txt"));
        assert!(matches!(result, Err(ReferenceError::NoWordlists(_))));
    }

    #[test]
    fn test_load_from_empty_language_is_fatal() {
        let tmp = TempDir::new().expect("tempdir");
        let wl = tmp.path().join("wordlists");
        std::fs::create_dir(&wl).expect("mkdir");
        write_file(&wl, "english.txt", &[]);
        write_file(tmp.path(), "common.txt", &["123456"]);
        let result = ReferenceData::load_from(&wl, tmp.path().join("common.txt"));
        assert!(matches!(result, Err(ReferenceError::EmptyLanguage(lang)) if lang == "english"));
    }

    #[test]
    fn test_load_from_missing_common_file() {
        let tmp = TempDir::new().expect("tempdir");
        let wl = tmp.path().join("wordlists");
        std::fs::create_dir(&wl).expect("mkdir");
        write_file(&wl, "english.txt", &["password"]);
        let result = ReferenceData::load_from(&wl, tmp.path().join("missing.txt"));
        assert!(matches!(result, Err(ReferenceError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_empty_common_file() {
        let tmp = TempDir::new().expect("tempdir");
        let wl = tmp.path().join("wordlists");
        std::fs::create_dir(&wl).expect("mkdir");
        write_file(&wl, "english.txt", &["password"]);
        write_file(tmp.path(), "common.txt", &["", "   "]);
        let result = ReferenceData::load_from(&wl, tmp.path().join("common.txt"));
        assert!(matches!(result, Err(ReferenceError::EmptyFile(_))));
    }

    #[test]
    #[serial]
    fn test_load_uses_env_paths() {
        let (tmp, common) = setup_assets();
        set_env(
            "PWD_WORDLISTS_DIR",
            tmp.path().join("wordlists").to_str().unwrap(),
        );
        set_env("PWD_COMMON_PASSWORDS_PATH", common.to_str().unwrap());

        let data = ReferenceData::load().expect("load from env paths");
        assert_eq!(data.languages()[0].code(), "english");

        remove_env("PWD_WORDLISTS_DIR");
        remove_env("PWD_COMMON_PASSWORDS_PATH");
    }

    #[test]
    #[serial]
    fn test_default_paths_without_env() {
        remove_env("PWD_WORDLISTS_DIR");
        remove_env("PWD_COMMON_PASSWORDS_PATH");
        assert_eq!(wordlists_dir(), PathBuf::from("./assets/wordlists"));
        assert_eq!(
            common_passwords_path(),
            PathBuf::from("./assets/common_passwords.txt")
        );
    }

    #[test]
    fn test_from_parts_rejects_empty_inputs() {
        let words: HashSet<String> = ["password".to_string()].into_iter().collect();
        let common: HashSet<String> = ["123456".to_string()].into_iter().collect();

        assert!(matches!(
            ReferenceData::from_parts(Vec::new(), common.clone(), Vec::new()),
            Err(ReferenceError::NoLanguages)
        ));
        assert!(matches!(
            ReferenceData::from_parts(
                vec![Language::new("english", HashSet::new())],
                common.clone(),
                Vec::new()
            ),
            Err(ReferenceError::EmptyLanguage(_))
        ));
        assert!(matches!(
            ReferenceData::from_parts(
                vec![Language::new("english", words.clone())],
                HashSet::new(),
                Vec::new()
            ),
            Err(ReferenceError::EmptyCommonSet)
        ));
        assert!(
            ReferenceData::from_parts(
                vec![Language::new("english", words)],
                common,
                Vec::new()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_is_known_base() {
        let data = test_reference();
        assert!(data.is_known_base("password")); // common + english
        assert!(data.is_known_base("jambo")); // swahili wordlist only
        assert!(!data.is_known_base("xkcd936"));
    }
}
