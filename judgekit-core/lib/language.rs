//! Mapping from language short names to judge language ids.
//!
//! Hosts name languages by short names (`cpp`, `py`, `rs`) while a judge identifies them by
//! numeric ids specific to its deployment. The built-in table targets Judge0 CE.

use std::{collections::HashMap, path::Path};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Judge0 CE language ids keyed by short name, including common aliases.
pub const JUDGE0_CE_LANGUAGES: &[(&str, u32)] = &[
    ("asm", 45),
    ("nasm", 45),
    ("bash", 46),
    ("sh", 46),
    ("basic", 47),
    ("c", 50),
    ("cs", 51),
    ("csharp", 51),
    ("cpp", 54),
    ("c++", 54),
    ("cc", 54),
    ("lisp", 55),
    ("d", 56),
    ("elixir", 57),
    ("ex", 57),
    ("erlang", 58),
    ("erl", 58),
    ("fortran", 59),
    ("f90", 59),
    ("go", 60),
    ("golang", 60),
    ("haskell", 61),
    ("hs", 61),
    ("java", 62),
    ("js", 63),
    ("javascript", 63),
    ("node", 63),
    ("lua", 64),
    ("ocaml", 65),
    ("ml", 65),
    ("octave", 66),
    ("pascal", 67),
    ("pas", 67),
    ("php", 68),
    ("prolog", 69),
    ("py", 71),
    ("python", 71),
    ("python3", 71),
    ("rb", 72),
    ("ruby", 72),
    ("rs", 73),
    ("rust", 73),
    ("ts", 74),
    ("typescript", 74),
    ("cobol", 77),
    ("kt", 78),
    ("kotlin", 78),
    ("objc", 79),
    ("r", 80),
    ("scala", 81),
    ("sql", 82),
    ("swift", 83),
    ("vb", 84),
    ("perl", 85),
    ("pl", 85),
    ("clojure", 86),
    ("clj", 86),
    ("fs", 87),
    ("fsharp", 87),
    ("groovy", 88),
    ("dart", 90),
];

/// File extensions that differ from the short name they map to.
const EXTENSION_ALIASES: &[(&str, &str)] = &[
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("h", "c"),
    ("mjs", "js"),
    ("cjs", "js"),
    ("kts", "kt"),
    ("m", "objc"),
    ("exs", "ex"),
    ("f95", "f90"),
];

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Resolves a host's language name to the judge's numeric id.
pub trait LanguageResolver: Send + Sync {
    /// Returns the judge id for `language`, ignoring case and surrounding whitespace.
    fn resolve(&self, language: &str) -> Option<u32>;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A static language table.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    ids: HashMap<String, u32>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LanguageTable {
    /// The built-in table for Judge0 CE.
    pub fn judge0_ce() -> Self {
        let ids = JUDGE0_CE_LANGUAGES
            .iter()
            .map(|(name, id)| (name.to_string(), *id))
            .collect();
        Self { ids }
    }

    /// Adds or replaces a mapping, e.g. for a deployment with extra languages.
    pub fn with_language(mut self, name: &str, id: u32) -> Self {
        self.ids.insert(normalize(name), id);
        self
    }

    /// Guesses a language short name from a file's extension.
    pub fn short_name_for_path(&self, path: &Path) -> Option<String> {
        let extension = normalize(path.extension()?.to_str()?);
        let name = EXTENSION_ALIASES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, name)| name.to_string())
            .unwrap_or(extension);

        self.ids.contains_key(&name).then_some(name)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for LanguageTable {
    fn default() -> Self {
        Self::judge0_ce()
    }
}

impl LanguageResolver for LanguageTable {
    fn resolve(&self, language: &str) -> Option<u32> {
        self.ids.get(&normalize(language)).copied()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("python"), Some(71));
        assert_eq!(table.resolve("PY"), Some(71));
        assert_eq!(table.resolve(" Cpp "), Some(54));
        assert_eq!(table.resolve("rs"), Some(73));
        assert_eq!(table.resolve("brainfuck"), None);
        assert_eq!(table.resolve(""), None);
    }

    #[test]
    fn test_with_language() {
        let table = LanguageTable::default().with_language("Zig", 1001);
        assert_eq!(table.resolve("zig"), Some(1001));
    }

    #[test]
    fn test_short_name_for_path() {
        let table = LanguageTable::default();
        assert_eq!(table.short_name_for_path(Path::new("main.rs")), Some("rs".to_string()));
        assert_eq!(table.short_name_for_path(Path::new("a/b/Sol.CXX")), Some("cpp".to_string()));
        assert_eq!(table.short_name_for_path(Path::new("script.mjs")), Some("js".to_string()));
        assert_eq!(table.short_name_for_path(Path::new("notes.txt")), None);
        assert_eq!(table.short_name_for_path(Path::new("Makefile")), None);
    }
}
