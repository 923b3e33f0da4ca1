//! Supported editor languages and their default code templates.

use serde::{Deserialize, Serialize};

/// The fixed set of languages a room may select.
///
/// Each language carries a default code template (the buffer is reset to it
/// on language change), a file extension, and the identifier understood by
/// the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
    Cpp,
    C,
    Php,
    Go,
    Ruby,
    Rust,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Php,
        Language::Go,
        Language::Ruby,
        Language::Rust,
    ];

    /// Parse a wire identifier; `None` for anything outside the supported set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "javascript" => Some(Language::JavaScript),
            "python" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "php" => Some(Language::Php),
            "go" => Some(Language::Go),
            "ruby" => Some(Language::Ruby),
            "rust" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Php => "php",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
        }
    }

    /// Buffer contents a fresh room (or a room after a language change)
    /// starts with.
    pub fn default_template(&self) -> &'static str {
        match self {
            Language::JavaScript => "// Start coding here\n",
            Language::Python => "# Start coding here\n",
            Language::Java => {
                "public class Main {\n  public static void main(String[] args) {\n    // Start coding here\n  }\n}"
            }
            Language::Cpp => {
                "#include <iostream>\nusing namespace std;\n\nint main() {\n  // Start coding here\n  return 0;\n}"
            }
            Language::C => {
                "#include <stdio.h>\n\nint main() {\n  // Start coding here\n  return 0;\n}"
            }
            Language::Php => "<?php\n\n// Start coding here\n\n?>",
            Language::Go => {
                "package main\n\nimport \"fmt\"\n\nfunc main() {\n  // Start coding here\n}"
            }
            Language::Ruby => "# Start coding here\n",
            Language::Rust => "fn main() {\n  // Start coding here\n}",
        }
    }

    /// File extension used when exporting the buffer.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Python => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Php => "php",
            Language::Go => "go",
            Language::Ruby => "rb",
            Language::Rust => "rs",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::JavaScript
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_every_supported_language() {
        // テスト項目: サポートされる全ての言語識別子がパースできる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        for language in Language::ALL {
            assert_eq!(Language::parse(language.as_str()), Some(language));
        }
    }

    #[test]
    fn test_parse_rejects_unsupported_language() {
        // テスト項目: サポート外の言語識別子は None を返す
        // given (前提条件):
        let value = "cobol";

        // when (操作):
        let result = Language::parse(value);

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_default_language_is_javascript() {
        // テスト項目: デフォルト言語は javascript である
        // given (前提条件):

        // when (操作):
        let language = Language::default();

        // then (期待する結果):
        assert_eq!(language, Language::JavaScript);
    }

    #[test]
    fn test_every_language_has_a_template() {
        // テスト項目: 全ての言語がデフォルトテンプレートを持つ
        // given (前提条件):

        // when (操作) / then (期待する結果):
        for language in Language::ALL {
            assert!(!language.default_template().is_empty());
            assert!(!language.extension().is_empty());
        }
    }

    #[test]
    fn test_serde_identifier_matches_parse_identifier() {
        // テスト項目: serde の識別子と parse の識別子が一致する
        // given (前提条件):

        // when (操作) / then (期待する結果):
        for language in Language::ALL {
            let json = serde_json::to_string(&language).unwrap();
            assert_eq!(json, format!("\"{}\"", language.as_str()));
        }
    }
}
