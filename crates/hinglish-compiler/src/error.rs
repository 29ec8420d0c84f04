use std::process::ExitStatus;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::lexer::LexError;
use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("{} semantic error(s):\n{}", .0.len(), render(.0))]
    Semantic(Vec<Diagnostic>),

    #[error("{path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("C compiler '{cc}' not found (set HPC_CC or CC, or pass --cc)")]
    ToolchainMissing { cc: String },

    #[error("C compilation failed ({status}):\n{stderr}")]
    Toolchain { status: ExitStatus, stderr: String },

    #[error("'{path}' exited with {status}")]
    Run { path: Utf8PathBuf, status: ExitStatus },

    #[error("config {path}: {message}")]
    Config { path: Utf8PathBuf, message: String },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Erreurs de compilation sous forme de diagnostics positionnés
    /// (vide pour les erreurs d'E/S, de toolchain ou d'exécution).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Self::Lex(e) => vec![Diagnostic::error(e.kind.to_string()).at(e.line, e.col)],
            Self::Parse(e) => {
                vec![Diagnostic::error(format!("Error at '{}': {}", e.lexeme, e.message)).at(e.line, e.col)]
            }
            Self::Semantic(d) => d.clone(),
            _ => vec![],
        }
    }
}

fn render(diags: &[Diagnostic]) -> String {
    diags.iter().map(|d| format!("  {d}")).collect::<Vec<_>>().join("\n")
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    #[test]
    fn lex_and_parse_errors_become_located_diagnostics() {
        let err = CompileError::from(tokenize("ank x = 1 ! 2;").unwrap_err());
        let diags = err.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].clone().in_file("a.hp").to_string(), "a.hp:1:11: error: Unexpected character '!'");

        let err = CompileError::from(parse(tokenize("ank x = 1\nank y;").unwrap()).unwrap_err());
        assert_eq!(
            err.diagnostics()[0].clone().in_file("a.hp").to_string(),
            "a.hp:2:1: error: Error at 'ank': Expect ';' after variable declaration."
        );
    }

    #[test]
    fn io_errors_carry_no_diagnostics() {
        let err = CompileError::io("x.hp", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.diagnostics().is_empty());
    }
}
