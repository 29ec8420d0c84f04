use camino::{Utf8Path, Utf8PathBuf};

use crate::ast::Program;
use crate::backends::cc::SystemCc;
use crate::config::CompilerConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{CompileError, Result};
use crate::util::fs;
use crate::{codegen, lexer, parser, sema};

/// Extension attendue des sources.
pub const SOURCE_EXT: &str = "hp";

/// Options d'une construction d'exécutable.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Exécutable à produire (défaut : l'entrée sans extension).
    pub output: Option<Utf8PathBuf>,
    /// Conserver le `.c` intermédiaire.
    pub keep_c: bool,
}

/// Produit compilé (+ diagnostics)
#[derive(Debug, Clone)]
pub struct CompileProduct {
    /// `.c` généré, si conservé.
    pub c_path: Option<Utf8PathBuf>,
    pub executable: Utf8PathBuf,
    /// Avertissements non bloquants.
    pub diags: Vec<Diagnostic>,
}

/// Orchestrateur principal
pub struct Compiler {
    cfg: CompilerConfig,
}

impl Compiler {
    pub fn new(cfg: CompilerConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.cfg
    }

    /// Lexing + parsing, sans analyse sémantique.
    pub fn parse_str(&self, source: &str) -> Result<Program> {
        let tokens = lexer::tokenize(source)?;
        log::debug!("lexer: {} token(s)", tokens.len());
        Ok(parser::parse(tokens)?)
    }

    /// Parsing + analyse ; toute erreur sémantique interrompt.
    pub fn check_str(&self, source: &str) -> Result<Program> {
        let program = self.parse_str(source)?;
        let analysis = sema::analyze(&program);
        if !analysis.is_ok() {
            return Err(CompileError::Semantic(analysis.errors));
        }
        Ok(program)
    }

    /// Source Hinglish → texte C.
    pub fn transpile_str(&self, source: &str) -> Result<String> {
        let program = self.check_str(source)?;
        Ok(codegen::generate(&program))
    }

    /// Compile un fichier `.hp` jusqu'à l'exécutable.
    pub fn compile_file(&self, input: &Utf8Path, opts: &BuildOptions) -> Result<CompileProduct> {
        let mut diags = Vec::new();
        if input.extension() != Some(SOURCE_EXT) {
            let d = Diagnostic::warning(format!("input file does not have a .{SOURCE_EXT} extension"))
                .in_file(input.as_str());
            log::warn!("{d}");
            diags.push(d);
        }

        let source = fs::read_source(input)?;
        let c_src = self.transpile_str(&source).map_err(|e| match e {
            CompileError::Semantic(ds) => {
                CompileError::Semantic(ds.into_iter().map(|d| d.in_file(input.as_str())).collect())
            }
            other => other,
        })?;

        let executable = match &opts.output {
            Some(out) => out.clone(),
            None => default_executable(input),
        };
        // une entrée `prog.c` ne doit jamais servir de fichier intermédiaire
        let c_path = match input.with_extension("c") {
            p if p.as_path() == input => fs::tmp_file(&self.cfg.workdir, "hpc-src", "c"),
            p => p,
        };
        let kept = self.build(&c_src, &c_path, &executable, opts.keep_c)?;
        Ok(CompileProduct { c_path: kept, executable, diags })
    }

    /// Compile une chaîne en mémoire vers `executable` (le `.c` passe par `workdir`).
    pub fn compile_str(&self, source: &str, executable: &Utf8Path, keep_c: bool) -> Result<CompileProduct> {
        let c_src = self.transpile_str(source)?;
        let c_path = fs::tmp_file(&self.cfg.workdir, "hpc-src", "c");
        let kept = self.build(&c_src, &c_path, executable, keep_c)?;
        Ok(CompileProduct { c_path: kept, executable: executable.to_owned(), diags: vec![] })
    }

    fn build(&self, c_src: &str, c_path: &Utf8Path, exe: &Utf8Path, keep_c: bool) -> Result<Option<Utf8PathBuf>> {
        fs::write_all(c_path, c_src)?;
        log::info!("C généré: {c_path}");
        fs::ensure_parent(exe)?;

        let res = SystemCc::new(&self.cfg).compile(c_path, exe);

        if keep_c {
            res.map(|()| Some(c_path.to_owned()))
        } else {
            // best-effort cleanup, y compris après un échec de cc
            fs::remove_quietly(c_path);
            res.map(|()| None)
        }
    }
}

/// `dir/prog.hp` → `dir/prog` ; une entrée sans extension reçoit `.out`
/// pour ne jamais écraser la source.
pub fn default_executable(input: &Utf8Path) -> Utf8PathBuf {
    if input.extension().is_some() {
        input.with_extension("")
    } else {
        input.with_extension("out")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_executable_strips_extension() {
        assert_eq!(default_executable(Utf8Path::new("demos/fibonacci.hp")), "demos/fibonacci");
        assert_eq!(default_executable(Utf8Path::new("prog")), "prog.out");
    }

    #[test]
    fn semantic_errors_abort_transpilation() {
        let c = Compiler::new(CompilerConfig::default());
        let err = c.transpile_str("ank x = \"hello\";").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert!(err.to_string().contains("Cannot assign vakya to variable 'x' of type ank"), "{err}");
    }

    #[test]
    fn lex_errors_are_wrapped() {
        let c = Compiler::new(CompilerConfig::default());
        let err = c.transpile_str("ank x = 1 ! 2;").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)), "{err}");
    }

    #[test]
    fn literals_that_c_cannot_represent_are_lex_errors() {
        use crate::lexer::LexErrorKind;
        let c = Compiler::new(CompilerConfig::default());
        for src in ["ank x = 3000000000;".to_string(), format!("sankhya f = {}.0;", "1".repeat(400))] {
            match c.transpile_str(&src) {
                Err(CompileError::Lex(e)) => assert!(
                    matches!(e.kind, LexErrorKind::IntegerOverflow(_) | LexErrorKind::FloatOverflow(_)),
                    "{e}"
                ),
                other => panic!("expected a lexical error, got {other:?}"),
            }
        }
    }
}
