//! hinglish-compiler — transpileur du langage Hinglish (`.hp`) vers C.
//! - Pilote la pipeline (lexer → parser → analyse sémantique → codegen C → cc)
//! - Le backend produit l'exécutable via le compilateur C du système.
//! - API orientée outil (CLI `hpc`, tests d'intégration).

pub mod ast;
pub mod backends;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod scope;
pub mod sema;
mod util;

pub use backends::cc::{run_executable, SystemCc};
pub use config::{CompilerConfig, ConfigFile};
pub use diagnostics::{Diagnostic, Severity};
pub use error::CompileError;
pub use pipeline::{BuildOptions, CompileProduct, Compiler};
