use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::{CompileError, Result};

/// Configuration du compilateur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Compilateur C (si non fourni: $HPC_CC, puis $CC, puis 'gcc' dans PATH)
    pub cc: String,
    /// Arguments ajoutés après `-o <exe>` ($HPC_CC_ARGS, séparés par des blancs)
    pub cc_args: Vec<String>,
    /// Dossier de travail (pour artefacts temporaires)
    pub workdir: Utf8PathBuf,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let cc = env_nonempty("HPC_CC")
            .or_else(|| env_nonempty("CC"))
            .unwrap_or_else(|| "gcc".to_string());
        let cc_args = env_nonempty("HPC_CC_ARGS")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Self {
            cc,
            cc_args,
            workdir: Utf8PathBuf::from(std::env::temp_dir().to_string_lossy().to_string()),
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Contenu d'un `hpc.toml` ; toutes les clés sont facultatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub cc: Option<String>,
    pub cc_args: Option<Vec<String>>,
    pub keep_c: Option<bool>,
    pub workdir: Option<Utf8PathBuf>,
}

impl ConfigFile {
    pub fn parse(text: &str, path: &Utf8Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| CompileError::Config {
            path: path.to_owned(),
            message: e.to_string().trim_end().to_string(),
        })
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        log::info!("config: {path}");
        Self::parse(&text, path)
    }

    /// Applique les valeurs du fichier par-dessus `cfg`.
    pub fn apply(&self, cfg: &mut CompilerConfig) {
        if let Some(cc) = &self.cc {
            cfg.cc.clone_from(cc);
        }
        if let Some(args) = &self.cc_args {
            cfg.cc_args.clone_from(args);
        }
        if let Some(dir) = &self.workdir {
            cfg.workdir.clone_from(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn file_values_override_defaults() {
        let file = ConfigFile::parse(
            indoc! {r#"
                cc = "clang"
                cc_args = ["-O2", "-lm"]
                keep_c = true
            "#},
            Utf8Path::new("hpc.toml"),
        )
        .unwrap();
        let mut cfg = CompilerConfig { cc: "gcc".into(), cc_args: vec![], workdir: "/tmp".into() };
        file.apply(&mut cfg);
        assert_eq!(cfg.cc, "clang");
        assert_eq!(cfg.cc_args, ["-O2", "-lm"]);
        assert_eq!(cfg.workdir, "/tmp");
        assert_eq!(file.keep_c, Some(true));
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let err = ConfigFile::parse("compiler = \"tcc\"", Utf8Path::new("hpc.toml")).unwrap_err();
        assert!(matches!(err, CompileError::Config { .. }), "{err}");
    }

    #[test]
    fn empty_file_changes_nothing() {
        let file = ConfigFile::parse("", Utf8Path::new("hpc.toml")).unwrap();
        assert_eq!(file, ConfigFile::default());
    }
}
