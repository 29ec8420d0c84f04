use std::io::ErrorKind;
use std::process::{Command, ExitStatus};

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::CompilerConfig;
use crate::error::{CompileError, Result};

/// Backend qui appelle le compilateur C du système sur le `.c` généré.
#[derive(Debug, Clone)]
pub struct SystemCc {
    bin: String,
    extra: Vec<String>,
}

impl SystemCc {
    pub fn new(cfg: &CompilerConfig) -> Self {
        Self { bin: cfg.cc.clone(), extra: cfg.cc_args.clone() }
    }

    /// Vrai si `<cc> --version` se lance (sortie ignorée).
    pub fn is_available(&self) -> bool {
        Command::new(&self.bin).arg("--version").output().is_ok_and(|o| o.status.success())
    }

    /// `<cc> <c_file> -o <exe> <extra...>` ; stderr est capturé pour l'erreur.
    pub fn compile(&self, c_file: &Utf8Path, exe: &Utf8Path) -> Result<()> {
        log::info!("{} {} -o {} {}", self.bin, c_file, exe, self.extra.join(" "));
        let output = Command::new(&self.bin)
            .arg(c_file)
            .arg("-o")
            .arg(exe)
            .args(&self.extra)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CompileError::ToolchainMissing { cc: self.bin.clone() },
                _ => CompileError::io(self.bin.as_str(), e),
            })?;
        if !output.status.success() {
            return Err(CompileError::Toolchain {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

/// Lance l'exécutable produit, stdio hérités ; un statut non nul est une erreur.
pub fn run_executable(path: &Utf8Path) -> Result<ExitStatus> {
    let cmd = command_path(path);
    log::info!("run {cmd}");
    let status = Command::new(&cmd).status().map_err(|e| CompileError::io(cmd.clone(), e))?;
    if !status.success() {
        return Err(CompileError::Run { path: path.to_owned(), status });
    }
    Ok(status)
}

/// Un chemin relatif nu (`prog`) serait cherché dans PATH : on le préfixe de `./`.
fn command_path(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() || path.as_str().starts_with("./") || path.as_str().starts_with("../") {
        path.to_owned()
    } else {
        Utf8Path::new(".").join(path)
    }
}
