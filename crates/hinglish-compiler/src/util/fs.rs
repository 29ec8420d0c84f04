use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{CompileError, Result};

pub fn ensure_parent(p: &Utf8Path) -> Result<()> {
    match p.parent() {
        Some(dir) if !dir.as_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| CompileError::io(dir, e))
        }
        _ => Ok(()),
    }
}

pub fn read_source(p: &Utf8Path) -> Result<String> {
    fs::read_to_string(p).map_err(|e| CompileError::io(p, e))
}

pub fn write_all(p: &Utf8Path, text: &str) -> Result<()> {
    ensure_parent(p)?;
    fs::write(p, text).map_err(|e| CompileError::io(p, e))
}

/// Suppression best-effort : un échec n'est qu'un avertissement.
pub fn remove_quietly(p: &Utf8Path) {
    if let Err(e) = fs::remove_file(p) {
        log::warn!("impossible de supprimer {p}: {e}");
    }
}

/// Chemin temporaire unique dans `dir` (pid + horodatage + compteur).
pub fn tmp_file(dir: &Utf8Path, prefix: &str, ext: &str) -> Utf8PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let ts = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis());
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.join(format!("{prefix}-{}-{ts}-{n}.{}", std::process::id(), ext.trim_start_matches('.')))
}
