//! hinglish-cli/src/lib.rs — CLI lib pour le transpileur Hinglish
//!
//! `hpc <input.hp>` :
//!   - défaut      : transpile en C, compile avec cc, supprime le `.c`
//!   - `--emit-c`  : affiche le C sur stdout et s'arrête
//!   - `--dump-ast`: affiche l'AST sur stdout et s'arrête
//!   - `--run`     : exécute le binaire produit
//!
//! Priorité de configuration : variables d'environnement < `hpc.toml` < flags.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use hinglish_compiler::{run_executable, BuildOptions, CompileError, Compiler, CompilerConfig, ConfigFile};

/// Nom du fichier de config chargé depuis le dossier courant s'il existe.
pub const DEFAULT_CONFIG: &str = "hpc.toml";

#[derive(Parser, Debug)]
#[command(name = "hpc", version, about = "Hinglish (.hp) → C transpiler", long_about = None)]
pub struct Cli {
    /// Fichier source .hp à compiler
    pub input: Utf8PathBuf,

    /// Exécutable de sortie (défaut : l'entrée sans extension)
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Conserver le fichier C intermédiaire
    #[arg(long)]
    pub keep_c: bool,

    /// Verbosité (répéter pour plus de bruit : -v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Exécuter le programme après compilation
    #[arg(long)]
    pub run: bool,

    /// Afficher le C généré sur stdout (pas de compilation)
    #[arg(long, conflicts_with = "dump_ast")]
    pub emit_c: bool,

    /// Afficher l'AST sur stdout (pas de compilation)
    #[arg(long)]
    pub dump_ast: bool,

    /// Compilateur C à utiliser (sinon HPC_CC, CC ou 'gcc')
    #[arg(long)]
    pub cc: Option<String>,

    /// Fichier de configuration TOML (défaut : ./hpc.toml s'il existe)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,
}

/// Filtre env_logger correspondant au nombre de `-v`.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// env_logger ; `RUST_LOG` l'emporte sur `-v`.
pub fn init_logging(verbose: u8) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(verbose)))
        .format_target(false)
        .init();
}

/// Configuration effective : défauts (env) + fichier + flags.
/// Renvoie aussi la valeur de `keep_c` fusionnée.
pub fn resolve_config(cli: &Cli) -> Result<(CompilerConfig, bool)> {
    let mut cfg = CompilerConfig::default();
    let mut keep_c = cli.keep_c;

    let file = match &cli.config {
        Some(path) => Some(ConfigFile::load(path)?),
        None if Utf8Path::new(DEFAULT_CONFIG).is_file() => Some(ConfigFile::load(Utf8Path::new(DEFAULT_CONFIG))?),
        None => None,
    };
    if let Some(file) = file {
        file.apply(&mut cfg);
        keep_c |= file.keep_c.unwrap_or(false);
    }
    if let Some(cc) = &cli.cc {
        cfg.cc.clone_from(cc);
    }
    log::debug!("config: cc={} args={:?} keep_c={keep_c}", cfg.cc, cfg.cc_args);
    Ok((cfg, keep_c))
}

/// Point d'entrée du binaire (à appeler depuis src/main.rs)
pub fn run(cli: &Cli) -> Result<()> {
    let (cfg, keep_c) = resolve_config(cli)?;
    let compiler = Compiler::new(cfg);

    if cli.emit_c || cli.dump_ast {
        let source = std::fs::read_to_string(&cli.input).wrap_err_with(|| format!("lecture {}", cli.input))?;
        if cli.dump_ast {
            let program = compiler.parse_str(&source).map_err(|e| report(&cli.input, e))?;
            println!("{program}");
        } else {
            let c = compiler.transpile_str(&source).map_err(|e| report(&cli.input, e))?;
            print!("{c}");
        }
        return Ok(());
    }

    let opts = BuildOptions { output: cli.output.clone(), keep_c };
    let product = compiler.compile_file(&cli.input, &opts).map_err(|e| report(&cli.input, e))?;
    for d in &product.diags {
        eprintln!("{d}");
    }
    if let Some(c) = &product.c_path {
        log::info!("C conservé: {c}");
    }
    println!("Successfully compiled '{}' to '{}'", cli.input, product.executable);

    if cli.run {
        println!("Running '{}'...", product.executable);
        run_executable(&product.executable)?;
        println!("Program execution completed successfully.");
    }
    Ok(())
}

/// Affiche les diagnostics d'une erreur de compilation (`file:line:col: error: ...`)
/// sur stderr ; les autres erreurs remontent telles quelles.
fn report(input: &Utf8Path, err: CompileError) -> Report {
    let diags = err.diagnostics();
    if diags.is_empty() {
        return err.into();
    }
    for d in &diags {
        eprintln!("{}", d.clone().in_file(input.as_str()));
    }
    let errors = diags.iter().filter(|d| d.is_error()).count();
    eyre!("could not compile '{input}' due to {errors} error(s)")
}
