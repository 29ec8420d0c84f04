//! `fibonacci` — affiche `Fibonacci Series:` puis fib(0) .. fib(9).
//!
//! Aucun argument, aucune variable d'environnement n'influence stdout.
//! Les logs (RUST_LOG=debug) partent sur stderr.

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    fibonacci::write_series(&mut out, fibonacci::TERMS).context("écriture sur stdout")?;
    out.flush().context("flush de stdout")?;
    Ok(())
}
