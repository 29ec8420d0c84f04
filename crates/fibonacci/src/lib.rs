//! fibonacci — le programme de référence du transpileur Hinglish.
//!
//! Deux pièces :
//!  - [`fibonacci`] : n-ième terme par double récursion naïve (pas de mémo)
//!  - [`write_series`] : en-tête `Fibonacci Series:` puis un terme par ligne
//!
//! La sortie ne dépend ni de l'environnement ni des arguments : deux
//! exécutions produisent exactement les mêmes octets.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

use std::io::{self, Write};

/// Ligne d'en-tête écrite avant les termes.
pub const HEADER: &str = "Fibonacci Series:";

/// Nombre de termes écrits par le programme (`fib(0)` .. `fib(9)`).
pub const TERMS: i32 = 10;

/// Calcule `fib(n)` : `fib(0)=0`, `fib(1)=1`, `fib(n)=fib(n-1)+fib(n-2)`.
///
/// Pour `n <= 1` la valeur est renvoyée telle quelle, négatifs compris
/// (`fibonacci(-3) == -3`). L'addition déborde en complément à deux.
pub fn fibonacci(n: i32) -> i32 {
    if n <= 1 {
        return n;
    }
    fibonacci(n - 1).wrapping_add(fibonacci(n - 2))
}

/// Écrit l'en-tête puis `fib(0)` .. `fib(count - 1)`, un par ligne.
pub fn write_series<W: Write>(out: &mut W, count: i32) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for i in 0..count {
        let value = fibonacci(i);
        log::debug!("fib({i}) = {value}");
        writeln!(out, "{value}")?;
    }
    Ok(())
}

/// Sortie complète du programme (en-tête + [`TERMS`] termes) en mémoire.
pub fn render_series() -> io::Result<String> {
    let mut buf = Vec::new();
    write_series(&mut buf, TERMS)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
