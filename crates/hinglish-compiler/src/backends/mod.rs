//! Production de l'exécutable à partir du C généré.

pub mod cc;
