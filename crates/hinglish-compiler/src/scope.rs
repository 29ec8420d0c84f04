//! scope.rs — Table de symboles à portées imbriquées.
//!
//! Pile de `HashMap` ; la portée globale (indice 0) n'est jamais dépilée.
//! La recherche va de la portée la plus interne vers la globale.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Nombre de portées ouvertes, globale comprise.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Définit `name` dans la portée courante.
    /// Renvoie `false` (sans écraser) si le nom y existe déjà.
    pub fn define(&mut self, name: impl Into<String>, value: T) -> bool {
        let Some(current) = self.scopes.last_mut() else {
            return false;
        };
        match current.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }
}
