//! sema.rs — Analyse sémantique (portées + types)
//!
//! Parcourt l'AST une fois, collecte toutes les erreurs (pas d'arrêt à la
//! première). Un sous-terme de type `unknown` (nom non défini, erreur déjà
//! signalée) est compatible avec tout, ce qui évite les cascades.

use std::fmt;

use crate::ast::{BinOp, Expr, Function, Literal, Program, Stmt, TypeName, UnaryOp};
use crate::diagnostics::Diagnostic;
use crate::scope::SymbolTable;

/* ───────────────────────── Types ───────────────────────── */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Ank,
    Sankhya,
    Vakya,
    Akshar,
    Boolean,
    Void,
    Unknown,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Ank | Self::Sankhya)
    }

    /// Une valeur de type `self` peut-elle aller dans un emplacement `target` ?
    /// Égalité, ou élargissement `ank` → `sankhya`.
    pub fn assignable_to(self, target: Type) -> bool {
        self == target
            || (self == Self::Ank && target == Self::Sankhya)
            || self == Self::Unknown
            || target == Self::Unknown
    }

    /// Type de retour d'une fonction déclarée (`main` sans type → `ank`).
    pub fn of_return(func: &Function) -> Type {
        match func.ret {
            Some(t) => t.into(),
            None if func.name == "main" => Self::Ank,
            None => Self::Void,
        }
    }

    pub fn of_literal(lit: &Literal) -> Type {
        match lit {
            Literal::Int(_) => Self::Ank,
            Literal::Float(_) => Self::Sankhya,
            Literal::Str(_) => Self::Vakya,
            Literal::Char(_) => Self::Akshar,
        }
    }
}

impl From<TypeName> for Type {
    fn from(t: TypeName) -> Self {
        match t {
            TypeName::Ank => Self::Ank,
            TypeName::Sankhya => Self::Sankhya,
            TypeName::Vakya => Self::Vakya,
            TypeName::Akshar => Self::Akshar,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ank => "ank",
            Self::Sankhya => "sankhya",
            Self::Vakya => "vakya",
            Self::Akshar => "akshar",
            Self::Boolean => "boolean",
            Self::Void => "void",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Variable(Type),
    Function { ret: Type, params: Vec<Type> },
}

/* ───────────────────────── Résultat ───────────────────────── */

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub errors: Vec<Diagnostic>,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Analyse un programme complet.
pub fn analyze(program: &Program) -> Analysis {
    let mut a = Analyzer::default();
    for stmt in &program.items {
        a.stmt(stmt);
    }
    log::debug!("sema: {} erreur(s)", a.errors.len());
    Analysis { errors: a.errors }
}

/* ───────────────────────── Analyseur ───────────────────────── */

#[derive(Default)]
struct Analyzer {
    table: SymbolTable<Symbol>,
    /// Type de retour de la fonction en cours d'analyse.
    current_ret: Option<Type>,
    errors: Vec<Diagnostic>,
}

impl Analyzer {
    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(Diagnostic::error(msg));
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { ty, name, init } => self.var_decl((*ty).into(), name, init.as_ref()),
            Stmt::Function(func) => self.function(func),
            Stmt::Block(stmts) => {
                self.table.enter();
                self.stmts(stmts);
                self.table.exit();
            }
            Stmt::If { cond, then_branch, else_branch } => {
                self.condition(cond, "if");
                self.stmt(then_branch);
                if let Some(e) = else_branch {
                    self.stmt(e);
                }
            }
            Stmt::While { cond, body } => {
                self.condition(cond, "while");
                self.stmt(body);
            }
            Stmt::For { init, cond, incr, body } => {
                self.table.enter();
                self.stmt(init);
                if let Some(c) = cond {
                    self.condition(c, "for");
                }
                if let Some(i) = incr {
                    self.expr(i);
                }
                self.stmt(body);
                self.table.exit();
            }
            Stmt::Print(e) => {
                if self.expr(e) == Type::Void {
                    self.error("Cannot print a void value");
                }
            }
            Stmt::Expr(e) => {
                self.expr(e);
            }
            Stmt::Return(value) => self.ret(value.as_ref()),
        }
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for s in stmts {
            self.stmt(s);
        }
    }

    fn var_decl(&mut self, ty: Type, name: &str, init: Option<&Expr>) {
        // l'initialiseur est évalué avant que le nom n'existe
        if let Some(e) = init {
            let got = self.expr(e);
            if !got.assignable_to(ty) {
                self.error(format!("Cannot assign {got} to variable '{name}' of type {ty}"));
            }
        }
        if !self.table.define(name, Symbol::Variable(ty)) {
            self.error(format!("Variable '{name}' is already defined in this scope"));
        }
    }

    fn function(&mut self, func: &Function) {
        let ret = Type::of_return(func);
        let params: Vec<Type> = func.params.iter().map(|p| p.ty.into()).collect();

        // défini avant le corps : la récursion fonctionne
        if !self.table.define(&func.name, Symbol::Function { ret, params: params.clone() }) {
            self.error(format!("Function '{}' is already defined in this scope", func.name));
        }

        self.table.enter();
        for (p, ty) in func.params.iter().zip(params) {
            if !self.table.define(&p.name, Symbol::Variable(ty)) {
                self.error(format!("Parameter '{}' is already defined in '{}'", p.name, func.name));
            }
        }
        let saved = self.current_ret.replace(ret);

        self.table.enter();
        self.stmts(&func.body);
        self.table.exit();

        self.current_ret = saved;
        self.table.exit();
    }

    fn condition(&mut self, cond: &Expr, what: &str) {
        let t = self.expr(cond);
        if t != Type::Boolean && t != Type::Unknown {
            self.error(format!("Condition in {what} statement must be a boolean expression"));
        }
    }

    fn ret(&mut self, value: Option<&Expr>) {
        let got = value.map(|e| self.expr(e));
        let Some(expected) = self.current_ret else {
            self.error("Return statement outside of function");
            return;
        };
        match (expected, got) {
            (Type::Void, Some(_)) => self.error("Cannot return a value from a void function"),
            (Type::Void, None) => {}
            (t, None) => self.error(format!("Function must return a value of type {t}")),
            (t, Some(g)) if !g.assignable_to(t) => {
                self.error(format!("Return type mismatch: expected {t}, got {g}"));
            }
            _ => {}
        }
    }

    /* ───────────── Expressions ───────────── */

    fn expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Literal(lit) => Type::of_literal(lit),
            Expr::Variable(name) => match self.table.lookup(name) {
                Some(Symbol::Variable(t)) => *t,
                Some(Symbol::Function { .. }) => Type::Unknown,
                None => {
                    self.error(format!("Variable '{name}' is not defined"));
                    Type::Unknown
                }
            },
            Expr::Assign { name, value } => {
                let got = self.expr(value);
                match self.table.lookup(name) {
                    Some(Symbol::Variable(t)) => {
                        let t = *t;
                        if !got.assignable_to(t) {
                            self.error(format!("Cannot assign {got} to variable '{name}' of type {t}"));
                        }
                        t
                    }
                    Some(Symbol::Function { .. }) => {
                        self.error(format!("Cannot assign to function '{name}'"));
                        Type::Unknown
                    }
                    None => {
                        self.error(format!("Variable '{name}' is not defined"));
                        Type::Unknown
                    }
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = self.expr(lhs);
                let r = self.expr(rhs);
                self.binary(*op, l, r)
            }
            Expr::Logical { lhs, rhs, .. } => {
                let l = self.expr(lhs);
                let r = self.expr(rhs);
                let ok = |t: Type| t == Type::Boolean || t == Type::Unknown;
                if !ok(l) || !ok(r) {
                    self.error("Logical operators require boolean operands");
                }
                Type::Boolean
            }
            Expr::Unary { op, rhs } => {
                let t = self.expr(rhs);
                match op {
                    UnaryOp::Neg if t.is_numeric() || t == Type::Unknown => t,
                    UnaryOp::Neg => {
                        self.error("Unary '-' requires numeric operand");
                        Type::Unknown
                    }
                    UnaryOp::Not => {
                        if t != Type::Boolean && t != Type::Unknown {
                            self.error("Unary 'nahi' requires boolean operand");
                        }
                        Type::Boolean
                    }
                }
            }
            Expr::Grouping(inner) => self.expr(inner),
            Expr::Call { callee, args } => self.call(callee, args),
        }
    }

    fn binary(&mut self, op: BinOp, l: Type, r: Type) -> Type {
        if op.is_comparison() {
            if !l.assignable_to(r) && !r.assignable_to(l) {
                self.error(format!("Cannot compare {l} with {r}"));
            }
            return Type::Boolean;
        }
        if op == BinOp::Add && (l == Type::Vakya || r == Type::Vakya) {
            return Type::Vakya;
        }
        let numeric = |t: Type| t.is_numeric() || t == Type::Unknown;
        if !numeric(l) || !numeric(r) {
            self.error(format!("Operator '{}' requires numeric operands", op.symbol()));
            return Type::Unknown;
        }
        if op == BinOp::Mod && (l == Type::Sankhya || r == Type::Sankhya) {
            self.error("Operator '%' requires ank operands");
            return Type::Unknown;
        }
        match (l, r) {
            (Type::Unknown, _) | (_, Type::Unknown) => Type::Unknown,
            (Type::Sankhya, _) | (_, Type::Sankhya) => Type::Sankhya,
            _ => Type::Ank,
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr]) -> Type {
        let arg_types: Vec<Type> = args.iter().map(|a| self.expr(a)).collect();

        let Expr::Variable(name) = callee else {
            self.expr(callee);
            self.error("Cannot call a non-function value");
            return Type::Unknown;
        };

        let (ret, params) = match self.table.lookup(name) {
            Some(Symbol::Function { ret, params }) => (*ret, params.clone()),
            Some(Symbol::Variable(_)) => {
                self.error(format!("'{name}' is not a function"));
                return Type::Unknown;
            }
            None => {
                self.error(format!("Function '{name}' is not defined"));
                return Type::Unknown;
            }
        };

        if params.len() != arg_types.len() {
            self.error(format!(
                "Function '{name}' expects {} argument(s), got {}",
                params.len(),
                arg_types.len()
            ));
        } else {
            for (k, (got, want)) in arg_types.iter().zip(&params).enumerate() {
                if !got.assignable_to(*want) {
                    self.error(format!("Argument {} of '{name}': expected {want}, got {got}", k + 1));
                }
            }
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::parse};

    fn errors(src: &str) -> Vec<String> {
        let program = parse(tokenize(src).expect("lex")).expect("parse");
        analyze(&program).errors.into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn widening_int_to_float_is_allowed() {
        assert!(errors("sankhya x = 5;").is_empty());
        assert_eq!(errors("ank x = 2.5;"), ["Cannot assign sankhya to variable 'x' of type ank"]);
    }

    #[test]
    fn redefinition_in_same_scope() {
        assert_eq!(errors("ank x = 1; ank x = 2;"), ["Variable 'x' is already defined in this scope"]);
        assert!(errors("ank x = 1; { ank x = 2; }").is_empty());
    }

    #[test]
    fn recursion_sees_its_own_signature() {
        assert!(errors("vidhi f(ank n) ank { wapas f(n - 1); }").is_empty());
    }

    #[test]
    fn void_calls_cannot_be_printed() {
        assert_eq!(errors("vidhi f() { } vidhi main() { likho(f()); }"), ["Cannot print a void value"]);
        assert!(errors("vidhi f() { } vidhi main() { f(); }").is_empty());
        assert!(errors("vidhi f() ank { wapas 1; } vidhi main() { likho(f()); }").is_empty());
    }

    #[test]
    fn return_rules() {
        assert_eq!(errors("wapas 1;"), ["Return statement outside of function"]);
        assert_eq!(errors("vidhi f() { wapas 1; }"), ["Cannot return a value from a void function"]);
        assert_eq!(errors("vidhi f() ank { wapas; }"), ["Function must return a value of type ank"]);
        assert_eq!(
            errors("vidhi f() ank { wapas \"s\"; }"),
            ["Return type mismatch: expected ank, got vakya"]
        );
        assert!(errors("vidhi main() { wapas 0; }").is_empty());
    }

    #[test]
    fn call_arity_and_argument_types() {
        let src = "vidhi f(ank a, vakya b) ank { wapas a; }\n";
        assert!(errors(&format!("{src}f(1, \"x\");")).is_empty());
        assert_eq!(errors(&format!("{src}f(1);")), ["Function 'f' expects 2 argument(s), got 1"]);
        assert_eq!(errors(&format!("{src}f(1, 2);")), ["Argument 2 of 'f': expected vakya, got ank"]);
    }

    #[test]
    fn calling_a_variable_or_unknown_name() {
        assert_eq!(errors("ank x = 1; x();"), ["'x' is not a function"]);
        assert_eq!(errors("g();"), ["Function 'g' is not defined"]);
        assert_eq!(errors("(1)(2);"), ["Cannot call a non-function value"]);
    }

    #[test]
    fn undefined_variable_does_not_cascade() {
        assert_eq!(errors("ank y = nope + 1;"), ["Variable 'nope' is not defined"]);
    }

    #[test]
    fn string_concatenation_yields_vakya() {
        assert!(errors("vakya s = \"a\" + 1;").is_empty());
        assert_eq!(errors("ank n = \"a\" + 1;"), ["Cannot assign vakya to variable 'n' of type ank"]);
    }

    #[test]
    fn unary_operand_rules() {
        assert_eq!(errors("ank x = -\"s\";"), ["Unary '-' requires numeric operand"]);
        assert_eq!(errors("agar (nahi 1) { }"), ["Unary 'nahi' requires boolean operand"]);
    }

    #[test]
    fn modulo_on_floats_is_rejected() {
        assert_eq!(errors("sankhya x = 2.5 % 2;"), ["Operator '%' requires ank operands"]);
    }

    #[test]
    fn for_scope_ends_with_the_loop() {
        assert_eq!(
            errors("karo (ank i = 0; i < 3; i = i + 1) { } likho(i);"),
            ["Variable 'i' is not defined"]
        );
    }
}
