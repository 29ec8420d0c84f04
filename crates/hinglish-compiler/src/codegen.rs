//! codegen.rs — AST Hinglish → source C
//!
//! Sortie : en-têtes standard, puis les déclarations dans l'ordre source.
//! Indentation de 4 espaces par niveau, lignes jointes par `\n`, le texte
//! finit toujours par un saut de ligne.
//!
//! Le format de `printf` vient du type de l'expression affichée, calculé
//! ici à partir des variables déclarées et des types de retour connus.

use std::fmt::Write as _;

use crate::ast::{BinOp, Expr, Function, Literal, Program, Stmt, TypeName, UnaryOp};
use crate::scope::SymbolTable;
use crate::sema::Type;

const PRELUDE: [&str; 3] = ["#include <stdio.h>", "#include <stdlib.h>", "#include <string.h>"];
const INDENT: &str = "    ";

/// Génère le C d'un programme (supposé validé par [`crate::sema::analyze`]).
pub fn generate(program: &Program) -> String {
    CGenerator::default().generate(program)
}

#[derive(Default)]
pub struct CGenerator {
    lines: Vec<String>,
    level: usize,
    /// Types des variables et types de retour des fonctions déjà vues.
    types: SymbolTable<Type>,
}

impl CGenerator {
    pub fn generate(mut self, program: &Program) -> String {
        self.lines.extend(PRELUDE.iter().map(|s| (*s).to_string()));
        self.lines.push(String::new());

        for item in &program.items {
            self.stmt(item);
        }

        let mut out = self.lines.join("\n");
        if !out.ends_with('\n') {
            out.push('\n');
        }
        log::debug!("codegen: {} ligne(s) de C", out.lines().count());
        out
    }

    fn emit(&mut self, line: impl AsRef<str>) {
        let mut s = INDENT.repeat(self.level);
        s.push_str(line.as_ref());
        self.lines.push(s);
    }

    /* ───────────── Déclarations ───────────── */

    fn function(&mut self, func: &Function) {
        let ret = Type::of_return(func);
        self.types.define(&func.name, ret);

        let c_ret = if func.name == "main" { "int" } else { func.ret.map_or("void", TypeName::c_type) };
        let params = if func.params.is_empty() {
            "void".to_string()
        } else {
            func.params
                .iter()
                .map(|p| format!("{} {}", p.ty.c_type(), p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.emit(format!("{c_ret} {}({params}) {{", func.name));

        self.types.enter();
        for p in &func.params {
            self.types.define(&p.name, p.ty.into());
        }
        self.level += 1;
        for s in &func.body {
            self.stmt(s);
        }
        if func.name == "main" && !func.body.iter().any(|s| matches!(s, Stmt::Return(_))) {
            self.emit("return 0;");
        }
        self.level -= 1;
        self.types.exit();

        self.emit("}");
        self.lines.push(String::new());
    }

    fn var_decl(&mut self, ty: TypeName, name: &str, init: Option<&Expr>) -> String {
        let value = match init {
            Some(e) => self.expr(e),
            None => match ty {
                TypeName::Vakya => "\"\"".to_string(),
                TypeName::Akshar => "'\\0'".to_string(),
                TypeName::Ank | TypeName::Sankhya => "0".to_string(),
            },
        };
        self.types.define(name, ty.into());
        format!("{} {name} = {value}", ty.c_type())
    }

    /* ───────────── Instructions ───────────── */

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { ty, name, init } => {
                let decl = self.var_decl(*ty, name, init.as_ref());
                self.emit(format!("{decl};"));
            }
            Stmt::Function(func) => self.function(func),
            Stmt::Block(stmts) => {
                self.emit("{");
                self.scoped_body(stmts);
                self.emit("}");
            }
            Stmt::If { cond, then_branch, else_branch } => {
                let c = self.expr(cond);
                self.emit(format!("if ({c}) {{"));
                self.branch(then_branch);
                if let Some(e) = else_branch {
                    self.emit("} else {");
                    self.branch(e);
                }
                self.emit("}");
            }
            Stmt::While { cond, body } => {
                let c = self.expr(cond);
                self.emit(format!("while ({c}) {{"));
                self.branch(body);
                self.emit("}");
            }
            Stmt::For { init, cond, incr, body } => {
                self.types.enter();
                let init = match init.as_ref() {
                    Stmt::VarDecl { ty, name, init } => self.var_decl(*ty, name, init.as_ref()),
                    Stmt::Expr(e) => self.expr(e),
                    _ => String::new(),
                };
                let cond = cond.as_ref().map(|c| self.expr(c)).unwrap_or_default();
                let incr = incr.as_ref().map(|i| self.expr(i)).unwrap_or_default();
                self.emit(format!("for ({init}; {cond}; {incr}) {{"));
                self.branch(body);
                self.emit("}");
                self.types.exit();
            }
            Stmt::Print(e) => {
                let spec = printf_spec(self.type_of(e));
                let value = self.expr(e);
                self.emit(format!("printf(\"{spec}\\n\", {value});"));
            }
            Stmt::Return(Some(e)) => {
                let value = self.expr(e);
                self.emit(format!("return {value};"));
            }
            Stmt::Return(None) => self.emit("return;"),
            Stmt::Expr(e) => {
                let value = self.expr(e);
                self.emit(format!("{value};"));
            }
        }
    }

    /// Corps d'un `if`/`while`/`for` : un bloc est déplié, sinon une seule instruction.
    fn branch(&mut self, body: &Stmt) {
        match body {
            Stmt::Block(stmts) => self.scoped_body(stmts),
            other => {
                self.level += 1;
                self.stmt(other);
                self.level -= 1;
            }
        }
    }

    fn scoped_body(&mut self, stmts: &[Stmt]) {
        self.types.enter();
        self.level += 1;
        for s in stmts {
            self.stmt(s);
        }
        self.level -= 1;
        self.types.exit();
    }

    /* ───────────── Expressions ───────────── */

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => literal(lit),
            Expr::Variable(name) => name.clone(),
            Expr::Assign { name, value } => format!("{name} = {}", self.expr(value)),
            Expr::Binary { op, lhs, rhs } => {
                format!("({} {} {})", self.expr(lhs), op.symbol(), self.expr(rhs))
            }
            Expr::Logical { op, lhs, rhs } => {
                format!("({} {} {})", self.expr(lhs), op.c_symbol(), self.expr(rhs))
            }
            Expr::Unary { op, rhs } => {
                let sym = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                };
                format!("({sym}{})", self.expr(rhs))
            }
            Expr::Grouping(inner) => format!("({})", self.expr(inner)),
            Expr::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                format!("{}({})", self.expr(callee), args.join(", "))
            }
        }
    }

    fn type_of(&self, expr: &Expr) -> Type {
        match expr {
            Expr::Literal(lit) => Type::of_literal(lit),
            Expr::Variable(name) | Expr::Assign { name, .. } => {
                self.types.lookup(name).copied().unwrap_or(Type::Unknown)
            }
            Expr::Binary { op, .. } if op.is_comparison() => Type::Boolean,
            Expr::Binary { op, lhs, rhs } => {
                let (l, r) = (self.type_of(lhs), self.type_of(rhs));
                if *op == BinOp::Add && (l == Type::Vakya || r == Type::Vakya) {
                    Type::Vakya
                } else if l == Type::Sankhya || r == Type::Sankhya {
                    Type::Sankhya
                } else {
                    Type::Ank
                }
            }
            Expr::Logical { .. } | Expr::Unary { op: UnaryOp::Not, .. } => Type::Boolean,
            Expr::Unary { rhs, .. } | Expr::Grouping(rhs) => self.type_of(rhs),
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Variable(name) => self.types.lookup(name).copied().unwrap_or(Type::Unknown),
                _ => Type::Unknown,
            },
        }
    }
}

fn printf_spec(ty: Type) -> &'static str {
    match ty {
        Type::Sankhya => "%f",
        Type::Vakya => "%s",
        Type::Akshar => "%c",
        Type::Ank | Type::Boolean | Type::Void | Type::Unknown => "%d",
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        // `{:?}` garde toujours le point décimal (`5.0`)
        // toujours fini : le lexer rejette les flottants hors plage
        Literal::Float(x) => format!("{x:?}"),
        Literal::Str(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            for c in s.chars() {
                escape_into(&mut out, c, '"');
            }
            out.push('"');
            out
        }
        Literal::Char(c) => {
            let mut out = String::from("'");
            escape_into(&mut out, *c, '\'');
            out.push('\'');
            out
        }
    }
}

/// Échappement C ; `quote` est le délimiteur du littéral en cours.
fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        // octal sur 3 chiffres : ne « mange » pas les caractères suivants
        c if c.is_ascii_control() => {
            let _ = write!(out, "\\{:03o}", c as u32);
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::parse};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn gen(src: &str) -> String {
        generate(&parse(tokenize(src).expect("lex")).expect("parse"))
    }

    #[test]
    fn empty_program_is_only_the_prelude() {
        assert_eq!(gen(""), "#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n");
    }

    #[test]
    fn main_gets_implicit_return() {
        let c = gen("vidhi main() { likho(1); }");
        assert!(c.contains(indoc! {"
            int main(void) {
                printf(\"%d\\n\", 1);
                return 0;
            }
        "}));
    }

    #[test]
    fn printf_format_follows_types() {
        let c = gen(indoc! {r#"
            vidhi main() {
                sankhya f = 1.5;
                vakya s;
                akshar c;
                likho(f);
                likho(s);
                likho(c);
                likho(f + 1);
                likho(1 < 2);
            }
        "#});
        assert!(c.contains("    float f = 1.5;"));
        assert!(c.contains("    char* s = \"\";"));
        assert!(c.contains("    char c = '\\0';"));
        assert!(c.contains("printf(\"%f\\n\", f);"));
        assert!(c.contains("printf(\"%s\\n\", s);"));
        assert!(c.contains("printf(\"%c\\n\", c);"));
        assert!(c.contains("printf(\"%f\\n\", (f + 1));"));
        assert!(c.contains("printf(\"%d\\n\", (1 < 2));"));
    }

    #[test]
    fn call_result_uses_declared_return_type() {
        let c = gen("vidhi half(ank n) sankhya { wapas n / 2.0; }\nvidhi main() { likho(half(3)); }");
        assert!(c.contains("float half(int n) {"));
        assert!(c.contains("printf(\"%f\\n\", half(3));"));
    }

    #[test]
    fn strings_and_chars_are_escaped() {
        let c = gen(r#"vidhi main() { likho("say \"hi\"\n"); akshar q = '\''; }"#);
        assert!(c.contains(r#"printf("%s\n", "say \"hi\"\n");"#));
        assert!(c.contains(r"char q = '\'';"));
    }

    #[test]
    fn else_and_logical_operators() {
        let c = gen("vidhi main() { agar (1 < 2 aur nahi (2 < 1)) likho(1); nahi_to { likho(2); } }");
        let expected = concat!(
            "    if (((1 < 2) && (!((2 < 1))))) {\n",
            "        printf(\"%d\\n\", 1);\n",
            "    } else {\n",
            "        printf(\"%d\\n\", 2);\n",
            "    }\n",
        );
        assert!(c.contains(expected), "{c}");
    }

    #[test]
    fn void_function_and_while() {
        let c = gen("vidhi tick(ank n) { jabtak (n > 0) { n = n - 1; } wapas; }");
        assert_eq!(
            c,
            indoc! {"
                #include <stdio.h>
                #include <stdlib.h>
                #include <string.h>

                void tick(int n) {
                    while ((n > 0)) {
                        n = (n - 1);
                    }
                    return;
                }
            "}
        );
    }
}
