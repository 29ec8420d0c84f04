//! parser.rs — Descente récursive Hinglish → AST
//!
//! Précédences (de la plus faible à la plus forte) :
//!   assignation (droite) < `ya` < `aur` < `== !=` < `< > <= >=` < `+ -`
//!   < `* / %` < unaires `- nahi` < appel `f(...)` < primaire.
//!
//! La première erreur interrompt l'analyse (pas de resynchronisation).

use thiserror::Error;

use crate::ast::{BinOp, Expr, Function, Literal, LogicalOp, Param, Program, Stmt, TypeName, UnaryOp};
use crate::lexer::{Token, TokenKind};

/// Nombre maximal de paramètres (et d'arguments d'appel).
pub const MAX_ARITY: usize = 255;

/// Profondeur maximale d'imbrication (instructions et expressions confondues).
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error at '{lexeme}': {message}")]
pub struct ParseError {
    pub line: u32,
    pub col: u32,
    pub lexeme: String,
    pub message: String,
}

type PResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// Raccourci : analyse un flux de tokens complet.
pub fn parse(tokens: Vec<Token>) -> PResult<Program> {
    Parser::new(tokens).parse()
}

impl Parser {
    /// `tokens` doit se terminer par `Eof` (c'est le cas de [`crate::lexer::tokenize`]).
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let (line, col) = tokens.last().map_or((1, 1), |t| (t.line, t.col));
            tokens.push(Token { kind: TokenKind::Eof, lexeme: String::new(), line, col });
        }
        Self { tokens, pos: 0, depth: 0 }
    }

    pub fn parse(mut self) -> PResult<Program> {
        let mut items = Vec::new();
        while !self.is_at_end() {
            items.push(self.declaration()?);
        }
        log::trace!("parser: {} déclaration(s) de tête", items.len());
        Ok(Program { items })
    }

    /* ───────────── Déclarations ───────────── */

    fn declaration(&mut self) -> PResult<Stmt> {
        self.nested("Statement", |p| {
            if let Some(ty) = p.match_type() {
                return p.var_declaration(ty);
            }
            if p.matches(&TokenKind::Function) {
                return p.function().map(Stmt::Function);
            }
            p.statement()
        })
    }

    fn var_declaration(&mut self, ty: TypeName) -> PResult<Stmt> {
        let name = self.consume_ident("Expect variable name.")?;
        let init = if self.matches(&TokenKind::Assign) { Some(self.expression()?) } else { None };
        self.consume(&TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::VarDecl { ty, name, init })
    }

    fn function(&mut self) -> PResult<Function> {
        let name = self.consume_ident("Expect function name.")?;
        self.consume(&TokenKind::LParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                if params.len() >= MAX_ARITY {
                    return Err(self.error_at_peek("Can't have more than 255 parameters."));
                }
                let ty = self
                    .match_type()
                    .ok_or_else(|| self.error_at_peek("Expect parameter type."))?;
                let name = self.consume_ident("Expect parameter name.")?;
                params.push(Param { ty, name });
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(&TokenKind::RParen, "Expect ')' after parameters.")?;

        // type de retour facultatif
        let ret = self.match_type();

        self.consume(&TokenKind::LBrace, "Expect '{' before function body.")?;
        let body = self.block()?;
        Ok(Function { name, params, ret, body })
    }

    /* ───────────── Instructions ───────────── */

    fn statement(&mut self) -> PResult<Stmt> {
        self.nested("Statement", |p| {
            if p.matches(&TokenKind::If) {
                return p.if_statement();
            }
            if p.matches(&TokenKind::While) {
                return p.while_statement();
            }
            if p.matches(&TokenKind::For) {
                return p.for_statement();
            }
            if p.matches(&TokenKind::Print) {
                return p.print_statement();
            }
            if p.matches(&TokenKind::Return) {
                return p.return_statement();
            }
            if p.matches(&TokenKind::LBrace) {
                return p.block().map(Stmt::Block);
            }
            p.expression_statement()
        })
    }

    fn print_statement(&mut self) -> PResult<Stmt> {
        self.consume(&TokenKind::LParen, "Expect '(' after 'likho'.")?;
        let expr = self.expression()?;
        self.consume(&TokenKind::RParen, "Expect ')' after expression.")?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after print statement.")?;
        Ok(Stmt::Print(expr))
    }

    fn if_statement(&mut self) -> PResult<Stmt> {
        self.consume(&TokenKind::LParen, "Expect '(' after 'agar'.")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RParen, "Expect ')' after if condition.")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&TokenKind::Else) { Some(Box::new(self.statement()?)) } else { None };
        Ok(Stmt::If { cond, then_branch, else_branch })
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        self.consume(&TokenKind::LParen, "Expect '(' after 'jabtak'.")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RParen, "Expect ')' after while condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { cond, body })
    }

    fn for_statement(&mut self) -> PResult<Stmt> {
        self.consume(&TokenKind::LParen, "Expect '(' after 'karo'.")?;

        // initialisation : déclaration ou expression (consomme le ';')
        let init = match self.match_type() {
            Some(ty) => self.var_declaration(ty)?,
            None => self.expression_statement()?,
        };

        let cond = if self.check(&TokenKind::Semicolon) { None } else { Some(self.expression()?) };
        self.consume(&TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let incr = if self.check(&TokenKind::RParen) { None } else { Some(self.expression()?) };
        self.consume(&TokenKind::RParen, "Expect ')' after for clauses.")?;

        let body = Box::new(self.statement()?);
        Ok(Stmt::For { init: Box::new(init), cond, incr, body })
    }

    fn return_statement(&mut self) -> PResult<Stmt> {
        let value = if self.check(&TokenKind::Semicolon) { None } else { Some(self.expression()?) };
        self.consume(&TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(value))
    }

    fn expression_statement(&mut self) -> PResult<Stmt> {
        let expr = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expr(expr))
    }

    /// Corps de bloc, `{` déjà consommée.
    fn block(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.declaration()?);
        }
        self.consume(&TokenKind::RBrace, "Expect '}' after block.")?;
        Ok(stmts)
    }

    /* ───────────── Expressions ───────────── */

    fn expression(&mut self) -> PResult<Expr> {
        self.nested("Expression", Self::assignment)
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let expr = self.logical_or()?;
        if self.matches(&TokenKind::Assign) {
            let equals = self.previous().clone();
            let value = self.nested("Expression", Self::assignment)?;
            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign { name, value: Box::new(value) }),
                _ => Err(Self::error_at(&equals, "Invalid assignment target.")),
            };
        }
        Ok(expr)
    }

    fn logical_or(&mut self) -> PResult<Expr> {
        let mut expr = self.logical_and()?;
        let mut chained = 0;
        while self.matches(&TokenKind::Or) {
            self.descend("Expression")?;
            chained += 1;
            let rhs = self.logical_and()?;
            expr = Expr::Logical { op: LogicalOp::Or, lhs: Box::new(expr), rhs: Box::new(rhs) };
        }
        self.depth -= chained;
        Ok(expr)
    }

    fn logical_and(&mut self) -> PResult<Expr> {
        let mut expr = self.equality()?;
        let mut chained = 0;
        while self.matches(&TokenKind::And) {
            self.descend("Expression")?;
            chained += 1;
            let rhs = self.equality()?;
            expr = Expr::Logical { op: LogicalOp::And, lhs: Box::new(expr), rhs: Box::new(rhs) };
        }
        self.depth -= chained;
        Ok(expr)
    }

    fn equality(&mut self) -> PResult<Expr> {
        self.binary_level(Self::comparison, |k| match k {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::Ne),
            _ => None,
        })
    }

    fn comparison(&mut self) -> PResult<Expr> {
        self.binary_level(Self::term, |k| match k {
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Ge => Some(BinOp::Ge),
            _ => None,
        })
    }

    fn term(&mut self) -> PResult<Expr> {
        self.binary_level(Self::factor, |k| match k {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    fn factor(&mut self) -> PResult<Expr> {
        self.binary_level(Self::unary, |k| match k {
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Mod),
            _ => None,
        })
    }

    /// Niveau binaire gauche-associatif : `next (op next)*`.
    /// Chaque opérateur enchaîné compte comme un niveau d'imbrication.
    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> PResult<Expr>,
        op_of: fn(&TokenKind) -> Option<BinOp>,
    ) -> PResult<Expr> {
        let mut expr = next(self)?;
        let mut chained = 0;
        while let Some(op) = op_of(&self.peek().kind) {
            self.advance();
            self.descend("Expression")?;
            chained += 1;
            let rhs = next(self)?;
            expr = Expr::Binary { op, lhs: Box::new(expr), rhs: Box::new(rhs) };
        }
        self.depth -= chained;
        Ok(expr)
    }

    fn unary(&mut self) -> PResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.call(),
        };
        self.advance();
        let rhs = self.nested("Expression", Self::unary)?;
        Ok(Expr::Unary { op, rhs: Box::new(rhs) })
    }

    fn call(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;
        let mut chained = 0;
        while self.matches(&TokenKind::LParen) {
            self.descend("Expression")?;
            chained += 1;
            expr = self.finish_call(expr)?;
        }
        self.depth -= chained;
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> PResult<Expr> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                if args.len() >= MAX_ARITY {
                    return Err(self.error_at_peek("Can't have more than 255 arguments."));
                }
                args.push(self.expression()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(&TokenKind::RParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call { callee: Box::new(callee), args })
    }

    fn primary(&mut self) -> PResult<Expr> {
        let lit = match &self.peek().kind {
            TokenKind::IntLit(n) => Some(Literal::Int(*n)),
            TokenKind::FloatLit(x) => Some(Literal::Float(*x)),
            TokenKind::StrLit(s) => Some(Literal::Str(s.clone())),
            TokenKind::CharLit(c) => Some(Literal::Char(*c)),
            _ => None,
        };
        if let Some(lit) = lit {
            self.advance();
            return Ok(Expr::Literal(lit));
        }
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            return Ok(Expr::Variable(name));
        }
        if self.matches(&TokenKind::LParen) {
            let expr = self.expression()?;
            self.consume(&TokenKind::RParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        if self.peek().kind == TokenKind::Print {
            return Err(self.error_at_peek("Unexpected 'likho'. Did you mean to use it as a statement?"));
        }
        Err(self.error_at_peek("Expect expression."))
    }

    /* ───────────── Utilitaires ───────────── */

    /// Un niveau d'imbrication de plus ; au-delà de `MAX_DEPTH`, erreur sur le token courant.
    /// Une erreur abandonne l'analyse, le compteur n'est donc pas restauré dans ce cas.
    fn descend(&mut self, what: &str) -> PResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at_peek(&format!("{what} nested too deeply.")));
        }
        self.depth += 1;
        Ok(())
    }

    fn nested<T>(&mut self, what: &str, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.descend(what)?;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn match_type(&mut self) -> Option<TypeName> {
        let ty = match self.peek().kind {
            TokenKind::Int => TypeName::Ank,
            TokenKind::Float => TypeName::Sankhya,
            TokenKind::Str => TypeName::Vakya,
            TokenKind::Char => TypeName::Akshar,
            _ => return None,
        };
        self.advance();
        Some(ty)
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn consume(&mut self, kind: &TokenKind, message: &str) -> PResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error_at_peek(message))
    }

    fn consume_ident(&mut self, message: &str) -> PResult<String> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(self.error_at_peek(message))
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        // `new` garantit un `Eof` final, sur lequel `advance` s'arrête.
        &self.tokens[self.pos]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn error_at_peek(&self, message: &str) -> ParseError {
        Self::error_at(self.peek(), message)
    }

    fn error_at(token: &Token, message: &str) -> ParseError {
        ParseError {
            line: token.line,
            col: token.col,
            lexeme: token.lexeme.clone(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_src(src: &str) -> PResult<Program> {
        parse(tokenize(src).expect("lex"))
    }

    fn render(src: &str) -> String {
        parse_src(src).expect("parse").to_string()
    }

    #[test]
    fn precedence_mul_over_add() {
        assert_eq!(
            render("x = 1 + 2 * 3;"),
            "Program([ExprStmt(Assign(x, Binary(Literal(1), +, Binary(Literal(2), *, Literal(3)))))])"
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            render("a - b - c;"),
            "Program([ExprStmt(Binary(Binary(Variable(a), -, Variable(b)), -, Variable(c)))])"
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(
            render("a = b = 2;"),
            "Program([ExprStmt(Assign(a, Assign(b, Literal(2))))])"
        );
    }

    #[test]
    fn logical_and_binds_tighter_than_or() {
        assert_eq!(
            render("a ya b aur c;"),
            "Program([ExprStmt(Logical(Variable(a), ya, Logical(Variable(b), aur, Variable(c))))])"
        );
    }

    #[test]
    fn nested_unary_and_calls() {
        assert_eq!(
            render("likho(-f(1, g(2)));"),
            "Program([Print(Unary(-, Call(Variable(f), [Literal(1), Call(Variable(g), [Literal(2)])])))])"
        );
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let out = render("agar (a) agar (b) likho(1); nahi_to likho(2);");
        assert_eq!(
            out,
            "Program([If(Variable(a), If(Variable(b), Print(Literal(1)), Print(Literal(2))), None)])"
        );
    }

    #[test]
    fn function_without_return_type() {
        assert_eq!(render("vidhi f() { }"), "Program([FuncDecl(f, [], None, Block([]))])");
    }

    #[test]
    fn invalid_assignment_target() {
        let err = parse_src("1 = 2;").unwrap_err();
        assert_eq!(err.message, "Invalid assignment target.");
        assert_eq!(err.lexeme, "=");
    }

    #[test]
    fn missing_semicolon_reports_line() {
        let err = parse_src("ank x = 5\nank y = 6;").unwrap_err();
        assert_eq!(err.to_string(), "[line 2] Error at 'ank': Expect ';' after variable declaration.");
    }

    #[test]
    fn deeply_nested_parentheses_are_rejected() {
        let n = 200_000;
        let src = format!("likho({}1{});", "(".repeat(n), ")".repeat(n));
        let err = parse_src(&src).unwrap_err();
        assert_eq!(err.to_string(), "[line 1] Error at '(': Expression nested too deeply.");
    }

    #[test]
    fn nesting_limit_covers_unary_chains_and_blocks() {
        let err = parse_src(&format!("ank x = {}1;", "-".repeat(10_000))).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply.");
        assert_eq!(err.lexeme, "-");

        let err = parse_src(&format!("{}{}", "{".repeat(10_000), "}".repeat(10_000))).unwrap_err();
        assert_eq!(err.message, "Statement nested too deeply.");

        let sum = vec!["1"; 5_000].join(" + ");
        let err = parse_src(&format!("likho({sum});")).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply.");
    }

    #[test]
    fn moderate_nesting_still_parses() {
        let src = format!("likho({}1{});", "(".repeat(50), ")".repeat(50));
        assert!(parse_src(&src).is_ok());
        let sum = vec!["1"; 100].join(" + ");
        assert!(parse_src(&format!("{{ {{ likho({sum}); }} }}")).is_ok());
    }

    #[test]
    fn likho_inside_expression_gets_a_hint() {
        let err = parse_src("ank x = likho;").unwrap_err();
        assert_eq!(err.message, "Unexpected 'likho'. Did you mean to use it as a statement?");
    }

    #[test]
    fn unclosed_block() {
        let err = parse_src("vidhi main() { likho(1);").unwrap_err();
        assert_eq!(err.message, "Expect '}' after block.");
    }

    #[test]
    fn too_many_parameters() {
        let params: Vec<String> = (0..256).map(|i| format!("ank p{i}")).collect();
        let src = format!("vidhi f({}) {{ }}", params.join(", "));
        let err = parse_src(&src).unwrap_err();
        assert_eq!(err.message, "Can't have more than 255 parameters.");
    }

    #[test]
    fn for_loop_without_condition_or_increment() {
        assert_eq!(
            render("karo (ank i = 0; ; ) likho(i);"),
            "Program([For(VarDecl(ank, i, Literal(0)), None, None, Print(Variable(i)))])"
        );
    }
}
