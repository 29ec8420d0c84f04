//! lexer.rs — Analyse lexicale du langage Hinglish (.hp)
//!
//! - Commentaires : `# ...` jusqu'à fin de ligne.
//! - Mots-clés : `agar nahi_to jabtak karo vidhi wapas likho aur ya nahi`
//!   et les types `ank sankhya vakya akshar`.
//! - Littéraux : entiers, flottants (`3.14`, `5.`), chaînes `"..."`
//!   (échappes `\n \t \\ \"`), caractères `'x'` (échappes `\n \t \\ \'`).
//! - Opérateurs : `+ - * / % = == != < > <= >=`, délimiteurs `( ) { } ; ,`.
//!
//! Lignes et colonnes sont 1-based. Le flux se termine toujours par `Eof`.

use thiserror::Error;

/* ───────────────────────── Tokens ───────────────────────── */

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Mots-clés
    If,
    Else,
    While,
    For,
    Function,
    Return,
    Print,

    // Logiques
    And,
    Or,
    Not,

    // Types
    Int,
    Float,
    Str,
    Char,

    // Littéraux
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    CharLit(char),

    Ident(String),

    // Opérateurs
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    EqEq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,

    // Délimiteurs
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,

    Eof,
}

impl TokenKind {
    fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "agar" => Self::If,
            "nahi_to" => Self::Else,
            "jabtak" => Self::While,
            "karo" => Self::For,
            "vidhi" => Self::Function,
            "wapas" => Self::Return,
            "likho" => Self::Print,
            "aur" => Self::And,
            "ya" => Self::Or,
            "nahi" => Self::Not,
            "ank" => Self::Int,
            "sankhya" => Self::Float,
            "vakya" => Self::Str,
            "akshar" => Self::Char,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Texte source du token (valeur décodée pour chaînes/caractères).
    pub lexeme: String,
    pub line: u32,
    pub col: u32,
}

/* ───────────────────────── Erreurs lexing ───────────────────────── */

/// Erreur lexicale positionnée (1-based), affichée `[line N] ... (col C)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] {kind} (col {col})")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated character literal")]
    UnterminatedChar,
    #[error("Invalid character literal")]
    InvalidChar,
    /// Entier hors de la plage d'un `int` C 32 bits.
    #[error("Integer literal '{0}' out of range")]
    IntegerOverflow(String),
    /// Flottant qui ne tient pas dans un `double` fini.
    #[error("Float literal '{0}' out of range")]
    FloatOverflow(String),
}

impl LexErrorKind {
    fn at(self, line: u32, col: u32) -> LexError {
        LexError { kind: self, line, col }
    }
}

/* ───────────────────────── Lexer ───────────────────────── */

pub struct Lexer<'a> {
    it: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    col: u32,
}

/// Raccourci : tokenise toute la source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { it: source.chars().peekable(), line: 1, col: 1 }
    }

    /// Tokenise intégralement la source (dernier token : `Eof`).
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut out = Vec::new();
        loop {
            let tok = self.next_token()?;
            let eof = tok.kind == TokenKind::Eof;
            out.push(tok);
            if eof {
                break;
            }
        }
        log::trace!("lexer: {} token(s)", out.len());
        Ok(out)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_ws_and_comments();
        let (line, col) = (self.line, self.col);

        let Some(c) = self.bump() else {
            return Ok(Token { kind: TokenKind::Eof, lexeme: String::new(), line, col });
        };

        let simple = |kind: TokenKind, lexeme: &str| Token { kind, lexeme: lexeme.to_string(), line, col };
        let tok = match c {
            '+' => simple(TokenKind::Plus, "+"),
            '-' => simple(TokenKind::Minus, "-"),
            '*' => simple(TokenKind::Star, "*"),
            '/' => simple(TokenKind::Slash, "/"),
            '%' => simple(TokenKind::Percent, "%"),
            '(' => simple(TokenKind::LParen, "("),
            ')' => simple(TokenKind::RParen, ")"),
            '{' => simple(TokenKind::LBrace, "{"),
            '}' => simple(TokenKind::RBrace, "}"),
            ';' => simple(TokenKind::Semicolon, ";"),
            ',' => simple(TokenKind::Comma, ","),
            '=' if self.eat('=') => simple(TokenKind::EqEq, "=="),
            '=' => simple(TokenKind::Assign, "="),
            '!' if self.eat('=') => simple(TokenKind::NotEq, "!="),
            '<' if self.eat('=') => simple(TokenKind::Le, "<="),
            '<' => simple(TokenKind::Lt, "<"),
            '>' if self.eat('=') => simple(TokenKind::Ge, ">="),
            '>' => simple(TokenKind::Gt, ">"),
            '"' => {
                let s = self.read_string(line, col)?;
                Token { kind: TokenKind::StrLit(s.clone()), lexeme: s, line, col }
            }
            '\'' => {
                let ch = self.read_char(line, col)?;
                Token { kind: TokenKind::CharLit(ch), lexeme: ch.to_string(), line, col }
            }
            ch if ch.is_ascii_digit() => self.read_number(ch, line, col)?,
            ch if is_ident_start(ch) => {
                let ident = self.read_ident(ch);
                let kind = TokenKind::keyword(&ident).unwrap_or_else(|| TokenKind::Ident(ident.clone()));
                Token { kind, lexeme: ident, line, col }
            }
            ch => return Err(LexErrorKind::UnexpectedChar(ch).at(line, col)),
        };
        Ok(tok)
    }

    fn skip_ws_and_comments(&mut self) {
        while let Some(&ch) = self.it.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == '#' {
                while let Some(&c) = self.it.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, line: u32, col: u32) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    // `\\`, `\"` et toute autre échappe : caractère tel quel
                    Some(c) => s.push(c),
                    None => return Err(LexErrorKind::UnterminatedString.at(line, col)),
                },
                Some(c) => s.push(c),
                None => return Err(LexErrorKind::UnterminatedString.at(line, col)),
            }
        }
    }

    fn read_char(&mut self, line: u32, col: u32) -> Result<char, LexError> {
        let value = match self.bump() {
            Some('\'') => return Err(LexErrorKind::InvalidChar.at(line, col)),
            Some('\\') => match self.bump() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some(c) => c,
                None => return Err(LexErrorKind::UnterminatedChar.at(line, col)),
            },
            Some(c) => c,
            None => return Err(LexErrorKind::UnterminatedChar.at(line, col)),
        };
        match self.it.peek() {
            Some('\'') => {
                self.bump();
                Ok(value)
            }
            None | Some('\n') => Err(LexErrorKind::UnterminatedChar.at(line, col)),
            Some(_) => Err(LexErrorKind::InvalidChar.at(line, col)),
        }
    }

    fn read_number(&mut self, first: char, line: u32, col: u32) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(first);
        let mut is_float = false;
        while let Some(&ch) = self.it.peek() {
            if ch == '.' {
                // un second point termine le nombre
                if is_float {
                    break;
                }
                is_float = true;
            } else if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.bump();
        }

        let kind = if is_float {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => TokenKind::FloatLit(v),
                _ => return Err(LexErrorKind::FloatOverflow(text).at(line, col)),
            }
        } else {
            // `ank` est un `int` C
            match text.parse::<i32>() {
                Ok(v) => TokenKind::IntLit(i64::from(v)),
                Err(_) => return Err(LexErrorKind::IntegerOverflow(text).at(line, col)),
            }
        };
        Ok(Token { kind, lexeme: text, line, col })
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);
        while let Some(&ch) = self.it.peek() {
            if !is_ident_continue(ch) {
                break;
            }
            s.push(ch);
            self.bump();
        }
        s
    }

    fn eat(&mut self, want: char) -> bool {
        if self.it.peek() == Some(&want) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.it.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
