//! Fixture scanner for C snippets.

use super::factories::TEST_ORIGIN;
use crate::token::{Token, TokenType};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[regex(r"#[ \t]*[A-Za-z]+[^\n]*")]
    Directive,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    Float,
    #[regex(r"(0[xX][0-9a-fA-F]+|[0-9]+)[uUlL]*")]
    Integer,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r"'([^'\\\n]|\\.)+'")]
    Character,

    #[token("(")]
    Lparen,
    #[token(")")]
    Rparen,
    #[token("{")]
    Lbrace,
    #[token("}")]
    Rbrace,
    #[token("[")]
    Lbrack,
    #[token("]")]
    Rbrack,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    #[token("=")]
    Eq,
    #[token("==")]
    Eqeq,
    #[token("!=")]
    Noteq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lteq,
    #[token(">=")]
    Gteq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Mult,
    #[token("/")]
    Div,
    #[token("%")]
    Mod,
    #[token("++")]
    Plusplus,
    #[token("--")]
    Minusminus,
    #[token("&")]
    And,
    #[token("&&")]
    Andand,
    #[token("|")]
    Or,
    #[token("||")]
    Oror,
    #[token("^")]
    Xor,
    #[token("!")]
    Not,
    #[token("~")]
    Comp,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("<<")]
    Lshift,
    #[token(">>")]
    Rshift,
}

impl Lexeme {
    fn token_type(self, text: &str) -> TokenType {
        match self {
            Lexeme::Directive => TokenType::PreprocessorDirective,
            Lexeme::BlockComment => TokenType::TraditionalComment,
            Lexeme::LineComment => TokenType::EndOfLineComment,
            Lexeme::Word => keyword(text).unwrap_or(TokenType::Identifier),
            Lexeme::Float => TokenType::FloatingPointLiteral,
            Lexeme::Integer => TokenType::IntegerLiteral,
            Lexeme::Str => TokenType::StringLiteral,
            Lexeme::Character => TokenType::CharacterLiteral,
            Lexeme::Lparen => TokenType::Lparen,
            Lexeme::Rparen => TokenType::Rparen,
            Lexeme::Lbrace => TokenType::Lbrace,
            Lexeme::Rbrace => TokenType::Rbrace,
            Lexeme::Lbrack => TokenType::Lbrack,
            Lexeme::Rbrack => TokenType::Rbrack,
            Lexeme::Semicolon => TokenType::Semicolon,
            Lexeme::Comma => TokenType::Comma,
            Lexeme::Dot => TokenType::Dot,
            Lexeme::Eq => TokenType::Eq,
            Lexeme::Eqeq => TokenType::Eqeq,
            Lexeme::Noteq => TokenType::Noteq,
            Lexeme::Lt => TokenType::Lt,
            Lexeme::Gt => TokenType::Gt,
            Lexeme::Lteq => TokenType::Lteq,
            Lexeme::Gteq => TokenType::Gteq,
            Lexeme::Plus => TokenType::Plus,
            Lexeme::Minus => TokenType::Minus,
            Lexeme::Mult => TokenType::Mult,
            Lexeme::Div => TokenType::Div,
            Lexeme::Mod => TokenType::Mod,
            Lexeme::Plusplus => TokenType::Plusplus,
            Lexeme::Minusminus => TokenType::Minusminus,
            Lexeme::And => TokenType::And,
            Lexeme::Andand => TokenType::Andand,
            Lexeme::Or => TokenType::Or,
            Lexeme::Oror => TokenType::Oror,
            Lexeme::Xor => TokenType::Xor,
            Lexeme::Not => TokenType::Not,
            Lexeme::Comp => TokenType::Comp,
            Lexeme::Question => TokenType::Question,
            Lexeme::Colon => TokenType::Colon,
            Lexeme::Arrow => TokenType::Arrow,
            Lexeme::Lshift => TokenType::Lshift,
            Lexeme::Rshift => TokenType::Rshift,
        }
    }
}

fn keyword(word: &str) -> Option<TokenType> {
    use TokenType::*;
    let token_type = match word {
        "auto" => Auto,
        "_Bool" | "bool" => Bool,
        "break" => Break,
        "case" => Case,
        "char" => Char,
        "const" => Const,
        "continue" => Continue,
        "default" => Default,
        "do" => Do,
        "double" => Double,
        "else" => Else,
        "enum" => Enum,
        "extern" => Extern,
        "float" => Float,
        "for" => For,
        "goto" => Goto,
        "if" => If,
        "inline" => Inline,
        "int" => Int,
        "long" => Long,
        "register" => Register,
        "restrict" => Restrict,
        "return" => Return,
        "short" => Short,
        "signed" => Signed,
        "sizeof" => Sizeof,
        "static" => Static,
        "struct" => Struct,
        "switch" => Switch,
        "typedef" => Typedef,
        "union" => Union,
        "unsigned" => Unsigned,
        "void" => Void,
        "volatile" => Volatile,
        "while" => While,
        _ => return None,
    };
    Some(token_type)
}

/// Scan a C snippet into tokens with origin [`TEST_ORIGIN`].
pub fn scan(source: &str) -> Vec<Token> {
    scan_origin(source, TEST_ORIGIN)
}

/// Scan a C snippet into tokens with the given origin.
///
/// Whitespace is skipped. Characters the scanner does not know become
/// `ILLEGAL_CHARACTER` tokens instead of being dropped.
pub fn scan_origin(source: &str, origin_id: &str) -> Vec<Token> {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(source.match_indices('\n').map(|(index, _)| index + 1))
        .collect();
    let line_of = |offset: usize| line_starts.partition_point(|&start| start <= offset);

    let mut lexer = Lexeme::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let token_type = match result {
            Ok(lexeme) => lexeme.token_type(text),
            Err(()) => TokenType::IllegalCharacter,
        };
        tokens.push(Token::new(
            token_type,
            text,
            span.start,
            span.end,
            line_of(span.start),
            origin_id,
        ));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{texts, types};

    #[test]
    fn test_scans_declaration() {
        let tokens = scan("static inline int f(void);");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Static,
                TokenType::Inline,
                TokenType::Int,
                TokenType::Identifier,
                TokenType::Lparen,
                TokenType::Void,
                TokenType::Rparen,
                TokenType::Semicolon,
            ]
        );
        assert_eq!(tokens[3].span(), 15..16);
    }

    #[test]
    fn test_directives_are_whole_lines() {
        let tokens = scan("#if defined(A)\nx;\n#endif\n");
        assert_eq!(texts(&tokens), vec!["#if defined(A)", "x", ";", "#endif"]);
        assert_eq!(tokens[0].token_type, TokenType::PreprocessorDirective);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_multi_character_operators() {
        let tokens = scan("p->x >= 1 && q");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::Identifier,
                TokenType::Arrow,
                TokenType::Identifier,
                TokenType::Gteq,
                TokenType::IntegerLiteral,
                TokenType::Andand,
                TokenType::Identifier,
            ]
        );
    }

    #[test]
    fn test_comments_and_literals() {
        let tokens = scan("/* c */ \"s\" 'c' 1.5f // tail");
        assert_eq!(
            types(&tokens),
            vec![
                TokenType::TraditionalComment,
                TokenType::StringLiteral,
                TokenType::CharacterLiteral,
                TokenType::FloatingPointLiteral,
                TokenType::EndOfLineComment,
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_kept() {
        let tokens = scan("a @ b");
        assert_eq!(tokens[1].token_type, TokenType::IllegalCharacter);
        assert_eq!(tokens[1].text, "@");
    }
}
