//! Token classifications
//!
//!     `TokenType` is the fine-grained variant a scanner assigns to every token, `TokenClass`
//!     the coarse grouping it belongs to. Both are closed enums whose names are the
//!     SCREAMING_SNAKE_CASE spelling used in pattern expressions (`<STATIC>`, `<KEYWORD>`)
//!     and in serialized token lists. Name resolution goes through `FromStr`, generated once
//!     by `strum`, so an unknown name is a plain `Err` rather than a runtime lookup.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Coarse grouping of token types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenClass {
    Keyword,
    Identifier,
    Literal,
    Operator,
    Delimiter,
    Comment,
    Special,
    Whitespace,
    Error,
}

/// Fine-grained token variant as produced by a C-family scanner.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    // Keywords
    Auto,
    Bool,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,

    // Identifiers
    Identifier,

    // Literals
    IntegerLiteral,
    FloatingPointLiteral,
    CharacterLiteral,
    StringLiteral,

    // Delimiters
    Lparen,
    Rparen,
    Lbrace,
    Rbrace,
    Lbrack,
    Rbrack,
    Semicolon,
    Comma,
    Dot,

    // Operators
    Eq,
    Eqeq,
    Noteq,
    Lt,
    Gt,
    Lteq,
    Gteq,
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Plusplus,
    Minusminus,
    And,
    Andand,
    Or,
    Oror,
    Xor,
    Not,
    Comp,
    Question,
    Colon,
    Arrow,
    Lshift,
    Rshift,

    // Comments
    TraditionalComment,
    EndOfLineComment,
    DocumentationComment,

    // Special
    PreprocessorDirective,
    Eol,
    Sentinel,

    // Errors
    IllegalCharacter,
    UnterminatedStringLiteral,
}

impl TokenType {
    /// The coarse class this variant belongs to.
    pub fn class(self) -> TokenClass {
        use TokenType::*;
        match self {
            Auto | Bool | Break | Case | Char | Const | Continue | Default | Do | Double
            | Else | Enum | Extern | Float | For | Goto | If | Inline | Int | Long
            | Register | Restrict | Return | Short | Signed | Sizeof | Static | Struct
            | Switch | Typedef | Union | Unsigned | Void | Volatile | While => {
                TokenClass::Keyword
            }
            Identifier => TokenClass::Identifier,
            IntegerLiteral | FloatingPointLiteral | CharacterLiteral | StringLiteral => {
                TokenClass::Literal
            }
            Lparen | Rparen | Lbrace | Rbrace | Lbrack | Rbrack | Semicolon | Comma | Dot => {
                TokenClass::Delimiter
            }
            Eq | Eqeq | Noteq | Lt | Gt | Lteq | Gteq | Plus | Minus | Mult | Div | Mod
            | Plusplus | Minusminus | And | Andand | Or | Oror | Xor | Not | Comp
            | Question | Colon | Arrow | Lshift | Rshift => TokenClass::Operator,
            TraditionalComment | EndOfLineComment | DocumentationComment => {
                TokenClass::Comment
            }
            PreprocessorDirective | Sentinel => TokenClass::Special,
            Eol => TokenClass::Whitespace,
            IllegalCharacter | UnterminatedStringLiteral => TokenClass::Error,
        }
    }

    /// Pattern/serialization name, e.g. `PREPROCESSOR_DIRECTIVE`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl TokenClass {
    /// Pattern/serialization name, e.g. `KEYWORD`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}
