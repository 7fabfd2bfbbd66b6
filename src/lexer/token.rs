use logos::Logos;
use std::fmt;

/// Tokens of the target language. Keywords are case-insensitive; hyphenated
/// block terminators (`end-method`, `End-If`, ...) lex as single tokens
/// because the identifier rule cannot cross a `-`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Declarations
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("end-class", ignore(ascii_case))]
    EndClass,
    #[token("extends", ignore(ascii_case))]
    Extends,
    #[token("method", ignore(ascii_case))]
    Method,
    #[token("end-method", ignore(ascii_case))]
    EndMethod,
    #[token("get", ignore(ascii_case))]
    Get,
    #[token("end-get", ignore(ascii_case))]
    EndGet,
    #[token("set", ignore(ascii_case))]
    Set,
    #[token("end-set", ignore(ascii_case))]
    EndSet,
    #[token("property", ignore(ascii_case))]
    Property,
    #[token("instance", ignore(ascii_case))]
    Instance,
    #[token("constant", ignore(ascii_case))]
    Constant,
    #[token("import", ignore(ascii_case))]
    Import,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("end-function", ignore(ascii_case))]
    EndFunction,
    #[token("readonly", ignore(ascii_case))]
    ReadOnly,
    #[token("abstract", ignore(ascii_case))]
    Abstract,

    // Member section visibility
    #[token("public", ignore(ascii_case))]
    Public,
    #[token("protected", ignore(ascii_case))]
    Protected,
    #[token("private", ignore(ascii_case))]
    Private,

    // Statements
    #[token("local", ignore(ascii_case))]
    Local,
    #[token("if", ignore(ascii_case))]
    If,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("end-if", ignore(ascii_case))]
    EndIf,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("to", ignore(ascii_case))]
    To,
    #[token("step", ignore(ascii_case))]
    Step,
    #[token("end-for", ignore(ascii_case))]
    EndFor,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("end-while", ignore(ascii_case))]
    EndWhile,
    #[token("return", ignore(ascii_case))]
    Return,
    #[token("returns", ignore(ascii_case))]
    Returns,
    #[token("create", ignore(ascii_case))]
    Create,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("out", ignore(ascii_case))]
    Out,

    // Operators spelled as words
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,

    // Literals
    #[token("true", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    False,
    #[token("null", ignore(ascii_case))]
    Null,
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    NumberLit(f64),
    #[regex(r#""([^"]|"")*""#)]
    StringLit,

    // Names. User variables carry their `&` sigil in the lexeme; system
    // variables their `%`.
    #[regex(r"&[A-Za-z_][A-Za-z0-9_]*")]
    UserVar,
    #[regex(r"%[A-Za-z_][A-Za-z0-9_]*")]
    SystemVar,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Punctuation
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("<>")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("|")]
    Pipe,

    // Comments: classic block, nest-style annotation, and rem-to-semicolon.
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    #[regex(r"/\+[^+]*\++(?:[^/+][^+]*\++)*/")]
    #[regex(r"[rR][eE][mM][ \t][^;]*;")]
    Comment,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::Class => "'class'",
            Token::EndClass => "'end-class'",
            Token::Extends => "'extends'",
            Token::Method => "'method'",
            Token::EndMethod => "'end-method'",
            Token::Get => "'get'",
            Token::EndGet => "'end-get'",
            Token::Set => "'set'",
            Token::EndSet => "'end-set'",
            Token::Property => "'property'",
            Token::Instance => "'instance'",
            Token::Constant => "'constant'",
            Token::Import => "'import'",
            Token::Function => "'function'",
            Token::EndFunction => "'end-function'",
            Token::ReadOnly => "'readonly'",
            Token::Abstract => "'abstract'",
            Token::Public => "'public'",
            Token::Protected => "'protected'",
            Token::Private => "'private'",
            Token::Local => "'local'",
            Token::If => "'if'",
            Token::Then => "'then'",
            Token::Else => "'else'",
            Token::EndIf => "'end-if'",
            Token::For => "'for'",
            Token::To => "'to'",
            Token::Step => "'step'",
            Token::EndFor => "'end-for'",
            Token::While => "'while'",
            Token::EndWhile => "'end-while'",
            Token::Return => "'return'",
            Token::Returns => "'returns'",
            Token::Create => "'create'",
            Token::As => "'as'",
            Token::Out => "'out'",
            Token::And => "'and'",
            Token::Or => "'or'",
            Token::Not => "'not'",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::Null => "'null'",
            Token::NumberLit(_) => "number literal",
            Token::StringLit => "string literal",
            Token::UserVar => "variable",
            Token::SystemVar => "system variable",
            Token::Ident => "identifier",
            Token::Colon => "':'",
            Token::Semicolon => "';'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::Eq => "'='",
            Token::Ne => "'<>'",
            Token::Le => "'<='",
            Token::Ge => "'>='",
            Token::Lt => "'<'",
            Token::Gt => "'>'",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Pipe => "'|'",
            Token::Comment => "comment",
        };
        write!(f, "{s}")
    }
}
