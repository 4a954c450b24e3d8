//! Reader for the host's graph script format.
//!
//! Only the subset the host exports is understood: graph construction,
//! `create_pass`/`add_edge`/`mark_output` calls and literal dictionaries.
//! Everything else is tokenized and skipped.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use super::{GraphOp, GraphScript, ScriptError};
use crate::value::{ConfigValue, PassConfig};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    /// Numeric literal text; sign and type are resolved by the value parser.
    Number(String),
    Punct(char),
}

/// One logical statement: physical lines joined across open brackets.
#[derive(Debug)]
struct Statement {
    line: usize,
    tokens: Vec<Token>,
}

fn syntax(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Syntax {
        line,
        message: message.into(),
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    depth: usize,
    statements: Vec<Statement>,
    current: Vec<Token>,
    current_line: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            depth: 0,
            statements: Vec::new(),
            current: Vec::new(),
            current_line: 1,
        }
    }

    fn push(&mut self, token: Token) {
        if self.current.is_empty() {
            self.current_line = self.line;
        }
        self.current.push(token);
    }

    fn end_statement(&mut self) {
        if !self.current.is_empty() {
            self.statements.push(Statement {
                line: self.current_line,
                tokens: std::mem::take(&mut self.current),
            });
        }
    }

    fn run(mut self) -> Result<Vec<Statement>, ScriptError> {
        while let Some(c) = self.chars.next() {
            match c {
                '\n' => {
                    if self.depth == 0 {
                        self.end_statement();
                    }
                    self.line += 1;
                }
                ';' if self.depth == 0 => self.end_statement(),
                '#' => {
                    while self.chars.next_if(|&c| c != '\n').is_some() {}
                }
                '\\' if self.chars.peek() == Some(&'\n') => {
                    self.chars.next();
                    self.line += 1;
                }
                c if c.is_whitespace() => {}
                '\'' | '"' => {
                    let s = self.string(c)?;
                    self.push(Token::Str(s));
                }
                c if c.is_ascii_digit()
                    || (c == '.' && self.chars.peek().is_some_and(char::is_ascii_digit)) =>
                {
                    let n = self.number(c);
                    self.push(Token::Number(n));
                }
                c if c.is_alphabetic() || c == '_' => {
                    let mut ident = String::from(c);
                    while let Some(c) = self.chars.next_if(|&c| c.is_alphanumeric() || c == '_')
                    {
                        ident.push(c);
                    }
                    self.push(Token::Ident(ident));
                }
                '(' | '[' | '{' => {
                    self.depth += 1;
                    self.push(Token::Punct(c));
                }
                ')' | ']' | '}' => {
                    if self.depth == 0 {
                        return Err(syntax(self.line, format!("unmatched '{c}'")));
                    }
                    self.depth -= 1;
                    self.push(Token::Punct(c));
                }
                c => self.push(Token::Punct(c)),
            }
        }

        if self.depth > 0 {
            return Err(syntax(self.current_line, "unclosed bracket"));
        }
        self.end_statement();
        Ok(self.statements)
    }

    fn string(&mut self, quote: char) -> Result<String, ScriptError> {
        let start = self.line;
        let mut s = String::new();
        loop {
            match self.chars.next() {
                None | Some('\n') => return Err(syntax(start, "unterminated string")),
                Some(c) if c == quote => return Ok(s),
                Some('\\') => match self.chars.next() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => s.push(c),
                    Some('\n') => self.line += 1,
                    Some(c) => {
                        s.push('\\');
                        s.push(c);
                    }
                    None => return Err(syntax(start, "unterminated string")),
                },
                Some(c) => s.push(c),
            }
        }
    }

    fn number(&mut self, first: char) -> String {
        let mut n = String::from(first);
        while let Some(c) = self
            .chars
            .next_if(|&c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            n.push(c);
            if matches!(c, 'e' | 'E') {
                if let Some(sign) = self.chars.next_if(|&c| c == '+' || c == '-') {
                    n.push(sign);
                }
            }
        }
        n
    }
}

/// Cursor over the tokens of a single statement.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ScriptError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        syntax(self.line, message)
    }

    fn finish(&self) -> Result<(), ScriptError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("unexpected {}", describe(token)))),
        }
    }

    /// Comma separated arguments up to the closing parenthesis. The opening
    /// parenthesis has already been consumed.
    fn arguments(&mut self) -> Result<Vec<Argument>, ScriptError> {
        let mut args = Vec::new();
        while !self.eat(')') {
            args.push(self.argument()?);
            if !self.eat(',') {
                self.expect(')')?;
                break;
            }
        }
        Ok(args)
    }

    fn argument(&mut self) -> Result<Argument, ScriptError> {
        if self.eat('{') {
            return self.dictionary().map(Argument::Dict);
        }
        self.value().map(Argument::Value)
    }

    fn dictionary(&mut self) -> Result<PassConfig, ScriptError> {
        let mut config = PassConfig::new();
        while !self.eat('}') {
            let key = match self.next() {
                Some(Token::Str(key)) => key.clone(),
                Some(token) => {
                    return Err(self.error(format!(
                        "dictionary keys must be strings, found {}",
                        describe(token)
                    )))
                }
                None => return Err(self.error("unterminated dictionary")),
            };
            self.expect(':')?;
            let value = self.value()?;
            // Repeated keys keep the first position and the last value.
            config.insert(key, value);
            if !self.eat(',') {
                self.expect('}')?;
                break;
            }
        }
        Ok(config)
    }

    fn value(&mut self) -> Result<ConfigValue, ScriptError> {
        let sign = match self.peek() {
            Some(Token::Punct(c @ ('-' | '+'))) => {
                self.pos += 1;
                Some(*c)
            }
            _ => None,
        };

        match (self.next(), sign) {
            (Some(Token::Number(text)), sign) => self.number(text, sign == Some('-')),
            (Some(Token::Ident(ident)), None) if ident == "True" => Ok(ConfigValue::Bool(true)),
            (Some(Token::Ident(ident)), None) if ident == "False" => Ok(ConfigValue::Bool(false)),
            (Some(Token::Str(s)), None) => Ok(ConfigValue::Enum(s.clone())),
            (Some(token), _) => Err(self.error(format!("unsupported value {}", describe(token)))),
            (None, _) => Err(self.error("expected a value")),
        }
    }

    fn number(&self, text: &str, negative: bool) -> Result<ConfigValue, ScriptError> {
        let mut literal = String::with_capacity(text.len() + 1);
        if negative {
            literal.push('-');
        }
        literal.extend(text.chars().filter(|&c| c != '_'));

        if text.contains(['.', 'e', 'E']) {
            literal
                .parse::<f64>()
                .map(ConfigValue::Float)
                .map_err(|_| self.error(format!("invalid float literal '{text}'")))
        } else {
            literal
                .parse::<i64>()
                .map(ConfigValue::Int)
                .map_err(|_| self.error(format!("invalid integer literal '{text}'")))
        }
    }
}

enum Argument {
    Value(ConfigValue),
    Dict(PassConfig),
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) => format!("'{s}'"),
        Token::Str(s) => format!("string '{s}'"),
        Token::Number(s) => format!("number {s}"),
        Token::Punct(c) => format!("'{c}'"),
    }
}

fn string_argument(
    args: &mut std::vec::IntoIter<Argument>,
    what: &str,
    cursor: &Cursor<'_>,
) -> Result<String, ScriptError> {
    match args.next() {
        Some(Argument::Value(ConfigValue::Enum(s))) => Ok(s),
        Some(_) => Err(cursor.error(format!("{what} must be a string"))),
        None => Err(cursor.error(format!("missing {what}"))),
    }
}

fn no_more_arguments(
    args: &mut std::vec::IntoIter<Argument>,
    method: &str,
    cursor: &Cursor<'_>,
) -> Result<(), ScriptError> {
    if args.next().is_some() {
        Err(cursor.error(format!("too many arguments to {method}")))
    } else {
        Ok(())
    }
}

fn graph_op(method: &str, cursor: &mut Cursor<'_>) -> Result<GraphOp, ScriptError> {
    let line = cursor.line;
    let supported = matches!(method, "create_pass" | "add_edge" | "mark_output");
    if !supported {
        return Err(ScriptError::UnsupportedOperation {
            line,
            method: method.to_string(),
        });
    }

    let mut args = cursor.arguments()?.into_iter();
    cursor.finish()?;

    let op = match method {
        "create_pass" => {
            let name = string_argument(&mut args, "pass name", cursor)?;
            let pass_type = string_argument(&mut args, "pass type", cursor)?;
            let config = match args.next() {
                None => PassConfig::new(),
                Some(Argument::Dict(config)) => config,
                Some(Argument::Value(_)) => {
                    return Err(cursor.error("pass configuration must be a dictionary"))
                }
            };
            GraphOp::CreatePass {
                name,
                pass_type,
                config,
            }
        }
        "add_edge" => {
            let src = string_argument(&mut args, "edge source", cursor)?;
            let dst = string_argument(&mut args, "edge destination", cursor)?;
            GraphOp::AddEdge { src, dst }
        }
        _ => {
            let port = string_argument(&mut args, "output port", cursor)?;
            GraphOp::MarkOutput { port }
        }
    };
    no_more_arguments(&mut args, method, cursor)?;
    Ok(op)
}

fn graph_name(cursor: &mut Cursor<'_>) -> Result<String, ScriptError> {
    let mut args = cursor.arguments()?.into_iter();
    cursor.finish()?;
    let name = string_argument(&mut args, "graph name", cursor)?;
    no_more_arguments(&mut args, "RenderGraph", cursor)?;
    Ok(name)
}

pub(super) fn parse_scripts(source: &str) -> Result<Vec<GraphScript>, ScriptError> {
    let statements = Lexer::new(source).run()?;

    let mut scripts: Vec<GraphScript> = Vec::new();
    // Variable name -> index in `scripts`.
    let mut bindings: HashMap<String, usize> = HashMap::new();

    for statement in &statements {
        let line = statement.line;
        match statement.tokens.as_slice() {
            [Token::Ident(var), Token::Punct('='), Token::Ident(ctor), Token::Punct('('), rest @ ..]
                if ctor == "RenderGraph" =>
            {
                let name = graph_name(&mut Cursor::new(rest, line))?;
                log::debug!("line {line}: graph '{name}' bound to '{var}'");
                bindings.insert(var.clone(), scripts.len());
                scripts.push(GraphScript::new(name));
            }
            [Token::Ident(var), Token::Punct('.'), Token::Ident(method), Token::Punct('('), rest @ ..]
                if bindings.contains_key(var) =>
            {
                let index = bindings[var];
                let op = graph_op(method, &mut Cursor::new(rest, line))?;
                scripts[index].ops.push(op);
            }
            [Token::Ident(var), Token::Punct('='), next, ..] if next != &Token::Punct('=') => {
                if bindings.remove(var).is_some() {
                    log::trace!("line {line}: '{var}' no longer names a graph");
                }
            }
            _ => log::trace!("line {line}: statement ignored"),
        }
    }

    Ok(scripts)
}
