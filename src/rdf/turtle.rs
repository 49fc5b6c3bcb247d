//! Turtle format (RDF 1.1).
//!
//! Human-readable RDF serialization with prefix support.
//!
//! Reference: <https://www.w3.org/TR/turtle/>
//!
//! Example:
//! ```turtle
//! @prefix ex: <http://example.org/misinfo#> .
//!
//! ex:article_0 a ex:Article ;
//!     ex:hasLabel ex:label_REAL ;
//!     ex:title "Senate passes bill"^^xsd:string .
//! ```
//!
//! The reader covers what the writer emits plus the common variants other
//! tools produce (`PREFIX`, `,` object lists, long strings, language tags).
//! Blank nodes, collections and numeric shorthand are rejected.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};
use std::sync::OnceLock;

use crate::error::{KgError, Result};
use crate::graph::{Graph, Literal, Namespace, Term, Triple, RDF_NS, RDF_TYPE, XSD_NS};

/// Turtle format handler.
pub struct Turtle;

impl Turtle {
    /// Write a graph in Turtle.
    ///
    /// Statements are grouped by subject; subjects and their predicate/object
    /// pairs come out in sorted order with `rdf:type` first, so the same graph
    /// always produces the same bytes.
    pub fn write<W: Write>(graph: &Graph, ns: &Namespace, mut writer: W) -> Result<()> {
        let prefixes = prefixes_for(ns);
        for (prefix, uri) in &prefixes {
            writeln!(writer, "@prefix {}: <{}> .", prefix, uri)?;
        }
        writeln!(writer)?;

        let mut by_subject: BTreeMap<&str, Vec<&Triple>> = BTreeMap::new();
        for triple in graph {
            by_subject.entry(triple.subject.as_str()).or_default().push(triple);
        }

        for (subject, mut triples) in by_subject {
            triples.sort_by_key(|t| t.predicate != RDF_TYPE);

            write!(writer, "{}", format_iri(subject, &prefixes))?;
            for (i, triple) in triples.iter().enumerate() {
                let pred = if triple.predicate == RDF_TYPE {
                    "a".to_string()
                } else {
                    format_iri(&triple.predicate, &prefixes)
                };
                let obj = format_term(&triple.object, &prefixes);

                if i == 0 {
                    write!(writer, " {} {}", pred, obj)?;
                } else {
                    write!(writer, " ;\n    {} {}", pred, obj)?;
                }
            }
            writeln!(writer, " .")?;
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Convert to string.
    pub fn to_string(graph: &Graph, ns: &Namespace) -> Result<String> {
        let mut buf = Vec::new();
        Self::write(graph, ns, &mut buf)?;
        String::from_utf8(buf).map_err(|e| KgError::Parse(format!("non UTF-8 Turtle output: {}", e)))
    }

    /// Parse Turtle from a reader.
    pub fn read<R: Read>(mut reader: R) -> Result<Graph> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse_str(&input)
    }

    /// Parse Turtle from a string.
    pub fn parse_str(input: &str) -> Result<Graph> {
        Parser::new(input).parse()
    }
}

fn prefixes_for(ns: &Namespace) -> Vec<(String, String)> {
    vec![
        (ns.prefix().to_string(), ns.base().to_string()),
        ("rdf".to_string(), RDF_NS.to_string()),
        ("xsd".to_string(), XSD_NS.to_string()),
    ]
}

/// Format an IRI, compacting with prefixes if possible.
fn format_iri(iri: &str, prefixes: &[(String, String)]) -> String {
    for (prefix, base) in prefixes {
        if let Some(local) = iri.strip_prefix(base.as_str()) {
            if is_valid_local_name(local) {
                return format!("{}:{}", prefix, local);
            }
        }
    }
    format!("<{}>", iri)
}

/// Conservative subset of PN_LOCAL: no dots, colons or percent escapes.
fn is_valid_local_name(s: &str) -> bool {
    static LOCAL_NAME: OnceLock<Regex> = OnceLock::new();
    LOCAL_NAME
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").expect("Invalid regex pattern"))
        .is_match(s)
}

fn format_term(term: &Term, prefixes: &[(String, String)]) -> String {
    match term {
        Term::Iri(iri) => format_iri(iri, prefixes),
        Term::Literal(lit) => {
            let quoted = format!("\"{}\"", escape_string(&lit.lexical));
            match (&lit.language, &lit.datatype) {
                (Some(lang), _) => format!("{}@{}", quoted, lang),
                (None, Some(dt)) => format!("{}^^{}", quoted, format_iri(dt, prefixes)),
                (None, None) => quoted,
            }
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    IriRef(String),
    PrefixedName { prefix: String, local: String },
    Str(String),
    LangTag(String),
    DatatypeMarker,
    A,
    PrefixDirective,
    SparqlPrefix,
    Dot,
    Semicolon,
    Comma,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, msg: impl AsRef<str>) -> KgError {
        KgError::Parse(format!("Turtle line {}: {}", self.line, msg.as_ref()))
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia();
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            '<' => self.iri_ref()?,
            '"' | '\'' => self.string()?,
            '@' => {
                self.bump();
                let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
                if word.is_empty() {
                    return Err(self.error("expected directive or language tag after '@'"));
                } else if word == "prefix" {
                    Token::PrefixDirective
                } else {
                    Token::LangTag(word)
                }
            }
            '^' => {
                self.bump();
                if self.bump() != Some('^') {
                    return Err(self.error("expected '^^'"));
                }
                Token::DatatypeMarker
            }
            '.' => {
                self.bump();
                Token::Dot
            }
            ';' => {
                self.bump();
                Token::Semicolon
            }
            ',' => {
                self.bump();
                Token::Comma
            }
            '[' | '(' | '_' => return Err(self.error("blank nodes and collections are not supported")),
            c if c.is_ascii_digit() || c == '+' || c == '-' => {
                return Err(self.error("numeric literals are not supported"))
            }
            c if c.is_alphabetic() || c == ':' => self.name()?,
            other => return Err(self.error(format!("unexpected character '{}'", other))),
        };
        Ok(Some(token))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn iri_ref(&mut self) -> Result<Token> {
        self.bump();
        let mut iri = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(Token::IriRef(iri)),
                Some('\n') | None => return Err(self.error("unterminated IRI")),
                Some(c) => iri.push(c),
            }
        }
    }

    fn name(&mut self) -> Result<Token> {
        let mut word = self.take_while(|c| {
            c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '%')
        });
        // A trailing '.' terminates the statement rather than belonging to the name
        while word.ends_with('.') {
            word.pop();
            self.pos -= 1;
        }

        if let Some((prefix, local)) = word.split_once(':') {
            return Ok(Token::PrefixedName {
                prefix: prefix.to_string(),
                local: local.to_string(),
            });
        }
        if word == "a" {
            return Ok(Token::A);
        }
        if word.eq_ignore_ascii_case("prefix") {
            return Ok(Token::SparqlPrefix);
        }
        Err(self.error(format!("unsupported keyword '{}'", word)))
    }

    fn string(&mut self) -> Result<Token> {
        let quote = self.bump().ok_or_else(|| self.error("unexpected end of input"))?;
        let long = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if long {
            self.bump();
            self.bump();
        }

        let mut value = String::new();
        loop {
            if long
                && self.peek() == Some(quote)
                && self.peek_at(1) == Some(quote)
                && self.peek_at(2) == Some(quote)
            {
                self.pos += 3;
                return Ok(Token::Str(value));
            }
            match self.bump() {
                None => return Err(self.error("unterminated string literal")),
                Some('\\') => value.push(self.escape()?),
                Some(c) if c == quote && !long => return Ok(Token::Str(value)),
                Some('\n') if !long => return Err(self.error("newline in short string literal")),
                Some(c) => value.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char> {
        let c = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
        let escaped = match c {
            't' => '\t',
            'b' => '\u{8}',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{c}',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            'u' => self.unicode_escape(4)?,
            'U' => self.unicode_escape(8)?,
            other => return Err(self.error(format!("invalid escape '\\{}'", other))),
        };
        Ok(escaped)
    }

    fn unicode_escape(&mut self, digits: usize) -> Result<char> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(self.error("invalid unicode escape")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid code point U+{}", hex)))
    }
}

struct Parser {
    lexer: Lexer,
    lookahead: Option<Token>,
    prefixes: HashMap<String, String>,
    graph: Graph,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: None,
            prefixes: HashMap::new(),
            graph: Graph::new(),
        }
    }

    fn peek(&mut self) -> Result<Option<Token>> {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next_token()?;
        }
        Ok(self.lookahead.clone())
    }

    fn next(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.lookahead.take() {
            return Ok(Some(token));
        }
        self.lexer.next_token()
    }

    fn expect_next(&mut self, expected: &str) -> Result<Token> {
        self.next()?
            .ok_or_else(|| self.lexer.error(format!("unexpected end of input, expected {}", expected)))
    }

    fn unexpected(&self, token: &Token, expected: &str) -> KgError {
        self.lexer.error(format!("unexpected {:?}, expected {}", token, expected))
    }

    fn parse(mut self) -> Result<Graph> {
        while let Some(token) = self.next()? {
            match token {
                Token::PrefixDirective => {
                    self.prefix_decl()?;
                    match self.expect_next("'.'")? {
                        Token::Dot => {}
                        other => return Err(self.unexpected(&other, "'.'")),
                    }
                }
                Token::SparqlPrefix => self.prefix_decl()?,
                Token::IriRef(_) | Token::PrefixedName { .. } => {
                    let subject = self.resolve(token)?;
                    self.predicate_object_list(&subject)?;
                }
                other => return Err(self.unexpected(&other, "a directive or subject")),
            }
        }
        Ok(self.graph)
    }

    fn prefix_decl(&mut self) -> Result<()> {
        let prefix = match self.expect_next("prefix name")? {
            Token::PrefixedName { prefix, local } if local.is_empty() => prefix,
            other => return Err(self.unexpected(&other, "prefix name")),
        };
        let iri = match self.expect_next("IRI")? {
            Token::IriRef(iri) => iri,
            other => return Err(self.unexpected(&other, "IRI")),
        };
        self.prefixes.insert(prefix, iri);
        Ok(())
    }

    fn predicate_object_list(&mut self, subject: &str) -> Result<()> {
        loop {
            let predicate = match self.expect_next("predicate")? {
                Token::A => RDF_TYPE.to_string(),
                token @ (Token::IriRef(_) | Token::PrefixedName { .. }) => self.resolve(token)?,
                other => return Err(self.unexpected(&other, "predicate")),
            };

            loop {
                let object = self.object()?;
                self.graph.insert(Triple::new(subject, predicate.clone(), object));
                match self.expect_next("',', ';' or '.'")? {
                    Token::Comma => continue,
                    Token::Semicolon => break,
                    Token::Dot => return Ok(()),
                    other => return Err(self.unexpected(&other, "',', ';' or '.'")),
                }
            }

            // Repeated or trailing ';' before the closing '.'
            loop {
                match self.peek()? {
                    Some(Token::Semicolon) => {
                        self.next()?;
                    }
                    Some(Token::Dot) => {
                        self.next()?;
                        return Ok(());
                    }
                    _ => break,
                }
            }
        }
    }

    fn object(&mut self) -> Result<Term> {
        match self.expect_next("object")? {
            token @ (Token::IriRef(_) | Token::PrefixedName { .. }) => Ok(Term::Iri(self.resolve(token)?)),
            Token::Str(lexical) => {
                let literal = match self.peek()? {
                    Some(Token::DatatypeMarker) => {
                        self.next()?;
                        let datatype = match self.expect_next("datatype IRI")? {
                            token @ (Token::IriRef(_) | Token::PrefixedName { .. }) => self.resolve(token)?,
                            other => return Err(self.unexpected(&other, "datatype IRI")),
                        };
                        Literal { lexical, datatype: Some(datatype), language: None }
                    }
                    Some(Token::LangTag(lang)) => {
                        self.next()?;
                        Literal { lexical, datatype: None, language: Some(lang) }
                    }
                    // A simple literal is an xsd:string
                    _ => Literal::string(lexical),
                };
                Ok(Term::Literal(literal))
            }
            other => Err(self.unexpected(&other, "object")),
        }
    }

    fn resolve(&self, token: Token) -> Result<String> {
        match token {
            Token::IriRef(iri) => Ok(iri),
            Token::PrefixedName { prefix, local } => match self.prefixes.get(&prefix) {
                Some(base) => Ok(format!("{}{}", base, local)),
                None => Err(self.lexer.error(format!("undefined prefix '{}:'", prefix))),
            },
            other => Err(self.unexpected(&other, "IRI")),
        }
    }
}
