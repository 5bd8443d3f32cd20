use std::{error::Error, fmt};

use lazy_static::lazy_static;
use regex::Regex;

use crate::Span;

use super::ast::{AstProd, GrammarAst};

/// The various possible CNF grammar compilation errors. These only surface in
/// strict mode: lenient compilation reports the same conditions (bar
/// `NoStartRule`) as [`CnfGrammarWarning`]s and carries on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CnfGrammarErrorKind {
    MissingArrow,
    EmptyLhs,
    EmptyAlternative,
    NonCnfAlternative,
    NoStartRule,
}

/// Any error from the CNF grammar parser returns an instance of this struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CnfGrammarError {
    pub kind: CnfGrammarErrorKind,
    pub span: Span,
}

impl Error for CnfGrammarError {}

impl fmt::Display for CnfGrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for CnfGrammarErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            CnfGrammarErrorKind::MissingArrow => "Line has no '->'",
            CnfGrammarErrorKind::EmptyLhs => "Rule has an empty left-hand side",
            CnfGrammarErrorKind::EmptyAlternative => "Empty alternative",
            CnfGrammarErrorKind::NonCnfAlternative => {
                "Alternative is not a CNF production (expected one terminal or two variables)"
            }
            CnfGrammarErrorKind::NoStartRule => return write!(f, "No start rule specified"),
        };
        write!(f, "{}", s)
    }
}

/// The conditions lenient compilation skips over. Each warning names the
/// skipped fragment via its span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CnfGrammarWarningKind {
    MissingArrow,
    EmptyLhs,
    EmptyAlternative,
    NonCnfAlternative,
}

/// Lenient compilation never fails, but anything it could not classify is
/// reported as an instance of this struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CnfGrammarWarning {
    pub kind: CnfGrammarWarningKind,
    pub span: Span,
}

impl fmt::Display for CnfGrammarWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self.kind {
            CnfGrammarWarningKind::MissingArrow => "Line has no '->' and was skipped",
            CnfGrammarWarningKind::EmptyLhs => {
                "Rule has an empty left-hand side and was skipped"
            }
            CnfGrammarWarningKind::EmptyAlternative => "Empty alternative was dropped",
            CnfGrammarWarningKind::NonCnfAlternative => {
                "Alternative is not a CNF production and was dropped"
            }
        };
        write!(f, "{}", s)
    }
}

impl From<CnfGrammarWarning> for CnfGrammarError {
    fn from(w: CnfGrammarWarning) -> Self {
        let kind = match w.kind {
            CnfGrammarWarningKind::MissingArrow => CnfGrammarErrorKind::MissingArrow,
            CnfGrammarWarningKind::EmptyLhs => CnfGrammarErrorKind::EmptyLhs,
            CnfGrammarWarningKind::EmptyAlternative => CnfGrammarErrorKind::EmptyAlternative,
            CnfGrammarWarningKind::NonCnfAlternative => CnfGrammarErrorKind::NonCnfAlternative,
        };
        CnfGrammarError { kind, span: w.span }
    }
}

lazy_static! {
    static ref RE_LOWER_TERMINAL: Regex = Regex::new(r"^[a-z]$").unwrap();
    static ref RE_BINARY_SHORTHAND: Regex = Regex::new(r"^[A-Z][A-Z]$").unwrap();
}

/// The actual parser is intended to be entirely opaque from outside users:
/// the only entry points are `CnfGrammar`'s constructors.
pub(crate) struct CnfParser<'a> {
    src: &'a str,
    ast: GrammarAst,
    warnings: Vec<CnfGrammarWarning>,
}

impl<'a> CnfParser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        CnfParser {
            src,
            ast: GrammarAst::new(),
            warnings: Vec::new(),
        }
    }

    /// Parse one rule per non-empty line. Spans in warnings are byte offsets
    /// into `src`.
    pub(crate) fn parse(mut self) -> (GrammarAst, Vec<CnfGrammarWarning>) {
        let mut pos = 0;
        for raw in self.src.split('\n') {
            let line_start = pos;
            pos += raw.len() + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() {
                continue;
            }
            self.parse_line(line, line_start);
        }
        (self.ast, self.warnings)
    }

    fn parse_line(&mut self, line: &str, off: usize) {
        // A rule line splits on the first arrow, which may be ASCII or the
        // Unicode rightwards arrow.
        let (arrow_at, arrow_len) = match (line.find("->"), line.find('→')) {
            (Some(a), Some(u)) if u < a => (u, '→'.len_utf8()),
            (Some(a), _) => (a, "->".len()),
            (None, Some(u)) => (u, '→'.len_utf8()),
            (None, None) => {
                self.warn(
                    CnfGrammarWarningKind::MissingArrow,
                    Span::new(off, off + line.len()),
                );
                return;
            }
        };
        // The LHS is everything before the arrow with internal whitespace
        // stripped, so e.g. "N P -> ..." names the variable "NP".
        let lhs: String = line[..arrow_at].split_whitespace().collect();
        if lhs.is_empty() {
            self.warn(CnfGrammarWarningKind::EmptyLhs, Span::new(off, off + arrow_at));
            return;
        }
        if self.ast.start.is_none() {
            self.ast.start = Some((lhs.clone(), Span::new(off, off + arrow_at)));
        }
        self.ast.add_rule(&lhs);

        let mut alt_off = arrow_at + arrow_len;
        for alt in line[arrow_at + arrow_len..].split('|') {
            let trimmed = alt.trim();
            let tstart = alt_off + (alt.len() - alt.trim_start().len());
            let span = Span::new(off + tstart, off + tstart + trimmed.len());
            self.parse_alternative(&lhs, trimmed, span);
            alt_off += alt.len() + 1;
        }
    }

    fn parse_alternative(&mut self, lhs: &str, alt: &str, span: Span) {
        if alt.is_empty() {
            self.warn(CnfGrammarWarningKind::EmptyAlternative, span);
            return;
        }
        // Quoted form first: the quotes may enclose whitespace, so this must
        // be checked before splitting into symbols.
        if alt.len() >= 2 && alt.starts_with('"') && alt.ends_with('"') {
            self.ast
                .add_prod(lhs, AstProd::Terminal(alt[1..alt.len() - 1].to_owned()));
            return;
        }
        let syms = alt.split_whitespace().collect::<Vec<_>>();
        match *syms.as_slice() {
            [sym] => {
                if RE_LOWER_TERMINAL.is_match(sym) {
                    self.ast.add_prod(lhs, AstProd::Terminal(sym.to_owned()));
                } else if RE_BINARY_SHORTHAND.is_match(sym) {
                    // Compact shorthand: "AB" is the binary production A B.
                    self.ast.add_prod(
                        lhs,
                        AstProd::Binary(sym[..1].to_owned(), sym[1..].to_owned()),
                    );
                } else {
                    self.ast.add_prod(lhs, AstProd::Alias(sym.to_owned()));
                }
            }
            [l, r] => {
                self.ast
                    .add_prod(lhs, AstProd::Binary(l.to_owned(), r.to_owned()));
            }
            _ => self.warn(CnfGrammarWarningKind::NonCnfAlternative, span),
        }
    }

    fn warn(&mut self, kind: CnfGrammarWarningKind, span: Span) {
        self.warnings.push(CnfGrammarWarning { kind, span });
    }
}
