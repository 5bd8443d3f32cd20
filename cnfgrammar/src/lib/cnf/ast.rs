use indexmap::{IndexMap, IndexSet};

use crate::Span;

/// An AST representing a CNF grammar. This is built up line by line by the
/// parser; once parsing finishes, the index-based `CnfGrammar` is derived from
/// it and the AST is discarded.
pub(crate) struct GrammarAst {
    /// The variable named by the left-hand side of the first accepted line,
    /// along with the span of that left-hand side.
    pub start: Option<(String, Span)>,
    /// Every symbol encountered in a variable role, in first-encounter order.
    pub variables: IndexSet<String>,
    // Map from a variable name to indexes into prods. Using an IndexMap means
    // that we retain the order of rules as they're found in the input.
    pub rules: IndexMap<String, Vec<usize>>,
    pub prods: Vec<AstProd>,
    /// Every token encountered in a terminal role, in first-encounter order.
    pub terminals: IndexSet<String>,
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum AstProd {
    /// A single terminal (a lowercase letter or a quoted, possibly multi-word,
    /// token).
    Terminal(String),
    /// Exactly two variables.
    Binary(String, String),
    /// A degenerate unary reference to another variable. Kept so that the
    /// referenced name is registered as a variable, but inert during
    /// recognition.
    Alias(String),
}

impl GrammarAst {
    pub(crate) fn new() -> Self {
        GrammarAst {
            start: None,
            variables: IndexSet::new(),
            rules: IndexMap::new(),
            prods: Vec::new(),
            terminals: IndexSet::new(),
        }
    }

    /// Register `lhs` as a variable with a (possibly still empty) production
    /// list.
    pub(crate) fn add_rule(&mut self, lhs: &str) {
        if !self.variables.contains(lhs) {
            self.variables.insert(lhs.to_owned());
        }
        self.rules.entry(lhs.to_owned()).or_default();
    }

    /// Add a production for `lhs`, registering every symbol it mentions in
    /// the role it appears in.
    pub(crate) fn add_prod(&mut self, lhs: &str, prod: AstProd) {
        self.add_rule(lhs);
        match &prod {
            AstProd::Terminal(tok) => {
                if !self.terminals.contains(tok) {
                    self.terminals.insert(tok.clone());
                }
            }
            AstProd::Binary(l, r) => {
                if !self.variables.contains(l) {
                    self.variables.insert(l.clone());
                }
                if !self.variables.contains(r) {
                    self.variables.insert(r.clone());
                }
            }
            AstProd::Alias(n) => {
                if !self.variables.contains(n) {
                    self.variables.insert(n.clone());
                }
            }
        }
        self.rules
            .entry(lhs.to_owned())
            .or_default()
            .push(self.prods.len());
        self.prods.push(prod);
    }
}
