use indexmap::IndexSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{PIdx, RIdx, Span};

use super::ast::{AstProd, GrammarAst};
use super::parser::{CnfGrammarError, CnfGrammarErrorKind, CnfGrammarWarning, CnfParser};

/// A compiled CNF grammar. Immutable once constructed; all mutation happens on
/// the parser's AST before indices are assigned.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CnfGrammar {
    /// Variable names in first-encounter order; a name's position is its
    /// `RIdx`.
    rule_names: Vec<String>,
    /// Per-rule production lists, in source order.
    rule_prods: Vec<Vec<PIdx>>,
    prods: Vec<CnfProd>,
    terminals: IndexSet<String>,
    start: Option<RIdx>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CnfProd {
    pub lhs: RIdx,
    pub kind: ProdKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProdKind {
    /// Derive a single terminal.
    Terminal(String),
    /// Derive exactly two variables.
    Binary(RIdx, RIdx),
    /// A degenerate unary variable reference. Registered so the referenced
    /// name counts as a variable, but never derives anything during
    /// recognition.
    Alias(RIdx),
}

impl CnfGrammar {
    /// Compile `src` leniently, discarding warnings. Lines and alternatives
    /// that cannot be classified as CNF rules are silently skipped; this can
    /// produce a grammar accepting a narrower language than the author
    /// intended. Use [`new_with_warnings`](CnfGrammar::new_with_warnings) to
    /// see what was dropped, or [`new_strict`](CnfGrammar::new_strict) to
    /// reject such input outright.
    pub fn new(src: &str) -> Self {
        Self::new_with_warnings(src).0
    }

    /// Compile `src` leniently, returning one warning per skipped line or
    /// dropped alternative.
    pub fn new_with_warnings(src: &str) -> (Self, Vec<CnfGrammarWarning>) {
        let (ast, warnings) = CnfParser::new(src).parse();
        (Self::from_ast(ast), warnings)
    }

    /// Compile `src`, promoting every condition lenient compilation would
    /// merely warn about into an error, and additionally rejecting grammars
    /// with no rules at all.
    pub fn new_strict(src: &str) -> Result<Self, Vec<CnfGrammarError>> {
        let (ast, warnings) = CnfParser::new(src).parse();
        let mut errors = warnings
            .into_iter()
            .map(CnfGrammarError::from)
            .collect::<Vec<_>>();
        if ast.start.is_none() {
            errors.push(CnfGrammarError {
                kind: CnfGrammarErrorKind::NoStartRule,
                span: Span::new(0, 0),
            });
        }
        if errors.is_empty() {
            Ok(Self::from_ast(ast))
        } else {
            Err(errors)
        }
    }

    fn from_ast(ast: GrammarAst) -> Self {
        // Every name the AST mentions is in ast.variables, so the index
        // lookups cannot fail.
        let ridx = |n: &str| RIdx(ast.variables.get_index_of(n).unwrap());
        let mut rule_prods = vec![Vec::new(); ast.variables.len()];
        let mut prods = Vec::with_capacity(ast.prods.len());
        for (name, aidxs) in &ast.rules {
            let lhs = ridx(name);
            for &aidx in aidxs {
                let kind = match &ast.prods[aidx] {
                    AstProd::Terminal(tok) => ProdKind::Terminal(tok.clone()),
                    AstProd::Binary(l, r) => ProdKind::Binary(ridx(l), ridx(r)),
                    AstProd::Alias(n) => ProdKind::Alias(ridx(n)),
                };
                rule_prods[usize::from(lhs)].push(PIdx(prods.len()));
                prods.push(CnfProd { lhs, kind });
            }
        }
        let start = ast.start.as_ref().map(|(n, _)| ridx(n));
        CnfGrammar {
            rule_names: ast.variables.iter().cloned().collect(),
            rule_prods,
            prods,
            terminals: ast.terminals,
            start,
        }
    }

    /// How many rules does this grammar have?
    pub fn rules_len(&self) -> usize {
        self.rule_names.len()
    }

    /// Return an iterator which produces (in first-encounter order) all this
    /// grammar's valid `RIdx`s.
    pub fn iter_rules(&self) -> impl Iterator<Item = RIdx> {
        (0..self.rule_names.len()).map(RIdx)
    }

    /// Return the name of rule `ridx`.
    ///
    /// # Panics
    ///
    /// If `ridx` doesn't exist.
    pub fn rule_name(&self, ridx: RIdx) -> &str {
        &self.rule_names[usize::from(ridx)]
    }

    /// Return the index of the rule named `n` or `None` if it doesn't exist.
    pub fn rule_idx(&self, n: &str) -> Option<RIdx> {
        self.rule_names.iter().position(|x| x == n).map(RIdx)
    }

    /// Return the index of the start rule: the LHS of the first accepted line
    /// of the source text, or `None` if no line was accepted.
    pub fn start_rule_idx(&self) -> Option<RIdx> {
        self.start
    }

    /// Return the ordered list of productions of rule `ridx`.
    ///
    /// # Panics
    ///
    /// If `ridx` doesn't exist.
    pub fn rule_prods(&self, ridx: RIdx) -> &[PIdx] {
        &self.rule_prods[usize::from(ridx)]
    }

    /// How many productions does this grammar have?
    pub fn prods_len(&self) -> usize {
        self.prods.len()
    }

    /// Return the production `pidx`.
    ///
    /// # Panics
    ///
    /// If `pidx` doesn't exist.
    pub fn prod(&self, pidx: PIdx) -> &CnfProd {
        &self.prods[usize::from(pidx)]
    }

    /// Return an iterator over the terminals, in first-encounter order.
    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(|s| s.as_str())
    }

    /// Does `tok` appear as a terminal in this grammar?
    pub fn has_terminal(&self, tok: &str) -> bool {
        self.terminals.contains(tok)
    }

    /// Return a pretty-printed version of production `pidx`.
    pub fn pp_prod(&self, pidx: PIdx) -> String {
        let prod = self.prod(pidx);
        let rhs = match &prod.kind {
            ProdKind::Terminal(tok) => format!("\"{}\"", tok),
            ProdKind::Binary(l, r) => format!("{} {}", self.rule_name(*l), self.rule_name(*r)),
            ProdKind::Alias(n) => self.rule_name(*n).to_owned(),
        };
        format!("{} -> {}", self.rule_name(prod.lhs), rhs)
    }
}

#[cfg(test)]
mod test {
    use super::{CnfGrammar, ProdKind};
    use crate::{PIdx, RIdx};

    #[test]
    fn test_basic_grammar() {
        let grm = CnfGrammar::new("S -> AB | BA\nA -> a\nB -> b");
        assert_eq!(grm.rules_len(), 3);
        assert_eq!(grm.prods_len(), 4);
        let s = grm.rule_idx("S").unwrap();
        let a = grm.rule_idx("A").unwrap();
        let b = grm.rule_idx("B").unwrap();
        assert_eq!(grm.start_rule_idx(), Some(s));
        assert_eq!(grm.rule_prods(s).len(), 2);
        match grm.prod(grm.rule_prods(s)[0]).kind {
            ProdKind::Binary(l, r) => assert_eq!((l, r), (a, b)),
            _ => panic!("expected binary production"),
        }
        match grm.prod(grm.rule_prods(s)[1]).kind {
            ProdKind::Binary(l, r) => assert_eq!((l, r), (b, a)),
            _ => panic!("expected binary production"),
        }
        match &grm.prod(grm.rule_prods(a)[0]).kind {
            ProdKind::Terminal(tok) => assert_eq!(tok, "a"),
            _ => panic!("expected terminal production"),
        }
        assert_eq!(grm.terminals().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_rule_order_is_first_encounter_order() {
        // "AB" mentions A and B before their own rule lines appear.
        let grm = CnfGrammar::new("S -> AB\nB -> b\nA -> a");
        assert_eq!(grm.rule_name(RIdx(0)), "S");
        assert_eq!(grm.rule_name(RIdx(1)), "A");
        assert_eq!(grm.rule_name(RIdx(2)), "B");
    }

    #[test]
    fn test_shorthand_matches_spaced_pair() {
        let g1 = CnfGrammar::new("S -> AB");
        let g2 = CnfGrammar::new("S -> A B");
        let p1 = &g1.prod(PIdx(0)).kind;
        let p2 = &g2.prod(PIdx(0)).kind;
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_multichar_symbols_are_variables() {
        let grm = CnfGrammar::new("S -> NP VP\nNP -> Det N");
        for n in ["S", "NP", "VP", "Det", "N"] {
            assert!(grm.rule_idx(n).is_some(), "{} should be a variable", n);
        }
        assert_eq!(grm.terminals().count(), 0);
    }

    #[test]
    fn test_alias_production() {
        let grm = CnfGrammar::new("S -> X\nX -> a");
        let s = grm.rule_idx("S").unwrap();
        let x = grm.rule_idx("X").unwrap();
        match grm.prod(grm.rule_prods(s)[0]).kind {
            ProdKind::Alias(n) => assert_eq!(n, x),
            _ => panic!("expected alias production"),
        }
        // The alias target is a variable, not a terminal.
        assert!(!grm.has_terminal("X"));
    }

    #[test]
    fn test_quoted_terminals() {
        let grm = CnfGrammar::new("Det -> \"the\" | \"a\"");
        let det = grm.rule_idx("Det").unwrap();
        assert_eq!(grm.rule_prods(det).len(), 2);
        assert!(grm.has_terminal("the"));
        assert!(grm.has_terminal("a"));
        assert!(grm.rule_idx("the").is_none());
    }

    #[test]
    fn test_uppercase_single_is_alias_not_terminal() {
        // A single uppercase letter is neither a lowercase terminal nor a
        // two-letter shorthand.
        let grm = CnfGrammar::new("S -> A\nA -> a");
        let s = grm.rule_idx("S").unwrap();
        match grm.prod(grm.rule_prods(s)[0]).kind {
            ProdKind::Alias(_) => (),
            _ => panic!("expected alias production"),
        }
    }

    #[test]
    fn test_empty_grammar() {
        let (grm, ws) = CnfGrammar::new_with_warnings("");
        assert!(ws.is_empty());
        assert_eq!(grm.rules_len(), 0);
        assert_eq!(grm.start_rule_idx(), None);
    }

    #[test]
    fn test_strict_accepts_clean_grammar() {
        assert!(CnfGrammar::new_strict("S -> AB | BA\nA -> a\nB -> b").is_ok());
    }

    #[test]
    fn test_strict_rejects_unparsed_lines() {
        use crate::cnf::parser::CnfGrammarErrorKind;
        match CnfGrammar::new_strict("nonsense\nS -> a") {
            Err(errs) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].kind, CnfGrammarErrorKind::MissingArrow);
            }
            Ok(_) => panic!("strict mode accepted an unparseable line"),
        }
    }

    #[test]
    fn test_strict_rejects_empty_grammar() {
        use crate::cnf::parser::CnfGrammarErrorKind;
        match CnfGrammar::new_strict("") {
            Err(errs) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].kind, CnfGrammarErrorKind::NoStartRule);
            }
            Ok(_) => panic!("strict mode accepted an empty grammar"),
        }
    }

    #[test]
    fn test_pp_prod() {
        let grm = CnfGrammar::new("S -> NP VP\nNP -> \"they\"");
        assert_eq!(grm.pp_prod(PIdx(0)), "S -> NP VP");
        assert_eq!(grm.pp_prod(PIdx(1)), "NP -> \"they\"");
    }
}
