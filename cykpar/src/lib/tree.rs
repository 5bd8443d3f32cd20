#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use cnfgrammar::{
    cnf::{CnfGrammar, ProdKind},
    RIdx,
};

use crate::table::{Backpointer, CykTable};

/// A parse tree node. A `Nonterm` has zero children (a bare variable with no
/// recorded derivation), one `Term` child (a terminal derivation), or exactly
/// two `Nonterm` subtrees (a binary derivation).
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    Term { token: String },
    Nonterm { name: String, nodes: Vec<Node> },
}

impl Node {
    /// Return a pretty-printed version of this node, one label per line,
    /// indented one space per tree level.
    pub fn pp(&self) -> String {
        // Stack of (indent level, node) pairs.
        let mut st = vec![(0, self)];
        let mut s = String::new();
        while let Some((indent, e)) = st.pop() {
            for _ in 0..indent {
                s.push(' ');
            }
            match e {
                Node::Term { token } => {
                    s.push_str(token);
                    s.push('\n');
                }
                Node::Nonterm { name, nodes } => {
                    s.push_str(name);
                    s.push('\n');
                    for x in nodes.iter().rev() {
                        st.push((indent + 1, x));
                    }
                }
            }
        }
        s
    }
}

// Tree extraction runs over an explicit stack rather than recursing so that
// long token sequences cannot overflow the call stack.
enum Frame {
    Expand(RIdx, usize, usize),
    Combine(RIdx),
}

/// Extract the canonical parse tree from a table that accepted its input:
/// each `(rule, span)` is resolved via the first derivation record the
/// recognizer appended for it, so even an ambiguous grammar yields exactly
/// one, reproducible, tree.
///
/// Returns `None` if the table did not accept. A `(rule, span)` with no
/// recorded derivation resolves to a childless `Nonterm` rather than an
/// error; this cannot arise from a table that accepted, but corrupt
/// bookkeeping must not crash the caller.
pub fn parse_tree(grm: &CnfGrammar, tbl: &CykTable) -> Option<Node> {
    if !tbl.accepted() {
        return None;
    }
    let start = grm.start_rule_idx()?;
    let n = tbl.tokens_len();
    let mut st = vec![Frame::Expand(start, 0, n - 1)];
    let mut out: Vec<Node> = Vec::new();
    while let Some(f) = st.pop() {
        match f {
            Frame::Expand(ridx, i, j) => {
                let name = grm.rule_name(ridx).to_owned();
                match tbl.backpointers(i, j, ridx).first() {
                    Some(Backpointer::Term(pidx)) => {
                        if let ProdKind::Terminal(tok) = &grm.prod(*pidx).kind {
                            out.push(Node::Nonterm {
                                name,
                                nodes: vec![Node::Term { token: tok.clone() }],
                            });
                        } else {
                            out.push(Node::Nonterm { name, nodes: vec![] });
                        }
                    }
                    Some(Backpointer::Bin(pidx, k)) => {
                        if let ProdKind::Binary(b, c) = grm.prod(*pidx).kind {
                            st.push(Frame::Combine(ridx));
                            st.push(Frame::Expand(c, k + 1, j));
                            st.push(Frame::Expand(b, i, *k));
                        } else {
                            out.push(Node::Nonterm { name, nodes: vec![] });
                        }
                    }
                    None => out.push(Node::Nonterm { name, nodes: vec![] }),
                }
            }
            Frame::Combine(ridx) => {
                let right = out.pop()?;
                let left = out.pop()?;
                out.push(Node::Nonterm {
                    name: grm.rule_name(ridx).to_owned(),
                    nodes: vec![left, right],
                });
            }
        }
    }
    out.pop()
}

#[cfg(test)]
mod test {
    use super::{parse_tree, Node};
    use crate::{table::Backpointer, tokenize, CykTable};
    use cnfgrammar::cnf::CnfGrammar;

    fn nonterm(name: &str, nodes: Vec<Node>) -> Node {
        Node::Nonterm {
            name: name.to_owned(),
            nodes,
        }
    }

    fn term(token: &str) -> Node {
        Node::Term {
            token: token.to_owned(),
        }
    }

    fn tree_for(grammar: &str, input: &str) -> Option<Node> {
        let grm = CnfGrammar::new(grammar);
        let tokens = tokenize(input);
        let tbl = CykTable::new(&grm, &tokens);
        parse_tree(&grm, &tbl)
    }

    #[test]
    fn test_two_letter_tree() {
        let t = tree_for("S -> AB | BA\nA -> a\nB -> b", "ab").unwrap();
        assert_eq!(
            t,
            nonterm(
                "S",
                vec![
                    nonterm("A", vec![term("a")]),
                    nonterm("B", vec![term("b")])
                ]
            )
        );
    }

    #[test]
    fn test_rejected_input_has_no_tree() {
        assert!(tree_for("S -> AB | BA\nA -> a\nB -> b", "aa").is_none());
    }

    #[test]
    fn test_sentence_tree_shape() {
        let g = "S -> NP VP\nNP -> Det N\nVP -> V NP\nDet -> \"the\" | \"a\"\nN -> \"cat\" | \"dog\"\nV -> \"chased\"";
        let t = tree_for(g, "the cat chased a dog").unwrap();
        match &t {
            Node::Nonterm { name, nodes } => {
                assert_eq!(name, "S");
                assert_eq!(nodes.len(), 2);
                match (&nodes[0], &nodes[1]) {
                    (
                        Node::Nonterm { name: l, .. },
                        Node::Nonterm { name: r, nodes: vp },
                    ) => {
                        assert_eq!(l, "NP");
                        assert_eq!(r, "VP");
                        // VP itself splits into V and a nested NP.
                        match (&vp[0], &vp[1]) {
                            (Node::Nonterm { name: v, .. }, Node::Nonterm { name: np, .. }) => {
                                assert_eq!(v, "V");
                                assert_eq!(np, "NP");
                            }
                            _ => panic!("VP children have the wrong shape"),
                        }
                    }
                    _ => panic!("S children have the wrong shape"),
                }
            }
            _ => panic!("root is not a variable"),
        }
    }

    #[test]
    fn test_ambiguity_resolved_by_first_record() {
        // "aaa" has two parses under S -> SS | a; the recognizer tries split
        // 0 before split 1, so the canonical tree puts the single leaf on the
        // left.
        let grm = CnfGrammar::new("S -> SS | a");
        let tokens = tokenize("aaa");
        let tbl = CykTable::new(&grm, &tokens);
        let s = grm.rule_idx("S").unwrap();
        match tbl.backpointers(0, 2, s).first() {
            Some(Backpointer::Bin(_, k)) => assert_eq!(*k, 0),
            _ => panic!("expected a binary record"),
        }
        let t = parse_tree(&grm, &tbl).unwrap();
        let leaf = nonterm("S", vec![term("a")]);
        assert_eq!(
            t,
            nonterm(
                "S",
                vec![leaf.clone(), nonterm("S", vec![leaf.clone(), leaf])]
            )
        );
    }

    #[test]
    fn test_determinism() {
        let g = "S -> AB | BC\nA -> BA | a\nB -> CC | b\nC -> AB | a";
        assert_eq!(tree_for(g, "ababa"), tree_for(g, "ababa"));
    }

    #[test]
    fn test_pp() {
        let t = tree_for("S -> AB\nA -> a\nB -> b", "ab").unwrap();
        assert_eq!(t.pp(), "S\n A\n  a\n B\n  b\n");
    }
}
