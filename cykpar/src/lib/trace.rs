use cnfgrammar::cnf::{CnfGrammar, ProdKind};

use vob::Vob;

use crate::table::CykTable;

/// The result of a traced recognition run: the acceptance verdict plus one
/// human-readable event per table addition, in the order the dynamic
/// programming core made them.
pub struct CykTrace {
    accepted: bool,
    events: Vec<String>,
}

impl CykTrace {
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }
}

/// Run the same dynamic programming core as [`CykTable::new`](crate::CykTable::new)
/// but record no backpointers: instead, emit one event string per derivation
/// found. This exists purely for step-by-step didactic display; its
/// acceptance verdict always agrees with the table's, but it cannot be used
/// to build a tree.
pub fn trace(grm: &CnfGrammar, tokens: &[&str]) -> CykTrace {
    let n = tokens.len();
    let mut cells = vec![Vob::from_elem(false, grm.rules_len()); n * (n + 1) / 2];
    let mut events = Vec::new();

    for (i, tok) in tokens.iter().enumerate() {
        for ridx in grm.iter_rules() {
            for &pidx in grm.rule_prods(ridx) {
                if let ProdKind::Terminal(t) = &grm.prod(pidx).kind {
                    if t == tok {
                        cells[CykTable::off_for(n, i, i)].set(usize::from(ridx), true);
                        events.push(format!(
                            "cell[{}][{}]: '{}' derivable from {}",
                            i,
                            i,
                            tok,
                            grm.rule_name(ridx)
                        ));
                    }
                }
            }
        }
    }

    for l in 2..=n {
        for i in 0..=(n - l) {
            let j = i + l - 1;
            for k in i..j {
                for ridx in grm.iter_rules() {
                    for &pidx in grm.rule_prods(ridx) {
                        if let ProdKind::Binary(b, c) = grm.prod(pidx).kind {
                            let left = cells[CykTable::off_for(n, i, k)].get(usize::from(b))
                                == Some(true);
                            let right = cells[CykTable::off_for(n, k + 1, j)]
                                .get(usize::from(c))
                                == Some(true);
                            if left && right {
                                cells[CykTable::off_for(n, i, j)].set(usize::from(ridx), true);
                                events.push(format!(
                                    "cell[{}][{}]: {} via {} {} split at {}",
                                    i,
                                    j,
                                    grm.rule_name(ridx),
                                    grm.rule_name(b),
                                    grm.rule_name(c),
                                    k
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    let accepted = match grm.start_rule_idx() {
        Some(s) if n > 0 => {
            cells[CykTable::off_for(n, 0, n - 1)].get(usize::from(s)) == Some(true)
        }
        _ => false,
    };
    CykTrace { accepted, events }
}
