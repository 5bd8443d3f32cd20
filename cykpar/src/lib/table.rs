use cnfgrammar::{
    cnf::{CnfGrammar, ProdKind},
    PIdx, RIdx,
};
use fnv::FnvHashMap;
use vob::Vob;

/// A recorded derivation choice: why a rule was added to a table cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backpointer {
    /// The rule derived the cell's single token via terminal production
    /// `PIdx`.
    Term(PIdx),
    /// The rule derived the cell's span via binary production `PIdx`, with
    /// the left child covering `i..=k` and the right child `k+1..=j`, where
    /// `k` is the recorded split.
    Bin(PIdx, usize),
}

struct Cell {
    /// One bit per rule: is the cell's span derivable from that rule?
    derivable: Vob,
    /// For each derivable rule, the ordered list of derivation records. The
    /// first record appended is the one parse tree extraction consumes.
    bps: FnvHashMap<usize, Vec<Backpointer>>,
}

/// The triangular CYK derivability table over token index pairs `(i, j)` with
/// `0 <= i <= j < n`. Cells are stored in a flat `Vec` row by row; pairs with
/// `i > j` have no storage and cannot be addressed.
///
/// Filling the table costs `O(n^3 * prods_len)` time; the table itself holds
/// `O(n^2)` cells plus one backpointer per successful derivation attempt.
pub struct CykTable {
    n: usize,
    accepted: bool,
    cells: Vec<Cell>,
}

impl CykTable {
    /// Run CYK recognition of `tokens` against `grm`, recording backpointers
    /// as derivations are found.
    ///
    /// An empty token sequence, or a grammar with no start rule (e.g. one
    /// compiled from empty or fully unparseable text), yields a table that
    /// rejects: there are no error states.
    pub fn new(grm: &CnfGrammar, tokens: &[&str]) -> CykTable {
        let n = tokens.len();
        let mut cells = Vec::with_capacity(n * (n + 1) / 2);
        for _ in 0..n * (n + 1) / 2 {
            cells.push(Cell {
                derivable: Vob::from_elem(false, grm.rules_len()),
                bps: FnvHashMap::default(),
            });
        }

        // Base case: spans of length 1 are derivable from every rule with a
        // matching terminal production.
        for (i, tok) in tokens.iter().enumerate() {
            let cell = &mut cells[Self::off_for(n, i, i)];
            for ridx in grm.iter_rules() {
                for &pidx in grm.rule_prods(ridx) {
                    if let ProdKind::Terminal(t) = &grm.prod(pidx).kind {
                        if t == tok {
                            cell.derivable.set(usize::from(ridx), true);
                            cell.bps
                                .entry(usize::from(ridx))
                                .or_default()
                                .push(Backpointer::Term(pidx));
                        }
                    }
                }
            }
        }

        // Inductive case: a span is derivable from A via A -> B C if some
        // split point leaves B deriving the left part and C the right part.
        // Rules and productions are visited in grammar-registration order so
        // that the first backpointer recorded per (cell, rule) is the
        // earliest-registered derivation.
        for l in 2..=n {
            for i in 0..=(n - l) {
                let j = i + l - 1;
                for k in i..j {
                    for ridx in grm.iter_rules() {
                        for &pidx in grm.rule_prods(ridx) {
                            if let ProdKind::Binary(b, c) = grm.prod(pidx).kind {
                                let left = cells[Self::off_for(n, i, k)]
                                    .derivable
                                    .get(usize::from(b))
                                    == Some(true);
                                let right = cells[Self::off_for(n, k + 1, j)]
                                    .derivable
                                    .get(usize::from(c))
                                    == Some(true);
                                if left && right {
                                    let cell = &mut cells[Self::off_for(n, i, j)];
                                    cell.derivable.set(usize::from(ridx), true);
                                    cell.bps
                                        .entry(usize::from(ridx))
                                        .or_default()
                                        .push(Backpointer::Bin(pidx, k));
                                }
                            }
                        }
                    }
                }
            }
        }

        let accepted = match grm.start_rule_idx() {
            Some(s) if n > 0 => {
                cells[Self::off_for(n, 0, n - 1)]
                    .derivable
                    .get(usize::from(s))
                    == Some(true)
            }
            _ => false,
        };
        CykTable { n, accepted, cells }
    }

    /// Does the start rule derive the whole token sequence?
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// The number of tokens this table was built over.
    pub fn tokens_len(&self) -> usize {
        self.n
    }

    /// Return an iterator over the rules which derive `tokens[i..=j]`, in
    /// rule index order.
    ///
    /// # Panics
    ///
    /// If `i > j` or `j` is out of bounds: such cells do not exist.
    pub fn derivable(&self, i: usize, j: usize) -> impl Iterator<Item = RIdx> + '_ {
        self.cells[self.off(i, j)]
            .derivable
            .iter_set_bits(..)
            .map(RIdx)
    }

    /// Does rule `ridx` derive `tokens[i..=j]`?
    ///
    /// # Panics
    ///
    /// If `i > j` or `j` is out of bounds.
    pub fn is_derivable(&self, i: usize, j: usize, ridx: RIdx) -> bool {
        self.cells[self.off(i, j)].derivable.get(usize::from(ridx)) == Some(true)
    }

    /// Return the ordered derivation records for rule `ridx` over
    /// `tokens[i..=j]` (empty if the rule does not derive that span).
    ///
    /// # Panics
    ///
    /// If `i > j` or `j` is out of bounds.
    pub fn backpointers(&self, i: usize, j: usize, ridx: RIdx) -> &[Backpointer] {
        self.cells[self.off(i, j)]
            .bps
            .get(&usize::from(ridx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn off(&self, i: usize, j: usize) -> usize {
        assert!(
            i <= j && j < self.n,
            "cell [{}][{}] does not exist in a table over {} tokens",
            i,
            j,
            self.n
        );
        Self::off_for(self.n, i, j)
    }

    // Flat offset of cell (i, j): row i starts after the n, n-1, ... cells of
    // the rows above it.
    pub(crate) fn off_for(n: usize, i: usize, j: usize) -> usize {
        debug_assert!(i <= j && j < n);
        (i * (2 * n - i + 1)) / 2 + (j - i)
    }
}
