#![allow(clippy::new_without_default)]

//! A library for compiling Chomsky Normal Form (CNF) grammars from text.
//!
//! CFG terminology is something of a mess, with "variable", "nonterminal",
//! and "rule" (and, on the other side, "terminal" and "token") used
//! interchangeably by different tools and papers. In order to make this
//! library somewhat coherent we use the following terminology guidelines:
//!
//!   * A *rule* maps a variable name to one or more productions.
//!   * A *production* is, per the CNF restriction, either a single terminal
//!     or exactly two variables.
//!   * A *terminal* is an atomic piece of input (a character or a word).
//!
//! For example, in the following grammar:
//!
//!   S -> AB | BA
//!   A -> a
//!   B -> b
//!
//! there are three rules (S, A, and B), four productions, and two terminals
//! (a and b).
//!
//! cnfgrammar makes the following guarantees about compiled grammars:
//!
//!   * Rules are numbered from `0` to `rules_len() - 1` (inclusive), in the
//!     order their names are first encountered in the source text.
//!   * Productions are numbered from `0` to `prods_len() - 1` (inclusive).
//!   * A rule's production list preserves source order. Consumers that rely
//!     on "earliest-registered production wins" tie-breaks (as CYK parse
//!     tree extraction does) can therefore iterate deterministically.
//!   * A compiled grammar is immutable.
//!
//! The main entry points are [`CnfGrammar::new`](cnf/grammar/struct.CnfGrammar.html#method.new)
//! (lenient) and
//! [`CnfGrammar::new_strict`](cnf/grammar/struct.CnfGrammar.html#method.new_strict).

pub mod cnf;
mod idxnewtype;
mod span;

pub use crate::idxnewtype::{PIdx, RIdx};
pub use crate::span::Span;
