#![allow(clippy::new_without_default)]
#![forbid(unsafe_code)]

//! `cykpar` recognizes strings against Chomsky Normal Form grammars using the
//! Cocke–Younger–Kasami dynamic programming algorithm, and extracts one
//! concrete parse tree per accepted input.
//!
//! Everything here is a pure function over immutable inputs: a grammar and a
//! token sequence go in, a fresh table (and possibly tree) comes out, with no
//! shared state between calls. Identical inputs always produce identical
//! tables and — because derivation records are consumed in
//! grammar-registration order — identical trees.
//!
//! ## Example
//!
//! ```
//! use cnfgrammar::cnf::CnfGrammar;
//! use cykpar::{parse_tree, tokenize, CykTable};
//!
//! let grm = CnfGrammar::new("S -> AB | BA\nA -> a\nB -> b");
//! let tokens = tokenize("ab");
//! let tbl = CykTable::new(&grm, &tokens);
//! assert!(tbl.accepted());
//! let tree = parse_tree(&grm, &tbl).unwrap();
//! assert_eq!(tree.pp(), "S\n A\n  a\n B\n  b\n");
//! ```

pub mod export;
pub mod table;
pub mod tokenizer;
pub mod trace;
pub mod tree;

pub use crate::export::GenericTree;
pub use crate::table::{Backpointer, CykTable};
pub use crate::tokenizer::tokenize;
pub use crate::trace::{trace, CykTrace};
pub use crate::tree::{parse_tree, Node};
