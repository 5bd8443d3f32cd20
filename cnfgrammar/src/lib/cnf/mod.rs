mod ast;
pub mod grammar;
pub mod parser;

pub use grammar::{CnfGrammar, CnfProd, ProdKind};
pub use parser::{
    CnfGrammarError, CnfGrammarErrorKind, CnfGrammarWarning, CnfGrammarWarningKind,
};
