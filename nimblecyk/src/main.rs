use std::{
    env,
    fs::File,
    io::{stderr, Read, Write},
    path::Path,
    process,
};

use cnfgrammar::cnf::CnfGrammar;
use cykpar::{parse_tree, tokenize, trace, CykTable};
use getopts::Options;

fn usage(prog: &str, msg: &str) -> ! {
    let path = Path::new(prog);
    let leaf = match path.file_name() {
        Some(m) => m.to_str().unwrap(),
        None => "nimblecyk",
    };
    if !msg.is_empty() {
        writeln!(&mut stderr(), "{}", msg).ok();
    }
    writeln!(
        &mut stderr(),
        "Usage: {} [-q] [-s] [-t] <grammar file> <input file>",
        leaf
    )
    .ok();
    process::exit(1);
}

fn read_file(path: &str) -> String {
    let mut f = match File::open(path) {
        Ok(r) => r,
        Err(e) => {
            writeln!(&mut stderr(), "Can't open file {}: {}", path, e).ok();
            process::exit(1);
        }
    };
    let mut s = String::new();
    if let Err(e) = f.read_to_string(&mut s) {
        writeln!(&mut stderr(), "Can't read file {}: {}", path, e).ok();
        process::exit(1);
    }
    s
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog = &args[0];
    let matches = match Options::new()
        .optflag("h", "help", "")
        .optflag("q", "quiet", "Don't print grammar warnings")
        .optflag(
            "s",
            "strict",
            "Reject grammar lines the lenient default would skip",
        )
        .optflag(
            "t",
            "trace",
            "Print one line per table addition instead of a parse tree",
        )
        .parse(&args[1..])
    {
        Ok(m) => m,
        Err(f) => usage(prog, f.to_string().as_str()),
    };

    if matches.opt_present("h") {
        usage(prog, "");
    }

    let quiet = matches.opt_present("q");

    if matches.free.len() != 2 {
        usage(prog, "Too few arguments given.");
    }

    let grm_path = &matches.free[0];
    let grm_src = read_file(grm_path);
    let grm = if matches.opt_present("s") {
        match CnfGrammar::new_strict(&grm_src) {
            Ok(grm) => grm,
            Err(errs) => {
                for e in &errs {
                    writeln!(&mut stderr(), "{}: {}", grm_path, e).ok();
                }
                process::exit(1);
            }
        }
    } else {
        let (grm, warnings) = CnfGrammar::new_with_warnings(&grm_src);
        if !quiet {
            for w in &warnings {
                writeln!(&mut stderr(), "{}: Warning: {}", grm_path, w).ok();
            }
        }
        grm
    };

    let input = read_file(&matches.free[1]);
    let tokens = tokenize(input.trim_end());

    if matches.opt_present("t") {
        let tr = trace(&grm, &tokens);
        for ev in tr.events() {
            println!("{}", ev);
        }
        if !tr.accepted() {
            println!("Input not derivable from the start rule.");
            process::exit(1);
        }
        return;
    }

    let tbl = CykTable::new(&grm, &tokens);
    match parse_tree(&grm, &tbl) {
        Some(tree) => print!("{}", tree.pp()),
        None => {
            println!("Input not derivable from the start rule.");
            process::exit(1);
        }
    }
}
