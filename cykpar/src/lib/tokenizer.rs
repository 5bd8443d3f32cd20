/// Split `input` into tokens. If `input` contains any whitespace it is
/// treated as a sentence and tokens are its whitespace-delimited words;
/// otherwise it is treated as a formal string and tokens are its individual
/// characters. This heuristic lets the same recognizer serve word-terminal
/// grammars and classical single-letter CNF examples without a mode flag.
///
/// Empty input yields an empty sequence. Tokens borrow from `input`.
pub fn tokenize(input: &str) -> Vec<&str> {
    if input.chars().any(char::is_whitespace) {
        input.split_whitespace().collect()
    } else {
        input
            .char_indices()
            .map(|(off, c)| &input[off..off + c.len_utf8()])
            .collect()
    }
}
