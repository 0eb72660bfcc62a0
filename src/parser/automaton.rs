//! Tokenizer automaton
//!
//! The tokenizer is a deterministic finite-state machine over the 128-symbol
//! ASCII alphabet. [`TransitionTable`] maps every `(state, symbol)` pair to an
//! [`Action`] that edits the in-progress [`Scan`]: it may append the symbol to
//! the raw text, set the token kind or operator tag, record the start
//! location, switch state, complete the token, or ask the character source to
//! re-deliver the symbol.
//!
//! End of input is dispatched as [`END_SYMBOL`] (NUL) so that pending lexemes
//! are completed by the same table that drives ordinary scanning.

use super::token::{Operator, SourceLocation, TokenKind};

pub(crate) const ALPHABET_SIZE: usize = 128;

/// Symbol dispatched once the character source reports end of input.
pub(crate) const END_SYMBOL: u8 = 0x00;

pub(crate) type Action = fn(&mut Scan, u8);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum State {
    #[default]
    Start,
    Division,
    Comment,
    String,
    Char,
    Ampersand,
    Pipe,
    Equals,
    NotEquals,
    Word,
    Int,
    IntHex,         // 0[xX][0-9a-fA-F]*
    Float,          // [0-9]+\.[0-9]*
    FloatExp,       // [0-9]+\.[0-9]+[eE][0-9]*
    FloatExpSign,   // [0-9]+\.[0-9]+[eE][-+][0-9]*
}

impl State {
    pub(crate) const COUNT: usize = 15;

    /// Single and doubled operator of a two-character operator state.
    fn operator_pair(self) -> Option<(Operator, Operator)> {
        match self {
            State::Ampersand => Some((Operator::BitwiseAnd, Operator::LogicalAnd)),
            State::Pipe => Some((Operator::BitwiseOr, Operator::LogicalOr)),
            State::Equals => Some((Operator::Assignment, Operator::EqualityTest)),
            State::NotEquals => Some((Operator::LogicalNot, Operator::NotEqualityTest)),
            _ => None,
        }
    }

    fn literal_name(self) -> &'static str {
        match self {
            State::String => "string",
            State::Char => "character",
            State::IntHex => "hexadecimal",
            State::Float | State::FloatExp | State::FloatExpSign => "float",
            _ => "integer",
        }
    }
}

/// Scanning state of the token being built.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    pub(crate) state: State,
    pub(crate) kind: Option<TokenKind>,
    pub(crate) operator: Option<Operator>,
    pub(crate) raw: String,
    pub(crate) start: SourceLocation,
    /// Location of the symbol being dispatched.
    pub(crate) location: SourceLocation,
    pub(crate) completed: bool,
    pub(crate) hold: bool,
    pub(crate) error: Option<String>,
    pub(crate) fatal: Option<u8>,
}

impl Scan {
    /// Clear the per-token fields; the automaton state is kept.
    pub(crate) fn begin_token(&mut self) {
        self.kind = None;
        self.operator = None;
        self.raw.clear();
        self.completed = false;
        self.hold = false;
        self.error = None;
    }

    fn enter(&mut self, state: State, kind: TokenKind, symbol: u8) {
        self.state = state;
        self.kind = Some(kind);
        self.raw.push(char::from(symbol));
    }

    fn complete(&mut self) {
        self.completed = true;
        self.state = State::Start;
    }

    fn last_char(&self) -> Option<char> {
        self.raw.chars().last()
    }

    fn record_error(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }
}

fn skip(_: &mut Scan, _: u8) {}

fn append(scan: &mut Scan, symbol: u8) {
    scan.raw.push(char::from(symbol));
}

fn reject(scan: &mut Scan, symbol: u8) {
    scan.fatal = Some(symbol);
}

fn begin(scan: &mut Scan, state: State, kind: TokenKind, symbol: u8) {
    scan.start = scan.location;
    scan.enter(state, kind, symbol);
}

fn start_word(scan: &mut Scan, symbol: u8) {
    begin(scan, State::Word, TokenKind::Identifier, symbol);
}

fn start_int(scan: &mut Scan, symbol: u8) {
    begin(scan, State::Int, TokenKind::Int, symbol);
}

fn start_string(scan: &mut Scan, symbol: u8) {
    begin(scan, State::String, TokenKind::String, symbol);
}

fn start_char(scan: &mut Scan, symbol: u8) {
    begin(scan, State::Char, TokenKind::Char, symbol);
}

fn start_division(scan: &mut Scan, symbol: u8) {
    begin(scan, State::Division, TokenKind::Operator, symbol);
}

fn start_pair(scan: &mut Scan, symbol: u8) {
    let state = match symbol {
        b'&' => State::Ampersand,
        b'|' => State::Pipe,
        b'=' => State::Equals,
        _ => State::NotEquals,
    };
    begin(scan, state, TokenKind::Operator, symbol);
}

fn single_operator(scan: &mut Scan, symbol: u8) {
    scan.start = scan.location;
    scan.kind = Some(TokenKind::Operator);
    scan.operator = Operator::from_symbol(symbol);
    scan.raw.push(char::from(symbol));
    scan.complete();
}

/// Complete the token and leave the terminator for the next token.
fn finish_before(scan: &mut Scan, _: u8) {
    scan.hold = true;
    scan.complete();
}

fn lexical_error(scan: &mut Scan, symbol: u8) {
    let literal = scan.state.literal_name();
    append(scan, symbol);
    scan.record_error(format!(
        "unexpected character '{}' in {literal} literal",
        char::from(symbol)
    ));
}

fn unterminated(scan: &mut Scan, _: u8) {
    let literal = scan.state.literal_name();
    scan.record_error(format!("unterminated {literal} literal"));
    scan.complete();
}

fn divide(scan: &mut Scan, symbol: u8) {
    scan.operator = Some(Operator::Divide);
    finish_before(scan, symbol);
}

fn enter_comment(scan: &mut Scan, _: u8) {
    scan.state = State::Comment;
    scan.kind = None;
    scan.raw.clear();
}

fn end_comment(scan: &mut Scan, _: u8) {
    scan.state = State::Start;
}

fn close_string(scan: &mut Scan, symbol: u8) {
    append(scan, symbol);
    scan.complete();
}

fn close_char(scan: &mut Scan, symbol: u8) {
    append(scan, symbol);
    // raw holds both quotes
    if scan.raw.len() != 3 {
        scan.record_error("character literal must contain exactly one character".to_string());
    }
    scan.complete();
}

fn pair_single(scan: &mut Scan, symbol: u8) {
    scan.operator = scan.state.operator_pair().map(|(single, _)| single);
    finish_before(scan, symbol);
}

fn pair_double(scan: &mut Scan, symbol: u8) {
    scan.operator = scan.state.operator_pair().map(|(_, double)| double);
    append(scan, symbol);
    scan.complete();
}

fn enter_float(scan: &mut Scan, symbol: u8) {
    scan.enter(State::Float, TokenKind::Float, symbol);
}

fn hex_prefix(scan: &mut Scan, symbol: u8) {
    if scan.raw == "0" {
        scan.enter(State::IntHex, TokenKind::Int, symbol);
    } else {
        lexical_error(scan, symbol);
    }
}

fn exponent(scan: &mut Scan, symbol: u8) {
    if scan.last_char().is_some_and(|c| c.is_ascii_digit()) {
        scan.enter(State::FloatExp, TokenKind::Float, symbol);
    } else {
        lexical_error(scan, symbol);
    }
}

fn exponent_sign(scan: &mut Scan, symbol: u8) {
    if matches!(scan.last_char(), Some('e' | 'E')) {
        scan.enter(State::FloatExpSign, TokenKind::Float, symbol);
    } else {
        lexical_error(scan, symbol);
    }
}

fn fill(row: &mut [Action; ALPHABET_SIZE], symbols: impl IntoIterator<Item = u8>, action: Action) {
    for symbol in symbols {
        row[usize::from(symbol)] = action;
    }
}

fn letters() -> impl Iterator<Item = u8> {
    (b'A'..=b'Z').chain(b'a'..=b'z')
}

/// Dispatch table of the tokenizer automaton.
pub(crate) struct TransitionTable {
    actions: [[Action; ALPHABET_SIZE]; State::COUNT],
}

impl TransitionTable {
    pub(crate) fn new() -> Self {
        let mut actions = [[skip as Action; ALPHABET_SIZE]; State::COUNT];

        // Start
        {
            let start = &mut actions[State::Start as usize];
            fill(start, b"!&|=".iter().copied(), start_pair);
            fill(start, b"%()*+,-.;<>[]{}~".iter().copied(), single_operator);
            fill(start, b"#$:?@\\^_`".iter().copied(), reject);
            fill(start, [b'"'], start_string);
            fill(start, [b'\''], start_char);
            fill(start, [b'/'], start_division);
            fill(start, b'0'..=b'9', start_int);
            fill(start, letters(), start_word);
        }

        // Division
        {
            let division = &mut actions[State::Division as usize];
            fill(division, 0..=0x7f, divide);
            fill(division, [b'/'], enter_comment);
        }

        // Comment
        fill(&mut actions[State::Comment as usize], [b'\n'], end_comment);

        // String
        {
            let string = &mut actions[State::String as usize];
            fill(string, 0..=0x7f, append);
            fill(string, [END_SYMBOL], unterminated);
            fill(string, [b'"'], close_string);
        }

        // Char
        {
            let character = &mut actions[State::Char as usize];
            fill(character, 0..=0x7f, append);
            fill(character, [END_SYMBOL], unterminated);
            fill(character, [b'\''], close_char);
        }

        for (state, second) in [
            (State::Ampersand, b'&'),
            (State::Pipe, b'|'),
            (State::Equals, b'='),
            (State::NotEquals, b'='),
        ] {
            let row = &mut actions[state as usize];
            fill(row, 0..=0x7f, pair_single);
            fill(row, [second], pair_double);
        }

        // Word
        {
            let word = &mut actions[State::Word as usize];
            fill(word, 0..=0x7f, finish_before);
            fill(word, letters(), append);
            fill(word, b'0'..=b'9', append);
        }

        // Int
        {
            let int = &mut actions[State::Int as usize];
            fill(int, 0..=0x7f, finish_before);
            fill(int, b'0'..=b'9', append);
            fill(int, letters(), lexical_error);
            fill(int, [b'.'], enter_float);
            fill(int, *b"xX", hex_prefix);
        }

        // IntHex
        {
            actions[State::IntHex as usize] = actions[State::Int as usize];
            let hex = &mut actions[State::IntHex as usize];
            fill(hex, *b".xX", lexical_error);
            fill(hex, (b'A'..=b'F').chain(b'a'..=b'f'), append);
        }

        // Float
        {
            actions[State::Float as usize] = actions[State::Int as usize];
            let float = &mut actions[State::Float as usize];
            fill(float, *b".xX", lexical_error);
            fill(float, *b"eE", exponent);
        }

        // FloatExp
        {
            actions[State::FloatExp as usize] = actions[State::Float as usize];
            let exp = &mut actions[State::FloatExp as usize];
            fill(exp, *b"eE", lexical_error);
            fill(exp, *b"+-", exponent_sign);
        }

        // FloatExpSign
        {
            actions[State::FloatExpSign as usize] = actions[State::FloatExp as usize];
            fill(&mut actions[State::FloatExpSign as usize], *b"+-", lexical_error);
        }

        Self { actions }
    }

    /// Action for `symbol` in `state`; `symbol` must be below [`ALPHABET_SIZE`].
    pub(crate) fn action(&self, state: State, symbol: u8) -> Action {
        self.actions[state as usize][usize::from(symbol)]
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(table: &TransitionTable, input: &[u8]) -> Scan {
        let mut scan = Scan::default();
        for (col, &symbol) in input.iter().enumerate() {
            scan.location = SourceLocation::new(0, col);
            (table.action(scan.state, symbol))(&mut scan, symbol);
            if scan.completed {
                break;
            }
        }
        scan
    }

    #[test]
    fn test_word_stops_before_terminator() {
        let table = TransitionTable::new();
        let scan = run(&table, b"abc1+");
        assert_eq!(scan.raw, "abc1");
        assert_eq!(scan.kind, Some(TokenKind::Identifier));
        assert!(scan.completed && scan.hold);
    }

    #[test]
    fn test_doubled_and_single_operators() {
        let table = TransitionTable::new();
        assert_eq!(run(&table, b"&&").operator, Some(Operator::LogicalAnd));
        assert_eq!(run(&table, b"!=").operator, Some(Operator::NotEqualityTest));
        let single = run(&table, b"=x");
        assert_eq!(single.operator, Some(Operator::Assignment));
        assert!(single.hold);
    }

    #[test]
    fn test_comment_resets_to_start() {
        let table = TransitionTable::new();
        let scan = run(&table, b"// note\n");
        assert_eq!(scan.state, State::Start);
        assert!(scan.kind.is_none());
        assert!(!scan.completed);
    }

    #[test]
    fn test_exponent_requires_digit_before() {
        let table = TransitionTable::new();
        let scan = run(&table, b"1.e5 ");
        assert!(scan.error.is_some());
        let scan = run(&table, b"1.5e-5 ");
        assert!(scan.error.is_none());
        assert_eq!(scan.raw, "1.5e-5");
    }

    #[test]
    fn test_unsupported_start_symbol_is_fatal() {
        let table = TransitionTable::new();
        let scan = run(&table, b"#");
        assert_eq!(scan.fatal, Some(b'#'));
    }

    #[test]
    fn test_end_symbol_inside_string() {
        let table = TransitionTable::new();
        let scan = run(&table, b"\"abc\0");
        assert_eq!(scan.error.as_deref(), Some("unterminated string literal"));
        assert!(scan.completed);
    }
}
