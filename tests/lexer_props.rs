use cfront::parser::lexer::Tokenizer;
use cfront::parser::lexicon::Lexicon;
use cfront::parser::parse::parse_source;
use proptest::prelude::*;

fn blank_line() -> impl Strategy<Value = String> {
    ("[ \t\r]*", proptest::option::of("[ -~\t]*")).prop_map(|(indent, comment)| match comment {
        Some(text) => format!("{indent}//{text}"),
        None => indent,
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn blank_input_has_no_tokens(lines in prop::collection::vec(blank_line(), 0..8)) {
        let source = lines.join("\n");
        let lexicon = Lexicon::default();
        let count = Tokenizer::from_source(&source, &lexicon).tokenize().map(|t| t.len());
        prop_assert!(matches!(count, Ok(0)), "input={:?} result={:?}", source, count);
    }

    #[test]
    fn never_panics_and_progresses(s in "[\\x00-\\x7f]*") {
        let lexicon = Lexicon::default();
        let mut last = None;
        let max_steps = s.len() + 1;

        for (steps, result) in Tokenizer::from_source(&s, &lexicon).enumerate() {
            let Ok(token) = result else { break };
            if let Some(previous) = last {
                prop_assert!(
                    token.location > previous,
                    "token moved backwards: {} after {} input={:?}", token.location, previous, s
                );
            }
            last = Some(token.location);
            prop_assert!(steps < max_steps, "too many tokens: input={:?}", s);
        }
    }

    #[test]
    fn parser_never_panics(s in "[ -~\n]{0,64}") {
        let lexicon = Lexicon::default();
        let _ = parse_source(&s, &lexicon);
    }
}
