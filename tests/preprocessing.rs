//! Integration tests for preprocessing
//!
//! Covers the rewrite rules end to end: collapse and discard regions, conditional
//! compilation, identifier filtering and mapping, and a preprocessed stream feeding a
//! pattern.

use lexmatch::pattern::TokenTypePattern;
use lexmatch::preprocessing::{
    CompilerAbstractionPreprocessor, ConfiguredPreprocessor, MacroPreprocessor, Preprocessor,
    RewriteRuleSet,
};
use lexmatch::testing::{mk_tokens, scan, texts};
use lexmatch::{Token, TokenType};
use rstest::rstest;

fn func_tokens() -> Vec<Token> {
    mk_tokens(&[
        (TokenType::Identifier, "FUNC"),
        (TokenType::Lparen, "("),
        (TokenType::Int, "int"),
        (TokenType::Comma, ","),
        (TokenType::Void, "void"),
        (TokenType::Rparen, ")"),
    ])
}

fn with_rules(configure: impl FnOnce(&mut RewriteRuleSet)) -> MacroPreprocessor {
    let mut rules = RewriteRuleSet::new();
    configure(&mut rules);
    MacroPreprocessor::new(rules)
}

#[test]
fn test_macro_collapse() {
    let tokens = func_tokens();
    let preprocessor = with_rules(|rules| {
        rules.add_collapse_macro("FUNC");
    });

    let output = preprocessor.preprocess(&tokens);

    assert_eq!(output.len(), 1);
    insta::assert_snapshot!(output[0].text.as_str(), @"FUNC ( int , void )");
    assert_eq!(output[0].token_type, tokens[0].token_type);
    assert_eq!(output[0].offset, tokens[0].offset);
    assert_eq!(output[0].line, tokens[0].line);
    assert_eq!(output[0].end_offset, tokens[5].end_offset);
}

#[test]
fn test_macro_discard() {
    let preprocessor = with_rules(|rules| {
        rules.add_discard_macro("FUNC");
    });

    assert!(preprocessor.preprocess(&func_tokens()).is_empty());
}

#[test]
fn test_nested_collapse_keeps_following_tokens() {
    let preprocessor = with_rules(|rules| {
        rules.add_collapse_macro("P2FUNC");
    });

    let output = preprocessor.preprocess(&scan("P2FUNC(void, CODE, (f))(int); x;"));

    assert_eq!(
        texts(&output),
        vec!["P2FUNC(void, CODE, (f))", "(", "int", ")", ";", "x", ";"]
    );
}

#[rstest]
#[case::true_branch(&["A"], &[], vec!["one", ";"])]
#[case::false_branch(&[], &["A"], vec!["two", ";"])]
fn test_conditional_compilation(
    #[case] true_conditions: &[&str],
    #[case] false_conditions: &[&str],
    #[case] expected: Vec<&str>,
) {
    let preprocessor = with_rules(|rules| {
        for condition in true_conditions {
            rules.add_true_condition(condition);
        }
        for condition in false_conditions {
            rules.add_false_condition(condition);
        }
    });

    let output = preprocessor.preprocess(&scan("#if A\none;\n#else\ntwo;\n#endif\n"));

    assert_eq!(texts(&output), expected);
    assert!(output
        .iter()
        .all(|token| token.token_type != TokenType::PreprocessorDirective));
}

#[test]
fn test_unknown_condition_keeps_everything() {
    let tokens = scan("#if B\nint b;\n#endif\n");
    let preprocessor = with_rules(|rules| {
        rules.add_true_condition("A");
    });

    let result = preprocessor.preprocess_with_diagnostics(&tokens);

    assert_eq!(result.tokens, tokens);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_filter_and_map_keep_location() {
    let tokens = scan("STATIC AUTOMATIC x;");
    let preprocessor = CompilerAbstractionPreprocessor::new();

    let output = preprocessor.preprocess(&tokens);

    assert!(output.iter().all(|token| token.text != "AUTOMATIC"));
    assert_eq!(output[0].text, "static");
    assert_eq!(output[0].token_type, TokenType::Static);
    assert_eq!(output[0].offset, tokens[0].offset);
    assert_eq!(output[0].end_offset, tokens[0].end_offset);
    assert_eq!(output[0].line, tokens[0].line);
}

#[test]
fn test_input_is_not_modified() {
    let tokens = scan("STATIC FUNC(void, CODE) f(void);");
    let before = tokens.clone();

    let _ = CompilerAbstractionPreprocessor::new().preprocess(&tokens);

    assert_eq!(tokens, before);
}

#[test]
fn test_preprocessed_stream_feeds_patterns() {
    let tokens = scan("STATIC INLINE FUNC(void, CODE) f(void);");
    let preprocessed = CompilerAbstractionPreprocessor::new().preprocess(&tokens);

    let pattern = TokenTypePattern::new("<STATIC><INLINE><IDENTIFIER=FUNC.*><IDENTIFIER>").unwrap();
    let matches = pattern.match_all(&preprocessed);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0][3].text, "f");
}

#[test]
fn test_configured_preprocessor_from_pairs() {
    let preprocessor = ConfiguredPreprocessor::from_properties(
        "rules",
        vec![
            ("rules.collapse-macro.1".to_string(), "FUNC".to_string()),
            ("rules.false-condition.1".to_string(), "defined(DEBUG)".to_string()),
        ],
    )
    .unwrap();

    let output = preprocessor.preprocess(&scan(
        "#if defined(DEBUG)\nlog();\n#endif\nFUNC(void, CODE) f;",
    ));

    assert_eq!(texts(&output), vec!["FUNC(void, CODE)", "f", ";"]);
}

#[test]
fn test_shared_across_threads() {
    let preprocessor = std::sync::Arc::new(CompilerAbstractionPreprocessor::new());

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let preprocessor = preprocessor.clone();
            std::thread::spawn(move || {
                let source = format!("STATIC FUNC(int, CODE) f{}(void);", n);
                preprocessor.preprocess(&scan(&source))
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let output = handle.join().unwrap();
        assert_eq!(output[1].text, "FUNC(int, CODE)");
        assert_eq!(output[2].text, format!("f{}", n));
    }
}
