//! Property-based tests for pattern matching
//!
//! Token lists are generated over a small set of token types so that matches are frequent
//! enough to be interesting:
//! - a pattern over a type absent from the list never matches, however often `find` runs
//! - without content matching, reported indices agree with a direct scan of the types

use lexmatch::pattern::TokenTypePattern;
use lexmatch::testing::mk_token;
use lexmatch::{Token, TokenType};
use proptest::prelude::*;

fn token_type_strategy() -> impl Strategy<Value = TokenType> {
    prop_oneof![
        Just(TokenType::Static),
        Just(TokenType::Inline),
        Just(TokenType::Identifier),
        Just(TokenType::Semicolon),
        Just(TokenType::Lparen),
        Just(TokenType::Rparen),
    ]
}

fn tokens_strategy() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec((token_type_strategy(), "[a-z]{1,6}"), 0..40).prop_map(|items| {
        let mut offset = 0;
        items
            .into_iter()
            .map(|(token_type, text)| {
                let token = mk_token(token_type, &text, offset);
                offset = token.end_offset + 1;
                token
            })
            .collect()
    })
}

/// Start indices of every `first` immediately followed by `second`, non-overlapping.
fn pair_starts(tokens: &[Token], first: TokenType, second: TokenType) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut index = 0;
    while index + 1 < tokens.len() {
        if tokens[index].token_type == first && tokens[index + 1].token_type == second {
            starts.push(index);
            index += 2;
        } else {
            index += 1;
        }
    }
    starts
}

proptest! {
    #[test]
    fn test_absent_type_never_matches(tokens in tokens_strategy(), calls in 1usize..5) {
        let pattern = TokenTypePattern::new("<STATIC>?<WHILE>").unwrap();
        let mut matcher = pattern.matcher(&tokens);
        for _ in 0..calls {
            prop_assert!(!matcher.find());
        }
    }

    #[test]
    fn test_identity_mapping_matches_direct_scan(tokens in tokens_strategy()) {
        let pattern = TokenTypePattern::new("<STATIC><INLINE>").unwrap();
        let mut matcher = pattern.matcher(&tokens);

        let mut found = Vec::new();
        while matcher.find() {
            let start = matcher.start().unwrap();
            prop_assert_eq!(matcher.end(), Some(start + 2));
            found.push(start);
        }

        prop_assert_eq!(found, pair_starts(&tokens, TokenType::Static, TokenType::Inline));
    }

    #[test]
    fn test_match_all_slices_are_contiguous(tokens in tokens_strategy()) {
        let pattern = TokenTypePattern::new("<LPAREN><IDENTIFIER>*<RPAREN>").unwrap();
        for slice in pattern.match_all(&tokens) {
            prop_assert!(slice.len() >= 2);
            prop_assert_eq!(slice[0].token_type, TokenType::Lparen);
            prop_assert_eq!(slice[slice.len() - 1].token_type, TokenType::Rparen);
            prop_assert!(slice[1..slice.len() - 1]
                .iter()
                .all(|token| token.token_type == TokenType::Identifier));
        }
    }

    #[test]
    fn test_content_mode_agrees_with_identity_mode(tokens in tokens_strategy()) {
        let plain = TokenTypePattern::new("<IDENTIFIER><SEMICOLON>").unwrap();
        let content = TokenTypePattern::new("<IDENTIFIER=.*><SEMICOLON>").unwrap();

        let plain_ranges: Vec<_> = plain.match_all(&tokens).iter().map(|s| s.len()).collect();
        let content_ranges: Vec<_> = content.match_all(&tokens).iter().map(|s| s.len()).collect();

        prop_assert_eq!(plain_ranges, content_ranges);
    }
}
