use linegrep::{compile, is_match, MatchError, PatternError, MAX_DEPTH};

fn test_pattern(pattern: &str, text: &str, expected: bool) {
    let regex = compile(pattern)
        .unwrap_or_else(|e| panic!("Failed to parse pattern {pattern:?}: {e}"));
    let result = regex.matches(text);
    assert_eq!(
        result, expected,
        "Pattern '{}' against text '{}' - expected: {}, got: {}",
        pattern, text, expected, result
    );
}

fn captures_of(pattern: &str, text: &str) -> Vec<Option<String>> {
    let caps = compile(pattern).unwrap().find(text).expect("expected a match");
    caps.iter().map(|(_, g)| g.map(str::to_string)).collect()
}

#[cfg(test)]
mod literal_tests {
    use super::*;

    #[test]
    fn test_exact_word() {
        test_pattern("hello", "hello", true);
        test_pattern("hello", "world", false);
    }

    #[test]
    fn test_word_inside_line() {
        test_pattern("world", "hello world", true);
    }

    #[test]
    fn test_is_match_helper() {
        assert_eq!(is_match("hello", "ell"), Ok(true));
        assert_eq!(is_match("hello", "["), Err(PatternError::UnbalancedBracket { pos: 0 }));
    }
}

#[cfg(test)]
mod anchor_tests {
    use super::*;

    #[test]
    fn test_start_anchor() {
        test_pattern("^cat", "cat", true);
        test_pattern("^cat", "scatter", false);
        test_pattern("^cat", "the cat", false);
        test_pattern("^cat", "ct", false);
    }

    #[test]
    fn test_end_anchor() {
        test_pattern("cat$", "cat", true);
        test_pattern("dog$", "dogdogdog", true);
        test_pattern("cat$", "the cat", true);
        test_pattern("cat$", "ct", false);
        test_pattern("cat$", "cats", false);
    }

    #[test]
    fn test_both_anchors() {
        test_pattern("^cat$", "cat", true);
        test_pattern("^cat$", "cats", false);
        test_pattern("^cat$", "the cat", false);
    }

    #[test]
    fn test_anchored_match_equals_whole_text_match() {
        let cases = [
            ("a+b?", "aab"),
            ("a+b?", "aabb"),
            (r"\w+ \d", "ab 1"),
            ("(x|xy)z", "xyz"),
        ];
        for (body, text) in cases {
            let anchored = compile(&format!("^{body}$")).unwrap();
            let whole = compile(body)
                .unwrap()
                .find(text)
                .map(|c| c.span() == (0..text.chars().count()))
                .unwrap_or(false);
            assert_eq!(anchored.matches(text), whole, "{body} on {text}");
        }
    }
}

#[cfg(test)]
mod quantifier_tests {
    use super::*;

    #[test]
    fn test_zero_or_one() {
        test_pattern("ca?t", "cat", true);
        test_pattern("ca?t", "act", true);
        test_pattern("ca?t", "cbt", false);
        test_pattern("ca?t", "dog", false);
        test_pattern("ca?t", "cag", false);
    }

    #[test]
    fn test_zero_or_one_is_not_zero_or_more() {
        test_pattern("ca?t", "a caat", false);
        test_pattern(r"c\w?t", "caaat", false);
    }

    #[test]
    fn test_one_or_more() {
        test_pattern("ca+ts", "caaats", true);
        test_pattern("ca+t", "cat", true);
        test_pattern("ca+ts", "caabats", false);
        test_pattern("ca+t", "act", false);
        test_pattern("ca+t", "ca", false);
    }

    #[test]
    fn test_one_or_more_needs_one() {
        test_pattern("^x+$", "", false);
        test_pattern("^x?$", "", true);
    }
}

#[cfg(test)]
mod class_tests {
    use super::*;

    #[test]
    fn test_digits() {
        test_pattern(r"\d", "a1b", true);
        test_pattern(r"\d", "abc", false);
        test_pattern(r"\d+", "abc", false);
        test_pattern(r"\d+", "123", true);
        test_pattern(r"\d+", "a1b", true);
        test_pattern(r"\d?", "a1b", true);
        test_pattern(r"\d?", "0", true);
    }

    #[test]
    fn test_words() {
        test_pattern(r"\w+", "a1b", true);
        test_pattern(r"\w", "!@#", false);
        test_pattern(r"\w?", "!@#", true);
        test_pattern(r"c\w?t", "cat", true);
        test_pattern(r"c\w+t", "caaat", true);
        test_pattern(r"c\w+t", "caa?t", false);
        test_pattern(r"c\w?t", "caaa!t", false);
        test_pattern(r"\w", "_", false);
    }

    #[test]
    fn test_char_groups() {
        test_pattern("[abcd]", "a", true);
        test_pattern("[cd]at", "cat", true);
        test_pattern("[cd]at", "dat", true);
        test_pattern("[cd]at", "bat", false);
        test_pattern("[^cd]at", "cat", false);
        test_pattern("[^cd]at", "bat", true);
        test_pattern("[^abc]", "abc", false);
    }

    #[test]
    fn test_wildcard() {
        test_pattern("c.t", "cat", true);
        test_pattern("g.+gol", "goøö0Ogol", true);
        test_pattern("c.t", "car", false);
        test_pattern("g.+gol", "gol", false);
    }
}

#[cfg(test)]
mod groups_and_backreferences_tests {
    use super::*;

    #[test]
    fn test_alternation() {
        test_pattern("(cat|dog)", "cat", true);
        test_pattern("(cat|dog)", "dog", true);
        test_pattern("(cat|dog)", "duck", false);
        test_pattern("a (cat|dog)", "a cat", true);
        test_pattern("a (cat|dog)", "one dog", false);
    }

    #[test]
    fn test_backreferences_across_groups() {
        let pattern = r"(\d+) (\w+) squares and \1 \2 circles";
        test_pattern(pattern, "3 red squares and 3 red circles", true);
        test_pattern(pattern, "3 red squares and 4 red circles", false);
        assert_eq!(
            captures_of(pattern, "3 red squares and 3 red circles"),
            vec![Some("3".into()), Some("red".into())]
        );
    }

    #[test]
    fn test_nested_backreferences() {
        let pattern = r"('(cat) and \2') is the same as \1";
        test_pattern(pattern, "'cat and cat' is the same as 'cat and cat'", true);
        test_pattern(pattern, "'cat and cat' is the same as 'cat and dog'", false);
        assert_eq!(
            captures_of(pattern, "'cat and cat' is the same as 'cat and cat'"),
            vec![Some("'cat and cat'".into()), Some("cat".into())]
        );
    }

    #[test]
    fn test_backreference_repeats_exact_substring() {
        let p = compile(r"(\w+)-\1").unwrap();
        for text in ["ab-ab", "xyz-xyz", "abc-abcd"] {
            let caps = p.find(text).unwrap();
            let group = caps.get(1).unwrap();
            assert_eq!(caps.matched(), format!("{group}-{group}"));
        }
        test_pattern(r"^(\w+)-\1$", "abc-abd", false);
    }

    #[test]
    fn test_leftmost_alternative_not_longest() {
        assert_eq!(captures_of("(a|ab)", "ab"), vec![Some("a".into())]);
        assert_eq!(captures_of("(ab|a)", "ab"), vec![Some("ab".into())]);
    }
}

#[cfg(test)]
mod reuse_tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_repeated_calls_agree() {
        let p = compile(r"^(\w+)c?\1$").unwrap();
        for text in ["abab", "abcab", "abcabc", "nope"] {
            let first = (p.matches(text), p.find(text));
            for _ in 0..5 {
                assert_eq!((p.matches(text), p.find(text)), first);
            }
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let p = Arc::new(compile(r"(\d+)-\1").unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let p = Arc::clone(&p);
                thread::spawn(move || {
                    let caps = p.find(&format!("id {i}-{i}"))?;
                    Some(caps.get(1).map(str::to_string))
                })
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            assert_eq!(h.join().unwrap(), Some(Some(i.to_string())));
        }
    }

    #[test]
    fn test_giving_up_is_not_a_negative_result() {
        let p = compile(&format!("^{}{}$", "a?".repeat(16), "a".repeat(16)))
            .unwrap()
            .with_step_limit(200);
        let text = "a".repeat(15);
        assert!(!p.matches(&text));
        assert_eq!(p.try_matches(&text), Err(MatchError::TooComplex { limit: 200 }));

        let deep = compile(&"a?".repeat(MAX_DEPTH + 10)).unwrap();
        assert_eq!(deep.find("b"), None);
        assert_eq!(deep.try_find("b"), Err(MatchError::TooDeep { limit: MAX_DEPTH }));
    }

    #[test]
    fn test_long_line_scan_stays_within_budget() {
        let text = format!("{}x", "a".repeat(1_100_000));
        test_pattern("x", &text, true);
        test_pattern("a+x$", &text, true);
    }

    #[test]
    fn test_from_str_and_display() {
        let p: linegrep::CompiledPattern = "^a(b|c)$".parse().unwrap();
        assert_eq!(p.to_string(), "^a(b|c)$");
        assert!("a)".parse::<linegrep::CompiledPattern>().is_err());
    }
}
