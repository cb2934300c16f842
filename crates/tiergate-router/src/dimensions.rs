// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Independent dimension scorers.
//!
//! Every scorer is a pure function over the lower-cased user text (or the
//! token estimate) returning a contribution in `[-1, 1]` and an optional
//! signal. Keyword families are plain substring matches; the only regexes are
//! the fixed multi-step patterns below.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tiergate_config::model::{KeywordSets, TokenThresholds};
use tiergate_core::DimensionScore;

/// Multi-step / numbered-list patterns.
static MULTI_STEP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"first.*then").unwrap(),
        Regex::new(r"step \d").unwrap(),
        Regex::new(r"\d\.\s").unwrap(),
    ]
});

/// Question marks above this count score as a multi-question request.
const QUESTION_COUNT_THRESHOLD: usize = 3;

/// Rough token estimate: four characters per token, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    text.chars().count().div_ceil(4) as u64
}

/// Match-count thresholds for one keyword family.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    low: usize,
    high: usize,
}

/// Scores for zero, low, and high match counts.
#[derive(Debug, Clone, Copy)]
struct Scores {
    none: f64,
    low: f64,
    high: f64,
}

/// Every dimension score for one request plus the counts the classifier needs.
#[derive(Debug, Clone)]
pub struct DimensionReport {
    pub dimensions: Vec<DimensionScore>,
    /// Distinct reasoning keywords found in the user text.
    pub reasoning_matches: usize,
    pub agentic_score: f64,
    pub browser_score: f64,
}

/// Distinct keywords from `keywords` contained in `text`. `text` must be
/// lower-cased; keywords listed twice (in any case) count once.
pub fn keyword_matches<'k>(text: &str, keywords: &'k [String]) -> Vec<&'k str> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter(|kw| {
            let lower = kw.to_lowercase();
            !lower.is_empty() && text.contains(lower.as_str()) && seen.insert(lower)
        })
        .map(String::as_str)
        .collect()
}

fn keyword_dimension(
    name: &'static str,
    label: &str,
    matches: &[&str],
    thresholds: Thresholds,
    scores: Scores,
) -> DimensionScore {
    let count = matches.len();
    let score = if count >= thresholds.high {
        scores.high
    } else if count >= thresholds.low {
        scores.low
    } else {
        return DimensionScore {
            name,
            score: scores.none,
            signal: None,
        };
    };
    let shown: Vec<&str> = matches.iter().take(3).copied().collect();
    DimensionScore {
        name,
        score,
        signal: Some(format!("{label} ({})", shown.join(", "))),
    }
}

/// Short prompts push toward SIMPLE, very long ones toward COMPLEX.
pub fn score_token_count(tokens: u64, thresholds: &TokenThresholds) -> DimensionScore {
    let (score, signal) = if tokens < thresholds.simple {
        (-1.0, Some(format!("short ({tokens} tokens)")))
    } else if tokens > thresholds.complex {
        (1.0, Some(format!("long ({tokens} tokens)")))
    } else {
        (0.0, None)
    };
    DimensionScore {
        name: "token_count",
        score,
        signal,
    }
}

pub fn score_multi_step(text: &str) -> DimensionScore {
    let hit = MULTI_STEP_PATTERNS.iter().any(|re| re.is_match(text));
    DimensionScore {
        name: "multi_step_patterns",
        score: if hit { 0.5 } else { 0.0 },
        signal: hit.then(|| "multi-step".to_string()),
    }
}

pub fn score_question_complexity(text: &str) -> DimensionScore {
    // ASCII and full-width question marks.
    let count = text.matches(['?', '？']).count();
    let hit = count > QUESTION_COUNT_THRESHOLD;
    DimensionScore {
        name: "question_complexity",
        score: if hit { 0.5 } else { 0.0 },
        signal: hit.then(|| format!("{count} questions")),
    }
}

/// Intent score from a match count: >=4 -> 1.0, >=3 -> 0.6, >=1 -> 0.2.
pub fn intent_score(match_count: usize) -> f64 {
    match match_count {
        0 => 0.0,
        1..=2 => 0.2,
        3 => 0.6,
        _ => 1.0,
    }
}

fn intent_dimension(name: &'static str, label: &str, matches: &[&str]) -> DimensionScore {
    let score = intent_score(matches.len());
    let signal = (score > 0.0).then(|| {
        let shown: Vec<&str> = matches.iter().take(3).copied().collect();
        format!("{label} ({})", shown.join(", "))
    });
    DimensionScore {
        name,
        score,
        signal,
    }
}

/// Score every dimension.
///
/// `user_lower` is the lower-cased user prompt; `estimated_tokens` covers the
/// system prompt as well.
pub fn score_dimensions(
    user_lower: &str,
    estimated_tokens: u64,
    token_thresholds: &TokenThresholds,
    keywords: &KeywordSets,
) -> DimensionReport {
    let t = |low, high| Thresholds { low, high };
    let s = |low, high| Scores {
        none: 0.0,
        low,
        high,
    };

    let reasoning_matches = keyword_matches(user_lower, &keywords.reasoning).len();
    let agentic = keyword_matches(user_lower, &keywords.agentic);
    let browser = keyword_matches(user_lower, &keywords.browser);

    let mut dimensions = Vec::with_capacity(16);
    dimensions.push(score_token_count(estimated_tokens, token_thresholds));

    let families: [(&'static str, &str, &[String], Thresholds, Scores); 4] = [
        ("code_presence", "code", keywords.code.as_slice(), t(1, 2), s(0.5, 1.0)),
        ("reasoning_markers", "reasoning", keywords.reasoning.as_slice(), t(1, 2), s(0.7, 1.0)),
        ("technical_terms", "technical", keywords.technical.as_slice(), t(2, 4), s(0.5, 1.0)),
        ("creative_markers", "creative", keywords.creative.as_slice(), t(1, 2), s(0.5, 0.7)),
    ];
    for (name, label, list, thresholds, scores) in families {
        let matches = keyword_matches(user_lower, list);
        dimensions.push(keyword_dimension(name, label, &matches, thresholds, scores));
    }

    dimensions.push(keyword_dimension(
        "simple_indicators",
        "simple",
        &keyword_matches(user_lower, &keywords.simple),
        t(1, 2),
        s(-1.0, -1.0),
    ));
    dimensions.push(score_multi_step(user_lower));
    dimensions.push(score_question_complexity(user_lower));

    let structural: [(&'static str, &str, &[String], Thresholds, Scores); 6] = [
        ("imperative_verbs", "imperative", keywords.imperative.as_slice(), t(1, 2), s(0.3, 0.5)),
        ("constraint_count", "constraints", keywords.constraint.as_slice(), t(1, 3), s(0.3, 0.7)),
        ("output_format", "format", keywords.output_format.as_slice(), t(1, 2), s(0.4, 0.7)),
        ("reference_complexity", "references", keywords.reference.as_slice(), t(1, 2), s(0.3, 0.5)),
        ("negation_complexity", "negation", keywords.negation.as_slice(), t(2, 3), s(0.3, 0.5)),
        ("domain_specificity", "domain-specific", keywords.domain.as_slice(), t(1, 2), s(0.5, 0.8)),
    ];
    for (name, label, list, thresholds, scores) in structural {
        let matches = keyword_matches(user_lower, list);
        dimensions.push(keyword_dimension(name, label, &matches, thresholds, scores));
    }

    let agentic_dim = intent_dimension("agentic_task", "agentic", &agentic);
    let browser_dim = intent_dimension("browser_automation", "browser", &browser);
    let agentic_score = agentic_dim.score;
    let browser_score = browser_dim.score;
    dimensions.push(agentic_dim);
    dimensions.push(browser_dim);

    DimensionReport {
        dimensions,
        reasoning_matches,
        agentic_score,
        browser_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> KeywordSets {
        KeywordSets::default()
    }

    fn find<'a>(report: &'a DimensionReport, name: &str) -> &'a DimensionScore {
        report
            .dimensions
            .iter()
            .find(|d| d.name == name)
            .unwrap_or_else(|| panic!("missing dimension {name}"))
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn token_count_extremes() {
        let thresholds = TokenThresholds::default();
        assert_eq!(score_token_count(10, &thresholds).score, -1.0);
        assert_eq!(score_token_count(200, &thresholds).score, 0.0);
        let long = score_token_count(800, &thresholds);
        assert_eq!(long.score, 1.0);
        assert_eq!(long.signal.as_deref(), Some("long (800 tokens)"));
    }

    #[test]
    fn every_weighted_dimension_is_scored_once() {
        let report = score_dimensions("hello", 2, &TokenThresholds::default(), &keywords());
        let weights = tiergate_config::model::DimensionWeights::default();
        let names: Vec<&str> = report.dimensions.iter().map(|d| d.name).collect();
        let expected: Vec<&str> = weights.as_pairs().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn scores_stay_in_unit_range() {
        let text = "first prove the theorem step by step, then implement the function \
                    in a class with async await and return json. don't use the api. \
                    1. parse 2. test. why? how? what? where? when?";
        let report = score_dimensions(text, 5_000, &TokenThresholds::default(), &keywords());
        for dim in &report.dimensions {
            assert!((-1.0..=1.0).contains(&dim.score), "{} = {}", dim.name, dim.score);
        }
    }

    #[test]
    fn simple_query_markers() {
        let report = score_dimensions(
            "what is the capital of france?",
            8,
            &TokenThresholds::default(),
            &keywords(),
        );
        assert_eq!(find(&report, "simple_indicators").score, -1.0);
        assert_eq!(find(&report, "token_count").score, -1.0);
        assert_eq!(report.reasoning_matches, 0);
    }

    #[test]
    fn reasoning_matches_are_distinct_keywords() {
        let report = score_dimensions(
            "prove this theorem step by step",
            8,
            &TokenThresholds::default(),
            &keywords(),
        );
        assert!(report.reasoning_matches >= 2);
        let dim = find(&report, "reasoning_markers");
        assert_eq!(dim.score, 1.0);
        assert!(dim.signal.as_deref().unwrap().starts_with("reasoning ("));
    }

    #[test]
    fn duplicate_keywords_count_once() {
        let list: Vec<String> = ["prove", "prove", "PROVE", "theorem"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(keyword_matches("prove it", &list), vec!["prove"]);
        assert_eq!(keyword_matches("prove the theorem", &list).len(), 2);
    }

    #[test]
    fn multi_step_patterns_match() {
        assert_eq!(score_multi_step("first do x, then do y").score, 0.5);
        assert_eq!(score_multi_step("see step 2 below").score, 0.5);
        assert_eq!(score_multi_step("1. one 2. two").score, 0.5);
        assert_eq!(score_multi_step("just one thing").score, 0.0);
    }

    #[test]
    fn question_density_needs_more_than_three() {
        assert_eq!(score_question_complexity("a? b? c?").score, 0.0);
        let dim = score_question_complexity("a? b? c? d?");
        assert_eq!(dim.score, 0.5);
        assert_eq!(dim.signal.as_deref(), Some("4 questions"));
    }

    #[test]
    fn full_width_question_marks_count() {
        let dim = score_question_complexity("为什么？怎么做？在哪里？什么时候？");
        assert_eq!(dim.score, 0.5);
        assert_eq!(dim.signal.as_deref(), Some("4 questions"));
        assert_eq!(score_question_complexity("why? 为什么？ how?").score, 0.0);
        assert_eq!(score_question_complexity("why? 为什么？ how? 怎么？").score, 0.5);
    }

    #[test]
    fn intent_score_steps() {
        assert_eq!(intent_score(0), 0.0);
        assert_eq!(intent_score(1), 0.2);
        assert_eq!(intent_score(2), 0.2);
        assert_eq!(intent_score(3), 0.6);
        assert_eq!(intent_score(7), 1.0);
    }

    #[test]
    fn uppercase_config_keywords_still_match() {
        let mut kw = keywords();
        kw.domain = vec!["Kubernetes".to_string()];
        let report = score_dimensions("scale kubernetes pods", 5, &TokenThresholds::default(), &kw);
        assert_eq!(find(&report, "domain_specificity").score, 0.5);
    }

    #[test]
    fn signal_lists_at_most_three_keywords() {
        let dim = keyword_dimension(
            "code_presence",
            "code",
            &["a", "b", "c", "d"],
            Thresholds { low: 1, high: 2 },
            Scores {
                none: 0.0,
                low: 0.5,
                high: 1.0,
            },
        );
        assert_eq!(dim.signal.as_deref(), Some("code (a, b, c)"));
    }
}
