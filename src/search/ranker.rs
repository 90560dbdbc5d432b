// file: src/search/ranker.rs
// description: ranked keyword matching over headings and paragraphs

use crate::config::{Config, ScoringConfig, SearchConfig, SnippetConfig};
use crate::models::{Heading, MatchType, SearchMatch};
use crate::search::content::{
    SnippetWindow, UNTITLED_REGION, make_snippet, nearest_heading, split_paragraphs,
};
use crate::search::scoring::{
    FuzzyOptions, QueryKeyword, ScoreAccumulator, content_score, heading_score,
};
use crate::search::similarity::{SequenceRatio, SimilarityMeasure};
use tracing::debug;

/// Matches produced by one ranking pass plus what the pass did.
#[derive(Debug, Clone, Default)]
pub struct RankedResults {
    pub matches: Vec<SearchMatch>,
    pub heading_hits: usize,
    pub content_hits: usize,
    pub content_searched: bool,
}

/// Scores headings first and falls back to paragraph search when headings
/// alone give too few hits. Results are sorted by descending score, ties
/// kept in discovery order, and capped at `max_results`.
pub struct RankedMatcher {
    search: SearchConfig,
    scoring: ScoringConfig,
    snippet: SnippetConfig,
    similarity: Box<dyn SimilarityMeasure>,
}

impl RankedMatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            search: config.search.clone(),
            scoring: config.scoring.clone(),
            snippet: config.snippet.clone(),
            similarity: Box::new(SequenceRatio),
        }
    }

    pub fn with_similarity(mut self, similarity: Box<dyn SimilarityMeasure>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn search<I, S>(
        &self,
        keywords: I,
        full_text: &str,
        headings: &[Heading],
        fuzzy_enabled: bool,
        fuzzy_threshold: u8,
    ) -> Vec<SearchMatch>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rank(keywords, full_text, headings, FuzzyOptions::new(fuzzy_enabled, fuzzy_threshold))
            .matches
    }

    pub fn rank<I, S>(
        &self,
        keywords: I,
        full_text: &str,
        headings: &[Heading],
        fuzzy: FuzzyOptions,
    ) -> RankedResults
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<QueryKeyword> = keywords
            .into_iter()
            .filter_map(|k| QueryKeyword::new(k.as_ref()))
            .collect();

        if keywords.is_empty() {
            debug!("No usable keywords, skipping search");
            return RankedResults::default();
        }

        let mut matches = self.search_headings(&keywords, headings, fuzzy);
        let heading_hits = matches.len();

        let mut content_hits = 0;
        let content_searched = heading_hits < self.search.heading_sufficiency;
        if content_searched {
            let content = self.search_content(&keywords, full_text, headings, fuzzy);
            content_hits = content.len();
            matches.extend(content);
        }

        // stable: equal scores keep headings before content, each in position order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.search.max_results);

        debug!(
            "Ranked {} heading and {} content hits, returning {}",
            heading_hits,
            content_hits,
            matches.len()
        );

        RankedResults {
            matches,
            heading_hits,
            content_hits,
            content_searched,
        }
    }

    fn search_headings(
        &self,
        keywords: &[QueryKeyword],
        headings: &[Heading],
        fuzzy: FuzzyOptions,
    ) -> Vec<SearchMatch> {
        let mut accumulator = ScoreAccumulator::new();

        for (index, heading) in headings.iter().enumerate() {
            let lower = heading.text.to_lowercase();
            for keyword in keywords {
                let score = heading_score(
                    &keyword.lower,
                    &lower,
                    fuzzy,
                    &self.scoring,
                    self.similarity.as_ref(),
                );
                accumulator.add(heading.position, index, &keyword.original, score);
            }
        }

        accumulator
            .into_entries()
            .map(|(position, hit)| {
                SearchMatch::new(
                    headings[hit.source].text.clone(),
                    position,
                    hit.score,
                    MatchType::Heading,
                    hit.keywords,
                )
            })
            .collect()
    }

    fn search_content(
        &self,
        keywords: &[QueryKeyword],
        full_text: &str,
        headings: &[Heading],
        fuzzy: FuzzyOptions,
    ) -> Vec<SearchMatch> {
        let paragraphs = split_paragraphs(full_text);
        let mut accumulator = ScoreAccumulator::new();

        for (index, paragraph) in paragraphs.iter().enumerate() {
            for keyword in keywords {
                let score = content_score(
                    &keyword.lower,
                    &paragraph.lower,
                    paragraph.char_len,
                    fuzzy,
                    self.search.content_fuzzy_max_chars,
                    &self.scoring,
                    self.similarity.as_ref(),
                );
                accumulator.add(paragraph.position, index, &keyword.original, score);
            }
        }

        let window = self.snippet_window();
        accumulator
            .into_entries()
            .map(|(position, hit)| {
                let paragraph = &paragraphs[hit.source];
                let label = nearest_heading(headings, position)
                    .map(|h| h.text.as_str())
                    .unwrap_or(UNTITLED_REGION);
                let snippet = make_snippet(paragraph.text, &hit.keywords, window);

                SearchMatch::new(
                    format!("{} - {}", label, snippet),
                    position,
                    hit.score,
                    MatchType::Content,
                    hit.keywords,
                )
            })
            .collect()
    }

    fn snippet_window(&self) -> SnippetWindow {
        SnippetWindow {
            verbatim_max_chars: self.snippet.verbatim_max_chars,
            context_before: self.snippet.context_before,
            context_after: self.snippet.context_after,
            fallback_chars: self.snippet.fallback_chars,
        }
    }
}

impl Default for RankedMatcher {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    struct BrokenSimilarity;

    impl SimilarityMeasure for BrokenSimilarity {
        fn ratio(&self, _a: &str, _b: &str) -> Result<f64, CapabilityError> {
            Err(CapabilityError::Unavailable("similarity"))
        }
    }

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn redis_jvm_document() -> (String, Vec<Heading>) {
        let text = "Redis Caching\n=============\nRedis eviction policies are configurable.\n\n\
                    JVM Tuning\n==========\nHeap sizing matters.\n"
            .to_string();
        let jvm = text.find("JVM Tuning").unwrap_or_default();
        let headings = vec![Heading::new("Redis Caching", 0, 1), Heading::new("JVM Tuning", jvm, 1)];
        (text, headings)
    }

    fn assert_sorted(matches: &[SearchMatch]) {
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_heading_and_content_hit() {
        let (text, headings) = redis_jvm_document();
        let matcher = RankedMatcher::default();

        let results = matcher.search(&keywords(&["redis"]), &text, &headings, true, 70);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].match_type, MatchType::Heading);
        assert_eq!(results[0].text, "Redis Caching");
        assert_eq!(results[0].position, 0);
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].keywords, vec!["redis"]);

        assert_eq!(results[1].match_type, MatchType::Content);
        assert!(results[1].text.starts_with("Redis Caching - "));
        assert!(results[1].text.contains("Redis eviction policies are configurable."));
        assert_eq!(results[1].score, 1.0);
    }

    #[test]
    fn test_exact_mode_is_stricter_than_fuzzy() {
        let headings = vec![Heading::new("Java Basics", 0, 1)];
        let text = "Java Basics";
        let matcher = RankedMatcher::default();

        let exact = matcher.search(&keywords(&["jave basics"]), text, &headings, false, 70);
        assert!(exact.is_empty());

        let fuzzy = matcher.search(&keywords(&["jave basics"]), text, &headings, true, 70);
        assert!(!fuzzy.is_empty());
        assert_eq!(fuzzy[0].match_type, MatchType::Heading);
        // 1 + 90.9/100
        assert!(fuzzy[0].score > 1.9);
    }

    #[test]
    fn test_prefix_keyword_matches_as_substring() {
        let headings = vec![Heading::new("Java Basics", 0, 1)];
        let matcher = RankedMatcher::default();

        let results = matcher.search(&keywords(&["jav"]), "Java Basics", &headings, false, 70);
        assert_eq!(results[0].match_type, MatchType::Heading);
        assert_eq!(results[0].score, 1.0);
    }

    fn spring_document(topics: usize) -> (String, Vec<Heading>) {
        let mut text = String::new();
        let mut headings = Vec::new();
        for i in 0..topics {
            headings.push(Heading::new(format!("Spring topic {i}"), text.chars().count(), 2));
            text.push_str(&format!("## Spring topic {i}\n\nspring details {i}\n\n"));
        }
        (text, headings)
    }

    fn rank_spring(topics: usize) -> RankedResults {
        let (text, headings) = spring_document(topics);
        RankedMatcher::default().rank(
            &keywords(&["spring"]),
            &text,
            &headings,
            FuzzyOptions::new(true, 70),
        )
    }

    #[test]
    fn test_enough_heading_hits_skip_content_search() {
        let results = rank_spring(15);

        assert!(!results.content_searched);
        assert_eq!(results.heading_hits, 15);
        assert_eq!(results.matches.len(), 15);
        assert!(results.matches.iter().all(|m| m.is_heading()));
    }

    #[test]
    fn test_content_search_stops_exactly_at_heading_sufficiency() {
        assert_eq!(Config::default_config().search.heading_sufficiency, 10);

        let below = rank_spring(9);
        assert!(below.content_searched);
        assert_eq!(below.heading_hits, 9);
        assert!(below.content_hits > 0);
        assert!(below.matches.iter().any(|m| !m.is_heading()));

        let at = rank_spring(10);
        assert!(!at.content_searched);
        assert_eq!(at.heading_hits, 10);
        assert_eq!(at.content_hits, 0);
        assert!(at.matches.iter().all(|m| m.is_heading()));
    }

    #[test]
    fn test_results_are_capped_and_sorted() {
        let text = (0..40)
            .map(|i| format!("paragraph {i} mentions kafka"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let results = RankedMatcher::default().search(&keywords(&["kafka", "mentions"]), &text, &[], true, 70);

        assert_eq!(results.len(), 30);
        assert_sorted(&results);
        assert!(results.iter().all(|m| m.text.starts_with(UNTITLED_REGION)));
        // equal scores keep document order
        assert!(results.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn test_scores_merge_per_location() {
        let headings = vec![Heading::new("Redis Cluster Setup", 0, 1)];
        let results = RankedMatcher::default().search(
            &keywords(&["cluster", "redis"]),
            "Redis Cluster Setup",
            &headings,
            false,
            70,
        );

        let heading = results.iter().find(|m| m.is_heading()).map(|m| m.score);
        assert_eq!(heading, Some(2.0));
        assert_eq!(results[0].keywords, vec!["cluster", "redis"]);
        assert_eq!(results.iter().filter(|m| m.is_heading()).count(), 1);
    }

    #[test]
    fn test_more_keywords_raise_scores() {
        let (text, headings) = redis_jvm_document();
        let matcher = RankedMatcher::default();

        let fewer = matcher.search(&keywords(&["redis"]), &text, &headings, true, 70);
        let more = matcher.search(&keywords(&["caching", "redis"]), &text, &headings, true, 70);

        // "caching" also hits the heading (ratio 70 against "redis caching")
        let heading_score = |results: &[SearchMatch]| {
            results
                .iter()
                .find(|m| m.is_heading() && m.position == 0)
                .map(|m| m.score)
                .unwrap_or_default()
        };
        assert!(heading_score(&more) > heading_score(&fewer));

        for hit in &fewer {
            let again = more
                .iter()
                .find(|m| m.position == hit.position && m.match_type == hit.match_type)
                .map(|m| m.score)
                .unwrap_or_default();
            assert!(again >= hit.score);
        }
    }

    #[test]
    fn test_blank_and_empty_keywords() {
        let (text, headings) = redis_jvm_document();
        let matcher = RankedMatcher::default();

        assert!(matcher.search(&keywords(&[]), &text, &headings, true, 70).is_empty());
        assert!(matcher.search(&keywords(&["", "  "]), &text, &headings, true, 70).is_empty());
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let results = RankedMatcher::default().search(&keywords(&["redis"]), "", &[], true, 70);
        assert!(results.is_empty());
    }

    #[test]
    fn test_content_hit_without_headings_uses_untitled_label() {
        let results = RankedMatcher::default().search(
            &keywords(&["缓存"]),
            "介绍\n\n缓存策略很重要",
            &[],
            false,
            70,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, format!("{UNTITLED_REGION} - 缓存策略很重要"));
        assert_eq!(results[0].position, "介绍\n\n".chars().count());
        assert_eq!(results[0].position, 4);
    }

    #[test]
    fn test_cjk_content_gets_preceding_heading() {
        let text = "介绍介绍\n\nredis\n\n缓存";
        let headings = vec![Heading::new("介绍介绍", 0, 1), Heading::new("缓存", 13, 1)];

        let results = RankedMatcher::default().search(&keywords(&["redis"]), text, &headings, false, 70);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 6);
        assert_eq!(results[0].text, "介绍介绍 - redis");
    }

    #[test]
    fn test_long_content_snippet_is_bounded() {
        let paragraph = format!("{} redis {}", "word ".repeat(60), "tail ".repeat(60));
        let headings = vec![Heading::new("Intro", 0, 1)];
        let text = format!("Intro\n\n{paragraph}");

        let results = RankedMatcher::default().search(&keywords(&["redis"]), &text, &headings, false, 70);

        let content = results.iter().find(|m| !m.is_heading());
        let snippet = content
            .and_then(|m| m.text.strip_prefix("Intro - "))
            .unwrap_or_default();
        assert_eq!(snippet.chars().count(), 40 + 5 + 60 + 6);
        assert!(snippet.chars().count() <= paragraph.chars().count() + 6);
        assert!(snippet.to_lowercase().contains("redis"));
    }

    #[test]
    fn test_similarity_failure_degrades_to_substring() {
        let (text, headings) = redis_jvm_document();
        let matcher = RankedMatcher::default().with_similarity(Box::new(BrokenSimilarity));

        let results = matcher.search(&keywords(&["redis", "jvm"]), &text, &headings, true, 0);

        let headings_hit: Vec<&str> = results
            .iter()
            .filter(|m| m.is_heading())
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(headings_hit, vec!["Redis Caching", "JVM Tuning"]);
        assert!(results.iter().all(|m| m.score <= 1.0));
    }

    #[test]
    fn test_search_is_deterministic() {
        let (text, headings) = redis_jvm_document();
        let matcher = RankedMatcher::default();
        let query = keywords(&["redis", "heap", "tuning"]);

        let first = matcher.search(&query, &text, &headings, true, 60);
        let second = matcher.search(&query, &text, &headings, true, 60);
        assert_eq!(first, second);
        assert_sorted(&first);
    }
}
