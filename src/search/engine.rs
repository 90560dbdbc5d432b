// file: src/search/engine.rs
// description: query-to-results facade tying extraction, ranking and caching together

use crate::config::Config;
use crate::extractor::KeywordExtractor;
use crate::models::{KnowledgeBase, SearchMatch};
use crate::search::cache::{CacheKey, CachedSearch, SearchCache};
use crate::search::ranker::RankedMatcher;
use crate::search::scoring::FuzzyOptions;
use crate::utils::OperationTimer;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub keywords: BTreeSet<String>,
    pub matches: Arc<[SearchMatch]>,
    #[serde(skip)]
    pub elapsed: Duration,
    pub from_cache: bool,
}

impl SearchOutcome {
    fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            keywords: BTreeSet::new(),
            matches: Arc::from(Vec::new()),
            elapsed: Duration::ZERO,
            from_cache: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Searches one knowledge base. Safe to share between threads.
pub struct SearchEngine {
    knowledge_base: Arc<KnowledgeBase>,
    config: Config,
    extractor: KeywordExtractor,
    matcher: RankedMatcher,
    cache: Mutex<SearchCache>,
}

impl SearchEngine {
    pub fn new(knowledge_base: KnowledgeBase, config: Config) -> Self {
        Self::with_parts(
            knowledge_base,
            KeywordExtractor::new(config.extraction.clone()),
            RankedMatcher::new(&config),
            config,
        )
    }

    pub fn with_parts(
        knowledge_base: KnowledgeBase,
        extractor: KeywordExtractor,
        matcher: RankedMatcher,
        config: Config,
    ) -> Self {
        let cache = SearchCache::new(config.search.cache_capacity);
        Self {
            knowledge_base: Arc::new(knowledge_base),
            config,
            extractor,
            matcher,
            cache: Mutex::new(cache),
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Searches with the configured fuzzy settings.
    pub fn search(&self, query: &str) -> SearchOutcome {
        self.search_with(
            query,
            self.config.search.fuzzy_enabled,
            self.config.search.fuzzy_threshold,
        )
    }

    pub fn search_with(&self, query: &str, fuzzy_enabled: bool, fuzzy_threshold: u8) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() || self.knowledge_base.is_empty() {
            return SearchOutcome::empty(query);
        }

        let started = Instant::now();
        // the threshold is irrelevant without fuzzy matching, so exact searches share a key
        let fuzzy = if fuzzy_enabled {
            FuzzyOptions::new(true, fuzzy_threshold)
        } else {
            FuzzyOptions::exact()
        };
        let key = CacheKey::new(query, fuzzy.enabled, fuzzy.threshold);

        // checked before extraction so repeated queries skip segmentation too
        if let Some(cached) = self.cache.lock().get(&key) {
            debug!("Cache hit for query '{}'", query);
            return SearchOutcome {
                query: query.to_string(),
                keywords: cached.keywords,
                matches: cached.matches,
                elapsed: started.elapsed(),
                from_cache: true,
            };
        }

        let timer = OperationTimer::new("search");
        let keywords = self.extractor.extract_keywords(query);
        if keywords.iter().all(|k| k.trim().is_empty()) {
            debug!("Query produced no usable keywords");
            return SearchOutcome {
                keywords,
                ..SearchOutcome::empty(query)
            };
        }

        let ranked = self.matcher.rank(
            &keywords,
            &self.knowledge_base.text,
            &self.knowledge_base.headings,
            fuzzy,
        );
        let matches: Arc<[SearchMatch]> = ranked.matches.into();
        self.cache.lock().insert(
            key,
            CachedSearch {
                keywords: keywords.clone(),
                matches: Arc::clone(&matches),
            },
        );

        timer.warn_if_slow(Duration::from_millis(self.config.search.slow_search_ms), query);
        timer.finish();

        SearchOutcome {
            query: query.to_string(),
            keywords,
            matches,
            elapsed: started.elapsed(),
            from_cache: false,
        }
    }

    /// (hits, misses) of the result cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::extractor::{StopwordTokenizer, Unavailable};
    use crate::models::{DocumentFormat, MatchType};

    const GUIDE: &str = "# Redis Caching\n\nRedis eviction policies are configurable.\n\n\
                         # JVM Tuning\n\nHeap sizing and GC pauses.\n";

    fn engine(text: &str) -> SearchEngine {
        let config = Config::default_config();
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(StopwordTokenizer),
            ExtractionConfig::default(),
        );
        SearchEngine::with_parts(
            KnowledgeBase::from_text(text, DocumentFormat::Markdown),
            extractor,
            RankedMatcher::new(&config),
            config,
        )
    }

    #[test]
    fn test_search_finds_heading_and_content() {
        let outcome = engine(GUIDE).search("How does redis eviction work?");

        assert!(outcome.keywords.contains("redis"));
        assert!(outcome.keywords.contains("eviction"));
        assert!(!outcome.from_cache);

        // both keywords hit the paragraph, only one hits the heading
        let top = &outcome.matches[0];
        assert_eq!(top.match_type, MatchType::Content);
        assert!(top.text.starts_with("Redis Caching - Redis eviction policies"));
        assert_eq!(top.score, 2.0);
        assert!(
            outcome
                .matches
                .iter()
                .any(|m| m.is_heading() && m.text == "Redis Caching")
        );
    }

    #[test]
    fn test_second_search_is_served_from_cache() {
        let engine = engine(GUIDE);
        let first = engine.search("jvm heap");
        let second = engine.search("  jvm heap ");

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert!(Arc::ptr_eq(&first.matches, &second.matches));
        assert_eq!(first.keywords, second.keywords);
        assert_eq!(engine.cache_stats(), (1, 1));

        let exact = engine.search_with("jvm heap", false, 70);
        assert!(!exact.from_cache);
        let exact_again = engine.search_with("jvm heap", false, 85);
        assert!(exact_again.from_cache);
    }

    #[test]
    fn test_cache_hit_skips_keyword_extraction() {
        use crate::error::CapabilityError;
        use crate::extractor::WordTokenizer;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingTokenizer(Arc<AtomicUsize>);

        impl WordTokenizer for CountingTokenizer {
            fn name(&self) -> &'static str {
                "counting"
            }

            fn tokenize(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                StopwordTokenizer.tokenize(text)
            }

            fn is_stopword(&self, word: &str) -> bool {
                StopwordTokenizer.is_stopword(word)
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let config = Config::default_config();
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(CountingTokenizer(Arc::clone(&calls))),
            ExtractionConfig::default(),
        );
        let engine = SearchEngine::with_parts(
            KnowledgeBase::from_text(GUIDE, DocumentFormat::Markdown),
            extractor,
            RankedMatcher::new(&config),
            config,
        );

        let first = engine.search("redis eviction");
        let second = engine.search("redis eviction");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(second.from_cache);
        assert_eq!(second.keywords, first.keywords);
        assert!(second.keywords.contains("eviction"));
    }

    #[test]
    fn test_blank_query_and_empty_document() {
        assert!(engine(GUIDE).search("   ").is_empty());
        assert!(engine("  \n\n ").search("redis").is_empty());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<SearchEngine>();
    }
}
