//! Corpus-level tests for the normalizer

#[cfg(test)]
mod snapshot_tests {
    use crate::{Article, CleaningConfig, CorpusCleaner, Normalizer};
    use insta::{assert_snapshot, assert_yaml_snapshot};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RAW_CSV: &str = r#"title,date,author,content,domain,url
Scenario,2023-01-02,Jane,"['Hello world. This is a test.', 'Thank you for subscribing to the email newsletter.', 'ignored tail']",a.com,https://a.com/1
Plain,2023-01-03,,Plain text body,b.com,https://b.com/2
Broken,2023-01-04
Banner,2023-01-05,,"['Skip to main content', 'Home', 'World', 'Business', 'Tech', 'Sport', 'Opinion', 'Video', 'Podcasts', 'Newsletters', 'Search', 'Real story begins here.', 'More real text.']",d.com,https://d.com/3
Cafe,2023-01-06,Ann,"['Café owners in the E.U. cheered.']",c.com,https://c.com/4
"#;

    fn normalizer() -> Normalizer {
        Normalizer::new(CleaningConfig::default()).unwrap()
    }

    fn rewrap(text: &str) -> String {
        format!("['{}']", text)
    }

    #[test]
    fn test_clean_csv_report_snapshot() {
        let cleaner = CorpusCleaner::new(normalizer());
        let mut output = Vec::new();

        let report = cleaner.clean_csv(RAW_CSV.as_bytes(), &mut output).unwrap();

        assert_yaml_snapshot!(report, @r###"
        articles_read: 4
        articles_cleaned: 3
        passed_through: 1
        rows_skipped: 1
        truncated: 2
        "###);
    }

    #[test]
    fn test_clean_csv_drops_author_and_rewrites_content() {
        let cleaner = CorpusCleaner::new(normalizer());
        let mut output = Vec::new();
        cleaner.clean_csv(RAW_CSV.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("title,date,content,domain,url\n"));

        let articles: Vec<Article> = csv::Reader::from_reader(text.as_bytes())
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();

        let contents: Vec<&str> = articles.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "Hello world. This is a test.",
                "Plain text body",
                "Real story begins here. More real text.",
                "Caf owners in the European Union cheered.",
            ]
        );
        assert_eq!(articles[3].url, "https://c.com/4");
    }

    #[test]
    fn test_clean_file_leaves_raw_corpus_untouched() {
        let mut raw = NamedTempFile::new().unwrap();
        raw.write_all(RAW_CSV.as_bytes()).unwrap();
        let processed = NamedTempFile::new().unwrap();

        let cleaner = CorpusCleaner::new(normalizer());
        let report = cleaner.clean_file(raw.path(), processed.path()).unwrap();

        assert_eq!(report.articles_read, 4);
        assert_eq!(std::fs::read_to_string(raw.path()).unwrap(), RAW_CSV);
        let articles = newsrag_core::read_articles(processed.path()).unwrap();
        assert_eq!(articles.len(), 4);
    }

    #[test]
    fn test_messy_article_snapshot() {
        let raw = "['WASHINGTON \u{2014} The E.U. said on Tuesday it\u{2019}s \u{201C}ready\u{201D} to talk.', \
                   'googletag.cmd.push(function() { googletag.display(\"div-gpt-ad\"); });', \
                   'Officials met in Z\u{00FC}rich\u{2026}', \
                   'Sign up for our newsletter to get updates.', \
                   'More boilerplate.']";

        let normalized = normalizer().normalize(raw).unwrap();

        assert!(normalized.truncated);
        assert_snapshot!(
            normalized.text,
            @"WASHINGTON The European Union said on Tuesday it's 'ready to talk. Officials met in Zrich"
        );
    }

    #[test]
    fn test_pipeline_output_is_a_fixed_point() {
        let normalizer = normalizer();
        let samples = [
            "['Hello world. This is a test.', 'Thank you for subscribing to the email newsletter.', 'ignored tail']",
            "['The talks (which ran late) ended.', 'Officials said approx. ten people attended.']",
            "['Caf\u{00E9} owners cheered!', 'Prices rose 3.5 percent.']",
            "['The players\u{2019} union met \u{2014} again...']",
        ];

        for raw in samples {
            let once = normalizer.normalize(raw).unwrap().text;
            let twice = normalizer.normalize(&rewrap(&once)).unwrap().text;
            assert_eq!(once, twice, "drift on {:?}", raw);
        }
    }

    #[test]
    fn test_us_expansion_drifts_on_second_pass() {
        // "United States " leaves a double space that the second pass collapses
        let normalizer = normalizer();
        let once = normalizer.normalize("['U.S. and U.K. leaders met']").unwrap().text;
        let twice = normalizer.normalize(&rewrap(&once)).unwrap().text;

        assert_eq!(once, "United States  and United Kingdom leaders met");
        assert_eq!(twice, "United States and United Kingdom leaders met");
        assert_eq!(once.split_whitespace().collect::<Vec<_>>().join(" "), twice);
    }

    #[test]
    fn test_custom_tables_from_toml() {
        let config = CleaningConfig::from_toml_str(
            r#"
            stop_phrases = ["Related coverage"]

            [[abbreviations]]
            short = "N.Y."
            expansion = "New York"
            "#,
        )
        .unwrap();
        let normalizer = Normalizer::new(config).unwrap();

        let normalized = normalizer
            .normalize("['Markets in N.Y. rallied.', 'Related coverage: more.', 'Tail.']")
            .unwrap();

        assert_eq!(normalized.text, "Markets in New York rallied.");
    }
}
