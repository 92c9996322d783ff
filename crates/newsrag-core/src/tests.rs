//! Tests for core types

#[cfg(test)]
mod snapshot_tests {
    use crate::{Article, ChatMessage, RawArticle, read_articles};
    use chrono::NaiveDate;
    use insta::assert_yaml_snapshot;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn article(date: &str) -> Article {
        Article {
            title: "Markets rally".to_string(),
            date: date.to_string(),
            content: "Stocks rose on Monday.".to_string(),
            domain: "example.com".to_string(),
            url: "https://example.com/markets".to_string(),
        }
    }

    #[test]
    fn test_published_on_parses_date_prefix() {
        assert_eq!(
            article("2023-03-14").published_on(),
            NaiveDate::from_ymd_opt(2023, 3, 14)
        );
        assert_eq!(
            article("2023-03-14 08:30:00").published_on(),
            NaiveDate::from_ymd_opt(2023, 3, 14)
        );
        assert_eq!(article("March 14").published_on(), None);
        assert_eq!(article("").published_on(), None);
    }

    #[test]
    fn test_raw_article_drops_author() {
        let raw = RawArticle {
            title: "t".to_string(),
            date: "Jan 1".to_string(),
            author: Some("Jane Doe".to_string()),
            content: "c".to_string(),
            domain: "d".to_string(),
            url: "u".to_string(),
        };

        let article = Article::from(raw);
        assert_yaml_snapshot!(article, @r###"
        title: t
        date: Jan 1
        content: c
        domain: d
        url: u
        "###);
    }

    #[test]
    fn test_read_articles_from_processed_corpus() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "title,date,content,domain,url").unwrap();
        writeln!(file, "Markets rally,2023-03-14,Stocks rose on Monday.,example.com,https://example.com/markets").unwrap();
        writeln!(file, "Markets rally,2023-03-15,Stocks rose on Monday.,example.com,https://example.com/markets").unwrap();

        let loaded = read_articles(file.path()).unwrap();

        assert_eq!(loaded, vec![article("2023-03-14"), article("2023-03-15")]);
    }

    #[test]
    fn test_read_articles_rejects_missing_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "title,date").unwrap();
        writeln!(file, "a,2023-01-01").unwrap();

        assert!(read_articles(file.path()).is_err());
    }

    #[test]
    fn test_chat_message_serialization() {
        let message = ChatMessage::system("Answer briefly.");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "Answer briefly.");
    }
}
