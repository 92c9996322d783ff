//! Console output for command results

use colored::*;

use newsrag_clean::CleaningReport;
use newsrag_core::Answer;
use newsrag_eval::EvalSummary;
use newsrag_rag::IndexingResult;

pub fn format_cleaning_report(report: &CleaningReport) -> String {
    let mut lines = vec![format!(
        "{} Cleaned {} of {} articles",
        "✅".green(),
        report.articles_cleaned,
        report.articles_read
    )];

    if report.truncated > 0 {
        lines.push(format!("  {} {} truncated", "•".blue(), report.truncated));
    }
    if report.passed_through > 0 {
        lines.push(format!(
            "  {} {} passed through unmodified (malformed content)",
            "•".yellow(),
            report.passed_through
        ));
    }
    if report.rows_skipped > 0 {
        lines.push(format!(
            "  {} {} unreadable rows skipped",
            "•".yellow(),
            report.rows_skipped
        ));
    }

    lines.join("\n")
}

pub fn format_indexing_result(result: &IndexingResult) -> String {
    let mut lines = vec![format!(
        "{} Indexed {} chunks from {} articles",
        "✅".green(),
        result.chunks_indexed,
        result.articles_indexed
    )];

    if result.articles_failed > 0 {
        lines.push(format!(
            "{} {} articles failed",
            "⚠️".yellow(),
            result.articles_failed
        ));
        for error in &result.errors {
            lines.push(format!("  {} {}", "•".yellow(), error));
        }
    }

    lines.join("\n")
}

pub fn format_answer(answer: &Answer) -> String {
    let mut lines = vec![format!("{} {}", "→".green(), answer.text.bold())];

    if !answer.chunks.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "Sources:".dimmed()));
        for (i, chunk) in answer.chunks.iter().enumerate() {
            lines.push(format!(
                "  {}. {} ({}) {}",
                i + 1,
                chunk.title,
                chunk.date,
                chunk.url.dimmed()
            ));
        }
    }

    lines.join("\n")
}

pub fn format_eval_summary(summary: &EvalSummary) -> String {
    let mut lines = vec![format!(
        "{} Evaluated {} examples ({} failed)",
        "📊".blue(),
        summary.examples,
        summary.failures
    )];

    lines.push(format!("  BLEU     {:.4}", summary.mean_bleu));
    lines.push(format!("  ROUGE-L  {:.4}", summary.mean_rouge_l));
    lines.push(format!("  Cosine   {:.4}", summary.mean_cosine));

    lines.join("\n")
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", "❌".red(), error);
}
