//! Command implementations for the newsrag CLI
//!
//! The binary parses flags and calls into [`commands`]; results are printed
//! through [`ui`].

pub mod commands;
pub mod settings;
pub mod store;
pub mod ui;


pub use commands::{
    ask, clean, evaluate, evaluate_with, index, index_corpus, AskOptions, CleanOptions,
    EvaluateOptions, IndexOptions,
};
pub use settings::Settings;
pub use store::AnyVectorStore;
pub use ui::{
    format_answer, format_cleaning_report, format_eval_summary, format_indexing_result,
    print_error,
};
