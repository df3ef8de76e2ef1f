//! Suggestion-box handlers.

mod change_suggestion_status;
mod submit_suggestion;

pub use change_suggestion_status::{
    ChangeSuggestionStatusCommand, ChangeSuggestionStatusHandler, ChangeSuggestionStatusResult,
};
pub use submit_suggestion::{SubmitSuggestionCommand, SubmitSuggestionHandler, SubmitSuggestionResult};
