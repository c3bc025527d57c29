pub mod research;

pub use research::{
    ContentSummary, FollowUpQA, QueryGenerationResult, QuerySearchOutcome,
    QuestionGenerationResult, ResearchRequest, ResearchResponse, SearchResult, ValidationVerdict,
};
