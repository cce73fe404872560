pub mod daily_sessions;
pub mod vocabulary;
