pub mod chat_completions_service;
