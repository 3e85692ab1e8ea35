//! Common stubs for integration tests: canned search providers and agents.
#![allow(dead_code)]

use anyhow::Result;
use nomikai::agent::Agent;
use nomikai::search::{SearchError, SearchHit, SearchProvider, SearchQuery};
use std::sync::Mutex;

/// Search provider that replays a canned response and records the queries
/// it received.
pub struct StubProvider {
    response: Mutex<Option<Result<Vec<SearchHit>, SearchError>>>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl StubProvider {
    pub fn returning(response: Result<Vec<SearchHit>, SearchError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self::returning(Ok(hits))
    }
}

#[async_trait::async_trait]
impl SearchProvider for StubProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.clone());
        self.response
            .lock()
            .unwrap()
            .take()
            .expect("stub provider called more than once")
    }
}

pub fn hit(title: &str, url: &str, summary: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        summary: summary.to_string(),
    }
}

/// Agent that returns a fixed response and records the prompt it was given.
pub struct StubAgent {
    response: String,
    pub prompts: Mutex<Vec<String>>,
}

impl StubAgent {
    pub fn replying(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Agent for StubAgent {
    async fn respond(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

/// Agent whose invocation always fails.
pub struct FailingAgent;

#[async_trait::async_trait]
impl Agent for FailingAgent {
    async fn respond(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("model endpoint unreachable")
    }
}
