use super::commit::RawCommit;
use crate::error::{Result, TouchmapError};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Everything the API client needs, passed in explicitly: no ambient token
/// or repository state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub repo: String,
    pub token: String,
    pub page_size: u32,
    pub backoff: Duration,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repo: repo.into(),
            token: token.into(),
            page_size: 100,
            backoff: Duration::from_secs(15),
            max_retries: 5,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Shared pause gate: one rate-limited worker pauses all of them instead of
/// each worker triggering further throttling on its own.
#[derive(Debug)]
pub struct RateGate {
    resume_at: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new() -> Self {
        Self { resume_at: Mutex::new(None) }
    }

    /// Block until any active pause has elapsed.
    pub fn wait(&self) {
        let resume_at = *self.resume_at.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(resume_at) = resume_at {
            let now = Instant::now();
            if resume_at > now {
                std::thread::sleep(resume_at - now);
            }
        }
    }

    /// Pause all callers for `duration`, extending an existing pause only
    /// forward so concurrent rate-limit hits do not stack.
    pub fn pause_for(&self, duration: Duration) {
        let mut guard = self.resume_at.lock().unwrap_or_else(|e| e.into_inner());
        let target = Instant::now() + duration;
        match *guard {
            Some(current) if current >= target => {}
            _ => *guard = Some(target),
        }
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new()
    }
}

enum PageFailure {
    RateLimited,
    Fatal(TouchmapError),
}

#[derive(Debug)]
pub struct GithubClient {
    agent: ureq::Agent,
    config: ClientConfig,
    gate: RateGate,
}

impl GithubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(TouchmapError::MissingToken);
        }
        match config.repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => {
                return Err(TouchmapError::InvalidConfig(format!(
                    "repository must be 'owner/name', got '{}'",
                    config.repo
                )))
            }
        }
        if config.page_size == 0 || config.page_size > 100 {
            return Err(TouchmapError::InvalidConfig(format!(
                "page size must be between 1 and 100, got {}",
                config.page_size
            )));
        }

        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            agent,
            config,
            gate: RateGate::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page of the commit history touching `file`. An empty page
    /// means pagination is done. Rate-limited responses are retried against
    /// the same page, at most `max_retries` times, behind the shared gate.
    pub fn commits_page(&self, file: &str, page: u32) -> Result<Vec<RawCommit>> {
        let mut attempts = 0u32;
        loop {
            self.gate.wait();
            match self.request_page(file, page) {
                Ok(commits) => return Ok(commits),
                Err(PageFailure::RateLimited) => {
                    attempts += 1;
                    if attempts > self.config.max_retries {
                        return Err(TouchmapError::RetriesExhausted {
                            file: file.to_string(),
                            page,
                            attempts,
                        });
                    }
                    self.gate.pause_for(self.config.backoff);
                }
                Err(PageFailure::Fatal(err)) => return Err(err),
            }
        }
    }

    fn request_page(&self, file: &str, page: u32) -> std::result::Result<Vec<RawCommit>, PageFailure> {
        let url = format!(
            "{}/repos/{}/commits",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo
        );

        let result = self
            .agent
            .get(&url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
            .set("User-Agent", "touchmap")
            .set("Authorization", &format!("Bearer {}", self.config.token))
            .query("path", file)
            .query("per_page", &self.config.page_size.to_string())
            .query("page", &page.to_string())
            .call();

        match result {
            Ok(response) => response.into_json::<Vec<RawCommit>>().map_err(|e| {
                PageFailure::Fatal(TouchmapError::Parse(format!(
                    "malformed commit page for '{file}' page {page}: {e}"
                )))
            }),
            Err(ureq::Error::Status(403, response)) => {
                let remaining = response.header("x-ratelimit-remaining").map(str::to_string);
                let body = response.into_string().unwrap_or_default();
                if remaining.as_deref() == Some("0") || body.to_lowercase().contains("rate limit") {
                    Err(PageFailure::RateLimited)
                } else {
                    Err(PageFailure::Fatal(TouchmapError::Status {
                        status: 403,
                        file: file.to_string(),
                        page,
                    }))
                }
            }
            Err(ureq::Error::Status(status, _)) => Err(PageFailure::Fatal(TouchmapError::Status {
                status,
                file: file.to_string(),
                page,
            })),
            Err(err) => Err(PageFailure::Fatal(err.into())),
        }
    }
}
