use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{DocsSyncError, Result};
use crate::github::{ChangedFile, Comment, GithubApi, IssueEvent, Ticket};

const PER_PAGE: usize = 100;

/// GitHub REST client over blocking HTTP
///
/// Authentication is optional: an unauthenticated client can read public
/// data (enough for `--dry-run`) but any mutation will be rejected by the
/// API.
pub struct HttpGithub {
    http: reqwest::blocking::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl HttpGithub {
    /// Create a client for one repository
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("docs-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpGithub {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token,
        })
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::blocking::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.api_url, path))
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }

    fn check_status(path: &str, response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(DocsSyncError::github(format!(
                "{} returned {}",
                path,
                response.status()
            )))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(reqwest::Method::GET, path).send()?;
        Ok(Self::check_status(path, response)?.json()?)
    }

    /// GET a list endpoint, following pagination until a short page arrives
    fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items: Vec<T> = Vec::new();
        let mut page = 1;
        loop {
            let response = self
                .request(reqwest::Method::GET, path)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()?;
            let batch: Vec<T> = Self::check_status(path, response)?.json()?;
            let batch_len = batch.len();
            items.extend(batch);
            if batch_len < PER_PAGE {
                return Ok(items);
            }
            page += 1;
        }
    }

    fn post_json(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(&body)
            .send()?;
        Self::check_status(path, response)?;
        Ok(())
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{}", self.owner, self.repo, suffix)
    }
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct Member {
    login: String,
}

impl GithubApi for HttpGithub {
    fn get_issue(&self, number: u64) -> Result<Ticket> {
        self.get_json(&self.repo_path(&format!("/issues/{}", number)))
    }

    fn get_pull_request(&self, number: u64) -> Result<Ticket> {
        self.get_json(&self.repo_path(&format!("/pulls/{}", number)))
    }

    fn changed_files(&self, number: u64) -> Result<Vec<ChangedFile>> {
        self.get_paged(&self.repo_path(&format!("/pulls/{}/files", number)))
    }

    fn issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        self.get_paged(&self.repo_path(&format!("/issues/{}/events", number)))
    }

    fn comments(&self, number: u64) -> Result<Vec<Comment>> {
        self.get_paged(&self.repo_path(&format!("/issues/{}/comments", number)))
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        self.post_json(
            &self.repo_path(&format!("/issues/{}/labels", number)),
            serde_json::json!({ "labels": labels }),
        )
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        self.post_json(
            &self.repo_path(&format!("/issues/{}/comments", number)),
            serde_json::json!({ "body": body }),
        )
    }

    fn closed_ticket_numbers_by(&self, author: &str) -> Result<Vec<u64>> {
        let query = format!(
            "repo:{}/{} author:{} is:closed",
            self.owner, self.repo, author
        );
        let response = self
            .request(reqwest::Method::GET, "/search/issues")
            .query(&[("q", query.as_str()), ("per_page", "100")])
            .send()?;
        let results: SearchResults = Self::check_status("/search/issues", response)?.json()?;
        Ok(results.items.into_iter().map(|item| item.number).collect())
    }

    fn team_members(&self, team: &str) -> Result<Vec<String>> {
        let members: Vec<Member> =
            self.get_paged(&format!("/orgs/{}/teams/{}/members", self.owner, team))?;
        Ok(members.into_iter().map(|member| member.login).collect())
    }
}
