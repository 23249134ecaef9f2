use std::marker::PhantomData;
use std::vec::IntoIter;
use serde::de::DeserializeOwned;
use serde_json::{self, Value};
use reqwest::blocking::{Client, Request, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::StatusCode;
use failure::{Error, ResultExt};

const GITHUB_V3: &str = "application/vnd.github.v3+json";

/// A thin wrapper around the HTTP client which knows how to talk to the
/// GitHub API.
#[derive(Clone)]
pub(crate) struct Api {
    client: Client,
    agent: String,
    token: Option<String>,
}

impl Api {
    pub fn new(agent: &str, token: Option<&str>) -> Api {
        Api {
            client: Client::new(),
            agent: agent.to_string(),
            token: token.map(String::from),
        }
    }

    /// Fetch a single API resource.
    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let response = self.send(endpoint, true)?;
        parse_body(response)
    }

    /// Fetch JSON from somewhere other than the API. The token isn't sent.
    pub fn get_external<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let response = self.send(url, false)?;
        parse_body(response)
    }

    /// Fetch a page from somewhere other than the API as plain text. The token
    /// isn't sent.
    pub fn get_text(&self, url: &str) -> Result<String, Error> {
        let response = self.send(url, false)?;
        let text = response.text().context("Unable to read the response body")?;
        Ok(text)
    }

    /// Iterate over every item in a paginated list endpoint.
    pub fn paginated<I: DeserializeOwned>(&self, endpoint: &str) -> Paginated<I> {
        Paginated::new(self.clone(), endpoint)
    }

    fn build_request(&self, endpoint: &str, authenticated: bool) -> Result<Request, Error> {
        let mut builder = self.client
            .get(endpoint)
            .header(USER_AGENT, self.agent.as_str())
            .header(ACCEPT, GITHUB_V3);

        if authenticated {
            if let Some(ref token) = self.token {
                builder = builder.header(AUTHORIZATION, format!("token {}", token));
            }
        }

        let request = builder
            .build()
            .context("Generated invalid request. This is a bug.")?;

        if log_enabled!(::log::Level::Trace) {
            let mut redacted_header = format!("Request Headers {:#?}", request.headers());
            if let Some(ref token) = self.token {
                redacted_header = redacted_header.replace(token.as_str(), "XXXXXXXXXX");
            }

            for line in redacted_header.lines() {
                trace!("{}", line);
            }
        }

        Ok(request)
    }

    fn send(&self, endpoint: &str, authenticated: bool) -> Result<Response, Error> {
        debug!("Sending request to {:?}", endpoint);

        let request = self.build_request(endpoint, authenticated)?;
        let response = self.client
            .execute(request)
            .context("Unable to send request")?;

        let status = response.status();
        debug!("Received response ({})", status);

        if log_enabled!(::log::Level::Trace) {
            for line in format!("Response Headers {:#?}", response.headers()).lines() {
                trace!("{}", line);
            }
        }

        if !status.is_success() {
            debug!("Request to {} failed with {}", endpoint, status);

            return Err(FailedRequest::new(status, endpoint).into());
        }

        Ok(response)
    }
}

fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    // "204 No Content" is how GitHub says a list is empty (e.g. the
    // contributors of an empty repository)
    let raw: Value = if response.status() == StatusCode::NO_CONTENT {
        Value::Array(Vec::new())
    } else {
        response.json().context("The response wasn't valid JSON")?
    };

    if log_enabled!(::log::Level::Trace) {
        trace!("Body:");
        if let Ok(pretty) = serde_json::to_string_pretty(&raw) {
            for line in pretty.lines() {
                trace!("{}", line);
            }
        }
    }

    let got = serde_json::from_value(raw).context("Unable to deserialize response")?;
    Ok(got)
}

/// The server responded with something other than a success code.
#[derive(Debug, Clone, PartialEq, Fail)]
#[fail(display = "Request to {} failed with {}", url, status)]
pub struct FailedRequest {
    status: StatusCode,
    url: String,
}

impl FailedRequest {
    pub(crate) fn new(status: StatusCode, url: &str) -> FailedRequest {
        FailedRequest {
            status,
            url: url.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// An iterator over all items in a list, following the `Link` header from one
/// page to the next.
pub(crate) struct Paginated<I>
where
    I: DeserializeOwned,
{
    api: Api,
    _phantom: PhantomData<I>,
    next_endpoint: Option<String>,
    items: IntoIter<I>,
}

impl<I> Paginated<I>
where
    I: DeserializeOwned,
{
    fn new(api: Api, endpoint: &str) -> Self {
        Paginated {
            api: api,
            _phantom: PhantomData,
            next_endpoint: Some(String::from(endpoint)),
            items: Vec::new().into_iter(),
        }
    }

    fn send_request(&mut self, endpoint: &str) -> Result<Vec<I>, Error> {
        let response = self.api.send(endpoint, true)?;

        self.next_endpoint = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_link)
            .map(String::from);

        parse_body(response)
    }
}

impl<I> Iterator for Paginated<I>
where
    I: DeserializeOwned,
{
    type Item = Result<I, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next_item) = self.items.next() {
            return Some(Ok(next_item));
        }

        while let Some(next_endpoint) = self.next_endpoint.take() {
            match self.send_request(&next_endpoint) {
                Ok(values) => {
                    self.items = values.into_iter();
                    if let Some(item) = self.items.next() {
                        return Some(Ok(item));
                    }
                }
                Err(e) => {
                    return Some(Err(e));
                }
            }
        }

        None
    }
}

fn next_link(link: &str) -> Option<&str> {
    link.split(',')
        .filter(|value| is_next(value))
        .filter_map(|value| value.split(';').next())
        .map(|url| url.trim().trim_start_matches('<').trim_end_matches('>'))
        .next()
}

fn is_next(link_value: &str) -> bool {
    link_value
        .split(';')
        .skip(1)
        .filter_map(|param| param.trim().strip_prefix("rel="))
        .any(|rels| rels.trim_matches('"').split_whitespace().any(|rel| rel == "next"))
}
