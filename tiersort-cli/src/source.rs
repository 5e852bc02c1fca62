/// Item sources: where titles and pictures for sequence numbers come from.
///
/// The remote source speaks the xkcd-style JSON API (`/info.0.json` for the
/// latest item, `/<n>/info.0.json` for one item). The list source serves
/// titles from a local file, numbered from 1.
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://xkcd.com";

/// One displayable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub number: u32,
    pub title: String,
    pub image: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Time travel mode not enabled.")]
    OutOfRange,

    #[error("display: unable to open item \"{number}\": {reason}")]
    Unavailable { number: u32, reason: String },

    #[error("Cannot connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct RemoteItem {
    num: u32,
    title: String,
    img: String,
    #[serde(default)]
    alt: String,
}

impl From<RemoteItem> for Item {
    fn from(remote: RemoteItem) -> Self {
        Item {
            number: remote.num,
            title: remote.title,
            image: Some(remote.img).filter(|s| !s.is_empty()),
            caption: Some(remote.alt).filter(|s| !s.is_empty()),
        }
    }
}

pub struct RemoteSource {
    client: Client,
    endpoint: String,
    retries: usize,
    latest: u32,
    cache: HashMap<u32, Item>,
}

impl RemoteSource {
    /// Fetch the latest item to learn how many items exist.
    pub async fn connect(endpoint: &str, retries: usize) -> Result<Self, SourceError> {
        let client = Client::new();
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let url = format!("{endpoint}/info.0.json");
        let latest: Item = fetch_with_retries(&client, &url, retries)
            .await
            .map_err(|reason| SourceError::Connect {
                endpoint: endpoint.clone(),
                reason,
            })?
            .into();

        tracing::debug!("Latest item at {endpoint} is {}", latest.number);
        let mut cache = HashMap::new();
        let number = latest.number;
        cache.insert(number, latest);

        Ok(RemoteSource {
            client,
            endpoint,
            retries,
            latest: number,
            cache,
        })
    }

    async fn show(&mut self, number: u32) -> Result<Item, SourceError> {
        if let Some(item) = self.cache.get(&number) {
            return Ok(item.clone());
        }
        let url = format!("{}/{number}/info.0.json", self.endpoint);
        let item: Item = fetch_with_retries(&self.client, &url, self.retries)
            .await
            .map_err(|reason| SourceError::Unavailable { number, reason })?
            .into();
        self.cache.insert(number, item.clone());
        Ok(item)
    }
}

/// Send one GET and decode the item JSON.
async fn fetch_item(client: &Client, url: &str) -> Result<RemoteItem, String> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("HTTP request failed: {e}"))?;

    if !resp.status().is_success() {
        return Err(format!("{url} returned {}", resp.status()));
    }

    resp.json()
        .await
        .map_err(|e| format!("Failed to parse item JSON: {e}"))
}

/// Retries up to `max_retries` times with a 1-second delay between attempts.
async fn fetch_with_retries(client: &Client, url: &str, max_retries: usize) -> Result<RemoteItem, String> {
    let mut last_err = String::new();
    for attempt in 0..=max_retries {
        match fetch_item(client, url).await {
            Ok(item) => return Ok(item),
            Err(e) => {
                last_err = e;
                if attempt < max_retries {
                    tracing::debug!("Retry {}/{} for {url}: {last_err}", attempt + 1, max_retries);
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
    Err(last_err)
}

/// Titles from a local list; item `n` is line `n`.
pub struct ListSource {
    titles: Vec<String>,
}

impl ListSource {
    pub fn new(titles: Vec<String>) -> Self {
        ListSource { titles }
    }

    fn show(&self, number: u32) -> Result<Item, SourceError> {
        let title = self.titles[number as usize - 1].clone();
        Ok(Item {
            number,
            title,
            image: None,
            caption: None,
        })
    }
}

/// Parse a string as either a JSON array of strings or plain text (one item per line).
pub fn parse_titles(content: &str) -> Result<Vec<String>, String> {
    let trimmed = content.trim();
    let titles: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| format!("File looks like JSON but failed to parse: {e}"))?
    } else {
        trimmed.lines().map(|l| l.trim().to_string()).collect()
    };
    Ok(titles.into_iter().filter(|s| !s.trim().is_empty()).collect())
}

/// The display collaborator: resolves a sequence number to a displayable item.
pub enum Source {
    Remote(RemoteSource),
    List(ListSource),
}

impl Source {
    /// Highest valid sequence number.
    pub fn latest(&self) -> u32 {
        match self {
            Source::Remote(remote) => remote.latest,
            Source::List(list) => list.titles.len() as u32,
        }
    }

    /// Resolve `number` to its item, rejecting numbers outside `1..=latest`.
    pub async fn show(&mut self, number: u32) -> Result<Item, SourceError> {
        let latest = self.latest();
        if number == 0 || number > latest {
            tracing::debug!("Item {number} is outside 1..={latest}");
            return Err(SourceError::OutOfRange);
        }
        match self {
            Source::Remote(remote) => remote.show(number).await,
            Source::List(list) => list.show(number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_source_numbers_from_one() {
        let mut source = Source::List(ListSource::new(vec!["Pizza".into(), "Sushi".into()]));
        assert_eq!(source.latest(), 2);
        assert_eq!(source.show(1).await.unwrap().title, "Pizza");
        assert_eq!(source.show(2).await.unwrap().title, "Sushi");
        assert!(matches!(
            source.show(3).await,
            Err(SourceError::OutOfRange)
        ));
        assert!(source.show(0).await.is_err());
    }

    #[test]
    fn test_parse_titles() {
        assert_eq!(parse_titles("a\n\n  b  \n").unwrap(), vec!["a", "b"]);
        assert_eq!(parse_titles(r#"["x", " ", "y"]"#).unwrap(), vec!["x", "y"]);
        assert!(parse_titles("[not json").is_err());
    }

    #[test]
    fn test_remote_item_conversion() {
        let remote: RemoteItem = serde_json::from_str(
            r#"{"num": 353, "title": "Python", "img": "https://imgs.xkcd.com/comics/python.png", "alt": "I wrote 20 short programs", "year": "2007"}"#,
        )
        .unwrap();
        let item = Item::from(remote);
        assert_eq!(item.number, 353);
        assert_eq!(item.title, "Python");
        assert!(item.image.unwrap().ends_with("python.png"));
        assert!(item.caption.is_some());
    }
}
