use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::{Error, PrismClient, http_error};

#[derive(Serialize)]
struct UserQueryRequest<'a> {
    user_id: &'a str,
    query: &'a str,
}

/// Response of `POST /user-query`.
///
/// `episodes` may be missing, `null`, a single object or an array; all of
/// them deserialize successfully.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserQueryResponse {
    #[serde(default)]
    pub episodes: Option<Episodes>,
}

impl UserQueryResponse {
    /// Flatten the recognised shapes into a list, preserving backend order.
    pub fn into_episodes(self) -> Vec<RawEpisode> {
        match self.episodes {
            None => Vec::new(),
            Some(Episodes::Many(items)) => items,
            Some(Episodes::One(item)) => vec![item],
        }
    }
}

/// The recognised shapes of the `episodes` field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Episodes {
    Many(Vec<RawEpisode>),
    One(RawEpisode),
}

/// One hit as sent by the backend. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawEpisode {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub episode_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_file: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub highlighted_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

/// Accept strings and numbers for identifier-like fields; `null` becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(
        Option::<Lenient>::deserialize(deserializer)?.map(|value| match value {
            Lenient::Text(s) => s,
            Lenient::Int(n) => n.to_string(),
            Lenient::Float(n) => n.to_string(),
            Lenient::Bool(b) => b.to_string(),
        }),
    )
}

impl PrismClient {
    /// Run a natural-language query against the user's ingested content.
    pub async fn user_query(&self, user_id: &str, query: &str) -> Result<UserQueryResponse, Error> {
        let url = format!("{}/user-query", self.base_url);
        debug!(query_len = query.len(), "sending user query");

        let response = self
            .add_auth(self.client.post(&url))
            .json(&UserQueryRequest { user_id, query })
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(http_error(response, "Query").await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(UserQueryResponse::default());
        }
        serde_json::from_str(&body).map_err(|e| Error::Deserialization(e.to_string()))
    }
}
