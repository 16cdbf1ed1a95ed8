//! Resource Fetcher
//!
//! Walks list responses page by page, following `nextPageToken`.

use crate::context::Context;
use crate::error::Result;
use crate::gcp::Transport;
use serde_json::Value;

/// One page of a list response
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

impl Page {
    fn from_response(response: Value) -> Self {
        let next_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let items = match response {
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Self { items, next_token }
    }
}

fn page_path(path: &str, page_token: Option<&str>) -> String {
    match page_token {
        Some(token) => {
            let sep = if path.contains('?') { '&' } else { '?' };
            format!("{}{}pageToken={}", path, sep, urlencoding::encode(token))
        }
        None => path.to_string(),
    }
}

/// Fetch one page of a collection
pub async fn fetch_page(
    ctx: &Context,
    transport: &dyn Transport,
    path: &str,
    page_token: Option<&str>,
) -> Result<Page> {
    let url = page_path(path, page_token);
    let response = ctx.run(transport.get(&url)).await?;
    Ok(Page::from_response(response))
}

/// Fetch every page of a collection and concatenate the items
/// The first failing page aborts the whole listing
pub async fn fetch_all(ctx: &Context, transport: &dyn Transport, path: &str) -> Result<Vec<Value>> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(ctx, transport, path, page_token.as_deref()).await?;
        pages += 1;
        all_items.extend(page.items);

        match page.next_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    tracing::debug!("Listed {} items from {} in {} page(s)", all_items.len(), path, pages);
    Ok(all_items)
}
