//! HTTP request handlers

use crate::config::read_lines;
use crate::query::{fails_open, pretty_url, SearchQuery};
use crate::server::views::{self, ParagraphRow, ResultRow};
use crate::server::{AppError, AppState};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub site: Option<String>,
}

/// `GET /` — keyword search, or the landing page for empty/oversized queries
pub async fn search_route(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let raw = params.q.unwrap_or_default();
    let mut query = SearchQuery::parse(&raw, true);
    if let Some(site) = &params.site {
        query.add_site_param(site);
    }

    if fails_open(&raw, &query) {
        return Ok(Html(views::index_page(&state.config)));
    }

    let storage = state.index()?;
    let hits = storage.search_pages(
        &query.inflected_terms(),
        true,
        &query.site_in,
        &query.site_not_in,
        &query.langs,
    )?;

    let rows: Vec<ResultRow> = hits
        .into_iter()
        .map(|hit| ResultRow {
            title: pretty_url(&hit.url),
            url: hit.url,
            about: hit.about,
        })
        .collect();

    Ok(Html(views::search_page(
        &state.config,
        "Search Results",
        "/",
        &raw,
        &rows,
    )))
}

/// `GET /paragraph` — full-text search over whole paragraphs
pub async fn paragraph_route(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let raw = params.q.unwrap_or_default();
    let mut query = SearchQuery::parse(&raw, false);
    if let Some(site) = &params.site {
        query.add_site_param(site);
    }

    let storage = state.index()?;
    let hits = storage.search_paragraphs(&query.phrase(), &query.site_in, &query.site_not_in)?;

    let rows: Vec<ParagraphRow> = hits
        .into_iter()
        .map(|hit| ParagraphRow {
            title: pretty_url(&hit.url),
            url: hit.url,
            about: hit.about,
            highlighted: hit.highlighted,
        })
        .collect();

    Ok(Html(views::paragraph_page(&state.config, &raw, &rows)))
}

/// `GET /outgoing` — substring search over outgoing links
pub async fn outgoing_route(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let raw = params.q.unwrap_or_default();

    let storage = state.index()?;
    let links = storage.search_links(&raw)?;

    let rows: Vec<ResultRow> = links
        .into_iter()
        .map(|url| ResultRow {
            title: pretty_url(&url),
            url,
            about: String::new(),
        })
        .collect();

    Ok(Html(views::search_page(
        &state.config,
        "Link Results",
        "/outgoing",
        &raw,
        &rows,
    )))
}

/// `GET /random` — redirect to a random indexed page
pub async fn random_route(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let storage = state.index()?;
    let target = storage.random_page()?.unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&target))
}

/// `GET /random/outgoing` — redirect to a random outgoing link
pub async fn random_outgoing_route(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let storage = state.index()?;
    let target = storage
        .random_external_link()?
        .unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&target))
}

/// `GET /webring` — 302 to the webring index page
pub async fn webring_route(State(state): State<AppState>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.config.general.url.clone())],
    )
        .into_response()
}

/// `GET /about` — instance statistics
pub async fn about_route(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let storage = state.index()?;
    let domain_count = storage.domain_count()?;
    let page_count = views::humanize(storage.page_count()?);
    let term_count = views::humanize(storage.term_count()?);
    let last_crawl = storage.last_crawl()?.unwrap_or_default();

    Ok(Html(views::about_page(
        &state.config,
        domain_count,
        &page_count,
        &term_count,
        &last_crawl,
    )))
}

/// `GET /filtered` — the banned-domains listing
pub async fn filtered_route(State(state): State<AppState>) -> Html<String> {
    let rows: Vec<ResultRow> = read_lines(Path::new(&state.config.crawler.banned_domains))
        .into_iter()
        .filter(|domain| !domain.is_empty())
        .map(|domain| ResultRow {
            url: format!("https://{}", domain),
            title: domain,
            about: String::new(),
        })
        .collect();

    Html(views::list_page(&state.config, "Filtered Domains", &rows))
}
