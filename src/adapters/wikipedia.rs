use crate::adapters::http::HttpFetcher;
use crate::domain::model::Entity;
use crate::domain::ports::{ConfigProvider, EntitySource};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// Static selectors - these are compile-time constants containing valid CSS selectors.
static LISTING_TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.wikitable.sortable").unwrap());

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

static BDAY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.bday").unwrap());

/// 指向尚未建立頁面的紅色連結
const MISSING_PAGE_MARKER: &str = "/w/";

/// 解析車手列表：第一個 sortable wikitable，略過表頭列，只看每列第一個 `td`
pub fn parse_listing(html: &str, base: &Url) -> Result<Vec<Entity>> {
    let document = Html::parse_document(html);
    let table = document
        .select(&LISTING_TABLE_SELECTOR)
        .next()
        .ok_or_else(|| EtlError::ProcessingError {
            message: "listing table (table.wikitable.sortable) not found".to_string(),
        })?;

    let mut entities = Vec::new();
    for row in table.select(&ROW_SELECTOR).skip(1) {
        let Some(cell) = row.select(&CELL_SELECTOR).next() else {
            continue;
        };
        entities.push(parse_cell(cell, base));
    }

    Ok(entities)
}

fn parse_cell(cell: ElementRef<'_>, base: &Url) -> Entity {
    // 第一個連結通常是國旗，第二個才是車手本人
    let anchors: Vec<ElementRef<'_>> = cell.select(&ANCHOR_SELECTOR).collect();
    let Some(anchor) = anchors.get(1) else {
        return Entity::new(element_text(cell));
    };

    let entity = Entity::new(element_text(*anchor));
    let link = anchor
        .value()
        .attr("href")
        .and_then(|href| base.join(href).ok())
        .filter(|url| !url.as_str().contains(MISSING_PAGE_MARKER));

    match link {
        Some(url) => entity.with_source_ref(url.to_string()),
        None => entity,
    }
}

/// 個人頁中 `span.bday` 的文字（`YYYY-MM-DD`）
pub fn parse_birth_date(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&BDAY_SELECTOR)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct WikipediaSource {
    fetcher: HttpFetcher,
    listing_url: Url,
}

impl WikipediaSource {
    pub fn new(listing_url: &str, fetcher: HttpFetcher) -> Result<Self> {
        Ok(Self {
            fetcher,
            listing_url: Url::parse(listing_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.request_timeout(), config.retry_policy())?;
        Self::new(config.listing_url(), fetcher)
    }

    /// 取得失敗或頁面沒有出生日期時回傳 `None`
    async fn fetch_birth_date(&self, profile_url: &str) -> Option<String> {
        match self.fetcher.get_text_with_retry(profile_url).await {
            Ok(html) => parse_birth_date(&html),
            Err(e) => {
                tracing::warn!("⚠️ Giving up on birth date from {}: {}", profile_url, e);
                None
            }
        }
    }
}

#[async_trait]
impl EntitySource for WikipediaSource {
    async fn fetch_entities(&self) -> Result<Vec<Entity>> {
        tracing::info!("📡 Fetching listing from {}", self.listing_url);
        let html = self.fetcher.get_text(self.listing_url.as_str()).await?;
        let mut entities = parse_listing(&html, &self.listing_url)?;

        let total = entities.len();
        let with_profile = entities.iter().filter(|e| e.source_ref.is_some()).count();
        tracing::info!(
            "📋 Found {} entries, {} with profile pages",
            total,
            with_profile
        );

        // 依序抓取個人頁
        for (index, entity) in entities.iter_mut().enumerate() {
            let Some(profile_url) = entity.source_ref.clone() else {
                continue;
            };
            tracing::debug!("📡 Processing {}/{}: {}", index + 1, total, entity.name);
            entity.raw_birth_date = self.fetch_birth_date(&profile_url).await;
        }

        Ok(entities)
    }
}
