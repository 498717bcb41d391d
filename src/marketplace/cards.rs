//! Cursor-paginated catalog listing.

use tracing::{debug, info, warn};

use super::MarketplaceClient;
use super::types::{
    Card, CardsCursor, CardsFilter, CardsListRequest, CardsListResponse, CardsSettings,
    CursorRequest,
};
use crate::utils::error::Result;

const CARDS_LIST_PATH: &str = "/content/v2/get/cards/list";

impl MarketplaceClient {
    /// Requests one page of cards starting after `cursor`.
    pub async fn fetch_cards_page(
        &self,
        object_ids: &[i64],
        limit: u32,
        cursor: &CardsCursor,
    ) -> Result<CardsListResponse> {
        let url = Self::endpoint(&self.config.content_api_url, CARDS_LIST_PATH);
        let request = CardsListRequest {
            settings: CardsSettings {
                cursor: CursorRequest {
                    limit,
                    position: cursor,
                },
                filter: CardsFilter {
                    with_photo: 1,
                    object_ids,
                },
            },
        };

        self.post_json(&url, &request, "catalog cards page").await
    }

    /// Walks the whole catalog listing for the given subjects.
    ///
    /// Stops on an empty page, on an exhausted cursor, or when the server
    /// hands back the cursor it was just given. A failed page ends the walk
    /// with whatever was collected so far; the failure is only logged, so
    /// callers must tolerate a truncated catalog.
    pub async fn fetch_all_cards(&self, object_ids: &[i64], limit: u32) -> Vec<Card> {
        let mut cards: Vec<Card> = Vec::new();
        let mut cursor = CardsCursor::default();
        let mut pages = 0usize;

        loop {
            let page = match self.fetch_cards_page(object_ids, limit, &cursor).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        error = %e,
                        fetched = cards.len(),
                        "Catalog page request failed, returning partial catalog"
                    );
                    break;
                }
            };
            pages += 1;

            if page.cards.is_empty() {
                debug!("No more cards to load");
                break;
            }
            cards.extend(page.cards);

            let next = page.cursor.position();
            if next.is_exhausted() {
                break;
            }
            if next == cursor {
                warn!(
                    nm_id = next.nm_id,
                    updated_at = %next.updated_at,
                    "Catalog cursor did not advance, stopping pagination"
                );
                break;
            }
            cursor = next;

            debug!(loaded = cards.len(), "Loaded cards, continuing");
        }

        info!(pages, total = cards.len(), "Catalog fetch finished");
        cards
    }
}
