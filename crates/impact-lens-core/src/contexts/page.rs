//! The script embedded in a page: extracts article text on request and
//! announces article pages to the background.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::content::{ContentExtractor, ContentPayload, RenderedDocument};
use crate::messaging::{Endpoint, Handler, MessageRouter, Request, Response, RouterError, TabId};
use crate::usage::Clock;

/// Page context for one tab
pub struct PageContext {
    tab_id: TabId,
    document: RwLock<RenderedDocument>,
    extractor: ContentExtractor,
    clock: Arc<dyn Clock>,
}

impl PageContext {
    pub fn new(
        tab_id: TabId,
        document: RenderedDocument,
        extractor: ContentExtractor,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tab_id,
            document: RwLock::new(document),
            extractor,
            clock,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::Page(self.tab_id)
    }

    /// Replace the rendered document (the tab navigated)
    pub fn navigate(&self, document: RenderedDocument) {
        tracing::debug!("Tab {} navigated to {}", self.tab_id, document.url);
        *self.document.write() = document;
    }

    /// Extract the current document
    pub fn extract(&self) -> ContentPayload {
        self.extractor.extract(&self.document.read(), self.clock.now())
    }

    /// Send `contentReady` if the page looks like a substantial article.
    ///
    /// Returns whether the page was announced.
    pub async fn announce_if_article(&self, router: &MessageRouter) -> Result<bool, RouterError> {
        let payload = {
            let document = self.document.read();
            if !self.extractor.is_article(&document) {
                return Ok(false);
            }
            self.extractor.extract(&document, self.clock.now())
        };
        if !self.extractor.is_announceable(&payload) {
            return Ok(false);
        }

        router
            .send(
                self.endpoint(),
                Endpoint::Background,
                Request::ContentReady { content: payload },
            )
            .await?;
        Ok(true)
    }

    /// Ask the background to open the side panel for this tab
    pub async fn request_side_panel(&self, router: &MessageRouter) -> Result<(), RouterError> {
        router
            .send(self.endpoint(), Endpoint::Background, Request::OpenSidePanel)
            .await?;
        Ok(())
    }
}

impl Handler for PageContext {
    async fn handle(&self, _origin: Endpoint, request: Request) -> Response {
        match request {
            Request::ExtractContent => Response::Content {
                content: self.extract(),
            },
            Request::AnalyzeContent { .. } | Request::ContentReady { .. } | Request::OpenSidePanel => {
                Response::unhandled(&request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{article_text, FixedClock};
    use pretty_assertions::assert_eq;

    fn page(document: RenderedDocument) -> PageContext {
        PageContext::new(
            4,
            document,
            ContentExtractor::new(),
            Arc::new(FixedClock::default()),
        )
    }

    #[tokio::test]
    async fn test_extract_content_request() {
        let page = page(RenderedDocument::from_text("https://n.example", "N", "a  b\nc"));
        let response = page.handle(Endpoint::Panel, Request::ExtractContent).await;

        match response {
            Response::Content { content } => {
                assert_eq!(content.text, "a b c");
                assert_eq!(content.url, "https://n.example");
            }
            other => panic!("Expected Content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_actions_unhandled() {
        let page = page(RenderedDocument::default());
        let response = page.handle(Endpoint::Panel, Request::OpenSidePanel).await;
        assert_eq!(response, Response::unhandled(&Request::OpenSidePanel));
    }

    #[tokio::test]
    async fn test_navigate_replaces_document() {
        let page = page(RenderedDocument::from_text("u1", "t", "first"));
        page.navigate(RenderedDocument::from_text("u2", "t", "second"));
        assert_eq!(page.extract().text, "second");
    }

    #[tokio::test]
    async fn test_non_article_not_announced() {
        let router = MessageRouter::new();
        let page = page(RenderedDocument::from_text("u", "t", article_text(300)));
        // No background registered: announcing would fail, so Ok(false) proves no send
        assert!(!page.announce_if_article(&router).await.unwrap());
    }

    #[tokio::test]
    async fn test_short_article_not_announced() {
        let router = MessageRouter::new();
        let page = page(RenderedDocument::from_text("u", "t", "").with_region("article", "short"));
        assert!(!page.announce_if_article(&router).await.unwrap());
    }

    #[tokio::test]
    async fn test_article_announce_needs_background() {
        let router = MessageRouter::new();
        let page = page(
            RenderedDocument::from_text("u", "t", "").with_region("article", article_text(300)),
        );
        let err = page.announce_if_article(&router).await.unwrap_err();
        assert!(matches!(err, RouterError::ChannelClosed { .. }));
    }
}
