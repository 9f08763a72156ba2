// Request/response messaging between the page side and the background matcher.
use crate::matcher::Matcher;
use crate::model::{
    AlternativeCandidate, ProductDescriptor, RankedCandidate, SavedAlternative, ServiceError,
};
use crate::storage::SqliteStorage;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub enum Request {
    /// Rank alternatives for a freshly extracted product and cache the result.
    ScanProduct(ProductDescriptor),
    /// Cached ranking for a product id.
    GetAlternatives { product_id: String },
    GetAlternativeDetails { id: String },
    SaveAlternative(AlternativeCandidate),
    RemoveSavedAlternative { id: String },
    GetSavedAlternatives,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Alternatives(Vec<RankedCandidate>),
    Details(AlternativeCandidate),
    Saved(Vec<SavedAlternative>),
    Ack(bool),
    Error(String),
}

struct Envelope {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Cloneable sender side of the background service.
#[derive(Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ServiceHandle {
    pub async fn send(&self, request: Request) -> Result<Response, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::NoReply)
    }
}

/// Owns the matcher and the storage; requests are served one at a time.
pub struct BackgroundService<M> {
    matcher: M,
    storage: SqliteStorage,
}

impl<M: Matcher + Send + 'static> BackgroundService<M> {
    pub fn new(matcher: M, storage: SqliteStorage) -> Self {
        Self { matcher, storage }
    }

    pub fn spawn(self, buffer: usize) -> ServiceHandle {
        let (tx, mut rx) = mpsc::channel::<Envelope>(buffer);
        tokio::spawn(async move {
            info!("Background service started");
            while let Some(envelope) = rx.recv().await {
                let response = self.handle(envelope.request);
                if envelope.reply.send(response).is_err() {
                    warn!("Requester went away before the reply");
                }
            }
            info!("Background service stopped");
        });
        ServiceHandle { tx }
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::ScanProduct(product) => self.scan_product(&product),
            Request::GetAlternatives { product_id } => {
                match self.storage.get_stored_alternatives(&product_id) {
                    Ok(stored) => Response::Alternatives(stored.unwrap_or_default()),
                    Err(e) => {
                        error!("Error retrieving alternatives: {}", e);
                        Response::Error(e.to_string())
                    }
                }
            }
            Request::GetAlternativeDetails { id } => match self.matcher.alternative_details(&id) {
                Ok(alt) => Response::Details(alt),
                Err(e) => {
                    warn!("Error fetching alternative details: {}", e);
                    Response::Error(e.to_string())
                }
            },
            Request::SaveAlternative(alt) => ack(self.storage.save_alternative(&alt)),
            Request::RemoveSavedAlternative { id } => {
                ack(self.storage.remove_saved_alternative(&id))
            }
            Request::GetSavedAlternatives => match self.storage.get_saved_alternatives() {
                Ok(saved) => Response::Saved(saved),
                Err(e) => Response::Error(e.to_string()),
            },
        }
    }

    fn scan_product(&self, product: &ProductDescriptor) -> Response {
        info!(
            "Product detected: {} ({})",
            product.title.as_deref().unwrap_or("untitled"),
            product.source.as_deref().unwrap_or("unknown source")
        );
        match self.matcher.find_alternatives(product) {
            Ok(ranked) => {
                if let Some(id) = product.id.as_deref() {
                    if let Err(e) = self.storage.store_alternatives(id, &ranked) {
                        warn!("Error storing alternatives: {}", e);
                    }
                }
                Response::Alternatives(ranked)
            }
            Err(e) => {
                error!("Error fetching alternatives: {}", e);
                Response::Error(format!("could not find alternatives: {}", e))
            }
        }
    }
}

fn ack(result: Result<bool, crate::model::StorageError>) -> Response {
    match result {
        Ok(changed) => Response::Ack(changed),
        Err(e) => {
            warn!("Storage error: {}", e);
            Response::Error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogLoader, StaticCatalogLoader};
    use crate::matcher::MatcherImpl;
    use crate::model::CatalogError;
    use chrono::Duration;

    fn catalog() -> Vec<AlternativeCandidate> {
        serde_json::from_str(
            r#"[
                {"id":"A","replaces":["Electronics"],"keywords":["usb"],"ecoScore":8},
                {"id":"B","replaces":["Electronics"],"keywords":["solar"],"ecoScore":6}
            ]"#,
        )
        .unwrap()
    }

    fn storage() -> SqliteStorage {
        SqliteStorage::new(":memory:", Duration::days(7)).unwrap()
    }

    fn spawn_static() -> ServiceHandle {
        BackgroundService::new(MatcherImpl::new(StaticCatalogLoader::new(catalog())), storage())
            .spawn(8)
    }

    struct BrokenLoader;

    impl CatalogLoader for BrokenLoader {
        fn load(&self) -> Result<Vec<AlternativeCandidate>, CatalogError> {
            Err(CatalogError::Unavailable("alternatives.json: not found".into()))
        }
    }

    #[tokio::test]
    async fn scan_then_get_returns_cached_ranking() {
        let handle = spawn_static();
        let product = ProductDescriptor {
            id: Some("B0CHARGER".into()),
            title: Some("Solar charger".into()),
            ..Default::default()
        };

        let scanned = match handle.send(Request::ScanProduct(product)).await.unwrap() {
            Response::Alternatives(alts) => alts,
            other => panic!("unexpected response {:?}", other),
        };
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].candidate.id, "B");

        let cached = handle
            .send(Request::GetAlternatives {
                product_id: "B0CHARGER".into(),
            })
            .await
            .unwrap();
        assert_eq!(cached, Response::Alternatives(scanned));

        let unknown = handle
            .send(Request::GetAlternatives {
                product_id: "nope".into(),
            })
            .await
            .unwrap();
        assert_eq!(unknown, Response::Alternatives(vec![]));
    }

    #[tokio::test]
    async fn catalog_failure_becomes_error_response() {
        let handle =
            BackgroundService::new(MatcherImpl::new(BrokenLoader), storage()).spawn(1);
        let response = handle
            .send(Request::ScanProduct(ProductDescriptor::default()))
            .await
            .unwrap();
        match response {
            Response::Error(msg) => assert!(msg.starts_with("could not find alternatives")),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn details_and_saved_list() {
        let handle = spawn_static();

        let details = handle
            .send(Request::GetAlternativeDetails { id: "A".into() })
            .await
            .unwrap();
        let alt = match details {
            Response::Details(alt) => alt,
            other => panic!("unexpected response {:?}", other),
        };
        assert_eq!(alt.eco_score, 8.0);

        let missing = handle
            .send(Request::GetAlternativeDetails { id: "Z".into() })
            .await
            .unwrap();
        assert!(matches!(missing, Response::Error(msg) if msg.contains("Z")));

        assert_eq!(
            handle.send(Request::SaveAlternative(alt.clone())).await.unwrap(),
            Response::Ack(true)
        );
        assert_eq!(
            handle.send(Request::SaveAlternative(alt)).await.unwrap(),
            Response::Ack(false)
        );
        match handle.send(Request::GetSavedAlternatives).await.unwrap() {
            Response::Saved(saved) => assert_eq!(saved.len(), 1),
            other => panic!("unexpected response {:?}", other),
        }
        assert_eq!(
            handle
                .send(Request::RemoveSavedAlternative { id: "A".into() })
                .await
                .unwrap(),
            Response::Ack(true)
        );
    }
}
