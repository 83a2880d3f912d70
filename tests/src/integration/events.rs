//! # Notification Flows
//!
//! Every successful mutation emits exactly one notification of the matching
//! kind (purchase emits its transfer too); failed operations emit nothing.

#[cfg(test)]
mod tests {
    use crate::{actors, standard_config};
    use asset_engine::events::{EngineEvent, EventEnvelope};
    use asset_engine::prelude::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn test_purchase_flow_event_sequence() {
        let engine = create_test_service(standard_config());
        let mut events = engine.subscribe();

        let id = engine.mint(actors::minter(), actors::alice()).await.unwrap();
        engine.set_price(actors::alice(), id, 1000).await.unwrap();
        engine.purchase(actors::bob(), id, 1000).await.unwrap();

        match events.recv().await.unwrap().event {
            EngineEvent::ItemMinted(payload) => {
                assert_eq!(payload.id, id);
                assert_eq!(payload.holder, actors::alice());
            }
            other => panic!("expected ItemMinted, got {other:?}"),
        }
        match events.recv().await.unwrap().event {
            EngineEvent::PriceSet(payload) => {
                assert_eq!(payload.price, 1000);
                assert_eq!(payload.status, SaleStatus::ForSale);
            }
            other => panic!("expected PriceSet, got {other:?}"),
        }
        match events.recv().await.unwrap().event {
            EngineEvent::ItemTransferred(payload) => {
                assert_eq!(payload.from, actors::alice());
                assert_eq!(payload.to, actors::bob());
                assert!(!payload.exempt);
            }
            other => panic!("expected ItemTransferred, got {other:?}"),
        }
        match events.recv().await.unwrap().event {
            EngineEvent::ItemPurchased(payload) => {
                assert_eq!(payload.seller, actors::alice());
                assert_eq!(payload.buyer, actors::bob());
                assert_eq!(payload.price, 1000);
                assert_eq!(payload.royalty_paid, 50);
            }
            other => panic!("expected ItemPurchased, got {other:?}"),
        }
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_failed_operations_emit_nothing() {
        let engine = create_test_service(standard_config());
        let mut events = engine.subscribe();

        assert!(engine.mint(actors::alice(), actors::alice()).await.is_err());
        assert!(engine.set_price(actors::alice(), 0, 100).await.is_err());
        assert!(engine.purchase(actors::bob(), 0, 100).await.is_err());

        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_batch_mint_event_reports_range() {
        let mut config = standard_config();
        config.supply_cap = 2;
        let engine = create_test_service(config);
        let mut events = engine.subscribe();

        engine
            .mint_batch(actors::minter(), actors::alice(), 5)
            .await
            .unwrap();

        match events.recv().await.unwrap().event {
            EngineEvent::ItemsMintedBatch(payload) => {
                assert_eq!(payload.first, 0);
                assert_eq!(payload.last, 1);
                assert_eq!(payload.requested, 5);
            }
            other => panic!("expected ItemsMintedBatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_config_change_events() {
        let engine = create_test_service(standard_config());
        let mut events = engine.subscribe();

        engine
            .set_royalty(actors::admin(), actors::royalty_owner(), 250)
            .await
            .unwrap();
        engine
            .set_marketplace(actors::admin(), vec![actors::market()])
            .await
            .unwrap();
        engine.clear_marketplace(actors::admin()).await.unwrap();

        match events.recv().await.unwrap().event {
            EngineEvent::RoyaltyConfigChanged(payload) => {
                assert_eq!(payload.rate_bps, 250);
            }
            other => panic!("expected RoyaltyConfigChanged, got {other:?}"),
        }
        match events.recv().await.unwrap().event {
            EngineEvent::MarketplaceListChanged(payload) => {
                assert_eq!(payload.members, vec![actors::market()]);
            }
            other => panic!("expected MarketplaceListChanged, got {other:?}"),
        }
        match events.recv().await.unwrap().event {
            EngineEvent::MarketplaceListChanged(payload) => {
                assert!(payload.members.is_empty());
            }
            other => panic!("expected MarketplaceListChanged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_envelope_serializes() {
        let engine = create_test_service(standard_config());
        let mut events = engine.subscribe();
        engine.mint(actors::minter(), actors::alice()).await.unwrap();

        let envelope = events.recv().await.unwrap();
        let json = serde_json::to_string(&envelope).unwrap();
        let decoded: EventEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, envelope);
    }
}
