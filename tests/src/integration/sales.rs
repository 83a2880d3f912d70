//! # Sale & Settlement Flows
//!
//! Listing, purchase, royalty splitting, marketplace exemption, settlement
//! failure atomicity, and batch transfer semantics.

#[cfg(test)]
mod tests {
    use crate::{actors, principal, standard_config};
    use asset_engine::prelude::*;
    use std::sync::Arc;

    type TestEngine = AssetEngineService<InMemoryTreasury, StaticEligibility, UnmeteredExecution>;

    /// Engine + treasury with one item minted to alice.
    async fn engine_with_item() -> (TestEngine, Arc<InMemoryTreasury>, ItemId) {
        let treasury = Arc::new(InMemoryTreasury::new());
        let engine = AssetEngineService::new(
            treasury.clone(),
            Arc::new(StaticEligibility::none()),
            Arc::new(UnmeteredExecution),
            standard_config(),
        );
        let id = engine.mint(actors::minter(), actors::alice()).await.unwrap();
        (engine, treasury, id)
    }

    // Royalty rate 500 bps, price 1000: 50 to the royalty owner, 950 to the
    // seller, summing exactly to the price.
    #[tokio::test]
    async fn test_purchase_splits_royalty_exactly() {
        let (engine, treasury, id) = engine_with_item().await;

        engine.set_price(actors::alice(), id, 1000).await.unwrap();
        engine.purchase(actors::bob(), id, 1000).await.unwrap();

        assert_eq!(treasury.balance_of(&actors::royalty_owner()), 50);
        assert_eq!(treasury.balance_of(&actors::alice()), 950);
        assert_eq!(treasury.total_held(), 1000);
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::bob());
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::NotForSale);
        assert!(engine.verify_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn test_delisting_clears_price_and_buyer() {
        let (engine, _, id) = engine_with_item().await;

        engine.set_price(actors::alice(), id, 1000).await.unwrap();
        assert_eq!(engine.get_price(id).await.unwrap(), 1000);

        engine.set_price(actors::alice(), id, 0).await.unwrap();
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::NotForSale);
        assert_eq!(engine.get_price(id).await.unwrap(), 0);

        // Purchasing a delisted item is a state error.
        let err = engine.purchase(actors::bob(), id, 1000).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_only_holder_can_list() {
        let (engine, _, id) = engine_with_item().await;
        let err = engine.set_price(actors::bob(), id, 1000).await.unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_repricing_keeps_listing() {
        let (engine, _, id) = engine_with_item().await;
        engine.set_price(actors::alice(), id, 1000).await.unwrap();
        engine.set_price(actors::alice(), id, 750).await.unwrap();
        assert_eq!(engine.get_price(id).await.unwrap(), 750);
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::ForSale);
    }

    #[tokio::test]
    async fn test_gift_transfer_of_listed_item_vetoed() {
        let (engine, treasury, id) = engine_with_item().await;
        engine.set_price(actors::alice(), id, 1000).await.unwrap();

        // Listed but not purchased: the hook vetoes an ordinary transfer.
        let err = engine
            .transfer(actors::alice(), actors::alice(), actors::bob(), id)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::TransferNotAuthorizedBySale { id });
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::alice());
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::ForSale);
        assert_eq!(treasury.total_held(), 0);
    }

    #[tokio::test]
    async fn test_in_progress_transfer_only_to_designated_buyer() {
        let (engine, treasury, id) = engine_with_item().await;
        engine.set_price(actors::alice(), id, 1000).await.unwrap();

        // Freeze the royalty owner so the purchase commits but cannot settle.
        treasury.freeze(actors::royalty_owner());
        let err = engine.purchase(actors::bob(), id, 1000).await.unwrap_err();
        assert!(matches!(err, EngineError::DisbursementFailed(_)));
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::InProgress);

        // The record still names bob; a transfer to carol is vetoed and
        // leaves holder, record, and balances unchanged.
        let err = engine
            .transfer(actors::alice(), actors::alice(), actors::carol(), id)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::TransferNotAuthorizedBySale { id });
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::alice());
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::InProgress);
        assert_eq!(treasury.total_held(), 0);

        // Once the recipient thaws, the seller completes the pending sale.
        treasury.unfreeze(&actors::royalty_owner());
        engine
            .transfer(actors::alice(), actors::alice(), actors::bob(), id)
            .await
            .unwrap();
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::bob());
        assert_eq!(engine.get_status(id).await.unwrap(), SaleStatus::NotForSale);
        assert_eq!(treasury.balance_of(&actors::royalty_owner()), 50);
        assert_eq!(treasury.balance_of(&actors::alice()), 950);
    }

    #[tokio::test]
    async fn test_listing_locked_while_purchase_in_progress() {
        let (engine, treasury, id) = engine_with_item().await;
        engine.set_price(actors::alice(), id, 1000).await.unwrap();

        treasury.freeze(actors::royalty_owner());
        let _ = engine.purchase(actors::bob(), id, 1000).await;

        let err = engine.set_price(actors::alice(), id, 2000).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));
        let err = engine.set_price(actors::alice(), id, 0).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_marketplace_transfer_skips_settlement() {
        let (engine, treasury, id) = engine_with_item().await;
        let market = actors::market();

        engine
            .set_marketplace(actors::admin(), vec![market])
            .await
            .unwrap();
        engine.set_operator(actors::alice(), market, true).await.unwrap();

        // No purchase ever happened; the allowlisted initiator moves the
        // item and no funds flow through the engine.
        engine
            .transfer(market, actors::alice(), actors::bob(), id)
            .await
            .unwrap();
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::bob());
        assert_eq!(treasury.total_held(), 0);
        assert_eq!(engine.stats().await.exempt_transfers, 1);
    }

    #[tokio::test]
    async fn test_cleared_marketplace_restores_enforcement() {
        let (engine, _, id) = engine_with_item().await;
        let market = actors::market();

        engine
            .set_marketplace(actors::admin(), vec![market])
            .await
            .unwrap();
        engine.set_operator(actors::alice(), market, true).await.unwrap();
        engine.clear_marketplace(actors::admin()).await.unwrap();
        assert!(engine.get_marketplace().await.is_empty());

        let err = engine
            .transfer(market, actors::alice(), actors::bob(), id)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::TransferNotAuthorizedBySale { id });
    }

    #[tokio::test]
    async fn test_marketplace_management_is_admin_only() {
        let (engine, _, _) = engine_with_item().await;
        let err = engine
            .set_marketplace(actors::alice(), vec![actors::market()])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));

        let err = engine.clear_marketplace(actors::alice()).await.unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_operator_completes_pending_sale_for_holder() {
        let (engine, treasury, id) = engine_with_item().await;
        engine.set_price(actors::alice(), id, 1000).await.unwrap();

        treasury.freeze(actors::royalty_owner());
        let _ = engine.purchase(actors::bob(), id, 1000).await;
        treasury.unfreeze(&actors::royalty_owner());

        // Carol is not authorized for alice's items.
        let err = engine
            .transfer(actors::carol(), actors::alice(), actors::bob(), id)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));

        // As an approved operator she may complete the pending sale.
        engine.set_operator(actors::alice(), actors::carol(), true).await.unwrap();
        engine
            .transfer(actors::carol(), actors::alice(), actors::bob(), id)
            .await
            .unwrap();
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::bob());
    }

    #[tokio::test]
    async fn test_batch_transfer_exempt_is_all_or_nothing() {
        let treasury = Arc::new(InMemoryTreasury::new());
        let engine = AssetEngineService::new(
            treasury.clone(),
            Arc::new(StaticEligibility::none()),
            Arc::new(UnmeteredExecution),
            standard_config(),
        );
        let market = actors::market();
        let alice = actors::alice();

        let outcome = engine.mint_batch(actors::minter(), alice, 3).await.unwrap();
        let (first, last) = outcome.range().unwrap();
        engine.set_marketplace(actors::admin(), vec![market]).await.unwrap();
        engine.set_operator(alice, market, true).await.unwrap();

        // One entry names the wrong holder: nothing moves.
        let bad = [
            TransferRequest { from: alice, to: actors::bob(), id: first },
            TransferRequest { from: actors::carol(), to: actors::bob(), id: last },
        ];
        let err = engine.transfer_batch(market, &bad).await.unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
        assert_eq!(engine.holder_of(first).await.unwrap(), alice);

        let good = [
            TransferRequest { from: alice, to: actors::bob(), id: first },
            TransferRequest { from: alice, to: actors::bob(), id: first + 1 },
            TransferRequest { from: alice, to: actors::carol(), id: last },
        ];
        engine.transfer_batch(market, &good).await.unwrap();
        assert_eq!(engine.holder_of(first).await.unwrap(), actors::bob());
        assert_eq!(engine.holder_of(last).await.unwrap(), actors::carol());
        assert_eq!(treasury.total_held(), 0);
    }

    #[tokio::test]
    async fn test_batch_transfer_chains_holders_within_batch() {
        let (engine, _, id) = engine_with_item().await;
        let market = actors::market();

        engine.set_marketplace(actors::admin(), vec![market]).await.unwrap();
        engine.set_operator(actors::alice(), market, true).await.unwrap();
        engine.set_operator(actors::bob(), market, true).await.unwrap();

        // alice -> bob -> carol in one batch: the second entry is validated
        // against the holder the first entry will produce.
        let chain = [
            TransferRequest { from: actors::alice(), to: actors::bob(), id },
            TransferRequest { from: actors::bob(), to: actors::carol(), id },
        ];
        engine.transfer_batch(market, &chain).await.unwrap();
        assert_eq!(engine.holder_of(id).await.unwrap(), actors::carol());
    }

    #[tokio::test]
    async fn test_batch_transfer_settles_pending_sales_atomically() {
        let treasury = Arc::new(InMemoryTreasury::new());
        let engine = AssetEngineService::new(
            treasury.clone(),
            Arc::new(StaticEligibility::none()),
            Arc::new(UnmeteredExecution),
            standard_config(),
        );
        let alice = actors::alice();

        let a = engine.mint(actors::minter(), alice).await.unwrap();
        let b = engine.mint(actors::minter(), alice).await.unwrap();
        engine.set_price(alice, a, 1000).await.unwrap();
        engine.set_price(alice, b, 2000).await.unwrap();

        // Commit both purchases without settling them.
        treasury.freeze(actors::royalty_owner());
        let _ = engine.purchase(actors::bob(), a, 1000).await;
        let _ = engine.purchase(actors::carol(), b, 2000).await;
        assert_eq!(engine.get_status(a).await.unwrap(), SaleStatus::InProgress);
        assert_eq!(engine.get_status(b).await.unwrap(), SaleStatus::InProgress);

        let entries = [
            TransferRequest { from: alice, to: actors::bob(), id: a },
            TransferRequest { from: alice, to: actors::carol(), id: b },
        ];

        // Now the seller is the one who cannot receive: the royalty leg of
        // the first entry completes, the seller leg fails, the batch aborts,
        // and the completed leg is reclaimed - balances match the
        // pre-attempt state.
        treasury.unfreeze(&actors::royalty_owner());
        treasury.freeze(alice);
        let err = engine.transfer_batch(alice, &entries).await.unwrap_err();
        assert!(matches!(err, EngineError::DisbursementFailed(_)));
        assert_eq!(treasury.total_held(), 0);
        assert_eq!(engine.holder_of(a).await.unwrap(), alice);
        assert_eq!(engine.get_status(a).await.unwrap(), SaleStatus::InProgress);

        treasury.unfreeze(&alice);
        engine.transfer_batch(alice, &entries).await.unwrap();

        assert_eq!(engine.holder_of(a).await.unwrap(), actors::bob());
        assert_eq!(engine.holder_of(b).await.unwrap(), actors::carol());
        // 5% of 1000 + 5% of 2000 in royalties, remainder to the seller.
        assert_eq!(treasury.balance_of(&actors::royalty_owner()), 150);
        assert_eq!(treasury.balance_of(&alice), 2850);
        assert!(engine.verify_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn test_zero_rate_royalty_pays_seller_everything() {
        let mut config = standard_config();
        config.royalty = RoyaltyConfig::default();
        let treasury = Arc::new(InMemoryTreasury::new());
        let engine = AssetEngineService::new(
            treasury.clone(),
            Arc::new(StaticEligibility::none()),
            Arc::new(UnmeteredExecution),
            config,
        );

        let id = engine.mint(actors::minter(), actors::alice()).await.unwrap();
        engine.set_price(actors::alice(), id, 1000).await.unwrap();
        engine.purchase(actors::bob(), id, 1000).await.unwrap();

        assert_eq!(treasury.balance_of(&actors::alice()), 1000);
        assert_eq!(treasury.total_held(), 1000);
    }

    // Settlement arithmetic: royalty + seller always sum exactly to the
    // price, for arbitrary prices and rates.
    #[test]
    fn test_settlement_conservation_randomized() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let total: Amount = rng.gen();
            let rate = BasisPoints::new(rng.gen_range(0..=10_000)).unwrap();
            let (royalty, seller) = split_settlement(total, rate);
            assert_eq!(royalty + seller, total);
            assert_eq!(
                u128::from(royalty),
                u128::from(total) * u128::from(rate.as_u16()) / 10_000
            );
        }
    }

    #[tokio::test]
    async fn test_settlement_uses_current_royalty_config() {
        let (engine, treasury, id) = engine_with_item().await;

        engine
            .set_royalty(actors::admin(), actors::royalty_owner(), 1000)
            .await
            .unwrap();
        engine.set_price(actors::alice(), id, 500).await.unwrap();
        engine.purchase(actors::bob(), id, 500).await.unwrap();

        // 10% of 500.
        assert_eq!(treasury.balance_of(&actors::royalty_owner()), 50);
        assert_eq!(treasury.balance_of(&actors::alice()), 450);
    }
}
