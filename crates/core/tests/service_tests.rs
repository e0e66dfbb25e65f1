// ═══════════════════════════════════════════════════════════════════
// Service & Integration Tests — TripService, MemoryTripStore,
// TripSavings facade
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use uuid::Uuid;

use trip_savings_core::errors::CoreError;
use trip_savings_core::models::book::TripBook;
use trip_savings_core::models::product::ProductPrices;
use trip_savings_core::models::trip::{TripDraft, TripPatch};
use trip_savings_core::services::trip_service::TripService;
use trip_savings_core::storage::store::{MemoryTripStore, TripStore};
use trip_savings_core::TripSavings;

const EPS: f64 = 1e-6;

fn draft(name: &str) -> TripDraft {
    TripDraft {
        name: name.into(),
        ticket_cost: 9000.0,
        local_currency: "BRL".into(),
        abroad_currency: "USD".into(),
        abroad_tax_percentage: 6.38,
        abroad_conversion_rate: 4.86687,
    }
}

// ═══════════════════════════════════════════════════════════════════
// TripService — CRUD over a book
// ═══════════════════════════════════════════════════════════════════

mod trip_service {
    use super::*;

    #[test]
    fn create_and_get() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let trip = service.get_trip(&book, id, owner).unwrap();
        assert_eq!(trip.name, "Florida");
    }

    #[test]
    fn get_with_wrong_owner_is_not_found() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let err = service.get_trip(&book, id, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CoreError::TripNotFound(_)));
    }

    #[test]
    fn delete_removes_trip_and_products() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        service
            .add_product(&mut book, id, owner, "iPhone", 2, 1200.0, 11000.0)
            .unwrap();

        let removed = service.delete_trip(&mut book, id, owner).unwrap();
        assert_eq!(removed.products.len(), 1);
        assert_eq!(book.trip_count(), 0);
    }

    #[test]
    fn delete_with_wrong_owner_is_not_found() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        assert!(matches!(
            service.delete_trip(&mut book, id, Uuid::new_v4()),
            Err(CoreError::TripNotFound(_))
        ));
        assert_eq!(book.trip_count(), 1);
    }

    // ── Validation at the mutation boundary ─────────────────────────

    #[test]
    fn rejects_blank_name() {
        let service = TripService::new();
        let mut book = TripBook::default();

        let err = service
            .create_trip(&mut book, Uuid::new_v4(), draft("   "))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn rejects_bad_currency_code() {
        let service = TripService::new();
        let mut book = TripBook::default();

        let mut d = draft("Florida");
        d.abroad_currency = "US".into();
        assert!(matches!(
            service.create_trip(&mut book, Uuid::new_v4(), d),
            Err(CoreError::ValidationError(_))
        ));

        let mut d = draft("Florida");
        d.local_currency = "BR1".into();
        assert!(matches!(
            service.create_trip(&mut book, Uuid::new_v4(), d),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_and_negative_conversion_rate() {
        let service = TripService::new();
        let mut book = TripBook::default();

        for rate in [0.0, -4.86687, f64::NAN, f64::INFINITY] {
            let mut d = draft("Florida");
            d.abroad_conversion_rate = rate;
            assert!(matches!(
                service.create_trip(&mut book, Uuid::new_v4(), d),
                Err(CoreError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn rejects_negative_money_fields() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let mut d = draft("Florida");
        d.ticket_cost = -1.0;
        assert!(service.create_trip(&mut book, owner, d).is_err());

        let id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        assert!(service
            .add_product(&mut book, id, owner, "iPhone", 1, -1200.0, 11000.0)
            .is_err());
        assert!(service
            .add_product(&mut book, id, owner, "iPhone", 1, 1200.0, f64::NAN)
            .is_err());
    }

    // ── Products ────────────────────────────────────────────────────

    #[test]
    fn add_update_remove_product() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let trip_id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let product_id = service
            .add_product(&mut book, trip_id, owner, "iPhone", 2, 1200.0, 11000.0)
            .unwrap();

        service
            .update_product(
                &mut book, trip_id, owner, product_id, "iPhone 15", 3, 1250.0, 10500.0,
            )
            .unwrap();
        let trip = service.get_trip(&book, trip_id, owner).unwrap();
        let product = trip.product(product_id).unwrap();
        assert_eq!(product.name, "iPhone 15");
        assert_eq!(product.quantity, 3);
        assert_eq!(product.abroad_price, 1250.0);

        let removed = service
            .remove_product(&mut book, trip_id, owner, product_id)
            .unwrap();
        assert_eq!(removed.id, product_id);
        let trip = service.get_trip(&book, trip_id, owner).unwrap();
        assert!(trip.products.is_empty());
    }

    #[test]
    fn remove_unknown_product_is_product_not_found() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let trip_id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        assert!(matches!(
            service.remove_product(&mut book, trip_id, owner, Uuid::new_v4()),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    // ── Patch path ──────────────────────────────────────────────────

    #[test]
    fn patch_updates_named_products_only() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let trip_id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let iphone = service
            .add_product(&mut book, trip_id, owner, "iPhone", 2, 1200.0, 11000.0)
            .unwrap();
        let macbook = service
            .add_product(&mut book, trip_id, owner, "Macbook", 2, 1300.0, 15000.0)
            .unwrap();

        let mut prices = HashMap::new();
        prices.insert(
            iphone,
            ProductPrices {
                abroad_price: 1100.0,
                local_price: 10000.0,
            },
        );
        let patch = TripPatch {
            product_prices: prices,
            ..TripPatch::default()
        };
        service.update_trip(&mut book, trip_id, owner, patch).unwrap();

        let trip = service.get_trip(&book, trip_id, owner).unwrap();
        let patched = trip.product(iphone).unwrap();
        assert_eq!(patched.abroad_price, 1100.0);
        assert_eq!(patched.local_price, 10000.0);
        // quantity and name are out of the patch's reach
        assert_eq!(patched.quantity, 2);
        assert_eq!(patched.name, "iPhone");

        // the other product is byte-for-byte untouched
        let untouched = trip.product(macbook).unwrap();
        assert_eq!(untouched.abroad_price, 1300.0);
        assert_eq!(untouched.local_price, 15000.0);
    }

    #[test]
    fn patch_updates_trip_scalars() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let trip_id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let patch = TripPatch {
            name: Some("Florida 2".into()),
            ticket_cost: Some(8000.0),
            abroad_conversion_rate: Some(5.0),
            local_currency: Some("eur".into()),
            ..TripPatch::default()
        };
        service.update_trip(&mut book, trip_id, owner, patch).unwrap();

        let trip = service.get_trip(&book, trip_id, owner).unwrap();
        assert_eq!(trip.name, "Florida 2");
        assert_eq!(trip.ticket_cost, 8000.0);
        assert_eq!(trip.abroad_conversion_rate, 5.0);
        assert_eq!(trip.local_currency, "EUR");
        // unpatched scalars survive
        assert_eq!(trip.abroad_currency, "USD");
        assert_eq!(trip.abroad_tax_percentage, 6.38);
    }

    #[test]
    fn patch_with_unknown_product_id_changes_nothing() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let trip_id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let iphone = service
            .add_product(&mut book, trip_id, owner, "iPhone", 2, 1200.0, 11000.0)
            .unwrap();

        let mut prices = HashMap::new();
        prices.insert(
            iphone,
            ProductPrices {
                abroad_price: 1.0,
                local_price: 1.0,
            },
        );
        prices.insert(
            Uuid::new_v4(),
            ProductPrices {
                abroad_price: 2.0,
                local_price: 2.0,
            },
        );
        let patch = TripPatch {
            name: Some("Renamed".into()),
            product_prices: prices,
            ..TripPatch::default()
        };

        let err = service
            .update_trip(&mut book, trip_id, owner, patch)
            .unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));

        // all-or-nothing: neither the scalar nor the valid price landed
        let trip = service.get_trip(&book, trip_id, owner).unwrap();
        assert_eq!(trip.name, "Florida");
        assert_eq!(trip.product(iphone).unwrap().abroad_price, 1200.0);
    }

    #[test]
    fn patch_with_invalid_rate_changes_nothing() {
        let service = TripService::new();
        let mut book = TripBook::default();
        let owner = Uuid::new_v4();

        let trip_id = service.create_trip(&mut book, owner, draft("Florida")).unwrap();
        let patch = TripPatch {
            abroad_conversion_rate: Some(0.0),
            ticket_cost: Some(1.0),
            ..TripPatch::default()
        };

        assert!(service.update_trip(&mut book, trip_id, owner, patch).is_err());
        let trip = service.get_trip(&book, trip_id, owner).unwrap();
        assert_eq!(trip.abroad_conversion_rate, 4.86687);
        assert_eq!(trip.ticket_cost, 9000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// MemoryTripStore — the async storage boundary
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[tokio::test]
    async fn create_read_list_delete() {
        let store = MemoryTripStore::new();
        let owner = Uuid::new_v4();

        let trip = store.create_trip(owner, draft("Florida")).await.unwrap();
        let fetched = store.get_trip(trip.id, owner).await.unwrap();
        assert_eq!(fetched.name, "Florida");

        store.create_trip(owner, draft("Florida 2")).await.unwrap();
        let trips = store.list_trips(owner).await.unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].name, "Florida");

        store.delete_trip(trip.id, owner).await.unwrap();
        assert_eq!(store.list_trips(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn owner_isolation_on_every_operation() {
        let store = MemoryTripStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let trip = store.create_trip(alice, draft("Florida")).await.unwrap();

        assert!(matches!(
            store.get_trip(trip.id, bob).await,
            Err(CoreError::TripNotFound(_))
        ));
        assert!(matches!(
            store.update_trip(trip.id, bob, TripPatch::default()).await,
            Err(CoreError::TripNotFound(_))
        ));
        assert!(matches!(
            store.delete_trip(trip.id, bob).await,
            Err(CoreError::TripNotFound(_))
        ));
        assert!(store.list_trips(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_returns_the_patched_trip() {
        let store = MemoryTripStore::new();
        let owner = Uuid::new_v4();

        let trip = store.create_trip(owner, draft("Florida")).await.unwrap();
        let patch = TripPatch {
            ticket_cost: Some(7500.0),
            ..TripPatch::default()
        };
        let updated = store.update_trip(trip.id, owner, patch).await.unwrap();
        assert_eq!(updated.ticket_cost, 7500.0);
        assert!(updated.updated_at >= trip.updated_at);
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_with_book() {
        let store = MemoryTripStore::new();
        let owner = Uuid::new_v4();
        store.create_trip(owner, draft("Florida")).await.unwrap();

        let book = store.snapshot();
        let reopened = MemoryTripStore::with_book(book);
        assert_eq!(reopened.list_trips(owner).await.unwrap().len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// TripSavings facade
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    fn seeded() -> (TripSavings, Uuid, Uuid) {
        let mut ts = TripSavings::create_new();
        let owner = Uuid::new_v4();
        let trip_id = ts.create_trip(owner, draft("Florida US x BR")).unwrap();
        ts.add_product(trip_id, owner, "iPhone 15 Pro 256gb", 2, 1200.0, 11000.0)
            .unwrap();
        ts.add_product(trip_id, owner, "Macbook Air M2 15' 256gb", 2, 1300.0, 15000.0)
            .unwrap();
        (ts, owner, trip_id)
    }

    #[test]
    fn summary_reflects_stored_products() {
        let (ts, owner, trip_id) = seeded();
        let summary = ts.trip_summary(trip_id, owner).unwrap();

        assert_eq!(summary.products.len(), 2);
        assert_eq!(summary.products_count, 4);
        assert!((summary.total_local - (2.0 * 11000.0 + 2.0 * 15000.0)).abs() < EPS);
    }

    #[test]
    fn summary_for_foreign_owner_is_not_found() {
        let (ts, _owner, trip_id) = seeded();
        assert!(matches!(
            ts.trip_summary(trip_id, Uuid::new_v4()),
            Err(CoreError::TripNotFound(_))
        ));
    }

    #[test]
    fn trips_with_summary_covers_every_trip() {
        let (mut ts, owner, _trip_id) = seeded();
        ts.create_trip(owner, draft("Florida 2")).unwrap();

        let summaries = ts.trips_with_summary(owner);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Florida US x BR");
        assert_eq!(summaries[1].name, "Florida 2");
        // the second trip has no products, only its ticket
        assert_eq!(summaries[1].products_count, 0);
        assert!((summaries[1].total_savings + 9000.0).abs() < EPS);
    }

    #[test]
    fn patch_then_summary_recomputes_from_source() {
        let (mut ts, owner, trip_id) = seeded();

        let before = ts.trip_summary(trip_id, owner).unwrap();

        let iphone_id = ts.get_trip(trip_id, owner).unwrap().products[0].id;
        let mut prices = HashMap::new();
        prices.insert(
            iphone_id,
            ProductPrices {
                abroad_price: 1000.0,
                local_price: 12000.0,
            },
        );
        ts.set_product_prices(trip_id, owner, prices).unwrap();

        let after = ts.trip_summary(trip_id, owner).unwrap();
        assert_ne!(before.total_savings, after.total_savings);
        assert_eq!(after.products[0].abroad_price, 1000.0);
        assert_eq!(after.products[0].local_price, 12000.0);
        // untouched line comes out identical
        assert_eq!(before.products[1], after.products[1]);
    }

    #[test]
    fn dirty_flag_follows_mutations() {
        let mut ts = TripSavings::create_new();
        assert!(!ts.has_unsaved_changes());

        let owner = Uuid::new_v4();
        let trip_id = ts.create_trip(owner, draft("Florida")).unwrap();
        assert!(ts.has_unsaved_changes());

        let bytes = ts.save_to_bytes("hunter2").unwrap();
        assert!(!ts.has_unsaved_changes());

        ts.delete_trip(trip_id, owner).unwrap();
        assert!(ts.has_unsaved_changes());

        let reloaded = TripSavings::load_from_bytes(&bytes, "hunter2").unwrap();
        assert!(!reloaded.has_unsaved_changes());
        assert_eq!(reloaded.trip_count(owner), 1);
    }

    #[test]
    fn json_export_import_round_trip() {
        let (ts, owner, _trip_id) = seeded();
        let json = ts.export_trips_to_json(owner).unwrap();

        let mut other = TripSavings::create_new();
        let new_owner = Uuid::new_v4();
        let imported = other.import_trips_from_json(new_owner, &json).unwrap();
        assert_eq!(imported, 1);

        let trips = other.list_trips(new_owner);
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].owner_id, new_owner);
        assert_eq!(trips[0].products.len(), 2);
    }

    #[test]
    fn import_rejects_duplicate_trip_ids() {
        let (mut ts, owner, _trip_id) = seeded();
        let json = ts.export_trips_to_json(owner).unwrap();

        let err = ts.import_trips_from_json(owner, &json).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        // all-or-nothing: nothing was appended
        assert_eq!(ts.trip_count(owner), 1);
    }

    #[test]
    fn csv_export_has_header_and_one_row_per_product() {
        let (ts, owner, trip_id) = seeded();
        let csv = ts.export_trip_to_csv(trip_id, owner).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,name,quantity"));
        // the Macbook name contains a comma-free apostrophe form, but a
        // name with a comma must be quoted
        assert!(lines[1].contains("iPhone 15 Pro 256gb"));
    }

    #[test]
    fn csv_export_quotes_names_with_commas() {
        let mut ts = TripSavings::create_new();
        let owner = Uuid::new_v4();
        let trip_id = ts.create_trip(owner, draft("Florida")).unwrap();
        ts.add_product(trip_id, owner, "Adapter, USB-C", 1, 20.0, 150.0)
            .unwrap();

        let csv = ts.export_trip_to_csv(trip_id, owner).unwrap();
        assert!(csv.contains("\"Adapter, USB-C\""));
    }
}
