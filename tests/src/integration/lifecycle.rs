//! # Device Lifecycle Flows
//!
//! The canonical registry stories, end to end: a manufacturer is authorized,
//! registers hardware, custody moves down a chain of owners, and every step
//! is observable through queries and the event sink.

#[cfg(test)]
mod tests {
    use registry_core::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Matches the admin baked into `ServiceConfig::for_testing()`.
    const ADMIN: Identity = Identity::new([0xAD; 20]);
    const ACME: Identity = Identity::new([0x10; 20]);
    const FIRST_OWNER: Identity = Identity::new([0x21; 20]);
    const SECOND_OWNER: Identity = Identity::new([0x22; 20]);
    const THIRD_OWNER: Identity = Identity::new([0x23; 20]);

    fn phone(serial: &str) -> DeviceSubmission {
        DeviceSubmission {
            brand: "Acme".into(),
            model: "Falcon X2".into(),
            device_type: "Smartphone".into(),
            storage_variant: "256GB".into(),
            color: "Graphite".into(),
            batch_number: "B-2024-11".into(),
            spec_digest: SpecDigest::new([0x42; 32]),
            ..DeviceSubmission::new(serial)
        }
    }

    /// Service with ACME already authorized (named, so reports carry it).
    async fn registry_with_acme() -> RegistryService<RecordingEventSink, ManualClock> {
        crate::init_tracing();
        let config = ServiceConfig {
            registry: RegistryConfig::for_testing().with_manufacturer(ACME, "Acme Devices Ltd."),
            ..ServiceConfig::for_testing()
        };
        RegistryService::new(config, RecordingEventSink::new(), ManualClock::new(1_000))
    }

    // =============================================================================
    // REGISTRATION
    // =============================================================================

    #[tokio::test]
    async fn test_authorized_manufacturer_registers_device() {
        let registry = registry_with_acme().await;

        registry
            .register_device(ACME, phone("SN-ACME-001"))
            .await
            .expect("registration should succeed");

        // The record is complete and frozen
        let record = registry.device_details("SN-ACME-001").await.expect("record");
        assert_eq!(record.serial_number.as_str(), "SN-ACME-001");
        assert_eq!(record.brand, "Acme");
        assert_eq!(record.model, "Falcon X2");
        assert_eq!(record.manufacturer, ACME);
        assert_eq!(record.manufacturer_name, "Acme Devices Ltd.");
        assert!(record.authentic);
        assert_eq!(record.manufacturing_timestamp, 1_000);
        assert_eq!(record.current_owner, ACME);

        // Queries agree
        assert!(registry.serial_exists("SN-ACME-001").await);
        assert_eq!(
            registry.custody_state("SN-ACME-001").await,
            CustodyState::WithManufacturer
        );
        assert!(registry
            .ownership_history("SN-ACME-001")
            .await
            .expect("history exists")
            .is_empty());
        assert_eq!(
            registry.owner_devices(ACME).await,
            vec![SerialNumber::parse("SN-ACME-001").unwrap()]
        );
    }

    #[tokio::test]
    async fn test_duplicate_serial_rejected_and_state_untouched() {
        let registry = registry_with_acme().await;
        registry
            .register_device(ACME, phone("SN-ACME-001"))
            .await
            .expect("first registration");
        let original = registry.device_details("SN-ACME-001").await.unwrap();

        // Same serial, different metadata, even a different caller
        registry
            .authorize_manufacturers(ADMIN, vec![FIRST_OWNER])
            .await
            .unwrap();
        let mut clone_attempt = phone("SN-ACME-001");
        clone_attempt.color = "Counterfeit Red".into();
        let err = registry
            .register_device(FIRST_OWNER, clone_attempt)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateSerial { .. }));
        assert_eq!(err.kind(), ErrorKind::DuplicateSerial);

        // First registration wins, byte for byte
        let still = registry.device_details("SN-ACME-001").await.unwrap();
        assert_eq!(still, original);
    }

    #[tokio::test]
    async fn test_unauthorized_registration_rejected() {
        let registry = registry_with_acme().await;
        let intruder = Identity::new([0x66; 20]);

        let err = registry
            .register_device(intruder, phone("SN-FAKE-001"))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::NotAuthorized { caller } if caller == intruder));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(!registry.serial_exists("SN-FAKE-001").await);
        // Rejections emit nothing
        assert!(registry.event_sink().is_empty());
    }

    // =============================================================================
    // TRANSFER
    // =============================================================================

    #[tokio::test]
    async fn test_sale_moves_custody_and_appends_history() {
        let registry = registry_with_acme().await;
        registry
            .register_device(ACME, phone("SN-ACME-001"))
            .await
            .unwrap();

        registry.clock().advance(86_400);
        registry
            .transfer_ownership(ACME, "SN-ACME-001", FIRST_OWNER, "Sale", U256::from(500u64))
            .await
            .expect("transfer should succeed");

        let history = registry.ownership_history("SN-ACME-001").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from, ACME);
        assert_eq!(history[0].to, FIRST_OWNER);
        assert_eq!(history[0].reason, "Sale");
        assert_eq!(history[0].price, U256::from(500u64));
        assert_eq!(history[0].timestamp, 87_400);

        // Owner view follows
        let record = registry.device_details("SN-ACME-001").await.unwrap();
        assert_eq!(record.current_owner, FIRST_OWNER);
        assert_eq!(record.manufacturer, ACME);
        assert!(registry.owner_devices(ACME).await.is_empty());
        assert_eq!(registry.owner_devices(FIRST_OWNER).await.len(), 1);
    }

    #[tokio::test]
    async fn test_previous_owner_cannot_transfer_again() {
        let registry = registry_with_acme().await;
        registry
            .register_device(ACME, phone("SN-ACME-001"))
            .await
            .unwrap();
        registry
            .transfer_ownership(ACME, "SN-ACME-001", FIRST_OWNER, "Sale", U256::from(500u64))
            .await
            .unwrap();

        // ACME no longer holds the device
        let err = registry
            .transfer_ownership(ACME, "SN-ACME-001", SECOND_OWNER, "Sale", U256::zero())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::NotOwner { caller, ref serial }
                if caller == ACME && serial.as_str() == "SN-ACME-001"
        ));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        // Nothing was appended
        assert_eq!(
            registry.ownership_history("SN-ACME-001").await.unwrap().len(),
            1
        );
        assert_eq!(
            registry.device_details("SN-ACME-001").await.unwrap().current_owner,
            FIRST_OWNER
        );
    }

    #[tokio::test]
    async fn test_custody_chain_factory_to_third_owner() {
        let registry = registry_with_acme().await;
        registry
            .register_device(ACME, phone("SN-ACME-001"))
            .await
            .unwrap();

        let hops = [
            (ACME, FIRST_OWNER, "Sale", 900u64),
            (FIRST_OWNER, SECOND_OWNER, "Resale", 650),
            (SECOND_OWNER, THIRD_OWNER, "Gift", 0),
        ];
        for (from, to, reason, price) in hops {
            registry.clock().advance(3_600);
            registry
                .transfer_ownership(from, "SN-ACME-001", to, reason, U256::from(price))
                .await
                .expect("chain transfer");
        }

        let history = registry.ownership_history("SN-ACME-001").await.unwrap();
        assert_eq!(history.len(), 3);
        // Chain is continuous: each hop starts where the previous ended
        assert_eq!(history[0].from, ACME);
        for pair in history.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
        // Timestamps never run backwards
        for pair in history.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }

        assert_eq!(
            registry.custody_state("SN-ACME-001").await,
            CustodyState::Transferred { transfers: 3 }
        );
        let report = registry.verify_device("SN-ACME-001").await;
        assert!(report.authentic);
        assert_eq!(report.current_owner, THIRD_OWNER);
        assert!(registry.check_invariants().await.is_valid());
    }

    // =============================================================================
    // EVENT TRAIL
    // =============================================================================

    #[tokio::test]
    async fn test_event_trail_matches_operation_order() {
        let registry = registry_with_acme().await;
        registry
            .register_device(ACME, phone("SN-ACME-001"))
            .await
            .unwrap();
        registry
            .register_device(ACME, phone("SN-ACME-002"))
            .await
            .unwrap();
        registry
            .transfer_ownership(ACME, "SN-ACME-001", FIRST_OWNER, "Sale", U256::from(500u64))
            .await
            .unwrap();

        // Seeded authorization is silent, so the trail starts at registration
        let events = registry.event_sink().events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            RegistryEvent::DeviceRegistered { ref serial_number, manufacturer }
                if serial_number.as_str() == "SN-ACME-001" && manufacturer == ACME
        ));
        assert!(matches!(
            events[1],
            RegistryEvent::DeviceRegistered { ref serial_number, .. }
                if serial_number.as_str() == "SN-ACME-002"
        ));
        assert!(matches!(
            events[2],
            RegistryEvent::OwnershipTransferred { ref serial_number, from, to }
                if serial_number.as_str() == "SN-ACME-001"
                    && from == ACME
                    && to == FIRST_OWNER
        ));
    }

    #[tokio::test]
    async fn test_fleet_registration_under_concurrency() {
        let registry = std::sync::Arc::new(registry_with_acme().await);

        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = std::sync::Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry
                    .register_device(ACME, phone(&format!("SN-ACME-{i:03}")))
                    .await
            }));
        }
        for handle in handles {
            handle.await.expect("task").expect("registration");
        }

        assert_eq!(registry.owner_devices(ACME).await.len(), 16);
        assert_eq!(registry.event_sink().len(), 16);
        assert!(registry.check_invariants().await.is_valid());
    }
}
