//! # Authorization Registry Flows
//!
//! Admin-gated control of who may register devices: batch grants and
//! revocations, the admin registration policy, construction-time seeding,
//! and the one rule revocation never breaks: records keep the authenticity
//! they were born with.

#[cfg(test)]
mod tests {
    use registry_core::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ADMIN: Identity = Identity::new([0xAD; 20]);
    const APPLE: Identity = Identity::new([0x0A; 20]);
    const SAMSUNG: Identity = Identity::new([0x0B; 20]);
    const XIAOMI: Identity = Identity::new([0x0C; 20]);

    fn watch(serial: &str) -> DeviceSubmission {
        DeviceSubmission {
            brand: "Apple".into(),
            model: "Watch Ultra 2".into(),
            device_type: "Smartwatch".into(),
            storage_variant: "64GB".into(),
            color: "Titanium".into(),
            batch_number: "W-2024-03".into(),
            spec_digest: SpecDigest::new([0x77; 32]),
            ..DeviceSubmission::new(serial)
        }
    }

    fn fresh_registry() -> RegistryService<RecordingEventSink, ManualClock> {
        crate::init_tracing();
        create_test_service()
    }

    // =============================================================================
    // ADMIN GATE
    // =============================================================================

    #[tokio::test]
    async fn test_only_admin_may_authorize() {
        let registry = fresh_registry();
        registry
            .authorize_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();

        // Even an authorized manufacturer cannot grant authorization
        let err = registry
            .authorize_manufacturers(APPLE, vec![SAMSUNG])
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAdmin { caller } if caller == APPLE));
        assert!(!registry.is_authorized(SAMSUNG).await);

        let err = registry
            .revoke_manufacturers(APPLE, vec![APPLE])
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAdmin { .. }));
        assert!(registry.is_authorized(APPLE).await);
    }

    #[tokio::test]
    async fn test_zero_identity_poisons_the_whole_batch() {
        let registry = fresh_registry();

        let err = registry
            .authorize_manufacturers(ADMIN, vec![APPLE, Identity::ZERO, SAMSUNG])
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ZeroIdentity { .. }));

        // Batch application is all-or-nothing
        assert!(!registry.is_authorized(APPLE).await);
        assert!(!registry.is_authorized(SAMSUNG).await);
        assert!(registry.event_sink().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected() {
        let registry = fresh_registry();

        let oversized: Vec<Identity> = (1..=limits::MAX_AUTHORIZATION_BATCH + 1)
            .map(|i| {
                let mut bytes = [0u8; 20];
                bytes[..8].copy_from_slice(&(i as u64).to_be_bytes());
                Identity::new(bytes)
            })
            .collect();

        let err = registry
            .authorize_manufacturers(ADMIN, oversized)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::BatchTooLarge { size, max }
                if size == limits::MAX_AUTHORIZATION_BATCH + 1
                    && max == limits::MAX_AUTHORIZATION_BATCH
        ));
        assert!(registry.list_authorized().await.is_empty());
    }

    #[tokio::test]
    async fn test_listing_follows_authorization_order() {
        let registry = fresh_registry();
        registry
            .authorize_manufacturers(ADMIN, vec![SAMSUNG, APPLE])
            .await
            .unwrap();
        registry
            .authorize_manufacturers(ADMIN, vec![XIAOMI])
            .await
            .unwrap();
        assert_eq!(
            registry.list_authorized().await,
            vec![SAMSUNG, APPLE, XIAOMI]
        );

        // A revoke/re-grant cycle re-enters the list at the end
        registry
            .revoke_manufacturers(ADMIN, vec![SAMSUNG])
            .await
            .unwrap();
        registry
            .authorize_manufacturers(ADMIN, vec![SAMSUNG])
            .await
            .unwrap();
        assert_eq!(
            registry.list_authorized().await,
            vec![APPLE, XIAOMI, SAMSUNG]
        );
    }

    // =============================================================================
    // REVOCATION
    // =============================================================================

    #[tokio::test]
    async fn test_revoked_manufacturer_cannot_register() {
        let registry = fresh_registry();
        registry
            .authorize_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();
        registry
            .register_device(APPLE, watch("SN-APL-100"))
            .await
            .unwrap();

        registry
            .revoke_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();

        let err = registry
            .register_device(APPLE, watch("SN-APL-101"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAuthorized { .. }));
        assert!(!registry.serial_exists("SN-APL-101").await);
    }

    #[tokio::test]
    async fn test_revocation_never_rewrites_existing_records() {
        let registry = fresh_registry();
        registry
            .authorize_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();
        registry
            .register_device(APPLE, watch("SN-APL-100"))
            .await
            .unwrap();

        registry
            .revoke_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();

        // The device was genuine when it was made; it still is
        let report = registry.verify_device("SN-APL-100").await;
        assert!(report.exists);
        assert!(report.authentic);
        assert!(!registry.is_authorized(APPLE).await);

        // And it can still be transferred by its owner
        registry
            .transfer_ownership(APPLE, "SN-APL-100", SAMSUNG, "Sale", U256::from(100u64))
            .await
            .expect("custody is independent of authorization");
        assert!(registry.check_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn test_events_only_for_actual_changes() {
        let registry = fresh_registry();
        registry
            .authorize_manufacturers(ADMIN, vec![APPLE, SAMSUNG])
            .await
            .unwrap();

        // SAMSUNG is re-granted (no-op) and XIAOMI was never authorized
        registry
            .authorize_manufacturers(ADMIN, vec![SAMSUNG])
            .await
            .unwrap();
        registry
            .revoke_manufacturers(ADMIN, vec![APPLE, XIAOMI])
            .await
            .unwrap();

        let events = registry.event_sink().events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            RegistryEvent::ManufacturerAuthorized { manufacturer } if manufacturer == APPLE
        ));
        assert!(matches!(
            events[1],
            RegistryEvent::ManufacturerAuthorized { manufacturer } if manufacturer == SAMSUNG
        ));
        assert!(matches!(
            events[2],
            RegistryEvent::ManufacturerRevoked { manufacturer } if manufacturer == APPLE
        ));

        let stats = registry.stats().await;
        assert_eq!(stats.manufacturers_authorized, 2);
        assert_eq!(stats.manufacturers_revoked, 1);
    }

    // =============================================================================
    // ADMIN REGISTRATION POLICY
    // =============================================================================

    #[tokio::test]
    async fn test_admin_may_register_under_default_policy() {
        let registry = fresh_registry();

        registry
            .register_device(ADMIN, watch("SN-ADM-001"))
            .await
            .expect("default policy admits the admin");

        // Admitted by policy, but not an authorized manufacturer: the record
        // exists without the authenticity mark
        let report = registry.verify_device("SN-ADM-001").await;
        assert!(report.exists);
        assert!(!report.authentic);
        assert_eq!(report.current_owner, ADMIN);
    }

    #[tokio::test]
    async fn test_strict_policy_holds_admin_to_the_same_bar() {
        let config = ServiceConfig {
            registry: RegistryConfig::for_testing().without_admin_registration(),
            ..ServiceConfig::for_testing()
        };
        let registry =
            RegistryService::new(config, RecordingEventSink::new(), ManualClock::default());

        let err = registry
            .register_device(ADMIN, watch("SN-ADM-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAuthorized { caller } if caller == ADMIN));

        // Explicit authorization still works, and the record is authentic
        registry
            .authorize_manufacturers(ADMIN, vec![ADMIN])
            .await
            .unwrap();
        registry
            .register_device(ADMIN, watch("SN-ADM-001"))
            .await
            .unwrap();
        assert!(registry.verify_device("SN-ADM-001").await.authentic);
    }

    // =============================================================================
    // SEEDING
    // =============================================================================

    #[tokio::test]
    async fn test_seeded_manufacturers_are_ready_and_silent() {
        let config = ServiceConfig {
            registry: RegistryConfig::for_testing()
                .with_manufacturer(APPLE, "Apple Inc.")
                .with_manufacturer(SAMSUNG, "Samsung Electronics"),
            ..ServiceConfig::for_testing()
        };
        let registry =
            RegistryService::new(config, RecordingEventSink::new(), ManualClock::default());

        // Seeding emitted nothing, but the grants are live
        assert!(registry.event_sink().is_empty());
        assert_eq!(registry.list_authorized().await, vec![APPLE, SAMSUNG]);

        registry
            .register_device(SAMSUNG, watch("SN-SMG-001"))
            .await
            .expect("seeded manufacturer registers immediately");
        assert_eq!(
            registry.verify_device("SN-SMG-001").await.manufacturer_name,
            "Samsung Electronics"
        );
    }

    #[tokio::test]
    async fn test_display_name_survives_revoke_regrant_cycle() {
        let config = ServiceConfig {
            registry: RegistryConfig::for_testing().with_manufacturer(APPLE, "Apple Inc."),
            ..ServiceConfig::for_testing()
        };
        let registry =
            RegistryService::new(config, RecordingEventSink::new(), ManualClock::default());

        registry
            .revoke_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();
        // Batch re-grant carries no name of its own
        registry
            .authorize_manufacturers(ADMIN, vec![APPLE])
            .await
            .unwrap();

        registry
            .register_device(APPLE, watch("SN-APL-200"))
            .await
            .unwrap();
        let record = registry.device_details("SN-APL-200").await.unwrap();
        assert_eq!(record.manufacturer_name, "Apple Inc.");
        assert!(record.authentic);
    }
}
