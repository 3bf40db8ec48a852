use integration_settings::domain::models::{
    derive_status, CardMode, CardUiState, DerivedStatus, FeatureLockState, IntegrationCategory,
    IntegrationId, IntegrationState, IntegrationStatus,
};
use integration_settings::services::{
    filter_integrations, render_card, CategorySelection, IntegrationRegistry,
};
use proptest::prelude::*;

fn any_state() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("synced".to_string()),
        Just("delayed".to_string()),
        Just("pull_delayed".to_string()),
        Just("sync_pending".to_string()),
        Just("heavy_delayed".to_string()),
        Just("client_token_expired".to_string()),
        Just("limit_exceed".to_string()),
        Just(String::new()),
        "[a-z_]{0,16}",
    ]
}

fn any_integration() -> impl Strategy<Value = IntegrationId> {
    prop::sample::select(IntegrationId::ALL.to_vec())
}

fn any_selection() -> impl Strategy<Value = CategorySelection> {
    prop_oneof![
        Just(CategorySelection::All),
        prop::sample::select(IntegrationCategory::ALL.to_vec()).prop_map(CategorySelection::Only),
    ]
}

proptest! {
    /// Property: every state string maps to exactly one display status,
    /// and only `synced` means connected.
    #[test]
    fn prop_derive_status_is_total(raw in any_state()) {
        let state = IntegrationState::from(raw.as_str());
        let derived = derive_status(&state);
        prop_assert_eq!(derived == DerivedStatus::Connected, raw == "synced");
    }

    /// Property: a card is in exactly one mode, and the form is mounted
    /// unless the card is locked.
    #[test]
    fn prop_card_mode_exclusive(
        id in any_integration(),
        locked in any::<bool>(),
        connected in any::<bool>(),
        open in any::<bool>(),
        default_open in any::<bool>(),
        raw in any_state(),
    ) {
        let registry = IntegrationRegistry::builtin();
        let descriptor = registry.get(id).unwrap();
        let mut lock = FeatureLockState::ungated(descriptor.status_key(), connected);
        lock.is_feature_locked = locked;

        let view = render_card(
            descriptor,
            &lock,
            &IntegrationStatus::new(raw.as_str(), 0),
            CardUiState { open },
            default_open,
            "/pricing",
        );

        match view.mode {
            CardMode::Locked { .. } => {
                prop_assert!(locked && !connected);
                prop_assert!(view.mode.form().is_none());
            }
            CardMode::Expanded { .. } | CardMode::Collapsed { .. } => {
                prop_assert!(!(locked && !connected));
                prop_assert!(view.mode.form().is_some());
            }
        }
    }

    /// Property: a connected integration is never locked out, whatever the plan says.
    #[test]
    fn prop_grandfathered_never_locked(id in any_integration(), open in any::<bool>()) {
        let registry = IntegrationRegistry::builtin();
        let descriptor = registry.get(id).unwrap();
        let mut lock = FeatureLockState::ungated(descriptor.status_key(), true);
        lock.is_feature_locked = true;

        let view = render_card(
            descriptor,
            &lock,
            &IntegrationStatus::default(),
            CardUiState { open },
            false,
            "/pricing",
        );
        let is_locked = matches!(view.mode, CardMode::Locked { .. });
        prop_assert!(!is_locked);
    }

    /// Property: "all" with an empty query is the identity filter.
    #[test]
    fn prop_empty_filter_is_identity(whitespace in "[ \t]{0,3}") {
        let registry = IntegrationRegistry::builtin();
        let filtered = filter_integrations(registry.all(), CategorySelection::All, &whitespace);
        prop_assert_eq!(filtered.len(), registry.len());
    }

    /// Property: search ignores case and the selected category.
    #[test]
    fn prop_search_case_insensitive(id in any_integration(), selection in any_selection()) {
        let registry = IntegrationRegistry::builtin();
        let name = registry.get(id).unwrap().name;

        let lower = filter_integrations(registry.all(), selection, &name.to_lowercase());
        let upper = filter_integrations(registry.all(), selection, &name.to_uppercase());

        let lower_ids: Vec<_> = lower.iter().map(|d| d.id).collect();
        let upper_ids: Vec<_> = upper.iter().map(|d| d.id).collect();
        prop_assert!(lower_ids.contains(&id));
        prop_assert_eq!(lower_ids, upper_ids);
    }
}
