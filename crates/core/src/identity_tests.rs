// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[yare::parameterized(
    overseer       = { "overseer",               AgentIdentity::Overseer },
    coordinator    = { "coordinator",            AgentIdentity::Coordinator },
    trailing_slash = { "coordinator/",           AgentIdentity::Coordinator },
    observer       = { "grp/observer",           AgentIdentity::observer("grp") },
    merger         = { "grp/merger",             AgentIdentity::merger("grp") },
    crew           = { "grp/crew/max",           AgentIdentity::crew("grp", "max") },
    worker         = { "grp/workers/n1",         AgentIdentity::worker("grp", "n1") },
    raiders        = { "warband-x/raiders/foo",  AgentIdentity::worker("warband-x", "foo") },
    hyphen_group   = { "a-b-c/crew/d-e",         AgentIdentity::crew("a-b-c", "d-e") },
)]
fn parse_known_forms(address: &str, expected: AgentIdentity) {
    assert_eq!(AgentIdentity::parse(address).unwrap(), expected);
}

#[yare::parameterized(
    empty           = { "" },
    bare_group      = { "grp" },
    unknown_role    = { "grp/janitor" },
    missing_name    = { "grp/crew" },
    extra_segment   = { "grp/workers/n1/x" },
    singleton_group = { "grp/coordinator" },
)]
fn parse_unknown_forms(address: &str) {
    assert!(matches!(
        AgentIdentity::parse(address),
        Err(IdentityError::UnknownIdentity(_))
    ));
}

#[test]
fn parse_rejects_invalid_segment() {
    assert!(matches!(
        AgentIdentity::parse("my grp/observer"),
        Err(IdentityError::InvalidSegment { field: "group", .. })
    ));
    assert!(matches!(
        AgentIdentity::parse("grp/crew/"),
        Err(IdentityError::UnknownIdentity(_))
    ));
}

#[yare::parameterized(
    observer = { "grp/workers/observer" },
    merger   = { "grp/workers/merger" },
    crew     = { "grp/raiders/crew-bob" },
)]
fn parse_rejects_reserved_worker_names(address: &str) {
    assert!(matches!(
        AgentIdentity::parse(address),
        Err(IdentityError::ReservedName(_))
    ));
}

#[test]
fn raiders_synonym_formats_as_workers() {
    let id = AgentIdentity::parse("grp/raiders/n1").unwrap();
    assert_eq!(id.address(), "grp/workers/n1");
}

#[test]
fn role_accessors() {
    let worker = AgentIdentity::worker("grp", "n1");
    assert_eq!(worker.role(), Role::Worker);
    assert_eq!(worker.group(), Some("grp"));
    assert_eq!(worker.name(), Some("n1"));
    assert!(worker.role().is_named());
    assert!(worker.role().persists_clone());

    let coordinator = AgentIdentity::Coordinator;
    assert!(coordinator.role().is_singleton());
    assert_eq!(coordinator.group(), None);
    assert_eq!(coordinator.group_observer(), None);

    assert_eq!(
        worker.group_observer(),
        Some(AgentIdentity::observer("grp"))
    );
    assert!(!AgentIdentity::observer("grp").role().persists_clone());
}

#[test]
fn author_name_prefers_agent_name() {
    assert_eq!(AgentIdentity::crew("grp", "max").author_name(), "max");
    assert_eq!(AgentIdentity::merger("grp").author_name(), "grp/merger");
}

#[test]
fn display_and_from_str_agree() {
    let id: AgentIdentity = "grp/crew/max".parse().unwrap();
    assert_eq!(id.to_string(), "grp/crew/max");
}

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_-]{0,12}"
}

fn identity_strategy() -> impl Strategy<Value = AgentIdentity> {
    prop_oneof![
        Just(AgentIdentity::Overseer),
        Just(AgentIdentity::Coordinator),
        segment_strategy().prop_map(AgentIdentity::observer),
        segment_strategy().prop_map(AgentIdentity::merger),
        (segment_strategy(), segment_strategy()).prop_map(|(g, n)| AgentIdentity::crew(g, n)),
        (segment_strategy(), segment_strategy())
            .prop_filter("reserved worker name", |(_, n)| {
                !RESERVED_WORKER_NAMES.contains(&n.as_str()) && !n.starts_with("crew-")
            })
            .prop_map(|(g, n)| AgentIdentity::worker(g, n)),
    ]
}

proptest! {
    #[test]
    fn address_round_trip(id in identity_strategy()) {
        let parsed = AgentIdentity::parse(&id.address()).unwrap();
        prop_assert_eq!(parsed, id);
    }
}
