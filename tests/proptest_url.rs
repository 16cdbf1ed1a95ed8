//! Property-based tests using proptest
//!
//! These tests check the resource URL parser against randomly generated
//! self-links, both well-formed and malformed.

use gce_cloud::{parse_resource_url, Error, Key, ResourceId};
use proptest::prelude::*;

/// A Compute-style name segment
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,30}"
}

/// Known host prefixes, or none at all
fn arb_prefix() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("https://www.googleapis.com/compute/v1/"),
        Just("https://www.googleapis.com/compute/alpha/"),
        Just("https://www.googleapis.com/compute/beta/"),
    ]
}

/// A valid path together with the id it encodes
fn arb_resource() -> impl Strategy<Value = (String, ResourceId)> {
    (arb_name(), arb_name(), arb_name(), arb_name(), 0..6usize).prop_map(
        |(project, location, resource, name, shape)| match shape {
            0 => (
                format!("projects/{project}"),
                ResourceId::new(project, "projects", None),
            ),
            1 => (
                format!("projects/{project}/regions/{name}"),
                ResourceId::new(project, "regions", Some(Key::global(name))),
            ),
            2 => (
                format!("projects/{project}/zones/{name}"),
                ResourceId::new(project, "zones", Some(Key::global(name))),
            ),
            3 => (
                format!("projects/{project}/global/{resource}/{name}"),
                ResourceId::new(project, resource, Some(Key::global(name))),
            ),
            4 => (
                format!("projects/{project}/regions/{location}/{resource}/{name}"),
                ResourceId::new(project, resource, Some(Key::regional(name, location))),
            ),
            _ => (
                format!("projects/{project}/zones/{location}/{resource}/{name}"),
                ResourceId::new(project, resource, Some(Key::zonal(name, location))),
            ),
        },
    )
}

proptest! {
    /// Valid paths decode to exactly the encoded triple, with or without a prefix
    #[test]
    fn test_valid_paths_round_trip((path, expected) in arb_resource(), prefix in arb_prefix()) {
        let parsed = parse_resource_url(&format!("{prefix}{path}")).unwrap();
        prop_assert_eq!(&parsed, &expected);
        prop_assert_eq!(parse_resource_url(&path).unwrap(), parsed);
    }

    /// Any extra trailing segment makes a multi-segment path invalid
    #[test]
    fn test_trailing_segment_is_rejected(
        (path, expected) in arb_resource(),
        extra in arb_name(),
    ) {
        prop_assume!(expected.key.is_some());
        let url = format!("{path}/{extra}");
        let err = parse_resource_url(&url).unwrap_err();
        prop_assert!(matches!(err, Error::InvalidFormat(ref s) if *s == url));
    }

    /// Unknown API version tokens are not stripped as prefixes
    #[test]
    fn test_unknown_version_prefix_is_rejected(
        (path, _) in arb_resource(),
        version in "v[2-9]|gamma|staging|v1beta1",
    ) {
        let url = format!("https://www.googleapis.com/compute/{version}/{path}");
        prop_assert!(matches!(parse_resource_url(&url), Err(Error::InvalidFormat(_))));
    }

    /// A wrong literal at the locality position is rejected
    #[test]
    fn test_wrong_locality_literal_is_rejected(
        project in arb_name(),
        scope in "[a-z]{1,10}",
        rest in arb_name(),
    ) {
        prop_assume!(scope != "global" && scope != "regions" && scope != "zones");
        let url = format!("projects/{project}/{scope}/{rest}/{rest}");
        prop_assert!(parse_resource_url(&url).is_err());
    }
}
