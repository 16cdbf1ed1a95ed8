//! Cloud facade
//!
//! [`Cloud`] hands out one adapter per Compute Engine resource type.
//! [`GceCloud`] talks to the API; [`MockCloud`] keeps everything in memory
//! and exposes its adapters as public fields so tests can seed them.
//!
//! # Module Structure
//!
//! - [`api`] - Capability traits implemented by both adapter kinds
//! - [`adapter`] - Real adapter
//! - [`mock`] - In-memory adapter with error injection and hooks
//! - [`op`] - Operation handle and completion waiter
//! - [`ratelimit`] / [`project`] - Pluggable call policies
//! - [`service`] - Transports and policies shared by real adapters

pub mod adapter;
pub mod api;
pub mod mock;
pub mod op;
pub mod project;
pub mod ratelimit;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::GceAdapter;
pub use api::{
    GlobalResource, MutableGlobal, MutableRegional, MutableResource, MutableZonal,
    RegionalResource, Resource, ZonalResource,
};
pub use mock::{Intercept, MockAdapter, MockHooks, MockStore};
pub use op::{Operation, OperationStatus};
pub use project::{ProjectRouter, SingleProjectRouter};
pub use ratelimit::{NopRateLimiter, QpsRateLimiter, RateLimitKey, RateLimiter};
pub use service::Service;

use crate::error::Result;
use crate::meta::{Global, Mutable, ReadOnly, Regional, Zonal};
use crate::resource::Registry;
use std::sync::Arc;

macro_rules! cloud_services {
    ($( $accessor:ident => $service:literal, $scope:ident, $access:ident, $iface:ident; )*) => {
        pub trait Cloud: Send + Sync {
            $( fn $accessor(&self) -> &dyn $iface; )*
        }

        pub struct GceCloud {
            $( $accessor: GceAdapter<$scope, $access>, )*
        }

        impl GceCloud {
            pub fn new(registry: &Registry, service: Arc<Service>) -> Result<Self> {
                Ok(Self {
                    $(
                        $accessor: GceAdapter::new(
                            registry.service($service)?.clone(),
                            service.clone(),
                        )?,
                    )*
                })
            }
        }

        impl Cloud for GceCloud {
            $( fn $accessor(&self) -> &dyn $iface { &self.$accessor } )*
        }

        pub struct MockCloud {
            $( pub $accessor: MockAdapter<$scope, $access>, )*
        }

        impl MockCloud {
            pub fn new(registry: &Registry) -> Result<Self> {
                Ok(Self {
                    $( $accessor: MockAdapter::new(registry.service($service)?.clone())?, )*
                })
            }
        }

        impl Cloud for MockCloud {
            $( fn $accessor(&self) -> &dyn $iface { &self.$accessor } )*
        }
    };
}

cloud_services! {
    addresses => "Addresses", Regional, Mutable, MutableRegional;
    alpha_addresses => "AlphaAddresses", Regional, Mutable, MutableRegional;
    beta_addresses => "BetaAddresses", Regional, Mutable, MutableRegional;
    global_addresses => "GlobalAddresses", Global, Mutable, MutableGlobal;
    backend_services => "BackendServices", Global, Mutable, MutableGlobal;
    region_backend_services => "RegionBackendServices", Regional, Mutable, MutableRegional;
    disks => "Disks", Zonal, Mutable, MutableZonal;
    firewalls => "Firewalls", Global, Mutable, MutableGlobal;
    forwarding_rules => "ForwardingRules", Regional, Mutable, MutableRegional;
    global_forwarding_rules => "GlobalForwardingRules", Global, Mutable, MutableGlobal;
    health_checks => "HealthChecks", Global, Mutable, MutableGlobal;
    http_health_checks => "HttpHealthChecks", Global, Mutable, MutableGlobal;
    instance_groups => "InstanceGroups", Zonal, Mutable, MutableZonal;
    instances => "Instances", Zonal, Mutable, MutableZonal;
    alpha_network_endpoint_groups => "AlphaNetworkEndpointGroups", Zonal, Mutable, MutableZonal;
    regions => "Regions", Global, ReadOnly, GlobalResource;
    ssl_certificates => "SslCertificates", Global, Mutable, MutableGlobal;
    target_pools => "TargetPools", Regional, Mutable, MutableRegional;
    url_maps => "UrlMaps", Global, Mutable, MutableGlobal;
    zones => "Zones", Global, ReadOnly, GlobalResource;
}
