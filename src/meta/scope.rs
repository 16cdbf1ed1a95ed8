//! Locality markers
//!
//! Adapters are generic over one of these zero-sized types so that the
//! shape of `list` (no argument, region, or zone) is fixed at compile time.
//! A second marker decides whether insert and delete exist at all.

use super::Locality;

pub trait Scope: Send + Sync + 'static {
    const LOCALITY: Locality;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

#[derive(Debug, Clone, Copy, Default)]
pub struct Regional;

#[derive(Debug, Clone, Copy, Default)]
pub struct Zonal;

impl Scope for Global {
    const LOCALITY: Locality = Locality::Global;
}

impl Scope for Regional {
    const LOCALITY: Locality = Locality::Regional;
}

impl Scope for Zonal {
    const LOCALITY: Locality = Locality::Zonal;
}

/// Whether an adapter exposes insert and delete
pub trait Mutability: Send + Sync + 'static {
    const MUTABLE: bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mutable;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl Mutability for Mutable {
    const MUTABLE: bool = true;
}

impl Mutability for ReadOnly {
    const MUTABLE: bool = false;
}
