//! In-memory adapter for tests
//!
//! A [`MockAdapter`] keeps objects in a [`MockStore`] guarded by one mutex.
//! Callers can seed objects, inject per-key errors, or install hooks that
//! see each call before the store does.

use super::api::{GlobalResource, MutableResource, RegionalResource, Resource, ZonalResource};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::meta::{Global, Key, Mutability, Mutable, Regional, Scope, Zonal};
use crate::resource::ServiceInfo;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of a hook
pub enum Intercept<T> {
    /// The hook answered the call; default logic is skipped
    Handled(Result<T>),
    /// Fall through to the store
    Continue,
}

pub type GetHook<L, M = Mutable> =
    Arc<dyn Fn(&MockAdapter<L, M>, &Context, &Key) -> Intercept<Value> + Send + Sync>;
/// Receives the requested region or zone (`None` for global types)
pub type ListHook<L, M = Mutable> =
    Arc<dyn Fn(&MockAdapter<L, M>, &Context, Option<&str>) -> Intercept<Vec<Value>> + Send + Sync>;
pub type InsertHook<L> =
    Arc<dyn Fn(&MockAdapter<L, Mutable>, &Context, &Key, &Value) -> Intercept<()> + Send + Sync>;
pub type DeleteHook<L> =
    Arc<dyn Fn(&MockAdapter<L, Mutable>, &Context, &Key) -> Intercept<()> + Send + Sync>;
/// Custom verbs have no default behaviour, so their hooks always answer
pub type MethodHook<L, M = Mutable> =
    Arc<dyn Fn(&MockAdapter<L, M>, &Context, &Key, Option<&Value>) -> Result<Value> + Send + Sync>;

/// Objects and injected errors of one mock
#[derive(Debug, Default)]
pub struct MockStore {
    pub objects: BTreeMap<Key, Value>,
    pub get_error: HashMap<Key, Error>,
    pub list_error: Option<Error>,
    pub insert_error: HashMap<Key, Error>,
    pub delete_error: HashMap<Key, Error>,
}

/// Insert and delete hooks only ever fire on mutable mocks
pub struct MockHooks<L, M = Mutable> {
    pub get: Option<GetHook<L, M>>,
    pub list: Option<ListHook<L, M>>,
    pub insert: Option<InsertHook<L>>,
    pub delete: Option<DeleteHook<L>>,
    /// Keyed by verb name, e.g. `SetTarget`
    pub methods: HashMap<String, MethodHook<L, M>>,
}

impl<L, M> Default for MockHooks<L, M> {
    fn default() -> Self {
        Self {
            get: None,
            list: None,
            insert: None,
            delete: None,
            methods: HashMap::new(),
        }
    }
}

pub struct MockAdapter<L, M = Mutable> {
    info: ServiceInfo,
    store: Mutex<MockStore>,
    hooks: Mutex<MockHooks<L, M>>,
    _scope: PhantomData<fn() -> (L, M)>,
}

impl<L: Scope, M: Mutability> MockAdapter<L, M> {
    pub fn new(info: ServiceInfo) -> Result<Self> {
        info.check_shape(L::LOCALITY, M::MUTABLE)?;
        Ok(Self {
            info,
            store: Mutex::new(MockStore::default()),
            hooks: Mutex::new(MockHooks::default()),
            _scope: PhantomData,
        })
    }

    /// Lock the store. A panic in another holder does not make it unusable.
    pub fn store(&self) -> MutexGuard<'_, MockStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn hooks(&self) -> MutexGuard<'_, MockHooks<L, M>> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_get<F>(&self, hook: F)
    where
        F: Fn(&MockAdapter<L, M>, &Context, &Key) -> Intercept<Value> + Send + Sync + 'static,
    {
        self.hooks().get = Some(Arc::new(hook));
    }

    pub fn on_list<F>(&self, hook: F)
    where
        F: Fn(&MockAdapter<L, M>, &Context, Option<&str>) -> Intercept<Vec<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.hooks().list = Some(Arc::new(hook));
    }

    pub fn on_method<F>(&self, method: impl Into<String>, hook: F)
    where
        F: Fn(&MockAdapter<L, M>, &Context, &Key, Option<&Value>) -> Result<Value>
            + Send
            + Sync
            + 'static,
    {
        self.hooks().methods.insert(method.into(), Arc::new(hook));
    }

    fn list_in(&self, ctx: &Context, location: Option<&str>) -> Result<Vec<Value>> {
        let hook = self.hooks().list.clone();
        if let Some(hook) = hook {
            if let Intercept::Handled(res) = hook(self, ctx, location) {
                return res;
            }
        }
        ctx.check()?;

        let store = self.store();
        if let Some(err) = &store.list_error {
            return Err(err.clone());
        }
        let items: Vec<Value> = store
            .objects
            .iter()
            .filter(|(key, _)| location.is_none() || key.location() == location)
            .map(|(_, obj)| obj.clone())
            .collect();
        tracing::debug!("Mock{}.List({:?}) = {} items", self.info.name, location, items.len());
        Ok(items)
    }
}

impl<L: Scope> MockAdapter<L, Mutable> {
    pub fn on_insert<F>(&self, hook: F)
    where
        F: Fn(&MockAdapter<L, Mutable>, &Context, &Key, &Value) -> Intercept<()>
            + Send
            + Sync
            + 'static,
    {
        self.hooks().insert = Some(Arc::new(hook));
    }

    pub fn on_delete<F>(&self, hook: F)
    where
        F: Fn(&MockAdapter<L, Mutable>, &Context, &Key) -> Intercept<()> + Send + Sync + 'static,
    {
        self.hooks().delete = Some(Arc::new(hook));
    }
}

#[async_trait]
impl<L: Scope, M: Mutability> Resource for MockAdapter<L, M> {
    fn info(&self) -> &ServiceInfo {
        &self.info
    }

    async fn get(&self, ctx: &Context, key: &Key) -> Result<Value> {
        let hook = self.hooks().get.clone();
        if let Some(hook) = hook {
            if let Intercept::Handled(res) = hook(self, ctx, key) {
                return res;
            }
        }
        ctx.check()?;

        let store = self.store();
        if let Some(err) = store.get_error.get(key) {
            return Err(err.clone());
        }
        match store.objects.get(key) {
            Some(obj) => Ok(obj.clone()),
            None => Err(Error::not_found(format!(
                "Mock{} {} not found",
                self.info.name, key
            ))),
        }
    }

    async fn invoke(
        &self,
        ctx: &Context,
        key: &Key,
        method: &str,
        args: Option<Value>,
    ) -> Result<Value> {
        self.info.method(method)?;
        let hook = self.hooks().methods.get(method).cloned();
        match hook {
            Some(hook) => hook(self, ctx, key, args.as_ref()),
            None => Err(Error::NotImplemented(format!(
                "Mock{}.{}Hook must be set",
                self.info.name, method
            ))),
        }
    }
}

#[async_trait]
impl<L: Scope> MutableResource for MockAdapter<L, Mutable> {
    async fn insert(&self, ctx: &Context, key: &Key, obj: Value) -> Result<()> {
        let hook = self.hooks().insert.clone();
        if let Some(hook) = hook {
            if let Intercept::Handled(res) = hook(self, ctx, key, &obj) {
                return res;
            }
        }
        ctx.check()?;

        let mut store = self.store();
        if let Some(err) = store.insert_error.get(key) {
            return Err(err.clone());
        }
        if store.objects.contains_key(key) {
            return Err(Error::already_exists(format!(
                "Mock{} {} exists",
                self.info.name, key
            )));
        }
        store.objects.insert(key.clone(), obj);
        tracing::debug!("Mock{}.Insert({}) stored", self.info.name, key);
        Ok(())
    }

    async fn delete(&self, ctx: &Context, key: &Key) -> Result<()> {
        let hook = self.hooks().delete.clone();
        if let Some(hook) = hook {
            if let Intercept::Handled(res) = hook(self, ctx, key) {
                return res;
            }
        }
        ctx.check()?;

        let mut store = self.store();
        if let Some(err) = store.delete_error.get(key) {
            return Err(err.clone());
        }
        match store.objects.remove(key) {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!(
                "Mock{} {} not found",
                self.info.name, key
            ))),
        }
    }
}

#[async_trait]
impl<M: Mutability> GlobalResource for MockAdapter<Global, M> {
    async fn list(&self, ctx: &Context) -> Result<Vec<Value>> {
        self.list_in(ctx, None)
    }
}

#[async_trait]
impl<M: Mutability> RegionalResource for MockAdapter<Regional, M> {
    async fn list(&self, ctx: &Context, region: &str) -> Result<Vec<Value>> {
        self.list_in(ctx, Some(region))
    }
}

#[async_trait]
impl<M: Mutability> ZonalResource for MockAdapter<Zonal, M> {
    async fn list(&self, ctx: &Context, zone: &str) -> Result<Vec<Value>> {
        self.list_in(ctx, Some(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::ReadOnly;
    use crate::resource::Registry;
    use serde_json::json;

    fn mock<L: Scope, M: Mutability>(service: &str) -> MockAdapter<L, M> {
        let info = Registry::builtin().unwrap().service(service).unwrap().clone();
        MockAdapter::new(info).unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_get_returns_object_unchanged() {
        let firewalls: MockAdapter<Global> = mock("Firewalls");
        let ctx = Context::background();
        let key = Key::global("fw");
        let obj = json!({"name": "other", "priority": 1000});

        firewalls.insert(&ctx, &key, obj.clone()).await.unwrap();
        assert_eq!(firewalls.get(&ctx, &key).await.unwrap(), obj);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let firewalls: MockAdapter<Global> = mock("Firewalls");
        let ctx = Context::background();
        let key = Key::global("fw");

        firewalls.insert(&ctx, &key, json!({"name": "fw"})).await.unwrap();
        firewalls.delete(&ctx, &key).await.unwrap();

        let err = firewalls.get(&ctx, &key).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "googleapi: Error 404: MockFirewalls Key{\"fw\"} not found"
        );
        assert!(firewalls.delete(&ctx, &key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_double_insert_conflicts_and_keeps_first() {
        let disks: MockAdapter<Zonal> = mock("Disks");
        let ctx = Context::background();
        let key = Key::zonal("d1", "z1");

        disks.insert(&ctx, &key, json!({"sizeGb": "10"})).await.unwrap();
        let err = disks.insert(&ctx, &key, json!({"sizeGb": "20"})).await.unwrap_err();

        assert!(err.is_already_exists());
        assert_eq!(err.code(), Some(409));
        assert_eq!(disks.store().objects.len(), 1);
        assert_eq!(disks.store().objects[&key]["sizeGb"], "10");
    }

    #[tokio::test]
    async fn test_list_filters_by_location() {
        let addresses: MockAdapter<Regional> = mock("Addresses");
        {
            let mut store = addresses.store();
            store.objects.insert(Key::regional("a", "r1"), json!({"name": "a"}));
            store.objects.insert(Key::regional("b", "r1"), json!({"name": "b"}));
            store.objects.insert(Key::regional("c", "r2"), json!({"name": "c"}));
        }
        let ctx = Context::background();

        let r1 = addresses.list(&ctx, "r1").await.unwrap();
        let names: Vec<_> = r1.iter().map(|o| o["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(addresses.list(&ctx, "r3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zonal_list_filters_by_zone() {
        let instances: MockAdapter<Zonal> = mock("Instances");
        let ctx = Context::background();
        instances.insert(&ctx, &Key::zonal("vm-1", "z1"), json!({"name": "vm-1"})).await.unwrap();
        instances.insert(&ctx, &Key::zonal("vm-2", "z2"), json!({"name": "vm-2"})).await.unwrap();
        instances.insert(&ctx, &Key::zonal("vm-3", "z1"), json!({"name": "vm-3"})).await.unwrap();

        let z1 = instances.list(&ctx, "z1").await.unwrap();
        let names: Vec<_> = z1.iter().map(|o| o["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["vm-1", "vm-3"]);
        assert_eq!(instances.list(&ctx, "z2").await.unwrap(), vec![json!({"name": "vm-2"})]);
        assert!(instances.list(&ctx, "z3").await.unwrap().is_empty());
    }

    #[test]
    fn test_mutability_mismatch_is_rejected() {
        let registry = Registry::builtin().unwrap();
        let zones = registry.service("Zones").unwrap().clone();
        assert!(matches!(
            MockAdapter::<Global, Mutable>::new(zones),
            Err(Error::Registry(_))
        ));
        let firewalls = registry.service("Firewalls").unwrap().clone();
        assert!(matches!(
            MockAdapter::<Global, ReadOnly>::new(firewalls),
            Err(Error::Registry(_))
        ));
    }

    #[tokio::test]
    async fn test_read_only_mock_serves_seeded_objects() {
        let zones: MockAdapter<Global, ReadOnly> = mock("Zones");
        zones.store().objects.insert(Key::global("z1"), json!({"name": "z1"}));
        let ctx = Context::background();

        assert_eq!(zones.get(&ctx, &Key::global("z1")).await.unwrap()["name"], "z1");
        assert_eq!(zones.list(&ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_global_list_returns_everything() {
        let firewalls: MockAdapter<Global> = mock("Firewalls");
        let ctx = Context::background();
        for name in ["a", "b", "c"] {
            firewalls.insert(&ctx, &Key::global(name), json!({"name": name})).await.unwrap();
        }
        assert_eq!(firewalls.list(&ctx).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_injected_errors_win_over_store_state() {
        let firewalls: MockAdapter<Global> = mock("Firewalls");
        let ctx = Context::background();
        let present = Key::global("present");
        let absent = Key::global("absent");
        firewalls.store().objects.insert(present.clone(), json!({"name": "present"}));

        {
            let mut store = firewalls.store();
            store.get_error.insert(present.clone(), Error::Api { code: 500, message: "get".into() });
            store.insert_error.insert(absent.clone(), Error::Api { code: 403, message: "insert".into() });
            store.delete_error.insert(present.clone(), Error::Api { code: 412, message: "delete".into() });
            store.list_error = Some(Error::Api { code: 503, message: "list".into() });
        }

        assert_eq!(firewalls.get(&ctx, &present).await.unwrap_err().code(), Some(500));
        assert_eq!(
            firewalls.insert(&ctx, &absent, json!({})).await.unwrap_err().code(),
            Some(403)
        );
        assert_eq!(firewalls.delete(&ctx, &present).await.unwrap_err().code(), Some(412));
        assert_eq!(firewalls.list(&ctx).await.unwrap_err().code(), Some(503));

        let store = firewalls.store();
        assert!(store.objects.contains_key(&present));
        assert!(!store.objects.contains_key(&absent));
    }

    #[tokio::test]
    async fn test_handled_hook_skips_default_logic() {
        let firewalls: MockAdapter<Global> = mock("Firewalls");
        let ctx = Context::background();
        firewalls.on_get(|_, _, key| Intercept::Handled(Ok(json!({"name": key.name(), "fake": true}))));
        firewalls.on_insert(|_, _, _, _| Intercept::Handled(Ok(())));

        let obj = firewalls.get(&ctx, &Key::global("missing")).await.unwrap();
        assert_eq!(obj["fake"], true);

        firewalls.insert(&ctx, &Key::global("fw"), json!({})).await.unwrap();
        assert!(firewalls.store().objects.is_empty());
    }

    #[tokio::test]
    async fn test_continue_hook_falls_through() {
        let firewalls: MockAdapter<Global> = mock("Firewalls");
        let ctx = Context::background();
        firewalls.on_delete(|m, _, key| {
            // Hooks run outside the store lock and may inspect it.
            assert!(m.store().objects.contains_key(key));
            Intercept::Continue
        });

        firewalls.insert(&ctx, &Key::global("fw"), json!({})).await.unwrap();
        firewalls.delete(&ctx, &Key::global("fw")).await.unwrap();
        assert!(firewalls.store().objects.is_empty());
    }

    #[tokio::test]
    async fn test_list_hook_sees_location() {
        let instances: MockAdapter<Zonal> = mock("Instances");
        instances.on_list(|_, _, zone| {
            Intercept::Handled(Ok(vec![json!({"zone": zone.unwrap_or_default()})]))
        });
        let items = instances.list(&Context::background(), "z9").await.unwrap();
        assert_eq!(items, vec![json!({"zone": "z9"})]);
    }

    #[tokio::test]
    async fn test_custom_verb_requires_hook() {
        let rules: MockAdapter<Regional> = mock("ForwardingRules");
        let ctx = Context::background();
        let key = Key::regional("fr", "r");

        let err = rules.invoke(&ctx, &key, "SetTarget", None).await.unwrap_err();
        assert!(matches!(err, Error::NotImplemented(ref m) if m == "MockForwardingRules.SetTargetHook must be set"));

        rules.on_method("SetTarget", |m, _, key, args| {
            let target = args.and_then(|a| a.get("target")).cloned().unwrap_or_default();
            let mut store = m.store();
            let obj = store
                .objects
                .get_mut(key)
                .ok_or_else(|| Error::not_found(key.to_string()))?;
            obj["target"] = target;
            Ok(Value::Null)
        });
        rules.store().objects.insert(key.clone(), json!({"name": "fr"}));
        rules
            .invoke(&ctx, &key, "SetTarget", Some(json!({"target": "tp-1"})))
            .await
            .unwrap();
        assert_eq!(rules.store().objects[&key]["target"], "tp-1");

        let err = rules.invoke(&ctx, &key, "Frobnicate", None).await.unwrap_err();
        assert!(matches!(err, Error::UnknownMethod { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts() {
        let firewalls: Arc<MockAdapter<Global>> = Arc::new(mock("Firewalls"));

        let mut tasks = Vec::new();
        for i in 0..32 {
            let firewalls = firewalls.clone();
            tasks.push(tokio::spawn(async move {
                let ctx = Context::background();
                let distinct = firewalls
                    .insert(&ctx, &Key::global(format!("fw-{i}")), json!({"i": i}))
                    .await;
                let shared = firewalls.insert(&ctx, &Key::global("shared"), json!({"i": i})).await;
                (distinct, shared)
            }));
        }

        let mut shared_ok = 0;
        for task in tasks {
            let (distinct, shared) = task.await.unwrap();
            assert!(distinct.is_ok());
            match shared {
                Ok(()) => shared_ok += 1,
                Err(e) => assert!(e.is_already_exists()),
            }
        }
        assert_eq!(shared_ok, 1);
        assert_eq!(firewalls.store().objects.len(), 33);
    }
}
