//! Shared fixtures for Ferry's cross-crate tests.

use ferry_router::{NodeId, Router, RouterConfig, SocialConfig};

/// Social parameters under which one meeting saturates popularity and
/// pushes tie strength into the middle tier, so the crisp gates open on
/// the first encounter between well-provisioned nodes.
pub fn eager_social() -> SocialConfig {
    SocialConfig {
        popularity_alpha: 1.0,
        popularity_threshold: 1.0,
        max_frequency: 1.0,
        ..SocialConfig::default()
    }
}

/// Router over nodes `1..=n` at full energy and buffer.
pub fn router_with(n: u64, config: RouterConfig) -> Router {
    let config = config.with_total_nodes(n as usize);
    match Router::with_nodes(config, (1..=n).map(NodeId)) {
        Ok(router) => router,
        Err(e) => panic!("fixture router rejected: {e}"),
    }
}

/// Router whose crisp gates open on first contact.
pub fn eager_router(n: u64) -> Router {
    router_with(n, RouterConfig::default().with_social(eager_social()))
}

/// Bring `a` and `b` together for `secs` starting at `start`.
pub fn meet(router: &Router, a: u64, b: u64, start: f64, secs: f64) {
    if let Err(e) = router.connection_up(NodeId(a), NodeId(b), start) {
        panic!("connection_up {a} <-> {b}: {e}");
    }
    if let Err(e) = router.connection_down(NodeId(a), NodeId(b), start + secs) {
        panic!("connection_down {a} <-> {b}: {e}");
    }
}

/// Value of `destination` via `next_hop` in `owner`'s table.
pub fn value(router: &Router, owner: u64, destination: u64, next_hop: u64) -> f64 {
    match router.node(NodeId(owner)) {
        Ok(node) => node.lock().table.get(NodeId(destination), NodeId(next_hop)),
        Err(e) => panic!("{e}"),
    }
}
