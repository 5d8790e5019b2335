use std::collections::HashSet;

use super::common::{agent, agent_id};
use crate::workflows::scheduling::pool::AgentPool;
use crate::workflows::scheduling::service::SchedulingError;

fn three_agent_pool() -> AgentPool {
    let mut pool = AgentPool::new();
    pool.register(agent("ana"));
    pool.register(agent("bruno"));
    pool.register(agent("carla"));
    pool
}

#[test]
fn available_preserves_registration_order() {
    let pool = three_agent_pool();
    let mut busy = HashSet::new();
    busy.insert(agent_id("bruno"));

    let available = pool.available(&busy);
    assert_eq!(available, vec![agent_id("ana"), agent_id("carla")]);
}

#[test]
fn least_loaded_picks_minimal_pending_count() {
    let mut pool = three_agent_pool();
    pool.increment(&agent_id("ana")).expect("known agent");
    pool.increment(&agent_id("ana")).expect("known agent");
    pool.increment(&agent_id("bruno")).expect("known agent");

    let candidates = pool.available(&HashSet::new());
    assert_eq!(pool.least_loaded(&candidates), Some(agent_id("carla")));
}

#[test]
fn least_loaded_breaks_ties_by_registration_order() {
    let pool = three_agent_pool();
    let candidates = pool.available(&HashSet::new());
    // All counts are zero; the first registered agent wins.
    assert_eq!(pool.least_loaded(&candidates), Some(agent_id("ana")));
}

#[test]
fn increment_rejects_unknown_agents() {
    let mut pool = three_agent_pool();
    match pool.increment(&agent_id("nadie")) {
        Err(SchedulingError::AgentNotFound(id)) => assert_eq!(id, "nadie"),
        other => panic!("expected agent not found, got {other:?}"),
    }
}

#[test]
fn decrement_saturates_at_zero() {
    let mut pool = three_agent_pool();
    pool.decrement(&agent_id("ana")).expect("known agent");
    assert_eq!(pool.pending_count(&agent_id("ana")), Some(0));
}

#[test]
fn reregistering_keeps_the_live_count() {
    let mut pool = three_agent_pool();
    pool.increment(&agent_id("ana")).expect("known agent");
    pool.register(agent("ana"));
    assert_eq!(pool.pending_count(&agent_id("ana")), Some(1));
}
