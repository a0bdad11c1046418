//! In-memory actor host for headless runs.

use std::{cell::RefCell, rc::Rc};

use spawn_director_core::{
    ActorController, ActorHost, Archetype, ObserverId, PatrolRoute, Pose, PrototypeRef,
};

/// State of a single simulated actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorRecord {
    /// Sequential identifier assigned at instantiation.
    pub id: u64,
    /// Archetype the actor was created as.
    pub archetype: Archetype,
    /// Prototype the actor was created from.
    pub prototype: PrototypeRef,
    /// Pose at instantiation.
    pub pose: Pose,
    /// Route received from the director.
    pub route: Option<PatrolRoute>,
    /// Observer the actor tracks.
    pub observer: Option<ObserverId>,
    /// Ticks survived so far.
    pub age: u64,
}

/// Controller handle returned to the director.
#[derive(Debug)]
pub struct SimulatedActor {
    record: Rc<RefCell<ActorRecord>>,
}

impl ActorController for SimulatedActor {
    fn set_route(&mut self, route: PatrolRoute) {
        self.record.borrow_mut().route = Some(route);
    }

    fn set_observer(&mut self, observer: ObserverId) {
        self.record.borrow_mut().observer = Some(observer);
    }
}

/// Actor host that keeps actors in memory and optionally retires them.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    live: Vec<Rc<RefCell<ActorRecord>>>,
    lifetime: Option<u64>,
    spawned: [u64; Archetype::ALL.len()],
    retired: u64,
}

impl SimulatedHost {
    /// Creates a host whose actors never die.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host that retires actors after `ticks` calls to [`SimulatedHost::advance`].
    #[must_use]
    pub fn with_lifetime(ticks: u64) -> Self {
        Self {
            lifetime: Some(ticks),
            ..Self::default()
        }
    }

    /// Ages every live actor by one tick and removes expired ones.
    ///
    /// Returns the number of actors retired by this call.
    pub fn advance(&mut self) -> usize {
        for actor in &self.live {
            actor.borrow_mut().age += 1;
        }
        let Some(lifetime) = self.lifetime else {
            return 0;
        };

        let before = self.live.len();
        self.live.retain(|actor| actor.borrow().age < lifetime);
        let retired = before - self.live.len();
        self.retired += retired as u64;
        retired
    }

    /// Snapshot of every live actor in spawn order.
    #[must_use]
    pub fn actors(&self) -> Vec<ActorRecord> {
        self.live.iter().map(|actor| actor.borrow().clone()).collect()
    }

    /// Number of actors of `archetype` instantiated since creation.
    #[must_use]
    pub fn spawned(&self, archetype: Archetype) -> u64 {
        self.spawned[archetype.index()]
    }

    /// Number of actors retired since creation.
    #[must_use]
    pub fn retired(&self) -> u64 {
        self.retired
    }
}

impl ActorHost for SimulatedHost {
    type Actor = SimulatedActor;

    fn count_by_archetype(&self, archetype: Archetype) -> u32 {
        let count = self
            .live
            .iter()
            .filter(|actor| actor.borrow().archetype == archetype)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn instantiate(
        &mut self,
        archetype: Archetype,
        prototype: &PrototypeRef,
        pose: Pose,
    ) -> Self::Actor {
        let id = self.spawned.iter().sum();
        self.spawned[archetype.index()] += 1;
        let record = Rc::new(RefCell::new(ActorRecord {
            id,
            archetype,
            prototype: prototype.clone(),
            pose,
            route: None,
            observer: None,
            age: 0,
        }));
        self.live.push(Rc::clone(&record));
        SimulatedActor { record }
    }
}
