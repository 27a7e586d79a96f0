//! The `Flow` emitter.

use log::{debug, info};
use rustc_hash::FxHashMap;

use scn_core::{EdgeId, EntityId, LaneId, RouteId, SimRng, VClass, VTypeId};
use scn_engine::{
    ArrivalSpeed, DepartPos, DepartSpeed, EngineError, PersonSpec, TrafficEngine, VehicleSpec,
    WalkStage, random_depart_pos, rightmost_allowed_lane,
};

use crate::{
    Emission, FlowConfig, FlowError, FlowResult, MixSampler, NoopSpawnObserver, PedestrianDepart,
    RemovalPolicy, SpawnObserver, per_tick_probability,
};

/// Slack on the headway comparison so that `n * dt` landing a rounding
/// error short of the headway still counts as due.
const HEADWAY_TOLERANCE: f64 = 1e-9;

/// Route of one type through the flow's path, resolved at construction.
#[derive(Debug, Clone)]
struct TypeRoute {
    edges:       Vec<EdgeId>,
    /// Rightmost lane admitting the type's class on each edge.
    lanes:       Vec<LaneId>,
    lengths:     Vec<f64>,
    /// Index of `lanes[0]` among the first edge's lanes.
    depart_lane: u32,
}

/// Emits vehicles or pedestrians along one path.
///
/// A flow is either all-vehicle or all-pedestrian; which one is decided
/// from its mix at construction.
pub struct Flow {
    name:       String,
    route:      RouteId,
    pedestrian: bool,

    emission:  Emission,
    sampler:   MixSampler,
    routes:    FxHashMap<VTypeId, TypeRoute>,
    max_count: Option<u64>,
    enabled:   bool,
    removal:   RemovalPolicy,

    depart_speed:      DepartSpeed,
    depart_pos:        DepartPos,
    arrival_speed:     ArrivalSpeed,
    pedestrian_depart: PedestrianDepart,

    count:      u64,
    /// Ticks since the last emission; `None` until the first one, so a
    /// headway flow emits on its first eligible tick.
    since_last: Option<u64>,
    created:    Vec<EntityId>,
    rng:        SimRng,
    observer:   Box<dyn SpawnObserver>,
}

impl Flow {
    /// Validate `config`, register the flow's route with `engine` and
    /// resolve per-type routes and lanes.
    pub fn new<E>(config: FlowConfig, engine: &mut E, rng: SimRng) -> FlowResult<Self>
    where
        E: TrafficEngine + ?Sized,
    {
        Self::with_observer(config, engine, rng, Box::new(NoopSpawnObserver))
    }

    /// As [`new`](Self::new), with a hook called after every emission.
    pub fn with_observer<E>(
        config:   FlowConfig,
        engine:   &mut E,
        rng:      SimRng,
        observer: Box<dyn SpawnObserver>,
    ) -> FlowResult<Self>
    where
        E: TrafficEngine + ?Sized,
    {
        let emission = Emission::from_options(config.probability, config.headway)?;
        let sampler = config.mix.sampler()?;

        // Classify the mix.
        let mut classes: FxHashMap<VTypeId, VClass> = FxHashMap::default();
        let (mut pedestrian, mut vehicle) = (None, None);
        for type_id in config.mix.types() {
            let class = engine.type_class(type_id)?;
            if class.is_pedestrian() {
                pedestrian.get_or_insert_with(|| type_id.clone());
            } else {
                vehicle.get_or_insert_with(|| type_id.clone());
            }
            classes.insert(type_id.clone(), class);
        }
        if let (Some(pedestrian), Some(vehicle)) = (&pedestrian, &vehicle) {
            return Err(FlowError::MixedTypeClasses {
                pedestrian: pedestrian.clone(),
                vehicle:    vehicle.clone(),
            });
        }
        let is_pedestrian = pedestrian.is_some();

        let name = unique_name(
            engine,
            config
                .name
                .clone()
                .unwrap_or_else(|| format!("{}-{}", config.origin, config.destination)),
        )?;
        if is_pedestrian && matches!(config.removal, RemovalPolicy::ProximityOnDisable { .. }) {
            return Err(FlowError::ProximityRemovalForPedestrians(name));
        }

        let route = RouteId::new(name.clone());
        engine.add_route(
            &route,
            &[config.origin.clone(), config.destination.clone()],
            &config.via,
        )?;

        let mut routes = FxHashMap::default();
        for (type_id, class) in &classes {
            let edges = engine.find_route(&config.origin, &config.destination, type_id, &config.via)?;
            if edges.is_empty() {
                return Err(EngineError::NoRoute {
                    from: config.origin.clone(),
                    to:   config.destination.clone(),
                }
                .into());
            }
            routes.insert(type_id.clone(), resolve_lanes(engine, edges, class)?);
        }

        debug!("flow {name}: {emission:?}, {} types, enabled={}", routes.len(), config.enabled);

        Ok(Self {
            name,
            route,
            pedestrian: is_pedestrian,
            emission,
            sampler,
            routes,
            max_count: config.max_count,
            enabled: config.enabled,
            removal: config.removal,
            depart_speed: config.depart_speed,
            depart_pos: config.depart_pos,
            arrival_speed: config.arrival_speed,
            pedestrian_depart: config.pedestrian_depart,
            count: 0,
            since_last: None,
            created: Vec::new(),
            rng,
            observer,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> &RouteId {
        &self.route
    }

    pub fn is_pedestrian(&self) -> bool {
        self.pedestrian
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of entities emitted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn emission(&self) -> Emission {
        self.emission
    }

    pub fn removal(&self) -> &RemovalPolicy {
        &self.removal
    }

    /// Entities created by this flow and not yet known to be gone.
    pub fn created(&self) -> &[EntityId] {
        &self.created
    }

    /// Resolved edge sequence for `type_id`.
    pub fn route_edges(&self, type_id: &VTypeId) -> Option<&[EdgeId]> {
        self.routes.get(type_id).map(|r| r.edges.as_slice())
    }

    // ── Per-tick ──────────────────────────────────────────────────────────

    /// Advance by one tick and emit if due.  Returns the new entity's id.
    pub fn run<E>(&mut self, engine: &mut E) -> FlowResult<Option<EntityId>>
    where
        E: TrafficEngine + ?Sized,
    {
        let dt = engine.delta_t();
        if let Some(ticks) = &mut self.since_last {
            *ticks += 1;
        }

        if !self.enabled || self.max_count.is_some_and(|max| self.count >= max) {
            return Ok(None);
        }
        let due = match self.emission {
            Emission::Headway(h) => self
                .since_last
                .is_none_or(|ticks| ticks as f64 * dt >= h - HEADWAY_TOLERANCE),
            Emission::Probability(p) => self.rng.gen_bool(per_tick_probability(p, dt)),
        };
        if !due {
            return Ok(None);
        }

        let type_id = self.sampler.sample(&mut self.rng).clone();
        let id = EntityId::new(format!("{}.{}", self.name, self.count));
        if self.pedestrian {
            self.spawn_person(engine, &id, &type_id)?;
        } else {
            self.spawn_vehicle(engine, &id, &type_id)?;
        }
        debug!("flow {}: emitted {id} ({type_id}) at {}", self.name, engine.tick());

        self.observer.on_spawn(&self.name, &id, &type_id);
        self.created.push(id.clone());
        self.count += 1;
        self.since_last = Some(0);
        Ok(Some(id))
    }

    fn spawn_vehicle<E>(&mut self, engine: &mut E, id: &EntityId, type_id: &VTypeId) -> FlowResult<()>
    where
        E: TrafficEngine + ?Sized,
    {
        let route = &self.routes[type_id];
        let spec = VehicleSpec {
            id:            id.clone(),
            route:         self.route.clone(),
            type_id:       type_id.clone(),
            depart_lane:   Some(route.depart_lane),
            depart_speed:  self.depart_speed,
            depart_pos:    self.depart_pos,
            arrival_speed: self.arrival_speed,
        };
        engine.add_vehicle(&spec)?;
        Ok(())
    }

    fn spawn_person<E>(&mut self, engine: &mut E, id: &EntityId, type_id: &VTypeId) -> FlowResult<()>
    where
        E: TrafficEngine + ?Sized,
    {
        let route = &self.routes[type_id];
        let (index, pos) = match self.pedestrian_depart {
            PedestrianDepart::Fixed(pos) => (0, pos),
            PedestrianDepart::RandomFirstLane => {
                random_depart_pos(&route.lengths[..1], &mut self.rng).unwrap_or((0, 0.0))
            }
            PedestrianDepart::RandomAlongRoute => {
                random_depart_pos(&route.lengths, &mut self.rng).unwrap_or((0, 0.0))
            }
        };

        engine.add_person(&PersonSpec {
            id:      id.clone(),
            type_id: type_id.clone(),
            edge:    route.edges[index].clone(),
            pos,
            lane:    Some(route.lanes[index].clone()),
        })?;
        engine.append_walking_stage(
            id,
            &WalkStage { edges: route.edges[index..].to_vec(), arrival_pos: None },
        )?;
        Ok(())
    }

    // ── Enable / disable / removal ────────────────────────────────────────

    pub fn enable(&mut self) {
        if !self.enabled {
            info!("flow {}: enabled", self.name);
        }
        self.enabled = true;
    }

    /// Disable the flow and apply its removal policy.  Returns the number of
    /// entities removed.
    pub fn disable<E>(&mut self, engine: &mut E) -> FlowResult<usize>
    where
        E: TrafficEngine + ?Sized,
    {
        if self.enabled {
            info!("flow {}: disabled", self.name);
        }
        self.enabled = false;
        if self.removal.removes_on_disable() {
            self.vaporize(engine)
        } else {
            Ok(0)
        }
    }

    /// Remove this flow's surviving entities.
    ///
    /// With a proximity policy, vehicles within the radius of the reference
    /// vehicle, and the reference itself, are spared.  Otherwise every
    /// surviving entity is removed.  Entities that already left the network
    /// are dropped from [`created`](Self::created).
    pub fn vaporize<E>(&mut self, engine: &mut E) -> FlowResult<usize>
    where
        E: TrafficEngine + ?Sized,
    {
        let present = if self.pedestrian { engine.person_ids()? } else { engine.vehicle_ids()? };
        self.created.retain(|id| present.contains(id));

        let spared: Vec<EntityId> = match &self.removal {
            RemovalPolicy::ProximityOnDisable { radius, reference } => {
                let mut near = if engine.has_vehicle(reference)? {
                    engine.vehicles_near(reference, *radius)?
                } else {
                    Vec::new()
                };
                near.push(reference.clone());
                near
            }
            RemovalPolicy::None | RemovalPolicy::OnDisable => Vec::new(),
        };

        let mut removed = 0;
        let mut kept = Vec::new();
        for id in std::mem::take(&mut self.created) {
            if spared.contains(&id) {
                kept.push(id);
                continue;
            }
            if self.pedestrian {
                engine.remove_person(&id)?;
            } else {
                engine.remove_vehicle(&id)?;
            }
            removed += 1;
        }
        self.created = kept;

        info!("flow {}: vaporized {removed}, spared {}", self.name, self.created.len());
        Ok(removed)
    }
}

/// `base`, or `base.1`, `base.2`, … if a route of that name already exists.
fn unique_name<E>(engine: &E, base: String) -> FlowResult<String>
where
    E: TrafficEngine + ?Sized,
{
    let taken = engine.route_ids()?;
    let free = |name: &str| !taken.iter().any(|r| r.as_str() == name);
    if free(&base) {
        return Ok(base);
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}.{n}");
        if free(&candidate) {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// `edges` must be non-empty.
fn resolve_lanes<E>(engine: &E, edges: Vec<EdgeId>, class: &VClass) -> FlowResult<TypeRoute>
where
    E: TrafficEngine + ?Sized,
{
    let mut lanes = Vec::with_capacity(edges.len());
    let mut lengths = Vec::with_capacity(edges.len());
    for edge in &edges {
        let lane = rightmost_allowed_lane(engine, edge, class)?.ok_or_else(|| {
            FlowError::NoAllowedLane { edge: edge.clone(), class: class.clone() }
        })?;
        lengths.push(engine.lane_length(&lane)?);
        lanes.push(lane);
    }

    let depart_lane = engine
        .edge_lanes(&edges[0])?
        .iter()
        .position(|l| *l == lanes[0])
        .unwrap_or(0) as u32;

    Ok(TypeRoute { edges, lanes, lengths, depart_lane })
}
