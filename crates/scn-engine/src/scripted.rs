//! `ScriptedEngine` — an in-memory [`TrafficEngine`] without physics.
//!
//! Nothing moves on its own: tests and demos place entities and set their
//! positions and speeds explicitly between steps, which makes controller
//! behavior fully reproducible.  Every command the toolkit issues is
//! appended to a log that can be inspected with
//! [`commands`][ScriptedEngine::commands] or drained with
//! [`take_commands`][ScriptedEngine::take_commands].
//!
//! Proximity queries use straight-line distance between entity positions.

use std::collections::{BTreeMap, BTreeSet};

use scn_core::{EdgeId, EntityId, LaneId, Point2, RouteId, Tick, VClass, VTypeId};

use crate::{
    DepartSpeed, EngineError, EngineResult, PersonSpec, SpeedCommand, TrafficEngine, VehicleSpec,
    WalkStage,
};

// ── Command log ───────────────────────────────────────────────────────────────

/// One mutating call received by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddRoute { id: RouteId, edges: Vec<EdgeId>, via: Vec<EdgeId> },
    AddVehicle(VehicleSpec),
    AddPerson(PersonSpec),
    WalkingStage { person: EntityId, stage: WalkStage },
    RemoveVehicle(EntityId),
    RemovePerson(EntityId),
    Speed { id: EntityId, command: SpeedCommand },
    SetSignals { id: EntityId, mask: u32 },
    RestoreSignals(EntityId),
}

// ── Internal state ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ScriptedLane {
    length:    f64,
    max_speed: f64,
    shape:     Vec<Point2>,
    allowed:   Vec<VClass>,
}

#[derive(Debug, Clone)]
struct ScriptedEntity {
    type_id:       VTypeId,
    route:         Option<RouteId>,
    position:      Point2,
    speed:         f64,
    lane_position: f64,
    signals:       u32,
    own_signals:   u32,
    speed_control: Option<SpeedCommand>,
}

impl ScriptedEntity {
    fn new(type_id: VTypeId, position: Point2, speed: f64) -> Self {
        Self {
            type_id,
            route: None,
            position,
            speed,
            lane_position: 0.0,
            signals: 0,
            own_signals: 0,
            speed_control: None,
        }
    }
}

#[derive(Debug, Clone)]
struct ScriptedRoute {
    edges: Vec<EdgeId>,
}

// ── ScriptedEngine ────────────────────────────────────────────────────────────

/// In-memory simulator stand-in.  See the module docs.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    tick:      Tick,
    time_secs: f64,
    delta_t:   f64,

    vehicles: BTreeMap<EntityId, ScriptedEntity>,
    persons:  BTreeMap<EntityId, ScriptedEntity>,

    routes:          BTreeMap<RouteId, ScriptedRoute>,
    rejected_routes: BTreeSet<RouteId>,
    paths:           BTreeMap<(EdgeId, EdgeId), Vec<EdgeId>>,
    edges:           BTreeMap<EdgeId, Vec<LaneId>>,
    lanes:           BTreeMap<LaneId, ScriptedLane>,
    types:           BTreeMap<VTypeId, VClass>,

    log: Vec<Command>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ScriptedEngine {
    /// An empty network with `delta_t`-second steps.
    ///
    /// The types `passenger` (class `passenger`) and `pedestrian` (class
    /// `pedestrian`) are predefined.
    pub fn new(delta_t: f64) -> Self {
        let mut types = BTreeMap::new();
        types.insert(VTypeId::from("passenger"), VClass::from("passenger"));
        types.insert(VTypeId::from("pedestrian"), VClass::from(VClass::PEDESTRIAN));
        Self {
            tick: Tick::ZERO,
            time_secs: 0.0,
            delta_t,
            vehicles: BTreeMap::new(),
            persons: BTreeMap::new(),
            routes: BTreeMap::new(),
            rejected_routes: BTreeSet::new(),
            paths: BTreeMap::new(),
            edges: BTreeMap::new(),
            lanes: BTreeMap::new(),
            types,
            log: Vec::new(),
        }
    }

    // ── Network scripting ─────────────────────────────────────────────────

    /// Add a straight edge from `from` to `to` with `lane_count` lanes named
    /// `<edge>_0`, `<edge>_1`, … (rightmost first).  All lanes share the
    /// edge's centreline and admit every class.
    pub fn add_straight_edge(
        &mut self,
        edge:       &str,
        from:       Point2,
        to:         Point2,
        lane_count: usize,
        max_speed:  f64,
    ) -> &mut Self {
        let edge_id = EdgeId::from(edge);
        let lanes: Vec<LaneId> = (0..lane_count)
            .map(|i| LaneId::new(format!("{edge}_{i}")))
            .collect();
        for lane in &lanes {
            self.lanes.insert(
                lane.clone(),
                ScriptedLane {
                    length:    from.distance(to),
                    max_speed,
                    shape:     vec![from, to],
                    allowed:   Vec::new(),
                },
            );
        }
        self.edges.insert(edge_id, lanes);
        self
    }

    /// Restrict `lane` to the given classes.
    pub fn allow_only(&mut self, lane: &str, classes: &[&str]) -> &mut Self {
        if let Some(l) = self.lanes.get_mut(lane) {
            l.allowed = classes.iter().map(|&c| VClass::from(c)).collect();
        }
        self
    }

    /// Declare a vehicle or pedestrian type.
    pub fn add_vtype(&mut self, type_id: &str, class: &str) -> &mut Self {
        self.types.insert(VTypeId::from(type_id), VClass::from(class));
        self
    }

    /// Fix the edge sequence `find_route` returns between two edges.
    pub fn script_path(&mut self, from: &str, to: &str, edges: &[&str]) -> &mut Self {
        self.paths.insert(
            (EdgeId::from(from), EdgeId::from(to)),
            edges.iter().map(|&e| EdgeId::from(e)).collect(),
        );
        self
    }

    /// Make `add_route` refuse the given route id.
    pub fn reject_route(&mut self, id: &str) -> &mut Self {
        self.rejected_routes.insert(RouteId::from(id));
        self
    }

    // ── Entity scripting ──────────────────────────────────────────────────

    /// Place a vehicle directly, bypassing insertion (e.g. the ego vehicle).
    pub fn place_vehicle(
        &mut self,
        id:       &str,
        type_id:  &str,
        route:    Option<&str>,
        position: Point2,
        speed:    f64,
    ) -> &mut Self {
        let mut entity = ScriptedEntity::new(VTypeId::from(type_id), position, speed);
        entity.route = route.map(RouteId::from);
        self.vehicles.insert(EntityId::from(id), entity);
        self
    }

    /// Move a vehicle or person.  Unknown ids are ignored.
    pub fn move_to(&mut self, id: &str, position: Point2) -> &mut Self {
        if let Some(e) = self.entity_mut(id) {
            e.position = position;
        }
        self
    }

    pub fn set_current_speed(&mut self, id: &str, speed: f64) -> &mut Self {
        if let Some(e) = self.entity_mut(id) {
            e.speed = speed;
        }
        self
    }

    pub fn set_lane_position(&mut self, id: &str, lane_position: f64) -> &mut Self {
        if let Some(e) = self.entity_mut(id) {
            e.lane_position = lane_position;
        }
        self
    }

    /// Set the signal bits the simulator computes for a vehicle on its own.
    /// They become visible on the next [`restore_signals`][TrafficEngine::restore_signals].
    pub fn set_own_signals(&mut self, id: &str, mask: u32) -> &mut Self {
        if let Some(e) = self.vehicles.get_mut(id) {
            e.own_signals = mask;
        }
        self
    }

    /// Let an entity leave the network on its own (not logged as a removal).
    pub fn depart(&mut self, id: &str) -> &mut Self {
        self.vehicles.remove(id);
        self.persons.remove(id);
        self
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn commands(&self) -> &[Command] {
        &self.log
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.log)
    }

    /// The last speed command received for a vehicle, if any.
    pub fn speed_control(&self, id: &str) -> Option<SpeedCommand> {
        self.vehicles.get(id).and_then(|e| e.speed_control)
    }

    pub fn type_of(&self, id: &str) -> Option<&VTypeId> {
        self.vehicles
            .get(id)
            .or_else(|| self.persons.get(id))
            .map(|e| &e.type_id)
    }

    pub fn is_present(&self, id: &str) -> bool {
        self.vehicles.contains_key(id) || self.persons.contains_key(id)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn entity(&self, id: &EntityId) -> EngineResult<&ScriptedEntity> {
        self.vehicles
            .get(id)
            .or_else(|| self.persons.get(id))
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))
    }

    fn entity_mut(&mut self, id: &str) -> Option<&mut ScriptedEntity> {
        match self.vehicles.get_mut(id) {
            Some(e) => Some(e),
            None => self.persons.get_mut(id),
        }
    }

    fn lane(&self, lane: &LaneId) -> EngineResult<&ScriptedLane> {
        self.lanes
            .get(lane)
            .ok_or_else(|| EngineError::UnknownLane(lane.clone()))
    }

    fn require_edge(&self, edge: &EdgeId) -> EngineResult<()> {
        if self.edges.contains_key(edge) {
            Ok(())
        } else {
            Err(EngineError::UnknownEdge(edge.clone()))
        }
    }

    fn path_between(&self, from: &EdgeId, to: &EdgeId) -> EngineResult<Vec<EdgeId>> {
        self.require_edge(from)?;
        self.require_edge(to)?;
        if from == to {
            return Ok(vec![from.clone()]);
        }
        Ok(self
            .paths
            .get(&(from.clone(), to.clone()))
            .cloned()
            .unwrap_or_else(|| vec![from.clone(), to.clone()]))
    }
}

// ── TrafficEngine impl ────────────────────────────────────────────────────────

impl TrafficEngine for ScriptedEngine {
    fn step(&mut self) -> EngineResult<()> {
        self.tick = self.tick.next();
        self.time_secs += self.delta_t;
        Ok(())
    }

    fn tick(&self) -> Tick {
        self.tick
    }

    fn time_secs(&self) -> f64 {
        self.time_secs
    }

    fn delta_t(&self) -> f64 {
        self.delta_t
    }

    fn vehicle_ids(&self) -> EngineResult<Vec<EntityId>> {
        Ok(self.vehicles.keys().cloned().collect())
    }

    fn person_ids(&self) -> EngineResult<Vec<EntityId>> {
        Ok(self.persons.keys().cloned().collect())
    }

    fn has_vehicle(&self, id: &EntityId) -> EngineResult<bool> {
        Ok(self.vehicles.contains_key(id))
    }

    fn add_vehicle(&mut self, spec: &VehicleSpec) -> EngineResult<()> {
        if self.is_present(spec.id.as_str()) {
            return Err(EngineError::DuplicateEntity(spec.id.clone()));
        }
        if !self.types.contains_key(&spec.type_id) {
            return Err(EngineError::UnknownType(spec.type_id.clone()));
        }
        let route = self
            .routes
            .get(&spec.route)
            .ok_or_else(|| EngineError::UnknownRoute(spec.route.clone()))?;

        let lane = route
            .edges
            .first()
            .and_then(|e| self.edges.get(e))
            .and_then(|lanes| lanes.get(spec.depart_lane.unwrap_or(0) as usize))
            .and_then(|l| self.lanes.get(l));
        let position = lane
            .and_then(|l| l.shape.first().copied())
            .unwrap_or_default();
        let speed = match spec.depart_speed {
            DepartSpeed::Value(v) => v,
            DepartSpeed::Max | DepartSpeed::Desired => lane.map_or(0.0, |l| l.max_speed),
            DepartSpeed::Random => 0.0,
        };

        let mut entity = ScriptedEntity::new(spec.type_id.clone(), position, speed);
        entity.route = Some(spec.route.clone());
        self.vehicles.insert(spec.id.clone(), entity);
        self.log.push(Command::AddVehicle(spec.clone()));
        Ok(())
    }

    fn add_person(&mut self, spec: &PersonSpec) -> EngineResult<()> {
        if self.is_present(spec.id.as_str()) {
            return Err(EngineError::DuplicateEntity(spec.id.clone()));
        }
        let first_lane = self
            .edges
            .get(&spec.edge)
            .ok_or_else(|| EngineError::UnknownEdge(spec.edge.clone()))?
            .first()
            .and_then(|l| self.lanes.get(l));
        let position = first_lane
            .and_then(|l| l.shape.first().copied())
            .unwrap_or_default();

        let mut entity = ScriptedEntity::new(spec.type_id.clone(), position, 0.0);
        entity.lane_position = spec.pos;
        self.persons.insert(spec.id.clone(), entity);
        self.log.push(Command::AddPerson(spec.clone()));
        Ok(())
    }

    fn append_walking_stage(&mut self, person: &EntityId, stage: &WalkStage) -> EngineResult<()> {
        if !self.persons.contains_key(person) {
            return Err(EngineError::UnknownEntity(person.clone()));
        }
        for edge in &stage.edges {
            self.require_edge(edge)?;
        }
        self.log.push(Command::WalkingStage {
            person: person.clone(),
            stage:  stage.clone(),
        });
        Ok(())
    }

    fn remove_vehicle(&mut self, id: &EntityId) -> EngineResult<()> {
        self.vehicles
            .remove(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))?;
        self.log.push(Command::RemoveVehicle(id.clone()));
        Ok(())
    }

    fn remove_person(&mut self, id: &EntityId) -> EngineResult<()> {
        self.persons
            .remove(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))?;
        self.log.push(Command::RemovePerson(id.clone()));
        Ok(())
    }

    fn position(&self, id: &EntityId) -> EngineResult<Point2> {
        Ok(self.entity(id)?.position)
    }

    fn speed(&self, id: &EntityId) -> EngineResult<f64> {
        Ok(self.entity(id)?.speed)
    }

    fn lane_position(&self, id: &EntityId) -> EngineResult<f64> {
        Ok(self.entity(id)?.lane_position)
    }

    fn vehicle_route(&self, id: &EntityId) -> EngineResult<RouteId> {
        let vehicle = self
            .vehicles
            .get(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))?;
        vehicle
            .route
            .clone()
            .ok_or_else(|| EngineError::Backend(format!("vehicle {id} has no route")))
    }

    fn command_speed(&mut self, id: &EntityId, command: SpeedCommand) -> EngineResult<()> {
        let vehicle = self
            .vehicles
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))?;
        if let SpeedCommand::Hold(v) = command {
            vehicle.speed = v;
        }
        vehicle.speed_control = Some(command);
        self.log.push(Command::Speed { id: id.clone(), command });
        Ok(())
    }

    fn vehicles_near(&self, center: &EntityId, radius: f64) -> EngineResult<Vec<EntityId>> {
        let origin = self.entity(center)?.position;
        Ok(self
            .vehicles
            .iter()
            .filter(|(id, e)| *id != center && e.position.distance(origin) <= radius)
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn signals(&self, id: &EntityId) -> EngineResult<u32> {
        self.vehicles
            .get(id)
            .map(|e| e.signals)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))
    }

    fn set_signals(&mut self, id: &EntityId, mask: u32) -> EngineResult<()> {
        let vehicle = self
            .vehicles
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))?;
        vehicle.signals = mask;
        self.log.push(Command::SetSignals { id: id.clone(), mask });
        Ok(())
    }

    fn restore_signals(&mut self, id: &EntityId) -> EngineResult<()> {
        let vehicle = self
            .vehicles
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.clone()))?;
        vehicle.signals = vehicle.own_signals;
        self.log.push(Command::RestoreSignals(id.clone()));
        Ok(())
    }

    fn route_ids(&self) -> EngineResult<Vec<RouteId>> {
        Ok(self.routes.keys().cloned().collect())
    }

    fn add_route(&mut self, id: &RouteId, edges: &[EdgeId], via: &[EdgeId]) -> EngineResult<()> {
        if self.rejected_routes.contains(id) || self.routes.contains_key(id) {
            return Err(EngineError::RouteRejected {
                route:  id.clone(),
                reason: "route id refused".to_owned(),
            });
        }
        for edge in edges.iter().chain(via) {
            self.require_edge(edge)?;
        }
        self.routes.insert(id.clone(), ScriptedRoute { edges: edges.to_vec() });
        self.log.push(Command::AddRoute {
            id:    id.clone(),
            edges: edges.to_vec(),
            via:   via.to_vec(),
        });
        Ok(())
    }

    fn route_edges(&self, id: &RouteId) -> EngineResult<Vec<EdgeId>> {
        self.routes
            .get(id)
            .map(|r| r.edges.clone())
            .ok_or_else(|| EngineError::UnknownRoute(id.clone()))
    }

    fn find_route(
        &self,
        from:    &EdgeId,
        to:      &EdgeId,
        type_id: &VTypeId,
        via:     &[EdgeId],
    ) -> EngineResult<Vec<EdgeId>> {
        if !self.types.contains_key(type_id) {
            return Err(EngineError::UnknownType(type_id.clone()));
        }
        let waypoints: Vec<&EdgeId> = std::iter::once(from).chain(via).chain([to]).collect();
        let mut edges: Vec<EdgeId> = Vec::new();
        for pair in waypoints.windows(2) {
            let leg = self.path_between(pair[0], pair[1])?;
            let skip = usize::from(edges.last() == leg.first());
            edges.extend(leg.into_iter().skip(skip));
        }
        if edges.is_empty() {
            return Err(EngineError::NoRoute { from: from.clone(), to: to.clone() });
        }
        Ok(edges)
    }

    fn edge_lanes(&self, edge: &EdgeId) -> EngineResult<Vec<LaneId>> {
        self.edges
            .get(edge)
            .cloned()
            .ok_or_else(|| EngineError::UnknownEdge(edge.clone()))
    }

    fn lane_length(&self, lane: &LaneId) -> EngineResult<f64> {
        Ok(self.lane(lane)?.length)
    }

    fn lane_max_speed(&self, lane: &LaneId) -> EngineResult<f64> {
        Ok(self.lane(lane)?.max_speed)
    }

    fn lane_shape(&self, lane: &LaneId) -> EngineResult<Vec<Point2>> {
        Ok(self.lane(lane)?.shape.clone())
    }

    fn lane_allowed(&self, lane: &LaneId) -> EngineResult<Vec<VClass>> {
        Ok(self.lane(lane)?.allowed.clone())
    }

    fn type_class(&self, type_id: &VTypeId) -> EngineResult<VClass> {
        self.types
            .get(type_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownType(type_id.clone()))
    }
}
