use detour_core::{geopoint::GeoPoint, transport_mode::TransportMode};
use tracing::debug;

use crate::{
    planner::{PlanError, RoutePlan, RoutePlanner},
    source::{ClosureSource, RoutingEngine},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    SelectingPoints,
    Calculating { generation: u64 },
    RouteDisplayed(Box<RoutePlan>),
    ErrorDisplayed(PlanError),
}

/// Issued when a calculation starts. Its result is only accepted while the
/// ticket is still the latest one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationTicket {
    pub generation: u64,
    pub source: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub mode: TransportMode,
}

/// State of the route planning screen.
#[derive(Debug)]
pub struct RoutePlanningSession {
    mode: TransportMode,
    source: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    state: SessionState,
    generation: u64,
}

impl Default for RoutePlanningSession {
    fn default() -> Self {
        Self::new(TransportMode::default())
    }
}

impl RoutePlanningSession {
    pub fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            source: None,
            destination: None,
            state: SessionState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn source(&self) -> Option<GeoPoint> {
        self.source
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.destination
    }

    pub fn plan(&self) -> Option<&RoutePlan> {
        match &self.state {
            SessionState::RouteDisplayed(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PlanError> {
        match &self.state {
            SessionState::ErrorDisplayed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_calculating(&self) -> bool {
        matches!(self.state, SessionState::Calculating { .. })
    }

    pub fn can_calculate(&self) -> bool {
        self.source.is_some() && self.destination.is_some() && !self.is_calculating()
    }

    /// The first point is the source, the second the destination. Once both
    /// are set, or after a result, a click starts a new selection.
    pub fn select_point(&mut self, point: GeoPoint) {
        let starts_over = matches!(
            self.state,
            SessionState::Idle
                | SessionState::RouteDisplayed(_)
                | SessionState::ErrorDisplayed(_)
                | SessionState::Calculating { .. }
        ) || (self.source.is_some() && self.destination.is_some());

        if starts_over {
            self.source = Some(point);
            self.destination = None;
        } else if self.source.is_none() {
            self.source = Some(point);
        } else {
            self.destination = Some(point);
        }

        self.state = SessionState::SelectingPoints;
    }

    pub fn set_source(&mut self, point: Option<GeoPoint>) {
        self.source = point;
        self.discard_result();
    }

    pub fn set_destination(&mut self, point: Option<GeoPoint>) {
        self.destination = point;
        self.discard_result();
    }

    /// A displayed route no longer matches the new mode.
    pub fn set_mode(&mut self, mode: TransportMode) {
        if mode != self.mode {
            self.mode = mode;
            self.discard_result();
        }
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.destination = None;
        self.state = SessionState::Idle;
    }

    /// Moves to `Calculating`. The points are validated by the planner so a
    /// missing one ends up displayed as an error.
    pub fn begin_calculation(&mut self) -> CalculationTicket {
        self.generation += 1;
        self.state = SessionState::Calculating {
            generation: self.generation,
        };

        CalculationTicket {
            generation: self.generation,
            source: self.source,
            destination: self.destination,
            mode: self.mode,
        }
    }

    /// Applies a result. Returns `false` and leaves the state untouched when
    /// the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: CalculationTicket,
        result: Result<RoutePlan, PlanError>,
    ) -> bool {
        if self.state != (SessionState::Calculating { generation: ticket.generation }) {
            debug!(
                "Discarding stale route result {} (latest is {})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(plan) => SessionState::RouteDisplayed(Box::new(plan)),
            Err(error) => SessionState::ErrorDisplayed(error),
        };

        true
    }

    /// Runs one calculation to completion against `planner`.
    pub async fn calculate<C, R>(&mut self, planner: &RoutePlanner<C, R>) -> bool
    where
        C: ClosureSource,
        R: RoutingEngine,
    {
        let ticket = self.begin_calculation();
        let result = planner
            .plan(ticket.source, ticket.destination, ticket.mode)
            .await;
        self.complete(ticket, result)
    }

    fn discard_result(&mut self) {
        self.state = if self.source.is_none() && self.destination.is_none() {
            SessionState::Idle
        } else {
            SessionState::SelectingPoints
        };
    }
}
