//! The full finish run over a selection of rooms.

use std::fmt;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::document::{
    run_in_transaction, Document, ElementId, GeneratedElement, LevelId, ParameterSchema, RoomId,
    StripTag, SurfaceKind, TypeId,
};
use crate::error::{FinishError, Result};
use crate::geometry::Boundary;
use crate::math::units::internal_to_mm;
use crate::operations::classify::ClassifyColumns;
use crate::operations::generation::{CreateStrips, CreateSurface, RoomStamp};
use crate::operations::openings::{
    CutAtOpenings, CutFloorAtOpenings, CutOutcome, FindIntersections, OpeningIntersections,
};
use crate::operations::query::ExtractBoundary;
use crate::operations::report::{AggregateRoom, StampTypeRoomLists};

/// Rooms to finish and the types chosen for each kind of finish. A kind
/// without a type is not generated.
#[derive(Debug, Clone, Default)]
pub struct FinishRequest {
    pub rooms: Vec<RoomId>,
    pub floor_type: Option<TypeId>,
    pub ceiling_type: Option<TypeId>,
    pub wall_type: Option<TypeId>,
    pub skirt_type: Option<TypeId>,
}

impl FinishRequest {
    #[must_use]
    pub fn new(rooms: Vec<RoomId>) -> Self {
        Self {
            rooms,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_floors(mut self, type_id: TypeId) -> Self {
        self.floor_type = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_ceilings(mut self, type_id: TypeId) -> Self {
        self.ceiling_type = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_walls(mut self, type_id: TypeId) -> Self {
        self.wall_type = Some(type_id);
        self
    }

    #[must_use]
    pub fn with_skirts(mut self, type_id: TypeId) -> Self {
        self.skirt_type = Some(type_id);
        self
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Boundaries,
    Floors,
    Ceilings,
    Walls,
    Skirts,
    Intersections,
    Openings,
    Columns,
    TypeLists,
    Aggregation,
}

impl Stage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Boundaries => "boundaries",
            Self::Floors => "floors",
            Self::Ceilings => "ceilings",
            Self::Walls => "walls",
            Self::Skirts => "skirts",
            Self::Intersections => "intersections",
            Self::Openings => "openings",
            Self::Columns => "columns",
            Self::TypeLists => "type lists",
            Self::Aggregation => "aggregation",
        }
    }

    /// Name of the transaction the stage runs in.
    fn transaction_name(self) -> &'static str {
        match self {
            Self::Boundaries => "Read Room Boundaries",
            Self::Floors => "Generate Floors",
            Self::Ceilings => "Generate Ceilings",
            Self::Walls => "Generate Walls",
            Self::Skirts => "Generate Skirts",
            Self::Intersections => "Find Door Intersections",
            Self::Openings => "Cut At Doors",
            Self::Columns => "Classify Columns",
            Self::TypeLists => "Set Room Numbers For Types",
            Self::Aggregation => "Write Room Reports",
        }
    }
}

/// A problem confined to one room or element; the run went on without it.
#[derive(Debug)]
pub struct Issue {
    pub stage: Stage,
    /// Room number or element the problem concerns.
    pub subject: String,
    pub error: FinishError,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub rooms: usize,
    pub created: usize,
    pub deleted: usize,
    /// Element and door pairs found by the intersection stage.
    pub intersections: usize,
    /// Strips removed entirely by door openings.
    pub absorbed: usize,
    pub markers: usize,
    pub retagged: usize,
    pub issues: Vec<Issue>,
}

impl PipelineReport {
    fn record(&mut self, stage: Stage, subject: impl Into<String>, error: FinishError) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error);
        }
        let subject = subject.into();
        warn!(stage = stage.label(), %subject, %error, "skipped");
        self.issues.push(Issue {
            stage,
            subject,
            error,
        });
        Ok(())
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Finished {} rooms: {} elements created, {} deleted.",
            self.rooms, self.created, self.deleted
        )?;
        writeln!(
            f,
            "Doors: {} intersections, {} strips absorbed, {} thresholds marked.",
            self.intersections, self.absorbed, self.markers
        )?;
        writeln!(f, "Columns: {} strips retagged.", self.retagged)?;
        if self.issues.is_empty() {
            return Ok(());
        }
        writeln!(f, "Skipped ({}):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  [{}] {}: {}", issue.stage.label(), issue.subject, issue.error)?;
        }
        Ok(())
    }
}

/// A room ready for generation.
struct PreparedRoom {
    id: RoomId,
    level: LevelId,
    lower_offset_mm: f64,
    boundary: Boundary,
    stamp: RoomStamp,
}

/// Runs every stage over a selection of rooms.
///
/// Each stage runs in its own transaction. Geometry and metadata problems
/// are recorded against the room or element and the stage goes on;
/// transaction and resource failures roll the current stage back and end
/// the run.
pub struct FinishPipeline {
    config: PipelineConfig,
}

impl FinishPipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline on `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a required
    /// parameter is not bound, or a stage's transaction fails.
    pub fn run(&self, doc: &mut Document, request: &FinishRequest) -> Result<PipelineReport> {
        self.config.validate()?;
        ParameterSchema::standard().validate(doc.bindings())?;
        info!(rooms = request.rooms.len(), "starting finish run");

        let mut report = PipelineReport::default();
        let rooms = prepare(doc, &request.rooms, &mut report)?;
        report.rooms = rooms.len();

        let mut generated = Vec::new();
        if let Some(ty) = request.floor_type {
            generated.extend(self.surfaces(doc, &rooms, ty, Stage::Floors, &mut report)?);
        }
        if let Some(ty) = request.ceiling_type {
            generated.extend(self.surfaces(doc, &rooms, ty, Stage::Ceilings, &mut report)?);
        }
        if let Some(ty) = request.wall_type {
            let top = self.config.wall_height();
            generated.extend(self.strips(doc, &rooms, ty, Stage::Walls, top, &mut report)?);
        }
        if let Some(ty) = request.skirt_type {
            let top = self.config.skirts_height;
            generated.extend(self.strips(doc, &rooms, ty, Stage::Skirts, top, &mut report)?);
        }
        report.created = generated.len();

        let clearance = self.config.opening_clearance;
        let intersections = run_in_transaction(doc, Stage::Intersections.transaction_name(), |txn| {
            FindIntersections::new(generated.clone())
                .with_clearance(clearance)
                .execute(txn)
        })?;
        report.intersections = intersections.pair_count();

        let replacements = self.cut_openings(doc, &intersections, &mut report)?;
        let live: Vec<ElementId> = generated
            .into_iter()
            .chain(replacements)
            .filter(|id| doc.element(*id).is_ok())
            .collect();

        let strips: Vec<ElementId> = live
            .iter()
            .copied()
            .filter(|id| doc.element(*id).is_ok_and(|e| e.as_strip().is_some()))
            .collect();
        let classify = ClassifyColumns::new(strips)
            .with_max_length(self.config.column_max_length)
            .with_clearance(self.config.column_clearance);
        report.retagged =
            run_in_transaction(doc, Stage::Columns.transaction_name(), |txn| classify.execute(txn))?;

        run_in_transaction(doc, Stage::TypeLists.transaction_name(), |txn| {
            StampTypeRoomLists::new().execute(txn)
        })?;

        run_in_transaction(doc, Stage::Aggregation.transaction_name(), |txn| {
            for room in &rooms {
                let op = AggregateRoom::new(room.id).with_units(self.config.report_units.clone());
                match op.execute(txn) {
                    Ok(outcome) => {
                        for error in outcome.issues {
                            report.record(Stage::Aggregation, &room.stamp.number, error)?;
                        }
                    }
                    Err(e) => report.record(Stage::Aggregation, &room.stamp.number, e)?,
                }
            }
            Ok(())
        })?;

        info!(
            created = report.created,
            deleted = report.deleted,
            issues = report.issues.len(),
            "finish run complete"
        );
        Ok(report)
    }

    fn surfaces(
        &self,
        doc: &mut Document,
        rooms: &[PreparedRoom],
        type_id: TypeId,
        stage: Stage,
        report: &mut PipelineReport,
    ) -> Result<Vec<ElementId>> {
        run_in_transaction(doc, stage.transaction_name(), |txn| {
            let mut created = Vec::with_capacity(rooms.len());
            for room in rooms {
                let offset_mm = match stage {
                    Stage::Ceilings => self.config.ceilings_height,
                    _ => room.lower_offset_mm,
                };
                let op = CreateSurface::new(
                    room.boundary.clone(),
                    type_id,
                    room.level,
                    offset_mm,
                    room.stamp.clone(),
                );
                match op.execute(txn) {
                    Ok(id) => created.push(id),
                    Err(e) => report.record(stage, &room.stamp.number, e)?,
                }
            }
            info!(stage = stage.label(), created = created.len(), "stage complete");
            Ok(created)
        })
    }

    /// Strips reaching from the room base up to `top_mm` above the level.
    fn strips(
        &self,
        doc: &mut Document,
        rooms: &[PreparedRoom],
        type_id: TypeId,
        stage: Stage,
        top_mm: f64,
        report: &mut PipelineReport,
    ) -> Result<Vec<ElementId>> {
        let tag = if stage == Stage::Skirts {
            StripTag::Skirt
        } else {
            StripTag::Wall
        };
        let prefix = self.config.prefixes.partition_prefix();
        run_in_transaction(doc, stage.transaction_name(), |txn| {
            let mut created = Vec::new();
            for room in rooms {
                let op = CreateStrips::new(
                    room.boundary.clone(),
                    type_id,
                    room.level,
                    top_mm - room.lower_offset_mm,
                    room.lower_offset_mm,
                    room.stamp.clone(),
                )
                .with_tag(tag)
                .with_partition_prefix(prefix.as_str());
                match op.execute(txn) {
                    Ok(outcome) => {
                        created.extend(outcome.created);
                        for error in outcome.failures {
                            report.record(stage, &room.stamp.number, error)?;
                        }
                    }
                    Err(e) => report.record(stage, &room.stamp.number, e)?,
                }
            }
            info!(stage = stage.label(), created = created.len(), "stage complete");
            Ok(created)
        })
    }

    /// Cuts strips and floors at the doors found next to them; returns the
    /// replacement elements.
    fn cut_openings(
        &self,
        doc: &mut Document,
        intersections: &OpeningIntersections,
        report: &mut PipelineReport,
    ) -> Result<Vec<ElementId>> {
        let config = &self.config;
        run_in_transaction(doc, Stage::Openings.transaction_name(), |txn| {
            let mut replacements = Vec::new();
            for (element, doors) in intersections.iter() {
                let subject = format!("{element:?}");
                let is_floor = match txn.element(element) {
                    Ok(GeneratedElement::Surface(s)) => {
                        if s.kind != SurfaceKind::Floor {
                            continue;
                        }
                        true
                    }
                    Ok(GeneratedElement::Strip(_)) => false,
                    Err(e) => {
                        report.record(Stage::Openings, subject, e)?;
                        continue;
                    }
                };

                if is_floor {
                    let op = CutFloorAtOpenings::new(
                        element,
                        doors.to_vec(),
                        config.floor_cut_policy,
                        config.door_cut_depth.factor(),
                    );
                    match op.execute(txn) {
                        Ok(outcome) => {
                            report.markers += outcome.markers.len();
                            if let Some(id) = outcome.replaced_by {
                                report.created += 1;
                                report.deleted += 1;
                                replacements.push(id);
                            }
                        }
                        Err(e) => report.record(Stage::Openings, subject, e)?,
                    }
                    continue;
                }

                let op = CutAtOpenings::new(element, doors.to_vec())
                    .with_min_length(config.min_strip_length)
                    .with_clearance(config.opening_clearance);
                match op.execute(txn) {
                    Ok(CutOutcome::Untouched) => {}
                    Ok(CutOutcome::Split { replacements: pieces }) => {
                        report.created += pieces.len();
                        report.deleted += 1;
                        replacements.extend(pieces);
                    }
                    Ok(CutOutcome::FullyAbsorbed) => {
                        report.absorbed += 1;
                        report.deleted += 1;
                    }
                    Err(e) => report.record(Stage::Openings, subject, e)?,
                }
            }
            info!(
                replaced = replacements.len(),
                absorbed = report.absorbed,
                markers = report.markers,
                "openings cut"
            );
            Ok(replacements)
        })
    }
}

/// Reads the boundary and stamp of every room. Rooms without a boundary
/// are recorded and left out.
fn prepare(
    doc: &Document,
    rooms: &[RoomId],
    report: &mut PipelineReport,
) -> Result<Vec<PreparedRoom>> {
    let mut prepared = Vec::with_capacity(rooms.len());
    for &id in rooms {
        let subject = doc
            .room(id)
            .map_or_else(|_| format!("{id:?}"), |r| r.number.clone());
        let room = ExtractBoundary::new(id).execute(doc).and_then(|boundary| {
            let data = doc.room(id)?;
            Ok(PreparedRoom {
                id,
                level: data.level,
                lower_offset_mm: internal_to_mm(data.lower_offset),
                boundary,
                stamp: RoomStamp::for_room(doc, id)?,
            })
        });
        match room {
            Ok(room) => prepared.push(room),
            Err(e) => report.record(Stage::Boundaries, subject, e)?,
        }
    }
    Ok(prepared)
}
