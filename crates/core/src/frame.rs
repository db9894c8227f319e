//! Paintable primitives for one rendered instant of a scene.
//!
//! A [`Frame`] is plain data: every layer is already in screen space and in
//! paint order, so painting is a straight walk with no decisions left. Layers
//! are painted in field order: tint, grid, water, shoreline, faces. A frame
//! with a [`Pane`] paints its back walls first, clips the layers to the pane
//! outline, then paints the front walls and the rim on top.

use crate::color::{Hsla, Srgb};
use crate::geometry::DVec2;

/// Which side of an extruded building block a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Left,
    Right,
    Front,
    Back,
    Roof,
}

impl FaceKind {
    pub const ALL: [FaceKind; 5] = [
        FaceKind::Left,
        FaceKind::Right,
        FaceKind::Front,
        FaceKind::Back,
        FaceKind::Roof,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FaceKind::Left => "left",
            FaceKind::Right => "right",
            FaceKind::Front => "front",
            FaceKind::Back => "back",
            FaceKind::Roof => "roof",
        }
    }
}

/// One quadrilateral building face with its painter's-algorithm depth key.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Index of the owning site in the scene's site list.
    pub site: usize,
    pub kind: FaceKind,
    pub points: [DVec2; 4],
    pub fill: Hsla,
    /// Mean screen y of the base edge (roof: of all four roof corners).
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Hsla,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Hsla, width: f64) -> Self {
        Self { color, width }
    }
}

/// SVG-style path commands in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
    QuadTo { ctrl: DVec2, to: DVec2 },
    /// Quadratic continuing the reflected control point of the previous one.
    SmoothQuadTo(DVec2),
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCommand>,
    pub fill: Option<Hsla>,
    pub stroke: Option<Stroke>,
}

impl Path {
    /// An open stroked polyline through `points`.
    pub fn polyline(points: &[DVec2], stroke: Stroke) -> Self {
        let commands = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    PathCommand::MoveTo(*p)
                } else {
                    PathCommand::LineTo(*p)
                }
            })
            .collect();
        Self {
            commands,
            fill: None,
            stroke: Some(stroke),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<DVec2>,
    pub fill: Hsla,
}

/// Rounded viewing window: content is clipped to it and a border is drawn on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub center: DVec2,
    pub size: f64,
    pub corner_radius: f64,
    pub border: f64,
    pub border_color: Srgb,
}

/// An extruded slab of terrain seen from above: side walls around a top
/// surface whose outline follows the warped ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    /// Closed outline of the top surface; the scene layers are clipped to it.
    pub outline: Vec<DVec2>,
    /// Walls on the far side, painted before the top surface.
    pub back: Vec<Polygon>,
    pub back_rims: Vec<Path>,
    /// Walls on the near side, painted after the top surface.
    pub front: Vec<Polygon>,
    pub front_rims: Vec<Path>,
    pub rim: Stroke,
}

impl Pane {
    pub fn primitive_count(&self) -> usize {
        self.back.len() + self.back_rims.len() + self.front.len() + self.front_rims.len() + 1
    }
}

/// Debug facts recorded on the painted document for regression checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMeta {
    pub buildings: usize,
    pub step: f64,
    pub angles: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: f64,
    pub background: Srgb,
    pub window: Option<Window>,
    pub pane: Option<Pane>,
    pub tint: Vec<Polygon>,
    pub grid: Vec<Path>,
    pub water: Vec<Polygon>,
    pub shoreline: Vec<Path>,
    pub faces: Vec<Face>,
    pub meta: FrameMeta,
}

impl Frame {
    /// An empty frame on a white background.
    pub fn new(size: f64, meta: FrameMeta) -> Self {
        Self {
            size,
            background: Srgb::WHITE,
            window: None,
            pane: None,
            tint: Vec::new(),
            grid: Vec::new(),
            water: Vec::new(),
            shoreline: Vec::new(),
            faces: Vec::new(),
            meta,
        }
    }

    /// True when face depth keys never decrease along the paint order.
    pub fn is_depth_sorted(&self) -> bool {
        self.faces.windows(2).all(|w| w[0].depth <= w[1].depth)
    }

    pub fn primitive_count(&self) -> usize {
        self.tint.len()
            + self.grid.len()
            + self.water.len()
            + self.shoreline.len()
            + self.faces.len()
            + self.pane.as_ref().map_or(0, Pane::primitive_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(depth: f64) -> Face {
        Face {
            site: 0,
            kind: FaceKind::Roof,
            points: [DVec2::ZERO; 4],
            fill: Hsla::opaque(0.0, 0.0, 50.0),
            depth,
        }
    }

    fn meta() -> FrameMeta {
        FrameMeta {
            buildings: 0,
            step: 30.0,
            angles: (10.0, 125.0),
        }
    }

    #[test]
    fn empty_frame_is_sorted_and_empty() {
        let frame = Frame::new(900.0, meta());
        assert!(frame.is_depth_sorted());
        assert_eq!(frame.primitive_count(), 0);
        assert_eq!(frame.background, Srgb::WHITE);
    }

    #[test]
    fn equal_depths_count_as_sorted() {
        let mut frame = Frame::new(900.0, meta());
        frame.faces = vec![face(1.0), face(1.0), face(2.0)];
        assert!(frame.is_depth_sorted());
        frame.faces.push(face(0.5));
        assert!(!frame.is_depth_sorted());
    }

    #[test]
    fn pane_counts_walls_rims_and_outline() {
        let mut frame = Frame::new(900.0, meta());
        let wall = Polygon {
            points: vec![DVec2::ZERO, DVec2::X, DVec2::Y],
            fill: Hsla::opaque(30.0, 28.0, 18.0),
        };
        frame.pane = Some(Pane {
            outline: vec![DVec2::ZERO, DVec2::X, DVec2::ONE],
            back: vec![wall.clone(), wall.clone()],
            back_rims: Vec::new(),
            front: vec![wall],
            front_rims: Vec::new(),
            rim: Stroke::new(Hsla::new(0.0, 0.0, 15.0, 0.65), 2.0),
        });
        assert_eq!(frame.primitive_count(), 4);
    }

    #[test]
    fn polyline_starts_with_move_to() {
        let stroke = Stroke::new(Hsla::opaque(0.0, 0.0, 0.0), 1.0);
        let path = Path::polyline(&[DVec2::ZERO, DVec2::X, DVec2::Y], stroke);
        assert_eq!(path.commands[0], PathCommand::MoveTo(DVec2::ZERO));
        assert_eq!(path.commands[2], PathCommand::LineTo(DVec2::Y));
        assert!(path.fill.is_none());
        assert!(Path::polyline(&[], stroke).commands.is_empty());
    }

    #[test]
    fn face_kind_names_are_distinct() {
        let names: std::collections::HashSet<_> = FaceKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), 5);
    }
}
