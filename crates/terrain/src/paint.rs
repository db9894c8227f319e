//! Paints a [`Frame`] onto a [`Surface`].
//!
//! Painting walks the frame's layers in order and emits one element per
//! primitive; faces are already depth sorted, so document order is paint
//! order. A pane splits the walk: back walls, then the layers clipped to the
//! pane outline, then front walls and the rim.

use log::debug;
use tilemaker_core::{
    DVec2, Element, Face, Frame, Pane, Path, PathCommand, Polygon, SceneError, Surface,
    SvgDocument,
};

const CLIP_ID: &str = "scene-window";
const PANE_CLIP_ID: &str = "scene-pane";

fn fmt(v: f64) -> String {
    let s = format!("{v:.2}");
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

/// `"x,y x,y ..."` with two decimals.
pub fn points_attr(points: &[DVec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt(p.x), fmt(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG path data for `commands`.
pub fn path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| match *c {
            PathCommand::MoveTo(p) => format!("M {} {}", fmt(p.x), fmt(p.y)),
            PathCommand::LineTo(p) => format!("L {} {}", fmt(p.x), fmt(p.y)),
            PathCommand::QuadTo { ctrl, to } => format!(
                "Q {} {} {} {}",
                fmt(ctrl.x),
                fmt(ctrl.y),
                fmt(to.x),
                fmt(to.y)
            ),
            PathCommand::SmoothQuadTo(p) => format!("T {} {}", fmt(p.x), fmt(p.y)),
            PathCommand::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn path_element(path: &Path) -> Element {
    let mut el = Element::new("path")
        .attr("d", path_data(&path.commands))
        .attr("fill", path.fill.map_or_else(|| "none".to_string(), |c| c.to_css()));
    if let Some(stroke) = path.stroke {
        el = el
            .attr("stroke", stroke.color.to_css())
            .attr("stroke-width", fmt(stroke.width))
            .attr("stroke-linecap", "round")
            .attr("stroke-linejoin", "round");
    }
    el
}

fn polygon_element(polygon: &Polygon) -> Element {
    Element::new("polygon")
        .attr("points", points_attr(&polygon.points))
        .attr("fill", polygon.fill.to_css())
}

fn face_element(face: &Face) -> Element {
    Element::new("polygon")
        .attr("points", points_attr(&face.points))
        .attr("fill", face.fill.to_css())
        .attr("data-face", face.kind.name())
}

fn layer(surface: &mut dyn Surface, name: &str, elements: Vec<Element>) -> Result<(), SceneError> {
    if elements.is_empty() {
        return Ok(());
    }
    surface.open_group(Element::new("g").attr("class", name));
    for el in elements {
        surface.append(el);
    }
    surface.close_group()
}

fn outline_data(points: &[DVec2]) -> String {
    let mut commands: Vec<PathCommand> = points
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            if i == 0 {
                PathCommand::MoveTo(p)
            } else {
                PathCommand::LineTo(p)
            }
        })
        .collect();
    if !commands.is_empty() {
        commands.push(PathCommand::Close);
    }
    path_data(&commands)
}

fn pane_walls(
    surface: &mut dyn Surface,
    name: &str,
    walls: &[Polygon],
    rims: &[Path],
) -> Result<(), SceneError> {
    let elements = walls
        .iter()
        .map(polygon_element)
        .chain(rims.iter().map(path_element))
        .collect();
    layer(surface, name, elements)
}

/// Paints `frame` onto `surface`. Fails with [`SceneError::MissingSurface`]
/// when there is nothing to paint on.
pub fn paint(frame: &Frame, surface: Option<&mut dyn Surface>) -> Result<(), SceneError> {
    let surface = surface.ok_or(SceneError::MissingSurface)?;
    let size = fmt(frame.size);
    debug!("paint: {} primitives at size {size}", frame.primitive_count());

    surface.set_root_attribute("viewBox", &format!("0 0 {size} {size}"));
    surface.set_root_attribute("preserveAspectRatio", "xMidYMid meet");
    surface.set_root_attribute("width", &size);
    surface.set_root_attribute("height", &size);
    surface.set_root_attribute("data-buildings", &frame.meta.buildings.to_string());
    surface.set_root_attribute("data-step", &frame.meta.step.to_string());
    let (a1, a2) = frame.meta.angles;
    surface.set_root_attribute("data-angles", &format!("{a1:.1},{a2:.1}"));

    surface.append(
        Element::new("rect")
            .attr("x", 0)
            .attr("y", 0)
            .attr("width", &size)
            .attr("height", &size)
            .attr("fill", frame.background.to_hex()),
    );

    let window_rect = |w: &tilemaker_core::Window| {
        let half = w.size / 2.0;
        Element::new("rect")
            .attr("x", fmt(w.center.x - half))
            .attr("y", fmt(w.center.y - half))
            .attr("width", fmt(w.size))
            .attr("height", fmt(w.size))
            .attr("rx", fmt(w.corner_radius))
            .attr("ry", fmt(w.corner_radius))
    };

    if let Some(window) = &frame.window {
        surface.define(
            Element::new("clipPath")
                .attr("id", CLIP_ID)
                .child(window_rect(window)),
        );
        surface.open_group(Element::new("g").attr("clip-path", format!("url(#{CLIP_ID})")));
    }

    if let Some(pane) = &frame.pane {
        pane_walls(surface, "pane-back", &pane.back, &pane.back_rims)?;
        surface.define(
            Element::new("clipPath")
                .attr("id", PANE_CLIP_ID)
                .child(Element::new("path").attr("d", outline_data(&pane.outline))),
        );
        surface.open_group(Element::new("g").attr("clip-path", format!("url(#{PANE_CLIP_ID})")));
    }

    layer(surface, "tint", frame.tint.iter().map(polygon_element).collect())?;
    layer(surface, "grid", frame.grid.iter().map(path_element).collect())?;
    layer(surface, "water", frame.water.iter().map(polygon_element).collect())?;
    layer(surface, "shoreline", frame.shoreline.iter().map(path_element).collect())?;
    layer(surface, "buildings", frame.faces.iter().map(face_element).collect())?;

    if let Some(pane) = &frame.pane {
        surface.close_group()?;
        paint_pane_front(surface, pane)?;
    }

    if let Some(window) = &frame.window {
        surface.close_group()?;
        surface.append(
            window_rect(window)
                .attr("fill", "none")
                .attr("stroke", window.border_color.to_hex())
                .attr("stroke-width", fmt(window.border))
                .attr("paint-order", "stroke"),
        );
    }
    Ok(())
}

fn paint_pane_front(surface: &mut dyn Surface, pane: &Pane) -> Result<(), SceneError> {
    pane_walls(surface, "pane-front", &pane.front, &pane.front_rims)?;
    surface.append(
        Element::new("path")
            .attr("d", outline_data(&pane.outline))
            .attr("fill", "none")
            .attr("stroke", pane.rim.color.to_css())
            .attr("stroke-width", fmt(pane.rim.width))
            .attr("stroke-linejoin", "round")
            .attr("data-role", "rim"),
    );
    Ok(())
}

/// Paints `frame` into a fresh [`SvgDocument`] and serializes it.
pub fn render_svg(frame: &Frame) -> Result<String, SceneError> {
    let mut doc = SvgDocument::new();
    paint(frame, Some(&mut doc))?;
    doc.to_svg_string()
}
