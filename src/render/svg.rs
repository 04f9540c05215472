//! SVG export of a recorded display list

use super::{
    paint::{Color, Paint},
    path::{Path, PathCmd},
    surface::{DisplayList, DrawOp, Surface},
};

/// Replay `list` as a standalone SVG document.
pub fn to_svg(list: &DisplayList) -> String {
    let (width, height) = list.size();
    let mut defs = String::new();
    let mut body = String::new();

    for op in list.ops() {
        match op {
            DrawOp::Fill { path, paint } => {
                let fill = match paint {
                    Paint::Solid(color) => color_attrs("fill", "fill-opacity", *color),
                    Paint::LinearGradient(gradient) => {
                        let id = format!("g{}", defs.matches("<linearGradient").count());
                        defs.push_str(&format!(
                            r#"<linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                            id, gradient.start.x, gradient.start.y, gradient.end.x, gradient.end.y
                        ));
                        for stop in &gradient.stops {
                            defs.push_str(&format!(
                                r#"<stop offset="{}" {}/>"#,
                                stop.t,
                                color_attrs("stop-color", "stop-opacity", stop.color)
                            ));
                        }
                        defs.push_str("</linearGradient>");
                        format!(r#"fill="url(#{})""#, id)
                    }
                };
                body.push_str(&shape(path, &fill));
            }
            DrawOp::Stroke { path, color, width } => {
                let stroke = format!(r#"fill="none" {} stroke-width="{}""#, color_attrs("stroke", "stroke-opacity", *color), width);
                body.push_str(&shape(path, &stroke));
            }
        }
    }

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    if !defs.is_empty() {
        svg.push_str("<defs>");
        svg.push_str(&defs);
        svg.push_str("</defs>");
    }
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

fn color_attrs(attr: &str, opacity_attr: &str, color: Color) -> String {
    if color.is_opaque() {
        format!(r#"{}="{}""#, attr, color.to_hex())
    } else {
        format!(r#"{}="{}" {}="{:.3}""#, attr, color.to_hex(), opacity_attr, color.opacity())
    }
}

fn shape(path: &Path, attrs: &str) -> String {
    match path.as_circle() {
        Some((center, radius)) => format!(
            r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
            center.x, center.y, radius, attrs
        ),
        None => format!(r#"<path d="{}" {}/>"#, path_data(path), attrs),
    }
}

/// SVG path data for `path`.
pub fn path_data(path: &Path) -> String {
    path.cmds()
        .iter()
        .map(|cmd| match cmd {
            PathCmd::MoveTo { to } => format!("M{} {}", to.x, to.y),
            PathCmd::LineTo { to } => format!("L{} {}", to.x, to.y),
            PathCmd::QuadTo { ctrl, to } => format!("Q{} {} {} {}", ctrl.x, ctrl.y, to.x, to.y),
            PathCmd::ArcTo { radius, to } => format!("A{r} {r} 0 0 1 {} {}", to.x, to.y, r = radius),
            PathCmd::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
