use crate::projection::{CoordinateTransform, Crs};
use crate::style::{AccessorError, LineAccessors, StyleKey};

use super::{vertex_template, vertices_per_segment, BufferSet, BuildError, Endpoint, LineVertex};

/// A polyline point after style evaluation, referring into the projected
/// coordinate list by point index.
#[derive(Copy, Clone)]
struct StyledPoint {
    pos: usize,
    prev: usize,
    next: usize,
    stroke_width: f32,
    stroke_color: [f32; 3],
    stroke_opacity: f32,
}

/// Expands `polylines` into triangle geometry.
///
/// Positions of all points are evaluated first and projected from `source` to
/// `target` in one batched call. Each segment then contributes the six vertices
/// of the expansion template. Lines with fewer than two points contribute
/// nothing.
///
/// Style accessors run once per point. The first accessor failure aborts the
/// build; no partially written buffers are returned.
pub fn build_line_buffers<P>(
    polylines: &[Vec<P>],
    accessors: &LineAccessors<P>,
    transform: &dyn CoordinateTransform,
    source: &Crs,
    target: &Crs,
) -> Result<BufferSet, BuildError> {
    let point_count: usize = polylines.iter().map(Vec::len).sum();
    let segments: usize = polylines.iter().map(|l| l.len().saturating_sub(1)).sum();

    let vertex_count = segments * vertices_per_segment();
    if vertex_count > u32::MAX as usize {
        return Err(BuildError::TooManyVertices(vertex_count));
    }

    let mut flat = Vec::with_capacity(point_count * 3);
    for (li, line) in polylines.iter().enumerate() {
        for (pi, point) in line.iter().enumerate() {
            let p = accessors
                .position
                .eval(point, pi, line, li)
                .map_err(accessor_error(StyleKey::Position, li, pi))?;
            if !p.is_finite() {
                return Err(invalid(StyleKey::Position, li, pi, format!("{p:?}")));
            }
            flat.extend_from_slice(&p.to_array());
        }
    }

    let projected = transform.transform(source, target, &flat, 3)?;
    if projected.len() != flat.len() {
        return Err(BuildError::ProjectionLength { expected: flat.len(), got: projected.len() });
    }

    let mut out = BufferSet::with_segment_capacity(segments);
    let mut base = 0usize;

    for (li, line) in polylines.iter().enumerate() {
        let len = line.len();
        let mut start: Option<StyledPoint> = None;

        for (pi, point) in line.iter().enumerate() {
            let idx = base + pi;
            let end = StyledPoint {
                pos: idx,
                prev: if pi > 0 { idx - 1 } else { idx },
                next: if pi + 1 < len { idx + 1 } else { idx },
                stroke_width: eval_width(accessors, point, pi, line, li)?,
                stroke_color: eval_color(accessors, point, pi, line, li)?,
                stroke_opacity: eval_opacity(accessors, point, pi, line, li)?,
            };

            if let Some(start) = start {
                emit_segment(&mut out, &projected, &start, &end);
            }
            start = Some(end);
        }

        base += len;
    }

    debug_assert_eq!(out.vertex_count(), vertex_count);
    log::debug!(
        "built line geometry: {} lines, {} segments, {} vertices ({source} -> {target})",
        polylines.len(),
        segments,
        out.vertex_count()
    );

    Ok(out)
}

fn emit_segment(out: &mut BufferSet, coords: &[f64], start: &StyledPoint, end: &StyledPoint) {
    for entry in vertex_template() {
        let v = match entry.endpoint {
            Endpoint::Start => start,
            Endpoint::End => end,
        };
        out.push(LineVertex {
            pos: point_at(coords, v.pos),
            prev: point_at(coords, v.prev),
            next: point_at(coords, v.next),
            offset: entry.offset,
            stroke_width: v.stroke_width,
            stroke_color: v.stroke_color,
            stroke_opacity: v.stroke_opacity,
        });
    }
}

#[inline]
fn point_at(coords: &[f64], index: usize) -> [f32; 3] {
    let i = index * 3;
    [coords[i] as f32, coords[i + 1] as f32, coords[i + 2] as f32]
}

fn eval_width<P>(
    acc: &LineAccessors<P>,
    point: &P,
    pi: usize,
    line: &[P],
    li: usize,
) -> Result<f32, BuildError> {
    let w = acc
        .stroke_width
        .eval(point, pi, line, li)
        .map_err(accessor_error(StyleKey::StrokeWidth, li, pi))?;
    if !w.is_finite() || w < 0.0 {
        return Err(invalid(StyleKey::StrokeWidth, li, pi, format!("{w} (must be finite and >= 0)")));
    }
    Ok(w)
}

fn eval_color<P>(
    acc: &LineAccessors<P>,
    point: &P,
    pi: usize,
    line: &[P],
    li: usize,
) -> Result<[f32; 3], BuildError> {
    let c = acc
        .stroke_color
        .eval(point, pi, line, li)
        .map_err(accessor_error(StyleKey::StrokeColor, li, pi))?;
    if !c.is_finite() {
        return Err(invalid(StyleKey::StrokeColor, li, pi, format!("{c:?}")));
    }
    Ok(c.to_array())
}

fn eval_opacity<P>(
    acc: &LineAccessors<P>,
    point: &P,
    pi: usize,
    line: &[P],
    li: usize,
) -> Result<f32, BuildError> {
    let o = acc
        .stroke_opacity
        .eval(point, pi, line, li)
        .map_err(accessor_error(StyleKey::StrokeOpacity, li, pi))?;
    // Negative is the hidden sentinel; only NaN/inf are rejected.
    if !o.is_finite() {
        return Err(invalid(StyleKey::StrokeOpacity, li, pi, format!("{o}")));
    }
    Ok(o)
}

fn accessor_error(key: StyleKey, line: usize, point: usize) -> impl FnOnce(AccessorError) -> BuildError {
    move |error| BuildError::Accessor { key, line, point, error }
}

fn invalid(key: StyleKey, line: usize, point: usize, detail: String) -> BuildError {
    BuildError::InvalidStyle { key, line, point, detail }
}
