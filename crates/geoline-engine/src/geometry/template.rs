/// Which end of a segment a template slot copies.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Endpoint {
    Start = 0,
    End = 1,
}

/// One slot of the expansion template: an endpoint plus the side of the line
/// the expanded vertex is pushed to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TemplateEntry {
    pub endpoint: Endpoint,
    pub offset: f32,
}

impl TemplateEntry {
    const fn new(endpoint: Endpoint, offset: f32) -> Self {
        Self { endpoint, offset }
    }
}

/// Two triangles per segment: `(start,+) (end,-) (start,-)` and
/// `(start,+) (end,+) (end,-)`.
pub const LINE_TEMPLATE: [TemplateEntry; 6] = [
    TemplateEntry::new(Endpoint::Start, 1.0),
    TemplateEntry::new(Endpoint::End, -1.0),
    TemplateEntry::new(Endpoint::Start, -1.0),
    TemplateEntry::new(Endpoint::Start, 1.0),
    TemplateEntry::new(Endpoint::End, 1.0),
    TemplateEntry::new(Endpoint::End, -1.0),
];

/// The expansion template used for line features.
#[inline]
pub fn vertex_template() -> &'static [TemplateEntry] {
    &LINE_TEMPLATE
}

/// Number of GPU vertices emitted per segment.
#[inline]
pub fn vertices_per_segment() -> usize {
    vertex_template().len()
}
