use super::{Bin, Drawable, DrawableId, LineMaterial, SortKey};

/// Receiver of drawables produced by features.
///
/// The host's scene implements this; features call it from `build`, `update`
/// and `exit`. Adding a known id replaces its entry; setters for unknown ids
/// are ignored.
pub trait DrawableSink {
    fn add_drawable(&mut self, drawable: &Drawable);
    fn remove_drawable(&mut self, id: DrawableId);
    fn set_visible(&mut self, id: DrawableId, visible: bool);
    fn set_bin(&mut self, id: DrawableId, bin: Bin);
    fn set_material(&mut self, id: DrawableId, material: LineMaterial);
}

#[derive(Debug, Clone)]
struct SceneEntry {
    order: u32,
    drawable: Drawable,
}

impl SceneEntry {
    fn key(&self) -> SortKey {
        SortKey::new(self.drawable.bin(), self.order)
    }
}

/// Registered drawables in draw order.
///
/// - `add_drawable` is O(1); re-adding an id replaces the entry and moves it to
///   the end of its bin
/// - draw-order iteration reuses an internal index buffer; it is only re-sorted
///   after membership or bin changes
#[derive(Debug, Default)]
pub struct Scene {
    entries: Vec<SceneEntry>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.position(id).map(|i| &self.entries[i].drawable)
    }

    /// Removes every drawable. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    /// Iterates all drawables, visible or not, in draw order.
    pub fn iter_in_draw_order(&mut self) -> impl Iterator<Item = &Drawable> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.entries[i].drawable)
    }

    /// Iterates visible drawables in draw order.
    pub fn visible_in_draw_order(&mut self) -> impl Iterator<Item = &Drawable> {
        self.iter_in_draw_order().filter(|d| d.visible())
    }

    fn position(&self, id: DrawableId) -> Option<usize> {
        self.entries.iter().position(|e| e.drawable.id() == id)
    }

    fn with_entry(&mut self, id: DrawableId, f: impl FnOnce(&mut Drawable)) -> bool {
        match self.position(id) {
            Some(i) => {
                f(&mut self.entries[i].drawable);
                true
            }
            None => {
                log::trace!("scene: ignoring update for unknown drawable {id:?}");
                false
            }
        }
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.entries.len());
        let entries = &self.entries;
        self.sorted_indices.sort_by_key(|&i| entries[i].key());
        self.sorted_dirty = false;
    }
}

impl DrawableSink for Scene {
    fn add_drawable(&mut self, drawable: &Drawable) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        let entry = SceneEntry { order, drawable: drawable.clone() };
        match self.position(drawable.id()) {
            Some(i) => self.entries[i] = entry,
            None => self.entries.push(entry),
        }
        self.sorted_dirty = true;
    }

    fn remove_drawable(&mut self, id: DrawableId) {
        if let Some(i) = self.position(id) {
            self.entries.remove(i);
            self.sorted_dirty = true;
        }
    }

    fn set_visible(&mut self, id: DrawableId, visible: bool) {
        self.with_entry(id, |d| d.set_visible(visible));
    }

    fn set_bin(&mut self, id: DrawableId, bin: Bin) {
        let mut changed = false;
        self.with_entry(id, |d| {
            changed = d.bin() != bin;
            d.set_bin(bin);
        });
        if changed {
            self.sorted_dirty = true;
        }
    }

    fn set_material(&mut self, id: DrawableId, material: LineMaterial) {
        self.with_entry(id, |d| d.set_material(material));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawable(bin: i32) -> Drawable {
        let mut d = Drawable::new(LineMaterial::default(), false);
        d.set_bin(Bin(bin));
        d
    }

    fn order(scene: &mut Scene) -> Vec<DrawableId> {
        scene.iter_in_draw_order().map(Drawable::id).collect()
    }

    #[test]
    fn draws_by_bin_then_insertion() {
        let (a, b, c) = (drawable(1), drawable(0), drawable(1));
        let mut scene = Scene::new();
        scene.add_drawable(&a);
        scene.add_drawable(&b);
        scene.add_drawable(&c);
        assert_eq!(order(&mut scene), vec![b.id(), a.id(), c.id()]);
    }

    #[test]
    fn bin_change_resorts() {
        let (a, b) = (drawable(0), drawable(0));
        let mut scene = Scene::new();
        scene.add_drawable(&a);
        scene.add_drawable(&b);
        scene.set_bin(a.id(), Bin(5));
        assert_eq!(order(&mut scene), vec![b.id(), a.id()]);
        assert_eq!(scene.get(a.id()).map(Drawable::bin), Some(Bin(5)));
    }

    #[test]
    fn re_adding_replaces_entry() {
        let mut a = drawable(0);
        let mut scene = Scene::new();
        scene.add_drawable(&a);
        a.set_visible(false);
        scene.add_drawable(&a);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(a.id()).map(Drawable::visible), Some(false));
    }

    #[test]
    fn hidden_drawables_are_skipped() {
        let (a, b) = (drawable(0), drawable(0));
        let mut scene = Scene::new();
        scene.add_drawable(&a);
        scene.add_drawable(&b);
        scene.set_visible(a.id(), false);
        let visible: Vec<DrawableId> = scene.visible_in_draw_order().map(Drawable::id).collect();
        assert_eq!(visible, vec![b.id()]);
    }

    #[test]
    fn remove_and_unknown_ids() {
        let a = drawable(0);
        let stranger = drawable(0);
        let mut scene = Scene::new();
        scene.add_drawable(&a);
        scene.set_visible(stranger.id(), false);
        scene.remove_drawable(stranger.id());
        assert_eq!(scene.len(), 1);
        scene.remove_drawable(a.id());
        assert!(scene.is_empty());
        assert!(!scene.contains(a.id()));
    }

    #[test]
    fn material_updates_are_stored() {
        let a = drawable(0);
        let mut scene = Scene::new();
        scene.add_drawable(&a);
        let m = LineMaterial { pixel_width: 0.5, join_cos_threshold: 0.2 };
        scene.set_material(a.id(), m);
        assert_eq!(scene.get(a.id()).map(Drawable::material), Some(m));
    }
}
