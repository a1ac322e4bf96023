use crate::{
    core::{bounds::Bounds, geo::Point},
    Result,
};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A spatial item that can be indexed via an R-tree.
///
/// `seq` records insertion order so that queries can report hits in the
/// order the items were added, whatever the tree layout.
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub seq: usize,
    pub bounds: Bounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, bounds: Bounds, data: T) -> Self {
        Self {
            id,
            seq: 0,
            bounds,
            data,
        }
    }

    pub fn from_point(id: String, point: Point, data: T) -> Self {
        let bounds = Bounds::new(point, point);
        Self::new(id, bounds, data)
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.seq == other.seq
    }
}

impl<T> Eq for SpatialItem<T> {}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let center = self.bounds.center();
        let dx = center.x - point[0];
        let dy = center.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bounds.contains(&Point::new(point[0], point[1]))
    }
}

/// R-tree based spatial index over map coordinates
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
    bounds: Option<Bounds>,
    next_seq: usize,
}

impl<T: Clone> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
            bounds: None,
            next_seq: 0,
        }
    }

    /// Inserts an item, stamping it with the next sequence number
    pub fn insert(&mut self, mut item: SpatialItem<T>) -> Result<()> {
        if !item.bounds.is_valid() {
            return Err(crate::MapError::InvalidCoordinates(format!(
                "item {} has inverted bounds",
                item.id
            )));
        }

        match self.bounds.as_mut() {
            Some(b) => b.extend(&item.bounds),
            None => self.bounds = Some(item.bounds.clone()),
        }

        item.seq = self.next_seq;
        self.next_seq += 1;
        self.rtree.insert(item);
        Ok(())
    }

    /// Items intersecting `bounds`, in insertion order
    pub fn query(&self, bounds: &Bounds) -> Vec<&SpatialItem<T>> {
        let envelope =
            AABB::from_corners([bounds.min.x, bounds.min.y], [bounds.max.x, bounds.max.y]);
        let mut hits: Vec<_> = self
            .rtree
            .locate_in_envelope_intersecting(&envelope)
            .collect();
        hits.sort_by_key(|item| item.seq);
        hits
    }

    /// Items whose center lies within `radius` of `center`, nearest first
    pub fn query_radius(&self, center: &Point, radius: f64) -> Vec<&SpatialItem<T>> {
        let center_arr = [center.x, center.y];
        let mut hits: Vec<_> = self
            .rtree
            .locate_within_distance(center_arr, radius * radius)
            .collect();
        hits.sort_by(|a, b| {
            a.distance_2(&center_arr)
                .partial_cmp(&b.distance_2(&center_arr))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        hits
    }

    pub fn remove(&mut self, id: &str) -> Result<Option<SpatialItem<T>>> {
        // First find the element immutably, clone it, then remove mutably.
        let found = self.rtree.iter().find(|obj| obj.id == id).cloned();

        let Some(item) = found else {
            return Ok(None);
        };
        let removed = self.rtree.remove(&item);

        if self.rtree.size() == 0 {
            self.bounds = None;
        } else {
            let env = self.rtree.root().envelope();
            self.bounds = Some(Bounds::from_coords(
                env.lower()[0],
                env.lower()[1],
                env.upper()[0],
                env.upper()[1],
            ));
        }

        Ok(removed)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
        self.bounds = None;
        self.next_seq = 0;
    }

    pub fn get(&self, id: &str) -> Option<&SpatialItem<T>> {
        self.rtree.iter().find(|item| item.id == id)
    }
}

impl<T: Clone> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
