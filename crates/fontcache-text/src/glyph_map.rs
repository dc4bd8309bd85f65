//! Codepoint → atlas location map.
//!
//! A fixed number of chained buckets, chosen when the font is created and
//! never rehashed. Nodes live in one vector and are addressed by [`GlyphId`],
//! so handles stay valid for the life of the map. Inserting a codepoint that
//! is already present appends a second node that lookups never reach.

use fontcache_core::geometry::Rect;

use crate::codec::Codepoint;

/// Where a glyph lives: the atlas level and the pixel rectangle inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphEntry {
    pub cache_level: usize,
    pub rect: Rect<i32>,
}

impl GlyphEntry {
    pub const fn new(cache_level: usize, rect: Rect<i32>) -> Self {
        Self { cache_level, rect }
    }
}

/// Stable handle to a node in a [`GlyphMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(u32);

impl GlyphId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node {
    codepoint: Codepoint,
    entry: GlyphEntry,
    next: Option<GlyphId>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    head: Option<GlyphId>,
    tail: Option<GlyphId>,
}

#[derive(Debug, Clone)]
pub struct GlyphMap {
    buckets: Vec<Bucket>,
    nodes: Vec<Node>,
}

impl GlyphMap {
    pub const DEFAULT_BUCKETS: usize = 300;

    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: vec![Bucket::default(); bucket_count.max(1)],
            nodes: Vec::new(),
        }
    }

    #[inline]
    fn bucket_of(&self, codepoint: Codepoint) -> usize {
        codepoint as usize % self.buckets.len()
    }

    /// Append `entry` to the tail of the codepoint's bucket.
    pub fn insert(&mut self, codepoint: Codepoint, entry: GlyphEntry) -> GlyphId {
        let id = GlyphId(self.nodes.len() as u32);
        self.nodes.push(Node {
            codepoint,
            entry,
            next: None,
        });

        let index = self.bucket_of(codepoint);
        let bucket = &mut self.buckets[index];
        match bucket.tail {
            Some(tail) => self.nodes[tail.index()].next = Some(id),
            None => bucket.head = Some(id),
        }
        bucket.tail = Some(id);
        id
    }

    /// First node for `codepoint` in chain order.
    pub fn find(&self, codepoint: Codepoint) -> Option<GlyphId> {
        let mut cursor = self.buckets[self.bucket_of(codepoint)].head;
        while let Some(id) = cursor {
            let node = &self.nodes[id.index()];
            if node.codepoint == codepoint {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    pub fn get(&self, id: GlyphId) -> Option<&GlyphEntry> {
        self.nodes.get(id.index()).map(|n| &n.entry)
    }

    pub fn lookup(&self, codepoint: Codepoint) -> Option<&GlyphEntry> {
        self.find(codepoint).and_then(|id| self.get(id))
    }

    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.find(codepoint).is_some()
    }

    /// Number of stored nodes, unreachable duplicates included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Every stored codepoint, bucket by bucket in chain order.
    pub fn codepoints(&self) -> impl Iterator<Item = Codepoint> + '_ {
        self.buckets.iter().flat_map(move |bucket| {
            let mut cursor = bucket.head;
            std::iter::from_fn(move || {
                let id = cursor?;
                let node = &self.nodes[id.index()];
                cursor = node.next;
                Some(node.codepoint)
            })
        })
    }

    /// Drop every node, keeping the bucket count.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.fill(Bucket::default());
    }
}

impl Default for GlyphMap {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUCKETS)
    }
}
