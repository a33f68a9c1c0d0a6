use crate::runtime::ItemTag;
use crate::runtime::Tag;

/// Stream windows of one `work()` call
///
/// Holds the input items offered by the host together with the tags that fall
/// into that window, and the output space the host requested. Tag indices are
/// relative to the start of the respective window.
pub struct StreamIo<'a, I, O> {
    input: &'a [I],
    input_tags: &'a [ItemTag],
    output: &'a mut [O],
    consumed: usize,
    produced: usize,
    output_tags: Vec<ItemTag>,
}

impl<'a, I, O> StreamIo<'a, I, O> {
    /// Create windows for one call
    pub fn new(input: &'a [I], input_tags: &'a [ItemTag], output: &'a mut [O]) -> Self {
        StreamIo {
            input,
            input_tags,
            output,
            consumed: 0,
            produced: 0,
            output_tags: Vec::new(),
        }
    }

    /// Input items
    pub fn input(&self) -> &'a [I] {
        self.input
    }

    /// Input tags, sorted by index
    pub fn tags(&self) -> &'a [ItemTag] {
        self.input_tags
    }

    /// Output space
    pub fn output(&mut self) -> &mut [O] {
        &mut self.output[..]
    }

    /// Mark `n` input items as consumed
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.input.len());
        self.consumed = n;
    }

    /// Mark `n` output items as produced
    pub fn produce(&mut self, n: usize) {
        debug_assert!(n <= self.output.len());
        self.produced = n;
    }

    /// Attach a tag to the output item at `index`
    ///
    /// The index may lie beyond the items produced in this call; the tag then
    /// belongs to an item a later call produces.
    pub fn add_tag(&mut self, index: usize, tag: Tag) {
        self.output_tags.push(ItemTag { index, tag });
    }

    /// Input items consumed in this call
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Output items produced in this call
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Output tags added in this call
    pub fn output_tags(&self) -> &[ItemTag] {
        &self.output_tags
    }

    /// Take the output tags, leaving none behind
    pub fn take_output_tags(&mut self) -> Vec<ItemTag> {
        std::mem::take(&mut self.output_tags)
    }
}
