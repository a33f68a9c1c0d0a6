use crate::Rate;
use crate::runtime::StreamIo;

/// Stream tag
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    /// First byte of a PPDU with the PPDU length in bytes
    FrameStart(usize),
    /// Modulation switches to the given rate at this item
    RateChange(Rate),
}

/// Item tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemTag {
    /// Index of item in buffer
    pub index: usize,
    /// [`Tag`] value
    pub tag: Tag,
}

/// Tag propagation strategy where all tags are copied from input to output.
///
/// # Note
///
/// Assumes `sio.consumed() == sio.produced()`
pub fn copy_tag_propagation<I, O>(sio: &mut StreamIo<'_, I, O>) {
    debug_assert_eq!(sio.consumed(), sio.produced());
    let n = sio.consumed();
    for t in sio.tags().iter().filter(|x| x.index < n) {
        sio.add_tag(t.index, t.tag.clone());
    }
}
