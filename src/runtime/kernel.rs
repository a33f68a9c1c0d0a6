use crate::runtime::Result;
use crate::runtime::StreamIo;
use crate::runtime::WorkIo;

/// Kernel
///
/// Central trait to implement a block. The host calls [`work`](Kernel::work)
/// repeatedly, each time with the input that is currently available and the
/// output space it wants filled. A kernel never blocks and never spawns work
/// of its own.
pub trait Kernel: Send {
    /// Input item type, `()` for sources
    type Input: Copy + Send;
    /// Output item type
    type Output: Copy + Default + Send;

    /// Number of input items needed to produce `n_output` items.
    ///
    /// The host uses this to size the input window of the next call. Sources
    /// return 0. The estimate reflects the current state of the kernel; tags
    /// inside the offered window that change the ratio (e.g. a rate change) are
    /// not taken into account, so a call may produce fewer items than requested
    /// and the host has to call again.
    fn forecast(&self, _n_output: usize) -> usize {
        0
    }

    /// Processes stream data
    fn work(
        &mut self,
        io: &mut WorkIo,
        sio: &mut StreamIo<'_, Self::Input, Self::Output>,
    ) -> Result<()>;
}
