/// Work IO
///
/// Communicate between `work()` and the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkIo {
    /// Mark block as finished
    pub finished: bool,
}
