use crate::runtime::ItemTag;
use crate::runtime::Kernel;
use crate::runtime::Result;
use crate::runtime::StreamIo;
use crate::runtime::WorkIo;
use crate::runtime::config::config;

/// Mocker for a block
///
/// A harness to run a block without a scheduler. It plays the host: it keeps
/// the pending input items and tags, offers them to `work()` together with an
/// output window, and collects what the block produced. Used for unit tests,
/// benchmarking, and to chain blocks in the `tx` binary.
pub struct Mocker<K: Kernel> {
    kernel: K,
    input: Vec<K::Input>,
    input_tags: Vec<ItemTag>,
    output: Vec<K::Output>,
    output_tags: Vec<ItemTag>,
    window: Vec<K::Output>,
    buffer_size: usize,
    finished: bool,
}

impl<K: Kernel> Mocker<K> {
    /// Create mocker
    pub fn new(kernel: K) -> Self {
        Self::with_buffer_size(kernel, config().buffer_size)
    }

    /// Create mocker that requests at most `buffer_size` items per call
    pub fn with_buffer_size(kernel: K, buffer_size: usize) -> Self {
        Mocker {
            kernel,
            input: Vec::new(),
            input_tags: Vec::new(),
            output: Vec::new(),
            output_tags: Vec::new(),
            window: Vec::new(),
            buffer_size: buffer_size.max(1),
            finished: false,
        }
    }

    /// Wrapped kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Append data to the input buffer
    pub fn input(&mut self, data: Vec<K::Input>) {
        self.input_with_tags(data, Vec::new());
    }

    /// Append data and tags to the input buffer
    ///
    /// Tag indices are relative to the first item of `data`.
    pub fn input_with_tags(&mut self, mut data: Vec<K::Input>, mut tags: Vec<ItemTag>) {
        let offset = self.input.len();
        for t in tags.iter_mut() {
            t.index += offset;
        }

        self.input.append(&mut data);
        self.input_tags.append(&mut tags);
    }

    /// Input items not yet consumed by the block
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Whether the block reported that it is done
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Forecast of the wrapped kernel
    pub fn forecast(&self, n_output: usize) -> usize {
        self.kernel.forecast(n_output)
    }

    /// Emulate exactly one host call
    ///
    /// Offers at most `n_input` of the pending input items and requests
    /// `n_output` output items. Returns (consumed, produced).
    pub fn process(&mut self, n_input: usize, n_output: usize) -> Result<(usize, usize)> {
        let n_input = std::cmp::min(n_input, self.input.len());
        let tags_in_window = self.input_tags.partition_point(|t| t.index < n_input);

        self.window.clear();
        self.window.resize(n_output, K::Output::default());

        let mut io = WorkIo::default();
        let mut sio = StreamIo::new(
            &self.input[..n_input],
            &self.input_tags[..tags_in_window],
            &mut self.window,
        );
        self.kernel.work(&mut io, &mut sio)?;

        let consumed = sio.consumed();
        let produced = sio.produced();
        let offset = self.output.len();
        self.output_tags
            .extend(sio.take_output_tags().into_iter().map(|mut t| {
                t.index += offset;
                t
            }));
        self.output.extend_from_slice(&self.window[..produced]);

        self.input.drain(..consumed);
        self.input_tags.retain(|t| t.index >= consumed);
        for t in self.input_tags.iter_mut() {
            t.index -= consumed;
        }

        if io.finished {
            self.finished = true;
        }

        Ok((consumed, produced))
    }

    /// Run the block until it makes no more progress or is finished
    pub fn run(&mut self) -> Result<()> {
        loop {
            let (consumed, produced) = self.process(self.input.len(), self.buffer_size)?;
            if self.finished || (consumed == 0 && produced == 0) {
                break;
            }
        }
        Ok(())
    }

    /// Get data from output buffer
    pub fn output(&self) -> (&[K::Output], &[ItemTag]) {
        (&self.output, &self.output_tags)
    }

    /// Taking data from output buffer, freeing up the buffer
    ///
    /// Tags that point past the taken items stay behind, re-based onto the
    /// items produced next.
    pub fn take_output(&mut self) -> (Vec<K::Output>, Vec<ItemTag>) {
        let data = std::mem::take(&mut self.output);
        let n = data.len();
        let (tags, mut later): (Vec<ItemTag>, Vec<ItemTag>) = std::mem::take(&mut self.output_tags)
            .into_iter()
            .partition(|t| t.index < n);
        for t in later.iter_mut() {
            t.index -= n;
        }
        self.output_tags = later;
        (data, tags)
    }
}
