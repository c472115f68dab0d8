// Buffer window configuration

/// Timing configuration for a single action buffer
///
/// Windows are in seconds and must be non-negative. A zero window means the
/// corresponding edge only counts in the exact step it occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferConfig {
    /// Maximum time an activation may precede permission and still count
    pub pre_window: f32,

    /// Maximum time permission may have lapsed and an activation still count
    pub post_window: f32,

    /// Whether a successful fire schedules an automatic flush for the next step
    pub autoflush_on_success: bool,
}

impl BufferConfig {
    /// Create a new buffer configuration
    pub fn new(pre_window: f32, post_window: f32, autoflush_on_success: bool) -> Self {
        Self {
            pre_window,
            post_window,
            autoflush_on_success,
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(0.0, 0.0, false)
    }
}
