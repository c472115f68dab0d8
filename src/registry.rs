// Keyed registry of action buffers
//
// Owns one buffer per named action and forwards per-step updates and queries
// to the matching instance. Pure dispatch: all timing logic lives in the
// buffers themselves. Querying an unknown name is reported as a recoverable
// error (logged at warn) and answered with a safe default that never causes
// an action to incorrectly fire.

use super::buffer::ActionBuffer;
use super::config::BufferConfig;
use super::outcome::BufferOutcome;
use std::collections::HashMap;

/// Registry lookup errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("No action buffer registered under name: {0}")]
    UnknownAction(String),
}

/// Container mapping action names to their buffers
///
/// The registry exclusively owns each buffer and destroys it on
/// `unregister`. Drive all buffers once per simulation step with `step_all`,
/// or fetch one with `get_mut` and update it directly.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    /// Registered buffers, keyed by action name
    buffers: HashMap<String, ActionBuffer>,
}

impl BufferRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
        }
    }

    /// Register a buffer under a name, replacing any prior entry
    pub fn register(
        &mut self,
        name: &str,
        pre_window: f32,
        post_window: f32,
        autoflush_on_success: bool,
    ) {
        self.register_with_config(
            name,
            BufferConfig::new(pre_window, post_window, autoflush_on_success),
        );
    }

    /// Register a buffer from a configuration, replacing any prior entry
    pub fn register_with_config(&mut self, name: &str, config: BufferConfig) {
        if self
            .buffers
            .insert(name.to_string(), ActionBuffer::from_config(config))
            .is_some()
        {
            log::info!("Replaced action buffer: {}", name);
        } else {
            log::info!("Registered action buffer: {}", name);
        }
    }

    /// Remove a buffer, returning whether it existed
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.buffers.remove(name).is_some();
        if removed {
            log::info!("Unregistered action buffer: {}", name);
        }
        removed
    }

    /// Check if a buffer is registered under a name
    pub fn contains(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    /// Get all registered action names (unordered)
    pub fn names(&self) -> Vec<&str> {
        self.buffers.keys().map(String::as_str).collect()
    }

    /// Get the number of registered buffers
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Remove all registered buffers
    pub fn clear(&mut self) {
        self.buffers.clear();
    }

    /// Get a buffer for direct access
    pub fn get(&self, name: &str) -> Option<&ActionBuffer> {
        self.buffers.get(name)
    }

    /// Get a buffer for direct mutable access
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActionBuffer> {
        self.buffers.get_mut(name)
    }

    /// Get a buffer, or a typed error for callers that want one
    pub fn try_get(&self, name: &str) -> Result<&ActionBuffer, RegistryError> {
        self.buffers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownAction(name.to_string()))
    }

    /// Mutable counterpart of `try_get`
    pub fn try_get_mut(&mut self, name: &str) -> Result<&mut ActionBuffer, RegistryError> {
        self.buffers
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownAction(name.to_string()))
    }

    /// Advance every registered buffer by one simulation step
    ///
    /// Names missing from either map default to false for that edge.
    pub fn step_all(
        &mut self,
        activations: &HashMap<String, bool>,
        permissions: &HashMap<String, bool>,
        elapsed: f32,
    ) {
        for (name, buffer) in &mut self.buffers {
            let activation = activations.get(name).copied().unwrap_or(false);
            let permission = permissions.get(name).copied().unwrap_or(false);
            buffer.update(activation, permission, elapsed);
        }
    }

    /// Advance a single named buffer by one simulation step
    pub fn update(&mut self, name: &str, activation: bool, permission: bool, elapsed: f32) {
        if let Some(buffer) = self.lookup_mut(name) {
            buffer.update(activation, permission, elapsed);
        }
    }

    /// Flush a single named buffer
    pub fn flush(&mut self, name: &str) {
        if let Some(buffer) = self.lookup_mut(name) {
            buffer.flush();
        }
    }

    /// Flush every registered buffer
    pub fn flush_all(&mut self) {
        for buffer in self.buffers.values_mut() {
            buffer.flush();
        }
    }

    /// Check if a named action should run this step
    pub fn should_fire(&self, name: &str) -> bool {
        self.lookup(name).map(ActionBuffer::should_fire).unwrap_or(false)
    }

    /// Get the most recent outcome for a named action
    pub fn outcome(&self, name: &str) -> BufferOutcome {
        self.lookup(name).map(ActionBuffer::outcome).unwrap_or_default()
    }

    /// Check if a named buffer has an automatic flush pending
    pub fn will_autoflush_next_step(&self, name: &str) -> bool {
        self.lookup(name)
            .map(ActionBuffer::will_autoflush_next_step)
            .unwrap_or(false)
    }

    /// Time left in a named buffer's pre-window
    pub fn activation_time_remaining(&self, name: &str) -> f32 {
        self.lookup(name)
            .map(ActionBuffer::activation_time_remaining)
            .unwrap_or(0.0)
    }

    /// Time since a named buffer's activation edge
    pub fn activation_time_passed(&self, name: &str) -> f32 {
        self.lookup(name)
            .map(ActionBuffer::activation_time_passed)
            .unwrap_or(0.0)
    }

    /// Time left in a named buffer's post-window
    pub fn permission_time_remaining(&self, name: &str) -> f32 {
        self.lookup(name)
            .map(ActionBuffer::permission_time_remaining)
            .unwrap_or(0.0)
    }

    /// Time since a named buffer's permission lapsed
    pub fn permission_time_passed(&self, name: &str) -> f32 {
        self.lookup(name)
            .map(ActionBuffer::permission_time_passed)
            .unwrap_or(0.0)
    }

    /// Get a named buffer's pre-window duration
    pub fn pre_window(&self, name: &str) -> f32 {
        self.lookup(name).map(ActionBuffer::pre_window).unwrap_or(0.0)
    }

    /// Get a named buffer's post-window duration
    pub fn post_window(&self, name: &str) -> f32 {
        self.lookup(name).map(ActionBuffer::post_window).unwrap_or(0.0)
    }

    /// Check a named buffer's autoflush policy
    pub fn autoflush_on_success(&self, name: &str) -> bool {
        self.lookup(name)
            .map(ActionBuffer::autoflush_on_success)
            .unwrap_or(false)
    }

    /// Set a named buffer's pre-window duration
    pub fn set_pre_window(&mut self, name: &str, pre_window: f32) {
        if let Some(buffer) = self.lookup_mut(name) {
            buffer.set_pre_window(pre_window);
        }
    }

    /// Set a named buffer's post-window duration
    pub fn set_post_window(&mut self, name: &str, post_window: f32) {
        if let Some(buffer) = self.lookup_mut(name) {
            buffer.set_post_window(post_window);
        }
    }

    /// Set a named buffer's autoflush policy
    pub fn set_autoflush_on_success(&mut self, name: &str, autoflush_on_success: bool) {
        if let Some(buffer) = self.lookup_mut(name) {
            buffer.set_autoflush_on_success(autoflush_on_success);
        }
    }

    /// Look up a buffer, reporting a miss on the diagnostic channel
    fn lookup(&self, name: &str) -> Option<&ActionBuffer> {
        let buffer = self.buffers.get(name);
        if buffer.is_none() {
            log::warn!("No action buffer registered under name: {}", name);
        }
        buffer
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut ActionBuffer> {
        let buffer = self.buffers.get_mut(name);
        if buffer.is_none() {
            log::warn!("No action buffer registered under name: {}", name);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = BufferRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_register_and_contains() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.2, 0.1, true);

        assert!(registry.contains("jump"));
        assert!(!registry.contains("dash"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);

        // Fire the old buffer, then re-register under the same name
        registry.update("jump", true, true, 0.0);
        assert!(registry.should_fire("jump"));

        registry.register("jump", 0.5, 0.0, true);
        assert_eq!(registry.len(), 1);
        assert!(!registry.should_fire("jump"), "fresh buffer replaces state");
        assert_eq!(registry.pre_window("jump"), 0.5);
        assert_eq!(registry.post_window("jump"), 0.0);
        assert!(registry.autoflush_on_success("jump"));
    }

    #[test]
    fn test_register_with_config() {
        let mut registry = BufferRegistry::new();
        registry.register_with_config("dash", BufferConfig::new(0.1, 0.0, false));
        assert_eq!(registry.pre_window("dash"), 0.1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.2, 0.1, false);

        assert!(registry.unregister("jump"));
        assert!(!registry.contains("jump"));
        assert!(!registry.unregister("jump"), "second removal is a no-op");
    }

    #[test]
    fn test_names() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.2, 0.1, false);
        registry.register("dash", 0.1, 0.0, false);

        let names = registry.names();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"jump"));
        assert!(names.contains(&"dash"));
    }

    #[test]
    fn test_clear() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.2, 0.1, false);
        registry.register("dash", 0.1, 0.0, false);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_step_all_updates_each_buffer() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);
        registry.register("dash", 0.25, 0.25, false);

        let mut activations = HashMap::new();
        activations.insert("jump".to_string(), true);
        activations.insert("dash".to_string(), true);
        let mut permissions = HashMap::new();
        permissions.insert("jump".to_string(), true);
        permissions.insert("dash".to_string(), true);

        registry.step_all(&activations, &permissions, 0.0);
        assert!(registry.should_fire("jump"));
        assert!(registry.should_fire("dash"));
    }

    #[test]
    fn test_step_all_missing_keys_default_false() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);
        registry.register("dash", 0.25, 0.25, false);

        // Only "jump" appears in the maps; "dash" sees false/false
        let mut activations = HashMap::new();
        activations.insert("jump".to_string(), true);
        let mut permissions = HashMap::new();
        permissions.insert("jump".to_string(), true);

        registry.step_all(&activations, &permissions, 0.125);
        assert!(registry.should_fire("jump"));
        assert!(!registry.should_fire("dash"));
        assert_eq!(registry.activation_time_passed("dash"), 0.25);
    }

    #[test]
    fn test_unknown_name_safe_defaults() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);
        registry.update("jump", true, true, 0.0);

        assert!(!registry.should_fire("dash"));
        assert_eq!(registry.outcome("dash"), BufferOutcome::NoFire);
        assert!(!registry.will_autoflush_next_step("dash"));
        assert_eq!(registry.activation_time_remaining("dash"), 0.0);
        assert_eq!(registry.activation_time_passed("dash"), 0.0);
        assert_eq!(registry.permission_time_remaining("dash"), 0.0);
        assert_eq!(registry.permission_time_passed("dash"), 0.0);
        assert_eq!(registry.pre_window("dash"), 0.0);
        assert_eq!(registry.post_window("dash"), 0.0);
        assert!(!registry.autoflush_on_success("dash"));

        // Unknown-name queries never disturb registered instances
        assert!(registry.should_fire("jump"));
    }

    #[test]
    fn test_unknown_name_mutators_are_noops() {
        let mut registry = BufferRegistry::new();
        registry.set_pre_window("ghost", 1.0);
        registry.set_post_window("ghost", 1.0);
        registry.set_autoflush_on_success("ghost", true);
        registry.flush("ghost");
        registry.update("ghost", true, true, 0.0);

        assert!(!registry.contains("ghost"), "mutators never register");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_try_get_unknown_is_error() {
        let registry = BufferRegistry::new();
        let err = registry.try_get("jump").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No action buffer registered under name: jump"
        );
    }

    #[test]
    fn test_try_get_known() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.2, 0.1, false);
        assert!(registry.try_get("jump").is_ok());
        assert!(registry.try_get_mut("jump").is_ok());
    }

    #[test]
    fn test_flush_by_name() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);
        registry.register("dash", 0.25, 0.25, false);
        registry.update("jump", true, true, 0.0);
        registry.update("dash", true, true, 0.0);

        registry.flush("jump");
        assert!(!registry.should_fire("jump"));
        assert!(registry.should_fire("dash"), "other buffers untouched");
    }

    #[test]
    fn test_flush_all() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);
        registry.register("dash", 0.25, 0.25, false);
        registry.update("jump", true, true, 0.0);
        registry.update("dash", true, true, 0.0);

        registry.flush_all();
        assert!(!registry.should_fire("jump"));
        assert!(!registry.should_fire("dash"));
    }

    #[test]
    fn test_direct_buffer_access() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.25, 0.25, false);

        if let Some(buffer) = registry.get_mut("jump") {
            buffer.update(true, true, 0.0);
        }
        assert!(registry.get("jump").unwrap().should_fire());
        assert!(registry.get("dash").is_none());
    }

    #[test]
    fn test_forwarded_time_accessors() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.5, 0.25, false);
        registry.update("jump", true, true, 0.0);
        registry.update("jump", false, false, 0.125);

        assert_eq!(registry.activation_time_passed("jump"), 0.125);
        assert_eq!(registry.activation_time_remaining("jump"), 0.375);
        assert_eq!(registry.permission_time_passed("jump"), 0.125);
        assert_eq!(registry.permission_time_remaining("jump"), 0.125);
    }

    #[test]
    fn test_forwarded_mutators() {
        let mut registry = BufferRegistry::new();
        registry.register("jump", 0.0, 0.0, false);

        registry.set_pre_window("jump", 0.5);
        registry.set_post_window("jump", 0.25);
        registry.set_autoflush_on_success("jump", true);

        assert_eq!(registry.pre_window("jump"), 0.5);
        assert_eq!(registry.post_window("jump"), 0.25);
        assert!(registry.autoflush_on_success("jump"));
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::UnknownAction("dash".to_string());
        assert_eq!(
            err.to_string(),
            "No action buffer registered under name: dash"
        );
    }
}
