//! Configuration access port trait.
//!
//! Lookups never fail: absent or unparsable values fall back to `default`.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Positive count setting such as `[report] top_n`.
    fn get_usize(&self, section: &str, key: &str, default: usize) -> usize {
        usize::try_from(self.get_int(section, key, default as i64))
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(default)
    }
}
