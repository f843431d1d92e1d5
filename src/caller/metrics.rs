// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for protected API calls.
#[derive(Debug, Default)]
pub struct CallMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	interactive_sign_ins: AtomicU64,
	interactive_fallbacks: AtomicU64,
}
impl CallMetrics {
	/// Returns the total number of protected API call attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that produced a success payload.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that produced a failure.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of interactive sign-ins the caller started.
	pub fn interactive_sign_ins(&self) -> u64 {
		self.interactive_sign_ins.load(Ordering::Relaxed)
	}

	/// Returns the number of times silent acquisition fell back to interaction.
	pub fn interactive_fallbacks(&self) -> u64 {
		self.interactive_fallbacks.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_interactive_sign_in(&self) {
		self.interactive_sign_ins.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_interactive_fallback(&self) {
		self.interactive_fallbacks.fetch_add(1, Ordering::Relaxed);
	}
}
