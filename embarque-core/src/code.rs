use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Reservation codes are six decimal digits.
pub const CODE_LENGTH: usize = 6;

/// Source of reservation codes.
///
/// Injected into [`crate::ReservationService`] so tests can script the
/// codes a run will produce.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws two independent values in 0..=999 and renders each as a
/// zero-padded three-digit decimal, e.g. "045782".
///
/// Collisions are possible within the million-code space; the service
/// relies on the store's unique index and regenerates on conflict.
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..2)
            .map(|_| format!("{:03}", rng.gen_range(0..=999)))
            .collect()
    }
}

/// Replays a fixed list of codes, then keeps returning the last one.
///
/// Test support: lets a test pin the exact codes a scenario produces,
/// including deliberate collisions.
pub struct SequenceCodeGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl SequenceCodeGenerator {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        assert!(!codes.is_empty(), "SequenceCodeGenerator needs at least one code");
        Self {
            codes,
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        self.codes[idx.min(self.codes.len() - 1)].clone()
    }
}
