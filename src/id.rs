/// Monotonic ID generator. Objects drawing from the same generator never
/// share an ID, whatever their type, so a bare `u64` back-reference within
/// that stream is never ambiguous. The world and each planner own separate
/// generators; their streams are independent and overlap freely.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Ensure future IDs are strictly greater than `id`.
    /// Used when reloading persisted state so fresh IDs never collide.
    pub fn advance_past(&mut self, id: u64) {
        if id >= self.next {
            self.next = id + 1;
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
