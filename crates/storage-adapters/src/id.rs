use domains::IdGenerator;
use uuid::Uuid;

/// Random v4 UUIDs in their 32-character hex form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
