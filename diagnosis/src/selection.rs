use shared::PlantType;

/// Currently chosen plant. Membership in the fixed set is enforced by
/// `PlantType` itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlantSelection {
    current: Option<PlantType>,
}

impl PlantSelection {
    pub fn select(&mut self, plant: PlantType) {
        self.current = Some(plant);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<PlantType> {
        self.current
    }
}
