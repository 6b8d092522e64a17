/// Hidden entities are skipped by rendering, lighting and picking.
///
/// Entities without a `Visibility` component count as visible.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    pub fn visible() -> Self {
        Self { visible: true }
    }

    pub fn hidden() -> Self {
        Self { visible: false }
    }
}
