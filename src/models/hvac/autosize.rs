/// An input that is either given or computed by the model's sizing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Autosize<T> {
    Autosize,
    Fixed(T),
}

impl<T: Copy> Autosize<T> {
    #[must_use]
    pub fn is_autosize(&self) -> bool {
        matches!(self, Self::Autosize)
    }

    /// The given value, or `None` while it awaits sizing.
    #[must_use]
    pub fn fixed(&self) -> Option<T> {
        match self {
            Self::Autosize => None,
            Self::Fixed(value) => Some(*value),
        }
    }
}
