#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { url: String },
    Delay,
    Finished,
}
